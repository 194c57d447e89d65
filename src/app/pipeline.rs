//! Shared "report pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load -> normalize -> filter -> aggregate -> rank
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use tracing::info;

use crate::agg::{aggregate, dimension_extractor, AggregateOptions};
use crate::data::loader::load_dataset;
use crate::domain::{AggregatedSeries, NormalizedDeal, ReportConfig};
use crate::error::AppError;
use crate::io::ingest::{normalize_dataset, IngestedData};
use crate::report::{rank_categories, Rankings};

/// All computed outputs of a single report run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub series: AggregatedSeries,
    pub rankings: Rankings,
}

/// Execute the full pipeline and return the computed outputs.
pub fn run_report(config: &ReportConfig) -> Result<RunOutput, AppError> {
    // 1) Load + normalize the raw dataset.
    let raw = load_dataset(&config.source)?;
    let ingest = normalize_dataset(&raw);

    if ingest.deals.is_empty() {
        return Err(AppError::empty(
            "No deals remain after normalization/filtering.",
        ));
    }

    // 2) Aggregate for the configured view.
    let (series, rankings) = aggregate_view(config, &ingest);

    info!(
        deals = ingest.rows_used,
        years = series.rows.len(),
        categories = series.categories.len(),
        "report pipeline complete"
    );

    Ok(RunOutput {
        ingest,
        series,
        rankings,
    })
}

/// Re-aggregate an already ingested dataset for a (possibly changed) view.
///
/// This is what the TUI calls when the user flips dimension/metric/filters:
/// normalization is untouched, only the aggregation is recomputed.
pub fn aggregate_view(
    config: &ReportConfig,
    ingest: &IngestedData,
) -> (AggregatedSeries, Rankings) {
    // Grand-total basis: year filter only. Display basis: all filters. The
    // category/canton/phase/gender filters must not move the total line.
    let total_basis: Vec<NormalizedDeal> = ingest
        .deals
        .iter()
        .filter(|d| config.filter.matches_year(d))
        .cloned()
        .collect();
    let display: Vec<NormalizedDeal> = total_basis
        .iter()
        .filter(|d| config.filter.matches(d))
        .cloned()
        .collect();

    let year_range = match (config.filter.year_min, config.filter.year_max) {
        (Some(first), Some(last)) => Some((first, last)),
        _ => None,
    };

    let series = aggregate(
        &display,
        dimension_extractor(config.dimension),
        &AggregateOptions {
            categories: (!config.categories.is_empty()).then_some(config.categories.as_slice()),
            all_deals: Some(&total_basis),
            year_range,
        },
    );
    let rankings = rank_categories(&series, config.top_n);

    (series, rankings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChartMode, DataSource, DealFilter, Dimension, Metric};

    fn sample_config() -> ReportConfig {
        ReportConfig {
            source: DataSource::Sample { seed: 11, deals: 300 },
            dimension: Dimension::Industry,
            metric: Metric::Volume,
            mode: ChartMode::Column,
            show_total: true,
            filter: DealFilter::default(),
            categories: Vec::new(),
            top_n: 5,
            plot: false,
            plot_width: 80,
            plot_height: 20,
            export_csv: None,
            export_chart: None,
            export_html: None,
        }
    }

    #[test]
    fn sample_run_produces_a_populated_report() {
        let run = run_report(&sample_config()).unwrap();
        assert!(!run.series.is_empty());
        assert!(!run.series.categories.is_empty());
        assert!(!run.rankings.by_volume.is_empty());

        // Totals cover at least the visible categories in every year.
        for row in &run.series.rows {
            let stacked = row.stacked_of(&run.series.categories, Metric::Volume);
            assert!(row.total_volume + 1e-6 >= stacked);
        }
    }

    #[test]
    fn category_filters_leave_totals_untouched() {
        let config = sample_config();
        let run = run_report(&config).unwrap();

        let mut filtered_config = config.clone();
        filtered_config.filter.industries = vec!["Biotech".to_string()];
        let filtered = aggregate_view(&filtered_config, &run.ingest);

        for (full_row, filtered_row) in run.series.rows.iter().zip(&filtered.0.rows) {
            assert_eq!(full_row.year, filtered_row.year);
            assert_eq!(full_row.total_count, filtered_row.total_count);
            assert_eq!(full_row.total_volume, filtered_row.total_volume);
        }
    }

    #[test]
    fn year_filter_narrows_both_bases() {
        let config = sample_config();
        let run = run_report(&config).unwrap();

        let mut windowed = config.clone();
        windowed.filter.year_min = Some(2018);
        windowed.filter.year_max = Some(2020);
        let (series, _) = aggregate_view(&windowed, &run.ingest);

        assert_eq!(series.year_span(), Some((2018, 2020)));
    }
}
