//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the aggregation code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::{AggregatedSeries, Metric, ReportConfig};
use crate::io::ingest::IngestedData;
use crate::report::Rankings;

/// Format the full run summary (dataset stats + degradation diagnostics).
pub fn format_run_summary(
    ingest: &IngestedData,
    series: &AggregatedSeries,
    config: &ReportConfig,
) -> String {
    let mut out = String::new();

    out.push_str("=== vcp - Swiss VC funding report ===\n");
    out.push_str(&format!(
        "View: {} | {} | {}{}\n",
        config.dimension.display_name(),
        config.metric.unit_label(),
        config.mode.display_name(),
        if config.show_total { " + total" } else { "" },
    ));

    out.push_str(&format!(
        "Deals: read={} used={} confidential={} row_errors={}\n",
        ingest.rows_read,
        ingest.rows_used,
        ingest.confidential_dropped,
        ingest.row_errors.len(),
    ));

    let stats = &ingest.stats;
    out.push_str(&format!(
        "Years: {} | total volume: {:.1} CHF m | yearless: {}\n",
        match (stats.year_min, stats.year_max) {
            (Some(min), Some(max)) => format!("{min}-{max}"),
            _ => "-".to_string(),
        },
        stats.total_volume,
        stats.yearless,
    ));

    out.push_str(&format!(
        "Companies indexed: {} | deals without industry: {}\n",
        stats.companies_indexed, stats.unmatched_industry,
    ));

    if ingest.amounts_rescaled > 0 {
        out.push_str(&format!(
            "Note: {} amount(s) rescaled from raw currency units (/1e6).\n",
            ingest.amounts_rescaled,
        ));
    }

    out.push_str(&format!(
        "Categories: {} | chart rows: {}\n",
        series.categories.len(),
        series.rows.len(),
    ));

    out
}

/// Format the per-year table (one column per category plus the total).
pub fn format_year_table(series: &AggregatedSeries, metric: Metric) -> String {
    const COL: usize = 12;

    let mut out = String::new();
    out.push_str(&format!("{:<6}", "year"));
    for category in &series.categories {
        out.push_str(&format!(" {:>COL$}", truncate(category, COL)));
    }
    out.push_str(&format!(" {:>COL$}\n", "total"));

    out.push_str(&format!("{:-<6}", ""));
    for _ in 0..=series.categories.len() {
        out.push_str(&format!(" {:-<COL$}", ""));
    }
    out.push('\n');

    for row in &series.rows {
        out.push_str(&format!("{:<6}", row.year));
        for category in &series.categories {
            out.push_str(&format!(" {:>COL$}", fmt_value(row.value_of(category, metric), metric)));
        }
        out.push_str(&format!(" {:>COL$}\n", fmt_value(row.total_of(metric), metric)));
    }

    out
}

/// Format the top-category tables.
pub fn format_rankings(rankings: &Rankings) -> String {
    let mut out = String::new();

    out.push_str("Top categories by volume (CHF m):\n");
    for (i, entry) in rankings.by_volume.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}. {:<28} {:>10.1}\n",
            i + 1,
            truncate(&entry.name, 28),
            entry.volume,
        ));
    }

    out.push_str("\nTop categories by deal count:\n");
    for (i, entry) in rankings.by_count.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}. {:<28} {:>10}\n",
            i + 1,
            truncate(&entry.name, 28),
            entry.count,
        ));
    }

    out
}

fn fmt_value(value: f64, metric: Metric) -> String {
    match metric {
        Metric::Count => format!("{}", value as u64),
        Metric::Volume => format!("{value:.1}"),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::domain::{CategoryCell, YearRow};
    use crate::report::rank_categories;

    fn series() -> AggregatedSeries {
        AggregatedSeries {
            categories: vec!["Biotech".to_string(), "ICT".to_string()],
            rows: vec![YearRow {
                year: 2020,
                cells: BTreeMap::from([
                    ("Biotech".to_string(), CategoryCell { count: 2, volume: 5.0 }),
                    ("ICT".to_string(), CategoryCell { count: 1, volume: 3.0 }),
                ]),
                total_count: 3,
                total_volume: 8.0,
            }],
        }
    }

    #[test]
    fn year_table_lines_up_categories_and_total() {
        let table = format_year_table(&series(), Metric::Volume);
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[0].contains("Biotech"));
        assert!(lines[0].contains("total"));
        assert!(lines[2].starts_with("2020"));
        assert!(lines[2].contains("5.0"));
        assert!(lines[2].contains("8.0"));
    }

    #[test]
    fn count_table_has_no_decimals() {
        let table = format_year_table(&series(), Metric::Count);
        assert!(table.contains(" 2"));
        assert!(!table.contains("2.0"));
    }

    #[test]
    fn rankings_format_lists_both_orders() {
        let rankings = rank_categories(&series(), 5);
        let text = format_rankings(&rankings);
        assert!(text.contains("Top categories by volume"));
        assert!(text.contains("  1. Biotech"));
        assert!(text.contains("Top categories by deal count"));
    }

    #[test]
    fn truncate_marks_shortened_names() {
        assert_eq!(truncate("Consumer Products", 10), "Consumer .");
        assert_eq!(truncate("ICT", 10), "ICT");
    }
}
