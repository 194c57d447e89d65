//! The category/year aggregation engine.
//!
//! Semantics worth calling out:
//!
//! - Deals without a parseable year never appear in year rows.
//! - Deals whose extractor returns `None` are excluded from the per-category
//!   breakdown (an aggregation over a null key would silently merge unrelated
//!   deals) but still count toward the grand totals.
//! - `total_count`/`total_volume` are computed from the `all_deals` basis when
//!   one is supplied. That basis is deliberately independent of the category
//!   selection: toggling category visibility must never move the total line.
//! - The row range is continuous. Every year between the first and last
//!   observed year (union of both bases, widened by any requested range)
//!   gets a row, all-zero rows included, so the x-axis has no holes.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{AggregatedSeries, CategoryCell, Dimension, NormalizedDeal, YearRow};

/// Caller knobs for one aggregation call.
#[derive(Default)]
pub struct AggregateOptions<'a> {
    /// Explicit category universe; `None` derives it from the input deals.
    pub categories: Option<&'a [String]>,
    /// Grand-total basis; `None` falls back to the input deals.
    pub all_deals: Option<&'a [NormalizedDeal]>,
    /// Inclusive year range the rows must cover even where no deals exist.
    pub year_range: Option<(i32, i32)>,
}

/// Aggregate deals into per-year, per-category rows.
///
/// Pure: no state is retained and no caller-owned data is referenced by the
/// returned value. Empty input yields an empty row list.
pub fn aggregate<F>(
    deals: &[NormalizedDeal],
    category_of: F,
    opts: &AggregateOptions<'_>,
) -> AggregatedSeries
where
    F: Fn(&NormalizedDeal) -> Option<String>,
{
    let total_basis = opts.all_deals.unwrap_or(deals);

    let categories: Vec<String> = match opts.categories {
        Some(explicit) => explicit.to_vec(),
        None => {
            let distinct: BTreeSet<String> =
                deals.iter().filter_map(&category_of).collect();
            distinct.into_iter().collect()
        }
    };

    let Some((first_year, last_year)) = year_span(deals, total_basis, opts.year_range) else {
        return AggregatedSeries {
            rows: Vec::new(),
            categories,
        };
    };

    let mut rows: Vec<YearRow> = (first_year..=last_year)
        .map(|year| YearRow {
            year,
            cells: categories
                .iter()
                .map(|c| (c.clone(), CategoryCell::default()))
                .collect::<BTreeMap<_, _>>(),
            total_count: 0,
            total_volume: 0.0,
        })
        .collect();

    let row_index = |year: i32| (year - first_year) as usize;

    for deal in deals {
        let Some(year) = deal.year else { continue };
        if year < first_year || year > last_year {
            continue;
        }
        let Some(category) = category_of(deal) else { continue };
        let Some(cell) = rows[row_index(year)].cells.get_mut(&category) else {
            // Outside the requested category universe.
            continue;
        };
        cell.count += 1;
        cell.volume += deal.amount.unwrap_or(0.0);
    }

    for deal in total_basis {
        let Some(year) = deal.year else { continue };
        if year < first_year || year > last_year {
            continue;
        }
        let row = &mut rows[row_index(year)];
        row.total_count += 1;
        row.total_volume += deal.amount.unwrap_or(0.0);
    }

    for row in &mut rows {
        for cell in row.cells.values_mut() {
            cell.volume = round1(cell.volume);
        }
        row.total_volume = round1(row.total_volume);
    }

    AggregatedSeries { rows, categories }
}

/// Extractor for one of the chart dimensions.
pub fn dimension_extractor(dimension: Dimension) -> impl Fn(&NormalizedDeal) -> Option<String> {
    move |deal: &NormalizedDeal| match dimension {
        Dimension::Industry => deal.industry.clone(),
        Dimension::Canton => deal.canton.map(|c| c.name().to_string()),
        Dimension::Phase => deal.phase.clone(),
        Dimension::Gender => deal.gender.clone(),
    }
}

/// Rows with leading all-zero years trimmed.
///
/// A presentation choice for the initial compact view; the underlying series
/// is borrowed, never mutated.
pub fn trim_leading_zero_rows(rows: &[YearRow]) -> &[YearRow] {
    let first_active = rows
        .iter()
        .position(|row| {
            row.total_count > 0
                || row.total_volume > 0.0
                || row.cells.values().any(|c| c.count > 0 || c.volume > 0.0)
        })
        .unwrap_or(rows.len());
    &rows[first_active..]
}

/// Identifier-safe key for the flat serialization boundary.
///
/// Whitespace and non-word characters collapse to `_`. Category labels that
/// collide post-sanitization are a data-quality fault this does not resolve;
/// the in-memory rows are keyed by the original names and cannot collide.
pub fn sanitize_key(category: &str) -> String {
    category
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
        .collect()
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn year_span(
    deals: &[NormalizedDeal],
    total_basis: &[NormalizedDeal],
    requested: Option<(i32, i32)>,
) -> Option<(i32, i32)> {
    let observed = deals
        .iter()
        .chain(total_basis.iter())
        .filter_map(|d| d.year);

    let mut first = i32::MAX;
    let mut last = i32::MIN;
    for year in observed {
        first = first.min(year);
        last = last.max(year);
    }

    if let Some((req_first, req_last)) = requested {
        if req_first <= req_last {
            first = first.min(req_first);
            last = last.max(req_last);
        }
    }

    (first <= last).then_some((first, last))
}
