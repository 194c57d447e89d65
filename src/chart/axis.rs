//! Axis domain and tick computation.
//!
//! The relevant maximum depends on the chart mode:
//!
//! - `column` (stacked): the tallest stacked total across years — using a
//!   per-category maximum here would silently clip bars
//! - `line`: the largest single-category value, plus the grand-total series
//!   when it is shown
//!
//! Ticks are multiples of a fixed per-metric step so gridlines stay
//! human-readable, and the domain carries a small headroom so the topmost
//! point never sits flush against the plot edge.
//!
//! These are pure functions; callers that want to skip redundant recomputation
//! memoize on the `(rows, categories, metric, mode, show_total)` tuple. Line
//! and column domains are not comparable and must never share a cache entry.

use crate::domain::{ChartMode, Metric, YearRow};

/// Fractional headroom added above the rounded maximum.
const HEADROOM: f64 = 0.04;

/// Computed y-axis description: tick values plus the `[0, max]` domain bound.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisDomain {
    /// Every multiple of the metric step from 0 up to the rounded maximum.
    pub ticks: Vec<f64>,
    /// Domain upper bound (last tick plus headroom).
    pub max: f64,
}

impl AxisDomain {
    /// Last tick value (the rounded data maximum).
    pub fn top_tick(&self) -> f64 {
        self.ticks.last().copied().unwrap_or(0.0)
    }
}

/// Compute the y-axis domain and ticks for a chart.
///
/// Empty input is not an error: an all-zero or empty row set yields a single
/// step (`ticks == [0, step]`) so a renderer always has a usable scale.
pub fn axis_domain(
    rows: &[YearRow],
    categories: &[String],
    metric: Metric,
    mode: ChartMode,
    show_total: bool,
) -> AxisDomain {
    let max = data_max(rows, categories, metric, mode, show_total);
    let step = metric.tick_step();

    let intervals = if max <= 0.0 {
        1
    } else {
        (max / step).ceil() as usize
    };
    let intervals = intervals.max(1);

    let ticks: Vec<f64> = (0..=intervals).map(|i| step * i as f64).collect();
    let top = step * intervals as f64;

    AxisDomain {
        ticks,
        max: top * (1.0 + HEADROOM),
    }
}

/// The true data maximum the domain must cover.
fn data_max(
    rows: &[YearRow],
    categories: &[String],
    metric: Metric,
    mode: ChartMode,
    show_total: bool,
) -> f64 {
    let mut max = 0.0_f64;
    for row in rows {
        let candidate = match mode {
            ChartMode::Column => row.stacked_of(categories, metric),
            ChartMode::Line => categories
                .iter()
                .map(|c| row.value_of(c, metric))
                .fold(0.0, f64::max),
        };
        max = max.max(candidate);
        if show_total {
            max = max.max(row.total_of(metric));
        }
    }
    max
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::domain::CategoryCell;

    fn row(year: i32, cells: &[(&str, u64, f64)], total_count: u64, total_volume: f64) -> YearRow {
        YearRow {
            year,
            cells: cells
                .iter()
                .map(|&(name, count, volume)| (name.to_string(), CategoryCell { count, volume }))
                .collect::<BTreeMap<_, _>>(),
            total_count,
            total_volume,
        }
    }

    fn cats(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn ticks_are_step_multiples_and_cover_the_maximum() {
        let rows = vec![row(2020, &[("A", 120, 760.0), ("B", 30, 410.0)], 150, 1170.0)];
        let categories = cats(&["A", "B"]);

        let axis = axis_domain(&rows, &categories, Metric::Volume, ChartMode::Column, false);
        for tick in &axis.ticks {
            assert!((tick % 500.0).abs() < 1e-9, "tick {tick} not aligned");
        }
        // Stacked maximum is 1170 -> rounded to 1500.
        assert_eq!(axis.top_tick(), 1500.0);
        assert!(axis.top_tick() >= 1170.0);
        assert!((axis.max - 1500.0 * 1.04).abs() < 1e-9);
    }

    #[test]
    fn column_domain_dominates_line_domain() {
        let rows = vec![
            row(2020, &[("A", 40, 600.0), ("B", 20, 450.0)], 60, 1050.0),
            row(2021, &[("A", 10, 200.0), ("B", 55, 900.0)], 65, 1100.0),
        ];
        let categories = cats(&["A", "B"]);

        let line = axis_domain(&rows, &categories, Metric::Volume, ChartMode::Line, false);
        let column = axis_domain(&rows, &categories, Metric::Volume, ChartMode::Column, false);
        assert!(column.max >= line.max);
        assert!(column.top_tick() >= line.top_tick());
    }

    #[test]
    fn line_mode_considers_the_total_series_when_shown() {
        // Totals come from a wider basis than the single visible category.
        let rows = vec![row(2020, &[("A", 10, 90.0)], 80, 980.0)];
        let categories = cats(&["A"]);

        let without = axis_domain(&rows, &categories, Metric::Volume, ChartMode::Line, false);
        let with = axis_domain(&rows, &categories, Metric::Volume, ChartMode::Line, true);
        assert_eq!(without.top_tick(), 500.0);
        assert_eq!(with.top_tick(), 1000.0);
    }

    #[test]
    fn count_metric_uses_the_count_step() {
        let rows = vec![row(2020, &[("A", 73, 0.0)], 73, 0.0)];
        let axis = axis_domain(&rows, &cats(&["A"]), Metric::Count, ChartMode::Line, false);
        assert_eq!(axis.ticks, vec![0.0, 50.0, 100.0]);
    }

    #[test]
    fn empty_input_yields_a_single_step() {
        let axis = axis_domain(&[], &cats(&["A"]), Metric::Volume, ChartMode::Column, true);
        assert_eq!(axis.ticks, vec![0.0, 500.0]);
        assert!((axis.max - 520.0).abs() < 1e-9);
    }
}
