//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - category series: one marker glyph per category (`o`, `x`, `+`, ...)
//! - grand-total series: `T` (line mode, when shown)
//! - stacked columns: vertical runs of the category glyphs
//!
//! The y-scale comes from the axis calculator, so the ASCII view and the TUI
//! view of the same chart always agree on the domain.

use crate::chart::axis_domain;
use crate::domain::{AggregatedSeries, ChartMode, Metric, YearRow};

/// Marker glyphs, assigned per category in universe order.
pub const MARKERS: [char; 10] = ['o', 'x', '+', '*', '#', '%', '@', '&', '=', '~'];

/// Marker for the grand-total series.
pub const TOTAL_MARKER: char = 'T';

/// Render an aggregated series as a fixed-size text chart with a legend.
pub fn render_ascii_chart(
    series: &AggregatedSeries,
    metric: Metric,
    mode: ChartMode,
    show_total: bool,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let rows = &series.rows;
    let axis = axis_domain(rows, &series.categories, metric, mode, show_total);
    let y_max = axis.max;

    let mut grid = vec![vec![' '; width]; height];

    match mode {
        ChartMode::Line => draw_lines(&mut grid, series, metric, show_total, y_max),
        ChartMode::Column => draw_columns(&mut grid, series, metric, y_max),
    }

    // Header with ranges, then the grid, then the legend.
    let mut out = String::new();
    let (first_year, last_year) = series.year_span().unwrap_or((0, 0));
    out.push_str(&format!(
        "Chart: years=[{first_year}, {last_year}] | {metric}=[0, {y_max:.1}] {}\n",
        metric.unit_label(),
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    for (i, category) in series.categories.iter().enumerate() {
        out.push_str(&format!("{} {category}\n", marker_for(i)));
    }
    if show_total && mode == ChartMode::Line {
        out.push_str(&format!("{TOTAL_MARKER} Total\n"));
    }

    out
}

/// Marker glyph for the category at `index` in universe order.
pub fn marker_for(index: usize) -> char {
    MARKERS[index % MARKERS.len()]
}

fn draw_lines(
    grid: &mut [Vec<char>],
    series: &AggregatedSeries,
    metric: Metric,
    show_total: bool,
    y_max: f64,
) {
    let height = grid.len();
    let width = grid[0].len();
    let n_years = series.rows.len();

    for (ci, category) in series.categories.iter().enumerate() {
        draw_polyline(
            grid,
            &series.rows,
            |row| row.value_of(category, metric),
            marker_for(ci),
            n_years,
            width,
            height,
            y_max,
        );
    }

    if show_total {
        draw_polyline(
            grid,
            &series.rows,
            |row| row.total_of(metric),
            TOTAL_MARKER,
            n_years,
            width,
            height,
            y_max,
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_polyline(
    grid: &mut [Vec<char>],
    rows: &[YearRow],
    value_of: impl Fn(&YearRow) -> f64,
    marker: char,
    n_years: usize,
    width: usize,
    height: usize,
    y_max: f64,
) {
    let mut prev: Option<(usize, usize)> = None;
    for (i, row) in rows.iter().enumerate() {
        let x = map_x(i, n_years, width);
        let y = map_y(value_of(row), y_max, height);
        match prev {
            Some((x0, y0)) => draw_line(grid, x0, y0, x, y, marker),
            None => {
                if grid[y][x] == ' ' {
                    grid[y][x] = marker;
                }
            }
        }
        prev = Some((x, y));
    }
}

fn draw_columns(grid: &mut [Vec<char>], series: &AggregatedSeries, metric: Metric, y_max: f64) {
    let height = grid.len();
    let width = grid[0].len();
    let n_years = series.rows.len();

    for (i, row) in series.rows.iter().enumerate() {
        let x = map_x(i, n_years, width);
        let mut cumulative = 0.0;
        for (ci, category) in series.categories.iter().enumerate() {
            let value = row.value_of(category, metric);
            if value <= 0.0 {
                continue;
            }
            let bottom = map_y(cumulative, y_max, height);
            cumulative += value;
            let top = map_y(cumulative, y_max, height);
            for y in top..=bottom {
                grid[y][x] = marker_for(ci);
            }
        }
    }
}

fn map_x(index: usize, n: usize, width: usize) -> usize {
    if n <= 1 {
        return width / 2;
    }
    index * (width - 1) / (n - 1)
}

fn map_y(value: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = if y_max > 0.0 {
        (value / y_max).clamp(0.0, 1.0)
    } else {
        0.0
    };
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish); writes blank cells only, so earlier
/// series keep visual precedence.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::domain::CategoryCell;

    fn series_one_category(values: &[(i32, u64)]) -> AggregatedSeries {
        AggregatedSeries {
            categories: vec!["A".to_string()],
            rows: values
                .iter()
                .map(|&(year, count)| YearRow {
                    year,
                    cells: BTreeMap::from([(
                        "A".to_string(),
                        CategoryCell { count, volume: 0.0 },
                    )]),
                    total_count: count,
                    total_volume: 0.0,
                })
                .collect(),
        }
    }

    #[test]
    fn line_golden_snapshot_small() {
        let series = series_one_category(&[(2020, 0), (2021, 100)]);
        let txt = render_ascii_chart(&series, Metric::Count, ChartMode::Line, false, 10, 5);
        let expected = concat!(
            "Chart: years=[2020, 2021] | count=[0, 104.0] deals\n",
            "        oo\n",
            "      oo  \n",
            "    oo    \n",
            "  oo      \n",
            "oo        \n",
            "o A\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn column_golden_snapshot_small() {
        let series = AggregatedSeries {
            categories: vec!["A".to_string(), "B".to_string()],
            rows: vec![YearRow {
                year: 2020,
                cells: BTreeMap::from([
                    ("A".to_string(), CategoryCell { count: 40, volume: 0.0 }),
                    ("B".to_string(), CategoryCell { count: 30, volume: 0.0 }),
                ]),
                total_count: 70,
                total_volume: 0.0,
            }],
        };

        let txt = render_ascii_chart(&series, Metric::Count, ChartMode::Column, false, 10, 5);
        let expected = concat!(
            "Chart: years=[2020, 2020] | count=[0, 104.0] deals\n",
            "          \n",
            "     x    \n",
            "     x    \n",
            "     o    \n",
            "     o    \n",
            "o A\n",
            "x B\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn total_series_appears_in_line_mode_legend_only_when_shown() {
        let series = series_one_category(&[(2020, 10), (2021, 20)]);
        let with = render_ascii_chart(&series, Metric::Count, ChartMode::Line, true, 20, 6);
        let without = render_ascii_chart(&series, Metric::Count, ChartMode::Line, false, 20, 6);
        assert!(with.contains("T Total"));
        assert!(!without.contains("T Total"));
    }

    #[test]
    fn empty_series_still_renders_a_frame() {
        let empty = AggregatedSeries {
            categories: Vec::new(),
            rows: Vec::new(),
        };
        let txt = render_ascii_chart(&empty, Metric::Volume, ChartMode::Column, false, 10, 5);
        assert!(txt.starts_with("Chart: years=[0, 0] | volume=[0, 520.0] CHF m\n"));
        assert_eq!(txt.lines().count(), 6);
    }
}
