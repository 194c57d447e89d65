//! Reporting utilities: category rankings and formatted terminal output.

use crate::domain::AggregatedSeries;

pub mod format;

pub use format::*;

/// Dataset-wide totals for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub name: String,
    pub count: u64,
    pub volume: f64,
}

/// Top-N categories by volume and by count.
#[derive(Debug, Clone)]
pub struct Rankings {
    pub by_volume: Vec<CategoryTotal>,
    pub by_count: Vec<CategoryTotal>,
}

/// Rank categories across all years of a series.
pub fn rank_categories(series: &AggregatedSeries, top_n: usize) -> Rankings {
    let mut totals: Vec<CategoryTotal> = series
        .categories
        .iter()
        .map(|category| {
            let (count, volume) = series.rows.iter().fold((0u64, 0.0f64), |(c, v), row| {
                let cell = row.cell(category);
                (c + cell.count, v + cell.volume)
            });
            CategoryTotal {
                name: category.clone(),
                count,
                volume: (volume * 10.0).round() / 10.0,
            }
        })
        .collect();

    let mut by_volume = totals.clone();
    by_volume.sort_by(|a, b| {
        b.volume
            .partial_cmp(&a.volume)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    by_volume.truncate(top_n);

    totals.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    totals.truncate(top_n);

    Rankings {
        by_volume,
        by_count: totals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::domain::{CategoryCell, YearRow};

    #[test]
    fn rankings_sum_across_years_and_sort_descending() {
        let series = AggregatedSeries {
            categories: vec!["A".to_string(), "B".to_string()],
            rows: vec![
                YearRow {
                    year: 2020,
                    cells: BTreeMap::from([
                        ("A".to_string(), CategoryCell { count: 1, volume: 10.0 }),
                        ("B".to_string(), CategoryCell { count: 5, volume: 2.0 }),
                    ]),
                    total_count: 6,
                    total_volume: 12.0,
                },
                YearRow {
                    year: 2021,
                    cells: BTreeMap::from([
                        ("A".to_string(), CategoryCell { count: 1, volume: 8.0 }),
                        ("B".to_string(), CategoryCell { count: 4, volume: 1.0 }),
                    ]),
                    total_count: 5,
                    total_volume: 9.0,
                },
            ],
        };

        let rankings = rank_categories(&series, 2);
        assert_eq!(rankings.by_volume[0].name, "A");
        assert_eq!(rankings.by_volume[0].volume, 18.0);
        assert_eq!(rankings.by_count[0].name, "B");
        assert_eq!(rankings.by_count[0].count, 9);
    }

    #[test]
    fn top_n_truncates_and_ties_break_alphabetically() {
        let series = AggregatedSeries {
            categories: vec!["Zeta".to_string(), "Alpha".to_string(), "Mid".to_string()],
            rows: vec![YearRow {
                year: 2020,
                cells: BTreeMap::from([
                    ("Zeta".to_string(), CategoryCell { count: 2, volume: 5.0 }),
                    ("Alpha".to_string(), CategoryCell { count: 2, volume: 5.0 }),
                    ("Mid".to_string(), CategoryCell { count: 1, volume: 1.0 }),
                ]),
                total_count: 5,
                total_volume: 11.0,
            }],
        };

        let rankings = rank_categories(&series, 2);
        assert_eq!(rankings.by_volume.len(), 2);
        assert_eq!(rankings.by_volume[0].name, "Alpha");
        assert_eq!(rankings.by_volume[1].name, "Zeta");
    }
}
