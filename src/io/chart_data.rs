//! Read/write chart-data JSON files.
//!
//! Chart-data JSON is the "portable" representation of one aggregated chart:
//! the dimension/metric it was built for, the ordered category universe, and
//! the year rows. It is enough to re-render the expanded view of a chart
//! without the raw dataset.
//!
//! The schema is defined by `domain::ChartDataFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::{AggregatedSeries, ChartDataFile, Dimension, Metric};
use crate::error::AppError;

/// Write a chart-data JSON file.
pub fn write_chart_json(
    path: &Path,
    series: &AggregatedSeries,
    dimension: Dimension,
    metric: Metric,
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::runtime(format!("Failed to create chart JSON '{}': {e}", path.display()))
    })?;

    let data = ChartDataFile {
        tool: "vcp".to_string(),
        dimension,
        metric,
        categories: series.categories.clone(),
        rows: series.rows.clone(),
    };

    serde_json::to_writer_pretty(file, &data)
        .map_err(|e| AppError::runtime(format!("Failed to write chart JSON: {e}")))
}

/// Read a chart-data JSON file.
pub fn read_chart_json(path: &Path) -> Result<ChartDataFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::usage(format!("Failed to open chart JSON '{}': {e}", path.display()))
    })?;
    serde_json::from_reader(file)
        .map_err(|e| AppError::usage(format!("Invalid chart JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::domain::{CategoryCell, YearRow};

    #[test]
    fn chart_data_round_trips_through_json() {
        let data = ChartDataFile {
            tool: "vcp".to_string(),
            dimension: Dimension::Industry,
            metric: Metric::Volume,
            categories: vec!["Biotech".to_string()],
            rows: vec![YearRow {
                year: 2021,
                cells: BTreeMap::from([(
                    "Biotech".to_string(),
                    CategoryCell { count: 3, volume: 12.5 },
                )]),
                total_count: 5,
                total_volume: 20.0,
            }],
        };

        let text = serde_json::to_string(&data).unwrap();
        let back: ChartDataFile = serde_json::from_str(&text).unwrap();
        assert_eq!(back.rows, data.rows);
        assert_eq!(back.categories, data.categories);
        assert_eq!(back.dimension, Dimension::Industry);
    }

    #[test]
    fn category_names_stay_unsanitized_in_json() {
        let data = ChartDataFile {
            tool: "vcp".to_string(),
            dimension: Dimension::Industry,
            metric: Metric::Count,
            categories: vec!["Micro / Nano".to_string()],
            rows: Vec::new(),
        };
        let text = serde_json::to_string(&data).unwrap();
        assert!(text.contains("Micro / Nano"));
    }
}
