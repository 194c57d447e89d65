//! Export aggregated year rows to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts, so it is the one place where the flat wire format lives: each
//! category becomes a sanitized `<key>__count`/`<key>__volume` column pair,
//! with the grand totals at the end. Quoting of embedded commas/quotes/
//! newlines is handled by the CSV writer.

use std::path::Path;

use crate::agg::sanitize_key;
use crate::domain::AggregatedSeries;
use crate::error::AppError;

/// Write year rows to a CSV file.
pub fn write_rows_csv(path: &Path, series: &AggregatedSeries) -> Result<(), AppError> {
    let text = rows_to_csv(series)?;
    std::fs::write(path, text)
        .map_err(|e| AppError::runtime(format!("Failed to write export CSV '{}': {e}", path.display())))
}

/// Render year rows as CSV text.
pub fn rows_to_csv(series: &AggregatedSeries) -> Result<String, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["year".to_string()];
    for category in &series.categories {
        let key = sanitize_key(category);
        header.push(format!("{key}__count"));
        header.push(format!("{key}__volume"));
    }
    header.push("total_count".to_string());
    header.push("total_volume".to_string());
    writer
        .write_record(&header)
        .map_err(|e| AppError::runtime(format!("Failed to write CSV header: {e}")))?;

    for row in &series.rows {
        let mut record = vec![row.year.to_string()];
        for category in &series.categories {
            let cell = row.cell(category);
            record.push(cell.count.to_string());
            record.push(format!("{:.1}", cell.volume));
        }
        record.push(row.total_count.to_string());
        record.push(format!("{:.1}", row.total_volume));
        writer
            .write_record(&record)
            .map_err(|e| AppError::runtime(format!("Failed to write CSV row: {e}")))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::runtime(format!("Failed to finish CSV export: {e}")))?;
    String::from_utf8(bytes).map_err(|e| AppError::runtime(format!("CSV export is not UTF-8: {e}")))
}
