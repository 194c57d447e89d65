//! Print-ready HTML table export.
//!
//! The source system's "PDF export" opens an HTML table in a browsing context
//! and prints it; the artifact this module writes is that table as a
//! standalone document. Rasterizing to PDF stays outside this tool.

use std::path::Path;

use crate::domain::{AggregatedSeries, Dimension, Metric};
use crate::error::AppError;

const STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", Roboto, sans-serif; margin: 2rem; color: #1a2330; }
h1 { font-size: 1.3rem; margin-bottom: 0.2rem; }
p.meta { color: #5b6678; margin-top: 0; }
table { border-collapse: collapse; width: 100%; font-size: 0.85rem; }
th, td { border: 1px solid #d4dae3; padding: 4px 8px; text-align: right; }
th:first-child, td:first-child { text-align: left; }
thead th { background: #eef1f6; }
tbody tr:nth-child(even) { background: #f7f9fc; }
@media print { body { margin: 0; } }
"#;

/// Write the aggregated table as a standalone, printable HTML document.
pub fn write_html_report(
    path: &Path,
    series: &AggregatedSeries,
    dimension: Dimension,
    metric: Metric,
) -> Result<(), AppError> {
    let html = build_html(series, dimension, metric);
    std::fs::write(path, html).map_err(|e| {
        AppError::runtime(format!("Failed to write HTML report '{}': {e}", path.display()))
    })
}

/// Render the document text.
pub fn build_html(series: &AggregatedSeries, dimension: Dimension, metric: Metric) -> String {
    let title = format!("Swiss VC deals by {}", dimension.display_name());

    let mut out = String::new();
    out.push_str("<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{}</title>\n", escape(&title)));
    out.push_str(&format!("<style>{STYLE}</style>\n</head>\n<body>\n"));
    out.push_str(&format!("<h1>{}</h1>\n", escape(&title)));
    out.push_str(&format!(
        "<p class=\"meta\">{} per year, {}</p>\n",
        metric_label(metric),
        match series.year_span() {
            Some((first, last)) => format!("{first}–{last}"),
            None => "no data".to_string(),
        }
    ));

    out.push_str("<table>\n<thead>\n<tr><th>Year</th>");
    for category in &series.categories {
        out.push_str(&format!("<th>{}</th>", escape(category)));
    }
    out.push_str("<th>Total</th></tr>\n</thead>\n<tbody>\n");

    for row in &series.rows {
        out.push_str(&format!("<tr><td>{}</td>", row.year));
        for category in &series.categories {
            out.push_str(&format!("<td>{}</td>", format_value(row.value_of(category, metric), metric)));
        }
        out.push_str(&format!(
            "<td>{}</td></tr>\n",
            format_value(row.total_of(metric), metric)
        ));
    }

    out.push_str("</tbody>\n</table>\n</body>\n</html>\n");
    out
}

fn metric_label(metric: Metric) -> &'static str {
    match metric {
        Metric::Count => "Number of financing rounds",
        Metric::Volume => "Invested capital (CHF m)",
    }
}

fn format_value(value: f64, metric: Metric) -> String {
    match metric {
        Metric::Count => format!("{}", value as u64),
        Metric::Volume => format!("{value:.1}"),
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
