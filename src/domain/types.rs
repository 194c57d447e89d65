//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during aggregation
//! - exported to JSON/CSV
//! - reloaded later for plotting or comparisons

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// The grouping dimension for a chart.
///
/// Each dimension maps a deal to at most one category; deals without a value
/// for the active dimension are excluded from the per-category breakdown but
/// still count toward grand totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Industry,
    Canton,
    Phase,
    Gender,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Industry,
        Dimension::Canton,
        Dimension::Phase,
        Dimension::Gender,
    ];

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            Dimension::Industry => "Industry",
            Dimension::Canton => "Canton",
            Dimension::Phase => "Phase",
            Dimension::Gender => "Gender (CEO)",
        }
    }

    /// Next dimension in cycling order (for the TUI).
    pub fn next(self) -> Dimension {
        match self {
            Dimension::Industry => Dimension::Canton,
            Dimension::Canton => Dimension::Phase,
            Dimension::Phase => Dimension::Gender,
            Dimension::Gender => Dimension::Industry,
        }
    }
}

// Display uses the CLI value names so clap can render flag defaults.
impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Dimension::Industry => "industry",
            Dimension::Canton => "canton",
            Dimension::Phase => "phase",
            Dimension::Gender => "gender",
        })
    }
}

/// Which per-category value a chart displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Number of deals.
    Count,
    /// Invested volume in CHF millions.
    Volume,
}

impl Metric {
    /// Tick step for the axis calculator.
    ///
    /// Steps are fixed per metric so gridlines land on human-readable values
    /// (multiples of 50 deals, multiples of CHF 500m).
    pub fn tick_step(self) -> f64 {
        match self {
            Metric::Count => 50.0,
            Metric::Volume => 500.0,
        }
    }

    pub fn unit_label(self) -> &'static str {
        match self {
            Metric::Count => "deals",
            Metric::Volume => "CHF m",
        }
    }

    pub fn toggle(self) -> Metric {
        match self {
            Metric::Count => Metric::Volume,
            Metric::Volume => Metric::Count,
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Metric::Count => "count",
            Metric::Volume => "volume",
        })
    }
}

/// How category series are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChartMode {
    /// Each category is an independent overlaid series.
    Line,
    /// Category series are stacked on top of one another per year.
    Column,
}

impl ChartMode {
    pub fn display_name(self) -> &'static str {
        match self {
            ChartMode::Line => "line",
            ChartMode::Column => "stacked column",
        }
    }

    pub fn toggle(self) -> ChartMode {
        match self {
            ChartMode::Line => ChartMode::Column,
            ChartMode::Column => ChartMode::Line,
        }
    }
}

impl std::fmt::Display for ChartMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ChartMode::Line => "line",
            ChartMode::Column => "column",
        })
    }
}

/// The 26 official Swiss cantons.
///
/// Free-text canton values resolve to this enumeration (or to nothing) during
/// ingest; a deal is never silently coerced to a real canton. Display strings
/// use the common English/official spellings found in the source data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Canton {
    Aargau,
    AppenzellAusserrhoden,
    AppenzellInnerrhoden,
    BaselLandschaft,
    BaselStadt,
    Bern,
    Fribourg,
    Geneva,
    Glarus,
    Graubuenden,
    Jura,
    Lucerne,
    Neuchatel,
    Nidwalden,
    Obwalden,
    Schaffhausen,
    Schwyz,
    Solothurn,
    StGallen,
    Thurgau,
    Ticino,
    Uri,
    Valais,
    Vaud,
    Zug,
    Zurich,
}

impl Canton {
    pub const ALL: [Canton; 26] = [
        Canton::Aargau,
        Canton::AppenzellAusserrhoden,
        Canton::AppenzellInnerrhoden,
        Canton::BaselLandschaft,
        Canton::BaselStadt,
        Canton::Bern,
        Canton::Fribourg,
        Canton::Geneva,
        Canton::Glarus,
        Canton::Graubuenden,
        Canton::Jura,
        Canton::Lucerne,
        Canton::Neuchatel,
        Canton::Nidwalden,
        Canton::Obwalden,
        Canton::Schaffhausen,
        Canton::Schwyz,
        Canton::Solothurn,
        Canton::StGallen,
        Canton::Thurgau,
        Canton::Ticino,
        Canton::Uri,
        Canton::Valais,
        Canton::Vaud,
        Canton::Zug,
        Canton::Zurich,
    ];

    /// Canonical display name.
    pub fn name(self) -> &'static str {
        match self {
            Canton::Aargau => "Aargau",
            Canton::AppenzellAusserrhoden => "Appenzell Ausserrhoden",
            Canton::AppenzellInnerrhoden => "Appenzell Innerrhoden",
            Canton::BaselLandschaft => "Basel-Landschaft",
            Canton::BaselStadt => "Basel-Stadt",
            Canton::Bern => "Bern",
            Canton::Fribourg => "Fribourg",
            Canton::Geneva => "Geneva",
            Canton::Glarus => "Glarus",
            Canton::Graubuenden => "Graubünden",
            Canton::Jura => "Jura",
            Canton::Lucerne => "Lucerne",
            Canton::Neuchatel => "Neuchâtel",
            Canton::Nidwalden => "Nidwalden",
            Canton::Obwalden => "Obwalden",
            Canton::Schaffhausen => "Schaffhausen",
            Canton::Schwyz => "Schwyz",
            Canton::Solothurn => "Solothurn",
            Canton::StGallen => "St. Gallen",
            Canton::Thurgau => "Thurgau",
            Canton::Ticino => "Ticino",
            Canton::Uri => "Uri",
            Canton::Valais => "Valais",
            Canton::Vaud => "Vaud",
            Canton::Zug => "Zug",
            Canton::Zurich => "Zürich",
        }
    }

    /// Two-letter official abbreviation.
    pub fn code(self) -> &'static str {
        match self {
            Canton::Aargau => "AG",
            Canton::AppenzellAusserrhoden => "AR",
            Canton::AppenzellInnerrhoden => "AI",
            Canton::BaselLandschaft => "BL",
            Canton::BaselStadt => "BS",
            Canton::Bern => "BE",
            Canton::Fribourg => "FR",
            Canton::Geneva => "GE",
            Canton::Glarus => "GL",
            Canton::Graubuenden => "GR",
            Canton::Jura => "JU",
            Canton::Lucerne => "LU",
            Canton::Neuchatel => "NE",
            Canton::Nidwalden => "NW",
            Canton::Obwalden => "OW",
            Canton::Schaffhausen => "SH",
            Canton::Schwyz => "SZ",
            Canton::Solothurn => "SO",
            Canton::StGallen => "SG",
            Canton::Thurgau => "TG",
            Canton::Ticino => "TI",
            Canton::Uri => "UR",
            Canton::Valais => "VS",
            Canton::Vaud => "VD",
            Canton::Zug => "ZG",
            Canton::Zurich => "ZH",
        }
    }

    /// Match an official name or two-letter code, case-insensitively.
    ///
    /// Alias/city-name resolution lives in the ingest layer; this only accepts
    /// values that already are canonical.
    pub fn from_official(raw: &str) -> Option<Canton> {
        let trimmed = raw.trim();
        Canton::ALL.iter().copied().find(|c| {
            c.name().eq_ignore_ascii_case(trimmed) || c.code().eq_ignore_ascii_case(trimmed)
        })
    }
}

impl std::fmt::Display for Canton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A normalized funding-round record.
///
/// Produced once by the ingest layer and treated as immutable afterwards.
/// `None` fields are degraded values (unparseable date, unresolvable canton,
/// unmatched company), never errors.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedDeal {
    pub company: String,
    /// Calendar year of the funding round, if the date parsed.
    pub year: Option<i32>,
    /// Quarter 1..=4, derived together with `year`.
    pub quarter: Option<u8>,
    /// Deal size in CHF millions.
    pub amount: Option<f64>,
    pub canton: Option<Canton>,
    /// Resolved via the company index; `None` when the company is unmapped.
    pub industry: Option<String>,
    pub phase: Option<String>,
    /// CEO gender as recorded in the source data.
    pub gender: Option<String>,
}

/// Per-category value pair inside a [`YearRow`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryCell {
    pub count: u64,
    /// CHF millions, rounded to 1 decimal.
    pub volume: f64,
}

/// One aggregated record per calendar year.
///
/// `cells` is keyed by the original category name; identifier-safe sanitized
/// keys exist only at the flat CSV boundary. The `total_*` fields are computed
/// from the grand-total basis and therefore may exceed the sum of `cells` when
/// the caller aggregates a category subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRow {
    pub year: i32,
    pub cells: BTreeMap<String, CategoryCell>,
    pub total_count: u64,
    pub total_volume: f64,
}

impl YearRow {
    /// Cell for a category, defaulting to zeros for absent categories.
    pub fn cell(&self, category: &str) -> CategoryCell {
        self.cells.get(category).copied().unwrap_or_default()
    }

    /// Metric value for one category.
    pub fn value_of(&self, category: &str, metric: Metric) -> f64 {
        let cell = self.cell(category);
        match metric {
            Metric::Count => cell.count as f64,
            Metric::Volume => cell.volume,
        }
    }

    /// Grand-total metric value.
    pub fn total_of(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Count => self.total_count as f64,
            Metric::Volume => self.total_volume,
        }
    }

    /// Sum of the given categories' metric values (the stacked height).
    pub fn stacked_of(&self, categories: &[String], metric: Metric) -> f64 {
        categories.iter().map(|c| self.value_of(c, metric)).sum()
    }
}

/// Aggregation output: year rows plus the ordered category universe.
///
/// Rows, categories, and a color function are the complete renderer contract;
/// a rendering backend never needs to know how the categories were derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedSeries {
    pub rows: Vec<YearRow>,
    pub categories: Vec<String>,
}

impl AggregatedSeries {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Inclusive `(first, last)` year of the row range.
    pub fn year_span(&self) -> Option<(i32, i32)> {
        match (self.rows.first(), self.rows.last()) {
            (Some(first), Some(last)) => Some((first.year, last.year)),
            _ => None,
        }
    }
}

/// Display-side filters.
///
/// The year range narrows both the display and the grand-total basis (it moves
/// the x-axis); the per-dimension include lists narrow only the display basis,
/// which is what keeps the total line still while categories are toggled.
#[derive(Debug, Clone, Default)]
pub struct DealFilter {
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
    pub industries: Vec<String>,
    pub cantons: Vec<Canton>,
    pub phases: Vec<String>,
    pub genders: Vec<String>,
}

impl DealFilter {
    /// Year-range check only (the grand-total basis).
    pub fn matches_year(&self, deal: &NormalizedDeal) -> bool {
        match deal.year {
            // Year-less deals survive here; year-bucketed views drop them later.
            None => true,
            Some(year) => {
                self.year_min.is_none_or(|min| year >= min)
                    && self.year_max.is_none_or(|max| year <= max)
            }
        }
    }

    /// Full check (the display basis).
    pub fn matches(&self, deal: &NormalizedDeal) -> bool {
        self.matches_year(deal)
            && matches_any(deal.industry.as_deref(), &self.industries)
            && (self.cantons.is_empty()
                || deal.canton.map(|c| self.cantons.contains(&c)).unwrap_or(false))
            && matches_any(deal.phase.as_deref(), &self.phases)
            && matches_any(deal.gender.as_deref(), &self.genders)
    }
}

/// Case-insensitive membership; an empty include list accepts everything.
fn matches_any(value: Option<&str>, include: &[String]) -> bool {
    if include.is_empty() {
        return true;
    }
    let Some(value) = value else { return false };
    include
        .iter()
        .any(|candidate| candidate.trim().eq_ignore_ascii_case(value.trim()))
}

/// Where the raw dataset comes from.
#[derive(Debug, Clone)]
pub enum DataSource {
    Path(PathBuf),
    Url(String),
    /// Deterministic synthetic dataset (demo/test data).
    Sample { seed: u64, deals: usize },
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub source: DataSource,
    pub dimension: Dimension,
    pub metric: Metric,
    pub mode: ChartMode,
    /// Overlay the grand-total series in line mode.
    pub show_total: bool,
    pub filter: DealFilter,
    /// Restrict the category universe to an explicit list (empty = all).
    pub categories: Vec<String>,
    pub top_n: usize,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub export_csv: Option<PathBuf>,
    pub export_chart: Option<PathBuf>,
    pub export_html: Option<PathBuf>,
}

/// A saved chart-data file (JSON).
///
/// The portable representation of one aggregated chart: enough to re-render
/// the expanded view without the raw dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartDataFile {
    pub tool: String,
    pub dimension: Dimension,
    pub metric: Metric,
    pub categories: Vec<String>,
    pub rows: Vec<YearRow>,
}
