//! Command-line parsing for the VC deal report tool.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the aggregation/chart code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{ChartMode, Dimension, Metric};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "vcp", version, about = "Swiss startup & VC deal analytics (terminal)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load a dataset, print the summary/table/chart, and optionally export.
    Report(ReportArgs),
    /// Print top-category rankings only (useful for scripting).
    Top(ReportArgs),
    /// Re-render a previously exported chart-data JSON.
    Plot(PlotArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying pipeline as `vcp report`, but renders the
    /// charts in a terminal UI using Ratatui.
    Tui(ReportArgs),
}

/// Common options for reporting and ranking.
#[derive(Debug, Parser, Clone)]
pub struct ReportArgs {
    /// Dataset JSON: a file path or an http(s) URL.
    ///
    /// Falls back to $VC_PULSE_DATA (also read from `.env`), then to the
    /// built-in synthetic sample.
    #[arg(short = 'f', long)]
    pub data: Option<String>,

    /// Force the built-in synthetic dataset even if $VC_PULSE_DATA is set.
    #[arg(long)]
    pub sample: bool,

    /// Seed for the synthetic dataset.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of synthetic deals to generate.
    #[arg(long, default_value_t = 400)]
    pub sample_deals: usize,

    /// Chart dimension.
    #[arg(short = 'd', long, value_enum, default_value_t = Dimension::Industry)]
    pub dimension: Dimension,

    /// Chart metric.
    #[arg(short = 'm', long, value_enum, default_value_t = Metric::Volume)]
    pub metric: Metric,

    /// Chart mode.
    #[arg(long, value_enum, default_value_t = ChartMode::Column)]
    pub mode: ChartMode,

    /// Overlay the grand-total series in line mode (enabled by default).
    #[arg(long, default_value_t = true)]
    pub total: bool,

    /// Hide the grand-total series.
    #[arg(long)]
    pub no_total: bool,

    /// First year to include.
    #[arg(long)]
    pub from: Option<i32>,

    /// Last year to include.
    #[arg(long)]
    pub to: Option<i32>,

    /// Restrict the category universe to these names (repeatable).
    ///
    /// Grand totals still reflect the whole dataset.
    #[arg(long = "category")]
    pub categories: Vec<String>,

    /// Only include deals from these industries (repeatable).
    #[arg(long = "industry")]
    pub industries: Vec<String>,

    /// Only include deals from these cantons (names, codes, or aliases; repeatable).
    #[arg(long = "canton")]
    pub cantons: Vec<String>,

    /// Only include deals in these investment phases (repeatable).
    #[arg(long = "phase")]
    pub phases: Vec<String>,

    /// Only include deals with these CEO genders (repeatable).
    #[arg(long = "gender")]
    pub genders: Vec<String>,

    /// Show top-N categories in the rankings.
    #[arg(long, default_value_t = 5)]
    pub top: usize,

    /// Render an ASCII chart in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal chart.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export the year table to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export chart data (categories + rows) to JSON.
    #[arg(long = "export-chart")]
    pub export_chart: Option<PathBuf>,

    /// Export a print-ready HTML table.
    #[arg(long = "export-html")]
    pub export_html: Option<PathBuf>,
}

/// Options for re-plotting a saved chart.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Chart JSON file produced by `vcp report --export-chart`.
    #[arg(long, value_name = "JSON")]
    pub chart: PathBuf,

    /// Chart mode override.
    #[arg(long, value_enum, default_value_t = ChartMode::Column)]
    pub mode: ChartMode,

    /// Overlay the grand-total series in line mode.
    #[arg(long)]
    pub total: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}
