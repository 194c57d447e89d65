//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the dataset source
//! - runs the normalize/aggregate pipeline
//! - prints reports/charts
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, PlotArgs, ReportArgs};
use crate::domain::{AggregatedSeries, DataSource, DealFilter, ReportConfig};
use crate::error::AppError;
use crate::io::ingest::canton_from_raw;

pub mod pipeline;

/// Entry point for the `vcp` binary.
pub fn run() -> Result<(), AppError> {
    // `vcp` and `vcp -d canton` should behave like `vcp tui ...`, but clap
    // insists on a subcommand name. A small explicit argv rewrite before
    // parsing keeps the clap structure clean.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Report(args) => handle_report(args, OutputMode::Full),
        Command::Top(args) => handle_report(args, OutputMode::RankOnly),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => handle_tui(args),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    RankOnly,
}

fn handle_report(args: ReportArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = report_config_from_args(&args)?;
    let run = pipeline::run_report(&config)?;

    if mode == OutputMode::Full {
        println!(
            "{}",
            crate::report::format_run_summary(&run.ingest, &run.series, &config)
        );
        println!("{}", crate::report::format_year_table(&run.series, config.metric));

        if config.plot {
            let chart = crate::plot::render_ascii_chart(
                &run.series,
                config.metric,
                config.mode,
                config.show_total,
                config.plot_width,
                config.plot_height,
            );
            println!("{chart}");
        }
    }

    println!("{}", crate::report::format_rankings(&run.rankings));

    // Optional exports.
    if let Some(path) = &config.export_csv {
        crate::io::export::write_rows_csv(path, &run.series)?;
    }
    if let Some(path) = &config.export_chart {
        crate::io::chart_data::write_chart_json(path, &run.series, config.dimension, config.metric)?;
    }
    if let Some(path) = &config.export_html {
        crate::io::html::write_html_report(path, &run.series, config.dimension, config.metric)?;
    }

    Ok(())
}

fn handle_tui(args: ReportArgs) -> Result<(), AppError> {
    let config = report_config_from_args(&args)?;
    crate::tui::run(config)
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let chart = crate::io::chart_data::read_chart_json(&args.chart)?;
    let series = AggregatedSeries {
        rows: chart.rows,
        categories: chart.categories,
    };

    let plot = crate::plot::render_ascii_chart(
        &series,
        chart.metric,
        args.mode,
        args.total,
        args.width,
        args.height,
    );
    println!("{plot}");
    Ok(())
}

/// Build the run configuration from CLI flags.
pub fn report_config_from_args(args: &ReportArgs) -> Result<ReportConfig, AppError> {
    let cantons = args
        .cantons
        .iter()
        .map(|raw| {
            canton_from_raw(raw)
                .ok_or_else(|| AppError::usage(format!("Unknown canton '{raw}' in --canton filter.")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if let (Some(from), Some(to)) = (args.from, args.to) {
        if from > to {
            return Err(AppError::usage(format!(
                "Invalid year range: --from {from} is after --to {to}."
            )));
        }
    }

    Ok(ReportConfig {
        source: resolve_source(args),
        dimension: args.dimension,
        metric: args.metric,
        mode: args.mode,
        show_total: args.total && !args.no_total,
        filter: DealFilter {
            year_min: args.from,
            year_max: args.to,
            industries: args.industries.clone(),
            cantons,
            phases: args.phases.clone(),
            genders: args.genders.clone(),
        },
        categories: args.categories.clone(),
        top_n: args.top,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_csv: args.export.clone(),
        export_chart: args.export_chart.clone(),
        export_html: args.export_html.clone(),
    })
}

/// Source resolution order: explicit flag, `--sample`, environment, sample.
fn resolve_source(args: &ReportArgs) -> DataSource {
    if let Some(data) = &args.data {
        return if crate::data::loader::is_url(data) {
            DataSource::Url(data.clone())
        } else {
            DataSource::Path(data.into())
        };
    }
    if args.sample {
        return DataSource::Sample {
            seed: args.seed,
            deals: args.sample_deals,
        };
    }
    crate::data::loader::source_from_env().unwrap_or(DataSource::Sample {
        seed: args.seed,
        deals: args.sample_deals,
    })
}

/// Rewrite argv so `vcp` defaults to `vcp tui`.
///
/// Rules:
/// - `vcp`                     -> `vcp tui`
/// - `vcp -d canton ...`       -> `vcp tui -d canton ...`
/// - `vcp --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "report" | "top" | "plot" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(argv(&["vcp"])), argv(&["vcp", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["vcp", "-d", "canton"])),
            argv(&["vcp", "tui", "-d", "canton"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(argv(&["vcp", "report", "--sample"])),
            argv(&["vcp", "report", "--sample"])
        );
        assert_eq!(rewrite_args(argv(&["vcp", "--help"])), argv(&["vcp", "--help"]));
    }

    #[test]
    fn config_rejects_unknown_canton_filters() {
        let args = ReportArgs::parse_from(["x", "--sample", "--canton", "Atlantis"]);
        let err = report_config_from_args(&args).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_USAGE);
    }

    #[test]
    fn config_accepts_canton_aliases_in_filters() {
        let args = ReportArgs::parse_from(["x", "--sample", "--canton", "Basel-Land"]);
        let config = report_config_from_args(&args).unwrap();
        assert_eq!(config.filter.cantons, vec![crate::domain::Canton::BaselLandschaft]);
    }

    #[test]
    fn config_rejects_inverted_year_ranges() {
        let args = ReportArgs::parse_from(["x", "--sample", "--from", "2022", "--to", "2019"]);
        assert!(report_config_from_args(&args).is_err());
    }

    #[test]
    fn explicit_data_flag_wins_over_sample() {
        let args = ReportArgs::parse_from(["x", "--data", "https://example.org/d.json", "--sample"]);
        let config = report_config_from_args(&args).unwrap();
        assert!(matches!(config.source, DataSource::Url(_)));
    }
}
