//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the cached dataset
//! - runs the view pipeline
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, ExportArgs, PlotArgs, ViewArgs};
use crate::data::{Dataset, cached_dataset, resolve_data_path};
use crate::domain::{Indicator, ViewConfig, YearRange};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `edash` binary.
pub fn run() -> Result<(), AppError> {
    // We want `edash` and `edash --from 2000` to behave like `edash tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Show(args) => handle_show(args),
        Command::Table(args) => handle_table(args),
        Command::Export(args) => handle_export(args),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => handle_tui(args),
    }
}

fn handle_show(args: ViewArgs) -> Result<(), AppError> {
    let dataset = load(&args)?;
    let config = view_config_from_args(&args, dataset);
    let out = pipeline::build_view(dataset, &config);

    println!("{}", crate::report::format_overview(dataset, &out));
    println!(
        "{}",
        crate::plot::render_ascii_chart(&out.chart, args.width, args.height)
    );

    let insights = crate::report::build_insights(&out, config.window);
    if !insights.is_empty() {
        println!("Insights:");
        for line in &insights {
            println!("- {line}");
        }
    }

    if let Some(path) = &args.export_chart {
        crate::io::write_chart_json(path, &out.chart, out.range, config.window)?;
        println!("\nWrote chart JSON: {}", path.display());
    }

    Ok(())
}

fn handle_table(args: ViewArgs) -> Result<(), AppError> {
    let dataset = load(&args)?;
    let config = view_config_from_args(&args, dataset);
    let out = pipeline::build_view(dataset, &config);

    println!("{}", crate::report::format_table(&out));
    for note in &out.notes {
        println!("note: {note}");
    }
    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let dataset = load(&args.view)?;
    let config = view_config_from_args(&args.view, dataset);
    let out = pipeline::build_view(dataset, &config);

    let columns = crate::report::export_columns(dataset, &out);
    crate::io::write_table_csv(&args.out, &out, &columns)?;
    println!(
        "Wrote {} rows x {} indicators to {}",
        out.annual.len(),
        columns.len(),
        args.out.display()
    );
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let chart = crate::io::read_chart_json(&args.chart)?;
    let plot = crate::plot::render_ascii_chart(&chart.spec, args.width, args.height);
    println!("{plot}");
    Ok(())
}

fn handle_tui(args: ViewArgs) -> Result<(), AppError> {
    crate::tui::run(args)
}

fn load(args: &ViewArgs) -> Result<&'static Dataset, AppError> {
    let path = resolve_data_path(args.data.as_deref());
    cached_dataset(&path)
}

/// Build the view request from CLI flags plus dataset defaults.
pub fn view_config_from_args(args: &ViewArgs, dataset: &Dataset) -> ViewConfig {
    let years = match (args.from, args.to, dataset.year_bounds()) {
        (None, None, _) => None,
        (from, to, Some(bounds)) => Some(YearRange::new(
            from.unwrap_or(bounds.lo),
            to.unwrap_or(bounds.hi),
        )),
        (from, to, None) => Some(YearRange::new(
            from.unwrap_or(i32::MIN),
            to.unwrap_or(i32::MAX),
        )),
    };

    let indicators = if args.indicators.is_empty() {
        default_indicators(dataset)
    } else {
        args.indicators.clone()
    };

    ViewConfig {
        years,
        indicators,
        chart: args.chart,
        window: args.window.max(2),
    }
}

/// Default selection: the first two available indicators, catalog order.
pub fn default_indicators(dataset: &Dataset) -> Vec<Indicator> {
    dataset.available.iter().copied().take(2).collect()
}

/// Rewrite argv so `edash` defaults to `edash tui`.
///
/// Rules:
/// - `edash`                    -> `edash tui`
/// - `edash --from 2000 ...`    -> `edash tui --from 2000 ...`
/// - `edash --help/--version`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "show" | "table" | "export" | "plot" | "tui"
    );
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

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("edash")
            .chain(args.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn bare_invocation_becomes_tui() {
        assert_eq!(rewrite_args(argv(&[])), argv(&["tui"]));
    }

    #[test]
    fn leading_flag_is_forwarded_to_tui() {
        assert_eq!(
            rewrite_args(argv(&["--from", "2000"])),
            argv(&["tui", "--from", "2000"])
        );
    }

    #[test]
    fn explicit_subcommands_pass_through() {
        assert_eq!(rewrite_args(argv(&["table"])), argv(&["table"]));
        assert_eq!(rewrite_args(argv(&["--help"])), argv(&["--help"]));
    }
}
