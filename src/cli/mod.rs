//! Command-line parsing for the indicator dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the pipeline code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{ChartKind, DEFAULT_ROLLING_WINDOW, Indicator};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "edash",
    version,
    about = "Terminal dashboard for national economic & demographic indicators"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render a chart for the current selection, plus summary and insights.
    Show(ViewArgs),
    /// Print the filtered annual table (most recent year first).
    Table(ViewArgs),
    /// Write the filtered annual table to a CSV file.
    Export(ExportArgs),
    /// Re-render a previously exported chart JSON.
    Plot(PlotArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying pipeline as `edash show`, but renders
    /// results in a terminal UI using Ratatui.
    Tui(ViewArgs),
}

/// Common options for building a view.
#[derive(Debug, Parser, Clone)]
pub struct ViewArgs {
    /// Path to the processed indicator CSV (default: $ECON_DASH_DATA or
    /// lka_processed.csv).
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Lower bound of the year filter (default: dataset minimum).
    #[arg(long)]
    pub from: Option<i32>,

    /// Upper bound of the year filter (default: dataset maximum).
    #[arg(long)]
    pub to: Option<i32>,

    /// Indicators to display (repeatable; default: first two available).
    #[arg(short = 'i', long = "indicator", value_enum)]
    pub indicators: Vec<Indicator>,

    /// Chart to assemble.
    #[arg(long, value_enum, default_value_t = ChartKind::Trend)]
    pub chart: ChartKind,

    /// Rolling window (years) for volatility metrics.
    #[arg(long, default_value_t = DEFAULT_ROLLING_WINDOW)]
    pub window: usize,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export the assembled chart spec to JSON.
    #[arg(long = "export-chart")]
    pub export_chart: Option<PathBuf>,
}

/// Options for the table export.
#[derive(Debug, Parser)]
pub struct ExportArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Output CSV path.
    #[arg(long, default_value = "econ_dash_table.csv")]
    pub out: PathBuf,
}

/// Options for re-rendering a saved chart.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Chart JSON file produced by `edash show --export-chart`.
    #[arg(long, value_name = "JSON")]
    pub chart: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}
