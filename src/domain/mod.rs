//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the typed indicator catalog (`Indicator`)
//! - per-period observations (`Record`) and the aggregated `AnnualSeries`
//! - user-facing selection types (`YearRange`, `ChartKind`, `ViewConfig`)

pub mod types;

pub use types::*;
