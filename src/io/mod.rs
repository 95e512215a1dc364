//! Input/output helpers.
//!
//! - annual table export (CSV) (`export`)
//! - chart spec read/write (JSON) (`chart_json`)
//!
//! Dataset ingest lives in `crate::data`; this module only writes results.

pub mod chart_json;
pub mod export;

pub use chart_json::*;
pub use export::*;
