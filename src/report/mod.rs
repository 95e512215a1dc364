//! Reporting: summary metrics, narrative insights, and formatted tables.
//!
//! We keep formatting code in one place so:
//! - the pipeline code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

pub mod format;
pub mod insights;

pub use format::*;
pub use insights::*;
