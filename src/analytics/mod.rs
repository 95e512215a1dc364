//! Numeric pipeline: filter → aggregate → derive → correlate.
//!
//! Everything here is a pure function over the loaded dataset; there is no
//! caching and no shared state, so each user interaction recomputes its view
//! from scratch.

pub mod aggregate;
pub mod correlate;
pub mod derive;

pub use aggregate::*;
pub use correlate::*;
pub use derive::*;

use crate::domain::{Record, YearRange};

/// Restrict records to an inclusive year range, order preserved.
///
/// An inverted range yields an empty result rather than an error; a view over
/// a half-edited selection should render as empty, not crash.
pub fn filter_years<'a>(records: &'a [Record], range: YearRange) -> Vec<&'a Record> {
    if range.is_empty() {
        return Vec::new();
    }
    records.iter().filter(|r| range.contains(r.year)).collect()
}
