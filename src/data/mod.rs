//! Dataset access.
//!
//! - CSV load + header validation (`loader`)
//! - period-label → year normalization (`period`)
//! - the process-wide cached dataset accessor (`cached_dataset`)

pub mod loader;
pub mod period;

pub use loader::*;
pub use period::*;
