//! Application error type.
//!
//! A single error carries a process exit code plus a human-readable message.
//! Conventions:
//!
//! - exit 2: the source dataset is unavailable (missing file, unreadable header)
//! - exit 3: the dataset is present but unusable (no parsable periods, no rows)
//! - exit 4: terminal/rendering/export failures
//!
//! Non-fatal conditions (an indicator missing from the dataset, too few
//! indicators selected for a chart) are *not* errors: they become inline
//! informational text at the component that detects them.

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// The source dataset is missing or unparsable. Fatal, surfaced at startup.
    pub fn data_unavailable(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// No record carried a parsable period. Fatal: there is nothing to display.
    pub fn malformed_period(message: impl Into<String>) -> Self {
        Self::new(3, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
