//! Error types (vc-schedule)

use thiserror::Error;

/// vc-schedule error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Debouncer is not running")]
    Stopped,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ScheduleError>;
