//! Error types for vc-calendar

use thiserror::Error;

/// vc-calendar error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// The query executor reported an unsuccessful status.
    /// Displays as the bare reason so it can be shown in place of the grid.
    #[error("{0}")]
    QueryFailed(String),

    #[error("Task scan failed: {0}")]
    TaskScan(String),

    #[error("Event fetch panicked")]
    FetchPanicked,

    #[error("Fetch cancelled: {0}")]
    Cancelled(String),

    #[error("Invalid month: {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CalendarError>;
