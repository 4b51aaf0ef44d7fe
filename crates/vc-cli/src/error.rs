//! Error types (vault-calendar binary)

use std::fmt;

/// Unified error type for the binary
///
/// Wraps the library errors plus argument problems
#[derive(Debug)]
pub enum CliError {
    /// Core error
    Core(vc_core::Error),
    /// Calendar error
    Calendar(vc_calendar::CalendarError),
    /// Debouncer error
    Schedule(vc_schedule::ScheduleError),
    /// Bad command line
    Args(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Core(e) => write!(f, "Core error: {}", e),
            Self::Calendar(e) => write!(f, "Calendar error: {}", e),
            Self::Schedule(e) => write!(f, "Schedule error: {}", e),
            Self::Args(e) => write!(f, "Invalid arguments: {}", e),
        }
    }
}

impl std::error::Error for CliError {}

impl From<vc_core::Error> for CliError {
    fn from(e: vc_core::Error) -> Self {
        Self::Core(e)
    }
}

impl From<vc_calendar::CalendarError> for CliError {
    fn from(e: vc_calendar::CalendarError) -> Self {
        Self::Calendar(e)
    }
}

impl From<vc_schedule::ScheduleError> for CliError {
    fn from(e: vc_schedule::ScheduleError) -> Self {
        Self::Schedule(e)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CliError>;
