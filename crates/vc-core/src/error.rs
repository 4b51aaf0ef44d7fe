//! Error types for vc-core

use chrono::NaiveDate;
use thiserror::Error;

/// Main error type for vc-core
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Pattern error: {0}")]
    Pattern(#[from] PatternError),
}

/// Why a piece of text did not yield a temporal pattern.
///
/// The assembly path skips the record for every variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("no ISO date found")]
    NoDate,

    #[error("range ends before it starts: {start} - {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("not a calendar date: {0}")]
    InvalidDate(String),
}

/// Result type alias for vc-core
pub type Result<T> = std::result::Result<T, Error>;
