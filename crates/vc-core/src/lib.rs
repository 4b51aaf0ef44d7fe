//! vc-core: vault-calendar core library
//!
//! Temporal patterns, the date pattern parser, configuration loading and the
//! shared "data changed" version signal.

pub mod config;
pub mod error;
pub mod parser;
pub mod pattern;
pub mod signal;

pub use config::{CalendarSettings, QueryConfig, VaultCalendarConfig, VaultConfig};
pub use error::{Error, PatternError, Result};
pub use parser::{contains_iso_date, date_slug, parse_iso_date, parse_pattern, strip_dates, try_parse_pattern};
pub use pattern::{PatternBuilder, PatternKind, TemporalPattern};
pub use signal::ModifiedSignal;
