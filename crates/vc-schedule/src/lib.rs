//! Change debouncing
//!
//! Collapses bursts of "a note changed" notifications into a single bump of
//! the shared data version, after a quiet period.

mod debounce;
pub mod error;

pub use debounce::{ChangeDebouncer, DebouncerHandle};
pub use error::{Result, ScheduleError};
