//! Temporal patterns
//!
//! A [`TemporalPattern`] covers either a single calendar day or an inclusive
//! run of consecutive days. Both shapes share one representation (a start
//! date plus a day count), so containment and overlap have a single
//! implementation regardless of how the pattern was written.

use std::fmt;

use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::parser::date_slug;

/// Shape of a pattern, derived from its day count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// Exactly one day
    SinglePoint,
    /// Two or more consecutive days
    Range,
}

/// An inclusive run of calendar days (`day_count >= 1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "PatternRepr")]
pub struct TemporalPattern {
    start: NaiveDate,
    day_count: u32,
}

/// Wire form, clamped on the way in so deserialized values keep the invariant.
#[derive(Deserialize)]
struct PatternRepr {
    start: NaiveDate,
    #[serde(default = "one")]
    day_count: u32,
}

fn one() -> u32 {
    1
}

impl From<PatternRepr> for TemporalPattern {
    fn from(repr: PatternRepr) -> Self {
        Self::range(repr.start, repr.day_count)
    }
}

impl TemporalPattern {
    /// A pattern covering just `date`.
    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            day_count: 1,
        }
    }

    /// A pattern of `day_count` days starting at `start`. Zero is rounded up to one.
    pub fn range(start: NaiveDate, day_count: u32) -> Self {
        Self {
            start,
            day_count: day_count.max(1),
        }
    }

    /// A pattern from `start` through `end`, both inclusive.
    ///
    /// An `end` before `start` collapses to a single day at `start`.
    pub fn from_bounds(start: NaiveDate, end: NaiveDate) -> Self {
        Self::range(start, span_between(start, end))
    }

    /// Whether `date` falls on or between the first and last day.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.ends()
    }

    /// Same as [`contains`](Self::contains), ignoring the time of day.
    pub fn contains_datetime(&self, at: NaiveDateTime) -> bool {
        self.contains(at.date())
    }

    /// Whether the two patterns share at least one day.
    ///
    /// The pattern that starts first must include the other's start.
    pub fn overlaps(&self, other: &TemporalPattern) -> bool {
        let (my_end, other_end) = (self.ends(), other.ends());
        (self.start <= other.start && other.start <= my_end)
            || (other.start <= self.start && self.start <= other_end)
    }

    /// First day covered.
    pub fn begins(&self) -> NaiveDate {
        self.start
    }

    /// Last day covered (inclusive).
    pub fn ends(&self) -> NaiveDate {
        self.start
            .checked_add_days(Days::new(u64::from(self.day_count - 1)))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Number of days covered, 1 for a single day.
    pub fn spans(&self) -> u32 {
        self.day_count
    }

    /// Whether the pattern covers more than one day.
    pub fn is_multi_day(&self) -> bool {
        self.day_count > 1
    }

    pub fn kind(&self) -> PatternKind {
        if self.is_multi_day() {
            PatternKind::Range
        } else {
            PatternKind::SinglePoint
        }
    }

    /// Start a two-phase construction.
    pub fn builder() -> PatternBuilder {
        PatternBuilder::default()
    }
}

impl fmt::Display for TemporalPattern {
    /// Canonical text form; feeding it back to the parser yields an equal pattern.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            PatternKind::SinglePoint => write!(f, "{}", date_slug(self.start)),
            PatternKind::Range => {
                write!(f, "{} - {}", date_slug(self.start), date_slug(self.ends()))
            }
        }
    }
}

/// Builder for patterns assembled from partial data, such as a structured
/// record that names a start and, optionally, an end.
#[derive(Debug, Clone, Default)]
pub struct PatternBuilder {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    days: Option<u32>,
}

impl PatternBuilder {
    /// Set the first day
    pub fn start(mut self, start: NaiveDate) -> Self {
        self.start = Some(start);
        self
    }

    /// Set the last day; the day count is derived from it at build time
    pub fn end(mut self, end: NaiveDate) -> Self {
        self.end = Some(end);
        self.days = None;
        self
    }

    /// Set the day count directly
    pub fn days(mut self, days: u32) -> Self {
        self.days = Some(days);
        self.end = None;
        self
    }

    /// Finish construction. Returns `None` when no start was given.
    pub fn build(self) -> Option<TemporalPattern> {
        let start = self.start?;
        let pattern = match (self.end, self.days) {
            (Some(end), _) => TemporalPattern::from_bounds(start, end),
            (None, Some(days)) => TemporalPattern::range(start, days),
            (None, None) => TemporalPattern::single(start),
        };
        Some(pattern)
    }
}

/// Inclusive day count from `start` to `end`, clamped to at least one.
fn span_between(start: NaiveDate, end: NaiveDate) -> u32 {
    let days = (end - start).num_days() + 1;
    u32::try_from(days.max(1)).unwrap_or(u32::MAX)
}
