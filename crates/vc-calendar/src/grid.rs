//! Day-sweep grid builder
//!
//! Assigns events to the 35 days of a five-week calendar grid. Events arrive
//! sorted by start date, so a single forward sweep with a small "active" set
//! is enough; the full event list is never re-scanned per day.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use tracing::debug;
use vc_core::{TemporalPattern, date_slug};

use crate::models::Event;
use crate::{CalendarError, Result};

/// Number of days shown: five full weeks
pub const GRID_DAYS: u32 = 35;

/// The span of days a grid covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridWindow {
    range: TemporalPattern,
}

impl GridWindow {
    /// A window of [`GRID_DAYS`] starting at `start`
    pub fn starting(start: NaiveDate) -> Self {
        Self {
            range: TemporalPattern::range(start, GRID_DAYS),
        }
    }

    /// The window for a month (1-12): the first of the month, moved back to
    /// the nearest `week_start`.
    pub fn for_month(year: i32, month: u32, week_start: Weekday) -> Result<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or(CalendarError::InvalidMonth { year, month })?;
        let lead = (first.weekday().num_days_from_sunday() + 7 - week_start.num_days_from_sunday()) % 7;
        let start = first
            .checked_sub_days(Days::new(u64::from(lead)))
            .ok_or(CalendarError::InvalidMonth { year, month })?;
        Ok(Self::starting(start))
    }

    /// First rendered day
    pub fn start(&self) -> NaiveDate {
        self.range.begins()
    }

    /// Last rendered day
    pub fn end(&self) -> NaiveDate {
        self.range.ends()
    }

    /// The window as a pattern, for overlap tests
    pub fn range(&self) -> &TemporalPattern {
        &self.range
    }

    /// Every day in the window, in order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.range.begins().iter_days().take_while(|d| self.range.contains(*d))
    }
}

/// One grid cell: a day and the events active on it
#[derive(Debug, Clone)]
pub struct DayCell {
    pub date: NaiveDate,
    pub events: Vec<Arc<Event>>,
}

impl DayCell {
    /// `YYYY-MM-DD` key of the cell
    pub fn slug(&self) -> String {
        date_slug(self.date)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Day-to-events mapping in chronological order
#[derive(Debug, Clone, Default)]
pub struct DayGrid {
    cells: Vec<DayCell>,
}

impl DayGrid {
    /// Events for the day with key `slug`
    pub fn get(&self, slug: &str) -> Option<&[Arc<Event>]> {
        self.cells
            .iter()
            .find(|c| c.slug() == slug)
            .map(|c| c.events.as_slice())
    }

    /// Events for `date`
    pub fn on(&self, date: NaiveDate) -> Option<&[Arc<Event>]> {
        self.cells
            .iter()
            .find(|c| c.date == date)
            .map(|c| c.events.as_slice())
    }

    /// Cells in day order
    pub fn iter(&self) -> impl Iterator<Item = &DayCell> {
        self.cells.iter()
    }

    /// Day keys in order
    pub fn days(&self) -> Vec<String> {
        self.cells.iter().map(DayCell::slug).collect()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Compute the active events for each day of `window`.
///
/// `events` must be sorted by start date.
pub fn build_day_grid(events: &[Arc<Event>], window: &GridWindow) -> DayGrid {
    let grid_start = window.start();

    // Events already running when the window opens start out active.
    let (mut active, remaining): (Vec<Arc<Event>>, Vec<Arc<Event>>) = events
        .iter()
        .filter(|e| e.when.overlaps(window.range()))
        .cloned()
        .partition(|e| e.when.begins() < grid_start);
    let mut remaining = VecDeque::from(remaining);

    debug!(
        "Building grid from {}: {} carried over, {} starting inside",
        grid_start,
        active.len(),
        remaining.len()
    );

    let mut cells = Vec::with_capacity(GRID_DAYS as usize);
    for day in window.days() {
        while remaining.front().is_some_and(|e| e.when.contains(day)) {
            if let Some(event) = remaining.pop_front() {
                active.push(event);
            }
        }
        active.retain(|e| e.when.contains(day));
        cells.push(DayCell {
            date: day,
            events: active.clone(),
        });
    }

    DayGrid { cells }
}
