//! Month navigation

use chrono::{Datelike, Local, NaiveDate, Weekday};

use crate::grid::GridWindow;
use crate::{CalendarError, Result};

/// The month currently shown (1-based month)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthCursor {
    year: i32,
    month: u32,
}

impl MonthCursor {
    /// Cursor at `year`-`month`; `month` is 1-12
    pub fn new(year: i32, month: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).ok_or(CalendarError::InvalidMonth { year, month })?;
        Ok(Self { year, month })
    }

    /// Cursor at the current local month
    pub fn today() -> Self {
        Self::containing(Local::now().date_naive())
    }

    /// Cursor at the month containing `date`
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// First day of the month
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Move one month forward, rolling into the next year after December
    pub fn next_month(&mut self) {
        if self.month == 12 {
            self.month = 1;
            self.year += 1;
        } else {
            self.month += 1;
        }
    }

    /// Move one month back, rolling into the previous year before January
    pub fn prev_month(&mut self) {
        if self.month == 1 {
            self.month = 12;
            self.year -= 1;
        } else {
            self.month -= 1;
        }
    }

    pub fn next_year(&mut self) {
        self.year += 1;
    }

    pub fn prev_year(&mut self) {
        self.year -= 1;
    }

    /// Jump to `month` (1-12) of the current year
    pub fn select_month(&mut self, month: u32) -> Result<()> {
        *self = Self::new(self.year, month)?;
        Ok(())
    }

    /// Grid window for this month
    pub fn window(&self, week_start: Weekday) -> Result<GridWindow> {
        GridWindow::for_month(self.year, self.month, week_start)
    }

    /// Month heading rendered with a chrono format string such as `%Y-%m`
    pub fn heading(&self, format: &str) -> Result<String> {
        let first = self.first_day().ok_or(CalendarError::InvalidMonth {
            year: self.year,
            month: self.month,
        })?;
        Ok(first.format(format).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_bad_month() {
        assert!(MonthCursor::new(2025, 0).is_err());
        assert_eq!(
            MonthCursor::new(2025, 13),
            Err(CalendarError::InvalidMonth { year: 2025, month: 13 })
        );
        assert!(MonthCursor::new(2025, 12).is_ok());
    }

    #[test]
    fn test_month_rollover() {
        let mut cursor = MonthCursor::new(2024, 12).unwrap();
        cursor.next_month();
        assert_eq!((cursor.year(), cursor.month()), (2025, 1));
        cursor.prev_month();
        assert_eq!((cursor.year(), cursor.month()), (2024, 12));
        cursor.prev_month();
        assert_eq!((cursor.year(), cursor.month()), (2024, 11));
    }

    #[test]
    fn test_year_navigation_and_select() {
        let mut cursor = MonthCursor::new(2025, 3).unwrap();
        cursor.next_year();
        assert_eq!(cursor.year(), 2026);
        cursor.prev_year();
        cursor.prev_year();
        assert_eq!(cursor.year(), 2024);

        cursor.select_month(7).unwrap();
        assert_eq!(cursor.month(), 7);
        assert!(cursor.select_month(13).is_err());
        assert_eq!(cursor.month(), 7);
    }

    #[test]
    fn test_window_and_heading() {
        let cursor = MonthCursor::new(2025, 3).unwrap();
        let window = cursor.window(Weekday::Sun).unwrap();
        assert_eq!(window.start(), NaiveDate::from_ymd_opt(2025, 2, 23).unwrap());

        assert_eq!(cursor.heading("%Y-%m").unwrap(), "2025-03");
        assert_eq!(cursor.heading("%B %Y").unwrap(), "March 2025");
    }

    #[test]
    fn test_containing() {
        let cursor = MonthCursor::containing(NaiveDate::from_ymd_opt(2025, 6, 18).unwrap());
        assert_eq!((cursor.year(), cursor.month()), (2025, 6));
    }
}
