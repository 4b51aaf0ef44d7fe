//! Date pattern extraction from free-form text
//!
//! Event text such as `"Offsite 2025-09-10 through 2025-09-12"` is scanned
//! for ISO dates (`YYYY-MM-DD`, fixed width). A range is tried first; a lone
//! date is the fallback.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::PatternError;
use crate::pattern::TemporalPattern;

static RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?P<y1>[0-9]{4})-(?P<m1>[0-9]{2})-(?P<d1>[0-9]{2})\s*(?:-|through)\s*(?P<y2>[0-9]{4})-(?P<m2>[0-9]{2})-(?P<d2>[0-9]{2})",
    )
    .expect("valid date range regex")
});

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<y>[0-9]{4})-(?P<m>[0-9]{2})-(?P<d>[0-9]{2})").expect("valid date regex")
});

static LEADING_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<y>[0-9]{4})-(?P<m>[0-9]{2})-(?P<d>[0-9]{2})")
        .expect("valid leading date regex")
});

// Up to two levels of wiki-link brackets, e.g. `[[2025-03-15]]`.
static STRIP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[?\[?[0-9]{4}-[0-9]{2}-[0-9]{2}\]?\]?").expect("valid strip regex")
});

/// Extract a pattern from `text`, or `None` when it holds no usable date.
pub fn parse_pattern(text: &str) -> Option<TemporalPattern> {
    try_parse_pattern(text).ok()
}

/// Like [`parse_pattern`], but says why nothing was found.
///
/// A matched range whose end precedes its start fails outright; it does not
/// fall back to reading the first date on its own.
pub fn try_parse_pattern(text: &str) -> Result<TemporalPattern, PatternError> {
    if let Some(caps) = RANGE_RE.captures(text) {
        let start = date_from(&caps, "y1", "m1", "d1")?;
        let end = date_from(&caps, "y2", "m2", "d2")?;
        if end < start {
            return Err(PatternError::InvalidRange { start, end });
        }
        return Ok(TemporalPattern::from_bounds(start, end));
    }

    let caps = DATE_RE.captures(text).ok_or(PatternError::NoDate)?;
    Ok(TemporalPattern::single(date_from(&caps, "y", "m", "d")?))
}

/// Read a date from the beginning of a date or date-time string
/// (`2025-03-20`, `2025-03-20T09:30:00+01:00`).
pub fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    let caps = LEADING_DATE_RE.captures(text)?;
    date_from(&caps, "y", "m", "d").ok()
}

/// Whether `text` contains anything shaped like an ISO date.
pub fn contains_iso_date(text: &str) -> bool {
    DATE_RE.is_match(text)
}

/// Remove every ISO date (and any surrounding `[[`/`]]`) and trim.
pub fn strip_dates(text: &str) -> String {
    STRIP_RE.replace_all(text, "").trim().to_string()
}

/// Canonical `YYYY-MM-DD` key for a day.
pub fn date_slug(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn date_from(caps: &Captures<'_>, y: &str, m: &str, d: &str) -> Result<NaiveDate, PatternError> {
    let field = |name: &str| caps.name(name).map(|m| m.as_str()).unwrap_or_default();
    let invalid = || PatternError::InvalidDate(format!("{}-{}-{}", field(y), field(m), field(d)));

    let year: i32 = field(y).parse().map_err(|_| invalid())?;
    let month: u32 = field(m).parse().map_err(|_| invalid())?;
    let day: u32 = field(d).parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}
