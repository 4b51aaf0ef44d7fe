//! Plain-text grid renderer
//!
//! Layout: month heading, optional row of day labels, then five week rows.
//! Each week row is a line of day numbers followed by one line per event
//! slot. `*` marks today, `~` marks an event spanning several days.

use std::fmt::Write;

use chrono::{Datelike, NaiveDate};
use vc_calendar::{DayCell, GridView};
use vc_core::CalendarSettings;

/// Character width of one column
pub const CELL_WIDTH: usize = 14;

/// Render a view for the terminal
pub fn render_view(
    view: &GridView,
    heading: &str,
    settings: &CalendarSettings,
    today: NaiveDate,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", heading);

    match view {
        GridView::Loading => out.push_str("Loading...\n"),
        GridView::Failed(reason) => {
            let _ = writeln!(out, "{}", reason);
        }
        GridView::Ready(grid) => {
            if settings.display_head {
                out.push_str(&header_row(settings));
            }
            let cells: Vec<&DayCell> = grid.iter().collect();
            for week in cells.chunks(7) {
                out.push_str(&week_rows(week, today));
            }
        }
    }

    out
}

fn header_row(settings: &CalendarSettings) -> String {
    let mut day = settings.week_start();
    let mut line = String::new();
    for _ in 0..7 {
        line.push_str(&cell(settings.day_label(day)));
        day = day.succ();
    }
    finish_line(line)
}

fn week_rows(week: &[&DayCell], today: NaiveDate) -> String {
    let mut out = String::new();

    let numbers: String = week
        .iter()
        .map(|c| {
            let marker = if c.date == today { "*" } else { "" };
            cell(&format!("{:>2}{}", c.date.day(), marker))
        })
        .collect();
    out.push_str(&finish_line(numbers));

    let slots = week.iter().map(|c| c.events.len()).max().unwrap_or(0);
    for slot in 0..slots {
        let line: String = week
            .iter()
            .map(|c| match c.events.get(slot) {
                Some(event) => {
                    let marker = if event.when.is_multi_day() { "~" } else { "" };
                    cell(&format!("{}{}", marker, event.display))
                }
                None => cell(""),
            })
            .collect();
        out.push_str(&finish_line(line));
    }

    out
}

/// Fixed-width column, truncated to leave a one-space gutter
fn cell(text: &str) -> String {
    let clipped: String = text.chars().take(CELL_WIDTH - 1).collect();
    format!("{:<width$}", clipped, width = CELL_WIDTH)
}

fn finish_line(line: String) -> String {
    let mut line = line.trim_end().to_string();
    line.push('\n');
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use chrono::Weekday;
    use vc_calendar::{Event, GridWindow, build_day_grid};
    use vc_core::{parse_pattern, strip_dates};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn grid_view(texts: &[&str], week_start: Weekday) -> GridView {
        let mut events: Vec<Arc<Event>> = texts
            .iter()
            .map(|t| Arc::new(Event::new(parse_pattern(t).unwrap(), strip_dates(t))))
            .collect();
        events.sort_by_key(|e| e.when.begins());
        let window = GridWindow::for_month(2025, 3, week_start).unwrap();
        GridView::Ready(Arc::new(build_day_grid(&events, &window)))
    }

    #[test]
    fn test_renders_header_and_events() {
        let view = grid_view(
            &["Team Meeting 2025-03-15", "Conference 2025-03-20 - 2025-03-22"],
            Weekday::Sun,
        );
        let text = render_view(&view, "2025-03", &CalendarSettings::default(), date(2025, 3, 16));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "2025-03");
        assert!(lines[1].starts_with("SUN"));
        assert!(lines[1].trim_end().ends_with("SAT"));
        // First week starts on Feb 23
        assert!(lines[2].starts_with("23"));
        assert!(text.contains("Team Meeting"));
        assert!(text.contains("~Conference"));
        assert!(text.contains("16*"));
    }

    #[test]
    fn test_event_sits_under_its_day_column() {
        let view = grid_view(&["Team Meeting 2025-03-15"], Weekday::Sun);
        let text = render_view(&view, "2025-03", &CalendarSettings::default(), date(2000, 1, 1));

        let lines: Vec<&str> = text.lines().collect();
        let event_line = lines.iter().find(|l| l.contains("Team Meeting")).unwrap();
        // Saturday is the seventh column
        assert_eq!(event_line.find("Team Meeting"), Some(6 * CELL_WIDTH));
    }

    #[test]
    fn test_header_follows_week_start() {
        let settings = CalendarSettings {
            start_of_week: 1,
            ..CalendarSettings::default()
        };
        let view = grid_view(&[], Weekday::Mon);
        let text = render_view(&view, "March", &settings, date(2000, 1, 1));
        let header = text.lines().nth(1).unwrap();
        assert!(header.starts_with("MON"));
        assert!(header.ends_with("SUN"));
    }

    #[test]
    fn test_header_can_be_hidden() {
        let settings = CalendarSettings {
            display_head: false,
            ..CalendarSettings::default()
        };
        let view = grid_view(&[], Weekday::Sun);
        let text = render_view(&view, "2025-03", &settings, date(2000, 1, 1));
        assert!(!text.contains("SUN"));
        // heading + five number rows
        assert_eq!(text.lines().count(), 6);
    }

    #[test]
    fn test_failure_prints_reason_only() {
        let view = GridView::Failed("Invalid query syntax".to_string());
        let text = render_view(&view, "2025-03", &CalendarSettings::default(), date(2025, 3, 1));
        assert_eq!(text, "2025-03\nInvalid query syntax\n");
    }

    #[test]
    fn test_long_display_is_clipped() {
        assert_eq!(cell("A very long event description").len(), CELL_WIDTH);
        assert!(cell("A very long event description").ends_with(' '));
    }
}
