//! Event assembly
//!
//! Turns query rows or vault tasks into a list of [`Event`]s sorted by start
//! date. Rows that yield no date are dropped without error.

use std::sync::Arc;

use tracing::{debug, info};
use vc_core::{contains_iso_date, parse_pattern, strip_dates};

use crate::models::{Event, RawRecord, TaskRecord};
use crate::source::{QueryExecutor, TaskProvider};
use crate::Result;

/// Sorted, shared event list
pub type EventList = Vec<Arc<Event>>;

/// Builds events from the configured data sources
pub struct EventAssembler {
    executor: Arc<dyn QueryExecutor>,
    tasks: Arc<dyn TaskProvider>,
}

impl EventAssembler {
    /// Create an assembler over a query executor and a task provider
    pub fn new(executor: Arc<dyn QueryExecutor>, tasks: Arc<dyn TaskProvider>) -> Self {
        Self { executor, tasks }
    }

    /// Fetch and normalize events.
    ///
    /// A non-empty `source` runs the structured query; an empty one scans
    /// open tasks. A failed query is returned as an error and no partial list
    /// is produced.
    pub async fn assemble(&self, source: &str) -> Result<EventList> {
        let source = source.trim();
        let mut events = if source.is_empty() {
            let tasks = self.tasks.tasks().await?;
            events_from_tasks(tasks)
        } else {
            let records = self.executor.query(source).await.into_records()?;
            events_from_records(records)
        };

        sort_by_start(&mut events);
        info!("Assembled {} events", events.len());
        Ok(events.into_iter().map(Arc::new).collect())
    }
}

/// Events from structured query rows, in encounter order
pub fn events_from_records(records: Vec<RawRecord>) -> Vec<Event> {
    records.into_iter().filter_map(event_from_record).collect()
}

/// Events from open, dated tasks, in encounter order
pub fn events_from_tasks(tasks: Vec<TaskRecord>) -> Vec<Event> {
    tasks
        .into_iter()
        .filter(|t| !t.completed && contains_iso_date(&t.text))
        .filter_map(|t| {
            let Some(when) = parse_pattern(&t.text) else {
                debug!("Skipping task without a usable date: {}", t.text);
                return None;
            };
            Some(Event::new(when, strip_dates(&t.text)).with_link(t.link))
        })
        .collect()
}

fn event_from_record(record: RawRecord) -> Option<Event> {
    let Some(when) = record
        .payload_pattern()
        .or_else(|| parse_pattern(&record.text))
    else {
        debug!("Dropping record without a usable date: {}", record.text);
        return None;
    };

    let display = match record.payload_display() {
        Some(display) => display.to_string(),
        None => strip_dates(&record.text),
    };
    let link = record
        .payload_link()
        .cloned()
        .unwrap_or_else(|| record.key.clone());

    Some(Event::new(when, display).with_link(link))
}

/// Stable sort by first day; ties keep encounter order.
fn sort_by_start(events: &mut [Event]) {
    events.sort_by_key(|e| e.when.begins());
}
