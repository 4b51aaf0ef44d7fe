//! Calendar view controller
//!
//! Ties the version signal, the event resource and the grid builder together.
//! A grid is rebuilt only when the fetched events or the shown window change.

use std::sync::Arc;

use chrono::Weekday;
use tokio::sync::watch;
use tracing::debug;
use vc_core::ModifiedSignal;

use crate::assembly::EventAssembler;
use crate::grid::{DayGrid, GridWindow, build_day_grid};
use crate::models::Event;
use crate::month::MonthCursor;
use crate::resource::{EventResource, FetchKey, ResourceState};
use crate::{CalendarError, Result};

/// What the calendar should show right now
#[derive(Debug, Clone)]
pub enum GridView {
    /// No events yet for the current request
    Loading,
    /// The day grid for the current month
    Ready(Arc<DayGrid>),
    /// The fetch failed; the reason is shown instead of the grid
    Failed(String),
}

/// Last built grid and the inputs it was built from
#[derive(Debug, Default)]
pub struct GridMemo {
    entry: Option<(FetchKey, GridWindow, Arc<DayGrid>)>,
    builds: usize,
}

impl GridMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached grid for `(key, window)`, building it from `events` on a miss
    pub fn get_or_build(
        &mut self,
        key: &FetchKey,
        window: &GridWindow,
        events: &[Arc<Event>],
    ) -> Arc<DayGrid> {
        if let Some((cached_key, cached_window, grid)) = &self.entry {
            if cached_key == key && cached_window == window {
                return Arc::clone(grid);
            }
        }

        let grid = Arc::new(build_day_grid(events, window));
        self.builds += 1;
        debug!("Built grid #{} starting {}", self.builds, window.start());
        self.entry = Some((key.clone(), *window, Arc::clone(&grid)));
        grid
    }

    /// Number of grids built so far
    pub fn builds(&self) -> usize {
        self.builds
    }
}

/// Drives one calendar: month navigation, refetch on version change and grid
/// memoization
pub struct CalendarController {
    resource: EventResource,
    memo: GridMemo,
    signal: ModifiedSignal,
    version_rx: watch::Receiver<u64>,
    cursor: MonthCursor,
    week_start: Weekday,
}

impl CalendarController {
    pub fn new(
        assembler: Arc<EventAssembler>,
        source: impl Into<String>,
        signal: ModifiedSignal,
        cursor: MonthCursor,
        week_start: Weekday,
    ) -> Self {
        let version_rx = signal.subscribe();
        Self {
            resource: EventResource::new(assembler, source),
            memo: GridMemo::new(),
            signal,
            version_rx,
            cursor,
            week_start,
        }
    }

    /// Start a fetch if the version or source moved since the last one.
    ///
    /// Returns whether a fetch was started.
    pub fn sync(&mut self) -> bool {
        let version = *self.version_rx.borrow_and_update();
        self.resource.trigger(version)
    }

    /// Wait for the next version change, then sync
    pub async fn watch_version(&mut self) -> Result<bool> {
        self.version_rx
            .changed()
            .await
            .map_err(|e| CalendarError::Cancelled(e.to_string()))?;
        Ok(self.sync())
    }

    /// Sync, wait for the fetch to settle and return the resulting view
    pub async fn refresh(&mut self) -> Result<GridView> {
        self.sync();
        self.resource.settled().await?;
        self.view()
    }

    /// Current view without waiting
    pub fn view(&mut self) -> Result<GridView> {
        match self.resource.state() {
            ResourceState::Idle | ResourceState::Loading(_) => Ok(GridView::Loading),
            ResourceState::Failed { error, .. } => Ok(GridView::Failed(error.to_string())),
            ResourceState::Ready { key, events } => {
                let window = self.cursor.window(self.week_start)?;
                Ok(GridView::Ready(self.memo.get_or_build(&key, &window, &events)))
            }
        }
    }

    /// Use another query source and fetch for it
    pub fn set_source(&mut self, source: impl Into<String>) -> bool {
        self.resource.set_source(source);
        self.sync()
    }

    pub fn source(&self) -> &str {
        self.resource.source()
    }

    pub fn cursor(&self) -> MonthCursor {
        self.cursor
    }

    /// Mutable month cursor; the next [`view`](Self::view) uses the new window
    pub fn cursor_mut(&mut self) -> &mut MonthCursor {
        &mut self.cursor
    }

    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    /// The version signal this controller listens to
    pub fn signal(&self) -> &ModifiedSignal {
        &self.signal
    }

    /// Grids built so far
    pub fn builds(&self) -> usize {
        self.memo.builds()
    }
}
