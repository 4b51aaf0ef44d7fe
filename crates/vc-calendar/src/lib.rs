//! vc-calendar: event assembly and day grids for vault-calendar
//!
//! This crate turns dated notes into a month grid.
//!
//! ## Features
//!
//! - Event assembly from a structured query or from open vault tasks
//! - Day-sweep grid builder over a five-week window
//! - Keyed, cancellable refetch driven by a version signal
//! - Month navigation
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vc_calendar::prelude::*;
//! use vc_core::ModifiedSignal;
//!
//! let assembler = EventAssembler::new(Arc::new(NoQueries), Arc::new(StaticTasks(tasks)));
//! let mut controller = CalendarController::new(
//!     Arc::new(assembler),
//!     "",
//!     ModifiedSignal::default(),
//!     MonthCursor::new(2025, 3)?,
//!     chrono::Weekday::Sun,
//! );
//!
//! if let GridView::Ready(grid) = controller.refresh().await? {
//!     for cell in grid.iter() {
//!         println!("{}: {} events", cell.slug(), cell.events.len());
//!     }
//! }
//! ```

pub mod assembly;
pub mod error;
pub mod grid;
pub mod models;
pub mod month;
pub mod resource;
pub mod source;
pub mod view;

pub use assembly::{EventAssembler, EventList, events_from_records, events_from_tasks};
pub use error::{CalendarError, Result};
pub use grid::{DayCell, DayGrid, GRID_DAYS, GridWindow, build_day_grid};
pub use models::{Event, QueryResponse, QueryValue, RawRecord, TaskRecord, records_from_values};
pub use month::MonthCursor;
pub use resource::{EventResource, FetchKey, ResourceState};
pub use source::{NoQueries, QueryExecutor, StaticTasks, TaskProvider};
pub use view::{CalendarController, GridMemo, GridView};

/// Re-export the common types for easy use
pub mod prelude {
    pub use super::{
        CalendarController, DayGrid, Event, EventAssembler, GridView, GridWindow, MonthCursor,
        NoQueries, QueryExecutor, StaticTasks, TaskProvider,
    };
}
