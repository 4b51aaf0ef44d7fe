//! Watch loop
//!
//! Every line read from the input reports a change. Changes go through the
//! debouncer, and each settled change re-renders the calendar. When the input
//! closes, a change still waiting out its quiet period is rendered before the
//! loop returns.

use std::future::Future;
use std::io::Write;

use chrono::Local;
use tokio::io::{AsyncBufRead, Lines};
use tracing::info;
use vc_calendar::{CalendarController, GridView};
use vc_core::VaultCalendarConfig;
use vc_schedule::DebouncerHandle;

use crate::error::CliError;
use crate::render::render_view;

/// What the watch loop woke up for
enum WatchEvent {
    Line(Option<String>),
    Changed,
    Interrupted,
}

/// Re-render into `out` until the input closes or `shutdown` resolves
pub async fn watch_loop<R, W, S>(
    controller: &mut CalendarController,
    debouncer: DebouncerHandle,
    mut lines: Lines<R>,
    out: &mut W,
    shutdown: S,
    config: &VaultCalendarConfig,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        let event = tokio::select! {
            line = lines.next_line() => WatchEvent::Line(line?),
            changed = controller.watch_version() => {
                changed?;
                WatchEvent::Changed
            }
            _ = &mut shutdown => WatchEvent::Interrupted,
        };

        match event {
            WatchEvent::Line(Some(_)) => debouncer.notify().map_err(CliError::from)?,
            WatchEvent::Line(None) => {
                info!("Input closed");
                break;
            }
            WatchEvent::Changed => {
                let view = controller.refresh().await?;
                write_view(out, controller, &view, config)?;
            }
            WatchEvent::Interrupted => break,
        }
    }

    info!("Shutting down...");
    debouncer.stop().await;

    if controller.sync() {
        let view = controller.refresh().await?;
        write_view(out, controller, &view, config)?;
    }
    Ok(())
}

/// Render `view` for the controller's month and flush it
pub fn write_view<W: Write>(
    out: &mut W,
    controller: &CalendarController,
    view: &GridView,
    config: &VaultCalendarConfig,
) -> anyhow::Result<()> {
    let heading = controller
        .cursor()
        .heading(&config.calendar.month_format)
        .map_err(CliError::from)?;
    let today = Local::now().date_naive();
    out.write_all(render_view(view, &heading, &config.calendar, today).as_bytes())?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::Value as JsonValue;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::time::sleep;
    use vc_calendar::{
        EventAssembler, MonthCursor, QueryExecutor, QueryResponse, RawRecord, StaticTasks,
    };
    use vc_core::ModifiedSignal;
    use vc_schedule::ChangeDebouncer;

    /// One record whose text can be swapped between fetches
    struct EditableNote(Mutex<String>);

    impl EditableNote {
        fn set(&self, text: &str) {
            *self.0.lock().unwrap() = text.to_string();
        }
    }

    #[async_trait]
    impl QueryExecutor for EditableNote {
        async fn query(&self, _source: &str) -> QueryResponse {
            let text = self.0.lock().unwrap().clone();
            QueryResponse::ok(vec![RawRecord::new(text, JsonValue::Null)])
        }
    }

    fn config(delay_ms: u64) -> VaultCalendarConfig {
        let mut config = VaultCalendarConfig::default();
        config.calendar.update_delay_ms = delay_ms;
        config
    }

    #[tokio::test(start_paused = true)]
    async fn test_changes_rerender_after_quiet_period() {
        let config = config(50);
        let note = Arc::new(EditableNote(Mutex::new("First 2025-03-15".to_string())));
        let signal = ModifiedSignal::default();
        let assembler = EventAssembler::new(note.clone(), Arc::new(StaticTasks(vec![])));
        let mut controller = CalendarController::new(
            Arc::new(assembler),
            "note",
            signal.clone(),
            MonthCursor::new(2025, 3).unwrap(),
            config.calendar.week_start(),
        );
        assert!(matches!(controller.refresh().await.unwrap(), GridView::Ready(_)));

        let debouncer = ChangeDebouncer::from_settings(signal.clone(), &config.calendar).start();
        let (mut input, reader) = tokio::io::duplex(64);
        let lines = BufReader::new(reader).lines();
        let mut out = Vec::new();

        let driver = async {
            note.set("Updated 2025-03-15");
            input.write_all(b"changed\n").await.unwrap();
            sleep(Duration::from_millis(200)).await;

            // Closed before the quiet period ends
            note.set("Final 2025-03-20");
            input.write_all(b"changed\n").await.unwrap();
            drop(input);
        };

        let (result, ()) = tokio::join!(
            watch_loop(
                &mut controller,
                debouncer,
                lines,
                &mut out,
                std::future::pending::<()>(),
                &config,
            ),
            driver,
        );
        result.unwrap();

        let text = String::from_utf8(out).unwrap();
        let renders: Vec<&str> = text.split("2025-03\n").skip(1).collect();
        assert_eq!(renders.len(), 2);
        assert!(renders[0].contains("Updated"));
        assert!(renders[1].contains("Final"));
        assert!(!text.contains("First"));
        assert_eq!(signal.get(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_without_changes_renders_nothing() {
        let config = config(50);
        let signal = ModifiedSignal::default();
        let assembler = EventAssembler::new(
            Arc::new(EditableNote(Mutex::new("Only 2025-03-15".to_string()))),
            Arc::new(StaticTasks(vec![])),
        );
        let mut controller = CalendarController::new(
            Arc::new(assembler),
            "note",
            signal.clone(),
            MonthCursor::new(2025, 3).unwrap(),
            config.calendar.week_start(),
        );
        controller.refresh().await.unwrap();

        let debouncer = ChangeDebouncer::from_settings(signal.clone(), &config.calendar).start();
        let (_input, reader) = tokio::io::duplex(64);
        let mut out = Vec::new();

        watch_loop(
            &mut controller,
            debouncer,
            BufReader::new(reader).lines(),
            &mut out,
            async {},
            &config,
        )
        .await
        .unwrap();

        assert!(out.is_empty());
        assert_eq!(signal.get(), 0);
    }
}
