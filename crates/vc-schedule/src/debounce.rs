//! Debouncer
//!
//! Each notification restarts the quiet period. When the period elapses
//! without another notification the version signal is bumped once.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info};
use vc_core::{CalendarSettings, ModifiedSignal};

use crate::{Result, ScheduleError};

/// Handle to a running debouncer
pub struct DebouncerHandle {
    notify_tx: mpsc::UnboundedSender<()>,
    shutdown_tx: broadcast::Sender<()>,
    handle: JoinHandle<()>,
}

impl DebouncerHandle {
    /// Report a change
    pub fn notify(&self) -> Result<()> {
        self.notify_tx.send(()).map_err(|_| ScheduleError::Stopped)
    }

    /// Stop the debouncer. A change still waiting out its quiet period is
    /// published before the task exits.
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(());
        let _ = self.handle.await;
    }
}

/// Turns change notifications into version bumps
pub struct ChangeDebouncer {
    signal: ModifiedSignal,
    delay: Duration,
}

impl ChangeDebouncer {
    pub fn new(signal: ModifiedSignal, delay: Duration) -> Self {
        Self { signal, delay }
    }

    /// Debouncer using the configured update delay
    pub fn from_settings(signal: ModifiedSignal, settings: &CalendarSettings) -> Self {
        Self::new(signal, settings.update_delay())
    }

    /// Spawn the debouncer task
    pub fn start(self) -> DebouncerHandle {
        let (notify_tx, notify_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);

        let handle = tokio::spawn(run(self.signal, self.delay, notify_rx, shutdown_rx));

        DebouncerHandle {
            notify_tx,
            shutdown_tx,
            handle,
        }
    }
}

async fn run(
    signal: ModifiedSignal,
    delay: Duration,
    mut notify_rx: mpsc::UnboundedReceiver<()>,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    info!("Change debouncer started ({} ms)", delay.as_millis());
    let mut deadline: Option<Instant> = None;

    loop {
        let wake = deadline.unwrap_or_else(Instant::now);
        tokio::select! {
            // Notifications queued ahead of a shutdown still count
            biased;

            msg = notify_rx.recv() => match msg {
                Some(()) => {
                    debug!("Change noticed, waiting for quiet period");
                    deadline = Some(Instant::now() + delay);
                }
                None => break,
            },
            _ = sleep_until(wake), if deadline.is_some() => {
                deadline = None;
                signal.bump();
            }
            _ = shutdown_rx.recv() => {
                debug!("Shutdown requested");
                break;
            }
        }
    }

    if deadline.is_some() {
        signal.bump();
    }
    info!("Change debouncer stopped");
}
