//! Keyed, cancellable event fetching
//!
//! An [`EventResource`] keeps at most one fetch running per
//! `(source, version)` key. Starting a fetch for a newer key aborts the
//! previous one, and a result that arrives for a key nobody is waiting for
//! any more is dropped, so the published state always belongs to the latest
//! request.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::assembly::{EventAssembler, EventList};
use crate::{CalendarError, Result};

/// Identifies one fetch: the query source and the data version it was made for
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchKey {
    pub source: String,
    pub version: u64,
}

impl FetchKey {
    pub fn new(source: impl Into<String>, version: u64) -> Self {
        Self {
            source: source.into(),
            version,
        }
    }
}

/// Latest known outcome of the resource
#[derive(Debug, Clone)]
pub enum ResourceState {
    /// Nothing requested yet
    Idle,
    /// Waiting for the fetch identified by the key
    Loading(FetchKey),
    /// Events for the key
    Ready { key: FetchKey, events: Arc<EventList> },
    /// The fetch for the key failed
    Failed { key: FetchKey, error: CalendarError },
}

impl ResourceState {
    /// Key of the request this state belongs to
    pub fn key(&self) -> Option<&FetchKey> {
        match self {
            Self::Idle => None,
            Self::Loading(key) => Some(key),
            Self::Ready { key, .. } | Self::Failed { key, .. } => Some(key),
        }
    }

    /// Whether the current request has finished, successfully or not
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Ready { .. } | Self::Failed { .. })
    }
}

/// Single-slot register of fetched events
pub struct EventResource {
    assembler: Arc<EventAssembler>,
    source: String,
    state: Arc<watch::Sender<ResourceState>>,
    in_flight: Option<JoinHandle<()>>,
}

impl EventResource {
    /// Create a resource for `source` (empty selects the default task scan)
    pub fn new(assembler: Arc<EventAssembler>, source: impl Into<String>) -> Self {
        let (tx, _rx) = watch::channel(ResourceState::Idle);
        Self {
            assembler,
            source: source.into(),
            state: Arc::new(tx),
            in_flight: None,
        }
    }

    /// Query source in use
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Switch to another query source. Takes effect on the next trigger.
    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = source.into();
    }

    /// Snapshot of the current state
    pub fn state(&self) -> ResourceState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<ResourceState> {
        self.state.subscribe()
    }

    /// Request events for `version`.
    ///
    /// Returns `false` when the request is already pending or resolved, or
    /// when `version` is older than the one already requested for this
    /// source. Otherwise any running fetch is aborted and a new one started.
    /// Must be called from within a tokio runtime.
    pub fn trigger(&mut self, version: u64) -> bool {
        let key = FetchKey::new(self.source.clone(), version);

        if let Some(current) = self.state.borrow().key() {
            if *current == key {
                return false;
            }
            if current.source == key.source && current.version > key.version {
                debug!(
                    "Ignoring request for version {} behind {}",
                    key.version, current.version
                );
                return false;
            }
        }

        if let Some(handle) = self.in_flight.take() {
            if !handle.is_finished() {
                debug!("Cancelling superseded fetch");
            }
            handle.abort();
        }

        info!("Reloading events (version {})", key.version);
        self.state.send_replace(ResourceState::Loading(key.clone()));

        let assembler = Arc::clone(&self.assembler);
        let state = Arc::clone(&self.state);
        self.in_flight = Some(tokio::spawn(async move {
            // A panicking source must still settle the register
            let outcome = AssertUnwindSafe(assembler.assemble(&key.source))
                .catch_unwind()
                .await
                .unwrap_or(Err(CalendarError::FetchPanicked));
            publish(&state, key, outcome);
        }));
        true
    }

    /// Wait until the pending request settles and return its state
    pub async fn settled(&self) -> Result<ResourceState> {
        let mut rx = self.subscribe();
        let state = rx
            .wait_for(|s| s.is_settled() || matches!(s, ResourceState::Idle))
            .await
            .map_err(|e| CalendarError::Cancelled(e.to_string()))?;
        Ok(state.clone())
    }
}

impl Drop for EventResource {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

/// Store `outcome` if the register is still waiting for `key`.
fn publish(state: &watch::Sender<ResourceState>, key: FetchKey, outcome: Result<EventList>) {
    let version = key.version;
    let published = state.send_if_modified(move |current| {
        if !matches!(current, ResourceState::Loading(pending) if *pending == key) {
            return false;
        }
        *current = match outcome {
            Ok(events) => ResourceState::Ready {
                key,
                events: Arc::new(events),
            },
            Err(error) => {
                warn!("Event fetch failed: {}", error);
                ResourceState::Failed { key, error }
            }
        };
        true
    });

    if !published {
        debug!("Discarding stale result for version {}", version);
    }
}
