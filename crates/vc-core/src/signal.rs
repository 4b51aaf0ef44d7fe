//! Process-wide "data changed" version counter
//!
//! The counter only ever moves forward. Readers compare the value they last
//! acted on with the current one; an increase is the only reason to re-fetch.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

/// Monotonic version counter shared between a change notifier and its readers.
#[derive(Debug, Clone)]
pub struct ModifiedSignal {
    tx: Arc<watch::Sender<u64>>,
}

impl ModifiedSignal {
    /// Create a signal starting at `initial`
    pub fn new(initial: u64) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Current version
    pub fn get(&self) -> u64 {
        *self.tx.borrow()
    }

    /// Advance the version by one and return the new value
    pub fn bump(&self) -> u64 {
        let mut next = 0;
        self.tx.send_modify(|version| {
            *version += 1;
            next = *version;
        });
        debug!("Data version bumped to {}", next);
        next
    }

    /// Receiver that wakes whenever the version changes
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }
}

impl Default for ModifiedSignal {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bump_is_monotonic() {
        let signal = ModifiedSignal::new(1);
        assert_eq!(signal.get(), 1);
        assert_eq!(signal.bump(), 2);
        assert_eq!(signal.bump(), 3);
        assert_eq!(signal.get(), 3);
    }

    #[test]
    fn test_clones_share_state() {
        let signal = ModifiedSignal::default();
        let other = signal.clone();
        other.bump();
        assert_eq!(signal.get(), 1);
    }

    #[tokio::test]
    async fn test_subscriber_sees_change() {
        let signal = ModifiedSignal::default();
        let mut rx = signal.subscribe();
        signal.bump();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 1);
    }
}
