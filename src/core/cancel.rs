//! Stop signal for test runs.

use std::sync::Arc;
use tokio::sync::watch;

/// Shared stop signal for one test run.
///
/// The stop button holds one clone, the run task another. Signalling is
/// sticky and idempotent: once stopped, a run stays stopped, and pressing
/// stop again (or after the run already finished) changes nothing. Whether a
/// run actually ended in the cancelled state is recorded in its terminal
/// `RunStatus`, not here.
#[derive(Debug, Clone)]
pub struct StopSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl StopSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Request the run to stop.
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }

    /// Whether stop has been requested.
    pub fn is_stopped(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once stop is requested; used in `select!` against the next
    /// read so the run unwinds between chunks.
    pub async fn stopped(&self) {
        let mut rx = self.tx.subscribe();
        while !*rx.borrow_and_update() {
            // Cannot fail while `self` keeps the sender alive.
            if rx.changed().await.is_err() {
                break;
            }
        }
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}
