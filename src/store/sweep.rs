//! Background eviction of expired key records.
//!
//! The sweep only bounds memory use. Verification re-checks expiry on every
//! lookup, so a late or skipped tick never changes a classification.

use crate::clock::Clock;
use crate::store::memory::KeyStore;
use crate::KeyGateError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Handle to a running sweep task.
///
/// Call [`shutdown`](Self::shutdown) to stop the task and wait for it.
/// Dropping the handle closes the signal channel, which also stops the task
/// at its next wake-up.
#[derive(Debug)]
pub struct SweepHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweepHandle {
    /// Signal the task to stop and wait until it has exited.
    pub async fn shutdown(self) {
        // The receiver may already be gone if the task panicked.
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.task.await {
            warn!("Key sweeper exited abnormally: {}", e);
        }
    }

    /// Whether the task has already exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl KeyStore {
    /// Spawn the periodic expiry sweep for this store.
    ///
    /// The first sweep runs one `period` after the call. Must be called from
    /// within a Tokio runtime.
    ///
    /// # Errors
    /// Returns `ConfigError` if `period` is zero.
    pub fn spawn_sweeper(
        &self,
        period: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<SweepHandle, KeyGateError> {
        if period.is_zero() {
            return Err(KeyGateError::ConfigError(
                "sweep interval must be positive".to_string(),
            ));
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let store = self.clone();

        info!(interval = ?period, "Starting key sweeper");
        let task = tokio::spawn(run_sweeper(store, period, clock, shutdown_rx));

        Ok(SweepHandle { shutdown_tx, task })
    }
}

async fn run_sweeper(
    store: KeyStore,
    period: Duration,
    clock: Arc<dyn Clock>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // First tick completes immediately.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            // Err means every sender is gone; treat it as a stop signal too.
            _ = shutdown_rx.changed() => break,
        }

        let removed = store.sweep_expired(clock.now_utc());
        if removed > 0 {
            debug!(removed, remaining = store.len(), "Swept expired keys");
        }
    }

    info!("Key sweeper stopped");
}
