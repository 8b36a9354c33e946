//! Optional background eviction of dead entries.
//!
//! Expiry is lazy, so an entry that is never read again stays in the medium.
//! The sweeper bounds that growth by periodically running
//! [`TtlStore::sweep_expired`] until shutdown is signalled.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::TtlStore;

/// Spawns the sweep loop. The first sweep runs one `period` after spawning.
pub fn spawn_sweeper(
    store: TtlStore,
    period: Duration,
    mut shutdown: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::debug!(period_ms = period.as_millis() as u64, "Cache sweeper started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(err) = store.sweep_expired().await {
                        tracing::warn!(error = %err, "Cache sweep failed");
                    }
                }
                _ = shutdown.recv() => {
                    tracing::debug!("Cache sweeper stopped");
                    break;
                }
            }
        }
    })
}
