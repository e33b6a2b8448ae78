//! Broadcaster for pushing notification events to every connected admin.
//!
//! Each event is serialized once and queued on every registered connection
//! without waiting. Connections whose queue is closed or full are pruned from
//! the registry, which in turn makes their session task shut the socket.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::db::store::Store;
use crate::models::donation::Donation;
use crate::models::stats::DashboardStats;

use super::events::ServerEvent;
use super::registry::{ConnectionRegistry, DeliveryError, Frame};

/// Result of one broadcast.
///
/// Route handlers drop it; the counts are already logged at debug level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastOutcome {
    /// Connections the event was queued on.
    pub recipients: usize,
    /// Connections removed because delivery failed.
    pub pruned: usize,
}

/// The broadcast hub. Cloneable, store in AppState.
#[derive(Clone)]
pub struct Broadcaster {
    registry: Arc<ConnectionRegistry>,
}

impl Broadcaster {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Deliver `event` to all connections registered at call time.
    ///
    /// Never fails: a connection that cannot accept the frame is dropped and
    /// the rest still receive it.
    pub fn broadcast(&self, event: &ServerEvent) -> BroadcastOutcome {
        let json = match serde_json::to_string(event) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(?e, kind = event.kind(), "failed to serialize event");
                return BroadcastOutcome::default();
            }
        };
        let frame = Frame::from(json);

        let mut outcome = BroadcastOutcome::default();
        for handle in self.registry.snapshot() {
            match handle.try_deliver(frame.clone()) {
                Ok(()) => outcome.recipients += 1,
                Err(reason) => {
                    if self.registry.unregister(&handle.id) {
                        outcome.pruned += 1;
                    }
                    match reason {
                        DeliveryError::Full => tracing::warn!(
                            connection_id = %handle.id,
                            username = %handle.username,
                            "admin connection not draining, dropping it"
                        ),
                        DeliveryError::Closed => tracing::debug!(
                            connection_id = %handle.id,
                            "pruned closed admin connection"
                        ),
                    }
                }
            }
        }

        tracing::debug!(
            kind = event.kind(),
            recipients = outcome.recipients,
            pruned = outcome.pruned,
            "broadcast event"
        );
        outcome
    }

    pub fn announce_new_donation(&self, donation: &Donation) -> BroadcastOutcome {
        self.broadcast(&ServerEvent::new_donation(donation))
    }

    pub fn announce_verification(&self, donation: &Donation) -> BroadcastOutcome {
        self.broadcast(&ServerEvent::donation_verified(donation))
    }

    pub fn announce_stats(&self, stats: DashboardStats) -> BroadcastOutcome {
        self.broadcast(&ServerEvent::stats_update(stats))
    }
}

/// Periodically push fresh dashboard aggregates while anyone is listening.
pub fn spawn_stats_ticker(
    broadcaster: Broadcaster,
    store: Arc<dyn Store>,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker.tick().await; // First tick fires immediately; skip it.

        loop {
            ticker.tick().await;
            if broadcaster.registry().active_count() == 0 {
                continue;
            }
            match store.stats().await {
                Ok(stats) => {
                    broadcaster.announce_stats(stats);
                }
                Err(e) => tracing::warn!(error = %e.message, "stats ticker failed to load aggregates"),
            }
        }
    })
}
