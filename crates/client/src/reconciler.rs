//! The state reconciler: bootstrap, then poll forever.
//!
//! Owns the sync lifecycle against the server. Bootstrap fetches the
//! server's identity key (best-effort) and the full world snapshot
//! (required, bounded retries); only then does the tick poll loop start.
//! Every application acquires the store lock just long enough to apply an
//! already-fetched response -- no lock is ever held across an await.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Context;
use sandbox_world::{BlockStore, OwnerKey, StoreChange};
use tokio::sync::broadcast;

use crate::config::SyncConfig;
use crate::event_bus::{ChangeSource, WorldChangeBatch};
use crate::transport::Transport;
use crate::wire::{BlockState, TickUpdate};

pub struct Reconciler {
    transport: Arc<Transport>,
    store: Arc<Mutex<BlockStore>>,
    bus: broadcast::Sender<WorldChangeBatch>,
    poll_interval: Duration,
    bootstrap_attempts: u32,
    retry_delay: Duration,
}

impl Reconciler {
    pub fn new(
        transport: Arc<Transport>,
        store: Arc<Mutex<BlockStore>>,
        bus: broadcast::Sender<WorldChangeBatch>,
        config: &SyncConfig,
    ) -> Self {
        Self {
            transport,
            store,
            bus,
            poll_interval: config.poll_interval,
            bootstrap_attempts: config.bootstrap_attempts.max(1),
            retry_delay: config.retry_delay,
        }
    }

    /// Establish the initial world view. Must complete before [`run`] is
    /// called.
    ///
    /// The identity key fetch is non-fatal: on failure we log and return
    /// `None` for the key. The full-state fetch is retried up to the
    /// configured number of attempts with a fixed delay; exhausting them is fatal
    /// to initialization and surfaces as an error. Nothing is applied to the
    /// store until a fetch succeeds wholesale.
    ///
    /// [`run`]: Reconciler::run
    pub async fn bootstrap(&self) -> anyhow::Result<Option<OwnerKey>> {
        let server_key = match self.transport.fetch_public_key().await {
            Ok(key) => {
                tracing::info!("Server identity key received ({} bytes)", key.len());
                Some(key)
            }
            Err(e) => {
                tracing::warn!("Could not fetch server identity key: {}", e);
                None
            }
        };

        let snapshot = self.fetch_full_state().await?;
        let count = snapshot.len();
        let changes = {
            let mut store = self.store.lock().expect("block store poisoned");
            store.replace_all(snapshot.into_iter().map(BlockState::into_parts))
        };
        tracing::info!("Initial world state applied: {} entries", count);
        self.publish(ChangeSource::FullSync, changes);

        Ok(server_key)
    }

    /// Poll for tick updates at the configured interval, forever.
    ///
    /// A failed poll is logged and skipped; the next attempt waits for the
    /// regular interval, no backoff escalation. The loop only ends when its
    /// task is cancelled at shutdown.
    pub async fn run(&self) {
        let mut interval = tokio::time::interval(self.poll_interval);
        // The first tick fires immediately; bootstrap already applied a
        // fresher view than any delta could, so skip it.
        interval.tick().await;

        tracing::info!("Polling for tick updates every {:?}", self.poll_interval);

        loop {
            interval.tick().await;
            match self.transport.fetch_tick_updates().await {
                Ok(updates) => self.apply_tick_updates(updates),
                Err(e) => {
                    tracing::warn!("Tick poll failed, retrying next interval: {}", e);
                }
            }
        }
    }

    async fn fetch_full_state(&self) -> anyhow::Result<Vec<BlockState>> {
        let mut last_error = None;
        for attempt in 1..=self.bootstrap_attempts {
            match self.transport.fetch_world_state().await {
                Ok(snapshot) => return Ok(snapshot),
                Err(e) => {
                    tracing::warn!(
                        "Full state fetch attempt {}/{} failed: {}",
                        attempt,
                        self.bootstrap_attempts,
                        e,
                    );
                    last_error = Some(e);
                    if attempt < self.bootstrap_attempts {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }
        Err(last_error.expect("at least one attempt was made"))
            .context("could not fetch the initial world state")
    }

    /// Apply one poll response in array order, publish the visible changes.
    /// An empty response never takes the lock and never emits a batch.
    fn apply_tick_updates(&self, updates: Vec<TickUpdate>) {
        if updates.is_empty() {
            return;
        }
        let received = updates.len();
        let changes: Vec<StoreChange> = {
            let mut store = self.store.lock().expect("block store poisoned");
            updates
                .into_iter()
                .filter_map(|update| {
                    let (pos, kind, owner) = update.entry.into_parts();
                    tracing::trace!("Tick update at {} (server time {})", pos, update.timestamp);
                    store.apply(pos, kind, owner)
                })
                .collect()
        };
        tracing::debug!("Applied {} tick updates, {} visible changes", received, changes.len());
        self.publish(ChangeSource::Tick, changes);
    }

    fn publish(&self, source: ChangeSource, changes: Vec<StoreChange>) {
        if changes.is_empty() {
            return;
        }
        // No subscribers is fine; the store is still authoritative.
        let _ = self.bus.send(WorldChangeBatch { source, changes: changes.into() });
    }
}
