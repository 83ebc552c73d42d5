//! The intent submitter: local user actions become optimistic store writes
//! plus asynchronous declarations to the server.
//!
//! The local write happens synchronously under the store lock, so the
//! presentation layer sees the block before any network round trip. The
//! declaration is fire-and-forget: a failure is logged and the speculative
//! state stands -- the next successful sync from the server is the
//! reconciliation mechanism either way.

use std::sync::{Arc, Mutex};

use sandbox_world::{BlockPos, BlockStore, BlockType, OwnerKey, StoreChange};
use tokio::sync::broadcast;

use crate::event_bus::{ChangeSource, WorldChangeBatch};
use crate::transport::Transport;

/// Duration sent with every declaration: never expires server-side.
pub const PERMANENT: u32 = 0;

pub struct IntentSubmitter {
    transport: Arc<Transport>,
    store: Arc<Mutex<BlockStore>>,
    bus: broadcast::Sender<WorldChangeBatch>,
    /// Provenance stamped on local optimistic records. The server's next
    /// sync overwrites it with whatever it actually recorded.
    identity: OwnerKey,
}

impl IntentSubmitter {
    pub fn new(
        transport: Arc<Transport>,
        store: Arc<Mutex<BlockStore>>,
        bus: broadcast::Sender<WorldChangeBatch>,
        identity: OwnerKey,
    ) -> Self {
        Self { transport, store, bus, identity }
    }

    /// Place (or re-type) a block at `pos`. The store reflects the change
    /// when this returns; the server learns about it on its own time.
    pub fn request_placement(&self, pos: BlockPos, kind: BlockType) {
        if kind.is_air() {
            // Declaring AIR is a removal, not a placement.
            self.request_removal(pos);
            return;
        }

        let change = {
            let mut store = self.store.lock().expect("block store poisoned");
            store.apply(pos, kind.clone(), self.identity.clone())
        };
        self.publish(change);

        let transport = Arc::clone(&self.transport);
        tokio::spawn(async move {
            if let Err(e) = transport.declare_block(pos, &kind, PERMANENT).await {
                tracing::warn!("Declaration of {} at {} failed: {}", kind, pos, e);
            }
        });
    }

    /// Clear the block at `pos`. No-op against the store when already empty,
    /// but the removal intent is still declared to the server.
    pub fn request_removal(&self, pos: BlockPos) {
        let change = {
            let mut store = self.store.lock().expect("block store poisoned");
            store.apply(pos, BlockType::air(), OwnerKey::default())
        };
        self.publish(change);

        let transport = Arc::clone(&self.transport);
        tokio::spawn(async move {
            if let Err(e) = transport.remove_block(pos).await {
                tracing::warn!("Removal at {} failed: {}", pos, e);
            }
        });
    }

    fn publish(&self, change: Option<StoreChange>) {
        if let Some(change) = change {
            let _ = self.bus.send(WorldChangeBatch {
                source: ChangeSource::Local,
                changes: vec![change].into(),
            });
        }
    }
}
