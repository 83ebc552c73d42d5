//! Store-change event bus feeding the presentation layer.
//!
//! Every path that mutates the block store (full-state reconciliation, tick
//! updates, local optimistic writes) publishes a [`WorldChangeBatch`] to a
//! shared `tokio::sync::broadcast` channel. Presentation adapters subscribe
//! and mirror the changes; they never mutate the store themselves.

use std::sync::Arc;

use sandbox_world::StoreChange;

/// Recommended capacity for the broadcast channel. 256 batches of headroom
/// covers a full-rebuild burst without lagging a live renderer.
pub const BUS_CAPACITY: usize = 256;

/// Which sync path produced a batch of store changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeSource {
    /// Full-snapshot reconciliation (bootstrap). Subscribers should treat
    /// this as a teardown-and-rebuild, not an incremental edit.
    FullSync,
    /// An incremental tick-update poll.
    Tick,
    /// A local optimistic write, applied before the server has acknowledged.
    Local,
}

/// A batch of store changes applied atomically under the store lock.
///
/// `Arc<[...]>` so cloning per subscriber is a refcount bump.
#[derive(Clone, Debug)]
pub struct WorldChangeBatch {
    pub source: ChangeSource,
    pub changes: Arc<[StoreChange]>,
}
