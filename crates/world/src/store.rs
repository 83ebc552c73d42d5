//! The block record store and its reconciliation algorithm.
//!
//! One mapping from coordinate to block record, owned exclusively by the
//! sync layer. Remote snapshots, remote tick updates, and local optimistic
//! writes all funnel through [`BlockStore::apply`], so every path agrees on
//! what AIR, insert, and overwrite mean. Presentation layers never touch the
//! store; they mirror the [`StoreChange`] values it returns.

use indexmap::IndexMap;

use crate::block::{BlockRecord, BlockType, OwnerKey};
use crate::position::BlockPos;

/// A single observable store mutation, reported to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    /// A block appeared at a previously empty coordinate.
    Placed { pos: BlockPos, kind: BlockType },
    /// An existing block's type or owner was overwritten in place.
    Replaced { pos: BlockPos, kind: BlockType },
    /// The block at this coordinate was cleared.
    Cleared { pos: BlockPos },
}

/// In-memory mapping from coordinate to block record.
///
/// Not internally synchronized -- all mutation must be serialized by the
/// caller (the client holds it behind one mutex). Insertion order is
/// preserved so full-rebuild notifications replay deterministically.
#[derive(Debug, Default)]
pub struct BlockStore {
    records: IndexMap<BlockPos, BlockRecord>,
}

impl BlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, pos: &BlockPos) -> Option<&BlockRecord> {
        self.records.get(pos)
    }

    pub fn contains(&self, pos: &BlockPos) -> bool {
        self.records.contains_key(pos)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BlockPos, &BlockRecord)> {
        self.records.iter()
    }

    /// Apply one world-state entry.
    ///
    /// AIR clears the coordinate (no-op when already empty); anything else
    /// inserts or overwrites the record wholesale -- no field-level merging.
    /// Returns the resulting change, or `None` when the store is untouched.
    pub fn apply(&mut self, pos: BlockPos, kind: BlockType, owner: OwnerKey) -> Option<StoreChange> {
        if kind.is_air() {
            return self
                .records
                .shift_remove(&pos)
                .map(|_| StoreChange::Cleared { pos });
        }
        let record = BlockRecord { kind: kind.clone(), owner };
        match self.records.insert(pos, record) {
            Some(_) => Some(StoreChange::Replaced { pos, kind }),
            None => Some(StoreChange::Placed { pos, kind }),
        }
    }

    /// Reconcile against a complete authoritative snapshot.
    ///
    /// Clears every existing record, then applies the snapshot entries in
    /// order. Coordinates absent from the snapshot end up absent here, and a
    /// coordinate repeated in the snapshot resolves to its last entry, so the
    /// store converges on the snapshot regardless of prior contents. The
    /// returned changes replay the full teardown + rebuild for presentation.
    pub fn replace_all<I>(&mut self, entries: I) -> Vec<StoreChange>
    where
        I: IntoIterator<Item = (BlockPos, BlockType, OwnerKey)>,
    {
        let mut changes: Vec<StoreChange> = self
            .records
            .drain(..)
            .map(|(pos, _)| StoreChange::Cleared { pos })
            .collect();
        let cleared = changes.len();
        for (pos, kind, owner) in entries {
            changes.extend(self.apply(pos, kind, owner));
        }
        tracing::trace!(
            "Snapshot reconciled: {} records cleared, {} now present",
            cleared,
            self.records.len(),
        );
        changes
    }
}
