//! Snapshot-diff tracking of object creation.
//!
//! A tracker records the store population at construction time; anything
//! alive later that was not in the snapshot counts as new. This is how
//! callers capture the results of bulk operations without threading ids
//! through every call.

use im::OrdSet;

use datablock_foundation::ObjectId;

use crate::store::SharedStore;

/// Records which objects exist now, to ask later what appeared since.
pub struct ObjectTracker {
    store: SharedStore,
    baseline: OrdSet<ObjectId>,
}

impl ObjectTracker {
    /// Snapshots the store's current population.
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        let baseline = store.borrow().live_ids();
        Self { store, baseline }
    }

    /// Ids created since the snapshot, oldest first.
    #[must_use]
    pub fn new_objects(&self) -> Vec<ObjectId> {
        let store = self.store.borrow();
        let mut fresh: Vec<(u64, ObjectId)> = store
            .live_ids()
            .iter()
            .filter(|id| !self.baseline.contains(id))
            .filter_map(|id| store.creation_index(*id).ok().map(|seq| (seq, *id)))
            .collect();
        // Slot reuse means id order does not follow creation order
        fresh.sort_unstable();
        fresh.into_iter().map(|(_, id)| id).collect()
    }

    /// The most recently created object since the snapshot, if any.
    #[must_use]
    pub fn latest(&self) -> Option<ObjectId> {
        self.new_objects().pop()
    }

    /// Resets the snapshot to the store's current population.
    pub fn reset(&mut self) {
        self.baseline = self.store.borrow().live_ids();
    }
}
