use std::sync::{Arc, PoisonError, RwLock};

use crate::core::ranking::Snapshot;

type SharedSnapshot = Arc<RwLock<Option<Arc<Snapshot>>>>;

/// Latest ranking known to the process.
///
/// Cloning gives another handle on the same snapshot. The lock only ever
/// guards the swap of an `Arc`, so readers are never held up by a refresh.
#[derive(Clone, Default)]
pub struct SnapshotCache {
    data: SharedSnapshot,
}

impl SnapshotCache {
    pub fn new() -> SnapshotCache {
        SnapshotCache::default()
    }

    /// Current snapshot, `None` until the first successful write.
    pub fn read(&self) -> Option<Arc<Snapshot>> {
        // Only a complete Arc is ever stored, so a poisoned lock still holds a valid snapshot.
        let data = self.data.read().unwrap_or_else(PoisonError::into_inner);
        data.clone()
    }

    /// Installs `snapshot` unless a snapshot of the same or a later generation
    /// is already in place. Returns whether it was installed.
    pub fn write(&self, snapshot: Snapshot) -> bool {
        let snapshot = Arc::new(snapshot);
        let previous = {
            let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);
            if data
                .as_ref()
                .is_some_and(|current| current.generation >= snapshot.generation)
            {
                return false;
            }
            data.replace(snapshot)
        };
        // Released outside the lock: dropping the last handle frees the whole ranking.
        drop(previous);
        true
    }

    pub fn generation(&self) -> Option<u64> {
        self.read().map(|snapshot| snapshot.generation)
    }

    pub fn cache_size(&self) -> usize {
        self.read().map_or(0, |snapshot| snapshot.ranking.len())
    }
}
