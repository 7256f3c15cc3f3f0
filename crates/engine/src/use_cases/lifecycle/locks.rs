//! Per-world mutual exclusion for mutating lifecycle operations.

use std::sync::Arc;

use dashmap::DashMap;
use realmhost_domain::WorldId;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Lock table keyed by world id.
///
/// Start/stop/delete for the same world must never interleave; reads
/// (inspect, state resolution) take no lock and may observe transient
/// intermediate states.
#[derive(Default)]
pub struct WorldLocks {
    locks: DashMap<WorldId, Arc<Mutex<()>>>,
}

impl WorldLocks {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Acquire the lock for one world, waiting if a mutating operation for
    /// it is already in flight.
    pub async fn acquire(&self, world_id: WorldId) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(world_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }
}
