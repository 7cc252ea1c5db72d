//! Registry of projectiles currently watched for collisions.
//!
//! Each entry owns the subscription task that watches it. Replacing or
//! removing an entry hands its task back to the caller, who drops it after
//! releasing the registry lock so the join never happens under the lock.

use std::collections::HashMap;

use invaders_core::types::ProjectileId;

use crate::stream::PositionReceiver;
use crate::task::TaskHandle;

/// A registered projectile.
pub struct TrackedProjectile {
    generation: u64,
    positions: PositionReceiver,
    subscription: TaskHandle,
}

impl TrackedProjectile {
    pub fn new(generation: u64, positions: PositionReceiver, subscription: TaskHandle) -> Self {
        Self {
            generation,
            positions,
            subscription,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

}

impl Drop for TrackedProjectile {
    fn drop(&mut self) {
        // The subscription may be parked on the stream rather than the
        // stop signal; wake it before the handle joins.
        self.subscription.request_stop();
        self.positions.wake();
    }
}

/// Projectile id → tracked entry.
#[derive(Default)]
pub struct ProjectileTracker {
    entries: HashMap<ProjectileId, TrackedProjectile>,
}

impl ProjectileTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `entry`, returning the entry it replaced.
    pub fn insert(
        &mut self,
        id: ProjectileId,
        entry: TrackedProjectile,
    ) -> Option<TrackedProjectile> {
        self.entries.insert(id, entry)
    }

    pub fn remove(&mut self, id: ProjectileId) -> Option<TrackedProjectile> {
        self.entries.remove(&id)
    }

    /// True if `generation` is the live registration for `id`.
    pub fn is_current(&self, id: ProjectileId, generation: u64) -> bool {
        self.entries
            .get(&id)
            .is_some_and(|e| e.generation == generation)
    }

    pub fn contains(&self, id: ProjectileId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn get(&self, id: ProjectileId) -> Option<&TrackedProjectile> {
        self.entries.get(&id)
    }

    pub fn ids(&self) -> Vec<ProjectileId> {
        let mut ids: Vec<_> = self.entries.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry.
    pub fn drain(&mut self) -> Vec<TrackedProjectile> {
        self.entries.drain().map(|(_, e)| e).collect()
    }
}
