//! Collision engine — watches every tracked projectile's position stream and
//! resolves hits against the formation.
//!
//! Each projectile gets its own subscription task. Re-tracking an id replaces
//! only that id's subscription, so other projectiles keep their watchers.
//!
//! Lock order is tracker first, formation second. Sinks are called after
//! both locks are released.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use glam::Vec2;

use invaders_core::constants::*;
use invaders_core::sinks::Collaborators;
use invaders_core::types::ProjectileId;

use crate::error::SimError;
use crate::formation::{EnemyFormation, EnemyRef};
use crate::stream::PositionReceiver;
use crate::task::{lock, TaskHandle};
use crate::tracker::{ProjectileTracker, TrackedProjectile};

/// Result of evaluating one position update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Evaluation {
    /// No enemy under the projectile.
    Miss,
    /// The projectile destroyed this enemy and was removed.
    Hit {
        enemy: EnemyRef,
        wave_cleared: bool,
    },
    /// The projectile is no longer registered under this generation.
    Stale,
}

struct Inner {
    formation: Arc<Mutex<EnemyFormation>>,
    tracker: Mutex<ProjectileTracker>,
    collaborators: Collaborators,
    next_generation: AtomicU64,
}

impl Inner {
    fn evaluate(&self, id: ProjectileId, generation: u64, position: Vec2) -> Evaluation {
        let (enemy, wave_cleared, retired) = {
            let mut tracker = lock(&self.tracker);
            if !tracker.is_current(id, generation) {
                return Evaluation::Stale;
            }

            let mut formation = lock(&self.formation);
            let Some(enemy) = formation.find_hit(position) else {
                return Evaluation::Miss;
            };
            formation.mark_hit(enemy);
            let wave_cleared = formation.take_wave_clear();
            drop(formation);

            (enemy, wave_cleared, tracker.remove(id))
        };

        log::debug!(
            "{} at ({:.1}, {:.1}) hit enemy {}/{}",
            id,
            position.x,
            position.y,
            enemy.column,
            enemy.index
        );

        let sinks = &self.collaborators;
        sinks.collisions.on_collision(id);
        sinks
            .haptics
            .vibrate(HAPTIC_ENEMY_HIT_MS, Some(HAPTIC_ENEMY_HIT_AMPLITUDE));
        sinks.redraw.request_redraw();

        if wave_cleared {
            let ammo = sinks.ammo.ammo_count();
            log::info!("wave cleared with {} ammo left", ammo);
            sinks.haptics.vibrate(HAPTIC_WAVE_CLEAR_MS, None);
            sinks.events.on_all_eliminated(ammo);
        }

        // Our own subscription; its handle skips the self-join.
        drop(retired);

        Evaluation::Hit {
            enemy,
            wave_cleared,
        }
    }
}

/// Watches tracked projectiles against the shared formation.
pub struct CollisionEngine {
    inner: Arc<Inner>,
}

impl CollisionEngine {
    pub fn new(formation: Arc<Mutex<EnemyFormation>>, collaborators: Collaborators) -> Self {
        Self {
            inner: Arc::new(Inner {
                formation,
                tracker: Mutex::new(ProjectileTracker::new()),
                collaborators,
                next_generation: AtomicU64::new(0),
            }),
        }
    }

    /// Start watching `positions` for projectile `id`.
    ///
    /// If `id` is already tracked its old subscription is stopped and
    /// replaced. The current position is evaluated straight away.
    pub fn track(&self, id: ProjectileId, positions: PositionReceiver) -> Result<(), SimError> {
        let generation = self.inner.next_generation.fetch_add(1, Ordering::Relaxed);

        let replaced = {
            let mut tracker = lock(&self.inner.tracker);

            // Spawned under the tracker lock: the worker cannot evaluate
            // before its entry exists.
            let inner = self.inner.clone();
            let mut watched = positions.clone();
            let subscription = TaskHandle::spawn(format!("invaders-{id}"), move |stop| {
                while let Some(position) = watched.wait_for_update(&stop) {
                    match inner.evaluate(id, generation, position) {
                        Evaluation::Miss => continue,
                        Evaluation::Hit { .. } | Evaluation::Stale => break,
                    }
                }
                log::trace!("{} subscription finished", id);
            })?;

            tracker.insert(
                id,
                TrackedProjectile::new(generation, positions, subscription),
            )
        };

        if replaced.is_some() {
            log::debug!("{} re-tracked; previous subscription replaced", id);
        }
        // Joins the replaced subscription now that the lock is free.
        drop(replaced);
        Ok(())
    }

    /// Stop watching `id`. Returns `false` if it was not tracked.
    pub fn remove_projectile(&self, id: ProjectileId) -> bool {
        let removed = lock(&self.inner.tracker).remove(id);
        removed.is_some()
    }

    /// Stop every subscription.
    pub fn stop_all(&self) {
        let drained = lock(&self.inner.tracker).drain();
        if !drained.is_empty() {
            log::debug!("stopping {} collision subscriptions", drained.len());
        }
        drop(drained);
    }

    pub fn is_tracked(&self, id: ProjectileId) -> bool {
        lock(&self.inner.tracker).contains(id)
    }

    pub fn tracked_ids(&self) -> Vec<ProjectileId> {
        lock(&self.inner.tracker).ids()
    }

    pub fn tracked_count(&self) -> usize {
        lock(&self.inner.tracker).len()
    }

    /// Evaluate `position` for `id` synchronously, as its subscription would.
    pub fn evaluate_now(&self, id: ProjectileId, position: Vec2) -> Evaluation {
        let generation = match lock(&self.inner.tracker).get(id) {
            Some(entry) => entry.generation(),
            None => return Evaluation::Stale,
        };
        self.inner.evaluate(id, generation, position)
    }
}

impl Drop for CollisionEngine {
    fn drop(&mut self) {
        self.stop_all();
    }
}
