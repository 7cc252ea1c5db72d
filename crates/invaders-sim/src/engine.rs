//! Wave simulation — the lifecycle owner for one formation.
//!
//! `WaveSimulation` owns the shared formation and the three workers that act
//! on it. It is headless: the presentation layer feeds it viewport sizes and
//! projectiles and receives everything else through [`Collaborators`].

use std::sync::{Arc, Mutex};

use invaders_core::config::SimConfig;
use invaders_core::constants::HAPTIC_WAVE_CLEAR_MS;
use invaders_core::enums::SchedulerState;
use invaders_core::sinks::Collaborators;
use invaders_core::state::FormationSnapshot;
use invaders_core::types::{ProjectileId, Viewport};

use crate::error::SimError;
use crate::formation::EnemyFormation;
use crate::stream::PositionReceiver;
use crate::systems::collision::CollisionEngine;
use crate::systems::fire_control::FireScheduler;
use crate::systems::motion::MotionScheduler;
use crate::task::lock;
use crate::timer::{IntervalTicker, TickSource};

/// The simulation engine for one formation.
pub struct WaveSimulation {
    config: SimConfig,
    formation: Arc<Mutex<EnemyFormation>>,
    collaborators: Collaborators,
    motion: MotionScheduler,
    fire: FireScheduler,
    collision: CollisionEngine,
}

impl WaveSimulation {
    /// Create a simulation. Nothing runs until [`start_game`](Self::start_game).
    pub fn new(config: SimConfig, collaborators: Collaborators) -> Self {
        let formation = Arc::new(Mutex::new(EnemyFormation::new(
            config.speed,
            config.motion_tick(),
        )));

        Self {
            motion: MotionScheduler::new(formation.clone(), collaborators.clone()),
            fire: FireScheduler::new(formation.clone(), collaborators.events.clone(), config.seed),
            collision: CollisionEngine::new(formation.clone(), collaborators.clone()),
            config,
            formation,
            collaborators,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// First layout (or a resize): build a fresh formation for the viewport.
    pub fn on_viewport_sized(&self, width: f32, height: f32) {
        self.initialize(Viewport::new(width, height));
    }

    /// Start the next wave in the current viewport.
    pub fn reset_wave(&self) {
        let viewport = lock(&self.formation).viewport();
        self.initialize(viewport);
    }

    fn initialize(&self, viewport: Viewport) {
        let cleared = {
            let mut formation = lock(&self.formation);
            formation.initialize(viewport, self.config.column_count, self.config.row_count);
            formation.take_wave_clear()
        };

        if cleared {
            log::warn!("formation has no enemies; wave cleared on arrival");
            let ammo = self.collaborators.ammo.ammo_count();
            self.collaborators.haptics.vibrate(HAPTIC_WAVE_CLEAR_MS, None);
            self.collaborators.events.on_all_eliminated(ammo);
        }
        self.collaborators.redraw.request_redraw();
    }

    /// Start motion and firing on wall-clock tickers from the config.
    pub fn start_game(&mut self) -> Result<(), SimError> {
        let motion = IntervalTicker::every(self.config.motion_tick());
        let fire = IntervalTicker::new(
            self.config.fire_initial_delay(),
            self.config.fire_interval(),
        );
        self.start_with(motion, fire)
    }

    /// Start motion and firing on the given tick sources, replacing any
    /// running loops.
    pub fn start_with(
        &mut self,
        motion: impl TickSource,
        fire: impl TickSource,
    ) -> Result<(), SimError> {
        self.motion.start(motion)?;
        if let Err(e) = self.fire.start(fire) {
            self.motion.stop();
            return Err(e);
        }
        log::info!("game started");
        Ok(())
    }

    /// Stop both schedulers and every collision subscription.
    pub fn detach(&mut self) {
        self.motion.stop();
        self.fire.stop();
        self.collision.stop_all();
        log::debug!("simulation detached");
    }

    /// Watch a projectile for collisions.
    pub fn track_projectile(
        &self,
        id: ProjectileId,
        positions: PositionReceiver,
    ) -> Result<(), SimError> {
        self.collision.track(id, positions)
    }

    /// Stop watching a projectile that left the screen or expired.
    pub fn remove_projectile(&self, id: ProjectileId) -> bool {
        self.collision.remove_projectile(id)
    }

    pub fn collision(&self) -> &CollisionEngine {
        &self.collision
    }

    pub fn motion_state(&self) -> SchedulerState {
        self.motion.state()
    }

    pub fn fire_state(&self) -> SchedulerState {
        self.fire.state()
    }

    pub fn snapshot(&self) -> FormationSnapshot {
        lock(&self.formation).snapshot()
    }

    /// Run `f` with the formation locked.
    pub fn with_formation<R>(&self, f: impl FnOnce(&mut EnemyFormation) -> R) -> R {
        f(&mut lock(&self.formation))
    }
}

impl Drop for WaveSimulation {
    fn drop(&mut self) {
        self.detach();
    }
}
