//! Fire control — picks a random column and asks the presentation layer to
//! launch a projectile from its last visible enemy.

use std::sync::{Arc, Mutex};

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use invaders_core::enums::SchedulerState;
use invaders_core::sinks::EventSink;

use crate::error::SimError;
use crate::formation::EnemyFormation;
use crate::task::{lock, TaskHandle};
use crate::timer::TickSource;

/// Run one fire tick. Returns the launch position if an enemy fired.
pub fn run(
    formation: &Mutex<EnemyFormation>,
    events: &dyn EventSink,
    rng: &mut impl Rng,
) -> Option<Vec2> {
    let origin = {
        let formation = lock(formation);
        let columns = formation.column_count();
        if columns == 0 {
            return None;
        }
        let column = rng.gen_range(0..columns);
        formation.fire_origin(column)
    }?;

    events.on_canon_ready(origin.x, origin.y);
    Some(origin)
}

/// Drives [`run`] from its own tick source, independently of motion.
pub struct FireScheduler {
    formation: Arc<Mutex<EnemyFormation>>,
    events: Arc<dyn EventSink>,
    seed: u64,
    launches: u64,
    task: Option<TaskHandle>,
}

impl FireScheduler {
    pub fn new(formation: Arc<Mutex<EnemyFormation>>, events: Arc<dyn EventSink>, seed: u64) -> Self {
        Self {
            formation,
            events,
            seed,
            launches: 0,
            task: None,
        }
    }

    /// Start firing, replacing any loop already running. Each start gets its
    /// own deterministic column sequence derived from the seed.
    pub fn start(&mut self, mut ticks: impl TickSource) -> Result<(), SimError> {
        self.stop();

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed.wrapping_add(self.launches));
        self.launches += 1;

        let formation = self.formation.clone();
        let events = self.events.clone();
        let task = TaskHandle::spawn("invaders-fire", move |stop| {
            while ticks.next_tick(&stop).is_some() {
                run(&formation, events.as_ref(), &mut rng);
            }
        })?;

        log::debug!("fire scheduler started");
        self.task = Some(task);
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(mut task) = self.task.take() {
            task.stop();
            log::debug!("fire scheduler stopped");
        }
    }

    pub fn state(&self) -> SchedulerState {
        match &self.task {
            Some(task) if !task.is_finished() => SchedulerState::Running,
            _ => SchedulerState::Idle,
        }
    }
}

impl Drop for FireScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
