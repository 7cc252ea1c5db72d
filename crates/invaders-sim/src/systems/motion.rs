//! Motion scheduler — moves the formation down and detects the bottom bound.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use invaders_core::constants::HAPTIC_GAME_OVER_MS;
use invaders_core::enums::SchedulerState;
use invaders_core::sinks::Collaborators;

use crate::error::SimError;
use crate::formation::EnemyFormation;
use crate::task::{lock, TaskHandle};
use crate::timer::TickSource;

/// What one motion tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotionOutcome {
    /// The formation crossed the bottom and was reset.
    pub breached: bool,
    /// Enemies were moved.
    pub translated: bool,
}

/// Run one motion tick.
///
/// A breach resets the formation before translation, so translation then
/// runs on the emptied formation and is skipped.
pub fn run(
    formation: &Mutex<EnemyFormation>,
    collaborators: &Collaborators,
    elapsed: Duration,
) -> MotionOutcome {
    let outcome = {
        let mut formation = lock(formation);
        let height = formation.viewport().height;
        let breached = formation.has_any_column_reached_bound(height);
        if breached {
            formation.reset();
        }
        let translated = !formation.is_empty();
        if translated {
            formation.translate_all(elapsed);
        }
        MotionOutcome {
            breached,
            translated,
        }
    };

    if outcome.breached {
        log::info!("formation reached the bottom; game over");
        collaborators.events.on_game_over();
        collaborators.haptics.vibrate(HAPTIC_GAME_OVER_MS, None);
        collaborators.redraw.request_redraw();
    }
    if outcome.translated {
        log::trace!("formation moved {:?}", elapsed);
        collaborators.redraw.request_redraw();
    }
    outcome
}

/// Drives [`run`] from a tick source. At most one loop runs at a time.
pub struct MotionScheduler {
    formation: Arc<Mutex<EnemyFormation>>,
    collaborators: Collaborators,
    task: Option<TaskHandle>,
}

impl MotionScheduler {
    pub fn new(formation: Arc<Mutex<EnemyFormation>>, collaborators: Collaborators) -> Self {
        Self {
            formation,
            collaborators,
            task: None,
        }
    }

    /// Start ticking, replacing any loop already running.
    pub fn start(&mut self, mut ticks: impl TickSource) -> Result<(), SimError> {
        self.stop();

        let formation = self.formation.clone();
        let collaborators = self.collaborators.clone();
        let task = TaskHandle::spawn("invaders-motion", move |stop| {
            while let Some(elapsed) = ticks.next_tick(&stop) {
                run(&formation, &collaborators, elapsed);
            }
        })?;

        log::debug!("motion scheduler started");
        self.task = Some(task);
        Ok(())
    }

    /// Stop ticking. No-op when idle.
    pub fn stop(&mut self) {
        if let Some(mut task) = self.task.take() {
            task.stop();
            log::debug!("motion scheduler stopped");
        }
    }

    pub fn state(&self) -> SchedulerState {
        match &self.task {
            Some(task) if !task.is_finished() => SchedulerState::Running,
            _ => SchedulerState::Idle,
        }
    }
}

impl Drop for MotionScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
