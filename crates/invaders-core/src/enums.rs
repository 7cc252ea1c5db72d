//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Per-enemy hit/animation state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitState {
    /// Alive and drawn normally.
    #[default]
    Alive,
    /// Hit; the explosion plays for the remaining motion ticks.
    Exploding { frames_left: u8 },
    /// Explosion finished. Stays in the column so indices remain stable.
    Destroyed,
}

impl HitState {
    /// Advance the explosion by one frame.
    pub fn advance(self) -> Self {
        match self {
            HitState::Exploding { frames_left } if frames_left > 1 => HitState::Exploding {
                frames_left: frames_left - 1,
            },
            HitState::Exploding { .. } => HitState::Destroyed,
            other => other,
        }
    }
}

/// Lifecycle of a periodic scheduler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulerState {
    #[default]
    Idle,
    Running,
}

/// Ammo reserve level, used by the presentation layer to pick a colour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmmoLevel {
    #[default]
    Normal,
    Low,
}
