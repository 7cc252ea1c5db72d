//! Events the simulation reports to the presentation layer.

use serde::{Deserialize, Serialize};

use crate::types::ProjectileId;

/// Notifications emitted by the engine. Pure data; the presentation layer
/// decides how to show them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// No enemy in the formation is visible any more.
    AllEliminated { ammo_count: u32 },
    /// An enemy wants a projectile spawned from its position.
    CanonReady { x: f32, y: f32 },
    /// The formation reached the bottom of the viewport and was cleared.
    GameOver,
    /// A tracked projectile hit an enemy and should be destroyed by its owner.
    Collision { projectile: ProjectileId },
}

/// A single vibration request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vibration {
    pub duration_ms: u64,
    pub amplitude: Option<u8>,
}
