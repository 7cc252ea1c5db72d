//! Player commands sent from the presentation layer to the game loop.
//!
//! Commands are queued and applied at the next tick boundary.

use serde::{Deserialize, Serialize};

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// The play area was laid out or resized. Builds a fresh formation.
    Resize { width: f32, height: f32 },
    /// Start (or restart) motion and enemy fire.
    StartGame,
    /// Fire a projectile upward from the bottom of the play area at `x`.
    Fire { x: f32 },
    /// Refill the player's magazine by `rounds`.
    CollectAmmo { rounds: u32 },
}
