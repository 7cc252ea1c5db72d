//! Headless host for the wave simulation.
//!
//! Stands in for the presentation layer: it owns the game loop thread,
//! moves the player's projectiles, reacts to simulation events, and keeps the
//! latest snapshot available for polling.

pub mod game_loop;
pub mod ipc;
pub mod state;

pub use invaders_core as core;
