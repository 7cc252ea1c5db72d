//! Concurrent wave simulation.
//!
//! Owns the enemy formation behind a coarse lock and drives it from three
//! kinds of worker threads: the motion scheduler, the fire scheduler, and one
//! collision subscription per tracked projectile.

pub mod ammo;
pub mod engine;
pub mod error;
pub mod formation;
pub mod stream;
pub mod systems;
pub mod task;
pub mod timer;
pub mod tracker;

pub use engine::WaveSimulation;
pub use error::SimError;
pub use invaders_core as core;
