//! Periodic and event-driven workers that operate on the shared formation.
//!
//! Each module exposes a pure-ish `run` step that takes the formation lock
//! for the shortest possible time, plus a scheduler that drives the step from
//! its own worker thread.

pub mod collision;
pub mod fire_control;
pub mod motion;
