//! Core types and definitions for the enemy-wave simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! configuration, collaborator traits, events, snapshots, and constants.
//! It has no threads and no dependency on any runtime.

pub mod commands;
pub mod config;
pub mod constants;
pub mod enums;
pub mod events;
pub mod sinks;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
