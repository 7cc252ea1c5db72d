//! Errors surfaced at the simulation boundary.
//!
//! Lookups inside the simulation never fail; a missing match is just `None`.
//! The only runtime failure is the OS refusing to give us a thread.

/// Simulation errors.
#[derive(thiserror::Error, Debug)]
pub enum SimError {
    /// A worker thread could not be spawned.
    #[error("failed to spawn {name} thread: {source}")]
    ThreadSpawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
}
