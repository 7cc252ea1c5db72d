//! Application state shared between the caller and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use invaders_core::commands::PlayerCommand;
use invaders_core::enums::AmmoLevel;
use invaders_core::state::FormationSnapshot;

/// Commands sent to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to apply at the next tick.
    PlayerCommand(PlayerCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Everything the presentation layer needs to draw one frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoopSnapshot {
    pub tick: u64,
    pub formation: FormationSnapshot,
    /// Player projectiles still in flight.
    pub projectiles: Vec<Vec2>,
    pub ammo: u32,
    pub ammo_level: AmmoLevel,
    pub kills: u32,
    pub waves_cleared: u32,
    pub game_over: bool,
}

/// Shared application state.
///
/// - `command_tx` is `None` until the loop is started
/// - `latest_snapshot` is shared with the game loop thread
pub struct AppState {
    /// Channel sender to forward commands to the game loop thread.
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    /// Latest snapshot for synchronous polling.
    /// Updated by the game loop thread after each tick.
    pub latest_snapshot: Arc<Mutex<Option<LoopSnapshot>>>,
    /// The game loop thread, joined on shutdown.
    pub loop_thread: Mutex<Option<std::thread::JoinHandle<()>>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
            loop_thread: Mutex::new(None),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.command_tx
            .lock()
            .map(|tx| tx.is_some())
            .unwrap_or(false)
    }
}
