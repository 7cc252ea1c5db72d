//! Command handlers bridging a front end to the game loop thread.
//!
//! A windowed shell would expose these as its command surface; the headless
//! binary calls them directly.

use thiserror::Error;

use invaders_core::commands::PlayerCommand;
use invaders_core::config::SimConfig;

use crate::game_loop;
use crate::state::{AppState, GameLoopCommand, LoopSnapshot};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("simulation already running")]
    AlreadyRunning,
    #[error("simulation not started")]
    NotStarted,
    #[error("game loop thread has exited")]
    Disconnected,
    #[error("shared state lock poisoned")]
    Poisoned,
    #[error("failed to spawn game loop thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Start the simulation. Spawns the game loop thread if not already running.
pub fn start_simulation(state: &AppState, config: SimConfig) -> Result<(), AppError> {
    let mut tx_lock = state.command_tx.lock().map_err(|_| AppError::Poisoned)?;
    if tx_lock.is_some() {
        return Err(AppError::AlreadyRunning);
    }

    let (cmd_tx, handle) = game_loop::spawn_game_loop(config, state.latest_snapshot.clone())?;
    *tx_lock = Some(cmd_tx);
    *state.loop_thread.lock().map_err(|_| AppError::Poisoned)? = Some(handle);

    log::info!("simulation started");
    Ok(())
}

/// Send a player command to the simulation.
pub fn send_command(state: &AppState, command: PlayerCommand) -> Result<(), AppError> {
    let tx_lock = state.command_tx.lock().map_err(|_| AppError::Poisoned)?;

    match tx_lock.as_ref() {
        Some(tx) => tx
            .send(GameLoopCommand::PlayerCommand(command))
            .map_err(|_| AppError::Disconnected),
        None => Err(AppError::NotStarted),
    }
}

/// Get the latest snapshot synchronously (for polling / initial state).
pub fn get_snapshot(state: &AppState) -> Result<Option<LoopSnapshot>, AppError> {
    let lock = state.latest_snapshot.lock().map_err(|_| AppError::Poisoned)?;
    Ok(lock.clone())
}

/// Shut the game loop down and wait for its thread to exit.
pub fn stop_simulation(state: &AppState) -> Result<(), AppError> {
    let tx = state
        .command_tx
        .lock()
        .map_err(|_| AppError::Poisoned)?
        .take()
        .ok_or(AppError::NotStarted)?;
    // A loop that already exited has dropped its receiver; joining still applies.
    let _ = tx.send(GameLoopCommand::Shutdown);

    let handle = state
        .loop_thread
        .lock()
        .map_err(|_| AppError::Poisoned)?
        .take();
    if let Some(handle) = handle {
        if handle.join().is_err() {
            log::error!("game loop thread panicked");
        }
    }

    log::info!("simulation stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_send_before_start_fails() {
        let state = AppState::new();
        let err = send_command(&state, PlayerCommand::StartGame).unwrap_err();
        assert!(matches!(err, AppError::NotStarted));
        assert!(matches!(
            stop_simulation(&state).unwrap_err(),
            AppError::NotStarted
        ));
    }

    #[test]
    fn test_start_twice_fails() {
        let state = AppState::new();
        start_simulation(&state, SimConfig::default()).unwrap();
        assert!(state.is_running());

        let err = start_simulation(&state, SimConfig::default()).unwrap_err();
        assert!(matches!(err, AppError::AlreadyRunning));

        stop_simulation(&state).unwrap();
        assert!(!state.is_running());
    }

    #[test]
    fn test_fire_is_reflected_in_snapshot() {
        let state = AppState::new();
        start_simulation(&state, SimConfig::default()).unwrap();
        send_command(
            &state,
            PlayerCommand::Resize {
                width: 600.0,
                height: 1000.0,
            },
        )
        .unwrap();
        send_command(&state, PlayerCommand::Fire { x: 100.0 }).unwrap();

        let deadline = Instant::now() + Duration::from_secs(3);
        let mut ammo = None;
        while Instant::now() < deadline {
            if let Some(snap) = get_snapshot(&state).unwrap() {
                if snap.ammo < SimConfig::default().max_ammo {
                    ammo = Some(snap.ammo);
                    break;
                }
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(ammo, Some(SimConfig::default().max_ammo - 1));

        stop_simulation(&state).unwrap();
    }

    #[test]
    fn test_restart_after_stop() {
        let state = AppState::new();
        start_simulation(&state, SimConfig::default()).unwrap();
        stop_simulation(&state).unwrap();
        start_simulation(&state, SimConfig::default()).unwrap();
        stop_simulation(&state).unwrap();
    }
}
