use std::process::ExitCode;
use std::time::Duration;

use invaders_app::ipc;
use invaders_app::state::AppState;
use invaders_core::commands::PlayerCommand;
use invaders_core::config::SimConfig;

const VIEWPORT_WIDTH: f32 = 600.0;
const VIEWPORT_HEIGHT: f32 = 1000.0;
const VOLLEYS: usize = 5;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => match SimConfig::load(&path) {
            Ok(config) => {
                log::info!("loaded config from {path}");
                config
            }
            Err(e) => {
                log::error!("failed to load config from {path}: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => SimConfig::default(),
    };

    match run_session(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("session failed: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Play a short scripted session: one volley per column, repeated.
fn run_session(config: SimConfig) -> Result<(), ipc::AppError> {
    let columns = config.column_count.max(1);
    let state = AppState::new();

    ipc::start_simulation(&state, config)?;
    ipc::send_command(
        &state,
        PlayerCommand::Resize {
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,
        },
    )?;
    ipc::send_command(&state, PlayerCommand::StartGame)?;

    let cell = VIEWPORT_WIDTH / columns as f32;
    for volley in 0..VOLLEYS {
        for column in 0..columns {
            let x = cell * column as f32 + cell / 2.0;
            ipc::send_command(&state, PlayerCommand::Fire { x })?;
            std::thread::sleep(Duration::from_millis(120));
        }
        log::debug!("volley {} fired", volley + 1);
    }
    std::thread::sleep(Duration::from_secs(2));

    if let Some(snapshot) = ipc::get_snapshot(&state)? {
        log::info!(
            "tick {}: {} kills, {} waves cleared, {} rounds left, game over: {}",
            snapshot.tick,
            snapshot.kills,
            snapshot.waves_cleared,
            snapshot.ammo,
            snapshot.game_over
        );
        match serde_json::to_string(&snapshot) {
            Ok(json) => log::info!("final snapshot: {json}"),
            Err(e) => log::warn!("could not serialize snapshot: {e}"),
        }
    }

    ipc::stop_simulation(&state)
}
