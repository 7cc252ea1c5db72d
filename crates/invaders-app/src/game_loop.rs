//! Game loop thread — plays the presentation layer around the simulation.
//!
//! The simulation is created inside this thread because it's cleaner for
//! ownership. Commands arrive via `mpsc` channel. The simulation's own workers
//! report back through a [`ChannelSink`], which the loop drains every tick.

use std::collections::BTreeMap;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use glam::Vec2;

use invaders_core::commands::PlayerCommand;
use invaders_core::config::SimConfig;
use invaders_core::events::GameEvent;
use invaders_core::sinks::{AmmoSource, ChannelSink, Collaborators};
use invaders_core::types::{ProjectileId, Viewport};
use invaders_sim::ammo::AmmoStore;
use invaders_sim::stream::{position_channel, PositionSender};
use invaders_sim::WaveSimulation;

use crate::state::{GameLoopCommand, LoopSnapshot};

/// Upward distance a player projectile travels per tick.
pub const PLAYER_PROJECTILE_SPEED: f32 = 12.0;

/// A player projectile owned by the loop.
struct PlayerProjectile {
    position: Vec2,
    sender: PositionSender,
}

/// Loop-side state: the simulation plus everything the presentation layer
/// would normally own.
pub struct GameLoop {
    sim: WaveSimulation,
    events: mpsc::Receiver<GameEvent>,
    ammo: Arc<AmmoStore>,
    viewport: Option<Viewport>,
    projectiles: BTreeMap<ProjectileId, PlayerProjectile>,
    next_projectile: u64,
    tick: u64,
    kills: u32,
    waves_cleared: u32,
    game_over: bool,
}

impl GameLoop {
    pub fn new(config: SimConfig) -> Self {
        let (sink, events) = ChannelSink::new();
        let ammo = Arc::new(AmmoStore::new(config.max_ammo));
        let sim = WaveSimulation::new(config, Collaborators::from_sink(sink, ammo.clone()));

        Self {
            sim,
            events,
            ammo,
            viewport: None,
            projectiles: BTreeMap::new(),
            next_projectile: 0,
            tick: 0,
            kills: 0,
            waves_cleared: 0,
            game_over: false,
        }
    }

    pub fn simulation(&self) -> &WaveSimulation {
        &self.sim
    }

    /// Apply one player command.
    pub fn apply(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::Resize { width, height } => {
                self.viewport = Some(Viewport::new(width, height));
                self.sim.on_viewport_sized(width, height);
                self.game_over = false;
            }
            PlayerCommand::StartGame => {
                if self.game_over {
                    self.sim.reset_wave();
                    self.game_over = false;
                }
                if let Err(e) = self.sim.start_game() {
                    log::error!("failed to start game: {e}");
                }
            }
            PlayerCommand::Fire { x } => self.fire(x),
            PlayerCommand::CollectAmmo { rounds } => self.ammo.refill(rounds),
        }
    }

    fn fire(&mut self, x: f32) {
        let Some(viewport) = self.viewport else {
            log::debug!("fire ignored before layout");
            return;
        };
        if !self.ammo.consume() {
            log::debug!("fire ignored: out of ammo");
            return;
        }

        let id = ProjectileId(self.next_projectile);
        self.next_projectile += 1;
        let position = Vec2::new(x, viewport.height);
        let (sender, positions) = position_channel(position);

        if let Err(e) = self.sim.track_projectile(id, positions) {
            log::error!("could not track {id}: {e}");
            return;
        }
        self.projectiles
            .insert(id, PlayerProjectile { position, sender });
    }

    /// Advance projectiles and react to simulation events.
    pub fn step(&mut self) {
        self.tick += 1;
        self.advance_projectiles();
        self.drain_events();
    }

    fn advance_projectiles(&mut self) {
        let Some(viewport) = self.viewport else {
            return;
        };
        let mut gone = Vec::new();
        for (id, projectile) in self.projectiles.iter_mut() {
            projectile.position.y -= PLAYER_PROJECTILE_SPEED;
            if viewport.is_vertically_outside(projectile.position) {
                gone.push(*id);
            } else {
                projectile.sender.send(projectile.position);
            }
        }
        for id in gone {
            self.projectiles.remove(&id);
            self.sim.remove_projectile(id);
        }
    }

    fn drain_events(&mut self) {
        let mut next_wave = false;
        while let Ok(event) = self.events.try_recv() {
            match event {
                GameEvent::Collision { projectile } => {
                    self.projectiles.remove(&projectile);
                    self.kills += 1;
                }
                GameEvent::AllEliminated { ammo_count } => {
                    self.waves_cleared = self.waves_cleared.saturating_add(1);
                    log::info!(
                        "wave {} cleared with {} rounds left",
                        self.waves_cleared,
                        ammo_count
                    );
                    next_wave = true;
                }
                GameEvent::GameOver => {
                    self.game_over = true;
                    log::info!("game over after {} kills", self.kills);
                }
                GameEvent::CanonReady { x, y } => {
                    log::debug!("enemy fires from ({x:.1}, {y:.1})");
                }
            }
        }

        // An empty layout clears on arrival; rebuilding it would clear again.
        let config = self.sim.config();
        if next_wave && config.column_count > 0 && config.row_count > 0 {
            self.sim.reset_wave();
        }
    }

    pub fn snapshot(&self) -> LoopSnapshot {
        LoopSnapshot {
            tick: self.tick,
            formation: self.sim.snapshot(),
            projectiles: self.projectiles.values().map(|p| p.position).collect(),
            ammo: self.ammo.ammo_count(),
            ammo_level: self.ammo.level(),
            kills: self.kills,
            waves_cleared: self.waves_cleared,
            game_over: self.game_over,
        }
    }

    /// Stop the simulation's workers.
    pub fn shutdown(&mut self) {
        self.sim.detach();
        self.projectiles.clear();
    }
}

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and the thread handle.
pub fn spawn_game_loop(
    config: SimConfig,
    latest_snapshot: Arc<Mutex<Option<LoopSnapshot>>>,
) -> std::io::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<()>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("invaders-game-loop".into())
        .spawn(move || {
            run_game_loop(config, cmd_rx, &latest_snapshot);
        })?;

    Ok((cmd_tx, handle))
}

/// The game loop. Runs until Shutdown command or channel disconnect.
fn run_game_loop(
    config: SimConfig,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<LoopSnapshot>>,
) {
    let tick_duration = config.motion_tick();
    let mut game = GameLoop::new(config);
    let mut next_tick_time = Instant::now();

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => game.apply(cmd),
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    game.shutdown();
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Move projectiles, react to events
        game.step();

        // 3. Store latest snapshot for synchronous polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(game.snapshot());
        }

        // 4. Sleep until next tick
        next_tick_time += tick_duration;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > tick_duration * 2 {
            // Too far behind — reset to avoid catch-up spiral
            next_tick_time = now;
        }
    }
}
