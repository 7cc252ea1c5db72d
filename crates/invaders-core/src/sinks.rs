//! Collaborator interfaces the engine calls into.
//!
//! The engine only ever calls these; it never waits on a result. Every
//! implementation must be cheap and must not call back into the engine while
//! the call is in progress.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use crate::events::{GameEvent, Vibration};
use crate::types::ProjectileId;

/// Game-state notifications.
pub trait EventSink: Send + Sync {
    fn on_all_eliminated(&self, ammo_count: u32);
    fn on_canon_ready(&self, x: f32, y: f32);
    fn on_game_over(&self);
}

/// Told when a tracked projectile collided and must be destroyed by its owner.
pub trait CollisionSink: Send + Sync {
    fn on_collision(&self, projectile: ProjectileId);
}

/// Reports how much ammo the player has left.
pub trait AmmoSource: Send + Sync {
    fn ammo_count(&self) -> u32;
}

/// Fire-and-forget vibration.
pub trait HapticSink: Send + Sync {
    fn vibrate(&self, duration_ms: u64, amplitude: Option<u8>);
}

/// Fire-and-forget redraw request.
pub trait RedrawSink: Send + Sync {
    fn request_redraw(&self);
}

/// All collaborators the engine needs, passed at construction.
#[derive(Clone)]
pub struct Collaborators {
    pub events: Arc<dyn EventSink>,
    pub collisions: Arc<dyn CollisionSink>,
    pub ammo: Arc<dyn AmmoSource>,
    pub haptics: Arc<dyn HapticSink>,
    pub redraw: Arc<dyn RedrawSink>,
}

impl Collaborators {
    /// Wire every outbound capability to one sink object.
    pub fn from_sink<S>(sink: Arc<S>, ammo: Arc<dyn AmmoSource>) -> Self
    where
        S: EventSink + CollisionSink + HapticSink + RedrawSink + 'static,
    {
        Self {
            events: sink.clone(),
            collisions: sink.clone(),
            ammo,
            haptics: sink.clone(),
            redraw: sink,
        }
    }

    /// Collaborators that drop everything on the floor.
    pub fn silent() -> Self {
        let sink = Arc::new(SilentSink);
        Self::from_sink(sink.clone(), sink)
    }
}

/// Ignores every call. Reports zero ammo.
#[derive(Debug, Default)]
pub struct SilentSink;

impl EventSink for SilentSink {
    fn on_all_eliminated(&self, _ammo_count: u32) {}
    fn on_canon_ready(&self, _x: f32, _y: f32) {}
    fn on_game_over(&self) {}
}

impl CollisionSink for SilentSink {
    fn on_collision(&self, _projectile: ProjectileId) {}
}

impl AmmoSource for SilentSink {
    fn ammo_count(&self) -> u32 {
        0
    }
}

impl HapticSink for SilentSink {
    fn vibrate(&self, _duration_ms: u64, _amplitude: Option<u8>) {}
}

impl RedrawSink for SilentSink {
    fn request_redraw(&self) {}
}

/// Forwards every event into an `mpsc` channel and records vibrations and
/// redraw requests. Used by the headless app and by tests.
pub struct ChannelSink {
    tx: Mutex<mpsc::Sender<GameEvent>>,
    vibrations: Mutex<Vec<Vibration>>,
    redraws: AtomicUsize,
}

impl ChannelSink {
    pub fn new() -> (Arc<Self>, mpsc::Receiver<GameEvent>) {
        let (tx, rx) = mpsc::channel();
        let sink = Arc::new(Self {
            tx: Mutex::new(tx),
            vibrations: Mutex::new(Vec::new()),
            redraws: AtomicUsize::new(0),
        });
        (sink, rx)
    }

    /// Vibrations requested so far.
    pub fn vibrations(&self) -> Vec<Vibration> {
        self.vibrations
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of redraw requests so far.
    pub fn redraw_count(&self) -> usize {
        self.redraws.load(Ordering::Relaxed)
    }

    fn emit(&self, event: GameEvent) {
        let tx = self.tx.lock().unwrap_or_else(|e| e.into_inner());
        // Receiver gone means nobody is listening any more.
        let _ = tx.send(event);
    }
}

impl EventSink for ChannelSink {
    fn on_all_eliminated(&self, ammo_count: u32) {
        self.emit(GameEvent::AllEliminated { ammo_count });
    }

    fn on_canon_ready(&self, x: f32, y: f32) {
        self.emit(GameEvent::CanonReady { x, y });
    }

    fn on_game_over(&self) {
        self.emit(GameEvent::GameOver);
    }
}

impl CollisionSink for ChannelSink {
    fn on_collision(&self, projectile: ProjectileId) {
        self.emit(GameEvent::Collision { projectile });
    }
}

impl HapticSink for ChannelSink {
    fn vibrate(&self, duration_ms: u64, amplitude: Option<u8>) {
        self.vibrations
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Vibration {
                duration_ms,
                amplitude,
            });
    }
}

impl RedrawSink for ChannelSink {
    fn request_redraw(&self) {
        self.redraws.fetch_add(1, Ordering::Relaxed);
    }
}

/// Fixed ammo count, for tests and demos.
#[derive(Debug, Clone, Copy)]
pub struct FixedAmmo(pub u32);

impl AmmoSource for FixedAmmo {
    fn ammo_count(&self) -> u32 {
        self.0
    }
}
