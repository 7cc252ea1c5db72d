//! Simulation constants and tuning parameters.

// --- Formation ---

/// Default number of enemy columns.
pub const DEFAULT_COLUMN_COUNT: usize = 6;

/// Default number of enemies per column.
pub const DEFAULT_ROW_COUNT: usize = 4;

/// Downward translation per nominal motion tick (viewport units).
pub const DEFAULT_SPEED: f32 = 2.0;

/// Fraction of a grid cell covered by an enemy's hit-box radius.
pub const HIT_BOX_FRACTION: f32 = 0.35;

/// Vertical offset of the first enemy row from the top of the viewport.
pub const FORMATION_TOP_MARGIN: f32 = 0.0;

/// Motion ticks an enemy spends exploding after being hit.
pub const HIT_ANIMATION_FRAMES: u8 = 8;

// --- Scheduling ---

/// Motion tick cadence in milliseconds (~30Hz).
pub const DEFAULT_MOTION_TICK_MS: u64 = 33;

/// Interval between enemy fire attempts in milliseconds.
pub const DEFAULT_FIRE_INTERVAL_MS: u64 = 1000;

/// Delay before the first enemy fire attempt in milliseconds.
pub const DEFAULT_FIRE_INITIAL_DELAY_MS: u64 = 200;

/// Default RNG seed for fire column selection.
pub const DEFAULT_SEED: u64 = 42;

/// Upper bound on how long a blocked subscription waits before re-checking
/// its stop signal.
pub const STOP_POLL_INTERVAL_MS: u64 = 10;

// --- Ammo ---

/// Default magazine size for the player.
pub const DEFAULT_MAX_AMMO: u32 = 30;

/// Below this fraction of the magazine the ammo level is reported as low.
pub const LOW_AMMO_FRACTION: f32 = 0.25;

// --- Haptics ---

/// Vibration when an enemy is destroyed (ms).
pub const HAPTIC_ENEMY_HIT_MS: u64 = 64;

/// Amplitude of the enemy-hit vibration.
pub const HAPTIC_ENEMY_HIT_AMPLITUDE: u8 = 48;

/// Vibration when the wave is cleared (ms).
pub const HAPTIC_WAVE_CLEAR_MS: u64 = 320;

/// Vibration when the formation reaches the bottom (ms).
pub const HAPTIC_GAME_OVER_MS: u64 = 320;
