//! Player ammo reserve.

use std::sync::atomic::{AtomicU32, Ordering};

use invaders_core::constants::LOW_AMMO_FRACTION;
use invaders_core::enums::AmmoLevel;
use invaders_core::sinks::AmmoSource;

/// Thread-safe magazine shared between the firing code and the engine.
#[derive(Debug)]
pub struct AmmoStore {
    max: u32,
    count: AtomicU32,
}

impl AmmoStore {
    /// A full magazine of `max` rounds.
    pub fn new(max: u32) -> Self {
        Self {
            max,
            count: AtomicU32::new(max),
        }
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Take one round. Returns `false` when empty.
    pub fn consume(&self) -> bool {
        self.count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_ok()
    }

    /// Add rounds, capped at the magazine size.
    pub fn refill(&self, rounds: u32) {
        let max = self.max;
        let _ = self
            .count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                Some(n.saturating_add(rounds).min(max))
            });
    }

    /// `Low` once less than a quarter of the magazine remains.
    pub fn level(&self) -> AmmoLevel {
        if self.max == 0 {
            return AmmoLevel::Low;
        }
        let fraction = self.ammo_count() as f32 / self.max as f32;
        if fraction < LOW_AMMO_FRACTION {
            AmmoLevel::Low
        } else {
            AmmoLevel::Normal
        }
    }
}

impl AmmoSource for AmmoStore {
    fn ammo_count(&self) -> u32 {
        self.count.load(Ordering::Acquire)
    }
}
