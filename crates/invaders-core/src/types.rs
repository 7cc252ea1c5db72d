//! Fundamental geometric and identity types.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Unique identity of a projectile, assigned by whoever spawned it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(pub u64);

impl fmt::Display for ProjectileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "projectile#{}", self.0)
    }
}

/// Closed horizontal interval `[min, max]` in viewport units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct XRange {
    pub min: f32,
    pub max: f32,
}

impl XRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Span covered by a circle of `radius` centred at `x`.
    pub fn around(x: f32, radius: f32) -> Self {
        Self {
            min: x - radius,
            max: x + radius,
        }
    }

    /// True if `x` lies inside the interval (bounds inclusive).
    pub fn contains(&self, x: f32) -> bool {
        x >= self.min && x <= self.max
    }
}

/// Viewport size in layout units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True if `point` lies outside the vertical extent of the viewport.
    pub fn is_vertically_outside(&self, point: Vec2) -> bool {
        point.y < 0.0 || point.y > self.height
    }
}
