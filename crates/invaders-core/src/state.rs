//! Formation snapshot — the visible state handed to the render sink.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::enums::HitState;
use crate::types::XRange;

/// Complete formation state for one redraw.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormationSnapshot {
    pub columns: Vec<ColumnView>,
    /// The one-shot wave-clear event has fired for this formation.
    pub wave_cleared: bool,
    /// The formation was cleared because it reached the bottom.
    pub game_over: bool,
}

impl FormationSnapshot {
    /// Number of enemies still alive.
    pub fn visible_count(&self) -> usize {
        self.columns
            .iter()
            .flat_map(|c| c.enemies.iter())
            .filter(|e| e.visible)
            .count()
    }
}

/// One enemy column.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnView {
    /// Cached horizontal range from the initial layout.
    pub x_range: XRange,
    pub enemies: Vec<EnemyView>,
}

/// One enemy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    /// Stable index within the column.
    pub index: usize,
    pub position: Vec2,
    pub radius: f32,
    pub visible: bool,
    pub hit_state: HitState,
}
