//! The enemy grid: columns of enemies, their motion, and spatial lookups.
//!
//! Enemies are never removed from a column while the formation lives; a hit
//! only flips visibility, so `(column, index)` stays a valid address until the
//! formation is re-initialised or reset.

use std::time::Duration;

use glam::Vec2;

use invaders_core::constants::*;
use invaders_core::enums::HitState;
use invaders_core::state::{ColumnView, EnemyView, FormationSnapshot};
use invaders_core::types::{Viewport, XRange};

/// Stable address of an enemy inside a formation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnemyRef {
    pub column: usize,
    pub index: usize,
}

/// One enemy ship.
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    index: usize,
    position: Vec2,
    radius: f32,
    visible: bool,
    hit_state: HitState,
}

impl Enemy {
    pub fn new(index: usize, position: Vec2, radius: f32) -> Self {
        Self {
            index,
            position,
            radius,
            visible: true,
            hit_state: HitState::Alive,
        }
    }

    /// Lay out the enemy at `(column, row)` of a grid spanning `viewport_width`.
    pub fn builder(viewport_width: f32, column_count: usize, column: usize, row: usize) -> Self {
        let cell = viewport_width / column_count.max(1) as f32;
        let x = cell * column as f32 + cell / 2.0;
        let y = FORMATION_TOP_MARGIN + cell * row as f32 + cell / 2.0;
        Self::new(row, Vec2::new(x, y), cell * HIT_BOX_FRACTION)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn hit_state(&self) -> HitState {
        self.hit_state
    }

    /// Move down by `dy` and advance any running explosion.
    pub fn translate(&mut self, dy: f32) {
        self.position.y += dy;
        self.hit_state = self.hit_state.advance();
    }

    /// True if the enemy is alive and its hit-box vertically covers `y`.
    pub fn covers_y(&self, y: f32) -> bool {
        self.visible && (y - self.position.y).abs() <= self.radius
    }

    /// Flip to dead and start the explosion. Returns `false` if it was
    /// already dead.
    pub fn on_hit(&mut self) -> bool {
        if !self.visible {
            return false;
        }
        self.visible = false;
        self.hit_state = HitState::Exploding {
            frames_left: HIT_ANIMATION_FRAMES,
        };
        true
    }

    fn view(&self) -> EnemyView {
        EnemyView {
            index: self.index,
            position: self.position,
            radius: self.radius,
            visible: self.visible,
            hit_state: self.hit_state,
        }
    }
}

/// An ordered column of enemies with its horizontal range.
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyColumn {
    range: XRange,
    enemies: Vec<Enemy>,
}

impl EnemyColumn {
    /// Build a column. The range comes from the first enemy only and is not
    /// recomputed afterwards; motion is vertical, so it stays valid.
    pub fn new(enemies: Vec<Enemy>) -> Self {
        let range = enemies
            .first()
            .map(|e| XRange::around(e.position.x, e.radius))
            .unwrap_or_default();
        Self { range, enemies }
    }

    pub fn range(&self) -> XRange {
        self.range
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn any_visible(&self) -> bool {
        self.enemies.iter().any(Enemy::is_visible)
    }

    /// Collision tie-break: scanning from the last enemy back to the first,
    /// the first visible enemy whose hit-box covers `y`.
    pub fn topmost_visible_at(&self, y: f32) -> Option<usize> {
        self.enemies
            .iter()
            .enumerate()
            .rev()
            .find(|(_, e)| e.covers_y(y))
            .map(|(i, _)| i)
    }

    /// Firing choice: the visible enemy with the highest index.
    pub fn last_visible(&self) -> Option<&Enemy> {
        self.enemies.iter().rev().find(|e| e.is_visible())
    }
}

/// The full grid of enemy columns.
#[derive(Debug, Clone)]
pub struct EnemyFormation {
    columns: Vec<EnemyColumn>,
    viewport: Viewport,
    speed: f32,
    nominal_tick: Duration,
    wave_cleared: bool,
    game_over: bool,
}

impl EnemyFormation {
    /// An empty formation that moves `speed` units per `nominal_tick`.
    pub fn new(speed: f32, nominal_tick: Duration) -> Self {
        Self {
            columns: Vec::new(),
            viewport: Viewport::default(),
            speed,
            nominal_tick,
            wave_cleared: false,
            game_over: false,
        }
    }

    /// Formation from hand-built columns (tests, scripted waves).
    pub fn from_columns(columns: Vec<EnemyColumn>, viewport: Viewport, speed: f32) -> Self {
        Self {
            columns,
            viewport,
            ..Self::new(speed, Duration::from_millis(DEFAULT_MOTION_TICK_MS))
        }
    }

    /// Replace the whole grid with a fresh `column_count` x `row_count` layout.
    pub fn initialize(&mut self, viewport: Viewport, column_count: usize, row_count: usize) {
        self.viewport = viewport;
        self.columns = (0..column_count)
            .map(|column| {
                let enemies = (0..row_count)
                    .map(|row| Enemy::builder(viewport.width, column_count, column, row))
                    .collect();
                EnemyColumn::new(enemies)
            })
            .collect();
        self.wave_cleared = false;
        self.game_over = false;

        log::info!(
            "formation initialised: {}x{} in {}x{} viewport",
            column_count,
            row_count,
            viewport.width,
            viewport.height
        );
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn columns(&self) -> &[EnemyColumn] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn enemy(&self, at: EnemyRef) -> Option<&Enemy> {
        self.columns.get(at.column)?.enemies.get(at.index)
    }

    /// Move every enemy down by the distance covered in `elapsed`.
    pub fn translate_all(&mut self, elapsed: Duration) {
        let dy = if self.nominal_tick.is_zero() {
            self.speed
        } else {
            self.speed * elapsed.as_secs_f32() / self.nominal_tick.as_secs_f32()
        };
        for enemy in self.columns.iter_mut().flat_map(|c| c.enemies.iter_mut()) {
            enemy.translate(dy);
        }
    }

    /// True if any enemy has moved past `viewport_height`.
    pub fn has_any_column_reached_bound(&self, viewport_height: f32) -> bool {
        self.columns
            .iter()
            .flat_map(|c| c.enemies.iter())
            .any(|e| e.position.y > viewport_height)
    }

    pub fn any_visible(&self) -> bool {
        self.columns.iter().any(EnemyColumn::any_visible)
    }

    /// Indices of the columns whose cached range contains `x`.
    pub fn find_columns_matching_x(&self, x: f32) -> impl Iterator<Item = usize> + '_ {
        self.columns
            .iter()
            .enumerate()
            .filter(move |(_, c)| c.range.contains(x))
            .map(|(i, _)| i)
    }

    /// The enemy in `column` that absorbs a projectile at height `y`.
    pub fn find_topmost_visible_enemy_at(&self, column: usize, y: f32) -> Option<EnemyRef> {
        let index = self.columns.get(column)?.topmost_visible_at(y)?;
        Some(EnemyRef { column, index })
    }

    /// First enemy hit by a projectile at `position`, scanning matching
    /// columns in order. Stops at the first hit, so a projectile inside two
    /// overlapping column ranges still destroys only one enemy.
    pub fn find_hit(&self, position: Vec2) -> Option<EnemyRef> {
        self.find_columns_matching_x(position.x)
            .find_map(|column| self.find_topmost_visible_enemy_at(column, position.y))
    }

    /// Mark an enemy destroyed. Returns `false` if it was already dead or
    /// the address is stale.
    pub fn mark_hit(&mut self, at: EnemyRef) -> bool {
        self.columns
            .get_mut(at.column)
            .and_then(|c| c.enemies.get_mut(at.index))
            .is_some_and(Enemy::on_hit)
    }

    /// Position of the enemy in `column` that would fire, if any.
    pub fn fire_origin(&self, column: usize) -> Option<Vec2> {
        self.columns
            .get(column)?
            .last_visible()
            .map(Enemy::position)
    }

    /// Consume the wave-clear condition: `true` exactly once after the last
    /// visible enemy is gone, until the next `initialize`.
    pub fn take_wave_clear(&mut self) -> bool {
        if self.wave_cleared || self.any_visible() {
            return false;
        }
        self.wave_cleared = true;
        true
    }

    pub fn is_wave_cleared(&self) -> bool {
        self.wave_cleared
    }

    /// Empty the formation after it breached the bottom bound.
    pub fn reset(&mut self) {
        self.columns.clear();
        self.game_over = true;
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn snapshot(&self) -> FormationSnapshot {
        FormationSnapshot {
            columns: self
                .columns
                .iter()
                .map(|c| ColumnView {
                    x_range: c.range,
                    enemies: c.enemies.iter().map(Enemy::view).collect(),
                })
                .collect(),
            wave_cleared: self.wave_cleared,
            game_over: self.game_over,
        }
    }
}
