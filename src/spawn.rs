//! Wave layout and enemy grid spawning.

use std::f32::consts::TAU;

use rand::Rng;
use tracing::debug;

use crate::config::GameConfig;
use crate::entities::{Enemy, EnemyState, GameEvent};
use crate::state::GameState;
use crate::vec2::Vec2;

/// Grid geometry for one wave, derived from the arena width at spawn time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveLayout {
    pub rows: u32,
    pub columns: u32,
    pub start_x: f32,
    pub top: f32,
    pub column_spacing: f32,
    pub row_spacing: f32,
}

impl WaveLayout {
    pub fn enemy_count(&self) -> usize {
        (self.rows * self.columns) as usize
    }

    pub fn slot(&self, row: u32, column: u32) -> Vec2 {
        Vec2::new(
            self.start_x + column as f32 * self.column_spacing,
            self.top + row as f32 * self.row_spacing,
        )
    }
}

/// `base_rows` plus `rows_per_wave` for every wave after the first, capped.
/// Never below one row.
pub fn rows_for_wave(config: &GameConfig, wave: u32) -> u32 {
    let grown = config
        .base_rows
        .saturating_add(wave.saturating_sub(1).saturating_mul(config.rows_per_wave));
    grown.min(config.row_cap).max(1)
}

/// As many columns as fit the width, at least one, centred horizontally.
pub fn wave_layout(config: &GameConfig, arena_width: f32, wave: u32) -> WaveLayout {
    let fit = (arena_width / config.column_spacing).floor();
    let columns = if fit >= 1.0 { fit as u32 } else { 1 };
    let start_x = (arena_width - (columns - 1) as f32 * config.column_spacing) / 2.0;
    WaveLayout {
        rows: rows_for_wave(config, wave),
        columns,
        start_x,
        top: config.top_margin,
        column_spacing: config.column_spacing,
        row_spacing: config.row_spacing,
    }
}

/// Populate the live set with the grid for `wave`. Each enemy draws its own
/// oscillation phase so the formation does not move in lockstep.
pub fn create_wave(state: &mut GameState, wave: u32, rng: &mut impl Rng) -> usize {
    let layout = wave_layout(&state.config, state.arena.width, wave);

    state.enemies.reserve(layout.enemy_count());
    for row in 0..layout.rows {
        for column in 0..layout.columns {
            let id = state.next_enemy_id;
            state.next_enemy_id = state.next_enemy_id.wrapping_add(1);
            state.enemies.push(Enemy {
                id,
                position: layout.slot(row, column),
                velocity: Vec2::ZERO,
                phase: rng.gen_range(0.0..TAU),
                state: EnemyState::Formation,
            });
        }
    }

    let spawned = layout.enemy_count();
    state.session.wave_started(wave, state.enemies.len());
    state.events.push(GameEvent::WaveSpawned {
        wave,
        enemies: spawned,
    });
    debug!(
        wave,
        rows = layout.rows,
        columns = layout.columns,
        start_x = layout.start_x,
        "wave spawned"
    );
    spawned
}
