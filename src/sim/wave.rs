//! Block field generation and the per-turn wave shift
//!
//! A wave is one downward shift of the field plus (usually) one new row of
//! blocks on top. Power-ups also spawn on a timer that runs independently of
//! turns.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Deal the opening layout: a full grid of blocks plus scattered power-ups
pub fn generate_opening_field(state: &mut GameState) {
    let (min_res, max_res) = (state.settings.min_resistance, state.settings.max_resistance);
    for row in 0..START_ROWS {
        for col in 0..START_COLUMNS {
            let pos = Vec2::new(
                LAUNCHER_EDGE_MARGIN + col as f32 * BLOCK_PITCH,
                FALLBACK_ROW_Y + row as f32 * BLOCK_PITCH,
            );
            let resistance = state.rng.random_range(min_res..=max_res);
            state.spawn_block(pos, resistance);
        }
    }

    let (min_x, max_x) = spawn_x_range(state);
    let max_y = (state.settings.field_height / 2.0) as i32;
    let min_y = 100.min(max_y);
    for _ in 0..START_POWERUPS.min(state.settings.max_powerups) {
        let x = state.rng.random_range(min_x..=max_x) as f32;
        let y = state.rng.random_range(min_y..=max_y) as f32;
        state.spawn_powerup(Vec2::new(x, y));
    }

    log::debug!(
        "Opening field: {} blocks, {} power-ups",
        state.blocks.len(),
        state.powerups.len()
    );
}

/// Apply one wave: shift everything down and add a row when it is due
pub fn advance_wave(state: &mut GameState) {
    shift_field(state);
    state.wave_index += 1;
    state.turns_since_row += 1;
    if state.turns_since_row >= state.settings.turns_per_new_row {
        add_block_row(state);
        state.turns_since_row = 0;
    }
    state.events.push(GameEvent::WaveAdvanced {
        wave: state.wave_index,
    });
}

/// Move blocks and power-ups down; power-ups that sink past the floor are dropped
pub fn shift_field(state: &mut GameState) {
    let block_delta = Vec2::new(0.0, state.settings.block_shift);
    let powerup_delta = Vec2::new(0.0, state.settings.powerup_shift);
    for block in &mut state.blocks {
        block.pos += block_delta;
    }
    for powerup in &mut state.powerups {
        powerup.pos += powerup_delta;
    }

    let floor = state.settings.floor_threshold();
    let before = state.powerups.len();
    state.powerups.retain(|p| p.pos.y < floor);
    if state.powerups.len() < before {
        log::debug!("Dropped {} sunken power-ups", before - state.powerups.len());
    }
}

/// Add one row above the topmost block. Returns the number of blocks added.
///
/// Every row holds the full random count. Each block picks one of the
/// occupied columns independently, so a column can be stacked twice; an empty
/// field falls back to random columns above the opening row.
pub fn add_block_row(state: &mut GameState) -> usize {
    let settings = &state.settings;
    let (min_res, max_res) = (settings.min_resistance, settings.max_resistance);
    let count = state
        .rng
        .random_range(settings.new_row_min_blocks..=settings.new_row_max_blocks) as usize;

    let top = state
        .blocks
        .iter()
        .map(|b| b.pos.y)
        .fold(None, |acc: Option<f32>, y| Some(acc.map_or(y, |a| a.min(y))))
        .unwrap_or(FALLBACK_ROW_Y);
    let row_y = top - BLOCK_PITCH;

    let columns = occupied_columns(state);
    let xs: Vec<f32> = if columns.is_empty() {
        let (min_x, max_x) = spawn_x_range(state);
        (0..count)
            .map(|_| state.rng.random_range(min_x..=max_x) as f32)
            .collect()
    } else {
        (0..count)
            .filter_map(|_| columns.choose(&mut state.rng).copied())
            .collect()
    };

    let mut added = 0;
    for x in xs {
        let resistance = state.rng.random_range(min_res..=max_res);
        state.spawn_block(Vec2::new(x, row_y), resistance);
        added += 1;
    }

    log::debug!("New row at y={} with {} blocks", row_y, added);
    added
}

/// Distinct x positions currently holding a block, left to right
pub fn occupied_columns(state: &GameState) -> Vec<f32> {
    let mut columns: Vec<f32> = state.blocks.iter().map(|b| b.pos.x).collect();
    columns.sort_by(f32::total_cmp);
    columns.dedup();
    columns
}

/// Advance the power-up timer and spawn when it fires
pub fn tick_powerup_timer(state: &mut GameState) {
    state.powerup_timer += 1;
    if state.powerup_timer >= state.settings.powerup_interval_ticks {
        state.powerup_timer = 0;
        try_spawn_powerup(state);
    }
}

/// Spawn a power-up centered on a random block.
///
/// Skipped when the cap is reached or there are no blocks to anchor on.
pub fn try_spawn_powerup(state: &mut GameState) -> bool {
    if state.powerups.len() >= state.settings.max_powerups {
        return false;
    }
    let Some(anchor) = state.blocks.choose(&mut state.rng).map(|b| b.center()) else {
        return false;
    };
    state.spawn_powerup(anchor);
    state.events.push(GameEvent::PowerUpSpawned);
    log::debug!("Power-up spawned at ({}, {})", anchor.x, anchor.y);
    true
}

/// True once any block's bottom edge reaches the floor threshold
pub fn floor_breached(state: &GameState) -> bool {
    state
        .lowest_block_bottom()
        .is_some_and(|bottom| bottom >= state.settings.floor_threshold())
}

fn spawn_x_range(state: &GameState) -> (i32, i32) {
    let (min_x, max_x) = state.settings.launcher_bounds();
    (min_x as i32, max_x as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GameState;
    use proptest::prelude::*;

    #[test]
    fn test_opening_field_layout() {
        let state = GameState::new(3);
        assert_eq!(state.blocks.len(), 40);
        assert_eq!(state.blocks[0].pos, Vec2::new(50.0, 50.0));
        assert_eq!(state.blocks[19].pos, Vec2::new(50.0 + 19.0 * 35.0, 50.0));
        assert_eq!(state.blocks[20].pos, Vec2::new(50.0, 85.0));
        assert!(state.blocks.iter().all(|b| (1..=5).contains(&b.resistance)));
        for p in &state.powerups {
            assert!((50.0..=750.0).contains(&p.pos.x));
            assert!((100.0..=300.0).contains(&p.pos.y));
        }
    }

    #[test]
    fn test_shift_moves_blocks_and_powerups() {
        let mut state = GameState::empty(1);
        state.spawn_block(Vec2::new(50.0, 100.0), 2);
        state.spawn_powerup(Vec2::new(200.0, 200.0));
        shift_field(&mut state);
        assert_eq!(state.blocks[0].pos.y, 125.0);
        assert_eq!(state.powerups[0].pos.y, 220.0);
    }

    #[test]
    fn test_shift_drops_sunken_powerups() {
        let mut state = GameState::empty(1);
        state.spawn_powerup(Vec2::new(200.0, 515.0));
        shift_field(&mut state);
        assert!(state.powerups.is_empty());
    }

    #[test]
    fn test_new_row_uses_existing_columns() {
        let mut state = GameState::empty(11);
        for col in 0..12 {
            state.spawn_block(Vec2::new(50.0 + col as f32 * 35.0, 200.0), 1);
        }
        let columns = occupied_columns(&state);
        let before = state.blocks.len();
        let added = add_block_row(&mut state);
        assert!((3..=9).contains(&added));
        assert_eq!(state.blocks.len(), before + added);

        let new_blocks = &state.blocks[before..];
        for b in new_blocks {
            assert_eq!(b.pos.y, 165.0);
            assert!(columns.contains(&b.pos.x));
            assert!((1..=5).contains(&b.resistance));
        }
    }

    #[test]
    fn test_new_row_keeps_full_count_on_narrow_field() {
        for seed in 0..50 {
            let mut state = GameState::empty(seed);
            state.spawn_block(Vec2::new(120.0, 300.0), 1);
            state.spawn_block(Vec2::new(155.0, 300.0), 1);
            let added = add_block_row(&mut state);
            assert!((3..=9).contains(&added), "seed {seed}: {added} blocks");
            assert_eq!(state.blocks.len(), 2 + added);
            for b in &state.blocks[2..] {
                assert_eq!(b.pos.y, 265.0);
                assert!(b.pos.x == 120.0 || b.pos.x == 155.0);
            }
        }
    }

    #[test]
    fn test_new_row_on_single_column_stacks_it() {
        let mut state = GameState::empty(5);
        state.spawn_block(Vec2::new(120.0, 300.0), 1);
        let added = add_block_row(&mut state);
        assert!((3..=9).contains(&added));
        assert!(state.blocks[1..].iter().all(|b| b.pos == Vec2::new(120.0, 265.0)));
    }

    #[test]
    fn test_empty_field_row_uses_fallback_position() {
        let mut state = GameState::empty(9);
        let added = add_block_row(&mut state);
        assert!((3..=9).contains(&added));
        for b in &state.blocks {
            assert_eq!(b.pos.y, FALLBACK_ROW_Y - BLOCK_PITCH);
            assert!((50.0..=750.0).contains(&b.pos.x));
        }
    }

    #[test]
    fn test_advance_wave_counts_and_adds_row() {
        let mut state = GameState::empty(2);
        state.spawn_block(Vec2::new(50.0, 50.0), 1);
        advance_wave(&mut state);
        assert_eq!(state.wave_index, 1);
        assert_eq!(state.turns_since_row, 0);
        assert!(state.blocks.len() > 1);
        assert!(state.events.contains(&GameEvent::WaveAdvanced { wave: 1 }));
    }

    #[test]
    fn test_powerup_spawn_skips_without_blocks() {
        let mut state = GameState::empty(4);
        assert!(!try_spawn_powerup(&mut state));
        assert!(state.powerups.is_empty());
    }

    #[test]
    fn test_powerup_spawn_centers_on_block() {
        let mut state = GameState::empty(4);
        state.spawn_block(Vec2::new(100.0, 100.0), 3);
        assert!(try_spawn_powerup(&mut state));
        assert_eq!(state.powerups[0].pos, Vec2::new(115.0, 115.0));
    }

    #[test]
    fn test_powerup_timer_fires_on_interval() {
        let mut state = GameState::empty(4);
        state.spawn_block(Vec2::new(100.0, 100.0), 3);
        for _ in 0..POWERUP_INTERVAL_TICKS - 1 {
            tick_powerup_timer(&mut state);
        }
        assert!(state.powerups.is_empty());
        tick_powerup_timer(&mut state);
        assert_eq!(state.powerups.len(), 1);
        assert_eq!(state.powerup_timer, 0);
    }

    #[test]
    fn test_floor_breach() {
        let mut state = GameState::empty(1);
        assert!(!floor_breached(&state));
        state.spawn_block(Vec2::new(50.0, 499.0), 1);
        assert!(!floor_breached(&state));
        state.blocks[0].pos.y = 500.0;
        assert!(floor_breached(&state));
    }

    proptest! {
        #[test]
        fn prop_powerups_never_exceed_cap(seed in any::<u64>(), attempts in 0usize..20) {
            let mut state = GameState::new(seed);
            for _ in 0..attempts {
                try_spawn_powerup(&mut state);
                prop_assert!(state.powerups.len() <= MAX_POWERUPS);
            }
        }
    }
}
