//! Opponent targeting
//!
//! The opponent is a plain function of the current state: pick a target
//! column, step toward it, fire once lined up. It keeps no memory between
//! ticks.

use glam::Vec2;

use super::state::{Block, Direction, GameState};
use crate::consts::{OPPONENT_AIM_TOLERANCE, REACHABILITY_SAMPLES};

/// What the opponent wants to do this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpponentCommand {
    pub step: Option<Direction>,
    pub fire: bool,
}

/// Horizontal center the opponent is aiming for.
///
/// Power-ups come first (the first one in collection order). Otherwise the
/// weakest block; on equal resistance the earliest block in the collection
/// wins, which is an artifact of iteration order rather than a preference.
/// `None` when there is nothing to aim at.
pub fn choose_target(state: &GameState) -> Option<f32> {
    if let Some(powerup) = state.powerups.first() {
        return Some(powerup.pos.x);
    }
    state
        .blocks
        .iter()
        .fold(None, |best: Option<&Block>, block| match best {
            Some(b) if b.resistance <= block.resistance => Some(b),
            _ => Some(block),
        })
        .map(|block| block.center().x)
}

/// Plan one tick: step toward the target, then fire if within tolerance
/// after the step.
///
/// Targets outside the launcher's travel are aimed at from the nearest bound.
pub fn plan(state: &GameState) -> OpponentCommand {
    let Some(target_x) = choose_target(state) else {
        return OpponentCommand::default();
    };
    let (min_x, max_x) = state.settings.launcher_bounds();
    let target_x = target_x.clamp(min_x, max_x);

    let x = state.launcher.x;
    let step = if x < target_x {
        Some(Direction::Right)
    } else if x > target_x {
        Some(Direction::Left)
    } else {
        None
    };

    let mut launcher = state.launcher;
    if let Some(direction) = step {
        launcher.step(
            direction,
            state.settings.launcher_speed,
            state.settings.launcher_bounds(),
        );
    }

    OpponentCommand {
        step,
        fire: (launcher.x - target_x).abs() < OPPONENT_AIM_TOLERANCE,
    }
}

/// Whether the straight segment from the launcher to `block`'s center is
/// clear of every other block.
///
/// Advisory only: targeting does not consult it.
pub fn is_block_reachable(state: &GameState, block: &Block) -> bool {
    let start = Vec2::new(state.launcher.x, state.launcher.y);
    let delta = block.center() - start;

    (1..=REACHABILITY_SAMPLES).all(|i| {
        let point = (start + delta * (i as f32 / REACHABILITY_SAMPLES as f32)).floor();
        state
            .blocks
            .iter()
            .filter(|other| other.id != block.id)
            .all(|other| !other.rect().contains_point(point))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GameState;

    #[test]
    fn test_target_prefers_first_powerup() {
        let mut state = GameState::empty(1);
        state.spawn_block(Vec2::new(100.0, 100.0), 1);
        state.spawn_powerup(Vec2::new(600.0, 200.0));
        state.spawn_powerup(Vec2::new(300.0, 200.0));
        assert_eq!(choose_target(&state), Some(600.0));
    }

    #[test]
    fn test_target_weakest_block_first_on_tie() {
        let mut state = GameState::empty(1);
        state.spawn_block(Vec2::new(100.0, 100.0), 4);
        state.spawn_block(Vec2::new(200.0, 100.0), 2);
        state.spawn_block(Vec2::new(300.0, 100.0), 2);
        assert_eq!(choose_target(&state), Some(215.0));
    }

    #[test]
    fn test_no_target_is_noop() {
        let state = GameState::empty(1);
        assert_eq!(choose_target(&state), None);
        assert_eq!(plan(&state), OpponentCommand::default());
    }

    #[test]
    fn test_plan_steps_toward_target() {
        let mut state = GameState::empty(1);
        state.launcher.x = 400.0;
        state.spawn_block(Vec2::new(100.0, 100.0), 1);
        let cmd = plan(&state);
        assert_eq!(cmd.step, Some(Direction::Left));
        assert!(!cmd.fire);

        state.launcher.x = 100.0;
        let cmd = plan(&state);
        assert_eq!(cmd.step, Some(Direction::Right));
        assert!(!cmd.fire);
    }

    #[test]
    fn test_plan_fires_when_aligned() {
        let mut state = GameState::empty(1);
        state.spawn_block(Vec2::new(100.0, 100.0), 1);
        state.launcher.x = 111.0;
        let cmd = plan(&state);
        assert_eq!(cmd.step, Some(Direction::Right));
        assert!(cmd.fire);

        state.launcher.x = 115.0;
        let cmd = plan(&state);
        assert_eq!(cmd.step, None);
        assert!(cmd.fire);
    }

    #[test]
    fn test_plan_fires_from_bound_when_target_is_out_of_reach() {
        let mut state = GameState::empty(1);
        state.spawn_block(Vec2::new(750.0, 100.0), 1);
        state.launcher.x = 748.0;
        let cmd = plan(&state);
        assert_eq!(cmd.step, Some(Direction::Right));
        assert!(cmd.fire);
    }

    #[test]
    fn test_reachability() {
        let mut state = GameState::empty(1);
        state.launcher.x = 415.0;
        state.spawn_block(Vec2::new(400.0, 100.0), 1);
        let target = state.blocks[0].clone();
        assert!(is_block_reachable(&state, &target));

        // A block right in the line of fire
        state.spawn_block(Vec2::new(400.0, 280.0), 1);
        assert!(!is_block_reachable(&state, &target));

        // Off to the side does not obstruct
        state.blocks.pop();
        state.spawn_block(Vec2::new(600.0, 300.0), 1);
        assert!(is_block_reachable(&state, &target));
    }
}
