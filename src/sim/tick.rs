//! Fixed timestep simulation tick
//!
//! One call advances a Fall Blocks match by one logical step (1/60 s). The
//! turn controller lives here: volleys, turn resolution, the turn handover
//! with its wave shift, and the end-of-match check.

use serde::Serialize;

use super::collision::{CollisionReport, resolve_collisions};
use super::opponent;
use super::state::{Direction, GameEvent, GamePhase, GameState, Side, TurnPhase};
use super::wave;
use crate::history::MatchOutcome;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Move launcher left (held)
    pub left: bool,
    /// Move launcher right (held)
    pub right: bool,
    /// Fire a volley (one-shot)
    pub fire: bool,
    /// Start a match from the title screen (one-shot)
    pub start: bool,
}

/// Final numbers of a finished match
#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    pub outcome: MatchOutcome,
    pub player_score: u32,
    pub opponent_score: u32,
    pub waves: u32,
    pub ticks: u64,
}

impl From<&GameState> for MatchSummary {
    fn from(state: &GameState) -> Self {
        Self {
            outcome: MatchOutcome::from_scores(state.score.player, state.score.opponent),
            player_score: state.score.player,
            opponent_score: state.score.opponent,
            waves: state.wave_index,
            ticks: state.time_ticks,
        }
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();

    match state.phase {
        GamePhase::Title => {
            if input.start {
                state.reset_match();
                state.start_match();
            }
            return;
        }
        GamePhase::MatchOver {
            outcome,
            ticks_left,
        } => {
            let ticks_left = ticks_left.saturating_sub(1);
            if ticks_left == 0 {
                state.reset_match();
                state.phase = GamePhase::Title;
            } else {
                state.phase = GamePhase::MatchOver {
                    outcome,
                    ticks_left,
                };
            }
            return;
        }
        GamePhase::Playing => {}
    }

    state.time_ticks += 1;

    // Projectiles fly; anything above the top edge is gone
    for projectile in &mut state.projectiles {
        projectile.advance();
    }
    state.projectiles.retain(|p| !p.is_off_field());

    for block in &mut state.blocks {
        block.decay_shake();
    }

    release_volley(state);
    wave::tick_powerup_timer(state);

    let report = resolve_collisions(
        &mut state.projectiles,
        &mut state.blocks,
        &mut state.powerups,
    );
    if !report.is_empty() {
        credit_collisions(state, &report);
    }

    match state.turn_phase {
        TurnPhase::WaitingToFire => control_turn_owner(state, input),
        TurnPhase::Firing { .. } => {}
        TurnPhase::Resolving => {
            if state.projectiles.is_empty() && state.turn_delay_ticks == 0 {
                let pause = state.settings.turn_switch_pause_ticks;
                if pause == 0 {
                    switch_turn(state);
                } else {
                    state.turn_phase = TurnPhase::SwitchingTurn { ticks_left: pause };
                }
            }
        }
        TurnPhase::SwitchingTurn { ticks_left } => {
            let ticks_left = ticks_left.saturating_sub(1);
            if ticks_left == 0 {
                switch_turn(state);
            } else {
                state.turn_phase = TurnPhase::SwitchingTurn { ticks_left };
            }
        }
    }

    if wave::floor_breached(state) {
        end_match(state);
        return;
    }

    state.turn_delay_ticks = state.turn_delay_ticks.saturating_sub(1);

    // Ensure deterministic ordering
    state.normalize_order();
}

/// Turn a collision report into score, ammo and events for the active side
fn credit_collisions(state: &mut GameState, report: &CollisionReport) {
    let side = state.turn;
    for &block_id in &report.blocks_hit {
        state.events.push(GameEvent::BlockHit { block_id });
    }
    for &block_id in &report.blocks_destroyed {
        *state.score.get_mut(side) += 1;
        state.events.push(GameEvent::BlockDestroyed { block_id, side });
    }
    for _ in 0..report.powerups_collected {
        *state.ammo.get_mut(side) += 1;
        state.events.push(GameEvent::PowerUpCollected { side });
    }
    if !report.blocks_destroyed.is_empty() || report.powerups_collected > 0 {
        log::debug!(
            "{}: {} destroyed, {} power-ups (score {}, ammo {})",
            side.label(),
            report.blocks_destroyed.len(),
            report.powerups_collected,
            state.score.get(side),
            state.ammo.get(side)
        );
    }
}

/// Movement and fire for whoever holds the turn
fn control_turn_owner(state: &mut GameState, input: &TickInput) {
    let speed = state.settings.launcher_speed;
    let bounds = state.settings.launcher_bounds();

    match state.turn {
        Side::Player => {
            if input.left {
                state.launcher.step(Direction::Left, speed, bounds);
            }
            if input.right {
                state.launcher.step(Direction::Right, speed, bounds);
            }
            if input.fire {
                begin_volley(state);
            }
        }
        Side::Opponent => {
            // Nothing to aim at: fire in place so the turn still hands over
            if opponent::choose_target(state).is_none() {
                begin_volley(state);
                return;
            }
            let command = opponent::plan(state);
            if let Some(direction) = command.step {
                state.launcher.step(direction, speed, bounds);
            }
            if command.fire {
                begin_volley(state);
            }
        }
    }
}

/// Schedule a volley of the active side's full ammunition
pub fn begin_volley(state: &mut GameState) {
    if !state.awaiting_fire() {
        return;
    }
    let count = state.active_ammo();
    state.turn_phase = if count == 0 {
        TurnPhase::Resolving
    } else {
        TurnPhase::Firing {
            remaining: count,
            cadence_ticks: state.settings.volley_cadence_ticks,
        }
    };
    state.events.push(GameEvent::VolleyStarted {
        side: state.turn,
        count,
    });
    log::debug!("{} fires a volley of {}", state.turn.label(), count);
}

/// Release the next projectile of a volley when its cadence comes up
fn release_volley(state: &mut GameState) {
    let TurnPhase::Firing {
        mut remaining,
        cadence_ticks,
    } = state.turn_phase
    else {
        return;
    };

    let mut cadence_ticks = cadence_ticks.saturating_sub(1);
    if cadence_ticks == 0 && remaining > 0 {
        state.spawn_projectile();
        state.events.push(GameEvent::ProjectileFired { side: state.turn });
        remaining -= 1;
        cadence_ticks = state.settings.volley_cadence_ticks;
    }

    state.turn_phase = if remaining == 0 {
        TurnPhase::Resolving
    } else {
        TurnPhase::Firing {
            remaining,
            cadence_ticks,
        }
    };
}

/// Apply the wave and hand the turn to the other side
fn switch_turn(state: &mut GameState) {
    wave::advance_wave(state);
    state.turn = state.turn.other();
    state.turn_phase = TurnPhase::WaitingToFire;
    state.turn_delay_ticks = state.settings.turn_delay_ticks;
    state.events.push(GameEvent::TurnSwitched { to: state.turn });
    log::info!(
        "Wave {}: {} to move ({} blocks, score {}-{})",
        state.wave_index,
        state.turn.label(),
        state.blocks.len(),
        state.score.player,
        state.score.opponent
    );
}

/// Finish the match: decide, record, show the result screen
fn end_match(state: &mut GameState) {
    let summary = MatchSummary::from(&*state);
    let outcome = summary.outcome;

    state.history.record(outcome);
    state.projectiles.clear();
    state.phase = GamePhase::MatchOver {
        outcome,
        ticks_left: state.settings.result_screen_ticks.max(1),
    };
    state.events.push(GameEvent::MatchEnded { outcome });

    log::info!(
        "Match over: {} ({}-{})",
        outcome.label(),
        summary.player_score,
        summary.opponent_score
    );
    match serde_json::to_string(&summary) {
        Ok(json) => log::debug!("Match summary: {}", json),
        Err(e) => log::warn!("Could not serialize match summary: {}", e),
    }
}
