//! Pong tick

use super::state::*;
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::sim::Side;

/// Input for a single Pong tick
#[derive(Debug, Clone, Default)]
pub struct PongInput {
    pub up: bool,
    pub down: bool,
    /// Leave the title screen (one-shot)
    pub start: bool,
}

/// Advance Pong by one fixed timestep
pub fn tick(state: &mut PongState, input: &PongInput) {
    state.events.clear();

    match state.phase {
        PongPhase::Title => {
            if input.start {
                state.reset_ball();
                state.phase = PongPhase::Rally;
                log::info!("Pong started");
            }
            return;
        }
        PongPhase::Serving { ticks_left } => {
            move_paddles(state, input);
            let ticks_left = ticks_left.saturating_sub(1);
            state.phase = if ticks_left == 0 {
                PongPhase::Rally
            } else {
                PongPhase::Serving { ticks_left }
            };
            return;
        }
        PongPhase::Rally => {}
    }

    state.time_ticks += 1;
    move_paddles(state, input);

    let ball = &mut state.ball;
    ball.pos += ball.vel;

    if ball.pos.y - BALL_RADIUS <= 0.0 {
        ball.vel.y = ball.vel.y.abs();
        state.events.push(PongEvent::WallBounce);
    } else if ball.pos.y + BALL_RADIUS >= FIELD_HEIGHT {
        ball.vel.y = -ball.vel.y.abs();
        state.events.push(PongEvent::WallBounce);
    }

    // Only a paddle the ball is heading toward can return it
    if ball.vel.x < 0.0 && state.player.rect().strictly_contains(ball.pos) {
        return_ball(ball, &state.player);
        state.events.push(PongEvent::PaddleHit { side: Side::Player });
    } else if ball.vel.x > 0.0 && state.opponent.rect().strictly_contains(ball.pos) {
        return_ball(ball, &state.opponent);
        state.events.push(PongEvent::PaddleHit {
            side: Side::Opponent,
        });
    }

    // Speed creeps up; both axes run at the current speed
    ball.speed += BALL_ACCELERATION;
    ball.vel.x = if ball.vel.x > 0.0 { ball.speed } else { -ball.speed };
    ball.vel.y = if ball.vel.y > 0.0 { ball.speed } else { -ball.speed };

    let scorer = if ball.pos.x < 0.0 {
        Some(Side::Opponent)
    } else if ball.pos.x > FIELD_WIDTH {
        Some(Side::Player)
    } else {
        None
    };

    if let Some(scorer) = scorer {
        *state.score.get_mut(scorer) += 1;
        state.events.push(PongEvent::Goal { scorer });
        log::info!(
            "Goal for {}: {}-{}",
            scorer.label(),
            state.score.player,
            state.score.opponent
        );
        state.reset_ball();
        state.phase = PongPhase::Serving {
            ticks_left: SERVE_PAUSE_TICKS,
        };
    }
}

fn move_paddles(state: &mut PongState, input: &PongInput) {
    if input.up {
        state.player.shift(-PLAYER_PADDLE_SPEED);
    }
    if input.down {
        state.player.shift(PLAYER_PADDLE_SPEED);
    }

    // Opponent tracks the ball so it meets it at the paddle center
    let target = state.ball.pos.y - PADDLE_HEIGHT / 2.0;
    let delta = (target - state.opponent.y).clamp(-OPPONENT_PADDLE_SPEED, OPPONENT_PADDLE_SPEED);
    state.opponent.shift(delta);
}

fn return_ball(ball: &mut Ball, paddle: &Paddle) {
    ball.vel.x = -ball.vel.x;
    let offset = ball.pos.y - paddle.center_y();
    ball.vel.y += offset * PADDLE_ENGLISH;
}
