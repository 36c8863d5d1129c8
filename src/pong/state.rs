//! Pong state
//!
//! One explicit struct owned by the loop driver; nothing lives in globals.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH, TICKS_PER_SECOND};
use crate::sim::{PerSide, Rect, Side};

pub const PADDLE_WIDTH: f32 = 10.0;
pub const PADDLE_HEIGHT: f32 = 100.0;
pub const PLAYER_PADDLE_X: f32 = 20.0;
pub const OPPONENT_PADDLE_X: f32 = FIELD_WIDTH - 30.0;
pub const PLAYER_PADDLE_SPEED: f32 = 8.0;
pub const OPPONENT_PADDLE_SPEED: f32 = 7.0;

pub const BALL_RADIUS: f32 = 10.0;
pub const BALL_START_SPEED: f32 = 6.0;
/// Speed gained every rally tick
pub const BALL_ACCELERATION: f32 = 0.001;
/// Vertical velocity added per unit of distance from the paddle center
pub const PADDLE_ENGLISH: f32 = 0.2;

/// Pause after a goal (1 second)
pub const SERVE_PAUSE_TICKS: u32 = TICKS_PER_SECOND;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PongPhase {
    /// Waiting for the start command
    Title,
    /// Ball parked at center after a goal
    Serving { ticks_left: u32 },
    /// Ball in play
    Rally,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PongEvent {
    WallBounce,
    PaddleHit { side: Side },
    Goal { scorer: Side },
}

/// A vertical paddle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub x: f32,
    /// Top edge
    pub y: f32,
}

impl Paddle {
    pub fn centered(x: f32) -> Self {
        Self {
            x,
            y: FIELD_HEIGHT / 2.0 - PADDLE_HEIGHT / 2.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(Vec2::new(self.x, self.y), Vec2::new(PADDLE_WIDTH, PADDLE_HEIGHT))
    }

    /// Move by `dy`, staying inside the field
    pub fn shift(&mut self, dy: f32) {
        self.y = (self.y + dy).clamp(0.0, FIELD_HEIGHT - PADDLE_HEIGHT);
    }

    pub fn center_y(&self) -> f32 {
        self.y + PADDLE_HEIGHT / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Per-axis speed; grows slowly during a rally
    pub speed: f32,
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PongState {
    pub seed: u64,
    #[serde(skip, default = "default_rng")]
    pub(crate) rng: Pcg32,
    pub phase: PongPhase,
    pub ball: Ball,
    pub player: Paddle,
    pub opponent: Paddle,
    pub score: PerSide<u32>,
    pub time_ticks: u64,
    #[serde(skip)]
    pub events: Vec<PongEvent>,
}

impl PongState {
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let ball = serve_ball(&mut rng);
        Self {
            seed,
            rng,
            phase: PongPhase::Title,
            ball,
            player: Paddle::centered(PLAYER_PADDLE_X),
            opponent: Paddle::centered(OPPONENT_PADDLE_X),
            score: PerSide::default(),
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Put a fresh ball at center
    pub fn reset_ball(&mut self) {
        self.ball = serve_ball(&mut self.rng);
    }
}

/// Ball at center, start speed, random diagonal
fn serve_ball(rng: &mut Pcg32) -> Ball {
    let sign = |heads: bool| if heads { 1.0 } else { -1.0 };
    let dx = sign(rng.random_bool(0.5));
    let dy = sign(rng.random_bool(0.5));
    Ball {
        pos: Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0),
        vel: Vec2::new(dx, dy) * BALL_START_SPEED,
        speed: BALL_START_SPEED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_pong_state() {
        let state = PongState::new(5);
        assert_eq!(state.phase, PongPhase::Title);
        assert_eq!(state.ball.pos, Vec2::new(400.0, 300.0));
        assert_eq!(state.ball.vel.x.abs(), BALL_START_SPEED);
        assert_eq!(state.ball.vel.y.abs(), BALL_START_SPEED);
        assert_eq!(state.player.y, 250.0);
        assert_eq!(state.opponent.x, 770.0);
    }

    #[test]
    fn test_paddle_shift_clamps() {
        let mut paddle = Paddle::centered(PLAYER_PADDLE_X);
        paddle.shift(-1000.0);
        assert_eq!(paddle.y, 0.0);
        paddle.shift(1000.0);
        assert_eq!(paddle.y, FIELD_HEIGHT - PADDLE_HEIGHT);
    }
}
