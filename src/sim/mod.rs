//! Deterministic Fall Blocks simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod opponent;
pub mod rect;
pub mod state;
pub mod tick;
pub mod wave;

pub use collision::{CollisionReport, resolve_collisions};
pub use opponent::{OpponentCommand, choose_target, is_block_reachable};
pub use rect::Rect;
pub use state::{
    Block, Direction, GameEvent, GamePhase, GameState, Launcher, PerSide, PowerUp, Projectile,
    Side, TurnPhase,
};
pub use tick::{MatchSummary, TickInput, begin_volley, tick};
