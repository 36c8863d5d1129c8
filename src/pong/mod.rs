//! Deterministic Pong simulation
//!
//! Same rules as `sim`: fixed timestep, seeded RNG, no rendering or
//! platform dependencies.

pub mod state;
pub mod tick;

pub use state::{Ball, Paddle, PongEvent, PongPhase, PongState};
pub use tick::{PongInput, tick};
