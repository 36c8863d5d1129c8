//! Platform layer
//!
//! Terminal-facing pieces that the simulations never see:
//! - Keyboard state tracking
//! - Fixed-timestep frame clock

pub mod clock;
pub mod input;

pub use clock::FrameClock;
pub use input::{Command, KeyTracker};
