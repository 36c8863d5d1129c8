//! Terminal rendering
//!
//! Scenes draw into a [`Canvas`] of character cells, which is then
//! presented through crossterm. Nothing here mutates game state.

pub mod canvas;
pub mod fall_blocks;
pub mod menu;
pub mod pong;
pub mod terminal;

pub use canvas::{Canvas, Cell};
pub use terminal::present;
