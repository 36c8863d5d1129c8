//! Fall Blocks - a turn-based falling-blocks shooter, plus Pong
//!
//! Core modules:
//! - `sim`: Deterministic Fall Blocks simulation (turns, waves, collisions)
//! - `pong`: Pong simulation
//! - `renderer`: Terminal canvas and scene drawing
//! - `platform`: Terminal input and frame clock
//! - `settings`: Data-driven game balance
//! - `history`: Recent match outcomes

pub mod history;
pub mod platform;
pub mod pong;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use history::{MatchHistory, MatchOutcome};
pub use settings::{Pace, Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Logical update rate (ticks per second)
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Playfield dimensions (logical units)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Launcher defaults
    pub const LAUNCHER_SPEED: f32 = 2.0;
    /// Horizontal distance the launcher keeps from either edge
    pub const LAUNCHER_EDGE_MARGIN: f32 = 50.0;
    /// Launcher sits this far above the bottom edge
    pub const LAUNCHER_FLOOR_OFFSET: f32 = 50.0;
    /// Projectiles spawn this far above the launcher
    pub const MUZZLE_OFFSET: f32 = 10.0;

    /// Projectile defaults
    pub const PROJECTILE_SIZE: f32 = 7.0;
    pub const PROJECTILE_SPEED: f32 = 10.0;

    /// Block defaults
    pub const BLOCK_SIZE: f32 = 30.0;
    /// Grid pitch between block columns/rows
    pub const BLOCK_PITCH: f32 = 35.0;
    pub const MIN_RESISTANCE: u8 = 1;
    pub const MAX_RESISTANCE: u8 = 5;
    /// Cosmetic shake length after a hit (ticks)
    pub const BLOCK_SHAKE_TICKS: u32 = 10;

    /// Power-up defaults
    pub const POWERUP_SIZE: f32 = 20.0;
    pub const MAX_POWERUPS: usize = 5;

    /// Starting ammunition per side
    pub const START_AMMO: u32 = 10;
    /// Ticks between projectiles in a volley
    pub const VOLLEY_CADENCE_TICKS: u32 = 10;
    /// Minimum ticks between turn start and turn switch
    pub const TURN_DELAY_TICKS: u32 = 60;
    /// Pause at each turn switch (~50 ms)
    pub const TURN_SWITCH_PAUSE_TICKS: u32 = 3;
    /// Ticks between timed power-up spawns (10 seconds)
    pub const POWERUP_INTERVAL_TICKS: u32 = 10 * 60;
    /// Result screen duration (3 seconds)
    pub const RESULT_SCREEN_TICKS: u32 = 3 * 60;

    /// Wave shifts
    pub const BLOCK_SHIFT: f32 = 25.0;
    pub const POWERUP_SHIFT: f32 = 20.0;
    /// Blocks whose bottom edge reaches `FIELD_HEIGHT - FLOOR_MARGIN` end the match
    pub const FLOOR_MARGIN: f32 = 70.0;
    /// Row used as the reference when the field is empty
    pub const FALLBACK_ROW_Y: f32 = 50.0;
    pub const NEW_ROW_MIN_BLOCKS: u32 = 3;
    pub const NEW_ROW_MAX_BLOCKS: u32 = 9;
    /// A new row is added every this many completed turns
    pub const TURNS_PER_NEW_ROW: u32 = 1;

    /// Opening field layout
    pub const START_ROWS: u32 = 2;
    pub const START_COLUMNS: u32 = 20;
    pub const START_POWERUPS: usize = 5;

    /// Opponent fires when its launcher is within this distance of the target
    pub const OPPONENT_AIM_TOLERANCE: f32 = 5.0;
    /// Samples taken along the launcher-to-block segment by the reachability check
    pub const REACHABILITY_SAMPLES: u32 = 10;
}

/// Linear map of a logical coordinate onto a cell grid of `cells` cells
#[inline]
pub fn to_cell(value: f32, extent: f32, cells: u16) -> i32 {
    if extent <= 0.0 {
        return 0;
    }
    (value * cells as f32 / extent).floor() as i32
}
