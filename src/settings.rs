//! Game settings and balance
//!
//! Every gameplay number the simulation reads lives here, with defaults taken
//! from `consts`. Settings are serializable so a tuned set can be logged or
//! supplied as JSON.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Pace presets scale the timing knobs without touching geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Pace {
    Relaxed,
    #[default]
    Classic,
    Brisk,
}

impl Pace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pace::Relaxed => "Relaxed",
            Pace::Classic => "Classic",
            Pace::Brisk => "Brisk",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "relaxed" | "slow" => Some(Pace::Relaxed),
            "classic" | "normal" => Some(Pace::Classic),
            "brisk" | "fast" => Some(Pace::Brisk),
            _ => None,
        }
    }

    /// Next preset in menu order, wrapping around
    pub fn next(&self) -> Self {
        match self {
            Pace::Relaxed => Pace::Classic,
            Pace::Classic => Pace::Brisk,
            Pace::Brisk => Pace::Relaxed,
        }
    }

    /// Multiplier applied to tick counts (cadence, delays, spawn interval)
    pub fn timing_scale(&self) -> f32 {
        match self {
            Pace::Relaxed => 1.5,
            Pace::Classic => 1.0,
            Pace::Brisk => 0.5,
        }
    }
}

/// Rejected settings
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsError {
    /// Field too small for the launcher lane, the floor margin or the
    /// opening grid
    FieldTooSmall { width: f32, height: f32 },
    /// A value that must be strictly positive was not
    NonPositive { name: &'static str },
    /// Lower bound above upper bound
    InvertedRange { name: &'static str, min: u32, max: u32 },
    /// JSON could not be parsed into settings
    Parse(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::FieldTooSmall { width, height } => {
                write!(f, "field {width}x{height} is too small to play on")
            }
            SettingsError::NonPositive { name } => write!(f, "{name} must be greater than zero"),
            SettingsError::InvertedRange { name, min, max } => {
                write!(f, "{name} range is inverted ({min} > {max})")
            }
            SettingsError::Parse(msg) => write!(f, "invalid settings JSON: {msg}"),
        }
    }
}

impl std::error::Error for SettingsError {}

/// Gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub pace: Pace,

    // === Field ===
    pub field_width: f32,
    pub field_height: f32,
    /// Distance above the bottom edge where falling blocks end the match
    pub floor_margin: f32,

    // === Launcher & volleys ===
    pub launcher_speed: f32,
    pub projectile_speed: f32,
    pub start_ammo: u32,
    pub volley_cadence_ticks: u32,
    pub turn_delay_ticks: u32,
    pub turn_switch_pause_ticks: u32,

    // === Waves ===
    pub block_shift: f32,
    pub powerup_shift: f32,
    pub new_row_min_blocks: u32,
    pub new_row_max_blocks: u32,
    pub turns_per_new_row: u32,
    pub min_resistance: u8,
    pub max_resistance: u8,

    // === Power-ups ===
    pub powerup_interval_ticks: u32,
    pub max_powerups: usize,

    // === Screens ===
    pub result_screen_ticks: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pace: Pace::Classic,

            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            floor_margin: FLOOR_MARGIN,

            launcher_speed: LAUNCHER_SPEED,
            projectile_speed: PROJECTILE_SPEED,
            start_ammo: START_AMMO,
            volley_cadence_ticks: VOLLEY_CADENCE_TICKS,
            turn_delay_ticks: TURN_DELAY_TICKS,
            turn_switch_pause_ticks: TURN_SWITCH_PAUSE_TICKS,

            block_shift: BLOCK_SHIFT,
            powerup_shift: POWERUP_SHIFT,
            new_row_min_blocks: NEW_ROW_MIN_BLOCKS,
            new_row_max_blocks: NEW_ROW_MAX_BLOCKS,
            turns_per_new_row: TURNS_PER_NEW_ROW,
            min_resistance: MIN_RESISTANCE,
            max_resistance: MAX_RESISTANCE,

            powerup_interval_ticks: POWERUP_INTERVAL_TICKS,
            max_powerups: MAX_POWERUPS,

            result_screen_ticks: RESULT_SCREEN_TICKS,
        }
    }
}

impl Settings {
    /// Create settings from a pace preset (applies preset timing)
    pub fn from_pace(pace: Pace) -> Self {
        let mut settings = Self::default();
        settings.apply_pace(pace);
        settings
    }

    /// Apply a pace preset, scaling the default timings
    pub fn apply_pace(&mut self, pace: Pace) {
        let scale = |ticks: u32| ((ticks as f32 * pace.timing_scale()).round() as u32).max(1);
        self.pace = pace;
        self.volley_cadence_ticks = scale(VOLLEY_CADENCE_TICKS);
        self.turn_delay_ticks = scale(TURN_DELAY_TICKS);
        self.powerup_interval_ticks = scale(POWERUP_INTERVAL_TICKS);
    }

    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings =
            serde_json::from_str(json).map_err(|e| SettingsError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check the settings describe a playable game
    pub fn validate(&self) -> Result<(), SettingsError> {
        let lane = 2.0 * LAUNCHER_EDGE_MARGIN;
        if self.field_width <= lane || self.field_height <= self.floor_margin + LAUNCHER_FLOOR_OFFSET {
            return Err(SettingsError::FieldTooSmall {
                width: self.field_width,
                height: self.field_height,
            });
        }
        // The opening grid is fixed; it must fit inside the launcher lane and
        // start above the floor
        let grid_right =
            LAUNCHER_EDGE_MARGIN + (START_COLUMNS - 1) as f32 * BLOCK_PITCH + BLOCK_SIZE;
        let grid_bottom = FALLBACK_ROW_Y + (START_ROWS - 1) as f32 * BLOCK_PITCH + BLOCK_SIZE;
        if grid_right > self.field_width - LAUNCHER_EDGE_MARGIN
            || grid_bottom >= self.floor_threshold()
        {
            return Err(SettingsError::FieldTooSmall {
                width: self.field_width,
                height: self.field_height,
            });
        }
        if self.launcher_speed <= 0.0 {
            return Err(SettingsError::NonPositive { name: "launcher_speed" });
        }
        if self.projectile_speed <= 0.0 {
            return Err(SettingsError::NonPositive { name: "projectile_speed" });
        }
        if self.volley_cadence_ticks == 0 {
            return Err(SettingsError::NonPositive { name: "volley_cadence_ticks" });
        }
        if self.turns_per_new_row == 0 {
            return Err(SettingsError::NonPositive { name: "turns_per_new_row" });
        }
        if self.powerup_interval_ticks == 0 {
            return Err(SettingsError::NonPositive { name: "powerup_interval_ticks" });
        }
        if self.min_resistance == 0 {
            return Err(SettingsError::NonPositive { name: "min_resistance" });
        }
        if self.new_row_min_blocks > self.new_row_max_blocks {
            return Err(SettingsError::InvertedRange {
                name: "new_row_blocks",
                min: self.new_row_min_blocks,
                max: self.new_row_max_blocks,
            });
        }
        if self.min_resistance > self.max_resistance {
            return Err(SettingsError::InvertedRange {
                name: "resistance",
                min: self.min_resistance as u32,
                max: self.max_resistance as u32,
            });
        }
        Ok(())
    }

    /// Y coordinate a block's bottom edge must reach to end the match
    pub fn floor_threshold(&self) -> f32 {
        self.field_height - self.floor_margin
    }

    /// Inclusive horizontal bounds of the launcher
    pub fn launcher_bounds(&self) -> (f32, f32) {
        (LAUNCHER_EDGE_MARGIN, self.field_width - LAUNCHER_EDGE_MARGIN)
    }

    /// Fixed launcher row
    pub fn launcher_y(&self) -> f32 {
        self.field_height - LAUNCHER_FLOOR_OFFSET
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.floor_threshold(), 530.0);
        assert_eq!(settings.launcher_bounds(), (50.0, 750.0));
        assert_eq!(settings.launcher_y(), 550.0);
    }

    #[test]
    fn test_pace_scales_timing() {
        let brisk = Settings::from_pace(Pace::Brisk);
        assert_eq!(brisk.volley_cadence_ticks, 5);
        assert_eq!(brisk.turn_delay_ticks, 30);
        assert_eq!(brisk.powerup_interval_ticks, 300);

        let relaxed = Settings::from_pace(Pace::Relaxed);
        assert_eq!(relaxed.volley_cadence_ticks, 15);
        assert_eq!(relaxed.pace, Pace::Relaxed);
    }

    #[test]
    fn test_pace_from_str() {
        assert_eq!(Pace::from_str("FAST"), Some(Pace::Brisk));
        assert_eq!(Pace::from_str("classic"), Some(Pace::Classic));
        assert_eq!(Pace::from_str("warp"), None);
        assert_eq!(Pace::Relaxed.as_str(), "Relaxed");
        assert_eq!(Pace::Brisk.next(), Pace::Relaxed);
        assert_eq!(Pace::Classic.next(), Pace::Brisk);
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let settings = Settings::from_json(r#"{ "start_ammo": 3, "max_powerups": 2 }"#).unwrap();
        assert_eq!(settings.start_ammo, 3);
        assert_eq!(settings.max_powerups, 2);
        assert_eq!(settings.field_width, FIELD_WIDTH);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            Settings::from_json("not json"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let settings = Settings {
            volley_cadence_ticks: 0,
            ..Default::default()
        };
        assert_eq!(
            settings.validate(),
            Err(SettingsError::NonPositive { name: "volley_cadence_ticks" })
        );

        let settings = Settings {
            new_row_min_blocks: 10,
            new_row_max_blocks: 2,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvertedRange { name: "new_row_blocks", .. })
        ));

        let settings = Settings {
            field_width: 90.0,
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(SettingsError::FieldTooSmall { .. })));
    }

    #[test]
    fn test_validate_rejects_field_smaller_than_opening_grid() {
        // Lane fits, but the 20-column grid runs past the right bound
        let settings = Settings {
            field_width: 600.0,
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(SettingsError::FieldTooSmall { .. })));

        // Floor at 110 sits above the second opening row's bottom (115)
        let settings = Settings {
            field_height: 180.0,
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(SettingsError::FieldTooSmall { .. })));

        // Smallest width that still holds the grid
        let settings = Settings {
            field_width: 795.0,
            ..Default::default()
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_error_display() {
        let err = SettingsError::NonPositive { name: "launcher_speed" };
        assert_eq!(err.to_string(), "launcher_speed must be greater than zero");
    }
}
