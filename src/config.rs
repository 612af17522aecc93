//! Game configuration and presets
//!
//! Every physics, geometry and spawn constant the simulation uses lives here so
//! tests and alternate environment variants can override any of them.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Configuration errors. Raised when building a simulation, never during a tick.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f32 },

    #[error("{field} must be > 0, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must be >= 0, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("Invalid value for {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },
}

/// How a no-op tick changes the body's vertical velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FlightModel {
    /// Gravity accumulates into velocity, capped at terminal velocity
    #[default]
    Momentum,
    /// Velocity is set to `gravity` every no-op tick (constant fall rate)
    Stepwise,
}

impl FlightModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlightModel::Momentum => "momentum",
            FlightModel::Stepwise => "stepwise",
        }
    }
}

/// Simulation constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Playfield ===
    pub screen_width: f32,
    pub screen_height: f32,

    // === Body ===
    /// Fixed horizontal position of the body's left edge
    pub player_x: f32,
    /// Top edge of the body at reset
    pub player_start_y: f32,
    /// Vertical velocity at reset
    pub player_start_velocity: f32,
    pub player_width: f32,
    pub player_height: f32,

    // === Physics ===
    pub gravity: f32,
    pub flap_impulse: f32,
    pub terminal_velocity: f32,
    pub flight_model: FlightModel,

    // === Obstacles ===
    pub obstacle_width: f32,
    /// Vertical opening between the upper and lower rectangles
    pub gap_size: f32,
    /// Minimum distance between a gap edge and the screen edge
    pub min_margin: f32,
    /// Leftward scroll per tick
    pub scroll_speed: f32,
    /// Leading-edge x of newly spawned obstacles
    pub spawn_x: f32,
    /// A new obstacle is spawned once the rearmost one is this far left of `spawn_x`
    pub spawn_spacing: f32,

    // === Collision ===
    /// Horizontal shrink of the body's hit-box on each side
    pub hitbox_inset: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,

            player_x: PLAYER_X,
            player_start_y: PLAYER_START_Y,
            player_start_velocity: 0.0,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,

            gravity: GRAVITY,
            flap_impulse: FLAP_IMPULSE,
            terminal_velocity: TERMINAL_VELOCITY,
            flight_model: FlightModel::Momentum,

            obstacle_width: OBSTACLE_WIDTH,
            gap_size: GAP_SIZE,
            min_margin: MIN_MARGIN,
            scroll_speed: SCROLL_SPEED,
            spawn_x: SPAWN_X,
            spawn_spacing: SPAWN_SPACING,

            hitbox_inset: HITBOX_INSET,
        }
    }
}

impl GameConfig {
    /// The 500x500 stand-alone game: 20px square body, fixed fall of 10px per
    /// tick, 15px flaps, obstacles entering at x=550 whenever the last one
    /// reaches x=300.
    pub fn classic() -> Self {
        Self {
            screen_width: 500.0,
            screen_height: 500.0,

            player_x: 200.0,
            player_start_y: 250.0,
            player_start_velocity: 0.0,
            player_width: 20.0,
            player_height: 20.0,

            gravity: 10.0,
            flap_impulse: -15.0,
            terminal_velocity: 10.0,
            flight_model: FlightModel::Stepwise,

            obstacle_width: 50.0,
            gap_size: 120.0,
            min_margin: 10.0,
            scroll_speed: 5.0,
            spawn_x: 550.0,
            spawn_spacing: 250.0,

            hitbox_inset: 0.0,
        }
    }

    /// Parse a (possibly partial) JSON config over the defaults and validate it
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Self::from_json_str_over(&Self::default(), json)
    }

    /// Parse a (possibly partial) JSON object, layering its fields over `base`
    pub fn from_json_str_over(base: &GameConfig, json: &str) -> Result<Self, ConfigError> {
        let overrides: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
        let mut merged = serde_json::to_value(base)?;
        if let Some(fields) = merged.as_object_mut() {
            fields.extend(overrides);
        }
        let config: GameConfig = serde_json::from_value(merged)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file over the defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::load_over(&Self::default(), path)
    }

    /// Load and validate a JSON config file over `base`
    pub fn load_over(base: &GameConfig, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str_over(base, &json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Gap center range `[low, high]` that keeps both gap edges inside the margins
    pub fn gap_center_range(&self) -> (f32, f32) {
        let half_gap = self.gap_size / 2.0;
        (
            self.min_margin + half_gap,
            self.screen_height - self.min_margin - half_gap,
        )
    }

    /// Check every constraint the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let all = [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("player_x", self.player_x),
            ("player_start_y", self.player_start_y),
            ("player_start_velocity", self.player_start_velocity),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("gravity", self.gravity),
            ("flap_impulse", self.flap_impulse),
            ("terminal_velocity", self.terminal_velocity),
            ("obstacle_width", self.obstacle_width),
            ("gap_size", self.gap_size),
            ("min_margin", self.min_margin),
            ("scroll_speed", self.scroll_speed),
            ("spawn_x", self.spawn_x),
            ("spawn_spacing", self.spawn_spacing),
            ("hitbox_inset", self.hitbox_inset),
        ];
        for (field, value) in all {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
        }

        let positive = [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("obstacle_width", self.obstacle_width),
            ("gap_size", self.gap_size),
            ("scroll_speed", self.scroll_speed),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        let non_negative = [
            ("gravity", self.gravity),
            ("terminal_velocity", self.terminal_velocity),
            ("min_margin", self.min_margin),
            ("hitbox_inset", self.hitbox_inset),
            ("player_x", self.player_x),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        if self.gap_size + 2.0 * self.min_margin > self.screen_height {
            return Err(ConfigError::InvalidValue {
                field: "gap_size",
                message: format!(
                    "gap {} plus two margins of {} does not fit in screen height {}",
                    self.gap_size, self.min_margin, self.screen_height
                ),
            });
        }

        if 2.0 * self.hitbox_inset >= self.player_width {
            return Err(ConfigError::InvalidValue {
                field: "hitbox_inset",
                message: format!(
                    "inset {} on both sides leaves no hit-box for width {}",
                    self.hitbox_inset, self.player_width
                ),
            });
        }

        if self.spawn_spacing <= self.obstacle_width {
            return Err(ConfigError::InvalidValue {
                field: "spawn_spacing",
                message: format!(
                    "spacing {} must exceed obstacle width {} or obstacles overlap",
                    self.spawn_spacing, self.obstacle_width
                ),
            });
        }

        if self.spawn_spacing <= self.scroll_speed {
            return Err(ConfigError::InvalidValue {
                field: "spawn_spacing",
                message: format!(
                    "spacing {} must exceed scroll speed {}",
                    self.spawn_spacing, self.scroll_speed
                ),
            });
        }

        if self.spawn_spacing > self.spawn_x + self.obstacle_width {
            return Err(ConfigError::InvalidValue {
                field: "spawn_spacing",
                message: format!(
                    "spacing {} exceeds spawn_x + obstacle width ({}); the field would empty",
                    self.spawn_spacing,
                    self.spawn_x + self.obstacle_width
                ),
            });
        }

        if self.player_x < self.scroll_speed {
            return Err(ConfigError::InvalidValue {
                field: "player_x",
                message: format!(
                    "player_x {} must be >= scroll speed {} so obstacles score before leaving the screen",
                    self.player_x, self.scroll_speed
                ),
            });
        }

        let max_start = self.screen_height - self.player_height;
        if self.player_start_y < 0.0 || self.player_start_y > max_start {
            return Err(ConfigError::InvalidValue {
                field: "player_start_y",
                message: format!(
                    "start {} must lie within [0, {}]",
                    self.player_start_y, max_start
                ),
            });
        }

        Ok(())
    }
}
