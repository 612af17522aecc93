//! Vertical physics of the controlled body
//!
//! The body has no knowledge of screen bounds. Leaving the screen is a
//! collision, detected by the collision module, never clamped here.

use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::config::{FlightModel, GameConfig};

/// The controlled body. `x` is fixed for the whole episode; `y` is the top edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerBody {
    pub x: f32,
    pub y: f32,
    /// Positive is downward
    pub vel_y: f32,
    pub width: f32,
    pub height: f32,
}

impl PlayerBody {
    /// Create a body at the configured start position and velocity
    pub fn new(config: &GameConfig) -> Self {
        Self {
            x: config.player_x,
            y: config.player_start_y,
            vel_y: config.player_start_velocity,
            width: config.player_width,
            height: config.player_height,
        }
    }

    /// Velocity the body would have after one tick with the given input
    pub fn next_velocity(&self, flap: bool, config: &GameConfig) -> f32 {
        if flap {
            return config.flap_impulse;
        }
        match config.flight_model {
            FlightModel::Momentum => (self.vel_y + config.gravity).min(config.terminal_velocity),
            FlightModel::Stepwise => config.gravity.min(config.terminal_velocity),
        }
    }

    /// Advance one tick: set or accelerate velocity, then integrate position
    pub fn update(&mut self, flap: bool, config: &GameConfig) {
        self.vel_y = self.next_velocity(flap, config);
        self.y += self.vel_y;
    }

    /// Bottom edge
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Vertical center
    #[inline]
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Collision rectangle, shrunk horizontally by `inset` on each side
    pub fn hitbox(&self, inset: f32) -> Aabb {
        Aabb::new(
            self.x + inset,
            self.y,
            self.x + self.width - inset,
            self.y + self.height,
        )
    }
}
