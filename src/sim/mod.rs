//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed logical tick per `step`
//! - Seeded RNG only, owned by the obstacle field
//! - Obstacles kept in strict x order
//! - No rendering or platform dependencies

pub mod collision;
pub mod obstacles;
pub mod player;
pub mod score;
pub mod state;
pub mod tick;

pub use collision::{Aabb, CollisionDetector, CrashReason};
pub use obstacles::{FieldUpdate, Obstacle, ObstacleField};
pub use player::PlayerBody;
pub use score::ScoreTracker;
pub use state::{GameEvent, GamePhase, RngState, Snapshot};
pub use tick::{Action, GameSimulation, StepOutcome};
