//! Flappy Sim - a deterministic gate-dodging simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (body physics, obstacle stream, collisions, scoring)
//! - `config`: Tunable constants, presets and validation
//! - `env`: Observation encoders and reward shapers wrapped around one simulation
//! - `policy`: Action-selection policies for headless runs
//! - `highscores`: Single-integer high score file
//! - `runner`: Headless episode loop behind the `run` command

pub mod config;
pub mod env;
pub mod highscores;
pub mod policy;
pub mod runner;
pub mod sim;

pub use config::{ConfigError, FlightModel, GameConfig};
pub use env::{EnvConfig, Environment, ObservationKind, RewardKind, Transition};
pub use highscores::{HighScoreError, HighScoreFile};
pub use policy::{Autopilot, IdlePolicy, Policy, PolicyKind, RandomPolicy};
pub use runner::{EpisodeSummary, RunError, RunOptions, RunReport, run_episodes};
pub use sim::{Action, GamePhase, GameSimulation, Snapshot, StepOutcome};

/// Default tuning constants (288x512 field, one tick per frame)
pub mod consts {
    /// Playfield dimensions
    pub const SCREEN_WIDTH: f32 = 288.0;
    pub const SCREEN_HEIGHT: f32 = 512.0;

    /// Body defaults. The body's x never changes during an episode.
    pub const PLAYER_X: f32 = 57.0; // 20% of the screen width
    pub const PLAYER_START_Y: f32 = 244.0; // (SCREEN_HEIGHT - PLAYER_HEIGHT) / 2
    pub const PLAYER_WIDTH: f32 = 34.0;
    pub const PLAYER_HEIGHT: f32 = 24.0;

    /// Downward acceleration per tick (positive y is down)
    pub const GRAVITY: f32 = 1.0;
    /// Velocity set by a flap (overrides, never adds)
    pub const FLAP_IMPULSE: f32 = -9.0;
    /// Maximum downward velocity
    pub const TERMINAL_VELOCITY: f32 = 10.0;

    /// Obstacle defaults
    pub const OBSTACLE_WIDTH: f32 = 52.0;
    pub const GAP_SIZE: f32 = 100.0;
    /// Gap edges never come closer than this to the top or bottom of the screen
    pub const MIN_MARGIN: f32 = 100.0;
    pub const SCROLL_SPEED: f32 = 4.0;
    /// New obstacles enter here, just past the right edge
    pub const SPAWN_X: f32 = SCREEN_WIDTH + 10.0;
    /// Minimum distance between consecutive obstacles' leading edges
    pub const SPAWN_SPACING: f32 = SCREEN_WIDTH / 2.0;

    /// Horizontal hit-box shrink applied to each side of the body
    pub const HITBOX_INSET: f32 = 3.0;
}
