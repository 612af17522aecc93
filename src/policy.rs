//! Action-selection policies for headless runs

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::GameConfig;
use crate::sim::{Action, Snapshot};

pub trait Policy: Send {
    fn name(&self) -> &str;
    fn act(&mut self, snapshot: &Snapshot, config: &GameConfig) -> Action;
}

/// Never flaps - useful for testing.
pub struct IdlePolicy;

impl Policy for IdlePolicy {
    fn name(&self) -> &str {
        "idle"
    }

    fn act(&mut self, _snapshot: &Snapshot, _config: &GameConfig) -> Action {
        Action::NoOp
    }
}

/// Flaps at random with a fixed probability
pub struct RandomPolicy {
    rng: Pcg32,
    flap_probability: f64,
}

impl RandomPolicy {
    pub fn new(seed: u64, flap_probability: f64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            flap_probability: flap_probability.clamp(0.0, 1.0),
        }
    }
}

impl Policy for RandomPolicy {
    fn name(&self) -> &str {
        "random"
    }

    fn act(&mut self, _snapshot: &Snapshot, _config: &GameConfig) -> Action {
        Action::from(self.rng.random_bool(self.flap_probability))
    }
}

/// Keeps the body just above the bottom of the upcoming gap.
///
/// Predicts the next tick under a no-op and flaps only if the body's bottom
/// would drop below the gap bottom minus `margin`.
pub struct Autopilot {
    margin: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self { margin: 4.0 }
    }
}

impl Autopilot {
    pub fn new(margin: f32) -> Self {
        Self { margin }
    }

    /// Lowest allowed bottom edge for the body
    fn floor_target(&self, snapshot: &Snapshot, config: &GameConfig) -> f32 {
        let player = &snapshot.player;
        // Target the first obstacle that can still touch the hit-box
        let hitbox_left = player.x + config.hitbox_inset;
        snapshot
            .obstacles
            .iter()
            .find(|o| o.right(config.obstacle_width) > hitbox_left)
            .map_or(config.screen_height / 2.0 + config.gap_size / 2.0, |o| {
                o.gap_bottom
            })
            - self.margin
    }
}

impl Policy for Autopilot {
    fn name(&self) -> &str {
        "autopilot"
    }

    fn act(&mut self, snapshot: &Snapshot, config: &GameConfig) -> Action {
        let player = &snapshot.player;
        let predicted_bottom = player.bottom() + player.next_velocity(false, config);
        Action::from(predicted_bottom > self.floor_target(snapshot, config))
    }
}

/// Selects a policy from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PolicyKind {
    Idle,
    Random,
    Autopilot,
}

impl PolicyKind {
    pub fn build(self, seed: u64) -> Box<dyn Policy> {
        match self {
            PolicyKind::Idle => Box::new(IdlePolicy),
            PolicyKind::Random => Box::new(RandomPolicy::new(seed, 0.1)),
            PolicyKind::Autopilot => Box::new(Autopilot::default()),
        }
    }
}
