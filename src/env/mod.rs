//! Learning-environment layer
//!
//! One simulation core plus a pluggable observation encoder and reward
//! shaper, selected by configuration instead of duplicating the simulation
//! per variant.

pub mod features;
pub mod observation;
pub mod reward;

use serde::{Deserialize, Serialize};

pub use features::{GapFeatures, gap_features, next_gap, next_gap_index};
pub use observation::{
    DistanceObservation, ObservationEncoder, ObservationKind, RawObservation, TwoGapObservation,
    VelocityObservation,
};
pub use reward::{
    CenteringReward, ClearanceReward, PassBonusReward, RewardKind, RewardShaper, SurvivalReward,
};

use crate::config::{ConfigError, GameConfig};
use crate::sim::{Action, GameSimulation};

/// Which encoder and shaper an environment uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    pub observation: ObservationKind,
    pub reward: RewardKind,
    /// Scale distances into screen units
    pub normalize: bool,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            observation: ObservationKind::Distance,
            reward: RewardKind::Centering,
            normalize: true,
        }
    }
}

/// One agent-facing transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub observation: Vec<f32>,
    pub reward: f32,
    pub done: bool,
    pub score: u32,
    /// An obstacle was passed this tick
    pub scored: bool,
}

/// Simulation wrapped with an observation encoder and a reward shaper
pub struct Environment {
    sim: GameSimulation,
    env_config: EnvConfig,
    encoder: Box<dyn ObservationEncoder>,
    shaper: Box<dyn RewardShaper>,
}

impl Environment {
    pub fn new(config: GameConfig, env_config: EnvConfig, seed: u64) -> Result<Self, ConfigError> {
        let sim = GameSimulation::new(config, seed)?;
        let encoder = env_config.observation.encoder();
        let shaper = env_config.reward.shaper();
        log::debug!(
            "Environment: observation={} reward={} normalize={}",
            encoder.name(),
            shaper.name(),
            env_config.normalize
        );
        Ok(Self {
            sim,
            env_config,
            encoder,
            shaper,
        })
    }

    /// Start a new episode and return its first observation
    pub fn reset(&mut self, seed: Option<u64>) -> Vec<f32> {
        let snapshot = self.sim.reset(seed);
        self.shaper.reset();
        self.encoder
            .encode(&snapshot, self.sim.config(), self.env_config.normalize)
    }

    /// Apply one action
    pub fn step(&mut self, action: impl Into<Action>) -> Transition {
        let outcome = self.sim.step(action);
        let config = self.sim.config();
        let observation = self
            .encoder
            .encode(&outcome.snapshot, config, self.env_config.normalize);
        let reward = self.shaper.reward(&outcome, config);
        Transition {
            observation,
            reward,
            done: !outcome.alive,
            score: outcome.score,
            scored: outcome.scored(),
        }
    }

    pub fn observation_size(&self) -> usize {
        self.encoder.size()
    }

    pub fn env_config(&self) -> EnvConfig {
        self.env_config
    }

    pub fn reward_name(&self) -> &str {
        self.shaper.name()
    }

    pub fn simulation(&self) -> &GameSimulation {
        &self.sim
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_and_step_shapes() {
        let env_config = EnvConfig {
            observation: ObservationKind::TwoGaps,
            reward: RewardKind::PassBonus,
            normalize: true,
        };
        let mut env = Environment::new(GameConfig::default(), env_config, 5).unwrap();
        let obs = env.reset(Some(5));
        assert_eq!(obs.len(), env.observation_size());

        let transition = env.step(Action::NoOp);
        assert_eq!(transition.observation.len(), 4);
        assert!(!transition.done);
        assert_eq!(transition.score, 0);
    }

    #[test]
    fn test_reports_selected_strategies() {
        let env_config = EnvConfig {
            observation: ObservationKind::Raw,
            reward: RewardKind::Clearance,
            normalize: false,
        };
        let env = Environment::new(GameConfig::default(), env_config, 1).unwrap();
        assert_eq!(env.env_config(), env_config);
        assert_eq!(env.reward_name(), "clearance");
        assert_eq!(env.observation_size(), 4);
    }

    #[test]
    fn test_env_config_from_json() {
        let config: EnvConfig = serde_json::from_str(r#"{ "reward": "survival" }"#).unwrap();
        assert_eq!(config.reward, RewardKind::Survival);
        assert_eq!(config.observation, ObservationKind::Distance);
        assert!(config.normalize);
    }

    #[test]
    fn test_done_after_crash() {
        let mut env = Environment::new(GameConfig::default(), EnvConfig::default(), 5).unwrap();
        let mut transition = env.step(1i64);
        while !transition.done {
            transition = env.step(1i64);
        }
        assert!(transition.done);
        let again = env.step(0i64);
        assert!(again.done);
        assert_eq!(again.score, transition.score);
    }
}
