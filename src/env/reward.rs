//! Reward shaping strategies layered over step outcomes

use serde::{Deserialize, Serialize};

use super::features::next_gap;
use crate::config::GameConfig;
use crate::sim::StepOutcome;

/// Bonus for passing an obstacle in the clearance reward
const CLEARANCE_PASS_BONUS: f32 = 20.0;
/// Clearance reward on the crash tick
const CLEARANCE_CRASH_PENALTY: f32 = -10.0;

/// Computes a scalar reward for one transition
pub trait RewardShaper: Send {
    fn name(&self) -> &str;

    fn reward(&mut self, outcome: &StepOutcome, config: &GameConfig) -> f32;

    /// Called at the start of every episode
    fn reset(&mut self) {}
}

/// `1 - |v_dist|` in screen units: highest when level with the next gap
pub struct CenteringReward;

impl RewardShaper for CenteringReward {
    fn name(&self) -> &str {
        "centering"
    }

    fn reward(&mut self, outcome: &StepOutcome, config: &GameConfig) -> f32 {
        let features = next_gap(&outcome.snapshot, config).normalized(config);
        1.0 - features.v_dist.abs()
    }
}

/// `2` on a pass, centering otherwise
pub struct PassBonusReward;

impl RewardShaper for PassBonusReward {
    fn name(&self) -> &str {
        "pass_bonus"
    }

    fn reward(&mut self, outcome: &StepOutcome, config: &GameConfig) -> f32 {
        if outcome.scored() {
            2.0
        } else {
            CenteringReward.reward(outcome, config)
        }
    }
}

/// `2` on a pass, `1` for every other tick
pub struct SurvivalReward;

impl RewardShaper for SurvivalReward {
    fn name(&self) -> &str {
        "survival"
    }

    fn reward(&mut self, outcome: &StepOutcome, _config: &GameConfig) -> f32 {
        if outcome.scored() { 2.0 } else { 1.0 }
    }
}

/// Inverse vertical distance to the current gap center, with a pass bonus
/// and a flat crash penalty
pub struct ClearanceReward;

impl RewardShaper for ClearanceReward {
    fn name(&self) -> &str {
        "clearance"
    }

    fn reward(&mut self, outcome: &StepOutcome, config: &GameConfig) -> f32 {
        if !outcome.alive {
            return CLEARANCE_CRASH_PENALTY;
        }
        let snapshot = &outcome.snapshot;
        let player = &snapshot.player;
        let Some(obstacle) = snapshot
            .obstacles
            .iter()
            .find(|o| o.right(config.obstacle_width) > player.x)
        else {
            return 0.0;
        };

        let diff = (player.y - obstacle.gap_center()).abs();
        let mut reward = 1.0 / diff.max(1.0);
        if outcome.scored() {
            reward += CLEARANCE_PASS_BONUS;
        }
        reward
    }
}

/// Selects a reward shaper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardKind {
    #[default]
    Centering,
    PassBonus,
    Survival,
    Clearance,
}

impl RewardKind {
    pub fn shaper(self) -> Box<dyn RewardShaper> {
        match self {
            RewardKind::Centering => Box::new(CenteringReward),
            RewardKind::PassBonus => Box::new(PassBonusReward),
            RewardKind::Survival => Box::new(SurvivalReward),
            RewardKind::Clearance => Box::new(ClearanceReward),
        }
    }
}
