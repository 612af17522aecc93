//! Obstacle pass counting

use super::obstacles::ObstacleField;
use super::player::PlayerBody;

/// Counts obstacles the body has fully cleared.
///
/// Only the frontmost unpassed obstacle is ever examined, so obstacles are
/// counted in order and each at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreTracker {
    score: u32,
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Mark and count the next obstacle if the body is now past its trailing edge.
    /// Returns the id of the obstacle that scored this tick.
    pub fn update(&mut self, player: &PlayerBody, field: &mut ObstacleField) -> Option<u32> {
        let width = field.width();
        let obstacle = field.first_unpassed_mut()?;
        if player.x <= obstacle.right(width) {
            return None;
        }
        obstacle.passed = true;
        self.score += 1;
        Some(obstacle.id)
    }
}
