//! Distances from the body to upcoming gaps, shared by encoders and rewards

use crate::config::GameConfig;
use crate::sim::Snapshot;

/// Horizontal and vertical offset from the body to one gap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapFeatures {
    /// Obstacle mid-line minus the body's reference x, plus the hit-box inset
    pub h_dist: f32,
    /// Gap center minus body center (positive: gap is below the body)
    pub v_dist: f32,
}

impl GapFeatures {
    /// Scale into screen units
    pub fn normalized(self, config: &GameConfig) -> Self {
        Self {
            h_dist: self.h_dist / config.screen_width,
            v_dist: self.v_dist / config.screen_height,
        }
    }
}

/// Features for the obstacle at `index`
pub fn gap_features(snapshot: &Snapshot, config: &GameConfig, index: usize) -> GapFeatures {
    let player = &snapshot.player;
    let obstacle = &snapshot.obstacles[index];
    // Reference x is the body's left edge minus half its width, plus the hit-box inset
    let h_dist = obstacle.x + config.obstacle_width / 2.0 - (player.x - player.width / 2.0)
        + config.hitbox_inset;
    let v_dist = obstacle.gap_center() - player.center_y();
    GapFeatures { h_dist, v_dist }
}

/// Index of the next gap: the first obstacle with a non-negative `h_dist`,
/// or the rearmost one if every obstacle is already behind.
pub fn next_gap_index(snapshot: &Snapshot, config: &GameConfig) -> usize {
    let last = snapshot.obstacles.len().saturating_sub(1);
    (0..snapshot.obstacles.len())
        .find(|&i| gap_features(snapshot, config, i).h_dist >= 0.0)
        .unwrap_or(last)
}

/// Features of the next gap
pub fn next_gap(snapshot: &Snapshot, config: &GameConfig) -> GapFeatures {
    gap_features(snapshot, config, next_gap_index(snapshot, config))
}
