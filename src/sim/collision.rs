//! Collision detection between the body, the screen bounds and obstacles
//!
//! Checks run in a fixed order: bounds first, then the single obstacle whose
//! horizontal span overlaps the body's hit-box. Obstacles never overlap each
//! other and the body's x is fixed, so at most one obstacle can be in range.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::obstacles::{Obstacle, ObstacleField};
use super::player::PlayerBody;
use crate::config::GameConfig;

/// Axis-aligned rectangle in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min: Vec2::new(min_x, min_y),
            max: Vec2::new(max_x, max_y),
        }
    }

    /// Open-interval overlap on x (touching edges do not overlap)
    #[inline]
    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x && self.max.x > other.min.x
    }

    /// Open-interval overlap on both axes
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.overlaps_x(other) && self.min.y < other.max.y && self.max.y > other.min.y
    }
}

/// Why an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum CrashReason {
    /// Top edge went above the screen
    Ceiling,
    /// Bottom edge went below the screen
    Floor,
    /// Hit the upper or lower rectangle of an obstacle
    Obstacle { id: u32 },
}

impl Obstacle {
    /// Upper rectangle, from the top of the screen down to the gap
    pub fn upper_rect(&self, width: f32) -> Aabb {
        Aabb::new(self.x, f32::NEG_INFINITY, self.x + width, self.gap_top)
    }

    /// Lower rectangle, from the gap down past the bottom of the screen
    pub fn lower_rect(&self, width: f32) -> Aabb {
        Aabb::new(self.x, self.gap_bottom, self.x + width, f32::INFINITY)
    }

    /// Horizontal extent as a full-height rectangle
    pub fn column(&self, width: f32) -> Aabb {
        Aabb::new(self.x, f32::NEG_INFINITY, self.x + width, f32::INFINITY)
    }
}

/// Stateless overlap test between the body and its surroundings
#[derive(Debug, Clone, Copy)]
pub struct CollisionDetector {
    screen_height: f32,
    obstacle_width: f32,
    hitbox_inset: f32,
}

impl CollisionDetector {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            screen_height: config.screen_height,
            obstacle_width: config.obstacle_width,
            hitbox_inset: config.hitbox_inset,
        }
    }

    /// Return the crash reason, if the body collides with anything this tick
    pub fn check(&self, player: &PlayerBody, field: &ObstacleField) -> Option<CrashReason> {
        if player.y < 0.0 {
            return Some(CrashReason::Ceiling);
        }
        if player.bottom() > self.screen_height {
            return Some(CrashReason::Floor);
        }

        let hitbox = player.hitbox(self.hitbox_inset);
        let obstacle = field
            .iter()
            .find(|o| hitbox.overlaps_x(&o.column(self.obstacle_width)))?;

        let hit = hitbox.intersects(&obstacle.upper_rect(self.obstacle_width))
            || hitbox.intersects(&obstacle.lower_rect(self.obstacle_width));
        hit.then_some(CrashReason::Obstacle { id: obstacle.id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::obstacles::ObstacleField;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup(obstacle_x: f32, gap_top: f32) -> (GameConfig, ObstacleField) {
        let config = GameConfig::default();
        let mut field = ObstacleField::new(&config, Pcg32::seed_from_u64(1));
        field.clear_for_test();
        field.push_for_test(obstacle_x, gap_top);
        (config, field)
    }

    #[test]
    fn test_aabb_touching_edges_do_not_intersect() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::new(10.0, 0.0, 20.0, 10.0);
        assert!(!a.intersects(&b));
        let c = Aabb::new(9.0, 9.0, 20.0, 20.0);
        assert!(a.intersects(&c));
    }

    #[test]
    fn test_ceiling_and_floor() {
        let (config, field) = setup(1000.0, 200.0);
        let detector = CollisionDetector::new(&config);

        let mut body = PlayerBody::new(&config);
        body.y = -0.5;
        assert_eq!(detector.check(&body, &field), Some(CrashReason::Ceiling));

        body.y = config.screen_height - body.height + 0.5;
        assert_eq!(detector.check(&body, &field), Some(CrashReason::Floor));

        // Exactly touching the bottom edge is still inside
        body.y = config.screen_height - body.height;
        assert_eq!(detector.check(&body, &field), None);
    }

    #[test]
    fn test_inside_gap_is_safe() {
        let config = GameConfig::default();
        let mut body = PlayerBody::new(&config);
        // Gap 200..300, body 24px tall sitting at 230
        body.y = 230.0;
        let (_, field) = setup(body.x, 200.0);
        let detector = CollisionDetector::new(&config);
        assert_eq!(detector.check(&body, &field), None);
    }

    #[test]
    fn test_gap_edges_are_inclusive() {
        let config = GameConfig::default();
        let mut body = PlayerBody::new(&config);
        let (_, field) = setup(body.x, 200.0);
        let detector = CollisionDetector::new(&config);

        body.y = 200.0;
        assert_eq!(detector.check(&body, &field), None);
        body.y = 300.0 - body.height;
        assert_eq!(detector.check(&body, &field), None);
    }

    #[test]
    fn test_hits_upper_and_lower() {
        let config = GameConfig::default();
        let mut body = PlayerBody::new(&config);
        let (_, field) = setup(body.x, 200.0);
        let id = field.front().id;
        let detector = CollisionDetector::new(&config);

        body.y = 190.0;
        assert_eq!(detector.check(&body, &field), Some(CrashReason::Obstacle { id }));
        body.y = 290.0;
        assert_eq!(detector.check(&body, &field), Some(CrashReason::Obstacle { id }));
    }

    #[test]
    fn test_inset_allows_grazing_leading_edge() {
        let config = GameConfig::default();
        let mut body = PlayerBody::new(&config);
        body.y = 100.0; // well above the gap
        let detector = CollisionDetector::new(&config);

        // Obstacle starts 2px inside the nominal body, but outside the inset hit-box
        let (_, field) = setup(body.x + body.width - 2.0, 200.0);
        assert_eq!(detector.check(&body, &field), None);

        // 4px inside the nominal body reaches the hit-box
        let (_, field) = setup(body.x + body.width - 4.0, 200.0);
        assert!(detector.check(&body, &field).is_some());
    }

    #[test]
    fn test_obstacle_behind_player_is_ignored() {
        let config = GameConfig::default();
        let mut body = PlayerBody::new(&config);
        body.y = 100.0;
        let (_, field) = setup(body.x - config.obstacle_width, 200.0);
        let detector = CollisionDetector::new(&config);
        assert_eq!(detector.check(&body, &field), None);
    }
}
