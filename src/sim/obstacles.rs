//! Procedural obstacle stream
//!
//! Obstacles are generated lazily at the spawn origin and dropped once fully
//! scrolled past the left edge, so memory and per-tick cost stay constant no
//! matter how long an episode runs.

use std::collections::VecDeque;

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;

/// One gated obstacle: an upper and a lower rectangle around a vertical gap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Leading (left) edge
    pub x: f32,
    pub gap_top: f32,
    pub gap_bottom: f32,
    /// Set once by the score tracker
    pub passed: bool,
}

impl Obstacle {
    #[inline]
    pub fn gap_center(&self) -> f32 {
        (self.gap_top + self.gap_bottom) / 2.0
    }

    /// Trailing (right) edge
    #[inline]
    pub fn right(&self, width: f32) -> f32 {
        self.x + width
    }
}

/// Ordered obstacles, front (smallest x) to back, plus the generator that places gaps
#[derive(Debug, Clone)]
pub struct ObstacleField {
    obstacles: VecDeque<Obstacle>,
    rng: Pcg32,
    next_id: u32,
    width: f32,
    gap_size: f32,
    gap_center_range: (f32, f32),
    spawn_x: f32,
}

impl ObstacleField {
    /// Create a field seeded with one obstacle at the spawn origin
    pub fn new(config: &GameConfig, rng: Pcg32) -> Self {
        let mut field = Self {
            obstacles: VecDeque::with_capacity(4),
            rng,
            next_id: 1,
            width: config.obstacle_width,
            gap_size: config.gap_size,
            gap_center_range: config.gap_center_range(),
            spawn_x: config.spawn_x,
        };
        field.spawn();
        field
    }

    /// Append an obstacle at the spawn origin with a uniformly random gap
    fn spawn(&mut self) -> u32 {
        let (low, high) = self.gap_center_range;
        let center = if high > low {
            self.rng.random_range(low..=high)
        } else {
            low
        };
        let half_gap = self.gap_size / 2.0;

        let id = self.next_id;
        self.next_id += 1;
        self.obstacles.push_back(Obstacle {
            id,
            x: self.spawn_x,
            gap_top: center - half_gap,
            gap_bottom: center + half_gap,
            passed: false,
        });
        log::debug!("Spawned obstacle {} with gap center {:.1}", id, center);
        id
    }

    /// Shift every obstacle left
    pub fn scroll(&mut self, scroll_speed: f32) {
        for obstacle in &mut self.obstacles {
            obstacle.x -= scroll_speed;
        }
    }

    /// Append a new obstacle once the rearmost one is `spawn_spacing` left of the spawn origin
    pub fn maybe_spawn(&mut self, spawn_spacing: f32) -> Option<u32> {
        let back_x = self.back().x;
        (back_x <= self.spawn_x - spawn_spacing).then(|| self.spawn())
    }

    /// Drop the frontmost obstacle once it is fully off-screen
    pub fn recycle(&mut self) -> Option<u32> {
        let front = self.front();
        if front.x + self.width >= 0.0 {
            return None;
        }
        let id = front.id;
        self.obstacles.pop_front();
        log::debug!("Recycled obstacle {}", id);
        Some(id)
    }

    /// One tick of field motion: scroll, spawn, then recycle.
    ///
    /// Spawning before recycling keeps the field non-empty; config validation
    /// guarantees the spawn threshold is reached before the rearmost obstacle
    /// can leave the screen.
    pub fn advance(&mut self, config: &GameConfig) -> FieldUpdate {
        self.scroll(config.scroll_speed);
        let spawned = self.maybe_spawn(config.spawn_spacing);
        let recycled = self.recycle();
        self.assert_invariants();
        FieldUpdate { spawned, recycled }
    }

    /// Nearest obstacle
    pub fn front(&self) -> &Obstacle {
        self.assert_non_empty();
        &self.obstacles[0]
    }

    /// Rearmost obstacle
    pub fn back(&self) -> &Obstacle {
        self.assert_non_empty();
        &self.obstacles[self.obstacles.len() - 1]
    }

    /// First obstacle whose trailing edge is still right of `player_x`
    pub fn current(&self, player_x: f32) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.right(self.width) > player_x)
    }

    pub fn first_unpassed_mut(&mut self) -> Option<&mut Obstacle> {
        self.obstacles.iter_mut().find(|o| !o.passed)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Copy of the obstacles in order, for snapshots
    pub fn to_vec(&self) -> Vec<Obstacle> {
        self.obstacles.iter().cloned().collect()
    }

    fn assert_non_empty(&self) {
        assert!(
            !self.obstacles.is_empty(),
            "obstacle field is empty; the simulation was built from an unchecked config"
        );
    }

    fn assert_invariants(&self) {
        self.assert_non_empty();
        assert!(
            self.obstacles
                .iter()
                .zip(self.obstacles.iter().skip(1))
                .all(|(a, b)| a.x < b.x),
            "obstacle field lost its strict x ordering"
        );
    }

    #[cfg(test)]
    pub(crate) fn clear_for_test(&mut self) {
        self.obstacles.clear();
    }

    #[cfg(test)]
    pub(crate) fn push_for_test(&mut self, x: f32, gap_top: f32) {
        let id = self.next_id;
        self.next_id += 1;
        self.obstacles.push_back(Obstacle {
            id,
            x,
            gap_top,
            gap_bottom: gap_top + self.gap_size,
            passed: false,
        });
    }
}

/// What changed in the field during one `advance`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldUpdate {
    pub spawned: Option<u32>,
    pub recycled: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn field(config: &GameConfig, seed: u64) -> ObstacleField {
        ObstacleField::new(config, Pcg32::seed_from_u64(seed))
    }

    #[test]
    fn test_new_field_has_one_obstacle_at_spawn() {
        let config = GameConfig::default();
        let field = field(&config, 42);
        assert_eq!(field.len(), 1);
        assert_eq!(field.front().x, config.spawn_x);
        assert_eq!(field.front().id, 1);
    }

    #[test]
    fn test_gap_respects_margins_and_size() {
        let config = GameConfig::default();
        let mut field = field(&config, 7);
        for _ in 0..200 {
            field.spawn();
        }
        for obstacle in field.iter() {
            assert!(obstacle.gap_top >= config.min_margin);
            assert!(obstacle.gap_bottom <= config.screen_height - config.min_margin);
            assert!((obstacle.gap_bottom - obstacle.gap_top - config.gap_size).abs() < 1e-3);
        }
    }

    #[test]
    fn test_same_seed_same_gaps() {
        let config = GameConfig::default();
        let mut a = field(&config, 99);
        let mut b = field(&config, 99);
        for _ in 0..20 {
            a.spawn();
            b.spawn();
        }
        assert_eq!(a.to_vec(), b.to_vec());

        let c = field(&config, 100);
        assert_ne!(a.front().gap_top, c.front().gap_top);
    }

    #[test]
    fn test_spawn_threshold() {
        let config = GameConfig::default();
        let mut field = field(&config, 1);
        let threshold = config.spawn_x - config.spawn_spacing;

        let mut ticks = 0;
        loop {
            let update = field.advance(&config);
            ticks += 1;
            if update.spawned.is_some() {
                break;
            }
            assert!(field.back().x > threshold);
        }
        assert_eq!(field.len(), 2);
        assert!(field.front().x <= threshold);
        assert!(field.front().x > threshold - config.scroll_speed);
        assert_eq!(field.back().x, config.spawn_x);
        assert!(ticks > 1);
    }

    #[test]
    fn test_recycle_only_when_fully_off_screen() {
        let config = GameConfig::default();
        let mut field = field(&config, 1);
        field.clear_for_test();
        field.push_for_test(-config.obstacle_width, 200.0);
        field.push_for_test(100.0, 200.0);

        // Trailing edge exactly at 0 is still on screen
        assert_eq!(field.recycle(), None);
        field.scroll(0.5);
        let front_id = field.front().id;
        assert_eq!(field.recycle(), Some(front_id));
        assert_eq!(field.len(), 1);
    }

    #[test]
    fn test_long_run_stays_bounded_and_ordered() {
        let config = GameConfig::default();
        let mut field = field(&config, 3);
        let mut max_len = 0;
        for _ in 0..10_000 {
            field.advance(&config);
            max_len = max_len.max(field.len());
            assert!(!field.is_empty());
        }
        // Visible window plus spawn lead: a handful of obstacles at most
        assert!(max_len <= 4, "field grew to {}", max_len);
    }

    #[test]
    fn test_current_obstacle() {
        let config = GameConfig::default();
        let mut field = field(&config, 1);
        field.clear_for_test();
        field.push_for_test(0.0, 200.0);
        field.push_for_test(200.0, 200.0);
        let second = field.back().id;

        // First obstacle's trailing edge is at 52, left of the player at 57
        assert_eq!(field.current(config.player_x).map(|o| o.id), Some(second));
    }

    #[test]
    #[should_panic(expected = "obstacle field is empty")]
    fn test_empty_field_fails_fast() {
        let config = GameConfig::default();
        let mut field = field(&config, 1);
        field.clear_for_test();
        field.front();
    }
}
