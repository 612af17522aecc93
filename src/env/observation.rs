//! Observation encoders: turn a snapshot into a fixed-size feature vector

use serde::{Deserialize, Serialize};

use super::features::{gap_features, next_gap_index};
use crate::config::GameConfig;
use crate::sim::Snapshot;

/// Builds one observation vector per tick
pub trait ObservationEncoder: Send {
    fn name(&self) -> &str;

    /// Length of every vector `encode` returns
    fn size(&self) -> usize;

    fn encode(&self, snapshot: &Snapshot, config: &GameConfig, normalize: bool) -> Vec<f32>;
}

/// `[h_dist, v_dist]` to the next gap
pub struct DistanceObservation;

impl ObservationEncoder for DistanceObservation {
    fn name(&self) -> &str {
        "distance"
    }

    fn size(&self) -> usize {
        2
    }

    fn encode(&self, snapshot: &Snapshot, config: &GameConfig, normalize: bool) -> Vec<f32> {
        let mut features = gap_features(snapshot, config, next_gap_index(snapshot, config));
        if normalize {
            features = features.normalized(config);
        }
        vec![features.h_dist, features.v_dist]
    }
}

/// `[h_dist, v_dist, vel_y]`
pub struct VelocityObservation;

impl ObservationEncoder for VelocityObservation {
    fn name(&self) -> &str {
        "velocity"
    }

    fn size(&self) -> usize {
        3
    }

    fn encode(&self, snapshot: &Snapshot, config: &GameConfig, normalize: bool) -> Vec<f32> {
        let mut data = DistanceObservation.encode(snapshot, config, normalize);
        let vel = snapshot.player.vel_y;
        let vel = if normalize && config.terminal_velocity > 0.0 {
            vel / config.terminal_velocity
        } else {
            vel
        };
        data.push(vel);
        data
    }
}

/// Next gap and the one after it. Until the following obstacle has spawned,
/// the next gap is repeated.
pub struct TwoGapObservation;

impl ObservationEncoder for TwoGapObservation {
    fn name(&self) -> &str {
        "two_gaps"
    }

    fn size(&self) -> usize {
        4
    }

    fn encode(&self, snapshot: &Snapshot, config: &GameConfig, normalize: bool) -> Vec<f32> {
        let first = next_gap_index(snapshot, config);
        let second = (first + 1).min(snapshot.obstacles.len().saturating_sub(1));

        let mut data = Vec::with_capacity(4);
        for index in [first, second] {
            let mut features = gap_features(snapshot, config, index);
            if normalize {
                features = features.normalized(config);
            }
            data.push(features.h_dist);
            data.push(features.v_dist);
        }
        data
    }
}

/// `[player_x, player_y, obstacle_x, gap_center]` in screen units, for the
/// first obstacle not yet behind the body
pub struct RawObservation;

impl ObservationEncoder for RawObservation {
    fn name(&self) -> &str {
        "raw"
    }

    fn size(&self) -> usize {
        4
    }

    fn encode(&self, snapshot: &Snapshot, config: &GameConfig, _normalize: bool) -> Vec<f32> {
        let player = &snapshot.player;
        let obstacle = snapshot
            .obstacles
            .iter()
            .find(|o| o.right(config.obstacle_width) > player.x)
            .or(snapshot.obstacles.last());
        let (x, center) = obstacle.map_or((config.spawn_x, config.screen_height / 2.0), |o| {
            (o.x, o.gap_center())
        });
        vec![player.x, player.y, x, center]
    }
}

/// Selects an observation encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationKind {
    #[default]
    Distance,
    Velocity,
    TwoGaps,
    Raw,
}

impl ObservationKind {
    pub fn encoder(self) -> Box<dyn ObservationEncoder> {
        match self {
            ObservationKind::Distance => Box::new(DistanceObservation),
            ObservationKind::Velocity => Box::new(VelocityObservation),
            ObservationKind::TwoGaps => Box::new(TwoGapObservation),
            ObservationKind::Raw => Box::new(RawObservation),
        }
    }
}
