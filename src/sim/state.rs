//! Simulation phases, events and the read-only snapshot handed to consumers

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::CrashReason;
use super::obstacles::Obstacle;
use super::player::PlayerBody;

/// Current phase of an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Freshly reset, waiting for the first step
    Idle,
    /// Ticking normally
    Playing,
    /// Terminal; only `reset` leaves this phase
    Crashed,
}

/// Something that happened during a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum GameEvent {
    /// First step after a reset
    Started,
    Flapped,
    ObstacleSpawned { id: u32 },
    ObstacleRecycled { id: u32 },
    Scored { obstacle_id: u32, score: u32 },
    Crashed { reason: CrashReason },
}

/// Read-only projection of the simulation for observation and reward layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub phase: GamePhase,
    pub alive: bool,
    pub score: u32,
    pub player: PlayerBody,
    /// Ordered front (nearest) to back
    pub obstacles: Vec<Obstacle>,
}

/// Seed plus episode stream; each unseeded reset moves to the next stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Same seed, next stream
    pub fn next_stream(&self) -> Self {
        Self {
            seed: self.seed,
            stream: self.stream.wrapping_add(1),
        }
    }

    pub fn to_rng(&self) -> Pcg32 {
        // Golden-ratio mix keeps neighbouring streams decorrelated
        Pcg32::seed_from_u64(self.seed ^ self.stream.wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }
}
