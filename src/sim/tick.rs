//! Fixed timestep simulation tick
//!
//! Each `step` advances exactly one logical frame, in a fixed order:
//! body physics, obstacle scroll/spawn/recycle, collision, then scoring
//! (only when nothing was hit).

use serde::{Deserialize, Serialize};

use super::collision::{CollisionDetector, CrashReason};
use super::obstacles::{Obstacle, ObstacleField};
use super::player::PlayerBody;
use super::score::ScoreTracker;
use super::state::{GameEvent, GamePhase, RngState, Snapshot};
use crate::config::{ConfigError, GameConfig};

/// Input for a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    #[default]
    NoOp,
    Flap,
}

impl Action {
    /// Decode a raw discrete action. `1` flaps; every other value is a no-op.
    pub fn from_raw(raw: i64) -> Self {
        if raw == 1 { Action::Flap } else { Action::NoOp }
    }

    pub fn is_flap(self) -> bool {
        self == Action::Flap
    }
}

impl From<bool> for Action {
    fn from(flap: bool) -> Self {
        if flap { Action::Flap } else { Action::NoOp }
    }
}

impl From<i64> for Action {
    fn from(raw: i64) -> Self {
        Action::from_raw(raw)
    }
}

/// Result of one `step`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    /// False exactly when the episode is over
    pub alive: bool,
    pub score: u32,
    /// Events from this tick, in order. Empty for steps after a crash.
    pub events: Vec<GameEvent>,
    pub snapshot: Snapshot,
}

impl StepOutcome {
    /// Whether an obstacle was passed this tick
    pub fn scored(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, GameEvent::Scored { .. }))
    }

    /// Crash reason, if this tick ended the episode
    pub fn crash(&self) -> Option<CrashReason> {
        self.events.iter().find_map(|e| match e {
            GameEvent::Crashed { reason } => Some(*reason),
            _ => None,
        })
    }
}

/// One episode's worth of simulation state. Not shareable between threads
/// while stepping; use one instance per worker.
#[derive(Debug, Clone)]
pub struct GameSimulation {
    config: GameConfig,
    rng_state: RngState,
    phase: GamePhase,
    tick: u64,
    player: PlayerBody,
    field: ObstacleField,
    tracker: ScoreTracker,
    detector: CollisionDetector,
}

impl GameSimulation {
    /// Validate the config and build a simulation in the `Idle` phase
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng_state = RngState::new(seed);
        Ok(Self {
            phase: GamePhase::Idle,
            tick: 0,
            player: PlayerBody::new(&config),
            field: ObstacleField::new(&config, rng_state.to_rng()),
            tracker: ScoreTracker::new(),
            detector: CollisionDetector::new(&config),
            rng_state,
            config,
        })
    }

    /// Rebuild every entity. `Some(seed)` restarts from that seed; `None`
    /// moves on to the next stream of the current seed.
    pub fn reset(&mut self, seed: Option<u64>) -> Snapshot {
        self.rng_state = match seed {
            Some(seed) => RngState::new(seed),
            None => self.rng_state.next_stream(),
        };
        self.phase = GamePhase::Idle;
        self.tick = 0;
        self.player = PlayerBody::new(&self.config);
        self.field = ObstacleField::new(&self.config, self.rng_state.to_rng());
        self.tracker = ScoreTracker::new();
        log::debug!(
            "Reset with seed {} stream {}",
            self.rng_state.seed,
            self.rng_state.stream
        );
        self.snapshot()
    }

    /// Advance one tick. After a crash this is a no-op returning the frozen snapshot.
    pub fn step(&mut self, action: impl Into<Action>) -> StepOutcome {
        let action = action.into();
        let mut events = Vec::new();

        match self.phase {
            GamePhase::Crashed => return self.outcome(events),
            GamePhase::Idle => {
                self.phase = GamePhase::Playing;
                events.push(GameEvent::Started);
                log::debug!("Episode started");
            }
            GamePhase::Playing => {}
        }

        self.tick += 1;

        let flap = action.is_flap();
        if flap {
            events.push(GameEvent::Flapped);
        }
        self.player.update(flap, &self.config);

        let update = self.field.advance(&self.config);
        if let Some(id) = update.spawned {
            events.push(GameEvent::ObstacleSpawned { id });
        }
        if let Some(id) = update.recycled {
            events.push(GameEvent::ObstacleRecycled { id });
        }

        if let Some(reason) = self.detector.check(&self.player, &self.field) {
            self.phase = GamePhase::Crashed;
            events.push(GameEvent::Crashed { reason });
            log::info!(
                "Crashed ({:?}) at tick {} with score {}",
                reason,
                self.tick,
                self.tracker.score()
            );
            return self.outcome(events);
        }

        if let Some(obstacle_id) = self.tracker.update(&self.player, &mut self.field) {
            events.push(GameEvent::Scored {
                obstacle_id,
                score: self.tracker.score(),
            });
        }

        self.outcome(events)
    }

    fn outcome(&self, events: Vec<GameEvent>) -> StepOutcome {
        StepOutcome {
            alive: self.is_alive(),
            score: self.score(),
            events,
            snapshot: self.snapshot(),
        }
    }

    /// Current read-only state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.tick,
            phase: self.phase,
            alive: self.is_alive(),
            score: self.score(),
            player: self.player.clone(),
            obstacles: self.field.to_vec(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.phase != GamePhase::Crashed
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.tracker.score()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn player(&self) -> &PlayerBody {
        &self.player
    }

    pub fn obstacles(&self) -> &ObstacleField {
        &self.field
    }

    /// Obstacle the body is currently facing or inside
    pub fn current_obstacle(&self) -> Option<&Obstacle> {
        self.field.current(self.player.x)
    }

    pub fn rng_state(&self) -> RngState {
        self.rng_state
    }
}
