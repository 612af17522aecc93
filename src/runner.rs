//! Headless episode runner behind the `run` command

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ConfigError, GameConfig};
use crate::highscores::{HighScoreError, HighScoreFile};
use crate::policy::PolicyKind;
use crate::sim::GameSimulation;

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    HighScore(#[from] HighScoreError),
}

/// How many episodes to play and with what
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub episodes: u32,
    /// Seed for the first episode; later episodes use the following streams
    pub seed: u64,
    pub policy: PolicyKind,
    /// Episodes still alive after this many ticks are cut off
    pub max_ticks: u64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            episodes: 1,
            seed: 42,
            policy: PolicyKind::Autopilot,
            max_ticks: 10_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub episode: u32,
    pub seed: u64,
    pub stream: u64,
    pub ticks: u64,
    pub score: u32,
    pub crashed: bool,
    pub new_high_score: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub episodes: Vec<EpisodeSummary>,
    /// Stored high score after the run
    pub high_score: u32,
}

impl RunReport {
    /// One JSON object per episode, then `{"high_score":N}`
    pub fn json_lines(&self) -> Result<Vec<String>, serde_json::Error> {
        let mut lines = self
            .episodes
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?;
        lines.push(serde_json::to_string(&serde_json::json!({
            "high_score": self.high_score
        }))?);
        Ok(lines)
    }

    pub fn text_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .episodes
            .iter()
            .map(|summary| {
                format!(
                    "episode {:>3}  ticks {:>6}  score {:>4}{}{}",
                    summary.episode,
                    summary.ticks,
                    summary.score,
                    if summary.crashed { "" } else { "  (tick limit)" },
                    if summary.new_high_score { "  NEW HIGH SCORE" } else { "" },
                )
            })
            .collect();
        lines.push(format!("High score: {}", self.high_score));
        lines
    }
}

/// Play `options.episodes` episodes and record each score in `high_scores`.
///
/// A high score file that cannot be written is logged and skipped; one that
/// cannot be read fails the run.
pub fn run_episodes(
    config: GameConfig,
    options: &RunOptions,
    high_scores: &HighScoreFile,
) -> Result<RunReport, RunError> {
    log::debug!("Flight model: {}", config.flight_model.as_str());
    let mut sim = GameSimulation::new(config, options.seed)?;
    let mut policy = options.policy.build(options.seed);
    let best = high_scores.load()?;
    log::info!(
        "Running {} episode(s) with policy {} (high score {})",
        options.episodes,
        policy.name(),
        best
    );

    let mut episodes = Vec::with_capacity(options.episodes as usize);
    for episode in 0..options.episodes {
        let mut snapshot = if episode == 0 {
            sim.reset(Some(options.seed))
        } else {
            sim.reset(None)
        };
        let rng_state = sim.rng_state();

        while snapshot.alive && snapshot.tick < options.max_ticks {
            let action = policy.act(&snapshot, sim.config());
            snapshot = sim.step(action).snapshot;
        }

        let new_high_score = match high_scores.record(sim.score()) {
            Ok(new) => new,
            Err(e) => {
                log::warn!("Could not update high score: {}", e);
                false
            }
        };

        episodes.push(EpisodeSummary {
            episode,
            seed: rng_state.seed,
            stream: rng_state.stream,
            ticks: sim.tick_count(),
            score: sim.score(),
            crashed: !sim.is_alive(),
            new_high_score,
        });
    }

    Ok(RunReport {
        episodes,
        high_score: high_scores.load()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_scores(name: &str) -> HighScoreFile {
        let path = std::env::temp_dir().join(format!(
            "flappy_sim_runner_{}_{}.txt",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        HighScoreFile::new(path)
    }

    #[test]
    fn test_idle_episodes_use_successive_streams() {
        let scores = temp_scores("idle");
        let options = RunOptions {
            episodes: 3,
            seed: 9,
            policy: PolicyKind::Idle,
            max_ticks: 1000,
        };
        let report = run_episodes(GameConfig::default(), &options, &scores).unwrap();

        assert_eq!(report.episodes.len(), 3);
        for (i, summary) in report.episodes.iter().enumerate() {
            assert_eq!(summary.episode, i as u32);
            assert_eq!(summary.seed, 9);
            assert_eq!(summary.stream, i as u64);
            assert!(summary.crashed);
            assert_eq!(summary.score, 0);
            assert!(!summary.new_high_score);
        }
        assert_eq!(report.high_score, 0);
        assert!(!scores.path().exists());
    }

    #[test]
    fn test_autopilot_sets_high_score() {
        let scores = temp_scores("autopilot");
        let options = RunOptions {
            episodes: 1,
            seed: 42,
            policy: PolicyKind::Autopilot,
            max_ticks: 100,
        };
        let report = run_episodes(GameConfig::default(), &options, &scores).unwrap();
        let summary = &report.episodes[0];
        assert!(summary.score >= 1);
        assert!(summary.new_high_score);
        assert_eq!(report.high_score, summary.score);
        assert_eq!(scores.load().unwrap(), summary.score);
        std::fs::remove_file(scores.path()).unwrap();
    }

    #[test]
    fn test_tick_limit_cuts_episode() {
        let scores = temp_scores("limit");
        let config = GameConfig {
            gravity: 0.0,
            terminal_velocity: 0.0,
            gap_size: 400.0,
            min_margin: 56.0,
            ..Default::default()
        };
        let options = RunOptions {
            episodes: 1,
            policy: PolicyKind::Idle,
            max_ticks: 50,
            ..Default::default()
        };
        let report = run_episodes(config, &options, &scores).unwrap();
        assert_eq!(report.episodes[0].ticks, 50);
        assert!(!report.episodes[0].crashed);
    }

    #[test]
    fn test_every_json_line_parses() {
        let scores = temp_scores("json");
        let options = RunOptions {
            episodes: 2,
            max_ticks: 300,
            ..Default::default()
        };
        let report = run_episodes(GameConfig::default(), &options, &scores).unwrap();
        let lines = report.json_lines().unwrap();
        assert_eq!(lines.len(), 3);

        for line in &lines[..2] {
            let summary: EpisodeSummary = serde_json::from_str(line).unwrap();
            assert!(summary.ticks > 0);
        }
        let last: serde_json::Value = serde_json::from_str(&lines[2]).unwrap();
        assert_eq!(last["high_score"], serde_json::json!(report.high_score));
        let _ = std::fs::remove_file(scores.path());
    }

    #[test]
    fn test_text_lines_end_with_high_score() {
        let report = RunReport {
            episodes: vec![EpisodeSummary {
                episode: 0,
                seed: 1,
                stream: 0,
                ticks: 80,
                score: 2,
                crashed: true,
                new_high_score: true,
            }],
            high_score: 2,
        };
        let lines = report.text_lines();
        assert!(lines[0].contains("NEW HIGH SCORE"));
        assert_eq!(lines[1], "High score: 2");
    }

    #[test]
    fn test_malformed_high_score_fails_run() {
        let scores = temp_scores("malformed");
        std::fs::write(scores.path(), "lots").unwrap();
        let result = run_episodes(GameConfig::default(), &RunOptions::default(), &scores);
        assert!(matches!(
            result,
            Err(RunError::HighScore(HighScoreError::Malformed { .. }))
        ));
        std::fs::remove_file(scores.path()).unwrap();
    }
}
