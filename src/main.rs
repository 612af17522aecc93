//! Flappy Sim entry point
//!
//! Runs headless episodes against the simulation core. Nothing here renders;
//! the core is ticked and queried directly.

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use flappy_sim::runner::{RunOptions, run_episodes};
use flappy_sim::{ConfigError, GameConfig, HighScoreFile, PolicyKind};

#[derive(Parser)]
#[command(name = "flappy-sim", about = "Headless gate-dodging simulation runner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run episodes with a built-in policy
    Run {
        /// Number of episodes
        #[arg(long, default_value_t = 1)]
        episodes: u32,

        /// Seed for the first episode; later episodes use the following streams
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Policy that picks each action
        #[arg(long, value_enum, default_value_t = PolicyKind::Autopilot)]
        policy: PolicyKind,

        /// Stop an episode after this many ticks
        #[arg(long, default_value_t = 10_000)]
        max_ticks: u64,

        /// JSON config file (any subset of fields) layered over the selected preset
        #[arg(long)]
        config: Option<PathBuf>,

        /// Use the 500x500 stand-alone game constants
        #[arg(long)]
        classic: bool,

        /// High score file to read and update
        #[arg(long, default_value = HighScoreFile::DEFAULT_PATH)]
        high_score_file: PathBuf,

        /// Print one JSON line per episode, then a `high_score` line
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration as JSON
    Config {
        /// JSON config file layered over the selected preset
        #[arg(long)]
        config: Option<PathBuf>,

        /// Start from the 500x500 stand-alone game constants
        #[arg(long)]
        classic: bool,
    },
}

/// Selected preset, with an optional partial JSON file layered over it
fn load_config(path: Option<PathBuf>, classic: bool) -> Result<GameConfig, ConfigError> {
    let base = if classic {
        GameConfig::classic()
    } else {
        GameConfig::default()
    };
    match path {
        Some(path) => GameConfig::load_over(&base, path),
        None => {
            base.validate()?;
            Ok(base)
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            episodes,
            seed,
            policy,
            max_ticks,
            config,
            classic,
            high_score_file,
            json,
        } => {
            let config = load_config(config, classic)?;
            let options = RunOptions {
                episodes,
                seed,
                policy,
                max_ticks,
            };
            let report = run_episodes(config, &options, &HighScoreFile::new(high_score_file))?;
            let lines = if json {
                report.json_lines()?
            } else {
                report.text_lines()
            };
            for line in lines {
                println!("{}", line);
            }
            Ok(())
        }
        Commands::Config { config, classic } => {
            let config = load_config(config, classic)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}
