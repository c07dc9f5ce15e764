//! Command-line configuration for the match runner.

use std::path::PathBuf;

use backgammon_core::config::MatchConfig;
use backgammon_core::level::{AiSettings, Difficulty, Personality};
use clap::Parser;

use crate::error::Result;

/// Runs matches between two AI presets and reports the results.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Tool for running matches between two backgammon AI presets"
)]
pub struct Config {
    /// Number of matches to play
    #[arg(short = 'n', long, default_value_t = 100)]
    pub matches: u32,

    /// Points needed to win each match
    #[arg(short, long)]
    pub target: Option<u32>,

    #[arg(long, default_value = "expert")]
    pub player1_difficulty: Difficulty,

    #[arg(long, default_value = "balanced")]
    pub player1_personality: Personality,

    #[arg(long, default_value = "medium")]
    pub player2_difficulty: Difficulty,

    #[arg(long, default_value = "balanced")]
    pub player2_personality: Personality,

    /// Seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Play without the doubling cube
    #[arg(long)]
    pub no_cube: bool,

    /// Match configuration as JSON
    #[arg(long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,
}

impl Config {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Builds the match configuration from the JSON file, if any, and the
    /// overriding flags.
    pub fn match_config(&self) -> Result<MatchConfig> {
        let mut config = match &self.config {
            Some(path) => MatchConfig::from_file(path)?,
            None => MatchConfig::default(),
        };
        if let Some(target) = self.target {
            config.target_points = target;
        }
        if self.no_cube {
            config.game.cube_enabled = false;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn player1(&self) -> AiSettings {
        AiSettings::new(self.player1_difficulty, self.player1_personality)
    }

    pub fn player2(&self) -> AiSettings {
        AiSettings::new(self.player2_difficulty, self.player2_personality)
    }

    /// Display name of player 1, e.g. `expert/balanced`.
    pub fn player1_name(&self) -> String {
        format!("{}/{}", self.player1_difficulty, self.player1_personality)
    }

    pub fn player2_name(&self) -> String {
        format!("{}/{}", self.player2_difficulty, self.player2_personality)
    }
}
