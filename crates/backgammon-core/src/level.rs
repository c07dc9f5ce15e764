//! AI difficulty levels and personality presets.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::SettingError;

/// How strongly the AI plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Easy,
    Medium,
    Hard,
    Expert,
}

/// Which features the AI values most.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    Balanced,
    Aggressive,
    Defensive,
    Tactical,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Beginner,
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        }
    }
}

impl Personality {
    pub const ALL: [Personality; 4] = [
        Personality::Balanced,
        Personality::Aggressive,
        Personality::Defensive,
        Personality::Tactical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Personality::Balanced => "balanced",
            Personality::Aggressive => "aggressive",
            Personality::Defensive => "defensive",
            Personality::Tactical => "tactical",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = SettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| SettingError::Difficulty(s.to_string()))
    }
}

impl FromStr for Personality {
    type Err = SettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Personality::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| SettingError::Personality(s.to_string()))
    }
}

/// Move selection parameters for one difficulty.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Level {
    /// Probability of choosing the top-ranked play.
    pub optimal_probability: f64,
    /// Number of top plays considered when not choosing the best one,
    /// and reranked by lookahead.
    pub candidate_pool: usize,
    /// Rerank the pool with a one-ply lookahead over the opponent's rolls.
    pub lookahead: bool,
}

/// Retrieves the selection parameters for `difficulty`.
pub fn get_level(difficulty: Difficulty) -> Level {
    LEVELS[difficulty as usize]
}

#[rustfmt::skip]
const LEVELS: [Level; 5] = [
    Level { optimal_probability: 0.55, candidate_pool: 6, lookahead: false },
    Level { optimal_probability: 0.75, candidate_pool: 5, lookahead: false },
    Level { optimal_probability: 0.85, candidate_pool: 4, lookahead: false },
    Level { optimal_probability: 0.95, candidate_pool: 3, lookahead: true },
    Level { optimal_probability: 1.00, candidate_pool: 4, lookahead: true },
];

/// Evaluation weights for one personality.
///
/// Each weight multiplies the matching field of
/// [`Features`](crate::eval::Features); penalties are negative.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Weights {
    pub pip: f32,
    pub exposure: f32,
    pub made_point: f32,
    pub home_point: f32,
    pub prime: f32,
    pub anchor: f32,
    pub opponent_bar: f32,
    pub own_bar: f32,
    pub borne_off: f32,
    /// Minimum winning chance at which to offer a double.
    pub double_threshold: f32,
    /// Minimum winning chance at which to accept a double.
    pub take_threshold: f32,
}

/// Retrieves the evaluation weights for `personality`.
pub fn get_weights(personality: Personality) -> Weights {
    WEIGHTS[personality as usize]
}

#[rustfmt::skip]
const WEIGHTS: [Weights; 4] = [
    // Balanced
    Weights {
        pip: 0.020, exposure: -1.20, made_point: 0.08, home_point: 0.12, prime: 0.10,
        anchor: 0.15, opponent_bar: 0.25, own_bar: -0.20, borne_off: 0.05,
        double_threshold: 0.70, take_threshold: 0.25,
    },
    // Aggressive
    Weights {
        pip: 0.020, exposure: -0.70, made_point: 0.06, home_point: 0.15, prime: 0.08,
        anchor: 0.08, opponent_bar: 0.45, own_bar: -0.15, borne_off: 0.05,
        double_threshold: 0.65, take_threshold: 0.22,
    },
    // Defensive
    Weights {
        pip: 0.025, exposure: -1.80, made_point: 0.10, home_point: 0.10, prime: 0.08,
        anchor: 0.25, opponent_bar: 0.15, own_bar: -0.25, borne_off: 0.05,
        double_threshold: 0.75, take_threshold: 0.30,
    },
    // Tactical
    Weights {
        pip: 0.018, exposure: -1.10, made_point: 0.10, home_point: 0.18, prime: 0.20,
        anchor: 0.12, opponent_bar: 0.30, own_bar: -0.20, borne_off: 0.05,
        double_threshold: 0.68, take_threshold: 0.25,
    },
];

/// Settings of one AI player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    pub difficulty: Difficulty,
    pub personality: Personality,
    /// Shortest cosmetic thinking delay in milliseconds.
    pub min_thinking_ms: u64,
    /// Longest cosmetic thinking delay in milliseconds.
    pub max_thinking_ms: u64,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            personality: Personality::Balanced,
            min_thinking_ms: 0,
            max_thinking_ms: 0,
        }
    }
}

impl AiSettings {
    pub fn new(difficulty: Difficulty, personality: Personality) -> Self {
        Self {
            difficulty,
            personality,
            ..Self::default()
        }
    }

    /// Sets a fixed thinking delay.
    pub fn with_thinking_ms(mut self, ms: u64) -> Self {
        self.min_thinking_ms = ms;
        self.max_thinking_ms = ms;
        self
    }

    /// Picks a delay for the caller to wait before showing the AI's play.
    ///
    /// The engine itself never sleeps.
    pub fn thinking_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let low = self.min_thinking_ms.min(self.max_thinking_ms);
        let high = self.min_thinking_ms.max(self.max_thinking_ms);
        Duration::from_millis(rng.random_range(low..=high))
    }
}
