//! Match and game configuration.
//!
//! Configuration is plain data so hosts can build it from flags or load it
//! from a JSON file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MAX_CUBE_VALUE;
use crate::error::ConfigError;

/// Per-game rule and automation switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameOptions {
    /// Play the only legal play automatically after the roll.
    pub auto_play_forced: bool,
    /// Pass the turn as soon as no further move is possible.
    pub auto_switch_turn: bool,
    /// Allow doubling at all.
    pub cube_enabled: bool,
    /// Highest value the cube may reach.
    pub max_cube_value: u32,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            auto_play_forced: false,
            auto_switch_turn: false,
            cube_enabled: true,
            max_cube_value: DEFAULT_MAX_CUBE_VALUE,
        }
    }
}

/// Settings for a whole match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Points needed to win the match.
    pub target_points: u32,
    /// Apply the Crawford rule.
    pub crawford: bool,
    pub game: GameOptions,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            target_points: 5,
            crawford: true,
            game: GameOptions::default(),
        }
    }
}

impl MatchConfig {
    /// Parses a configuration from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: MatchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_points == 0 {
            return Err(ConfigError::Invalid(
                "target_points must be at least 1".to_string(),
            ));
        }
        let max = self.game.max_cube_value;
        if max < 2 || !max.is_power_of_two() {
            return Err(ConfigError::Invalid(format!(
                "max_cube_value must be a power of two >= 2, got {max}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MatchConfig::default();
        assert_eq!(config.target_points, 5);
        assert!(config.crawford);
        assert!(config.game.cube_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            MatchConfig::from_json(r#"{ "target_points": 7, "game": { "auto_play_forced": true } }"#)
                .unwrap();
        assert_eq!(config.target_points, 7);
        assert!(config.crawford);
        assert!(config.game.auto_play_forced);
        assert_eq!(config.game.max_cube_value, 64);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            MatchConfig::from_json(r#"{ "target_points": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            MatchConfig::from_json(r#"{ "game": { "max_cube_value": 48 } }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            MatchConfig::from_json("not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
