//! A match in progress: configuration, score and the current game.
//!
//! The session is the unit hosts own, save and restore. Saved sessions are
//! JSON and are validated on load.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::MatchConfig;
use crate::error::SessionError;
use crate::game_state::GameState;
use crate::match_state::MatchState;
use crate::player::Player;
use crate::position::Position;
use crate::presets;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    config: MatchConfig,
    match_state: MatchState,
    game: GameState,
}

impl Session {
    /// Starts a new match with the first game waiting for the opening roll.
    pub fn new(config: MatchConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let match_state = MatchState::new(config.target_points).with_crawford_rule(config.crawford);
        let game = match_state.new_game(config.game)?;
        Ok(Self {
            config,
            match_state,
            game,
        })
    }

    /// Assembles a session from existing parts after validating them.
    pub fn from_parts(
        config: MatchConfig,
        match_state: MatchState,
        game: GameState,
    ) -> Result<Self, SessionError> {
        let session = Self {
            config,
            match_state,
            game,
        };
        session.validate()?;
        Ok(session)
    }

    /// Builds the named debug preset with the default configuration.
    pub fn preset(name: &str) -> Result<Self, SessionError> {
        Self::preset_with_config(name, MatchConfig::default())
    }

    /// Builds the named debug preset.
    ///
    /// A preset at the starting position begins with the opening roll;
    /// any other preset begins with its player about to roll.
    pub fn preset_with_config(name: &str, config: MatchConfig) -> Result<Self, SessionError> {
        let preset =
            presets::find(name).ok_or_else(|| SessionError::UnknownPreset(name.to_string()))?;
        let position = preset.position()?;
        let (white, black) = preset.scores;
        let match_state = MatchState::new(config.target_points)
            .with_crawford_rule(config.crawford)
            .with_scores(white, black);

        let game = if position == Position::new() {
            match_state.new_game(config.game)?
        } else {
            GameState::from_position(position, preset.turn, config.game)?
                .with_crawford(match_state.is_crawford())
        };
        debug!(preset = preset.name, "loaded preset");
        Self::from_parts(config, match_state, game)
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn match_state(&self) -> &MatchState {
        &self.match_state
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut GameState {
        &mut self.game
    }

    /// Records the finished game into the match score and, unless the
    /// match is over, starts the next game.
    ///
    /// Returns the match winner once decided.
    ///
    /// # Errors
    ///
    /// Returns an error if the current game is not finished.
    pub fn finish_game(&mut self) -> Result<Option<Player>, SessionError> {
        let outcome = *self.game.outcome().ok_or_else(|| {
            SessionError::Inconsistent("the current game is not finished".to_string())
        })?;
        let winner = self.match_state.record(&outcome)?;
        if winner.is_none() {
            self.game = self.match_state.new_game(self.config.game)?;
            info!(
                game = self.match_state.games_played() + 1,
                crawford = self.game.is_crawford(),
                "next game"
            );
        }
        Ok(winner)
    }

    /// Serializes the session to JSON.
    pub fn to_json(&self) -> Result<String, SessionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses and validates a session from JSON.
    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        let session: Session = serde_json::from_str(json)?;
        session.validate()?;
        Ok(session)
    }

    pub fn save(&self, path: &Path) -> Result<(), SessionError> {
        fs::write(path, self.to_json()?)?;
        debug!(path = %path.display(), "session saved");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, SessionError> {
        let session = Self::from_json(&fs::read_to_string(path)?)?;
        debug!(path = %path.display(), "session loaded");
        Ok(session)
    }

    /// Checks the configuration, the match score and the current game.
    pub fn validate(&self) -> Result<(), SessionError> {
        self.config.validate()?;
        self.game.validate()?;

        let max_cube = self.game.cube().max_value();
        if max_cube != self.config.game.max_cube_value {
            return Err(SessionError::Inconsistent(format!(
                "cube maximum {max_cube} differs from configured {}",
                self.config.game.max_cube_value
            )));
        }

        let state = &self.match_state;
        if state.target() != self.config.target_points {
            return Err(SessionError::Inconsistent(format!(
                "match target {} differs from configured {}",
                state.target(),
                self.config.target_points
            )));
        }
        let leader = Player::ALL
            .into_iter()
            .find(|&p| state.score(p) >= state.target());
        if leader != state.winner() {
            return Err(SessionError::Inconsistent(
                "match winner does not match the score".to_string(),
            ));
        }
        if !self.game.is_finished() && state.is_over() {
            return Err(SessionError::Inconsistent(
                "game in progress after the match ended".to_string(),
            ));
        }
        if !self.game.is_finished() && self.game.is_crawford() != state.is_crawford() {
            return Err(SessionError::Inconsistent(
                "Crawford flag differs between match and game".to_string(),
            ));
        }
        Ok(())
    }
}
