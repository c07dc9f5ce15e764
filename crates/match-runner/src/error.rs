//! Error types for the match runner.

use std::io;

use backgammon_core::error::{ConfigError, GameError, SessionError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatchRunnerError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
    #[error("Game error: {0}")]
    Game(#[from] GameError),
    /// A game exceeded the step limit without finishing.
    #[error("game did not finish within {0} steps")]
    Stalled(usize),
}

pub type Result<T> = std::result::Result<T, MatchRunnerError>;
