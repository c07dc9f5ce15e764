//! Error types for the backgammon engine.
//!
//! Every failure here is a contract violation reported back to the caller;
//! nothing is retried and nothing is fatal.

use thiserror::Error;

use crate::game_state::GamePhase;
use crate::move_list::Move;
use crate::player::Player;
use crate::scoring::WinKind;

/// Invalid board layouts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("{player} has {count} checkers, expected 15")]
    CheckerCount { player: Player, count: u32 },
    #[error("invalid point number {0}: must be 0 (off), 1-24 or 25 (bar)")]
    InvalidPip(u8),
}

/// Invalid dice values or consumption.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    #[error("die value {0} out of range 1-6")]
    OutOfRange(u8),
    #[error("die value {0} is not available to play")]
    NotAvailable(u8),
}

/// Reasons a doubling cube action is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CubeError {
    #[error("doubling is only allowed before rolling")]
    NotRollingPhase,
    #[error("doubling is disabled in the Crawford game")]
    Crawford,
    #[error("the cube is disabled")]
    Disabled,
    #[error("{0} does not own the cube")]
    NotOwner(Player),
    #[error("a double is already pending")]
    AlreadyPending,
    #[error("no double is pending")]
    NoPendingOffer,
    #[error("the cube is already at its maximum value {0}")]
    MaxValue(u32),
}

/// Errors raised by the game state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("illegal move {mv}")]
    IllegalMove { mv: Move },
    #[error("invalid cube action: {0}")]
    InvalidCubeAction(#[from] CubeError),
    #[error("{player} cannot resign a {value:?}: {reason}")]
    InvalidResignation {
        player: Player,
        value: WinKind,
        reason: &'static str,
    },
    #[error("cannot {action} during {phase:?}")]
    InvalidPhase {
        action: &'static str,
        phase: GamePhase,
    },
    #[error("the match is already over")]
    MatchOver,
    #[error(transparent)]
    Dice(#[from] DiceError),
}

/// Invalid configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors loading or saving a session blob.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to access session file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse session: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid position: {0}")]
    Position(#[from] PositionError),
    #[error("invalid dice: {0}")]
    Dice(#[from] DiceError),
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
    #[error("inconsistent session: {0}")]
    Inconsistent(String),
    #[error("unknown preset '{0}'")]
    UnknownPreset(String),
    #[error(transparent)]
    Game(#[from] GameError),
}

/// Unrecognised AI setting names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingError {
    #[error("unknown difficulty '{0}' (expected beginner, easy, medium, hard or expert)")]
    Difficulty(String),
    #[error("unknown personality '{0}' (expected balanced, aggressive, defensive or tactical)")]
    Personality(String),
}
