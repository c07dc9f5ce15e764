//! Named debug positions for testing the engine by hand.
//!
//! Layouts use player-relative point numbers as in
//! [`Position::from_pips`]: 25 is the bar and unlisted checkers are off.

use crate::error::PositionError;
use crate::player::Player;
use crate::position::Position;

/// A named starting state.
#[derive(Clone, Copy, Debug)]
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    pub white: &'static [(u8, u8)],
    pub black: &'static [(u8, u8)],
    /// Player to roll.
    pub turn: Player,
    /// Match score as `(white, black)`.
    pub scores: (u32, u32),
}

impl Preset {
    /// Builds the preset's board.
    pub fn position(&self) -> Result<Position, PositionError> {
        Position::from_pips(self.white, self.black)
    }
}

const START: &[(u8, u8)] = &[(24, 2), (13, 5), (8, 3), (6, 5)];

pub const PRESETS: [Preset; 5] = [
    Preset {
        name: "opening",
        description: "Standard starting position, waiting for the opening roll",
        white: START,
        black: START,
        turn: Player::White,
        scores: (0, 0),
    },
    Preset {
        name: "bar_entry",
        description: "White on the bar against a four-point board; only 1s and 5s enter",
        white: &[(25, 1), (24, 2), (13, 5), (8, 3), (6, 4)],
        black: &[(13, 3), (8, 2), (6, 4), (4, 2), (3, 2), (2, 2)],
        turn: Player::White,
        scores: (0, 0),
    },
    Preset {
        name: "bear_off",
        description: "White bearing off in a pure race",
        white: &[(6, 3), (5, 3), (4, 3), (3, 2), (2, 2), (1, 2)],
        black: &[(12, 4), (10, 4), (8, 4), (6, 3)],
        turn: Player::White,
        scores: (0, 0),
    },
    Preset {
        name: "gammon_race",
        description: "White close to winning while black has nothing off",
        white: &[(3, 2), (2, 3), (1, 2)],
        black: &[(10, 5), (8, 5), (7, 5)],
        turn: Player::White,
        scores: (0, 0),
    },
    Preset {
        name: "crawford",
        description: "Fresh game at 4-2 in a match to 5; doubling is disabled",
        white: START,
        black: START,
        turn: Player::White,
        scores: (4, 2),
    },
];

/// Looks up a preset by name.
pub fn find(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.name == name)
}

/// Names of all presets.
pub fn names() -> impl Iterator<Item = &'static str> {
    PRESETS.iter().map(|p| p.name)
}
