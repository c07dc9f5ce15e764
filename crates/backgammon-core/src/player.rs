//! The two sides of a backgammon game.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::constants::NUM_POINTS;

/// One of the two players.
///
/// `White` moves from point index 23 toward index 0 and bears off below 0.
/// `Black` moves the opposite way and bears off above index 23.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    White,
    Black,
}

impl Player {
    /// Both players, white first.
    pub const ALL: [Player; 2] = [Player::White, Player::Black];

    /// Returns the opposite player.
    #[inline]
    pub fn opposite(self) -> Player {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }

    /// Array index used for per-player storage.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Player::White => 0,
            Player::Black => 1,
        }
    }

    /// Step applied to a point index when this player moves one pip.
    #[inline]
    pub fn direction(self) -> i32 {
        match self {
            Player::White => -1,
            Player::Black => 1,
        }
    }

    /// Absolute point indices of this player's home board.
    pub fn home(self) -> RangeInclusive<usize> {
        match self {
            Player::White => 0..=5,
            Player::Black => 18..=23,
        }
    }

    /// Returns `true` if `idx` lies in this player's home board.
    #[inline]
    pub fn is_home(self, idx: usize) -> bool {
        self.home().contains(&idx)
    }

    /// Distance in pips from point `idx` to this player's off tray.
    ///
    /// This is also the player-relative point number (1..=24).
    #[inline]
    pub fn pip_of(self, idx: usize) -> u8 {
        debug_assert!(idx < NUM_POINTS);
        match self {
            Player::White => idx as u8 + 1,
            Player::Black => (NUM_POINTS - idx) as u8,
        }
    }

    /// Absolute point index of the player-relative point number `pip` (1..=24).
    #[inline]
    pub fn index_of_pip(self, pip: u8) -> usize {
        debug_assert!((1..=24).contains(&pip));
        match self {
            Player::White => pip as usize - 1,
            Player::Black => NUM_POINTS - pip as usize,
        }
    }

    /// Character used when rendering this player's checkers.
    pub fn to_char(self) -> char {
        match self {
            Player::White => 'O',
            Player::Black => 'X',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::White => write!(f, "White"),
            Player::Black => write!(f, "Black"),
        }
    }
}
