//! Game-end scoring: single, gammon and backgammon.

use serde::{Deserialize, Serialize};

use crate::player::Player;
use crate::position::Position;

/// How decisively a game was won.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WinKind {
    Single,
    Gammon,
    Backgammon,
}

impl WinKind {
    /// Points multiplier applied to the cube value.
    #[inline]
    pub fn multiplier(self) -> u32 {
        match self {
            WinKind::Single => 1,
            WinKind::Gammon => 2,
            WinKind::Backgammon => 3,
        }
    }
}

/// Why a game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    BearOff,
    Resignation,
    DoubleDeclined,
}

/// Final result of one game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub winner: Player,
    pub kind: WinKind,
    pub cube_value: u32,
    /// `cube_value * kind.multiplier()`.
    pub points: u32,
    pub reason: EndReason,
}

impl GameOutcome {
    pub fn new(winner: Player, kind: WinKind, cube_value: u32, reason: EndReason) -> Self {
        Self {
            winner,
            kind,
            cube_value,
            points: cube_value * kind.multiplier(),
            reason,
        }
    }
}

/// Returns `true` if `loser` would lose a gammon: no checker borne off.
pub fn is_gammon(pos: &Position, loser: Player) -> bool {
    pos.off(loser) == 0
}

/// Returns `true` if `loser` would lose a backgammon.
///
/// That is a gammon with a checker still on the bar or inside the winner's
/// home board.
pub fn is_backgammon(pos: &Position, loser: Player) -> bool {
    let winner = loser.opposite();
    is_gammon(pos, loser)
        && (pos.bar(loser) > 0 || winner.home().any(|idx| pos.count(idx, loser) > 0))
}

/// Classifies the win of `winner` from the loser's checkers.
pub fn win_kind(pos: &Position, winner: Player) -> WinKind {
    let loser = winner.opposite();
    if is_backgammon(pos, loser) {
        WinKind::Backgammon
    } else if is_gammon(pos, loser) {
        WinKind::Gammon
    } else {
        WinKind::Single
    }
}

/// Checks that `player` may resign at `value` in `pos`.
///
/// A resignation can never claim more than the board supports: a gammon
/// needs zero checkers off, a backgammon needs the full backgammon
/// condition.
pub fn validate_resignation(
    pos: &Position,
    player: Player,
    value: WinKind,
) -> Result<(), &'static str> {
    match value {
        WinKind::Single => Ok(()),
        WinKind::Gammon if is_gammon(pos, player) => Ok(()),
        WinKind::Gammon => Err("checkers have already been borne off"),
        WinKind::Backgammon if is_backgammon(pos, player) => Ok(()),
        WinKind::Backgammon => {
            Err("no checker on the bar or in the opponent's home board without any borne off")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplier() {
        assert_eq!(GameOutcome::new(Player::White, WinKind::Gammon, 2, EndReason::BearOff).points, 4);
        assert_eq!(
            GameOutcome::new(Player::Black, WinKind::Backgammon, 4, EndReason::BearOff).points,
            12
        );
    }

    #[test]
    fn test_win_kind() {
        // Black has one checker off.
        let single = Position::from_pips(&[], &[(6, 14), (0, 1)]).unwrap();
        assert_eq!(win_kind(&single, Player::White), WinKind::Single);

        // Black has nothing off but everything out of white's home board.
        let gammon = Position::from_pips(&[], &[(6, 15)]).unwrap();
        assert_eq!(win_kind(&gammon, Player::White), WinKind::Gammon);

        // Black's 20-point is inside white's home board.
        let backgammon = Position::from_pips(&[], &[(20, 1), (6, 14)]).unwrap();
        assert_eq!(win_kind(&backgammon, Player::White), WinKind::Backgammon);

        let on_bar = Position::from_pips(&[], &[(25, 1), (6, 14)]).unwrap();
        assert_eq!(win_kind(&on_bar, Player::White), WinKind::Backgammon);
    }

    #[test]
    fn test_validate_resignation() {
        let pos = Position::from_pips(&[(3, 2)], &[(6, 15)]).unwrap();
        assert!(validate_resignation(&pos, Player::Black, WinKind::Single).is_ok());
        assert!(validate_resignation(&pos, Player::Black, WinKind::Gammon).is_ok());
        assert!(validate_resignation(&pos, Player::Black, WinKind::Backgammon).is_err());
        // White has 13 checkers off.
        assert!(validate_resignation(&pos, Player::White, WinKind::Gammon).is_err());
    }
}
