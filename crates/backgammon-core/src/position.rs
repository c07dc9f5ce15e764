//! Board position: 24 points plus a bar and an off tray per player.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{BAR_PIP, CHECKERS_PER_PLAYER, NUM_POINTS};
use crate::error::PositionError;
use crate::move_list::{Move, Slot};
use crate::player::Player;

/// A backgammon position.
///
/// Point counts are signed: positive counts are white checkers, negative
/// counts are black checkers. A point therefore never holds checkers of both
/// players at once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    points: [i8; NUM_POINTS],
    bar: [u8; 2],
    off: [u8; 2],
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl Position {
    /// Creates the standard starting position.
    ///
    /// Each player has 2 checkers on their 24-point, 5 on the 13-point,
    /// 3 on the 8-point and 5 on the 6-point.
    pub fn new() -> Self {
        let layout = [(24, 2), (13, 5), (8, 3), (6, 5)];
        let mut pos = Self::empty();
        for player in Player::ALL {
            for &(pip, count) in &layout {
                pos.add(player.index_of_pip(pip), player, count);
            }
        }
        pos
    }

    /// Creates a position with no checkers anywhere.
    ///
    /// The result does not satisfy the checker-count invariant; it is a
    /// starting point for building positions.
    pub fn empty() -> Self {
        Self {
            points: [0; NUM_POINTS],
            bar: [0; 2],
            off: [0; 2],
        }
    }

    /// Builds a position from player-relative point numbers.
    ///
    /// Each entry is `(pip, count)` where `pip` is 1..=24 for a point,
    /// 25 for the bar and 0 for the off tray. Checkers not listed are placed
    /// in the off tray.
    ///
    /// # Errors
    ///
    /// Returns an error if a pip is out of range, a point is shared by both
    /// players, or a player has more than 15 checkers listed.
    pub fn from_pips(white: &[(u8, u8)], black: &[(u8, u8)]) -> Result<Self, PositionError> {
        let mut pos = Self::empty();
        for (player, layout) in [(Player::White, white), (Player::Black, black)] {
            for &(pip, count) in layout {
                match pip {
                    0 => pos.off[player.index()] += count,
                    BAR_PIP => pos.bar[player.index()] += count,
                    1..=24 => {
                        let idx = player.index_of_pip(pip);
                        if pos.owner(idx) == Some(player.opposite()) {
                            return Err(PositionError::InvalidPip(pip));
                        }
                        pos.add(idx, player, count);
                    }
                    _ => return Err(PositionError::InvalidPip(pip)),
                }
            }

            let placed = pos.checkers(player);
            if placed > CHECKERS_PER_PLAYER as u32 {
                return Err(PositionError::CheckerCount {
                    player,
                    count: placed,
                });
            }
            pos.off[player.index()] += CHECKERS_PER_PLAYER - placed as u8;
        }
        Ok(pos)
    }

    /// Checks that each player has exactly 15 checkers.
    pub fn validate(&self) -> Result<(), PositionError> {
        for player in Player::ALL {
            let count = self.checkers(player);
            if count != CHECKERS_PER_PLAYER as u32 {
                return Err(PositionError::CheckerCount { player, count });
            }
        }
        Ok(())
    }

    /// Number of `player`'s checkers on point `idx`.
    #[inline]
    pub fn count(&self, idx: usize, player: Player) -> u8 {
        let n = self.points[idx];
        match player {
            Player::White if n > 0 => n as u8,
            Player::Black if n < 0 => n.unsigned_abs(),
            _ => 0,
        }
    }

    /// The player occupying point `idx`, if any.
    #[inline]
    pub fn owner(&self, idx: usize) -> Option<Player> {
        match self.points[idx] {
            n if n > 0 => Some(Player::White),
            n if n < 0 => Some(Player::Black),
            _ => None,
        }
    }

    /// Number of `player`'s checkers on the bar.
    #[inline]
    pub fn bar(&self, player: Player) -> u8 {
        self.bar[player.index()]
    }

    /// Number of `player`'s checkers borne off.
    #[inline]
    pub fn off(&self, player: Player) -> u8 {
        self.off[player.index()]
    }

    /// Total number of `player`'s checkers in all slots.
    pub fn checkers(&self, player: Player) -> u32 {
        let on_points: u32 = (0..NUM_POINTS)
            .map(|idx| self.count(idx, player) as u32)
            .sum();
        on_points + self.bar(player) as u32 + self.off(player) as u32
    }

    /// Sum of the distances every checker of `player` still has to travel.
    pub fn pip_count(&self, player: Player) -> u32 {
        let on_points: u32 = (0..NUM_POINTS)
            .map(|idx| self.count(idx, player) as u32 * player.pip_of(idx) as u32)
            .sum();
        on_points + self.bar(player) as u32 * BAR_PIP as u32
    }

    /// Returns `true` if none of `player`'s checkers are outside the home board.
    pub fn all_home(&self, player: Player) -> bool {
        self.bar(player) == 0
            && (0..NUM_POINTS).all(|idx| player.is_home(idx) || self.count(idx, player) == 0)
    }

    /// Returns `true` if `player` may not land on point `idx`.
    #[inline]
    pub fn is_blocked(&self, idx: usize, player: Player) -> bool {
        self.count(idx, player.opposite()) >= 2
    }

    /// Pip of `player`'s rearmost checker (25 if on the bar).
    pub fn rearmost_pip(&self, player: Player) -> Option<u8> {
        if self.bar(player) > 0 {
            return Some(BAR_PIP);
        }
        (0..NUM_POINTS)
            .filter(|&idx| self.count(idx, player) > 0)
            .map(|idx| player.pip_of(idx))
            .max()
    }

    /// Returns `true` while the two armies can still hit each other.
    pub fn has_contact(&self) -> bool {
        // White travels toward index 0, black toward 23. Contact remains
        // while white's rearmost checker is above black's rearmost checker.
        let white_back = self
            .rearmost_pip(Player::White)
            .map(|pip| pip as i32 - 1)
            .unwrap_or(-1);
        let black_back = self
            .rearmost_pip(Player::Black)
            .map(|pip| NUM_POINTS as i32 - pip as i32)
            .unwrap_or(NUM_POINTS as i32);
        white_back > black_back
    }

    /// The player who has borne off all checkers, if any.
    pub fn winner(&self) -> Option<Player> {
        Player::ALL
            .into_iter()
            .find(|&p| self.off(p) == CHECKERS_PER_PLAYER)
    }

    /// Applies a move without checking legality.
    ///
    /// A hit sends the opposing blot to its bar.
    pub fn apply_move(&mut self, mv: &Move) {
        let player = mv.player;
        match mv.from {
            Slot::Bar => {
                debug_assert!(self.bar(player) > 0);
                self.bar[player.index()] -= 1;
            }
            Slot::Point(idx) => self.remove(idx as usize, player),
            Slot::Off => debug_assert!(false, "cannot move from the off tray"),
        }

        match mv.to {
            Slot::Point(idx) => {
                let idx = idx as usize;
                let opponent = player.opposite();
                if self.count(idx, opponent) == 1 {
                    self.points[idx] = 0;
                    self.bar[opponent.index()] += 1;
                }
                self.add(idx, player, 1);
            }
            Slot::Off => self.off[player.index()] += 1,
            Slot::Bar => debug_assert!(false, "cannot move onto the bar"),
        }
    }

    /// Returns a copy of this position with `mv` applied.
    #[inline]
    pub fn with_move(&self, mv: &Move) -> Position {
        let mut next = *self;
        next.apply_move(mv);
        next
    }

    /// Returns the same position with the colours swapped.
    ///
    /// White's checker on pip `n` becomes black's checker on pip `n`.
    pub fn mirrored(&self) -> Position {
        let mut points = [0; NUM_POINTS];
        for (idx, p) in points.iter_mut().enumerate() {
            *p = -self.points[NUM_POINTS - 1 - idx];
        }
        Position {
            points,
            bar: [self.bar[1], self.bar[0]],
            off: [self.off[1], self.off[0]],
        }
    }

    fn add(&mut self, idx: usize, player: Player, count: u8) {
        debug_assert!(self.owner(idx) != Some(player.opposite()));
        match player {
            Player::White => self.points[idx] += count as i8,
            Player::Black => self.points[idx] -= count as i8,
        }
    }

    fn remove(&mut self, idx: usize, player: Player) {
        debug_assert!(self.count(idx, player) > 0);
        match player {
            Player::White => self.points[idx] -= 1,
            Player::Black => self.points[idx] += 1,
        }
    }
}

impl fmt::Display for Position {
    /// Renders the board from white's point of view.
    ///
    /// The top row shows points 13-24, the bottom row points 12-1.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cell = |idx: usize| match self.owner(idx) {
            Some(p) => format!("{}{:<2}", p.to_char(), self.count(idx, p)),
            None => " . ".to_string(),
        };

        write!(f, " ")?;
        for idx in 12..NUM_POINTS {
            write!(f, "{:<4}", idx + 1)?;
            if idx == 17 {
                write!(f, "| ")?;
            }
        }
        writeln!(f)?;
        write!(f, " ")?;
        for idx in 12..NUM_POINTS {
            write!(f, "{} ", cell(idx))?;
            if idx == 17 {
                write!(f, "| ")?;
            }
        }
        writeln!(f)?;
        writeln!(
            f,
            " bar: {} {}  {} {}    off: {} {}  {} {}",
            Player::White.to_char(),
            self.bar(Player::White),
            Player::Black.to_char(),
            self.bar(Player::Black),
            Player::White.to_char(),
            self.off(Player::White),
            Player::Black.to_char(),
            self.off(Player::Black),
        )?;
        write!(f, " ")?;
        for idx in (0..12).rev() {
            write!(f, "{} ", cell(idx))?;
            if idx == 6 {
                write!(f, "| ")?;
            }
        }
        writeln!(f)?;
        write!(f, " ")?;
        for idx in (0..12).rev() {
            write!(f, "{:<4}", idx + 1)?;
            if idx == 6 {
                write!(f, "| ")?;
            }
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_position() {
        let pos = Position::new();
        assert!(pos.validate().is_ok());
        assert_eq!(pos.count(23, Player::White), 2);
        assert_eq!(pos.count(12, Player::White), 5);
        assert_eq!(pos.count(7, Player::White), 3);
        assert_eq!(pos.count(5, Player::White), 5);
        assert_eq!(pos.count(0, Player::Black), 2);
        assert_eq!(pos.count(11, Player::Black), 5);
        assert_eq!(pos.count(16, Player::Black), 3);
        assert_eq!(pos.count(18, Player::Black), 5);
        assert_eq!(pos.pip_count(Player::White), 167);
        assert_eq!(pos.pip_count(Player::Black), 167);
    }

    #[test]
    fn test_from_pips_fills_off_tray() {
        let pos = Position::from_pips(&[(6, 1), (4, 1)], &[(1, 15)]).unwrap();
        assert!(pos.validate().is_ok());
        assert_eq!(pos.off(Player::White), 13);
        assert_eq!(pos.off(Player::Black), 0);
        assert_eq!(pos.count(5, Player::White), 1);
        assert_eq!(pos.count(23, Player::Black), 15);
    }

    #[test]
    fn test_from_pips_rejects_bad_input() {
        assert_eq!(
            Position::from_pips(&[(26, 1)], &[]),
            Err(PositionError::InvalidPip(26))
        );
        assert!(matches!(
            Position::from_pips(&[(6, 16)], &[]),
            Err(PositionError::CheckerCount { .. })
        ));
        // White's 1-point is black's 24-point.
        assert!(Position::from_pips(&[(1, 2)], &[(24, 2)]).is_err());
    }

    #[test]
    fn test_validate_detects_missing_checkers() {
        let pos = Position::empty();
        assert!(matches!(
            pos.validate(),
            Err(PositionError::CheckerCount { count: 0, .. })
        ));
    }

    #[test]
    fn test_apply_move_hits_blot() {
        let mut pos = Position::from_pips(&[(8, 1)], &[(20, 1)]).unwrap();
        // Black's 20-point is white's 5-point.
        let mv = Move {
            player: Player::White,
            from: Slot::Point(7),
            to: Slot::Point(4),
            die: 3,
            hit: true,
        };
        pos.apply_move(&mv);
        assert_eq!(pos.count(4, Player::White), 1);
        assert_eq!(pos.bar(Player::Black), 1);
        assert!(pos.validate().is_ok());
    }

    #[test]
    fn test_all_home_and_rearmost() {
        let pos = Position::from_pips(&[(6, 5), (2, 3)], &[(24, 15)]).unwrap();
        assert!(pos.all_home(Player::White));
        assert!(!pos.all_home(Player::Black));
        assert_eq!(pos.rearmost_pip(Player::White), Some(6));

        let on_bar = Position::from_pips(&[(25, 1), (6, 5)], &[(24, 15)]).unwrap();
        assert!(!on_bar.all_home(Player::White));
        assert_eq!(on_bar.rearmost_pip(Player::White), Some(25));
    }

    #[test]
    fn test_contact() {
        assert!(Position::new().has_contact());
        let race = Position::from_pips(&[(6, 15)], &[(6, 15)]).unwrap();
        assert!(!race.has_contact());
    }

    #[test]
    fn test_mirrored() {
        let pos = Position::from_pips(&[(8, 2), (25, 1)], &[(3, 4)]).unwrap();
        let mirror = pos.mirrored();
        assert_eq!(mirror.count(Player::Black.index_of_pip(8), Player::Black), 2);
        assert_eq!(mirror.bar(Player::Black), 1);
        assert_eq!(mirror.count(Player::White.index_of_pip(3), Player::White), 4);
        assert_eq!(mirror.mirrored(), pos);
        assert_eq!(Position::new().mirrored(), Position::new());
    }

    #[test]
    fn test_winner() {
        assert_eq!(Position::new().winner(), None);
        let done = Position::from_pips(&[], &[(6, 1)]).unwrap();
        assert_eq!(done.winner(), Some(Player::White));
    }
}
