//! Legal move generation.
//!
//! Two generators share one recursive walk over the remaining dice:
//!
//! - [`PlayList::new`] enumerates every maximal full-turn play, deduplicated
//!   by resulting position.
//! - [`legal_moves`] answers "which single move may be played next" for an
//!   interactive turn that is played one die at a time.
//!
//! Both enforce mandatory bar entry, full dice usage and the higher-die rule,
//! so no illegal move ever leaves this module.

use std::collections::HashSet;
use std::fmt;
use std::ops::ControlFlow;
use std::slice;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::constants::{BAR_PIP, DIE_FACES, MAX_PLAY_MOVES, NUM_POINTS};
use crate::player::Player;
use crate::position::Position;

/// Upper bound on single moves for one die: at most 15 occupied origins.
const MAX_SINGLE_MOVES: usize = 16;

/// A location a checker can move from or to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Bar,
    Point(u8),
    Off,
}

/// A single checker movement consuming one die.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub player: Player,
    pub from: Slot,
    pub to: Slot,
    /// The die value this move consumes.
    pub die: u8,
    /// Whether the move sends an opposing blot to the bar.
    pub hit: bool,
}

impl Move {
    /// Player-relative pip of the origin (25 for the bar).
    pub fn from_pip(&self) -> u8 {
        match self.from {
            Slot::Bar => BAR_PIP,
            Slot::Point(idx) => self.player.pip_of(idx as usize),
            Slot::Off => 0,
        }
    }

    /// Player-relative pip of the destination (0 for the off tray).
    pub fn to_pip(&self) -> u8 {
        match self.to {
            Slot::Bar => BAR_PIP,
            Slot::Point(idx) => self.player.pip_of(idx as usize),
            Slot::Off => 0,
        }
    }

    /// Returns `true` if this move bears a checker off.
    #[inline]
    pub fn is_bear_off(&self) -> bool {
        self.to == Slot::Off
    }
}

impl fmt::Display for Move {
    /// Formats the move in standard notation, e.g. `13/8`, `bar/22*`, `3/off`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.from {
            Slot::Bar => write!(f, "bar")?,
            _ => write!(f, "{}", self.from_pip())?,
        }
        write!(f, "/")?;
        match self.to {
            Slot::Off => write!(f, "off")?,
            _ => write!(f, "{}", self.to_pip())?,
        }
        if self.hit {
            write!(f, "*")?;
        }
        Ok(())
    }
}

/// A full-turn move sequence and the position it produces.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Play {
    pub moves: ArrayVec<Move, MAX_PLAY_MOVES>,
    pub result: Position,
}

impl Play {
    /// Number of checkers hit by this play.
    pub fn hits(&self) -> usize {
        self.moves.iter().filter(|m| m.hit).count()
    }
}

impl fmt::Display for Play {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, mv) in self.moves.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{mv}")?;
        }
        Ok(())
    }
}

/// Every legal full-turn play for a position and roll.
#[derive(Clone, Debug, Default)]
pub struct PlayList {
    plays: Vec<Play>,
    max_moves: usize,
}

impl PlayList {
    /// Generates all maximal plays for `player` with the unused `dice`.
    ///
    /// Plays reaching the same position are reported once.
    pub fn new(pos: &Position, player: Player, dice: &[u8]) -> PlayList {
        let mut leaves: Vec<Play> = Vec::new();
        let mut prefix = ArrayVec::new();
        let _ = walk(
            pos,
            player,
            dice,
            is_double(dice),
            BAR_PIP,
            &mut prefix,
            &mut |moves: &[Move], result: &Position| {
                leaves.push(Play {
                    moves: moves.iter().copied().collect(),
                    result: *result,
                });
                ControlFlow::Continue(())
            },
        );

        let max_moves = leaves.iter().map(|p| p.moves.len()).max().unwrap_or(0);
        if max_moves == 0 {
            return PlayList::default();
        }

        leaves.retain(|p| p.moves.len() == max_moves);
        if max_moves == 1 && needs_higher_die(dice) {
            let high = dice.iter().copied().max().unwrap_or(0);
            if leaves.iter().any(|p| p.moves[0].die == high) {
                leaves.retain(|p| p.moves[0].die == high);
            }
        }

        let mut seen = HashSet::with_capacity(leaves.len());
        leaves.retain(|p| seen.insert(p.result));
        trace!(%player, ?dice, plays = leaves.len(), max_moves, "generated plays");

        PlayList {
            plays: leaves,
            max_moves,
        }
    }

    /// Number of distinct plays.
    #[inline]
    pub fn len(&self) -> usize {
        self.plays.len()
    }

    /// Returns `true` if no die can be played.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }

    /// Returns `true` if exactly one distinct play exists.
    #[inline]
    pub fn is_forced(&self) -> bool {
        self.plays.len() == 1
    }

    /// Number of dice every legal play uses.
    #[inline]
    pub fn max_moves(&self) -> usize {
        self.max_moves
    }

    /// Returns the play at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Play> {
        self.plays.get(index)
    }

    /// Iterates over the plays in generation order.
    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, Play> {
        self.plays.iter()
    }

    /// Finds the play producing `result`.
    pub fn find_result(&self, result: &Position) -> Option<&Play> {
        self.plays.iter().find(|p| p.result == *result)
    }

    /// Returns `true` if some play consists of exactly `moves` in order.
    pub fn contains(&self, moves: &[Move]) -> bool {
        self.plays.iter().any(|p| p.moves.as_slice() == moves)
    }

    /// Distinct first moves over all plays.
    ///
    /// Doubles are walked back checker first, so for doubles this is a
    /// subset of [`legal_moves`]; use that for interactive input.
    pub fn first_moves(&self) -> Vec<Move> {
        let mut moves: Vec<Move> = Vec::new();
        for play in &self.plays {
            if let Some(&mv) = play.moves.first()
                && !moves.contains(&mv)
            {
                moves.push(mv);
            }
        }
        moves
    }
}

impl<'a> IntoIterator for &'a PlayList {
    type Item = &'a Play;
    type IntoIter = slice::Iter<'a, Play>;

    fn into_iter(self) -> Self::IntoIter {
        self.plays.iter()
    }
}

/// Generates every legal full-turn play.
#[inline]
pub fn legal_plays(pos: &Position, player: Player, dice: &[u8]) -> PlayList {
    PlayList::new(pos, player, dice)
}

/// Generates every single move that begins some maximal play.
///
/// This is the step-by-step generator: after applying one of the returned
/// moves and consuming its die, calling it again with the updated position
/// and dice yields the legal continuations.
pub fn legal_moves(pos: &Position, player: Player, dice: &[u8]) -> Vec<Move> {
    let max = max_moves(pos, player, dice);
    if max == 0 {
        return Vec::new();
    }

    let mut moves = Vec::new();
    let mut tried = [false; DIE_FACES as usize + 1];
    for (i, &die) in dice.iter().enumerate() {
        if std::mem::replace(&mut tried[die as usize], true) {
            continue;
        }
        let rest = without(dice, i);
        for mv in single_moves(pos, player, die) {
            let next = pos.with_move(&mv);
            if 1 + max_moves(&next, player, &rest) == max {
                moves.push(mv);
            }
        }
    }

    if max == 1 && needs_higher_die(dice) {
        let high = dice.iter().copied().max().unwrap_or(0);
        if moves.iter().any(|m| m.die == high) {
            moves.retain(|m| m.die == high);
        }
    }
    moves
}

/// Largest number of dice `player` can play from `pos`.
pub fn max_moves(pos: &Position, player: Player, dice: &[u8]) -> usize {
    let mut best = 0;
    let mut prefix = ArrayVec::new();
    let _ = walk(
        pos,
        player,
        dice,
        is_double(dice),
        BAR_PIP,
        &mut prefix,
        &mut |moves: &[Move], _: &Position| {
            best = best.max(moves.len());
            if best == dice.len() {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        },
    );
    best
}

/// Generates the moves of a single checker by exactly one die.
///
/// Checkers on the bar must enter before any other checker moves, and
/// bearing off is allowed only with every checker home. A die larger than
/// needed bears off only from the rearmost point.
pub fn single_moves(
    pos: &Position,
    player: Player,
    die: u8,
) -> ArrayVec<Move, MAX_SINGLE_MOVES> {
    let mut moves = ArrayVec::new();

    if pos.bar(player) > 0 {
        let entry = player.index_of_pip(BAR_PIP - die);
        if let Some(mv) = landing(pos, player, Slot::Bar, entry, die) {
            moves.push(mv);
        }
        return moves;
    }

    let rearmost = if pos.all_home(player) {
        pos.rearmost_pip(player)
    } else {
        None
    };

    for idx in 0..NUM_POINTS {
        if pos.count(idx, player) == 0 {
            continue;
        }
        let pip = player.pip_of(idx);
        let from = Slot::Point(idx as u8);
        if pip > die {
            if let Some(mv) = landing(pos, player, from, player.index_of_pip(pip - die), die) {
                moves.push(mv);
            }
        } else if rearmost.is_some_and(|back| pip == die || pip == back) {
            moves.push(Move {
                player,
                from,
                to: Slot::Off,
                die,
                hit: false,
            });
        }
    }
    moves
}

fn landing(pos: &Position, player: Player, from: Slot, dest: usize, die: u8) -> Option<Move> {
    if pos.is_blocked(dest, player) {
        return None;
    }
    Some(Move {
        player,
        from,
        to: Slot::Point(dest as u8),
        die,
        hit: pos.count(dest, player.opposite()) == 1,
    })
}

/// Depth-first walk over every move order, calling `visit` at each leaf.
///
/// With `canonical` set (doubles) successive origins never move forward, so
/// each combination of checkers is visited once; any legal doubles play can
/// be reordered back checker first without losing legality.
fn walk<F>(
    pos: &Position,
    player: Player,
    dice: &[u8],
    canonical: bool,
    last_pip: u8,
    prefix: &mut ArrayVec<Move, MAX_PLAY_MOVES>,
    visit: &mut F,
) -> ControlFlow<()>
where
    F: FnMut(&[Move], &Position) -> ControlFlow<()>,
{
    let mut extended = false;
    let mut tried = [false; DIE_FACES as usize + 1];

    for (i, &die) in dice.iter().enumerate() {
        if std::mem::replace(&mut tried[die as usize], true) {
            continue;
        }
        let rest = without(dice, i);
        for mv in single_moves(pos, player, die) {
            let from_pip = mv.from_pip();
            if canonical && from_pip > last_pip {
                continue;
            }
            extended = true;
            let next = pos.with_move(&mv);
            prefix.push(mv);
            let flow = walk(&next, player, &rest, canonical, from_pip, prefix, visit);
            prefix.pop();
            flow?;
        }
    }

    if !extended {
        visit(prefix, pos)?;
    }
    ControlFlow::Continue(())
}

fn without(dice: &[u8], index: usize) -> ArrayVec<u8, MAX_PLAY_MOVES> {
    dice.iter()
        .enumerate()
        .filter(|&(i, _)| i != index)
        .map(|(_, &d)| d)
        .collect()
}

#[inline]
fn is_double(dice: &[u8]) -> bool {
    dice.len() > 1 && dice.iter().all(|&d| d == dice[0])
}

#[inline]
fn needs_higher_die(dice: &[u8]) -> bool {
    dice.len() == 2 && dice[0] != dice[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::Dice;

    fn moves_str(moves: &[Move]) -> Vec<String> {
        let mut out: Vec<String> = moves.iter().map(|m| m.to_string()).collect();
        out.sort();
        out
    }

    #[test]
    fn test_opening_six_five() {
        let pos = Position::new();
        let dice = Dice::new(6, 5).unwrap();
        let plays = PlayList::new(&pos, Player::White, dice.remaining());
        assert_eq!(plays.max_moves(), 2);
        assert_eq!(plays.len(), 7);

        let lovers_leap = pos
            .with_move(&Move {
                player: Player::White,
                from: Slot::Point(23),
                to: Slot::Point(17),
                die: 6,
                hit: false,
            })
            .with_move(&Move {
                player: Player::White,
                from: Slot::Point(17),
                to: Slot::Point(12),
                die: 5,
                hit: false,
            });
        assert!(plays.find_result(&lovers_leap).is_some());
    }

    #[test]
    fn test_single_moves_respect_blocks() {
        let pos = Position::new();
        // 24/19 lands on black's 6-point (five checkers).
        let fives = single_moves(&pos, Player::White, 5);
        assert!(fives.iter().all(|m| m.to_string() != "24/19"));
        assert_eq!(moves_str(&fives), vec!["13/8", "8/3"]);
    }

    #[test]
    fn test_bar_entry_is_mandatory() {
        let pos = Position::from_pips(&[(25, 1), (13, 14)], &[(19, 15)]).unwrap();
        let moves = legal_moves(&pos, Player::White, &[4, 3]);
        assert!(!moves.is_empty());
        assert!(moves.iter().all(|m| m.from == Slot::Bar));
    }

    #[test]
    fn test_blocked_entry_has_no_moves() {
        // White enters into black's home board, which black has closed.
        let pos = Position::from_pips(
            &[(25, 1), (13, 14)],
            &[(1, 2), (2, 2), (3, 2), (4, 2), (5, 2), (6, 5)],
        )
        .unwrap();
        let dice = Dice::new(6, 6).unwrap();
        assert!(PlayList::new(&pos, Player::White, dice.remaining()).is_empty());
        assert!(legal_moves(&pos, Player::White, dice.remaining()).is_empty());
    }

    #[test]
    fn test_hit_flag() {
        let pos = Position::from_pips(&[(8, 15)], &[(20, 1), (1, 14)]).unwrap();
        // Black's 20-point is white's 5-point.
        let moves = single_moves(&pos, Player::White, 3);
        assert_eq!(moves.len(), 1);
        assert!(moves[0].hit);
        assert_eq!(moves[0].to_string(), "8/5*");
    }

    #[test]
    fn test_higher_die_rule() {
        // The lone runner on the 13-point can play the 6 (13/7) or the 5
        // (13/8) but either way the second die would land on the blocked
        // 2-point. The checkers on the 1-point cannot move.
        let pos = Position::from_pips(&[(13, 1), (1, 14)], &[(23, 2), (19, 13)]).unwrap();
        let moves = legal_moves(&pos, Player::White, &[6, 5]);
        assert_eq!(moves_str(&moves), vec!["13/7"]);

        let plays = PlayList::new(&pos, Player::White, &[6, 5]);
        assert_eq!(plays.max_moves(), 1);
        assert!(plays.is_forced());
        assert_eq!(plays.get(0).unwrap().moves[0].die, 6);
    }

    #[test]
    fn test_bear_off_exact_and_overshoot() {
        // Checkers on the 6 and 4 points: a 5 must move 6/1, the 4 bears off
        // exactly, and no overshoot is allowed from the 4 while the 6 is occupied.
        let pos = Position::from_pips(&[(6, 1), (4, 1)], &[(1, 15)]).unwrap();
        let fives = single_moves(&pos, Player::White, 5);
        assert_eq!(moves_str(&fives), vec!["6/1"]);

        // Checkers on the 4 and 3 points: a 5 overshoots from the rearmost.
        let pos = Position::from_pips(&[(4, 1), (3, 1)], &[(1, 15)]).unwrap();
        let fives = single_moves(&pos, Player::White, 5);
        assert_eq!(moves_str(&fives), vec!["4/off"]);
    }

    #[test]
    fn test_no_bear_off_with_checker_outside() {
        let pos = Position::from_pips(&[(7, 1), (1, 14)], &[(1, 15)]).unwrap();
        let ones = single_moves(&pos, Player::White, 1);
        assert_eq!(moves_str(&ones), vec!["7/6"]);
    }

    #[test]
    fn test_doubles_play_four() {
        let pos = Position::new();
        let dice = Dice::new(3, 3).unwrap();
        let plays = PlayList::new(&pos, Player::White, dice.remaining());
        assert_eq!(plays.max_moves(), 4);
        assert!(plays.iter().all(|p| p.moves.len() == 4));
    }

    #[test]
    fn test_legal_moves_are_first_moves_of_plays() {
        let pos = Position::new();
        for (dice, _) in crate::dice::all_rolls() {
            let plays = PlayList::new(&pos, Player::White, dice.remaining());
            let moves = legal_moves(&pos, Player::White, dice.remaining());
            for mv in plays.first_moves() {
                assert!(moves.contains(&mv), "{dice}: {mv} missing");
            }
            for mv in &moves {
                let next = pos.with_move(mv);
                let mut rest = dice.clone();
                rest.consume(mv.die).unwrap();
                assert_eq!(
                    1 + max_moves(&next, Player::White, rest.remaining()),
                    plays.max_moves()
                );
            }
        }
    }

    #[test]
    fn test_generation_is_idempotent() {
        let pos = Position::new();
        let first = PlayList::new(&pos, Player::Black, &[4, 2]);
        let second = PlayList::new(&pos, Player::Black, &[4, 2]);
        assert_eq!(first.plays, second.plays);
    }

    #[test]
    fn test_move_notation() {
        let mv = Move {
            player: Player::Black,
            from: Slot::Bar,
            to: Slot::Point(3),
            die: 4,
            hit: true,
        };
        assert_eq!(mv.to_string(), "bar/21*");
        assert_eq!(mv.from_pip(), 25);
        assert_eq!(mv.to_pip(), 21);
    }
}
