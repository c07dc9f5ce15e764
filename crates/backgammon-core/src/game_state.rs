//! Game state management for backgammon.
//!
//! This module provides the `GameState` struct which sequences a single game
//! through its phases: rolling, moving, forced and blocked turns, cube
//! actions and the end of the game. It owns no rules itself; legality comes
//! from the move generator and scoring from the scoring module.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GameOptions;
use crate::cube::DoublingCube;
use crate::dice::{self, Dice};
use crate::error::{CubeError, GameError, PositionError, SessionError};
use crate::move_list::{self, Move, PlayList};
use crate::player::Player;
use crate::position::Position;
use crate::scoring::{self, EndReason, GameOutcome, WinKind};

/// Phase of the current game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Nobody has rolled yet.
    Setup,
    /// The player to move may double or roll.
    Rolling,
    /// Dice are rolled and several plays are possible.
    Moving,
    /// Dice are rolled and exactly one distinct play exists.
    ForcedMove,
    /// Dice are rolled but no die can be played.
    NoMoves,
    /// The game is over.
    Finished,
}

/// One completed turn of the game record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub player: Player,
    pub dice: (u8, u8),
    pub moves: Vec<Move>,
}

/// Represents the state of a backgammon game.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    /// The current board position.
    position: Position,
    /// The player whose turn it is.
    turn: Player,
    phase: GamePhase,
    /// Dice of the current turn, `None` until rolled.
    dice: Option<Dice>,
    /// Position at the start of the current turn.
    turn_start: Position,
    /// Moves already played this turn.
    turn_moves: Vec<Move>,
    cube: DoublingCube,
    /// Doubling is disabled for this game.
    crawford: bool,
    outcome: Option<GameOutcome>,
    history: Vec<TurnRecord>,
    options: GameOptions,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(GameOptions::default())
    }
}

impl GameState {
    /// Creates a new game in the starting position, waiting for the opening roll.
    pub fn new(options: GameOptions) -> Self {
        let position = Position::new();
        Self {
            position,
            turn: Player::White,
            phase: GamePhase::Setup,
            dice: None,
            turn_start: position,
            turn_moves: Vec::new(),
            cube: DoublingCube::new(options.cube_enabled, options.max_cube_value),
            crawford: false,
            outcome: None,
            history: Vec::new(),
            options,
        }
    }

    /// Creates a game from an arbitrary position with `turn` about to roll.
    ///
    /// If a player has already borne off every checker the game starts
    /// finished.
    ///
    /// # Errors
    ///
    /// Returns an error if the position breaks the checker-count invariant.
    pub fn from_position(
        position: Position,
        turn: Player,
        options: GameOptions,
    ) -> Result<Self, PositionError> {
        position.validate()?;
        let mut game = Self::new(options);
        game.position = position;
        game.turn_start = position;
        game.turn = turn;
        game.phase = GamePhase::Rolling;
        if let Some(winner) = position.winner() {
            game.finish(winner, scoring::win_kind(&position, winner), EndReason::BearOff);
        }
        Ok(game)
    }

    /// Marks this game as the Crawford game, in which nobody may double.
    pub fn with_crawford(mut self, crawford: bool) -> Self {
        self.crawford = crawford;
        self
    }

    /// Returns a reference to the current board position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Returns the player whose turn it is.
    pub fn turn(&self) -> Player {
        self.turn
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Dice of the current turn, if rolled.
    pub fn dice(&self) -> Option<&Dice> {
        self.dice.as_ref()
    }

    pub fn cube(&self) -> &DoublingCube {
        &self.cube
    }

    pub fn is_crawford(&self) -> bool {
        self.crawford
    }

    pub fn options(&self) -> &GameOptions {
        &self.options
    }

    /// Result of the game once finished.
    pub fn outcome(&self) -> Option<&GameOutcome> {
        self.outcome.as_ref()
    }

    /// Completed turns, oldest first.
    pub fn history(&self) -> &[TurnRecord] {
        &self.history
    }

    /// Moves played so far in the current turn.
    pub fn turn_moves(&self) -> &[Move] {
        &self.turn_moves
    }

    /// Position at the start of the current turn.
    pub fn turn_start(&self) -> &Position {
        &self.turn_start
    }

    /// Returns `true` once the game is over.
    pub fn is_finished(&self) -> bool {
        self.phase == GamePhase::Finished
    }

    /// Leaves the setup phase with `first` to roll.
    pub fn start(&mut self, first: Player) -> Result<(), GameError> {
        self.expect_phase(GamePhase::Setup, "start the game")?;
        self.turn = first;
        self.set_phase(GamePhase::Rolling);
        Ok(())
    }

    /// Performs the opening roll.
    ///
    /// Each player rolls one die, ties are rolled again, and the player with
    /// the higher die plays both values as the first turn. White's die is
    /// the first value of the returned roll.
    pub fn opening_roll<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Dice, GameError> {
        self.expect_phase(GamePhase::Setup, "make the opening roll")?;
        let (white, black) = loop {
            let white = dice::roll_die(rng);
            let black = dice::roll_die(rng);
            if white != black {
                break (white, black);
            }
        };
        let dice = Dice::new(white, black)?;
        self.start(if white > black {
            Player::White
        } else {
            Player::Black
        })?;
        self.enter_dice(dice.clone());
        Ok(dice)
    }

    /// Rolls the dice for the player to move.
    pub fn roll<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Dice, GameError> {
        let dice = Dice::roll(rng);
        self.set_dice(dice.clone())?;
        Ok(dice)
    }

    /// Uses `dice` as the roll of the player to move.
    ///
    /// From the setup phase this starts the game with the current player.
    pub fn set_dice(&mut self, dice: Dice) -> Result<(), GameError> {
        if self.phase == GamePhase::Setup {
            self.set_phase(GamePhase::Rolling);
        }
        self.expect_phase(GamePhase::Rolling, "roll")?;
        if self.cube.pending().is_some() {
            return Err(GameError::InvalidPhase {
                action: "roll while a double is pending",
                phase: self.phase,
            });
        }
        dice.validate()?;
        self.enter_dice(dice);
        Ok(())
    }

    /// Every single move that may be played next.
    pub fn legal_moves(&self) -> Vec<Move> {
        match (&self.dice, self.phase) {
            (Some(dice), GamePhase::Moving | GamePhase::ForcedMove) => {
                move_list::legal_moves(&self.position, self.turn, dice.remaining())
            }
            _ => Vec::new(),
        }
    }

    /// Every legal way to play the rest of the current roll.
    pub fn legal_plays(&self) -> PlayList {
        match (&self.dice, self.phase) {
            (Some(dice), GamePhase::Moving | GamePhase::ForcedMove) => {
                move_list::legal_plays(&self.position, self.turn, dice.remaining())
            }
            _ => PlayList::default(),
        }
    }

    /// Plays one move of the current roll.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::IllegalMove`] if `mv` is not among
    /// [`GameState::legal_moves`].
    pub fn apply_move(&mut self, mv: Move) -> Result<(), GameError> {
        if !matches!(self.phase, GamePhase::Moving | GamePhase::ForcedMove) {
            return Err(GameError::InvalidPhase {
                action: "move",
                phase: self.phase,
            });
        }
        if !self.legal_moves().contains(&mv) {
            return Err(GameError::IllegalMove { mv });
        }

        if let Some(dice) = self.dice.as_mut() {
            dice.consume(mv.die)?;
        }
        self.position.apply_move(&mv);
        self.turn_moves.push(mv);

        if self.position.off(self.turn) == crate::constants::CHECKERS_PER_PLAYER {
            self.record_turn();
            let kind = scoring::win_kind(&self.position, self.turn);
            self.finish(self.turn, kind, EndReason::BearOff);
            return Ok(());
        }

        if self.options.auto_switch_turn && self.legal_moves().is_empty() {
            self.finish_turn();
        }
        Ok(())
    }

    /// Plays a whole sequence of moves atomically.
    ///
    /// Either every move is applied or, on the first illegal one, none is.
    pub fn apply_play(&mut self, moves: &[Move]) -> Result<(), GameError> {
        let mut next = self.clone();
        for &mv in moves {
            next.apply_move(mv)?;
        }
        *self = next;
        Ok(())
    }

    /// Plays the only legal play.
    pub fn play_forced(&mut self) -> Result<(), GameError> {
        self.expect_phase(GamePhase::ForcedMove, "play a forced move")?;
        let plays = self.legal_plays();
        match plays.get(0) {
            Some(play) => self.apply_play(&play.moves),
            None => Ok(()),
        }
    }

    /// Takes back the last move of the current turn.
    ///
    /// Returns `false` if nothing can be undone.
    pub fn undo_move(&mut self) -> bool {
        if !matches!(self.phase, GamePhase::Moving | GamePhase::ForcedMove) {
            return false;
        }
        let Some(mv) = self.turn_moves.pop() else {
            return false;
        };
        if let Some(dice) = self.dice.as_mut()
            && dice.restore(mv.die).is_err()
        {
            self.turn_moves.push(mv);
            return false;
        }

        let mut position = self.turn_start;
        for played in &self.turn_moves {
            position.apply_move(played);
        }
        self.position = position;
        debug!(player = %self.turn, %mv, "move undone");
        true
    }

    /// Returns `true` once the current roll has been played as far as it can.
    pub fn is_turn_complete(&self) -> bool {
        match self.phase {
            GamePhase::NoMoves => true,
            GamePhase::Moving | GamePhase::ForcedMove => self.legal_moves().is_empty(),
            _ => false,
        }
    }

    /// Passes the turn to the opponent after the roll is fully played.
    pub fn switch_turn(&mut self) -> Result<(), GameError> {
        if !self.is_turn_complete() {
            return Err(GameError::InvalidPhase {
                action: "switch turns",
                phase: self.phase,
            });
        }
        self.finish_turn();
        Ok(())
    }

    /// Offers a double on behalf of the player to move.
    ///
    /// Only allowed before rolling, outside the Crawford game, by the cube
    /// owner or by either player while the cube is centered.
    pub fn offer_double(&mut self) -> Result<(), GameError> {
        if self.phase != GamePhase::Rolling {
            return Err(CubeError::NotRollingPhase.into());
        }
        if self.crawford {
            return Err(CubeError::Crawford.into());
        }
        self.cube.offer(self.turn)?;
        Ok(())
    }

    /// Accepts the pending double for the opponent of the offering player.
    ///
    /// Returns the new cube value.
    pub fn accept_double(&mut self) -> Result<u32, GameError> {
        Ok(self.cube.accept()?)
    }

    /// Declines the pending double; the offering player wins the current
    /// cube value.
    pub fn decline_double(&mut self) -> Result<&GameOutcome, GameError> {
        let pending = self.cube.decline()?;
        self.finish(pending.offered_by, WinKind::Single, EndReason::DoubleDeclined);
        self.finished_outcome()
    }

    /// Resigns the game for `player`, conceding `value` times the cube.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidResignation`] if the board does not
    /// support a gammon or backgammon claim.
    pub fn resign(&mut self, player: Player, value: WinKind) -> Result<&GameOutcome, GameError> {
        if matches!(self.phase, GamePhase::Setup | GamePhase::Finished) {
            return Err(GameError::InvalidPhase {
                action: "resign",
                phase: self.phase,
            });
        }
        scoring::validate_resignation(&self.position, player, value).map_err(|reason| {
            GameError::InvalidResignation {
                player,
                value,
                reason,
            }
        })?;
        self.cube.clear_pending();
        self.finish(player.opposite(), value, EndReason::Resignation);
        self.finished_outcome()
    }

    /// Checks that the fields of a deserialized game agree with each other.
    ///
    /// # Errors
    ///
    /// Returns an error if a board breaks the checker-count invariant, the
    /// dice are out of range, the dice do not match the phase, the moves of
    /// the current turn do not lead to the current position or the cube is
    /// in an impossible state.
    pub fn validate(&self) -> Result<(), SessionError> {
        self.position.validate()?;
        self.turn_start.validate()?;

        let rolled = matches!(
            self.phase,
            GamePhase::Moving | GamePhase::ForcedMove | GamePhase::NoMoves
        );
        match (&self.dice, rolled) {
            (Some(dice), true) => dice.validate()?,
            (None, false) => {
                if !self.turn_moves.is_empty() {
                    return Err(inconsistent("moves recorded without dice"));
                }
            }
            (Some(_), false) => {
                return Err(inconsistent(format!("dice present in phase {:?}", self.phase)));
            }
            (None, true) => {
                return Err(inconsistent(format!("no dice in phase {:?}", self.phase)));
            }
        }

        if let Some(dice) = &self.dice {
            self.validate_turn(dice)?;
        }

        match (self.phase, &self.outcome) {
            (GamePhase::Finished, None) => {
                return Err(inconsistent("finished game without an outcome"));
            }
            (GamePhase::Finished, Some(_)) => {}
            (_, Some(_)) => return Err(inconsistent("outcome recorded in an unfinished game")),
            (_, None) => {
                if let Some(winner) = self.position.winner() {
                    return Err(inconsistent(format!("{winner} has already borne off")));
                }
            }
        }

        let cube = &self.cube;
        if !cube.max_value().is_power_of_two() || cube.max_value() < 2 {
            return Err(inconsistent(format!("cube maximum {}", cube.max_value())));
        }
        if !cube.value().is_power_of_two() || cube.value() > cube.max_value() {
            return Err(inconsistent(format!("cube value {}", cube.value())));
        }
        if cube.pending().is_some() && self.phase != GamePhase::Rolling {
            return Err(inconsistent("double pending outside the rolling phase"));
        }
        Ok(())
    }

    /// Replays the recorded moves of the current turn from its start with a
    /// fresh copy of the roll. Every move must be legal when it is replayed,
    /// and the result must match the saved position and remaining dice.
    fn validate_turn(&self, dice: &Dice) -> Result<(), SessionError> {
        let (first, second) = dice.values();
        let mut fresh = Dice::new(first, second)?;

        let plays = move_list::legal_plays(&self.turn_start, self.turn, fresh.remaining());
        let phase_ok = match self.phase {
            GamePhase::NoMoves => plays.is_empty(),
            GamePhase::ForcedMove => plays.is_forced(),
            _ => !plays.is_empty() && !plays.is_forced(),
        };
        if !phase_ok {
            return Err(inconsistent(format!(
                "phase {:?} with {} legal play(s) for {dice}",
                self.phase,
                plays.len()
            )));
        }

        let mut replay = self.turn_start;
        for mv in &self.turn_moves {
            if mv.player != self.turn {
                return Err(inconsistent(format!("move {mv:?} by the wrong player")));
            }
            if !move_list::legal_moves(&replay, self.turn, fresh.remaining()).contains(mv) {
                return Err(inconsistent(format!("illegal turn move {mv:?}")));
            }
            fresh.consume(mv.die)?;
            replay.apply_move(mv);
        }

        let mut expected = fresh.remaining().to_vec();
        let mut saved = dice.remaining().to_vec();
        expected.sort_unstable();
        saved.sort_unstable();
        if expected != saved {
            return Err(inconsistent(format!(
                "remaining dice {saved:?} after moves that leave {expected:?}"
            )));
        }
        if replay != self.position {
            return Err(inconsistent("turn moves do not lead to the position"));
        }
        Ok(())
    }

    /// Pip counts as `(white, black)`.
    pub fn pip_counts(&self) -> (u32, u32) {
        (
            self.position.pip_count(Player::White),
            self.position.pip_count(Player::Black),
        )
    }

    fn enter_dice(&mut self, dice: Dice) {
        debug!(player = %self.turn, %dice, "dice rolled");
        self.turn_start = self.position;
        self.turn_moves.clear();
        self.dice = Some(dice);
        self.phase = GamePhase::Moving;

        let plays = self.legal_plays();
        if plays.is_empty() {
            self.set_phase(GamePhase::NoMoves);
            if self.options.auto_switch_turn {
                self.finish_turn();
            }
        } else if plays.is_forced() {
            self.set_phase(GamePhase::ForcedMove);
            if self.options.auto_play_forced
                && let Some(play) = plays.get(0)
            {
                // Moves of a generated play are always legal in order.
                let _ = self.apply_play(&play.moves);
            }
        }
    }

    fn finish_turn(&mut self) {
        self.record_turn();
        self.turn = self.turn.opposite();
        self.dice = None;
        self.turn_moves.clear();
        self.turn_start = self.position;
        self.set_phase(GamePhase::Rolling);
    }

    fn record_turn(&mut self) {
        if let Some(dice) = &self.dice {
            self.history.push(TurnRecord {
                player: self.turn,
                dice: dice.values(),
                moves: self.turn_moves.clone(),
            });
        }
    }

    fn finish(&mut self, winner: Player, kind: WinKind, reason: EndReason) {
        let outcome = GameOutcome::new(winner, kind, self.cube.value(), reason);
        debug!(%winner, ?kind, points = outcome.points, ?reason, "game finished");
        self.outcome = Some(outcome);
        self.dice = None;
        self.turn_moves.clear();
        self.set_phase(GamePhase::Finished);
    }

    fn finished_outcome(&self) -> Result<&GameOutcome, GameError> {
        self.outcome.as_ref().ok_or(GameError::InvalidPhase {
            action: "read the outcome",
            phase: self.phase,
        })
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            debug!(player = %self.turn, from = ?self.phase, to = ?phase, "phase change");
            self.phase = phase;
        }
    }

    fn expect_phase(&self, phase: GamePhase, action: &'static str) -> Result<(), GameError> {
        if self.phase != phase {
            return Err(GameError::InvalidPhase {
                action,
                phase: self.phase,
            });
        }
        Ok(())
    }
}

fn inconsistent(reason: impl Into<String>) -> SessionError {
    SessionError::Inconsistent(reason.into())
}
