//! Plays whole matches between two AIs.

use backgammon_core::ai::Ai;
use backgammon_core::config::MatchConfig;
use backgammon_core::game_state::GamePhase;
use backgammon_core::player::Player;
use backgammon_core::scoring::{EndReason, GameOutcome, WinKind};
use backgammon_core::session::Session;
use rand::Rng;
use tracing::debug;

use crate::error::{MatchRunnerError, Result};

/// Upper bound on state-machine steps in one game.
const MAX_STEPS: usize = 10_000;

/// The two sides of a match.
pub struct Players<'a> {
    pub white: &'a Ai,
    pub black: &'a Ai,
}

impl Players<'_> {
    fn get(&self, player: Player) -> &Ai {
        match player {
            Player::White => self.white,
            Player::Black => self.black,
        }
    }
}

/// Summary of one finished match, by color.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchRecord {
    pub winner: Option<Player>,
    pub scores: [u32; 2],
    pub games: u32,
    pub gammons: [u32; 2],
    pub backgammons: [u32; 2],
    pub declined_doubles: u32,
    pub highest_cube: u32,
}

impl MatchRecord {
    fn add_game(&mut self, outcome: &GameOutcome) {
        let winner = outcome.winner.index();
        match outcome.kind {
            WinKind::Single => {}
            WinKind::Gammon => self.gammons[winner] += 1,
            WinKind::Backgammon => self.backgammons[winner] += 1,
        }
        if outcome.reason == EndReason::DoubleDeclined {
            self.declined_doubles += 1;
        }
        self.highest_cube = self.highest_cube.max(outcome.cube_value);
    }
}

/// Plays a match to its target and returns the record.
pub fn play_match<R: Rng + ?Sized>(
    config: &MatchConfig,
    players: &Players<'_>,
    rng: &mut R,
) -> Result<MatchRecord> {
    let mut session = Session::new(config.clone())?;
    let mut record = MatchRecord::default();

    loop {
        let outcome = play_game(&mut session, players, rng)?;
        record.add_game(&outcome);
        if let Some(winner) = session.finish_game()? {
            let state = session.match_state();
            record.winner = Some(winner);
            record.scores = [state.score(Player::White), state.score(Player::Black)];
            record.games = state.games_played();
            debug!(%winner, games = record.games, "match finished");
            return Ok(record);
        }
    }
}

/// Plays the session's current game to the end.
pub fn play_game<R: Rng + ?Sized>(
    session: &mut Session,
    players: &Players<'_>,
    rng: &mut R,
) -> Result<GameOutcome> {
    session.game_mut().opening_roll(rng)?;

    for _ in 0..MAX_STEPS {
        let game = session.game();
        let state = session.match_state();
        if let Some(outcome) = game.outcome() {
            return Ok(*outcome);
        }

        if let Some(pending) = game.cube().pending() {
            let responder = pending.offered_by.opposite();
            if players.get(responder).should_accept(game, Some(state)) {
                session.game_mut().accept_double()?;
            } else {
                session.game_mut().decline_double()?;
            }
            continue;
        }

        let player = game.turn();
        let ai = players.get(player);
        match game.phase() {
            GamePhase::Rolling => {
                if ai.should_double(game, Some(state)) {
                    session.game_mut().offer_double()?;
                } else {
                    session.game_mut().roll(rng)?;
                }
            }
            GamePhase::NoMoves => session.game_mut().switch_turn()?,
            GamePhase::Moving | GamePhase::ForcedMove => {
                let plays = game.legal_plays();
                let play = ai.select_play(game.position(), player, &plays, rng).cloned();
                let game = session.game_mut();
                if let Some(play) = play {
                    game.apply_play(&play.moves)?;
                }
                if !game.is_finished() && game.is_turn_complete() {
                    game.switch_turn()?;
                }
            }
            GamePhase::Setup | GamePhase::Finished => {}
        }
    }
    Err(MatchRunnerError::Stalled(MAX_STEPS))
}
