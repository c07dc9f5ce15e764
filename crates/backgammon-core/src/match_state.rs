//! Match scoring across games and the Crawford rule.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::GameOptions;
use crate::error::GameError;
use crate::game_state::GameState;
use crate::player::Player;
use crate::scoring::GameOutcome;

/// Score and Crawford bookkeeping for a match to `target` points.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    target: u32,
    /// Points per player, indexed by [`Player::index`].
    scores: [u32; 2],
    crawford_enabled: bool,
    /// The next (or current) game is the Crawford game.
    crawford_game: bool,
    /// The Crawford game has already been played.
    post_crawford: bool,
    games_played: u32,
    winner: Option<Player>,
}

impl MatchState {
    /// Creates a match to `target` points with the Crawford rule in force.
    pub fn new(target: u32) -> Self {
        Self {
            target,
            scores: [0; 2],
            crawford_enabled: true,
            crawford_game: false,
            post_crawford: false,
            games_played: 0,
            winner: None,
        }
    }

    pub fn with_crawford_rule(mut self, enabled: bool) -> Self {
        self.crawford_enabled = enabled;
        self
    }

    /// Starts the match from a given score, as `(white, black)`.
    ///
    /// A score where a player is one away from the target is treated as
    /// the start of the Crawford game unless the trailer is also one away.
    pub fn with_scores(mut self, white: u32, black: u32) -> Self {
        self.scores = [white, black];
        self.winner = Player::ALL
            .into_iter()
            .find(|&p| self.scores[p.index()] >= self.target);
        let away = |p: Player| self.target.saturating_sub(self.scores[p.index()]);
        let white_away = away(Player::White);
        let black_away = away(Player::Black);
        self.crawford_game = self.crawford_enabled
            && self.winner.is_none()
            && (white_away == 1) != (black_away == 1);
        self.post_crawford = self.crawford_enabled && white_away == 1 && black_away == 1;
        self
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn score(&self, player: Player) -> u32 {
        self.scores[player.index()]
    }

    /// Scores as `(white, black)`.
    pub fn scores(&self) -> (u32, u32) {
        (self.scores[0], self.scores[1])
    }

    /// Points `player` still needs.
    pub fn away(&self, player: Player) -> u32 {
        self.target.saturating_sub(self.score(player))
    }

    /// Returns `true` if the next game is the Crawford game.
    pub fn is_crawford(&self) -> bool {
        self.crawford_game
    }

    pub fn is_post_crawford(&self) -> bool {
        self.post_crawford
    }

    pub fn crawford_enabled(&self) -> bool {
        self.crawford_enabled
    }

    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Creates the next game of the match, flagged as Crawford if needed.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::MatchOver`] once a player has reached the target.
    pub fn new_game(&self, options: GameOptions) -> Result<GameState, GameError> {
        if self.is_over() {
            return Err(GameError::MatchOver);
        }
        Ok(GameState::new(options).with_crawford(self.crawford_game))
    }

    /// Adds a finished game's points to the score.
    ///
    /// Returns the match winner if this game decided the match.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::MatchOver`] if the match was already decided.
    pub fn record(&mut self, outcome: &GameOutcome) -> Result<Option<Player>, GameError> {
        if self.is_over() {
            return Err(GameError::MatchOver);
        }
        let winner = outcome.winner;
        self.scores[winner.index()] += outcome.points;
        self.games_played += 1;

        if self.crawford_game {
            self.crawford_game = false;
            self.post_crawford = true;
        }

        if self.scores[winner.index()] >= self.target {
            self.winner = Some(winner);
            info!(%winner, white = self.scores[0], black = self.scores[1], "match won");
        } else if self.crawford_enabled
            && !self.post_crawford
            && self.scores[winner.index()] + 1 == self.target
        {
            self.crawford_game = true;
        }

        info!(
            %winner,
            points = outcome.points,
            white = self.scores[0],
            black = self.scores[1],
            crawford = self.crawford_game,
            "game recorded"
        );
        Ok(self.winner)
    }
}
