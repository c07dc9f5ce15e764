//! AI player: play selection and cube decisions.
//!
//! Candidate plays are ranked by the heuristic evaluator. Stronger levels
//! rerank their best few candidates with a one-ply lookahead, averaging the
//! position reached after the opponent's greedy reply to each of the 21
//! distinct rolls. The difficulty then decides how often the top play is
//! actually chosen.

use std::cmp::Ordering;
use std::time::Duration;

use rand::Rng;
use tracing::debug;

use crate::constants::CHECKERS_PER_PLAYER;
use crate::dice;
use crate::eval::{self, WIN_SCORE};
use crate::game_state::{GamePhase, GameState};
use crate::level::{AiSettings, Level, Weights, get_level, get_weights};
use crate::match_state::MatchState;
use crate::move_list::{Play, PlayList};
use crate::player::Player;
use crate::position::Position;

/// A play together with its score for the moving player.
#[derive(Clone, Copy, Debug)]
pub struct RankedPlay<'a> {
    pub play: &'a Play,
    pub score: f32,
}

/// Heuristic AI player.
#[derive(Clone, Debug)]
pub struct Ai {
    settings: AiSettings,
    level: Level,
    weights: Weights,
}

impl Default for Ai {
    fn default() -> Self {
        Self::new(AiSettings::default())
    }
}

impl Ai {
    pub fn new(settings: AiSettings) -> Self {
        Self {
            settings,
            level: get_level(settings.difficulty),
            weights: get_weights(settings.personality),
        }
    }

    pub fn settings(&self) -> &AiSettings {
        &self.settings
    }

    /// Picks a cosmetic delay for the caller to wait on.
    pub fn thinking_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        self.settings.thinking_delay(rng)
    }

    /// Scores plays, best first.
    ///
    /// `position` is the position before the roll; when it is already a
    /// pure race every candidate is judged as a race.
    ///
    /// Levels with lookahead rescore their candidate pool on a different
    /// scale, so only that pool is returned and all scores stay comparable.
    /// Other levels return every play.
    pub fn rank_plays<'a>(
        &self,
        position: &Position,
        player: Player,
        plays: &'a PlayList,
    ) -> Vec<RankedPlay<'a>> {
        let race = !position.has_contact();
        let mut ranked: Vec<RankedPlay<'a>> = plays
            .iter()
            .map(|play| RankedPlay {
                play,
                score: eval::evaluate(&play.result, player, &self.weights, race),
            })
            .collect();
        sort_ranked(&mut ranked);

        if self.level.lookahead && ranked.len() > 1 {
            let pool = self.level.candidate_pool.min(ranked.len());
            for candidate in &mut ranked[..pool] {
                candidate.score = self.lookahead(&candidate.play.result, player, race);
            }
            ranked.truncate(pool);
            sort_ranked(&mut ranked);
        }
        ranked
    }

    /// Chooses a play from `plays`, or `None` if there is nothing to play.
    ///
    /// The top-ranked play is chosen with the level's optimal-play
    /// probability; otherwise a random play from the rest of the candidate
    /// pool is taken.
    pub fn select_play<'a, R: Rng + ?Sized>(
        &self,
        position: &Position,
        player: Player,
        plays: &'a PlayList,
        rng: &mut R,
    ) -> Option<&'a Play> {
        let ranked = self.rank_plays(position, player, plays);
        let best = ranked.first()?;
        if ranked.len() == 1 || rng.random_bool(self.level.optimal_probability) {
            debug!(%player, play = %best.play, score = best.score, "selected best play");
            return Some(best.play);
        }

        let pool = self.level.candidate_pool.min(ranked.len()).max(2);
        let choice = &ranked[rng.random_range(1..pool)];
        debug!(%player, play = %choice.play, score = choice.score, "selected lesser play");
        Some(choice.play)
    }

    /// Returns the top-ranked play without any randomness.
    pub fn best_play<'a>(
        &self,
        position: &Position,
        player: Player,
        plays: &'a PlayList,
    ) -> Option<&'a Play> {
        self.rank_plays(position, player, plays)
            .first()
            .map(|ranked| ranked.play)
    }

    /// Decides whether the player to move should offer a double now.
    pub fn should_double(&self, game: &GameState, match_state: Option<&MatchState>) -> bool {
        let player = game.turn();
        if game.phase() != GamePhase::Rolling
            || game.is_crawford()
            || game.cube().can_double(player).is_err()
        {
            return false;
        }
        // A cube that already wins the match on a single game is dead.
        if let Some(state) = match_state
            && state.away(player) <= game.cube().value()
        {
            return false;
        }

        let p = eval::win_probability(game.position(), player);
        let double = p >= self.weights.double_threshold;
        debug!(%player, p, double, "double decision");
        double
    }

    /// Decides whether to accept the pending double.
    ///
    /// Returns `false` when no double is pending.
    pub fn should_accept(&self, game: &GameState, match_state: Option<&MatchState>) -> bool {
        let Some(pending) = game.cube().pending() else {
            return false;
        };
        let offerer = pending.offered_by;
        let responder = offerer.opposite();

        // Passing would lose the match anyway.
        if let Some(state) = match_state
            && state.away(offerer) <= game.cube().value()
        {
            return true;
        }

        let p = 1.0 - eval::win_probability(game.position(), offerer);
        let take = p >= self.weights.take_threshold;
        debug!(player = %responder, p, take, "take decision");
        take
    }

    fn lookahead(&self, result: &Position, player: Player, race: bool) -> f32 {
        if result.off(player) == CHECKERS_PER_PLAYER {
            return WIN_SCORE;
        }
        let opponent = player.opposite();
        let mut total = 0.0;
        let mut weight_sum = 0.0;
        for (roll, weight) in dice::all_rolls() {
            let replies = PlayList::new(result, opponent, roll.remaining());
            let reply = replies
                .iter()
                .map(|play| {
                    let score = eval::evaluate(&play.result, opponent, &self.weights, race);
                    (score, &play.result)
                })
                .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal))
                .map_or(result, |(_, pos)| pos);

            total += weight as f32 * eval::evaluate(reply, player, &self.weights, race);
            weight_sum += weight as f32;
        }
        total / weight_sum
    }
}

fn sort_ranked(ranked: &mut [RankedPlay<'_>]) {
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
}
