//! Runs a batch of matches and aggregates the results.

use backgammon_core::ai::Ai;
use backgammon_core::player::Player;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use crate::config::Config;
use crate::display::DisplayManager;
use crate::error::Result;
use crate::game::{self, Players};
use crate::statistics::MatchStatistics;

pub struct MatchRunner {
    display: DisplayManager,
}

impl MatchRunner {
    pub fn new(config: &Config) -> Self {
        Self {
            display: DisplayManager::new(&config.player1_name(), &config.player2_name()),
        }
    }

    /// Plays `config.matches` matches, alternating colors, and prints the
    /// final results.
    pub fn run_match(&mut self, config: &Config) -> Result<MatchStatistics> {
        let match_config = config.match_config()?;
        let player1 = Ai::new(config.player1());
        let player2 = Ai::new(config.player2());
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        let mut statistics = MatchStatistics::new();
        self.display
            .show_header(config.matches, match_config.target_points);
        let progress_bar = self.display.create_progress_bar(config.matches as u64);

        for number in 1..=config.matches {
            // Player 1 takes White in odd-numbered matches.
            let player1_side = if number % 2 == 1 {
                Player::White
            } else {
                Player::Black
            };
            let players = match player1_side {
                Player::White => Players {
                    white: &player1,
                    black: &player2,
                },
                Player::Black => Players {
                    white: &player2,
                    black: &player1,
                },
            };

            let record = match game::play_match(&match_config, &players, &mut rng) {
                Ok(record) => record,
                Err(err) => {
                    progress_bar.finish_and_clear();
                    return Err(err);
                }
            };
            info!(number, winner = ?record.winner, scores = ?record.scores, "match done");
            if let Some(history) = statistics.add_result(&record, player1_side).cloned() {
                self.display
                    .report_match(&progress_bar, number, &history, &statistics);
            }
        }

        progress_bar.finish_and_clear();
        statistics.print_final_results(&config.player1_name(), &config.player2_name());
        Ok(statistics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_run_alternates_sides() {
        let config = Config::try_parse_from([
            "match-runner",
            "--matches",
            "4",
            "--target",
            "1",
            "--player1-difficulty",
            "easy",
            "--player2-difficulty",
            "beginner",
            "--seed",
            "42",
        ])
        .unwrap();
        let mut runner = MatchRunner::new(&config);
        let statistics = runner.run_match(&config).unwrap();

        assert_eq!(statistics.total_matches(), 4);
        let sides: Vec<Player> = statistics
            .recent_results
            .iter()
            .map(|h| h.player1_side)
            .collect();
        assert_eq!(
            sides,
            [Player::White, Player::Black, Player::White, Player::Black]
        );
    }
}
