//! Terminal output while a run is in progress.

use backgammon_core::player::Player;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::statistics::{MatchHistory, MatchStatistics, MatchWinner};

const BAR_TEMPLATE: &str = "{spinner:.cyan} [{bar:40.cyan}] {pos}/{len} ({percent}%) {msg}";

pub struct DisplayManager {
    player1_name: String,
    player2_name: String,
}

impl DisplayManager {
    pub fn new(player1_name: &str, player2_name: &str) -> Self {
        Self {
            player1_name: player1_name.to_string(),
            player2_name: player2_name.to_string(),
        }
    }

    pub fn show_header(&self, matches: u32, target: u32) {
        println!(
            "  {} vs {}: {matches} matches to {target}",
            self.player1_name.bright_cyan().bold(),
            self.player2_name.bright_cyan().bold()
        );
        println!("  {}", "─".repeat(60).bright_black());
    }

    /// Creates a styled progress bar for the run.
    pub fn create_progress_bar(&self, total_matches: u64) -> ProgressBar {
        let style = ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏ ");
        let progress_bar = ProgressBar::new(total_matches);
        progress_bar.set_style(style);
        progress_bar
    }

    /// Prints one finished match above the bar and refreshes the tally.
    pub fn report_match(
        &self,
        progress_bar: &ProgressBar,
        number: u32,
        history: &MatchHistory,
        statistics: &MatchStatistics,
    ) {
        progress_bar.println(self.format_match(number, history));
        progress_bar.set_message(self.format_tally(statistics));
        progress_bar.inc(1);
    }

    fn format_match(&self, number: u32, history: &MatchHistory) -> String {
        let symbol = match history.winner {
            MatchWinner::Player1 => "W".bright_green().bold(),
            MatchWinner::Player2 => "L".bright_red().bold(),
        };
        let side = match history.player1_side {
            Player::White => "O",
            Player::Black => "X",
        };
        format!(
            "  {:>5}: {symbol} {}-{} in {} games ({side} {})",
            number.to_string().bright_black(),
            history.player1_points,
            history.player2_points,
            history.games,
            self.player1_name
        )
    }

    fn format_tally(&self, statistics: &MatchStatistics) -> String {
        format!(
            "{} {} : {} {}",
            self.player1_name,
            statistics.player1_wins.to_string().bright_green(),
            statistics.player2_wins.to_string().bright_red(),
            self.player2_name
        )
    }
}
