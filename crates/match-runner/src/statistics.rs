use std::cmp::Ordering;

use backgammon_core::player::Player;
use colored::*;

use crate::game::MatchRecord;

const ELO_K: f64 = 400.0;
const RECENT_MATCHES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchWinner {
    Player1,
    Player2,
}

/// One finished match from player 1's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchHistory {
    pub winner: MatchWinner,
    pub player1_points: u32,
    pub player2_points: u32,
    pub games: u32,
    pub player1_side: Player,
}

#[derive(Debug, Clone, Default)]
pub struct MatchStatistics {
    pub player1_wins: u32,
    pub player2_wins: u32,
    pub player1_points: u32,
    pub player2_points: u32,
    pub games_played: u32,
    pub gammons: [u32; 2],
    pub backgammons: [u32; 2],
    pub declined_doubles: u32,
    pub highest_cube: u32,
    pub recent_results: Vec<MatchHistory>,
}

impl MatchStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a match played with player 1 on `player1_side`.
    pub fn add_result(&mut self, record: &MatchRecord, player1_side: Player) -> Option<&MatchHistory> {
        let winner_side = record.winner?;
        let p1 = player1_side.index();
        let p2 = player1_side.opposite().index();

        let winner = if winner_side == player1_side {
            self.player1_wins += 1;
            MatchWinner::Player1
        } else {
            self.player2_wins += 1;
            MatchWinner::Player2
        };
        self.player1_points += record.scores[p1];
        self.player2_points += record.scores[p2];
        self.games_played += record.games;
        self.gammons[0] += record.gammons[p1];
        self.gammons[1] += record.gammons[p2];
        self.backgammons[0] += record.backgammons[p1];
        self.backgammons[1] += record.backgammons[p2];
        self.declined_doubles += record.declined_doubles;
        self.highest_cube = self.highest_cube.max(record.highest_cube);

        self.recent_results.push(MatchHistory {
            winner,
            player1_points: record.scores[p1],
            player2_points: record.scores[p2],
            games: record.games,
            player1_side,
        });
        if self.recent_results.len() > RECENT_MATCHES {
            self.recent_results.remove(0);
        }
        self.recent_results.last()
    }

    pub fn total_matches(&self) -> u32 {
        self.player1_wins + self.player2_wins
    }

    pub fn player1_win_rate(&self) -> f64 {
        match self.total_matches() {
            0 => 0.0,
            n => self.player1_wins as f64 / n as f64 * 100.0,
        }
    }

    pub fn player2_win_rate(&self) -> f64 {
        match self.total_matches() {
            0 => 0.0,
            n => self.player2_wins as f64 / n as f64 * 100.0,
        }
    }

    /// Point difference in player 1's favor.
    pub fn point_diff(&self) -> i64 {
        self.player1_points as i64 - self.player2_points as i64
    }

    pub fn print_final_results(&self, player1_name: &str, player2_name: &str) {
        let total = self.total_matches();
        if total == 0 {
            println!("No matches were played.");
            return;
        }

        println!("{}", "═".repeat(80).bright_cyan());
        println!("{:^80}", "MATCH RESULTS".bright_white().bold());
        println!("{}", "═".repeat(80).bright_cyan());
        println!();

        println!(
            "{} {} matches, {} games",
            "Played:".bright_white(),
            total.to_string().bright_yellow().bold(),
            self.games_played.to_string().bright_yellow()
        );
        println!();

        self.print_visual_results(player1_name, player2_name);
        println!();
        self.print_detailed_stats(player1_name, player2_name);
        println!();
        self.print_elo_rating(player1_name, player2_name);

        println!("{}", "═".repeat(80).bright_cyan());
    }

    fn print_visual_results(&self, player1_name: &str, player2_name: &str) {
        let total = self.total_matches() as f64;
        let bar_width = 60;
        let name_width = player1_name.len().max(player2_name.len()).max(12);

        println!("{}", "Match Win Rate".bright_white().underline());
        println!();
        for (name, wins, rate, color) in [
            (player1_name, self.player1_wins, self.player1_win_rate(), Color::BrightGreen),
            (player2_name, self.player2_wins, self.player2_win_rate(), Color::BrightRed),
        ] {
            let len = (wins as f64 / total * bar_width as f64) as usize;
            println!(
                "{:>width$} {}{} {rate:.1}%",
                name.bright_cyan().bold(),
                "█".repeat(len).color(color),
                "░".repeat(bar_width - len).bright_black(),
                width = name_width
            );
        }
    }

    fn print_detailed_stats(&self, player1_name: &str, player2_name: &str) {
        println!("{}", "Detailed Statistics".bright_white().underline());
        println!();

        let w = player1_name.len().max(player2_name.len()).max(6);
        let rule = |l: &str, m: &str, r: &str| {
            format!(
                "{l}─{:─<w$}─{m}─{:─^6}─{m}─{:─^6}─{m}─{:─^8}─{m}─{:─^8}─{m}─{:─^8}─{r}",
                "", "", "", "", "", ""
            )
            .bright_black()
        };

        println!("{}", rule("┌", "┬", "┐"));
        println!(
            "│ {:^w$} │ {:^6} │ {:^6} │ {:^8} │ {:^8} │ {:^8} │",
            "Player", "Wins", "Losses", "Points", "Gammons", "BGs"
        );
        println!("{}", rule("├", "┼", "┤"));
        let diff = self.point_diff();
        for (idx, name, wins, losses, points) in [
            (0, player1_name, self.player1_wins, self.player2_wins, self.player1_points),
            (1, player2_name, self.player2_wins, self.player1_wins, self.player2_points),
        ] {
            let signed = if idx == 0 { diff } else { -diff };
            let points = match signed.cmp(&0) {
                Ordering::Greater => points.to_string().bright_green(),
                Ordering::Less => points.to_string().bright_red(),
                Ordering::Equal => points.to_string().bright_yellow(),
            };
            println!(
                "│ {:w$} │ {:^6} │ {:^6} │ {:^8} │ {:^8} │ {:^8} │",
                name.bright_cyan().bold(),
                wins.to_string().bright_green(),
                losses.to_string().bright_red(),
                points,
                self.gammons[idx],
                self.backgammons[idx],
            );
        }
        println!("{}", rule("└", "┴", "┘"));
        println!(
            "{} {}   {} {}",
            "Declined doubles:".bright_white(),
            self.declined_doubles,
            "Highest cube:".bright_white(),
            self.highest_cube
        );
    }

    fn print_elo_rating(&self, player1_name: &str, player2_name: &str) {
        let stats = EloCalculator::calculate_stats(self.player1_wins, self.player2_wins);

        println!("{}", "ELO Rating".bright_white().underline());
        println!();

        if stats.elo_diff.is_infinite() {
            let text = if stats.elo_diff > 0.0 { "∞".bright_green() } else { "-∞".bright_red() };
            println!("{:>20}: {} {}", "ELO Difference".bright_white(), text.bold(), "(clean sweep)".bright_black());
            return;
        }

        let elo = format!("{:+.2}", stats.elo_diff);
        let elo = match stats.elo_diff.partial_cmp(&0.0) {
            Some(Ordering::Greater) => elo.bright_green(),
            Some(Ordering::Less) => elo.bright_red(),
            _ => elo.bright_yellow(),
        };
        println!(
            "{:>20}: {} {}",
            "ELO Difference".bright_white(),
            elo.bold(),
            format!("± {:.2} (95%)", stats.confidence_interval).bright_black()
        );

        let verdict = match stats.elo_diff.abs() {
            d if d > 100.0 => "is significantly stronger",
            d if d > 50.0 => "has a clear advantage",
            d if d > 20.0 => "has a slight edge",
            _ => "",
        };
        let leader = if stats.elo_diff > 0.0 { player1_name } else { player2_name };
        let text = if verdict.is_empty() {
            "Players are evenly matched".to_string()
        } else {
            format!("{leader} {verdict}")
        };
        println!("{:>20}: {}", "Performance".bright_white(), text.bright_blue());
    }
}

pub struct EloStats {
    pub elo_diff: f64,
    pub confidence_interval: f64,
}

pub struct EloCalculator;

impl EloCalculator {
    /// Elo difference and its 95% interval from a win/loss record.
    pub fn calculate_stats(wins: u32, losses: u32) -> EloStats {
        let n = (wins + losses) as f64;
        if n == 0.0 {
            return EloStats {
                elo_diff: 0.0,
                confidence_interval: 0.0,
            };
        }

        let p = wins as f64 / n;
        if p == 0.0 || p == 1.0 {
            return EloStats {
                elo_diff: if p > 0.5 { f64::INFINITY } else { f64::NEG_INFINITY },
                confidence_interval: f64::INFINITY,
            };
        }

        let elo_diff = ELO_K * (p / (1.0 - p)).log10();
        let se = (ELO_K / std::f64::consts::LN_10) / (n * p * (1.0 - p)).sqrt();
        EloStats {
            elo_diff,
            confidence_interval: 1.96 * se,
        }
    }
}
