//! Colored terminal rendering of the board, plays and results.

use backgammon_core::game_state::{GamePhase, GameState};
use backgammon_core::match_state::MatchState;
use backgammon_core::move_list::{Move, PlayList};
use backgammon_core::player::Player;
use backgammon_core::scoring::{EndReason, GameOutcome, WinKind};
use colored::{ColoredString, Colorize};

pub fn paint(player: Player, text: &str) -> ColoredString {
    match player {
        Player::White => text.bright_yellow(),
        Player::Black => text.bright_green(),
    }
}

fn cell(game: &GameState, idx: usize) -> ColoredString {
    let pos = game.position();
    match pos.owner(idx) {
        Some(p) => paint(p, &format!("{}{:<2}", p.to_char(), pos.count(idx, p))),
        None => " · ".bright_black(),
    }
}

fn print_labels(indices: impl Iterator<Item = usize>, bar_after: usize) {
    print!("    ");
    for idx in indices {
        print!("{:<4}", idx + 1);
        if idx == bar_after {
            print!("│ ");
        }
    }
    println!();
}

fn print_row(game: &GameState, indices: impl Iterator<Item = usize>, bar_after: usize) {
    print!("    ");
    for idx in indices {
        print!("{} ", cell(game, idx));
        if idx == bar_after {
            print!("│ ");
        }
    }
}

/// Prints the board from White's side with the match status alongside.
pub fn print_board(game: &GameState, state: &MatchState) {
    let pos = game.position();
    let turn = game.turn();
    let (white_pips, black_pips) = game.pip_counts();

    print_labels(12..24, 17);
    print_row(game, 12..24, 17);
    println!(
        "  score {} - {} (to {})",
        paint(Player::White, &state.score(Player::White).to_string()),
        paint(Player::Black, &state.score(Player::Black).to_string()),
        state.target()
    );
    println!(
        "    bar: {} {}    off: {} {}",
        paint(Player::White, &format!("O{}", pos.bar(Player::White))),
        paint(Player::Black, &format!("X{}", pos.bar(Player::Black))),
        paint(Player::White, &format!("O{}", pos.off(Player::White))),
        paint(Player::Black, &format!("X{}", pos.off(Player::Black))),
    );
    print_row(game, (0..12).rev(), 6);
    println!(
        "  pips: {} {}",
        paint(Player::White, &white_pips.to_string()),
        paint(Player::Black, &black_pips.to_string()),
    );
    print_labels((0..12).rev(), 6);

    let cube = game.cube();
    let owner = cube.owner().map_or("centered".to_string(), |p| p.to_string());
    let mut status = format!("    cube: {} ({owner})", cube.value());
    if game.is_crawford() {
        status.push_str("  [Crawford]");
    }
    println!("{}", status.bright_cyan());

    match game.phase() {
        GamePhase::Finished => println!("    {}", "*** Game Over ***".bright_red()),
        GamePhase::Setup => println!("    waiting for the opening roll"),
        phase => {
            let dice = game
                .dice()
                .map_or("-".to_string(), |d| format!("{d} (left {:?})", d.remaining()));
            println!(
                "    {} to play, dice {dice}, {phase:?}",
                paint(turn, &format!("{turn} ({})", turn.to_char()))
            );
        }
    }
    if let Some(pending) = cube.pending() {
        println!(
            "    {} offers to double the cube to {}",
            paint(pending.offered_by, &pending.offered_by.to_string()),
            pending.value
        );
    }
}

pub fn print_moves(moves: &[Move]) {
    if moves.is_empty() {
        println!("No legal moves.");
        return;
    }
    for (i, mv) in moves.iter().enumerate() {
        println!("{:>3}. {mv}", i + 1);
    }
}

pub fn print_plays(plays: &PlayList) {
    if plays.is_empty() {
        println!("No legal plays.");
        return;
    }
    for (i, play) in plays.iter().enumerate() {
        println!("{:>3}. {play}", i + 1);
    }
}

fn kind_name(kind: WinKind) -> &'static str {
    match kind {
        WinKind::Single => "single game",
        WinKind::Gammon => "gammon",
        WinKind::Backgammon => "backgammon",
    }
}

pub fn print_outcome(outcome: &GameOutcome) {
    let how = match outcome.reason {
        EndReason::BearOff => "bearing off",
        EndReason::Resignation => "resignation",
        EndReason::DoubleDeclined => "declined double",
    };
    let text = format!(
        "{} wins a {} by {how}: {} point(s)",
        outcome.winner,
        kind_name(outcome.kind),
        outcome.points
    );
    println!("{}", paint(outcome.winner, &text).bold());
}

pub fn print_match_winner(winner: Player, state: &MatchState) {
    let (white, black) = state.scores();
    let text = format!("{winner} wins the match {white}-{black}!");
    println!("{}", paint(winner, &text).bold());
}
