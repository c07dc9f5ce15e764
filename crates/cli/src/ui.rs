//! Line-oriented REPL for playing a match in the terminal.
//!
//! Human turns are driven by commands; AI turns, the opening roll and the
//! bookkeeping between games run automatically.

use std::path::Path;
use std::thread;

use backgammon_core::ai::Ai;
use backgammon_core::error::GameError;
use backgammon_core::game_state::GamePhase;
use backgammon_core::move_list::Move;
use backgammon_core::player::Player;
use backgammon_core::session::Session;
use colored::Colorize;
use rand::rngs::StdRng;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::game;
use crate::mode::GameMode;
use crate::parse;

const HELP: &str = "\
Commands:
  roll (r)                 roll the dice
  moves (m)                list legal single moves
  move <n|from/to> (mv)    play one checker, by number or notation (13/8, bar/22, 4/off)
  plays (p)                list legal full plays
  play <n>                 play a whole turn by number
  undo (u)                 take back the last move of this turn
  done (d)                 end the turn once the roll is played
  double                   offer a double before rolling
  accept / decline         answer a double
  resign [single|gammon|backgammon]
  hint (h)                 show the AI's preferred play
  board (b)                redraw the board
  save <file>              write the session as JSON
  new (n)                  start a new match
  help (?)                 show this text
  quit (q)                 leave";

enum Flow {
    Continue,
    Quit,
}

pub struct Repl {
    session: Session,
    mode: GameMode,
    ai: Ai,
    rng: StdRng,
    /// Set when the finished game could not be recorded; automatic steps
    /// stay off until a new match starts.
    halted: bool,
}

impl Repl {
    pub fn new(session: Session, mode: GameMode, ai: Ai, rng: StdRng) -> Self {
        Self {
            session,
            mode,
            ai,
            rng,
            halted: false,
        }
    }

    /// Runs until the user quits or input ends.
    pub fn run(mut self) -> Result<(), ReadlineError> {
        let mut rl = DefaultEditor::new()?;
        let settings = self.ai.settings();
        println!(
            "{}: AI is {} / {}. Type 'help' for commands.\n",
            self.mode.as_str(),
            settings.difficulty,
            settings.personality
        );
        self.print_board();

        loop {
            if self.advance() {
                continue;
            }

            let prompt = format!("{}> ", self.actor());
            match rl.readline(&prompt) {
                Ok(line) => {
                    let _ = rl.add_history_entry(&line);
                    let mut parts = line.split_whitespace();
                    let Some(cmd) = parts.next() else {
                        continue;
                    };
                    println!();
                    match self.command(cmd, parts.next()) {
                        Ok(Flow::Continue) => {}
                        Ok(Flow::Quit) => break,
                        Err(msg) => eprintln!("{}\n", msg.bright_red()),
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    /// The player who must act next: the responder while a double is
    /// pending, otherwise the player to move.
    fn actor(&self) -> Player {
        let game = self.session.game();
        match game.cube().pending() {
            Some(pending) => pending.offered_by.opposite(),
            None => game.turn(),
        }
    }

    fn print_board(&self) {
        game::print_board(self.session.game(), self.session.match_state());
        println!();
    }

    /// Performs one automatic step. Returns `false` when a human must act.
    fn advance(&mut self) -> bool {
        if self.halted || self.session.match_state().is_over() {
            return false;
        }
        if self.session.game().is_finished() {
            return self.record_game();
        }
        if self.session.game().phase() == GamePhase::Setup {
            return match self.session.game_mut().opening_roll(&mut self.rng) {
                Ok(dice) => {
                    let (white, black) = dice.values();
                    println!(
                        "Opening roll: White {white}, Black {black}. {} moves first.\n",
                        self.session.game().turn()
                    );
                    self.print_board();
                    true
                }
                Err(err) => {
                    eprintln!("{}", err.to_string().bright_red());
                    false
                }
            };
        }
        if !self.mode.is_ai(self.actor()) {
            return false;
        }
        match self.ai_step() {
            Ok(()) => true,
            Err(err) => {
                eprintln!("AI error: {}", err.to_string().bright_red());
                false
            }
        }
    }

    fn record_game(&mut self) -> bool {
        if let Some(outcome) = self.session.game().outcome() {
            game::print_outcome(outcome);
        }
        match self.session.finish_game() {
            Ok(Some(winner)) => {
                game::print_match_winner(winner, self.session.match_state());
                println!("Type 'new' for another match or 'quit' to leave.\n");
                true
            }
            Ok(None) => {
                let state = self.session.match_state();
                println!("\nGame {} begins.", state.games_played() + 1);
                true
            }
            Err(err) => {
                eprintln!("{}", err.to_string().bright_red());
                println!("This match cannot continue. Type 'new' to start another or 'quit' to leave.\n");
                self.halted = true;
                false
            }
        }
    }

    fn ai_step(&mut self) -> Result<(), GameError> {
        let game = self.session.game();
        let state = self.session.match_state();

        if let Some(pending) = game.cube().pending() {
            let responder = pending.offered_by.opposite();
            if self.ai.should_accept(game, Some(state)) {
                let value = self.session.game_mut().accept_double()?;
                println!("{responder} takes. The cube is now at {value}.\n");
            } else {
                self.session.game_mut().decline_double()?;
                println!("{responder} passes.\n");
            }
            return Ok(());
        }

        let player = game.turn();
        match game.phase() {
            GamePhase::Rolling => {
                if self.ai.should_double(game, Some(state)) {
                    self.session.game_mut().offer_double()?;
                    println!("{player} doubles.\n");
                    return Ok(());
                }
                let dice = self.session.game_mut().roll(&mut self.rng)?;
                println!("{player} rolls {dice}.");
            }
            GamePhase::NoMoves => {
                println!("{player} cannot move.\n");
                self.session.game_mut().switch_turn()?;
            }
            GamePhase::Moving | GamePhase::ForcedMove => {
                thread::sleep(self.ai.thinking_delay(&mut self.rng));
                let plays = game.legal_plays();
                let chosen = self
                    .ai
                    .select_play(game.position(), player, &plays, &mut self.rng)
                    .cloned();
                match chosen {
                    Some(play) => {
                        debug!(%player, %play, "ai play");
                        self.session.game_mut().apply_play(&play.moves)?;
                        println!("{player} plays {play}.\n");
                    }
                    None => println!("{player} has nothing left to play.\n"),
                }
                self.end_turn()?;
                self.print_board();
            }
            GamePhase::Setup | GamePhase::Finished => {}
        }
        Ok(())
    }

    fn end_turn(&mut self) -> Result<(), GameError> {
        let game = self.session.game_mut();
        if !game.is_finished() && game.is_turn_complete() {
            game.switch_turn()?;
        }
        Ok(())
    }

    /// Resolves a move given by list number or notation.
    fn find_move(&self, arg: &str) -> Result<Move, String> {
        let moves = self.session.game().legal_moves();
        if let Ok(n) = arg.parse::<usize>() {
            return n
                .checked_sub(1)
                .and_then(|i| moves.get(i).copied())
                .ok_or_else(|| format!("No move number {n}; see 'moves'"));
        }
        let (from, to) = parse::parse_move(arg)?;
        moves
            .into_iter()
            .filter(|m| m.from_pip() == from && m.to_pip() == to)
            .min_by_key(|m| m.die)
            .ok_or_else(|| format!("Illegal move: {arg}"))
    }

    fn after_human_move(&self) {
        let game = self.session.game();
        self.print_board();
        if !game.is_finished() && game.is_turn_complete() {
            println!("Roll played. Type 'done' to end the turn or 'undo' to take back.\n");
        }
    }

    fn command(&mut self, cmd: &str, arg: Option<&str>) -> Result<Flow, String> {
        let actor = self.actor();
        match cmd {
            "roll" | "r" => {
                let dice = self
                    .session
                    .game_mut()
                    .roll(&mut self.rng)
                    .map_err(|e| e.to_string())?;
                println!("{actor} rolls {dice}.\n");
                self.print_board();
                match self.session.game().phase() {
                    GamePhase::NoMoves => println!("No legal moves. Type 'done' to pass.\n"),
                    GamePhase::ForcedMove => println!("Only one play is possible.\n"),
                    _ => {}
                }
            }
            "moves" | "m" => game::print_moves(&self.session.game().legal_moves()),
            "move" | "mv" => {
                let arg = arg.ok_or("Usage: move <n|from/to>")?;
                let mv = self.find_move(arg)?;
                self.session
                    .game_mut()
                    .apply_move(mv)
                    .map_err(|e| e.to_string())?;
                self.after_human_move();
            }
            "plays" | "p" => game::print_plays(&self.session.game().legal_plays()),
            "play" => {
                let n = arg
                    .and_then(|s| s.parse::<usize>().ok())
                    .ok_or("Usage: play <n>")?;
                let plays = self.session.game().legal_plays();
                let play = n
                    .checked_sub(1)
                    .and_then(|i| plays.get(i))
                    .cloned()
                    .ok_or_else(|| format!("No play number {n}; see 'plays'"))?;
                self.session
                    .game_mut()
                    .apply_play(&play.moves)
                    .map_err(|e| e.to_string())?;
                self.after_human_move();
            }
            "undo" | "u" => {
                if self.session.game_mut().undo_move() {
                    self.print_board();
                } else {
                    return Err("Cannot undo.".to_string());
                }
            }
            "done" | "d" => {
                self.session
                    .game_mut()
                    .switch_turn()
                    .map_err(|e| e.to_string())?;
                self.print_board();
            }
            "double" => {
                self.session
                    .game_mut()
                    .offer_double()
                    .map_err(|e| e.to_string())?;
                println!("{actor} doubles.\n");
            }
            "accept" | "take" => {
                let value = self
                    .session
                    .game_mut()
                    .accept_double()
                    .map_err(|e| e.to_string())?;
                println!("{actor} takes. The cube is now at {value}.\n");
            }
            "decline" | "pass" => {
                self.session
                    .game_mut()
                    .decline_double()
                    .map_err(|e| e.to_string())?;
                println!("{actor} passes.\n");
            }
            "resign" => {
                let kind = parse::parse_win_kind(arg)?;
                self.session
                    .game_mut()
                    .resign(actor, kind)
                    .map_err(|e| e.to_string())?;
            }
            "hint" | "h" => {
                let game = self.session.game();
                let plays = game.legal_plays();
                match self.ai.best_play(game.position(), game.turn(), &plays) {
                    Some(play) => println!("Suggested play: {play}\n"),
                    None => println!("Nothing to suggest.\n"),
                }
            }
            "board" | "b" => self.print_board(),
            "save" => {
                let path = arg.ok_or("Usage: save <file>")?;
                self.session
                    .save(Path::new(path))
                    .map_err(|e| e.to_string())?;
                println!("Saved to {path}.\n");
            }
            "new" | "n" => {
                self.session = Session::new(self.session.config().clone()).map_err(|e| e.to_string())?;
                self.halted = false;
                println!("New match to {}.\n", self.session.match_state().target());
            }
            "help" | "?" => println!("{HELP}\n"),
            "quit" | "q" => return Ok(Flow::Quit),
            _ if parse::parse_move(cmd).is_ok() => return self.command("move", Some(cmd)),
            _ => return Err(format!("Unknown command: {cmd}. Type 'help'.")),
        }
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backgammon_core::config::MatchConfig;
    use backgammon_core::level::AiSettings;
    use rand::SeedableRng;

    fn repl() -> Repl {
        let session = Session::new(MatchConfig::default()).unwrap();
        let ai = Ai::new(AiSettings::default());
        Repl::new(session, GameMode::HumanVsHuman, ai, StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_halted_repl_waits_for_new_match() {
        let mut repl = repl();
        repl.halted = true;
        assert!(!repl.advance());
        assert_eq!(repl.session.game().phase(), GamePhase::Setup);

        assert!(matches!(repl.command("new", None), Ok(Flow::Continue)));
        assert!(!repl.halted);
        assert!(repl.advance());
        assert_ne!(repl.session.game().phase(), GamePhase::Setup);
    }
}
