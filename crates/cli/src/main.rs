mod game;
mod mode;
mod parse;
mod ui;

use std::path::PathBuf;
use std::process;

use backgammon_core::ai::Ai;
use backgammon_core::config::MatchConfig;
use backgammon_core::error::SessionError;
use backgammon_core::level::{AiSettings, Difficulty, Personality};
use backgammon_core::session::Session;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

use crate::mode::GameMode;

#[derive(Parser, Debug)]
#[command(name = "backgammon", version, about = "Play backgammon in the terminal")]
struct Cli {
    /// Points needed to win the match
    #[arg(long)]
    target: Option<u32>,

    #[arg(long, value_enum, default_value_t = GameMode::HumanVsAi)]
    mode: GameMode,

    /// beginner, easy, medium, hard or expert
    #[arg(long, default_value = "medium")]
    difficulty: Difficulty,

    /// balanced, aggressive, defensive or tactical
    #[arg(long, default_value = "balanced")]
    personality: Personality,

    /// Seed for reproducible dice
    #[arg(long)]
    seed: Option<u64>,

    /// Resume a saved session
    #[arg(long, value_name = "FILE", value_hint = clap::ValueHint::FilePath, conflicts_with = "preset")]
    load: Option<PathBuf>,

    /// Start from a named debug position
    #[arg(long)]
    preset: Option<String>,

    /// Cosmetic AI thinking delay
    #[arg(long, default_value = "400")]
    thinking_ms: u64,

    /// Play forced moves automatically
    #[arg(long)]
    auto_forced: bool,

    /// Match configuration as JSON
    #[arg(long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    config: Option<PathBuf>,
}

fn build_session(args: &Cli) -> Result<Session, SessionError> {
    if let Some(path) = &args.load {
        return Session::load(path);
    }

    let mut config = match &args.config {
        Some(path) => MatchConfig::from_file(path)?,
        None => MatchConfig::default(),
    };
    if let Some(target) = args.target {
        config.target_points = target;
    }
    if args.auto_forced {
        config.game.auto_play_forced = true;
    }

    match &args.preset {
        Some(name) => Session::preset_with_config(name, config),
        None => Session::new(config),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    let session = build_session(&args).unwrap_or_else(|err| {
        eprintln!("Failed to set up the match: {err}");
        process::exit(1);
    });

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    let settings =
        AiSettings::new(args.difficulty, args.personality).with_thinking_ms(args.thinking_ms);

    if let Err(err) = ui::Repl::new(session, args.mode, Ai::new(settings), rng).run() {
        eprintln!("Terminal error: {err}");
        process::exit(1);
    }
}
