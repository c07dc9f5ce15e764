use std::io;
use std::process;

use tracing_subscriber::EnvFilter;

mod config;
mod display;
mod error;
mod game;
mod match_runner;
mod statistics;

use config::Config;
use error::MatchRunnerError;
use match_runner::MatchRunner;

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let config = Config::parse_args();
    let mut match_runner = MatchRunner::new(&config);

    if let Err(e) = match_runner.run_match(&config) {
        match e {
            MatchRunnerError::Io(io_err) => return Err(io_err),
            _ => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        }
    }

    Ok(())
}
