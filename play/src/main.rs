//! mcts-ttt - play tic-tac-toe against a Monte Carlo Tree Search engine
//!
//! Renders the board in the terminal, reads the human's moves (row,col or a
//! cell number) and answers with the engine's choice until the game ends,
//! then offers a rematch.

use std::io;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

mod board_view;
mod config;
mod session;

use crate::config::{central_config_warnings, Config, CENTRAL_CONFIG};
use crate::session::GameSession;

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // The board goes to stdout, so logs go to stderr.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let config = Config::parse().merge_central(&CENTRAL_CONFIG);
    config.validate()?;

    init_tracing(&config.log_level)?;
    for warning in central_config_warnings(&CENTRAL_CONFIG) {
        warn!("{}", warning);
    }
    info!(
        starting_player = ?config.starting_player,
        difficulty = ?config.difficulty,
        iterations = config.num_iterations(),
        seed = ?config.seed,
        reuse_tree = config.reuse_tree,
        "Starting game"
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = GameSession::new(stdin.lock(), stdout.lock(), config.session_settings());
    let results = session.play()?;
    info!(games = results.len(), "Session finished");

    Ok(())
}
