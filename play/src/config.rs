//! Configuration for the game loop
//!
//! Configuration is loaded from mcts-ttt.toml with environment variable overrides.
//! CLI arguments take highest priority, followed by env vars, then mcts-ttt.toml.

use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::{Parser, ValueEnum};
use engine_config::{load_config, CentralConfig};
use games_tictactoe::Mark;
use mcts::{FinalMoveSelection, MctsConfig};
use once_cell::sync::Lazy;
use tracing::level_filters::LevelFilter;

use crate::session::SessionSettings;

// Load central config once at startup
pub static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

/// Who places the first mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StartingPlayer {
    #[default]
    Human,
    Engine,
}

impl StartingPlayer {
    /// The mark that opens the game (the human plays O, the engine X).
    pub fn first_mark(self) -> Mark {
        match self {
            StartingPlayer::Human => crate::session::HUMAN,
            StartingPlayer::Engine => crate::session::ENGINE,
        }
    }
}

/// Iteration presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn iterations(self) -> u32 {
        match self {
            Difficulty::Easy => 200,
            Difficulty::Medium => 800,
            Difficulty::Hard => 2000,
        }
    }
}

// Default value functions that read from central config
fn default_starting_player() -> StartingPlayer {
    StartingPlayer::from_str(&CENTRAL_CONFIG.play.starting_player, true).unwrap_or_default()
}

fn default_difficulty() -> Difficulty {
    Difficulty::from_str(&CENTRAL_CONFIG.play.difficulty, true).unwrap_or_default()
}

fn default_exploration() -> f64 {
    CENTRAL_CONFIG.mcts.exploration_constant
}

fn default_loss_reward() -> f64 {
    CENTRAL_CONFIG.mcts.loss_reward
}

fn default_final_move() -> FinalMoveSelection {
    CENTRAL_CONFIG.mcts.final_move.parse().unwrap_or_default()
}

fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

fn default_tree_depth() -> u32 {
    CENTRAL_CONFIG.play.tree_depth
}

/// Values in the central config that the defaults above could not parse.
///
/// The defaults are read while the command line is parsed, before tracing is
/// up, so `main` logs these afterwards. Each one falls back to its built-in
/// default.
pub fn central_config_warnings(central: &CentralConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    if StartingPlayer::from_str(&central.play.starting_player, true).is_err() {
        warnings.push(format!(
            "unknown play.starting_player '{}', using '{}'",
            central.play.starting_player,
            name_of(StartingPlayer::default())
        ));
    }
    if Difficulty::from_str(&central.play.difficulty, true).is_err() {
        warnings.push(format!(
            "unknown play.difficulty '{}', using '{}'",
            central.play.difficulty,
            name_of(Difficulty::default())
        ));
    }
    if let Err(e) = central.mcts.final_move.parse::<FinalMoveSelection>() {
        warnings.push(format!(
            "{} in mcts.final_move, using '{}'",
            e,
            FinalMoveSelection::default()
        ));
    }
    warnings
}

fn name_of<T: ValueEnum>(value: T) -> String {
    value
        .to_possible_value()
        .map(|v| v.get_name().to_string())
        .unwrap_or_default()
}

#[derive(Parser, Debug, Clone)]
#[command(name = "mcts-ttt")]
#[command(about = "Play tic-tac-toe against a Monte Carlo Tree Search engine")]
#[command(
    long_about = "Play tic-tac-toe in the terminal. You play O, the engine plays X.
Enter moves as row,col (0-based, e.g. 0,2) or as a cell number 0-8;
t shows the engine's last search tree, q quits.

Configuration is loaded from mcts-ttt.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Config {
    /// Who moves first
    #[arg(long, value_enum, default_value_t = default_starting_player())]
    pub starting_player: StartingPlayer,

    /// Engine strength preset (easy = 200, medium = 800, hard = 2000 iterations)
    #[arg(long, value_enum, default_value_t = default_difficulty())]
    pub difficulty: Difficulty,

    /// Explicit iteration budget per engine move (overrides --difficulty)
    #[arg(long)]
    pub iterations: Option<u32>,

    /// Seed for the engine's random source (entropy when unset)
    #[arg(long)]
    pub seed: Option<u64>,

    /// UCT exploration constant
    #[arg(long, default_value_t = default_exploration())]
    pub exploration: f64,

    /// Reward credited for a simulated loss (<= 0)
    #[arg(long, allow_hyphen_values = true, default_value_t = default_loss_reward())]
    pub loss_reward: f64,

    /// Wall-clock budget per engine move in milliseconds
    #[arg(long)]
    pub time_limit_ms: Option<u64>,

    /// Final move policy (most_visited, highest_win_rate)
    #[arg(long, default_value_t = default_final_move())]
    pub final_move: FinalMoveSelection,

    /// Keep the engine's search tree between moves
    #[arg(long, overrides_with = "no_reuse_tree")]
    pub reuse_tree: bool,

    /// Search afresh for every move, even if the config file enables reuse
    #[arg(long, overrides_with = "reuse_tree")]
    pub no_reuse_tree: bool,

    /// Print the search tree after each engine move
    #[arg(long, overrides_with = "no_show_tree")]
    pub show_tree: bool,

    /// Do not print the search tree, even if the config file enables it
    #[arg(long, overrides_with = "show_tree")]
    pub no_show_tree: bool,

    /// Levels of the search tree to print (1 = the engine's candidate moves)
    #[arg(long, default_value_t = default_tree_depth())]
    pub tree_depth: u32,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,
}

impl Config {
    /// Fill settings the command line left unset from the central config.
    ///
    /// Optional values and on/off flags have no clap default, so they are
    /// merged here instead. A `--no-*` flag beats a config file value.
    pub fn merge_central(mut self, central: &CentralConfig) -> Self {
        self.iterations = self.iterations.or(central.mcts.num_iterations);
        self.seed = self.seed.or(central.mcts.seed);
        self.time_limit_ms = self.time_limit_ms.or(central.mcts.time_limit_ms);
        self.reuse_tree = !self.no_reuse_tree && (self.reuse_tree || central.mcts.reuse_tree);
        self.show_tree = !self.no_show_tree && (self.show_tree || central.play.show_tree);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.iterations == Some(0) {
            return Err(anyhow!("iterations must be greater than 0"));
        }

        if self.time_limit_ms == Some(0) {
            return Err(anyhow!("time_limit_ms must be greater than 0"));
        }

        if self.tree_depth == 0 {
            return Err(anyhow!("tree_depth must be at least 1"));
        }

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        self.mcts_config().validate()?;

        Ok(())
    }

    /// Iteration budget per engine move.
    pub fn num_iterations(&self) -> u32 {
        self.iterations.unwrap_or_else(|| self.difficulty.iterations())
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }

    pub fn mcts_config(&self) -> MctsConfig {
        MctsConfig {
            num_iterations: self.num_iterations(),
            exploration_constant: self.exploration,
            loss_reward: self.loss_reward,
            time_limit: self.time_limit(),
            seed: self.seed,
            final_move: self.final_move,
        }
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            mcts: self.mcts_config(),
            starting_player: self.starting_player,
            reuse_tree: self.reuse_tree,
            show_tree: self.show_tree,
            tree_depth: self.tree_depth,
        }
    }
}
