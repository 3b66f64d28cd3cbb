//! Centralized configuration loading from mcts-ttt.toml.
//!
//! This crate provides the configuration structs and loading logic used by
//! the `play` binary.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`MCTS_TTT_<SECTION>_<KEY>`)
//! 2. mcts-ttt.toml file
//! 3. Built-in defaults (config.defaults.toml, embedded at compile time)
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! MCTS_TTT_<SECTION>_<KEY>=value
//!
//! Examples:
//!     MCTS_TTT_COMMON_LOG_LEVEL=debug
//!     MCTS_TTT_MCTS_SEED=42
//!     MCTS_TTT_MCTS_TIME_LIMIT_MS=250
//!     MCTS_TTT_PLAY_DIFFICULTY=hard
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{
    apply_env_overrides, load_config, load_from_path, CONFIG_ENV_VAR, CONFIG_SEARCH_PATHS,
};
pub use structs::*;
