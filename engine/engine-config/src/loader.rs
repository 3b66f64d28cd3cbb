//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use crate::CentralConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "MCTS_TTT_CONFIG";

/// Standard locations to search for mcts-ttt.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "mcts-ttt.toml",    // Current directory
    "../mcts-ttt.toml", // Parent directory (when running from a crate directory)
];

/// Load the central configuration.
///
/// Searches in the following order:
/// 1. Path specified by the `MCTS_TTT_CONFIG` environment variable
/// 2. Current directory (mcts-ttt.toml)
/// 3. Parent directory (../mcts-ttt.toml)
///
/// After loading, environment variable overrides are applied. Missing or
/// broken files never fail the load; the built-in defaults are used instead.
pub fn load_config() -> CentralConfig {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        let path = PathBuf::from(&path);
        if path.exists() {
            info!("Loading config from {}: {}", CONFIG_ENV_VAR, path.display());
            return load_from_path(&path);
        }
        warn!(
            "{}={} not found, searching defaults",
            CONFIG_ENV_VAR,
            path.display()
        );
    }

    for path_str in CONFIG_SEARCH_PATHS {
        let path = Path::new(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(path);
        }
    }

    debug!("No mcts-ttt.toml found, using built-in defaults");
    apply_env_overrides(CentralConfig::default())
}

/// Load configuration from a specific path.
pub fn load_from_path(path: &Path) -> CentralConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => apply_env_overrides(config),
            Err(e) => {
                warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                apply_env_overrides(CentralConfig::default())
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}, using defaults", path.display(), e);
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (u32, f64, bool, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        match std::env::var($key).map(|s| s.parse()) {
            Ok(Ok(v)) => $config.$section.$field = v,
            Ok(Err(_)) => warn!("Ignoring unparseable {}", $key),
            Err(_) => {}
        }
    };
    // Optional parseable field (Option<u32>, Option<u64>, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, optional_parse) => {
        match std::env::var($key).map(|s| s.parse()) {
            Ok(Ok(v)) => $config.$section.$field = Some(v),
            Ok(Err(_)) => warn!("Ignoring unparseable {}", $key),
            Err(_) => {}
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: MCTS_TTT_<SECTION>_<KEY>
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Common
    env_override!(config, common.log_level, "MCTS_TTT_COMMON_LOG_LEVEL");

    // MCTS
    env_override!(
        config,
        mcts.num_iterations,
        "MCTS_TTT_MCTS_NUM_ITERATIONS",
        optional_parse
    );
    env_override!(
        config,
        mcts.exploration_constant,
        "MCTS_TTT_MCTS_EXPLORATION_CONSTANT",
        parse
    );
    env_override!(
        config,
        mcts.loss_reward,
        "MCTS_TTT_MCTS_LOSS_REWARD",
        parse
    );
    env_override!(
        config,
        mcts.time_limit_ms,
        "MCTS_TTT_MCTS_TIME_LIMIT_MS",
        optional_parse
    );
    env_override!(config, mcts.seed, "MCTS_TTT_MCTS_SEED", optional_parse);
    env_override!(config, mcts.final_move, "MCTS_TTT_MCTS_FINAL_MOVE");
    env_override!(
        config,
        mcts.reuse_tree,
        "MCTS_TTT_MCTS_REUSE_TREE",
        parse
    );

    // Play
    env_override!(
        config,
        play.starting_player,
        "MCTS_TTT_PLAY_STARTING_PLAYER"
    );
    env_override!(config, play.difficulty, "MCTS_TTT_PLAY_DIFFICULTY");
    env_override!(config, play.show_tree, "MCTS_TTT_PLAY_SHOW_TREE", parse);
    env_override!(config, play.tree_depth, "MCTS_TTT_PLAY_TREE_DEPTH", parse);

    config
}
