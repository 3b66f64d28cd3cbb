//! Default configuration values loaded from config.defaults.toml.
//!
//! The file is embedded at compile time so the binary and the documented
//! defaults cannot drift apart.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    mcts: MctsDefaults,
    play: PlayDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct MctsDefaults {
    #[serde(default)]
    num_iterations: Option<u32>,
    exploration_constant: f64,
    loss_reward: f64,
    #[serde(default)]
    time_limit_ms: Option<u64>,
    #[serde(default)]
    seed: Option<u64>,
    final_move: String,
    reuse_tree: bool,
}

#[derive(Debug, Deserialize)]
struct PlayDefaults {
    starting_player: String,
    difficulty: String,
    show_tree: bool,
    tree_depth: u32,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}

// MCTS
pub fn num_iterations() -> Option<u32> {
    DEFAULTS.mcts.num_iterations
}
pub fn exploration_constant() -> f64 {
    DEFAULTS.mcts.exploration_constant
}
pub fn loss_reward() -> f64 {
    DEFAULTS.mcts.loss_reward
}
pub fn time_limit_ms() -> Option<u64> {
    DEFAULTS.mcts.time_limit_ms
}
pub fn seed() -> Option<u64> {
    DEFAULTS.mcts.seed
}
pub fn final_move() -> &'static str {
    &DEFAULTS.mcts.final_move
}
pub fn reuse_tree() -> bool {
    DEFAULTS.mcts.reuse_tree
}

// Play
pub fn starting_player() -> &'static str {
    &DEFAULTS.play.starting_player
}
pub fn difficulty() -> &'static str {
    &DEFAULTS.play.difficulty
}
pub fn show_tree() -> bool {
    DEFAULTS.play.show_tree
}
pub fn tree_depth() -> u32 {
    DEFAULTS.play.tree_depth
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse() {
        assert_eq!(log_level(), "info");
        assert_eq!(final_move(), "most_visited");
    }

    #[test]
    fn test_mcts_defaults() {
        assert!((exploration_constant() - std::f64::consts::SQRT_2).abs() < 1e-12);
        assert_eq!(loss_reward(), 0.0);
        assert!(num_iterations().is_none());
        assert!(time_limit_ms().is_none());
        assert!(seed().is_none());
        assert!(!reuse_tree());
    }

    #[test]
    fn test_play_defaults() {
        assert_eq!(starting_player(), "human");
        assert_eq!(difficulty(), "medium");
        assert!(!show_tree());
        assert_eq!(tree_depth(), 1);
    }
}
