//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// ============================================================================

fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_num_iterations() -> Option<u32> {
    defaults::num_iterations()
}
fn d_exploration_constant() -> f64 {
    defaults::exploration_constant()
}
fn d_loss_reward() -> f64 {
    defaults::loss_reward()
}
fn d_time_limit_ms() -> Option<u64> {
    defaults::time_limit_ms()
}
fn d_seed() -> Option<u64> {
    defaults::seed()
}
fn d_final_move() -> String {
    defaults::final_move().into()
}
fn d_reuse_tree() -> bool {
    defaults::reuse_tree()
}
fn d_starting_player() -> String {
    defaults::starting_player().into()
}
fn d_difficulty() -> String {
    defaults::difficulty().into()
}
fn d_show_tree() -> bool {
    defaults::show_tree()
}
fn d_tree_depth() -> u32 {
    defaults::tree_depth()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching mcts-ttt.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub mcts: MctsSection,
    #[serde(default)]
    pub play: PlaySection,
}

/// Settings shared by every component
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_log_level")]
    pub log_level: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::log_level().into(),
        }
    }
}

/// Search parameters.
///
/// `final_move` is kept as a string here; the search crate owns its parsing.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MctsSection {
    /// Explicit iteration budget; when unset the difficulty preset decides
    #[serde(default = "d_num_iterations")]
    pub num_iterations: Option<u32>,
    #[serde(default = "d_exploration_constant")]
    pub exploration_constant: f64,
    #[serde(default = "d_loss_reward")]
    pub loss_reward: f64,
    #[serde(default = "d_time_limit_ms")]
    pub time_limit_ms: Option<u64>,
    #[serde(default = "d_seed")]
    pub seed: Option<u64>,
    #[serde(default = "d_final_move")]
    pub final_move: String,
    #[serde(default = "d_reuse_tree")]
    pub reuse_tree: bool,
}

impl Default for MctsSection {
    fn default() -> Self {
        Self {
            num_iterations: defaults::num_iterations(),
            exploration_constant: defaults::exploration_constant(),
            loss_reward: defaults::loss_reward(),
            time_limit_ms: defaults::time_limit_ms(),
            seed: defaults::seed(),
            final_move: defaults::final_move().into(),
            reuse_tree: defaults::reuse_tree(),
        }
    }
}

/// Interactive game loop settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PlaySection {
    /// `human` or `engine`
    #[serde(default = "d_starting_player")]
    pub starting_player: String,
    /// `easy`, `medium` or `hard`
    #[serde(default = "d_difficulty")]
    pub difficulty: String,
    #[serde(default = "d_show_tree")]
    pub show_tree: bool,
    /// Levels of the search tree printed when `show_tree` is on
    #[serde(default = "d_tree_depth")]
    pub tree_depth: u32,
}

impl Default for PlaySection {
    fn default() -> Self {
        Self {
            starting_player: defaults::starting_player().into(),
            difficulty: defaults::difficulty().into(),
            show_tree: defaults::show_tree(),
            tree_depth: defaults::tree_depth(),
        }
    }
}
