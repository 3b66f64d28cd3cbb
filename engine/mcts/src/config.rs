//! MCTS configuration parameters.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::search::SearchError;

/// Policy used to pick the move once the search budget is spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FinalMoveSelection {
    /// Child of the root with the most visits (robust to noisy rollouts)
    #[default]
    MostVisited,
    /// Child of the root with the highest average win score
    HighestWinRate,
}

impl FromStr for FinalMoveSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "most_visited" | "most-visited" | "visits" => Ok(Self::MostVisited),
            "highest_win_rate" | "highest-win-rate" | "win_rate" => Ok(Self::HighestWinRate),
            other => Err(format!("unknown final move selection '{}'", other)),
        }
    }
}

impl fmt::Display for FinalMoveSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MostVisited => write!(f, "most_visited"),
            Self::HighestWinRate => write!(f, "highest_win_rate"),
        }
    }
}

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone)]
pub struct MctsConfig {
    /// Number of select/expand/simulate/backpropagate iterations per search.
    pub num_iterations: u32,

    /// Exploration constant `c` in the UCT formula.
    /// Higher values encourage exploration, 0.0 is pure exploitation.
    /// Defaults to sqrt(2).
    pub exploration_constant: f64,

    /// Reward credited to a node whose mover lost the simulated game.
    /// Wins are worth 1.0 and draws 0.0. Must be <= 0.0.
    pub loss_reward: f64,

    /// Optional wall-clock budget, checked before each iteration after the first.
    /// The search stops at whichever of the two budgets runs out first.
    pub time_limit: Option<Duration>,

    /// Seed for the random source. `None` seeds from entropy.
    pub seed: Option<u64>,

    /// How the final move is chosen from the root's children.
    pub final_move: FinalMoveSelection,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_iterations: 1000,
            exploration_constant: std::f64::consts::SQRT_2,
            loss_reward: 0.0,
            time_limit: None,
            seed: None,
            final_move: FinalMoveSelection::MostVisited,
        }
    }
}

impl MctsConfig {
    /// Create a fast, seeded config for testing.
    pub fn for_testing() -> Self {
        Self {
            num_iterations: 200,
            seed: Some(42),
            ..Self::default()
        }
    }

    /// Builder pattern: set number of iterations.
    pub fn with_iterations(mut self, n: u32) -> Self {
        self.num_iterations = n;
        self
    }

    /// Builder pattern: set the UCT exploration constant.
    pub fn with_exploration_constant(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Builder pattern: set the reward for a lost simulation.
    pub fn with_loss_reward(mut self, reward: f64) -> Self {
        self.loss_reward = reward;
        self
    }

    /// Builder pattern: set a wall-clock budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Builder pattern: set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder pattern: set the final move selection policy.
    pub fn with_final_move(mut self, policy: FinalMoveSelection) -> Self {
        self.final_move = policy;
        self
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<(), SearchError> {
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(SearchError::InvalidConfig(format!(
                "exploration_constant must be a non-negative number, got {}",
                self.exploration_constant
            )));
        }
        if !self.loss_reward.is_finite() || self.loss_reward > 0.0 {
            return Err(SearchError::InvalidConfig(format!(
                "loss_reward must be <= 0.0, got {}",
                self.loss_reward
            )));
        }
        if self.time_limit == Some(Duration::ZERO) {
            return Err(SearchError::InvalidConfig(
                "time_limit must be positive when set".to_string(),
            ));
        }
        Ok(())
    }

    /// Create the random source for one search invocation.
    pub fn rng(&self) -> ChaCha20Rng {
        match self.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        }
    }
}
