//! MCTS search implementation.
//!
//! Implements the core MCTS algorithm:
//! 1. Selection: Descend through fully expanded nodes using UCT
//! 2. Expansion: Add one child for an untried move
//! 3. Simulation: Play the new child out with random moves
//! 4. Backpropagation: Update statistics along the path to the root

use std::time::{Duration, Instant};

use engine_core::{Game, InvalidMoveError};
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::{FinalMoveSelection, MctsConfig};
use crate::node::NodeId;
use crate::playout::{Playout, PlayoutError, RandomPlayout};
use crate::tree::{ChildStats, MctsTree};

/// Errors that can occur during MCTS search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("No move available: the game is already over")]
    NoMoveAvailable,

    #[error("Invalid move: {0}")]
    InvalidMove(#[from] InvalidMoveError),

    #[error("Playout error: {0}")]
    Playout(#[from] PlayoutError),

    #[error("Search invariant violated: {0}")]
    Logic(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result of an MCTS search.
#[derive(Debug, Clone)]
pub struct SearchResult<M> {
    /// Best move to play
    pub best_move: M,

    /// Visits of the chosen child
    pub visits: u32,

    /// Average win score of the chosen child
    pub win_rate: f64,

    /// Iterations completed by this invocation
    pub iterations: u32,

    /// Root visits after the search (includes reused visits)
    pub root_visits: u32,

    /// Wall-clock time spent searching
    pub elapsed: Duration,

    /// Statistics of every child of the root, in creation order
    pub children: Vec<ChildStats<M>>,
}

/// MCTS search state.
pub struct MctsSearch<G: Game, P: Playout<G> = RandomPlayout> {
    tree: MctsTree<G>,
    config: MctsConfig,
    playout: P,
}

impl<G: Game> MctsSearch<G, RandomPlayout> {
    /// Create a new MCTS search from the given game state.
    pub fn new(state: G, config: MctsConfig) -> Result<Self, SearchError> {
        Self::with_playout(state, config, RandomPlayout::default())
    }

    /// Continue searching an existing tree (see [`MctsTree::advance`]).
    pub fn from_tree(tree: MctsTree<G>, config: MctsConfig) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self {
            tree,
            config,
            playout: RandomPlayout::default(),
        })
    }
}

impl<G: Game, P: Playout<G>> MctsSearch<G, P> {
    /// Create a search with a custom playout policy.
    pub fn with_playout(state: G, config: MctsConfig, playout: P) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self {
            tree: MctsTree::new(state),
            config,
            playout,
        })
    }

    /// Run the search until the iteration or time budget is spent, then pick a move.
    pub fn run(&mut self, rng: &mut ChaCha20Rng) -> Result<SearchResult<G::Move>, SearchError> {
        let root_id = self.tree.root();
        if self.tree.get(root_id).is_terminal() {
            return Err(SearchError::NoMoveAvailable);
        }

        let start = Instant::now();
        let deadline = self.config.time_limit.map(|limit| start + limit);
        let mut iterations = 0u32;

        while iterations < self.config.num_iterations {
            // At least one iteration runs so a live root always gets a child.
            if iterations > 0 && deadline.is_some_and(|d| Instant::now() >= d) {
                debug!(iterations, "MCTS time budget exhausted");
                break;
            }
            self.iterate(rng)?;
            iterations += 1;
        }

        let elapsed = start.elapsed();
        let best_id = self.select_final().ok_or(SearchError::NoMoveAvailable)?;
        let best = self.tree.get(best_id);
        let best_move = best.mv.ok_or_else(|| {
            SearchError::Logic(format!("root child {} has no move", best_id.0))
        })?;

        let root = self.tree.get(root_id);
        debug!(
            iterations,
            root_visits = root.visit_count,
            nodes = self.tree.len(),
            best_move = ?best_move,
            visits = best.visit_count,
            win_rate = best.mean_value(),
            elapsed_ms = elapsed.as_millis() as u64,
            "MCTS search complete"
        );

        Ok(SearchResult {
            best_move,
            visits: best.visit_count,
            win_rate: best.mean_value(),
            iterations,
            root_visits: root.visit_count,
            elapsed,
            children: self.tree.child_stats(root_id),
        })
    }

    /// Run a single iteration (select -> expand -> simulate -> backpropagate).
    pub fn iterate(&mut self, rng: &mut ChaCha20Rng) -> Result<(), SearchError> {
        // Selection: descend to a terminal or not fully expanded node
        let selected = self.select()?;

        // Expansion: terminal nodes are simulated from directly
        let leaf = if self.tree.get(selected).is_terminal() {
            selected
        } else {
            self.tree.expand(selected, rng)?
        };

        // Simulation
        let outcome = self.playout.simulate(&self.tree.get(leaf).state, rng)?;

        // Backpropagation
        self.tree
            .backpropagate(leaf, outcome, self.config.loss_reward);

        trace!(
            selected = selected.0,
            leaf = leaf.0,
            outcome = ?outcome,
            "MCTS iteration complete"
        );

        Ok(())
    }

    /// Select a node by descending through fully expanded, non-terminal nodes using UCT.
    fn select(&self) -> Result<NodeId, SearchError> {
        let mut current = self.tree.root();

        loop {
            let node = self.tree.get(current);

            // Stop at terminal or not fully expanded nodes
            if node.is_terminal() || !node.is_fully_expanded() {
                return Ok(current);
            }

            current = self
                .tree
                .best_child_uct(current, self.config.exploration_constant)
                .ok_or_else(|| {
                    SearchError::Logic(format!(
                        "fully expanded non-terminal node {} has no children",
                        current.0
                    ))
                })?;
        }
    }

    /// Root child chosen by the configured final move policy.
    fn select_final(&self) -> Option<NodeId> {
        let root = self.tree.root();
        match self.config.final_move {
            FinalMoveSelection::MostVisited => self.tree.most_visited_child(root),
            FinalMoveSelection::HighestWinRate => self.tree.highest_win_rate_child(root),
        }
    }

    /// Get the search tree (for inspection/debugging).
    pub fn tree(&self) -> &MctsTree<G> {
        &self.tree
    }

    /// Take the search tree, e.g. to re-root it for the next move.
    pub fn into_tree(self) -> MctsTree<G> {
        self.tree
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }
}

/// Convenience function to run a single MCTS search.
///
/// The random source is seeded from `config.seed`, or from entropy when unset.
pub fn run_mcts<G: Game>(
    state: &G,
    config: MctsConfig,
) -> Result<SearchResult<G::Move>, SearchError> {
    let mut rng = config.rng();
    let mut search = MctsSearch::new(state.clone(), config)?;
    search.run(&mut rng)
}
