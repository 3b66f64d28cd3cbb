//! Monte Carlo Tree Search (MCTS) with UCT selection and random playouts.
//!
//! This crate provides a game-agnostic MCTS implementation that works with any
//! position implementing the `engine-core` Game trait.
//!
//! # Overview
//!
//! MCTS builds a search tree by running iterations. Each iteration consists
//! of four phases:
//!
//! 1. **Selection**: From the root, descend through fully expanded nodes to
//!    the child with the best UCT score, balancing exploitation and exploration
//! 2. **Expansion**: Add one child for a not-yet-tried legal move
//! 3. **Simulation**: Play uniformly random moves from the new child until the
//!    game ends
//! 4. **Backpropagation**: Update visit counts and win scores along the path
//!    from the new child to the root
//!
//! # Usage
//!
//! ```rust
//! use games_tictactoe::{Mark, Move, TicTacToe};
//! use mcts::{run_mcts, MctsConfig};
//!
//! // X | X | _
//! // O | O | _
//! // _ | _ | _
//! let state = TicTacToe::parse("XX. OO. ...", Mark::X).unwrap();
//!
//! let config = MctsConfig::default().with_iterations(1000).with_seed(42);
//! let result = run_mcts(&state, config).unwrap();
//!
//! assert_eq!(result.best_move, Move::new(2).unwrap());
//! ```
//!
//! # Configuration
//!
//! The [`MctsConfig`] struct controls search behavior:
//!
//! - `num_iterations`: Iterations per search (default: 1000)
//! - `exploration_constant`: UCT exploration constant (default: sqrt(2))
//! - `loss_reward`: Reward for a lost simulation (default: 0.0; wins are 1.0, draws 0.0)
//! - `time_limit`: Optional wall-clock budget
//! - `seed`: Optional seed for reproducible searches
//! - `final_move`: Most visited child (default) or highest win rate
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │                  MctsSearch                   │
//! ├───────────────────────────────────────────────┤
//! │  ┌─────────────┐  ┌──────────┐  ┌──────────┐  │
//! │  │  MctsTree   │  │ Playout  │  │ ChaCha20 │  │
//! │  │  (arena)    │  │ (random) │  │   rng    │  │
//! │  └──────┬──────┘  └────┬─────┘  └────┬─────┘  │
//! │         ▼              ▼             ▼        │
//! │  ┌─────────────────────────────────────────┐  │
//! │  │  select → expand → simulate → backprop  │  │
//! │  └─────────────────────────────────────────┘  │
//! └───────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod node;
pub mod playout;
pub mod search;
pub mod tree;

// Re-export main types
pub use config::{FinalMoveSelection, MctsConfig};
pub use node::{MctsNode, NodeId};
pub use playout::{Playout, PlayoutError, RandomPlayout};
pub use search::{run_mcts, MctsSearch, SearchError, SearchResult};
pub use tree::{ChildStats, MctsTree, TreeStats};
