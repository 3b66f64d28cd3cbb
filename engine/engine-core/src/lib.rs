//! Core traits and types for the MCTS tic-tac-toe engine
//!
//! This crate provides the abstractions shared by games and the search:
//! - `Game`: immutable game-state trait (legal moves, apply move, outcome)
//! - `Player`: side-to-move identity with an `opponent` relation
//! - `Outcome`: win/draw/in-progress result of a position
//! - `InvalidMoveError`: contract violation when applying a move

pub mod game;

// Re-export main types for convenience
pub use game::{Game, InvalidMoveError, Outcome, Player};
