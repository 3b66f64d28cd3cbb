//! Playout trait for the simulation phase.
//!
//! A playout plays a position out to a terminal state and reports the
//! outcome. The search only ever uses [`RandomPlayout`], which picks
//! uniformly among legal moves; the trait is the seam where a guided
//! rollout policy would plug in.

use engine_core::{Game, InvalidMoveError, Outcome};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;

/// Errors that can occur during a playout.
#[derive(Debug, Error)]
pub enum PlayoutError {
    #[error("Playout produced an invalid move: {0}")]
    InvalidMove(#[from] InvalidMoveError),

    #[error("Playout exceeded {0} plies without reaching a terminal state")]
    MaxDepthExceeded(u32),
}

/// Trait for simulation policies.
pub trait Playout<G: Game> {
    /// Play `state` out to a terminal position and return its outcome.
    ///
    /// A terminal `state` returns its own outcome without playing.
    fn simulate(&self, state: &G, rng: &mut ChaCha20Rng)
        -> Result<Outcome<G::Player>, PlayoutError>;
}

/// Uniform random playout: every ply picks a legal move uniformly at random.
#[derive(Debug, Clone)]
pub struct RandomPlayout {
    /// Maximum playout depth to prevent runaway games
    pub max_depth: u32,
}

impl Default for RandomPlayout {
    fn default() -> Self {
        Self { max_depth: 1000 }
    }
}

impl RandomPlayout {
    pub fn new(max_depth: u32) -> Self {
        Self { max_depth }
    }
}

impl<G: Game> Playout<G> for RandomPlayout {
    fn simulate(
        &self,
        state: &G,
        rng: &mut ChaCha20Rng,
    ) -> Result<Outcome<G::Player>, PlayoutError> {
        let mut current = state.clone();

        for _ in 0..self.max_depth {
            let outcome = current.outcome();
            if outcome.is_terminal() {
                return Ok(outcome);
            }

            let moves = current.legal_moves();
            match moves.choose(rng) {
                Some(&mv) => current = current.apply_move(mv)?,
                // Non-terminal with no legal moves: treat as a draw
                None => return Ok(Outcome::Draw),
            }
        }

        let outcome = current.outcome();
        if outcome.is_terminal() {
            Ok(outcome)
        } else {
            Err(PlayoutError::MaxDepthExceeded(self.max_depth))
        }
    }
}
