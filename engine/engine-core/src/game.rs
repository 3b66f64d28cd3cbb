//! Typed Game trait for two-player, perfect-information, zero-sum games
//!
//! A `Game` implementation is a position: it knows whose turn it is, which
//! moves are legal, and whether the game is over. Positions are values;
//! applying a move returns a new position and never mutates the receiver.

use std::fmt::Debug;

/// Identity of a side in a two-player game.
pub trait Player: Copy + Eq + Debug + Send + Sync + 'static {
    /// The other side.
    fn opponent(self) -> Self;
}

/// Result of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome<P> {
    /// The given player completed a winning pattern
    Win(P),
    /// No moves remain and nobody won
    Draw,
    /// The game continues
    InProgress,
}

impl<P: Player> Outcome<P> {
    /// Whether the game is over.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::InProgress)
    }

    /// The winning player, if any.
    pub fn winner(&self) -> Option<P> {
        match self {
            Outcome::Win(p) => Some(*p),
            _ => None,
        }
    }
}

/// Error returned when a move cannot be applied to a position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidMoveError {
    #[error("Position {position} is out of range (board has {cells} cells)")]
    OutOfRange { position: usize, cells: usize },
    #[error("Position {0} is already occupied")]
    Occupied(usize),
    #[error("Game is already over")]
    GameOver,
}

/// Main trait for game positions
///
/// Implementations should be small `Clone` values: the search creates one
/// per tree node and one per simulated ply.
///
/// # Example
///
/// ```rust
/// # use engine_core::{Game, InvalidMoveError, Outcome, Player};
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// enum Side { A, B }
///
/// impl Player for Side {
///     fn opponent(self) -> Self {
///         match self { Side::A => Side::B, Side::B => Side::A }
///     }
/// }
///
/// /// Players alternately take 1 or 2 stones; whoever takes the last stone wins.
/// #[derive(Debug, Clone, PartialEq)]
/// struct Nim { stones: u8, to_move: Side }
///
/// impl Game for Nim {
///     type Move = u8;
///     type Player = Side;
///
///     fn to_move(&self) -> Side { self.to_move }
///
///     fn legal_moves(&self) -> Vec<u8> {
///         (1..=2).filter(|&n| n <= self.stones).collect()
///     }
///
///     fn apply_move(&self, mv: u8) -> Result<Self, InvalidMoveError> {
///         if self.stones == 0 {
///             return Err(InvalidMoveError::GameOver);
///         }
///         if mv == 0 || mv > 2 || mv > self.stones {
///             return Err(InvalidMoveError::OutOfRange { position: mv as usize, cells: 2 });
///         }
///         Ok(Nim { stones: self.stones - mv, to_move: self.to_move.opponent() })
///     }
///
///     fn outcome(&self) -> Outcome<Side> {
///         if self.stones == 0 {
///             Outcome::Win(self.to_move.opponent())
///         } else {
///             Outcome::InProgress
///         }
///     }
/// }
///
/// let start = Nim { stones: 2, to_move: Side::A };
/// assert_eq!(start.apply_move(2).unwrap().outcome(), Outcome::Win(Side::A));
/// ```
pub trait Game: Clone + Debug + Send + Sync + 'static {
    /// Move type - small and Copy
    type Move: Copy + Eq + Debug + Send + Sync + 'static;

    /// Side-to-move type
    type Player: Player;

    /// The player whose turn it is.
    fn to_move(&self) -> Self::Player;

    /// All legal moves from this position. Empty iff the position is terminal.
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// Return the position after `mv` is played by the side to move.
    ///
    /// Fails if the position is already terminal or the move is not legal.
    fn apply_move(&self, mv: Self::Move) -> Result<Self, InvalidMoveError>;

    /// Win, draw, or in progress.
    fn outcome(&self) -> Outcome<Self::Player>;

    /// Whether the game is over.
    fn is_terminal(&self) -> bool {
        self.outcome().is_terminal()
    }

    /// The player who made the move that produced this position.
    fn player_just_moved(&self) -> Self::Player {
        self.to_move().opponent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Side {
        A,
        B,
    }

    impl Player for Side {
        fn opponent(self) -> Self {
            match self {
                Side::A => Side::B,
                Side::B => Side::A,
            }
        }
    }

    #[test]
    fn test_outcome_terminal() {
        assert!(Outcome::Win(Side::A).is_terminal());
        assert!(Outcome::<Side>::Draw.is_terminal());
        assert!(!Outcome::<Side>::InProgress.is_terminal());
    }

    #[test]
    fn test_outcome_winner() {
        assert_eq!(Outcome::Win(Side::B).winner(), Some(Side::B));
        assert_eq!(Outcome::<Side>::Draw.winner(), None);
        assert_eq!(Outcome::<Side>::InProgress.winner(), None);
    }

    #[test]
    fn test_opponent_is_involution() {
        assert_eq!(Side::A.opponent(), Side::B);
        assert_eq!(Side::A.opponent().opponent(), Side::A);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            InvalidMoveError::Occupied(4).to_string(),
            "Position 4 is already occupied"
        );
        assert_eq!(
            InvalidMoveError::OutOfRange {
                position: 9,
                cells: 9
            }
            .to_string(),
            "Position 9 is out of range (board has 9 cells)"
        );
        assert_eq!(InvalidMoveError::GameOver.to_string(), "Game is already over");
    }
}
