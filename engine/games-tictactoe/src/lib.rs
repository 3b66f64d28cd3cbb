//! TicTacToe game implementation for the MCTS engine
//!
//! This crate provides the 3×3 tic-tac-toe position used by the search and
//! the terminal game loop. A [`TicTacToe`] value is immutable per ply:
//! [`Game::apply_move`] returns a new position with the mark placed and the
//! side to move flipped.
//!
//! # Usage
//!
//! ```rust
//! use engine_core::{Game, Outcome};
//! use games_tictactoe::{Mark, Move, TicTacToe};
//!
//! let state = TicTacToe::new();
//! assert_eq!(state.legal_moves().len(), 9);
//!
//! let state = state.apply_move(Move::new(4).unwrap()).unwrap();
//! assert_eq!(state.to_move(), Mark::O);
//! assert_eq!(state.outcome(), Outcome::InProgress);
//! ```

use std::fmt;

use engine_core::{Game, InvalidMoveError, Outcome, Player};
use thiserror::Error;

/// Width and height of the board.
pub const BOARD_SIZE: usize = 3;

/// Number of cells on the board.
pub const NUM_CELLS: usize = BOARD_SIZE * BOARD_SIZE;

/// Winning lines (rows, columns, diagonals).
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

/// A player's mark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    X,
    O,
}

impl Player for Mark {
    fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::X => write!(f, "X"),
            Mark::O => write!(f, "O"),
        }
    }
}

/// Contents of a single board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl Cell {
    /// The mark in this cell, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::X => Some(Mark::X),
            Cell::O => Some(Mark::O),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

impl From<Mark> for Cell {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::X => Cell::X,
            Mark::O => Cell::O,
        }
    }
}

/// A move: place the side-to-move's mark on a cell (0-8, row-major)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move(u8);

impl Move {
    /// Create a move for a cell index. Returns `None` if the index is off the board.
    pub fn new(position: usize) -> Option<Self> {
        (position < NUM_CELLS).then_some(Move(position as u8))
    }

    /// Create a move from 0-based row and column.
    pub fn from_row_col(row: usize, col: usize) -> Option<Self> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Self::new(row * BOARD_SIZE + col)
        } else {
            None
        }
    }

    /// Cell index (0-8)
    pub fn position(self) -> usize {
        self.0 as usize
    }

    pub fn row(self) -> usize {
        self.position() / BOARD_SIZE
    }

    pub fn col(self) -> usize {
        self.position() % BOARD_SIZE
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({},{})", self.position(), self.row(), self.col())
    }
}

/// Errors building a board from explicit contents
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("Invalid board length: expected {expected} cells but got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("Invalid board character: {0:?}")]
    InvalidCell(char),
    #[error("Players do not alternate: {x} X marks vs {o} O marks")]
    UnbalancedMarks { x: usize, o: usize },
    #[error("{0} cannot be to move with this mark count")]
    WrongSideToMove(Mark),
}

/// TicTacToe game state
///
/// Represents the board, the side to move, and the cached outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TicTacToe {
    /// Board cells, row-major
    cells: [Cell; NUM_CELLS],
    /// Side to move
    to_move: Mark,
    /// Outcome computed when the position was created
    outcome: Outcome<Mark>,
}

impl TicTacToe {
    /// Create the initial position: empty board, X to move
    pub fn new() -> Self {
        Self::with_first_player(Mark::X)
    }

    /// Create an empty board with the given side to move first.
    pub fn with_first_player(to_move: Mark) -> Self {
        Self {
            cells: [Cell::Empty; NUM_CELLS],
            to_move,
            outcome: Outcome::InProgress,
        }
    }

    /// Build a position from explicit cells.
    ///
    /// Mark counts may differ by at most one, and when they differ the side
    /// with fewer marks must be to move.
    pub fn from_cells(cells: [Cell; NUM_CELLS], to_move: Mark) -> Result<Self, BoardError> {
        let x = cells.iter().filter(|&&c| c == Cell::X).count();
        let o = cells.iter().filter(|&&c| c == Cell::O).count();

        if x.abs_diff(o) > 1 {
            return Err(BoardError::UnbalancedMarks { x, o });
        }
        if (x > o && to_move == Mark::X) || (o > x && to_move == Mark::O) {
            return Err(BoardError::WrongSideToMove(to_move));
        }

        Ok(Self {
            cells,
            to_move,
            outcome: Self::check_outcome(&cells),
        })
    }

    /// Parse a 9-character board string (`X`, `O`, and `.`/`_`/`-` for empty).
    ///
    /// Whitespace and `|` separators are ignored, so `"XX.|OO.|..."` works.
    pub fn parse(board: &str, to_move: Mark) -> Result<Self, BoardError> {
        let mut cells = Vec::with_capacity(NUM_CELLS);
        for ch in board.chars() {
            match ch {
                'X' | 'x' => cells.push(Cell::X),
                'O' | 'o' => cells.push(Cell::O),
                '.' | '_' | '-' => cells.push(Cell::Empty),
                c if c.is_whitespace() || c == '|' => {}
                c => return Err(BoardError::InvalidCell(c)),
            }
        }

        let cells: [Cell; NUM_CELLS] =
            cells
                .try_into()
                .map_err(|v: Vec<Cell>| BoardError::InvalidLength {
                    expected: NUM_CELLS,
                    actual: v.len(),
                })?;

        Self::from_cells(cells, to_move)
    }

    /// Board contents, row-major
    pub fn cells(&self) -> &[Cell; NUM_CELLS] {
        &self.cells
    }

    /// Contents of one cell. Returns `None` if the index is off the board.
    pub fn cell(&self, position: usize) -> Option<Cell> {
        self.cells.get(position).copied()
    }

    /// Number of marks on the board
    pub fn moves_played(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// Whether `mv` can be played from this position.
    pub fn is_legal(&self, mv: Move) -> bool {
        !self.outcome.is_terminal() && self.cells[mv.position()].is_empty()
    }

    /// Compute the outcome of a board
    fn check_outcome(cells: &[Cell; NUM_CELLS]) -> Outcome<Mark> {
        for line in &LINES {
            let [a, b, c] = *line;
            if let Some(mark) = cells[a].mark() {
                if cells[a] == cells[b] && cells[b] == cells[c] {
                    return Outcome::Win(mark);
                }
            }
        }

        // Draw: no winner and no empty cell left
        if cells.iter().all(|c| !c.is_empty()) {
            return Outcome::Draw;
        }

        Outcome::InProgress
    }
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for TicTacToe {
    type Move = Move;
    type Player = Mark;

    fn to_move(&self) -> Mark {
        self.to_move
    }

    fn legal_moves(&self) -> Vec<Move> {
        if self.outcome.is_terminal() {
            return Vec::new();
        }

        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_empty())
            .map(|(pos, _)| Move(pos as u8))
            .collect()
    }

    fn apply_move(&self, mv: Move) -> Result<Self, InvalidMoveError> {
        let position = mv.position();
        if self.outcome.is_terminal() {
            return Err(InvalidMoveError::GameOver);
        }
        if position >= NUM_CELLS {
            return Err(InvalidMoveError::OutOfRange {
                position,
                cells: NUM_CELLS,
            });
        }
        if !self.cells[position].is_empty() {
            return Err(InvalidMoveError::Occupied(position));
        }

        let mut next = *self;
        next.cells[position] = self.to_move.into();
        next.to_move = self.to_move.opponent();
        next.outcome = Self::check_outcome(&next.cells);
        Ok(next)
    }

    fn outcome(&self) -> Outcome<Mark> {
        self.outcome
    }
}

impl fmt::Display for TicTacToe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, chunk) in self.cells.chunks(BOARD_SIZE).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for (col, cell) in chunk.iter().enumerate() {
                if col > 0 {
                    write!(f, " ")?;
                }
                let symbol = match cell.mark() {
                    Some(mark) => mark.to_string(),
                    None => ".".to_string(),
                };
                write!(f, "{}", symbol)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
