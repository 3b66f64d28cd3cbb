use super::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn mv(position: usize) -> Move {
    Move::new(position).unwrap()
}

fn play(moves: &[usize]) -> TicTacToe {
    moves
        .iter()
        .fold(TicTacToe::new(), |state, &m| state.apply_move(mv(m)).unwrap())
}

/// Independent winner check used to cross-validate the cached outcome.
fn line_winner(cells: &[Cell; NUM_CELLS]) -> Option<Mark> {
    let rows = (0..3).map(|r| [r * 3, r * 3 + 1, r * 3 + 2]);
    let cols = (0..3).map(|c| [c, c + 3, c + 6]);
    let diags = [[0, 4, 8], [2, 4, 6]].into_iter();

    rows.chain(cols).chain(diags).find_map(|[a, b, c]| {
        let mark = cells[a].mark()?;
        (cells[b] == cells[a] && cells[c] == cells[a]).then_some(mark)
    })
}

#[test]
fn test_initial_state() {
    let state = TicTacToe::new();
    assert_eq!(state.cells(), &[Cell::Empty; 9]);
    assert_eq!(state.to_move(), Mark::X);
    assert_eq!(state.outcome(), Outcome::InProgress);
    assert!(!state.is_terminal());
    assert_eq!(state.moves_played(), 0);
}

#[test]
fn test_legal_moves() {
    let state = TicTacToe::new();
    let legal = state.legal_moves();
    assert_eq!(legal, (0..9).map(mv).collect::<Vec<_>>());

    // After one move
    let state = state.apply_move(mv(4)).unwrap(); // Center
    let legal = state.legal_moves();
    assert_eq!(legal.len(), 8);
    assert!(!legal.contains(&mv(4)));
}

#[test]
fn test_apply_move() {
    let state = TicTacToe::new();
    let new_state = state.apply_move(mv(4)).unwrap(); // X places in center

    assert_eq!(new_state.cell(4), Some(Cell::X));
    assert_eq!(new_state.to_move(), Mark::O); // Now O's turn
    assert!(!new_state.is_terminal());
}

#[test]
fn test_apply_move_does_not_mutate_input() {
    let state = play(&[0, 4]);
    let before = state;

    let _ = state.apply_move(mv(8)).unwrap();
    let _ = state.apply_move(mv(4)); // rejected

    assert_eq!(state, before);
    assert_eq!(state.cell(8), Some(Cell::Empty));
    assert_eq!(state.to_move(), Mark::X);
}

#[test]
fn test_occupied_cell_is_rejected() {
    let state = play(&[4]);
    assert_eq!(
        state.apply_move(mv(4)),
        Err(InvalidMoveError::Occupied(4))
    );
}

#[test]
fn test_move_after_game_over_is_rejected() {
    // X wins with top row
    let state = play(&[0, 3, 1, 4, 2]);
    assert_eq!(state.outcome(), Outcome::Win(Mark::X));
    assert_eq!(state.apply_move(mv(8)), Err(InvalidMoveError::GameOver));
}

#[test]
fn test_winning_game() {
    let state = play(&[0, 3, 1, 4, 2]);

    assert_eq!(state.outcome(), Outcome::Win(Mark::X));
    assert!(state.is_terminal());
    assert!(state.legal_moves().is_empty());
    // Turn still flips after the final move
    assert_eq!(state.to_move(), Mark::O);
    assert_eq!(state.player_just_moved(), Mark::X);
}

#[test]
fn test_every_line_wins() {
    for line in LINES {
        for mark in [Mark::X, Mark::O] {
            let mut cells = [Cell::Empty; NUM_CELLS];
            for &pos in &line {
                cells[pos] = mark.into();
            }
            // Two opponent marks off the line keep the counts alternating.
            for pos in (0..NUM_CELLS).filter(|p| !line.contains(p)).take(2) {
                cells[pos] = mark.opponent().into();
            }

            let state = TicTacToe::from_cells(cells, mark.opponent()).unwrap();
            assert_eq!(state.outcome(), Outcome::Win(mark), "line {:?}", line);
            assert!(state.legal_moves().is_empty());
        }
    }
}

#[test]
fn test_draw_game() {
    // X O X / X O O / O X X
    let state = play(&[0, 1, 2, 4, 3, 5, 7, 6, 8]);
    assert_eq!(state.outcome(), Outcome::Draw);
    assert!(state.is_terminal());
    assert!(state.legal_moves().is_empty());
}

#[test]
fn test_win_on_last_cell_is_not_a_draw() {
    // X O X / O X O / O X .   (X fills 8 and completes the main diagonal)
    let state = TicTacToe::parse("XOX OXO OX.", Mark::X).unwrap();
    assert_eq!(state.outcome(), Outcome::InProgress);
    let state = state.apply_move(mv(8)).unwrap();
    assert_eq!(state.outcome(), Outcome::Win(Mark::X));
}

#[test]
fn test_terminal_status_over_all_reachable_positions() {
    // Exhaustive walk of the game tree: every successor's cached outcome must
    // match an independent line scan and the full-board draw rule.
    let mut stack = vec![TicTacToe::new()];
    let mut visited = 0usize;

    while let Some(state) = stack.pop() {
        visited += 1;
        for m in state.legal_moves() {
            let next = state.apply_move(m).unwrap();
            let expected = match line_winner(next.cells()) {
                Some(mark) => Outcome::Win(mark),
                None if next.cells().iter().all(|c| !c.is_empty()) => Outcome::Draw,
                None => Outcome::InProgress,
            };
            assert_eq!(next.outcome(), expected, "board:\n{}", next);
            assert_eq!(next.is_terminal(), expected.is_terminal());
            assert_eq!(next.legal_moves().is_empty(), next.is_terminal());
            stack.push(next);
        }
    }

    // Number of move sequences (nodes) in the full tic-tac-toe game tree.
    assert_eq!(visited, 549_946);
}

#[test]
fn test_random_games_alternate_players() {
    let mut rng = ChaCha20Rng::seed_from_u64(42);

    for _ in 0..200 {
        let mut state = TicTacToe::new();
        let mut expected_player = Mark::X;
        while !state.is_terminal() {
            assert_eq!(state.to_move(), expected_player);
            let m = *state.legal_moves().choose(&mut rng).unwrap();
            state = state.apply_move(m).unwrap();
            expected_player = expected_player.opponent();

            let x = state.cells().iter().filter(|&&c| c == Cell::X).count();
            let o = state.cells().iter().filter(|&&c| c == Cell::O).count();
            assert!(x.abs_diff(o) <= 1);
        }
        assert!(state.moves_played() >= 5);
    }
}

#[test]
fn test_from_cells_validation() {
    let mut cells = [Cell::Empty; NUM_CELLS];
    cells[0] = Cell::X;
    cells[1] = Cell::X;
    assert_eq!(
        TicTacToe::from_cells(cells, Mark::O),
        Err(BoardError::UnbalancedMarks { x: 2, o: 0 })
    );

    cells[1] = Cell::Empty;
    assert_eq!(
        TicTacToe::from_cells(cells, Mark::X),
        Err(BoardError::WrongSideToMove(Mark::X))
    );
    assert!(TicTacToe::from_cells(cells, Mark::O).is_ok());
}

#[test]
fn test_o_may_open() {
    let state = TicTacToe::with_first_player(Mark::O);
    let state = state.apply_move(mv(4)).unwrap();
    assert_eq!(state.cell(4), Some(Cell::O));
    assert_eq!(state.to_move(), Mark::X);
}

#[test]
fn test_parse() {
    let state = TicTacToe::parse("XX.|OO.|...", Mark::X).unwrap();
    assert_eq!(state.cell(0), Some(Cell::X));
    assert_eq!(state.cell(1), Some(Cell::X));
    assert_eq!(state.cell(3), Some(Cell::O));
    assert_eq!(state.cell(4), Some(Cell::O));
    assert_eq!(state.legal_moves().len(), 5);

    assert_eq!(
        TicTacToe::parse("XX", Mark::X),
        Err(BoardError::InvalidLength {
            expected: 9,
            actual: 2
        })
    );
    assert_eq!(
        TicTacToe::parse("XX?OO....", Mark::X),
        Err(BoardError::InvalidCell('?'))
    );
}

#[test]
fn test_move_coordinates() {
    let m = Move::from_row_col(1, 2).unwrap();
    assert_eq!(m.position(), 5);
    assert_eq!(m.row(), 1);
    assert_eq!(m.col(), 2);
    assert!(Move::from_row_col(3, 0).is_none());
    assert!(Move::new(9).is_none());
    assert_eq!(m.to_string(), "5 (1,2)");
}

#[test]
fn test_display() {
    let state = play(&[0, 4]);
    assert_eq!(state.to_string(), "X . .\n. O .\n. . .");
}
