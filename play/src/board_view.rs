//! Board rendering and human move parsing.

use games_tictactoe::{Cell, Move, TicTacToe, BOARD_SIZE};
use mcts::{MctsTree, NodeId};
use thiserror::Error;

const CELL_WIDTH: usize = 8;

/// Most nodes printed by [`render_tree`].
pub const MAX_TREE_NODES: usize = 80;

/// Render the board as a labelled grid.
///
/// ```text
///         |   0       1       2
///    0    |   X       _       _
///    1    |   _       O       _
///    2    |   _       _       _
/// __________________________________
/// ```
pub fn render(board: &TicTacToe) -> String {
    let mut out = String::new();

    out.push_str(&" ".repeat(CELL_WIDTH));
    out.push('|');
    for col in 0..BOARD_SIZE {
        out.push_str(&format!("{:^width$}", col, width = CELL_WIDTH));
    }
    out.push('\n');

    for (row, cells) in board.cells().chunks(BOARD_SIZE).enumerate() {
        out.push_str(&format!("{:^width$}|", row, width = CELL_WIDTH));
        for cell in cells {
            out.push_str(&format!("{:^width$}", symbol(*cell), width = CELL_WIDTH));
        }
        out.push('\n');
    }

    out.push_str(&"_".repeat(CELL_WIDTH + 2 + BOARD_SIZE * CELL_WIDTH));
    out.push('\n');
    out
}

fn symbol(cell: Cell) -> char {
    match cell {
        Cell::Empty => '_',
        Cell::X => 'X',
        Cell::O => 'O',
    }
}

/// Render the top `max_depth` levels of a search tree, depth first.
///
/// Children appear in creation order, indented by depth. The root child
/// reached by `chosen` and its subtree are marked with `*`. At most
/// [`MAX_TREE_NODES`] nodes are printed.
pub fn render_tree(tree: &MctsTree<TicTacToe>, chosen: Move, max_depth: u32) -> String {
    let mut out = String::new();
    let mut printed = 0usize;

    // (node, depth, on chosen branch); pushed in reverse to pop in creation order
    let mut stack: Vec<(NodeId, u32, bool)> = Vec::new();
    push_children(tree, tree.root(), 1, None, Some(chosen), &mut stack);

    while let Some((id, depth, highlighted)) = stack.pop() {
        if printed == MAX_TREE_NODES {
            out.push_str(&format!("... truncated at {} nodes\n", MAX_TREE_NODES));
            break;
        }
        let node = tree.get(id);
        let Some(mv) = node.mv else { continue };

        let marker = if highlighted { '*' } else { ' ' };
        let indent = "    ".repeat(depth as usize - 1);
        out.push_str(&format!(
            "{}{} {:<8} visits {:>5}  win rate {:.3}\n",
            indent,
            marker,
            mv.to_string(),
            node.visit_count,
            node.mean_value()
        ));
        printed += 1;

        if depth < max_depth {
            push_children(tree, id, depth + 1, Some(highlighted), None, &mut stack);
        }
    }

    out
}

fn push_children(
    tree: &MctsTree<TicTacToe>,
    parent: NodeId,
    depth: u32,
    inherited: Option<bool>,
    chosen: Option<Move>,
    stack: &mut Vec<(NodeId, u32, bool)>,
) {
    for &child in tree.get(parent).children.iter().rev() {
        let highlighted = match (inherited, chosen) {
            (Some(h), _) => h,
            (None, Some(mv)) => tree.get(child).mv == Some(mv),
            (None, None) => false,
        };
        stack.push((child, depth, highlighted));
    }
}

/// One line of human input, parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HumanInput {
    Move(Move),
    /// Print the last search tree again
    ShowTree,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseMoveError {
    #[error("please enter a move")]
    Empty,

    #[error("could not read '{0}', expected row,col (e.g. 0,2) or a cell 0-8")]
    Malformed(String),

    #[error("row {row}, column {col} is off the board")]
    OffBoard { row: usize, col: usize },

    #[error("cell {0} is off the board, expected 0-8")]
    CellOutOfRange(usize),
}

/// Parse `row,col` (0-based), a single cell index `0-8`, `t` to show the
/// last search tree, or `q` to quit.
pub fn parse_move(line: &str) -> Result<HumanInput, ParseMoveError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ParseMoveError::Empty);
    }
    if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
        return Ok(HumanInput::Quit);
    }
    if line.eq_ignore_ascii_case("t") {
        return Ok(HumanInput::ShowTree);
    }

    let malformed = || ParseMoveError::Malformed(line.to_string());

    if let Some((row, col)) = line.split_once(',') {
        let row: usize = row.trim().parse().map_err(|_| malformed())?;
        let col: usize = col.trim().parse().map_err(|_| malformed())?;
        return Move::from_row_col(row, col)
            .map(HumanInput::Move)
            .ok_or(ParseMoveError::OffBoard { row, col });
    }

    let index: usize = line.parse().map_err(|_| malformed())?;
    Move::new(index)
        .map(HumanInput::Move)
        .ok_or(ParseMoveError::CellOutOfRange(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use games_tictactoe::Mark;
    use mcts::{MctsConfig, MctsSearch};

    fn searched_tree(iterations: u32) -> (MctsTree<TicTacToe>, Move) {
        let config = MctsConfig::for_testing().with_iterations(iterations);
        let mut rng = config.rng();
        let mut search = MctsSearch::new(TicTacToe::new(), config).unwrap();
        let result = search.run(&mut rng).unwrap();
        (search.into_tree(), result.best_move)
    }

    fn mv(position: usize) -> HumanInput {
        HumanInput::Move(Move::new(position).unwrap())
    }

    #[test]
    fn test_parse_row_col() {
        assert_eq!(parse_move("0,2"), Ok(mv(2)));
        assert_eq!(parse_move(" 1 , 1 \n"), Ok(mv(4)));
        assert_eq!(parse_move("2,0"), Ok(mv(6)));
    }

    #[test]
    fn test_parse_cell_index() {
        assert_eq!(parse_move("0"), Ok(mv(0)));
        assert_eq!(parse_move("8\n"), Ok(mv(8)));
    }

    #[test]
    fn test_parse_quit() {
        assert_eq!(parse_move("q"), Ok(HumanInput::Quit));
        assert_eq!(parse_move("QUIT\n"), Ok(HumanInput::Quit));
    }

    #[test]
    fn test_parse_show_tree() {
        assert_eq!(parse_move("t\n"), Ok(HumanInput::ShowTree));
        assert_eq!(parse_move("T"), Ok(HumanInput::ShowTree));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_move("  "), Err(ParseMoveError::Empty));
        assert_eq!(
            parse_move("a,b"),
            Err(ParseMoveError::Malformed("a,b".to_string()))
        );
        assert_eq!(
            parse_move("1,2,3"),
            Err(ParseMoveError::Malformed("1,2,3".to_string()))
        );
        assert_eq!(
            parse_move("-1"),
            Err(ParseMoveError::Malformed("-1".to_string()))
        );
        assert_eq!(
            parse_move("3,0"),
            Err(ParseMoveError::OffBoard { row: 3, col: 0 })
        );
        assert_eq!(parse_move("9"), Err(ParseMoveError::CellOutOfRange(9)));
    }

    #[test]
    fn test_render_empty_board() {
        let text = render(&TicTacToe::new());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1].matches('_').count(), 3);
        assert_eq!(lines[4], "_".repeat(34));
    }

    #[test]
    fn test_render_marks_in_place() {
        let board = TicTacToe::parse("X.. .O. ..X", Mark::O).unwrap();
        let text = render(&board);
        let rows: Vec<String> = text
            .lines()
            .skip(1)
            .take(3)
            .map(|line| {
                line.split('|')
                    .nth(1)
                    .unwrap()
                    .split_whitespace()
                    .collect::<String>()
            })
            .collect();
        assert_eq!(rows, vec!["X__", "_O_", "__X"]);
    }

    #[test]
    fn test_render_tree_root_children_only() {
        let (tree, chosen) = searched_tree(200);
        let text = render_tree(&tree, chosen, 1);

        assert_eq!(text.lines().count(), 9);
        assert!(text.lines().all(|l| !l.starts_with("    ")));
        let marked: Vec<&str> = text.lines().filter(|l| l.starts_with('*')).collect();
        assert_eq!(marked.len(), 1);
        assert!(marked[0].contains(&chosen.to_string()));
    }

    #[test]
    fn test_render_tree_deeper_levels_follow_parents() {
        // Small enough that every second-level node fits under the cap.
        let (tree, chosen) = searched_tree(50);
        let text = render_tree(&tree, chosen, 2);
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines.len() > 9);
        assert!(!lines[0].starts_with("    "));
        assert!(lines.iter().any(|l| l.starts_with("    ")));
        // Every highlighted line is the chosen child or one of its replies.
        let chosen_id = tree
            .get(tree.root())
            .children
            .iter()
            .copied()
            .find(|&id| tree.get(id).mv == Some(chosen))
            .unwrap();
        let marked = lines.iter().filter(|l| l.trim_start().starts_with('*')).count();
        assert_eq!(marked, 1 + tree.get(chosen_id).children.len());
    }

    #[test]
    fn test_render_tree_caps_node_count() {
        let (tree, chosen) = searched_tree(2000);
        let text = render_tree(&tree, chosen, 3);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), MAX_TREE_NODES + 1);
        assert!(lines[MAX_TREE_NODES].contains("truncated at 80 nodes"));
    }
}
