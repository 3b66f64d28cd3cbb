//! MCTS tree node representation.
//!
//! Each node represents a game state reached by playing a move from the parent.
//! Nodes store the visit statistics used for UCT selection and the final
//! move decision, plus the legal moves that have not been expanded yet.

use engine_core::Game;

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// A node in the MCTS tree.
#[derive(Debug, Clone)]
pub struct MctsNode<G: Game> {
    /// Parent node index (NONE for root). Never an owning reference.
    pub parent: NodeId,

    /// Move that led to this node from parent (None for root)
    pub mv: Option<G::Move>,

    /// Game state at this node
    pub state: G,

    /// Number of simulations that passed through this node
    pub visit_count: u32,

    /// Sum of rewards, from the perspective of the player who moved into this node.
    /// Win rate = win_score / visit_count
    pub win_score: f64,

    /// Whether this is a terminal state (game over)
    pub is_terminal: bool,

    /// Legal moves that do not have a child yet
    pub untried_moves: Vec<G::Move>,

    /// Children in creation order
    pub children: Vec<NodeId>,
}

impl<G: Game> MctsNode<G> {
    /// Create a new root node.
    pub fn new_root(state: G) -> Self {
        Self::new_child(NodeId::NONE, None, state)
    }

    /// Create a new child node.
    pub fn new_child(parent: NodeId, mv: Option<G::Move>, state: G) -> Self {
        let is_terminal = state.is_terminal();
        let untried_moves = state.legal_moves();
        Self {
            parent,
            mv,
            state,
            visit_count: 0,
            win_score: 0.0,
            is_terminal,
            untried_moves,
            children: Vec::new(),
        }
    }

    /// Average reward = win_score / visit_count.
    /// Returns 0.0 if never visited.
    #[inline]
    pub fn mean_value(&self) -> f64 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.win_score / self.visit_count as f64
        }
    }

    /// UCT score used by the parent to choose among its children.
    /// UCT = w/n + c * sqrt(ln(N_parent) / n)
    ///
    /// Takes pre-computed ln(parent_visits) so the log is taken once per
    /// selection step. Unvisited children score +inf.
    #[inline]
    pub fn uct_score(&self, parent_visits_ln: f64, exploration_constant: f64) -> f64 {
        if self.visit_count == 0 {
            return f64::INFINITY;
        }
        let n = self.visit_count as f64;
        self.mean_value() + exploration_constant * (parent_visits_ln / n).sqrt()
    }

    /// True iff every legal move from this state has a child.
    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        self.untried_moves.is_empty()
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.is_terminal
    }

    /// Player who made the move leading into this node.
    #[inline]
    pub fn mover(&self) -> G::Player {
        self.state.player_just_moved()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::Game;
    use games_tictactoe::{Mark, Move, TicTacToe};

    #[test]
    fn test_node_id_none() {
        assert!(NodeId::NONE.is_none());
        assert!(!NodeId::NONE.is_some());
        assert!(!NodeId(0).is_none());
        assert!(NodeId(0).is_some());
    }

    #[test]
    fn test_new_root() {
        let node = MctsNode::new_root(TicTacToe::new());

        assert!(node.parent.is_none());
        assert!(node.mv.is_none());
        assert_eq!(node.visit_count, 0);
        assert!(!node.is_terminal());
        assert!(!node.is_fully_expanded());
        assert_eq!(node.untried_moves.len(), 9);
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_terminal_node_has_no_untried_moves() {
        let state = TicTacToe::parse("XXX OO. ...", Mark::O).unwrap();
        let node = MctsNode::new_child(NodeId(0), Move::new(2), state);

        assert!(node.is_terminal());
        assert!(node.is_fully_expanded());
        assert!(node.untried_moves.is_empty());
        assert_eq!(node.mover(), Mark::X);
    }

    #[test]
    fn test_mean_value() {
        let mut node = MctsNode::new_root(TicTacToe::new());

        // Unvisited
        assert!(node.mean_value().abs() < 1e-12);

        // After visits
        node.visit_count = 4;
        node.win_score = 3.0;
        assert!((node.mean_value() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_uct_score() {
        let mut node = MctsNode::new_root(TicTacToe::new());
        node.visit_count = 10;
        node.win_score = 6.0;

        let parent_visits: f64 = 100.0;
        let c = std::f64::consts::SQRT_2;

        // UCT = 0.6 + sqrt(2) * sqrt(ln(100) / 10) ≈ 0.6 + 0.9597 = 1.5597
        let uct = node.uct_score(parent_visits.ln(), c);
        assert!((uct - 1.5597).abs() < 1e-3);

        // c = 0 leaves only the exploitation term
        assert!((node.uct_score(parent_visits.ln(), 0.0) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_unvisited_uct_is_infinite() {
        let node = MctsNode::new_root(TicTacToe::new());
        assert!(node.uct_score(10f64.ln(), 1.0).is_infinite());
    }

    #[test]
    fn test_mover_alternates() {
        let root = TicTacToe::new();
        let child = root.apply_move(Move::new(0).unwrap()).unwrap();

        assert_eq!(MctsNode::new_root(root).mover(), Mark::O);
        assert_eq!(MctsNode::new_root(child).mover(), Mark::X);
    }
}
