//! MCTS tree structure with arena allocation.
//!
//! The tree uses arena allocation for efficient node storage and
//! cache-friendly traversal. Nodes are stored in a contiguous Vec
//! and referenced by NodeId indices; a node's parent link is an index,
//! so ownership flows strictly from the arena down.

use std::collections::VecDeque;

use engine_core::{Game, Outcome};
use rand::Rng;
use rand_chacha::ChaCha20Rng;

use crate::node::{MctsNode, NodeId};
use crate::search::SearchError;

/// Reward for a win by the player who moved into a node.
pub const WIN_REWARD: f64 = 1.0;

/// Reward for a drawn simulation.
pub const DRAW_REWARD: f64 = 0.0;

/// MCTS tree with arena-based node storage.
#[derive(Debug, Clone)]
pub struct MctsTree<G: Game> {
    /// Arena storing all nodes
    nodes: Vec<MctsNode<G>>,

    /// Root node index (always 0 after initialization)
    root: NodeId,
}

impl<G: Game> MctsTree<G> {
    /// Create a new tree with the given root state.
    pub fn new(root_state: G) -> Self {
        Self {
            nodes: vec![MctsNode::new_root(root_state)],
            root: NodeId(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &MctsNode<G> {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode<G> {
        &mut self.nodes[id.0 as usize]
    }

    /// Allocate a new node and return its ID.
    pub fn allocate(&mut self, node: MctsNode<G>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (should never be true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the arena slice for read access.
    #[inline]
    pub fn arena(&self) -> &[MctsNode<G>] {
        &self.nodes
    }

    /// Expand one untried move of a node into a new child.
    ///
    /// The move is drawn uniformly at random from the untried set and removed
    /// from it, so each move is expanded at most once.
    pub fn expand(&mut self, node_id: NodeId, rng: &mut ChaCha20Rng) -> Result<NodeId, SearchError> {
        let node = self.get_mut(node_id);
        if node.is_terminal {
            return Err(SearchError::Logic(format!(
                "expand called on terminal node {}",
                node_id.0
            )));
        }
        if node.untried_moves.is_empty() {
            return Err(SearchError::Logic(format!(
                "expand called on fully expanded node {}",
                node_id.0
            )));
        }

        let index = rng.gen_range(0..node.untried_moves.len());
        let mv = node.untried_moves.swap_remove(index);
        let child_state = node.state.apply_move(mv)?;

        Ok(self.add_child(node_id, mv, child_state))
    }

    /// Add a child to a parent node.
    /// Returns the new child's NodeId.
    pub fn add_child(&mut self, parent_id: NodeId, mv: G::Move, state: G) -> NodeId {
        let child = MctsNode::new_child(parent_id, Some(mv), state);
        let child_id = self.allocate(child);

        // Add to parent's children
        self.get_mut(parent_id).children.push(child_id);

        child_id
    }

    /// Select the child of a node with the highest UCT score.
    ///
    /// Ties go to the first maximal child in creation order.
    pub fn best_child_uct(&self, node_id: NodeId, exploration_constant: f64) -> Option<NodeId> {
        let node = self.get(node_id);
        // Pre-compute ln once instead of per child
        let parent_visits_ln = (node.visit_count.max(1) as f64).ln();

        self.first_max_by(node_id, |child| {
            child.uct_score(parent_visits_ln, exploration_constant)
        })
    }

    /// Child with the largest visit count (ties to the first in creation order).
    pub fn most_visited_child(&self, node_id: NodeId) -> Option<NodeId> {
        self.first_max_by(node_id, |child| child.visit_count as f64)
    }

    /// Child with the highest average win score (ties to the first in creation order).
    pub fn highest_win_rate_child(&self, node_id: NodeId) -> Option<NodeId> {
        self.first_max_by(node_id, |child| child.mean_value())
    }

    fn first_max_by<F>(&self, node_id: NodeId, score: F) -> Option<NodeId>
    where
        F: Fn(&MctsNode<G>) -> f64,
    {
        let mut best: Option<(NodeId, f64)> = None;
        for &child_id in &self.get(node_id).children {
            let s = score(self.get(child_id));
            match best {
                Some((_, best_score)) if s <= best_score => {}
                _ => best = Some((child_id, s)),
            }
        }
        best.map(|(id, _)| id)
    }

    /// Backpropagate a simulation outcome from a node to the root.
    ///
    /// Every node on the path gets one more visit and a reward from the
    /// perspective of the player who moved into it: `WIN_REWARD` if that
    /// player won, `DRAW_REWARD` for a draw, `loss_reward` otherwise.
    pub fn backpropagate(&mut self, leaf_id: NodeId, outcome: Outcome<G::Player>, loss_reward: f64) {
        let mut current_id = leaf_id;

        while current_id.is_some() {
            let node = self.get_mut(current_id);
            let r = reward(node.mover(), outcome, loss_reward);
            node.visit_count += 1;
            node.win_score += r;
            current_id = node.parent;
        }
    }

    /// Per-child statistics of a node, in creation order.
    pub fn child_stats(&self, node_id: NodeId) -> Vec<ChildStats<G::Move>> {
        self.get(node_id)
            .children
            .iter()
            .filter_map(|&id| {
                let child = self.get(id);
                child.mv.map(|mv| ChildStats {
                    mv,
                    visits: child.visit_count,
                    win_score: child.win_score,
                    win_rate: child.mean_value(),
                })
            })
            .collect()
    }

    /// Re-root the tree at the root's child reached by `mv`.
    ///
    /// Returns a compacted tree holding only that child's subtree, with the
    /// new root's parent link cleared. Sibling subtrees are dropped. Returns
    /// `None` if `mv` was never expanded from the root.
    pub fn advance(&self, mv: G::Move) -> Option<Self> {
        let child_id = self
            .get(self.root)
            .children
            .iter()
            .copied()
            .find(|&id| self.get(id).mv == Some(mv))?;

        let mut nodes: Vec<MctsNode<G>> = Vec::new();
        let mut queue = VecDeque::from([(child_id, NodeId::NONE)]);

        // Breadth-first copy keeps each child list in its original order.
        while let Some((old_id, new_parent)) = queue.pop_front() {
            let new_id = NodeId(nodes.len() as u32);
            let old = self.get(old_id);

            let mut node = old.clone();
            node.parent = new_parent;
            node.children = Vec::with_capacity(old.children.len());
            nodes.push(node);

            if new_parent.is_some() {
                nodes[new_parent.0 as usize].children.push(new_id);
            }
            queue.extend(old.children.iter().map(|&c| (c, new_id)));
        }

        nodes[0].mv = None;
        Some(Self {
            nodes,
            root: NodeId(0),
        })
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visit_count,
            max_depth: self.compute_max_depth(self.root, 0),
        }
    }

    fn compute_max_depth(&self, node_id: NodeId, current_depth: u32) -> u32 {
        let node = self.get(node_id);
        if node.children.is_empty() {
            return current_depth;
        }

        node.children
            .iter()
            .map(|id| self.compute_max_depth(*id, current_depth + 1))
            .max()
            .unwrap_or(current_depth)
    }
}

/// Reward for `mover` given a simulated outcome.
fn reward<P: PartialEq>(mover: P, outcome: Outcome<P>, loss_reward: f64) -> f64 {
    match outcome {
        Outcome::Win(winner) if winner == mover => WIN_REWARD,
        Outcome::Win(_) => loss_reward,
        Outcome::Draw | Outcome::InProgress => DRAW_REWARD,
    }
}

/// Statistics of one child of a node.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildStats<M> {
    pub mv: M,
    pub visits: u32,
    pub win_score: f64,
    pub win_rate: f64,
}

/// Statistics about an MCTS tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub max_depth: u32,
}
