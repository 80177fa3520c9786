//! Tree data structures for the decision search
//!
//! A tree is built bottom-up: a [`DecisionNode`] only exists once all of its
//! children have been built and their statistics merged. Nodes are immutable
//! afterwards.

use std::fmt::Write as _;

use crate::{
    action::{Action, Turn},
    game::PlayerId,
    policy::scoring::NodeStats,
};

/// A decision point in the search tree
#[derive(Debug, Clone)]
pub struct DecisionNode {
    /// The decision this node stands for
    ///
    /// For terminal nodes this is the decision the simulation stopped at.
    pub turn: Turn,

    /// Outgoing edges, in generation order
    pub edges: Vec<Edge>,

    /// Statistic aggregated over every terminal state below this node
    pub stats: NodeStats,
}

/// An action taken by a player, leading to a child node
#[derive(Debug, Clone)]
pub struct Edge {
    /// Player who took the action
    pub player: PlayerId,

    /// The action taken
    pub action: Action,

    /// Node reached by the action
    pub child: Box<DecisionNode>,
}

impl DecisionNode {
    /// Creates a terminal node
    pub fn leaf(turn: Turn, stats: NodeStats) -> Self {
        DecisionNode {
            turn,
            edges: Vec::new(),
            stats,
        }
    }

    /// Returns true if this node has no outgoing edges
    pub fn is_terminal(&self) -> bool {
        self.edges.is_empty()
    }

    /// Player acting on the outgoing edges
    pub fn mover(&self) -> Option<PlayerId> {
        self.edges.first().map(|edge| edge.player)
    }

    /// Total number of nodes in this subtree
    pub fn size(&self) -> usize {
        1 + self
            .edges
            .iter()
            .map(|edge| edge.child.size())
            .sum::<usize>()
    }

    /// Number of terminal nodes in this subtree
    pub fn leaf_count(&self) -> usize {
        if self.is_terminal() {
            return 1;
        }
        self.edges.iter().map(|edge| edge.child.leaf_count()).sum()
    }

    /// Length of the longest path to a terminal node
    pub fn height(&self) -> usize {
        self.edges
            .iter()
            .map(|edge| edge.child.height() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Child reached by `action`
    pub fn child(&self, action: &Action) -> Option<&DecisionNode> {
        self.edges
            .iter()
            .find(|edge| &edge.action == action)
            .map(|edge| edge.child.as_ref())
    }

    /// Consumes the node and returns the child reached by `action`
    pub fn into_child(self, action: &Action) -> Option<DecisionNode> {
        self.edges
            .into_iter()
            .find(|edge| &edge.action == action)
            .map(|edge| *edge.child)
    }

    /// Renders the subtree as indented text, down to `max_depth` levels
    pub fn render(&self, max_depth: usize) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "{} ({})", self.turn, self.stats);
        self.render_edges(1, max_depth, &mut output);
        output
    }

    fn render_edges(&self, depth: usize, max_depth: usize, output: &mut String) {
        if depth > max_depth {
            return;
        }
        let indent = "  ".repeat(depth);
        for edge in &self.edges {
            let _ = writeln!(
                output,
                "{}{} {} ({})",
                indent, edge.player, edge.action, edge.child.stats
            );
            edge.child.render_edges(depth + 1, max_depth, output);
        }
    }
}
