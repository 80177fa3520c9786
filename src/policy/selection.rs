//! Selection policies for choosing the root action
//!
//! A selection policy looks at a finished tree and picks one of the root's
//! edges for the deciding player. Every policy keeps all edges whose value is
//! within [`TOLERANCE`] of the best one and picks among them uniformly at
//! random, so edge order never biases the choice.

use rand::seq::SliceRandom;

use crate::{
    game::PlayerId,
    policy::{
        sampling::SearchRng,
        scoring::Bound,
    },
    tree::DecisionNode,
    utils::{approx_eq, TOLERANCE},
};

/// Which selection algorithm a search uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selection {
    /// Best edge by optimistic value (upper coin bound)
    Max,
    /// Best edge by pessimistic value (lower coin bound)
    Min,
    /// Alternating maximise/minimise walk for the deciding player
    Minimax,
    /// Every mover maximises its own value
    MaxN,
}

impl Selection {
    /// Creates the policy implementing this selection
    pub fn policy(self) -> Box<dyn SelectionPolicy> {
        match self {
            Selection::Max => Box::new(MaxPolicy::new()),
            Selection::Min => Box::new(MinPolicy::new()),
            Selection::Minimax => Box::new(MinimaxPolicy::new()),
            Selection::MaxN => Box::new(MaxNPolicy::new()),
        }
    }
}

/// Trait for policies that select the root edge
pub trait SelectionPolicy: Send + Sync {
    /// Selects an edge index of `node` for `deciding`, `None` if there are no edges
    fn select_edge(
        &self,
        node: &DecisionNode,
        deciding: PlayerId,
        rng: &mut SearchRng,
    ) -> Option<usize>;

    /// Create a boxed clone of this policy
    fn clone_box(&self) -> Box<dyn SelectionPolicy>;
}

/// Picks uniformly among the values within tolerance of the extremum
pub fn pick_extremum(values: &[f64], maximize: bool, rng: &mut SearchRng) -> Option<usize> {
    let best = if maximize {
        values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    } else {
        values.iter().copied().fold(f64::INFINITY, f64::min)
    };

    let candidates: Vec<usize> = values
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v == best || approx_eq(v, best))
        .map(|(i, _)| i)
        .collect();
    candidates.choose(rng).copied()
}

/// Picks the root edge with the highest optimistic value
///
/// Win rate, upper coin bound or coin differential, depending on the scoring
/// of the tree.
#[derive(Debug, Clone, Default)]
pub struct MaxPolicy;

impl MaxPolicy {
    pub fn new() -> Self {
        MaxPolicy
    }
}

impl SelectionPolicy for MaxPolicy {
    fn select_edge(
        &self,
        node: &DecisionNode,
        deciding: PlayerId,
        rng: &mut SearchRng,
    ) -> Option<usize> {
        let values: Vec<f64> = node
            .edges
            .iter()
            .map(|edge| edge.child.stats.value(deciding, Bound::Upper))
            .collect();
        pick_extremum(&values, true, rng)
    }

    fn clone_box(&self) -> Box<dyn SelectionPolicy> {
        Box::new(self.clone())
    }
}

/// Picks the root edge with the best pessimistic value
///
/// Uses the lower coin bound, so the chosen edge guarantees the most coins
/// whatever happens below it.
#[derive(Debug, Clone, Default)]
pub struct MinPolicy;

impl MinPolicy {
    pub fn new() -> Self {
        MinPolicy
    }
}

impl SelectionPolicy for MinPolicy {
    fn select_edge(
        &self,
        node: &DecisionNode,
        deciding: PlayerId,
        rng: &mut SearchRng,
    ) -> Option<usize> {
        let values: Vec<f64> = node
            .edges
            .iter()
            .map(|edge| edge.child.stats.value(deciding, Bound::Lower))
            .collect();
        pick_extremum(&values, true, rng)
    }

    fn clone_box(&self) -> Box<dyn SelectionPolicy> {
        Box::new(self.clone())
    }
}

/// Minimax over any number of players
///
/// Nodes where the deciding player moves maximise its value, every other
/// node minimises it.
#[derive(Debug, Clone, Default)]
pub struct MinimaxPolicy;

impl MinimaxPolicy {
    pub fn new() -> Self {
        MinimaxPolicy
    }

    /// Minimax value of a subtree for the deciding player
    pub fn value(node: &DecisionNode, deciding: PlayerId) -> f64 {
        let mover = match node.mover() {
            Some(mover) => mover,
            None => return node.stats.value(deciding, Bound::Upper),
        };

        let values = node
            .edges
            .iter()
            .map(|edge| Self::value(&edge.child, deciding));
        if mover == deciding {
            values.fold(f64::NEG_INFINITY, f64::max)
        } else {
            values.fold(f64::INFINITY, f64::min)
        }
    }
}

impl SelectionPolicy for MinimaxPolicy {
    fn select_edge(
        &self,
        node: &DecisionNode,
        deciding: PlayerId,
        rng: &mut SearchRng,
    ) -> Option<usize> {
        let maximize = node.mover()? == deciding;
        let values: Vec<f64> = node
            .edges
            .iter()
            .map(|edge| Self::value(&edge.child, deciding))
            .collect();
        pick_extremum(&values, maximize, rng)
    }

    fn clone_box(&self) -> Box<dyn SelectionPolicy> {
        Box::new(self.clone())
    }
}

/// Max^n search for games with more than two players
///
/// Every subtree yields one value per player; the mover at each node takes
/// the child that is best for itself.
#[derive(Debug, Clone, Default)]
pub struct MaxNPolicy;

impl MaxNPolicy {
    pub fn new() -> Self {
        MaxNPolicy
    }

    /// Max^n value vector of a subtree
    pub fn values(node: &DecisionNode) -> Vec<f64> {
        let mover = match node.mover() {
            Some(mover) => mover.0,
            None => return node.stats.values(Bound::Upper),
        };

        let own = |values: &[f64]| values.get(mover).copied().unwrap_or(f64::NEG_INFINITY);
        let mut best: Option<Vec<f64>> = None;
        for edge in &node.edges {
            let candidate = Self::values(&edge.child);
            let better = match &best {
                None => true,
                Some(current) => own(&candidate) > own(current) + TOLERANCE,
            };
            if better {
                best = Some(candidate);
            }
        }
        best.unwrap_or_else(|| node.stats.values(Bound::Upper))
    }
}

impl SelectionPolicy for MaxNPolicy {
    fn select_edge(
        &self,
        node: &DecisionNode,
        _deciding: PlayerId,
        rng: &mut SearchRng,
    ) -> Option<usize> {
        let mover = node.mover()?.0;
        let values: Vec<f64> = node
            .edges
            .iter()
            .map(|edge| {
                Self::values(&edge.child)
                    .get(mover)
                    .copied()
                    .unwrap_or(f64::NEG_INFINITY)
            })
            .collect();
        pick_extremum(&values, true, rng)
    }

    fn clone_box(&self) -> Box<dyn SelectionPolicy> {
        Box::new(self.clone())
    }
}

// Implement SelectionPolicy for Box<dyn SelectionPolicy>
impl SelectionPolicy for Box<dyn SelectionPolicy> {
    fn select_edge(
        &self,
        node: &DecisionNode,
        deciding: PlayerId,
        rng: &mut SearchRng,
    ) -> Option<usize> {
        (**self).select_edge(node, deciding, rng)
    }

    fn clone_box(&self) -> Box<dyn SelectionPolicy> {
        (**self).clone_box()
    }
}
