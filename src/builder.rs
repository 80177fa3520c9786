//! Concurrent construction of decision trees
//!
//! The builder expands every candidate action of a node on its own clone of
//! the snapshot. Siblings run as rayon tasks; each returns its own optional
//! edge and the parent collects them once all siblings have finished, then
//! merges their statistics. Nothing is shared between branches except the
//! read-only parent snapshot and a few atomic counters.

use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use log::warn;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;

use crate::{
    action::{Action, DecisionType, Turn},
    game::{PlayerId, Snapshot},
    generator::BranchGenerator,
    policy::{
        sampling::{SamplingStrategy, SearchRng},
        scoring::Scoring,
    },
    rules::GameRules,
    stats::{BuildCounters, SearchStatistics},
    tree::{DecisionNode, Edge},
    Result, SearchError,
};

/// Builds one decision tree for one deciding player
pub struct TreeBuilder<'a, R: GameRules + ?Sized> {
    rules: &'a R,
    generator: BranchGenerator<'a>,
    scoring: Scoring,
    deciding: PlayerId,
    horizon: u32,
    deadline: Option<Instant>,
    counters: BuildCounters,
}

impl<'a, R: GameRules + ?Sized> TreeBuilder<'a, R> {
    /// Creates a builder
    ///
    /// The simulation stops when `deciding` is about to start its turn in
    /// round `horizon`.
    pub fn new(
        rules: &'a R,
        sampling: &'a dyn SamplingStrategy,
        scoring: Scoring,
        deciding: PlayerId,
        horizon: u32,
    ) -> Self {
        TreeBuilder {
            rules,
            generator: BranchGenerator::new(sampling),
            scoring,
            deciding,
            horizon,
            deadline: None,
            counters: BuildCounters::default(),
        }
    }

    /// Turns nodes reached after `deadline` into terminal nodes
    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Statistics of everything built so far
    pub fn statistics(&self, started: Instant) -> SearchStatistics {
        self.counters.snapshot(started.elapsed())
    }

    /// Builds the subtree rooted at `turn`
    ///
    /// `ply` is the distance from the search root. Branches that fail below
    /// this node are logged and left out; a node left without branches
    /// becomes terminal. Only a failure to generate this node's own actions
    /// is returned as an error.
    pub fn build(
        &self,
        snapshot: Snapshot,
        turn: Turn,
        ply: usize,
        rng: &mut SearchRng,
    ) -> Result<DecisionNode> {
        if self.out_of_time() {
            self.counters.stop_early();
            return Ok(self.terminal(snapshot, turn, ply));
        }

        let actions = self.generator.generate(&snapshot, &turn, ply, rng)?;
        let seeds: Vec<u64> = actions.iter().map(|_| rng.next_u64()).collect();

        let branches: Vec<Option<Edge>> = actions
            .into_par_iter()
            .zip(seeds)
            .map(|(action, seed)| self.expand(&snapshot, turn, action, ply, seed))
            .collect();
        let edges: Vec<Edge> = branches.into_iter().flatten().collect();

        if edges.is_empty() {
            return Ok(self.terminal(snapshot, turn, ply));
        }

        let stats = self
            .scoring
            .aggregate(edges.iter().map(|edge| &edge.child.stats))?
            .ok_or(SearchError::NoLegalActions)?;
        self.counters.node(ply);
        Ok(DecisionNode { turn, edges, stats })
    }

    /// Runs one branch, turning an error or a panic into a dropped branch
    fn expand(
        &self,
        snapshot: &Snapshot,
        turn: Turn,
        action: Action,
        ply: usize,
        seed: u64,
    ) -> Option<Edge> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.expand_branch(snapshot, turn, &action, ply, seed)
        }));

        match outcome {
            Ok(Ok(Some(child))) => Some(Edge {
                player: turn.player,
                action,
                child: Box::new(child),
            }),
            Ok(Ok(None)) => None,
            Ok(Err(err)) => {
                warn!("Branch {} at {} failed: {}, dropping it", action, turn, err);
                self.counters.dropped();
                None
            }
            Err(_) => {
                warn!("Branch {} at {} panicked, dropping it", action, turn);
                self.counters.dropped();
                None
            }
        }
    }

    fn expand_branch(
        &self,
        snapshot: &Snapshot,
        turn: Turn,
        action: &Action,
        ply: usize,
        seed: u64,
    ) -> Result<Option<DecisionNode>> {
        let mut state = snapshot.clone();
        if let Err(err) = self.rules.apply(&mut state, turn.player, action) {
            warn!("Branch {} at {} rejected: {}", action, turn, err);
            self.counters.dropped();
            return Ok(None);
        }

        let next = turn.next(action, &state);
        let wrapped = next.round > turn.round;
        state.round = next.round;
        let child = if self.is_horizon(&next) {
            self.terminal(state, next, ply + 1)
        } else {
            if wrapped {
                self.rules.accrue_coins(&mut state);
            }
            let mut rng = SearchRng::seed_from_u64(seed);
            self.build(state, next, ply + 1, &mut rng)?
        };

        self.check_mergeable(&child, snapshot)?;
        Ok(Some(child))
    }

    /// Rejects a child whose statistic cannot be merged with its siblings
    fn check_mergeable(&self, child: &DecisionNode, parent: &Snapshot) -> Result<()> {
        if child.stats.scoring() != self.scoring {
            return Err(SearchError::IncompatibleStatistics(format!(
                "{:?} tree received {:?} statistics",
                self.scoring,
                child.stats.scoring()
            )));
        }
        if child.stats.player_count() != parent.player_count() {
            return Err(SearchError::IncompatibleStatistics(format!(
                "{} players vs {} players",
                parent.player_count(),
                child.stats.player_count()
            )));
        }
        Ok(())
    }

    /// Scores a final snapshot after a last coin accrual
    fn terminal(&self, mut snapshot: Snapshot, turn: Turn, ply: usize) -> DecisionNode {
        self.rules.accrue_coins(&mut snapshot);
        self.counters.leaf(ply);
        DecisionNode::leaf(turn, self.scoring.evaluate(&snapshot))
    }

    fn is_horizon(&self, turn: &Turn) -> bool {
        turn.player == self.deciding
            && turn.decision == DecisionType::DeclineRace
            && turn.round >= self.horizon
    }

    fn out_of_time(&self) -> bool {
        self.deadline
            .map_or(false, |deadline| Instant::now() >= deadline)
    }
}
