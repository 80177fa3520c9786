//! Decision engine: build a tree, then pick the root action
//!
//! [`DecisionEngine`] ties the pieces together. For every decision request it
//! builds a fresh tree with a [`TreeBuilder`], then lets the configured
//! selection policy choose among the root edges. The tree can be kept as a
//! [`SearchTree`] and advanced along the chosen action, so the later phases of
//! the same turn reuse what was already explored.

use std::time::Instant;

use log::debug;
use rand::{RngCore, SeedableRng};

use crate::{
    action::{Action, DecisionType, Turn},
    builder::TreeBuilder,
    config::SearchConfig,
    game::{PlayerId, Snapshot},
    policy::{
        sampling::{RandomSampling, SamplingStrategy, SearchRng},
        selection::SelectionPolicy,
    },
    rules::GameRules,
    stats::SearchStatistics,
    tree::DecisionNode,
    Result, SearchError,
};

/// A built decision tree together with the player it was built for
#[derive(Debug, Clone)]
pub struct SearchTree {
    /// Root node of the tree
    pub root: DecisionNode,

    /// Player the tree was built for
    pub deciding: PlayerId,

    statistics: SearchStatistics,
}

impl SearchTree {
    pub fn new(root: DecisionNode, deciding: PlayerId, statistics: SearchStatistics) -> Self {
        SearchTree {
            root,
            deciding,
            statistics,
        }
    }

    /// Decision point at the root
    pub fn turn(&self) -> Turn {
        self.root.turn
    }

    /// Statistics of the build that produced this tree
    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    /// Makes the subtree reached by `action` the new root
    pub fn advance(self, action: &Action) -> Result<SearchTree> {
        let SearchTree {
            root,
            deciding,
            statistics,
        } = self;
        let root = root
            .into_child(action)
            .ok_or_else(|| SearchError::ActionNotInTree(action.clone()))?;
        Ok(SearchTree {
            root,
            deciding,
            statistics,
        })
    }
}

/// Bounded-depth game-tree search over Coins snapshots
pub struct DecisionEngine<R: GameRules> {
    rules: R,
    config: SearchConfig,
    sampling: Box<dyn SamplingStrategy>,
    selection: Box<dyn SelectionPolicy>,
    rng: SearchRng,
    pool: Option<rayon::ThreadPool>,
    statistics: SearchStatistics,
}

impl<R: GameRules> DecisionEngine<R> {
    /// Creates an engine with the default sampling strategy and the
    /// configured selection policy
    pub fn new(rules: R, config: SearchConfig) -> Self {
        let sampling: Box<dyn SamplingStrategy> =
            Box::new(RandomSampling::new(config.profile_depth));
        let selection = config.selection.policy();
        let rng = match config.seed {
            Some(seed) => SearchRng::seed_from_u64(seed),
            None => SearchRng::from_entropy(),
        };

        DecisionEngine {
            rules,
            config,
            sampling,
            selection,
            rng,
            pool: None,
            statistics: SearchStatistics::new(),
        }
    }

    /// Sets the sampling strategy used by the branch generator
    pub fn with_sampling_strategy<P: SamplingStrategy + 'static>(mut self, strategy: P) -> Self {
        self.sampling = Box::new(strategy);
        self
    }

    /// Sets the selection policy
    pub fn with_selection_policy<P: SelectionPolicy + 'static>(mut self, policy: P) -> Self {
        self.selection = Box::new(policy);
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    /// Statistics of the most recent tree build
    pub fn get_statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    /// Builds a tree for the decision and returns the best action
    pub fn choose_action(
        &mut self,
        snapshot: &Snapshot,
        player: PlayerId,
        decision: DecisionType,
    ) -> Result<Action> {
        let tree = self.build_tree(snapshot, player, decision)?;
        self.select(&tree)
    }

    /// Builds the full decision tree for `player` facing `decision`
    pub fn build_tree(
        &mut self,
        snapshot: &Snapshot,
        player: PlayerId,
        decision: DecisionType,
    ) -> Result<SearchTree> {
        self.config.validate()?;
        snapshot.player(player)?;
        self.prepare_thread_pool()?;

        let turn = Turn::new(player, decision, snapshot.round);
        let horizon = snapshot.round.saturating_add(self.config.max_depth);
        let started = Instant::now();
        // A budget past the end of the clock means no deadline
        let deadline = self
            .config
            .max_time
            .and_then(|budget| started.checked_add(budget));
        let mut rng = SearchRng::seed_from_u64(self.rng.next_u64());

        let builder = TreeBuilder::new(
            &self.rules,
            self.sampling.as_ref(),
            self.config.scoring,
            player,
            horizon,
        )
        .with_deadline(deadline);

        let root = match &self.pool {
            Some(pool) => pool.install(|| builder.build(snapshot.clone(), turn, 0, &mut rng)),
            None => builder.build(snapshot.clone(), turn, 0, &mut rng),
        }?;

        self.statistics = builder.statistics(started);
        debug!(
            "Built tree for {}: {} nodes, {} leaves, {} dropped, {:.3}s",
            turn,
            self.statistics.nodes,
            self.statistics.leaves,
            self.statistics.dropped_branches,
            self.statistics.total_time.as_secs_f64()
        );

        Ok(SearchTree::new(root, player, self.statistics.clone()))
    }

    /// Picks the root action of a built tree for its deciding player
    pub fn select(&mut self, tree: &SearchTree) -> Result<Action> {
        let index = self
            .selection
            .select_edge(&tree.root, tree.deciding, &mut self.rng)
            .ok_or(SearchError::NoLegalActions)?;
        Ok(tree.root.edges[index].action.clone())
    }

    /// Returns a text rendering of a tree, limited to `max_depth` levels
    pub fn visualize_tree(&self, tree: &SearchTree, max_depth: usize) -> String {
        tree.root.render(max_depth)
    }

    fn prepare_thread_pool(&mut self) -> Result<()> {
        let threads = match self.config.max_threads {
            Some(threads) => threads,
            None => {
                self.pool = None;
                return Ok(());
            }
        };

        let reusable = self
            .pool
            .as_ref()
            .map_or(false, |pool| pool.current_num_threads() == threads);
        if !reusable {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|err| SearchError::ThreadPool(err.to_string()))?;
            self.pool = Some(pool);
        }
        Ok(())
    }
}
