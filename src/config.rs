//! Configuration options for the decision search
//!
//! This module defines the parameters that control how deep the search looks,
//! how terminal states are scored and how the root action is chosen.

use std::time::Duration;

use crate::{
    policy::{scoring::Scoring, selection::Selection},
    Result, SearchError,
};

/// Configuration for the decision search
///
/// Use the builder methods to create a customized configuration.
///
/// # Example
///
/// ```
/// use coins_search::{SearchConfig, Scoring, Selection};
/// use std::time::Duration;
///
/// let config = SearchConfig::default()
///     .with_max_depth(2)
///     .with_scoring(Scoring::CoinValue)
///     .with_selection(Selection::Minimax)
///     .with_max_threads(4)
///     .with_max_time(Duration::from_secs(5))
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Number of rounds simulated past the current decision
    ///
    /// The simulation stops when the deciding player is about to start its
    /// turn in round `start + max_depth`.
    pub max_depth: u32,

    /// How terminal states are scored and merged
    pub scoring: Scoring,

    /// How the root action is picked
    pub selection: Selection,

    /// Worker threads for sibling expansion
    ///
    /// `None` uses rayon's global pool.
    pub max_threads: Option<usize>,

    /// Wall-clock budget for building one tree
    ///
    /// Nodes still unexpanded when the budget runs out become terminal.
    pub max_time: Option<Duration>,

    /// Seed for pruning and tie-breaking; `None` seeds from entropy
    pub seed: Option<u64>,

    /// Plies below which neighbour profiles take part in cell clustering
    pub profile_depth: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_depth: 1,
            scoring: Scoring::WinRate,
            selection: Selection::Max,
            max_threads: None,
            max_time: None,
            seed: None,
            profile_depth: 2,
        }
    }
}

impl SearchConfig {
    /// Sets the number of simulated rounds
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    /// Sets the scoring policy
    pub fn with_scoring(mut self, scoring: Scoring) -> Self {
        self.scoring = scoring;
        self
    }

    /// Sets the selection policy
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Sets the number of worker threads
    pub fn with_max_threads(mut self, threads: usize) -> Self {
        self.max_threads = Some(threads);
        self
    }

    /// Sets the wall-clock budget for one tree
    pub fn with_max_time(mut self, duration: Duration) -> Self {
        self.max_time = Some(duration);
        self
    }

    /// Sets the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the depth below which neighbour profiles are compared
    pub fn with_profile_depth(mut self, depth: usize) -> Self {
        self.profile_depth = depth;
        self
    }

    /// Checks that the configuration can drive a search
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(SearchError::InvalidConfiguration(
                "max_depth must be at least 1".to_string(),
            ));
        }
        if self.max_threads == Some(0) {
            return Err(SearchError::InvalidConfiguration(
                "max_threads must be at least 1".to_string(),
            ));
        }
        if self.max_time == Some(Duration::ZERO) {
            return Err(SearchError::InvalidConfiguration(
                "max_time must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
