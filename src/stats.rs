//! Statistics collection for tree builds
//!
//! This module provides structures for collecting and reporting statistics
//! about how a decision tree was built.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// Statistics collected while building one decision tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchStatistics {
    /// Total number of nodes in the tree
    pub nodes: usize,

    /// Number of terminal nodes
    pub leaves: usize,

    /// Branches that failed and contributed no edge
    pub dropped_branches: usize,

    /// Deepest ply reached
    pub max_ply: usize,

    /// Total time spent building the tree
    pub total_time: Duration,

    /// Whether the build ran out of time
    pub stopped_early: bool,
}

impl SearchStatistics {
    /// Creates a new, empty statistics object
    pub fn new() -> Self {
        SearchStatistics {
            nodes: 0,
            leaves: 0,
            dropped_branches: 0,
            max_ply: 0,
            total_time: Duration::from_secs(0),
            stopped_early: false,
        }
    }

    /// Returns the number of nodes built per second
    pub fn nodes_per_second(&self) -> f64 {
        if self.total_time.as_secs_f64() <= 0.0 {
            return 0.0;
        }
        self.nodes as f64 / self.total_time.as_secs_f64()
    }

    /// Returns a summary of the statistics as a string
    pub fn summary(&self) -> String {
        format!(
            "Search Statistics:\n\
             - Nodes: {}\n\
             - Leaves: {}\n\
             - Dropped branches: {}\n\
             - Max ply: {}\n\
             - Total time: {:.3} seconds\n\
             - Nodes per second: {:.1}\n\
             - Stopped early: {}",
            self.nodes,
            self.leaves,
            self.dropped_branches,
            self.max_ply,
            self.total_time.as_secs_f64(),
            self.nodes_per_second(),
            self.stopped_early
        )
    }
}

impl Default for SearchStatistics {
    fn default() -> Self {
        Self::new()
    }
}

/// Counters shared by the workers of one build
#[derive(Debug, Default)]
pub(crate) struct BuildCounters {
    nodes: AtomicUsize,
    leaves: AtomicUsize,
    dropped: AtomicUsize,
    max_ply: AtomicUsize,
    stopped_early: AtomicBool,
}

impl BuildCounters {
    pub(crate) fn node(&self, ply: usize) {
        self.nodes.fetch_add(1, Ordering::Relaxed);
        self.max_ply.fetch_max(ply, Ordering::Relaxed);
    }

    pub(crate) fn leaf(&self, ply: usize) {
        self.leaves.fetch_add(1, Ordering::Relaxed);
        self.node(ply);
    }

    pub(crate) fn dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn stop_early(&self) {
        self.stopped_early.store(true, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, total_time: Duration) -> SearchStatistics {
        SearchStatistics {
            nodes: self.nodes.load(Ordering::Relaxed),
            leaves: self.leaves.load(Ordering::Relaxed),
            dropped_branches: self.dropped.load(Ordering::Relaxed),
            max_ply: self.max_ply.load(Ordering::Relaxed),
            total_time,
            stopped_early: self.stopped_early.load(Ordering::Relaxed),
        }
    }
}
