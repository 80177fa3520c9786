//! Sampling strategies used to prune the branch generator
//!
//! Branching grows with achievable cells, attack sizes and unit allocations.
//! A sampling strategy decides which of these candidates the generator keeps.
//! Strategies draw randomness only from the [`SearchRng`] they are handed, so
//! a seeded search is reproducible.

use rand::{seq::index, Rng};
use rand_chacha::ChaCha8Rng;

/// Random number generator threaded through the search
pub type SearchRng = ChaCha8Rng;

/// Trait for strategies that prune candidate actions
pub trait SamplingStrategy: Send + Sync {
    /// Whether interchangeable cells are collapsed into one representative
    fn clusters_cells(&self) -> bool;

    /// Whether the neighbour profile distinguishes cells at this ply
    fn compares_neighbors(&self, ply: usize) -> bool;

    /// Index of the cell kept from a cluster of `cluster_len` cells
    fn representative(&self, cluster_len: usize, rng: &mut SearchRng) -> usize;

    /// Attack sizes in `min..=max` worth exploring at this ply, ascending
    fn attack_sizes(&self, min: usize, max: usize, ply: usize, rng: &mut SearchRng) -> Vec<usize>;

    /// Maximum number of unit allocations kept, `None` for no limit
    fn distribution_limit(&self, owned_cells: usize) -> Option<usize>;

    /// Create a boxed clone of this strategy
    fn clone_box(&self) -> Box<dyn SamplingStrategy>;
}

/// Default pruning strategy
///
/// Clusters cells, halves the number of attack sizes every two plies and
/// keeps one unit allocation per owned cell.
#[derive(Debug, Clone)]
pub struct RandomSampling {
    /// Plies below which neighbour profiles take part in clustering
    pub profile_depth: usize,
}

impl RandomSampling {
    pub fn new(profile_depth: usize) -> Self {
        RandomSampling { profile_depth }
    }

    /// Number of attack sizes kept out of `count` at this ply
    pub fn attack_width(count: usize, ply: usize) -> usize {
        let shift = u32::try_from(ply / 2).unwrap_or(u32::MAX);
        count.checked_shr(shift).unwrap_or(0).max(1).min(count)
    }
}

impl Default for RandomSampling {
    fn default() -> Self {
        Self::new(2)
    }
}

impl SamplingStrategy for RandomSampling {
    fn clusters_cells(&self) -> bool {
        true
    }

    fn compares_neighbors(&self, ply: usize) -> bool {
        ply < self.profile_depth
    }

    fn representative(&self, cluster_len: usize, rng: &mut SearchRng) -> usize {
        if cluster_len <= 1 {
            return 0;
        }
        rng.gen_range(0..cluster_len)
    }

    fn attack_sizes(&self, min: usize, max: usize, ply: usize, rng: &mut SearchRng) -> Vec<usize> {
        if max < min {
            return Vec::new();
        }
        let count = max - min + 1;
        let width = Self::attack_width(count, ply);
        let mut picked = index::sample(rng, count, width).into_vec();
        picked.sort_unstable();
        picked.into_iter().map(|offset| min + offset).collect()
    }

    fn distribution_limit(&self, owned_cells: usize) -> Option<usize> {
        Some(owned_cells.max(1))
    }

    fn clone_box(&self) -> Box<dyn SamplingStrategy> {
        Box::new(self.clone())
    }
}

/// Strategy that keeps every candidate
///
/// Useful for small boards and for tests that need the full branch set.
#[derive(Debug, Clone, Default)]
pub struct ExhaustiveSampling;

impl ExhaustiveSampling {
    pub fn new() -> Self {
        ExhaustiveSampling
    }
}

impl SamplingStrategy for ExhaustiveSampling {
    fn clusters_cells(&self) -> bool {
        false
    }

    fn compares_neighbors(&self, _ply: usize) -> bool {
        true
    }

    fn representative(&self, _cluster_len: usize, _rng: &mut SearchRng) -> usize {
        0
    }

    fn attack_sizes(&self, min: usize, max: usize, _ply: usize, _rng: &mut SearchRng) -> Vec<usize> {
        (min..=max).collect()
    }

    fn distribution_limit(&self, _owned_cells: usize) -> Option<usize> {
        None
    }

    fn clone_box(&self) -> Box<dyn SamplingStrategy> {
        Box::new(self.clone())
    }
}

// Implement SamplingStrategy for Box<dyn SamplingStrategy>
impl SamplingStrategy for Box<dyn SamplingStrategy> {
    fn clusters_cells(&self) -> bool {
        (**self).clusters_cells()
    }

    fn compares_neighbors(&self, ply: usize) -> bool {
        (**self).compares_neighbors(ply)
    }

    fn representative(&self, cluster_len: usize, rng: &mut SearchRng) -> usize {
        (**self).representative(cluster_len, rng)
    }

    fn attack_sizes(&self, min: usize, max: usize, ply: usize, rng: &mut SearchRng) -> Vec<usize> {
        (**self).attack_sizes(min, max, ply, rng)
    }

    fn distribution_limit(&self, owned_cells: usize) -> Option<usize> {
        (**self).distribution_limit(owned_cells)
    }

    fn clone_box(&self) -> Box<dyn SamplingStrategy> {
        (**self).clone_box()
    }
}
