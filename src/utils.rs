//! Utility functions for the search
//!
//! Small numeric and combinatorial helpers shared by the generator, the
//! aggregator and the selection policies.

use rand::Rng;

/// Values closer than this are treated as equal when picking the best edge
pub const TOLERANCE: f64 = 1e-9;

/// Returns true if two values are equal within [`TOLERANCE`]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= TOLERANCE
}

/// Safely calculates the win rate from wins and cases
///
/// Returns 0.0 if no cases have been counted.
pub fn win_rate(wins: u64, cases: u64) -> f64 {
    if cases == 0 {
        return 0.0;
    }
    wins as f64 / cases as f64
}

/// Visits every weak composition of `total` into `parts` ordered parts
///
/// Parts may be zero. The recursion fixes the first part and splits the
/// remainder over the other parts, so compositions arrive in lexicographic
/// order of their first parts descending.
pub fn for_each_composition<F>(total: usize, parts: usize, visit: &mut F)
where
    F: FnMut(&[usize]),
{
    if parts == 0 {
        if total == 0 {
            visit(&[]);
        }
        return;
    }
    let mut current = Vec::with_capacity(parts);
    compose(total, parts, &mut current, visit);
}

fn compose<F>(remaining: usize, parts: usize, current: &mut Vec<usize>, visit: &mut F)
where
    F: FnMut(&[usize]),
{
    if parts == 1 {
        current.push(remaining);
        visit(current);
        current.pop();
        return;
    }
    for first in (0..=remaining).rev() {
        current.push(first);
        compose(remaining - first, parts - 1, current, visit);
        current.pop();
    }
}

/// Number of weak compositions of `total` into `parts` parts
pub fn composition_count(total: usize, parts: usize) -> u128 {
    if parts == 0 {
        return u128::from(total == 0);
    }
    // C(total + parts - 1, parts - 1)
    let n = (total + parts - 1) as u128;
    let k = (parts - 1) as u128;
    let k = k.min(n - k);
    (0..k).fold(1u128, |acc, i| acc * (n - i) / (i + 1))
}

/// Uniform reservoir sample over a stream of unknown length
#[derive(Debug, Clone)]
pub struct Reservoir<T> {
    capacity: usize,
    seen: usize,
    items: Vec<T>,
}

impl<T> Reservoir<T> {
    pub fn new(capacity: usize) -> Self {
        Reservoir {
            capacity,
            seen: 0,
            items: Vec::with_capacity(capacity),
        }
    }

    /// Offers one item to the sample
    pub fn offer<R: Rng + ?Sized>(&mut self, item: T, rng: &mut R) {
        self.seen += 1;
        if self.items.len() < self.capacity {
            self.items.push(item);
            return;
        }
        let slot = rng.gen_range(0..self.seen);
        if slot < self.capacity {
            self.items[slot] = item;
        }
    }

    /// Number of items kept
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items offered so far
    pub fn seen(&self) -> usize {
        self.seen
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}
