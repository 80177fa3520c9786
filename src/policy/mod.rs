//! Policies plugged into the decision search
//!
//! This module contains the interchangeable parts of the search:
//! - Sampling strategies: which candidate actions the generator keeps
//! - Scoring: how terminal states are evaluated and statistics merged
//! - Selection policies: how the root action is picked from a finished tree

pub mod sampling;
pub mod scoring;
pub mod selection;

pub use sampling::{ExhaustiveSampling, RandomSampling, SamplingStrategy, SearchRng};
pub use scoring::{Bound, CoinBounds, NodeStats, Scoring};
pub use selection::{
    MaxNPolicy, MaxPolicy, MinPolicy, MinimaxPolicy, Selection, SelectionPolicy,
};
