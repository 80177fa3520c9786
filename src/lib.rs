//! # coins-search
//!
//! A bounded-depth game-tree search that plays the Coins board game.
//!
//! Players conquer cells of a rectangular board with units of their race,
//! earn coins from the cells they hold and may abandon a race for a fresh one.
//! Given a game snapshot and a pending decision, this crate simulates every
//! relevant continuation up to a fixed number of rounds, scores the final
//! states and picks the action that is best for the deciding player.
//!
//! ## Features
//!
//! - Exhaustive tree construction with pruning of combinatorial decisions
//! - Three scoring policies (win rate, coin bounds, coin differential)
//! - Four selection policies (Max, Min, Minimax, MaxN)
//! - Sibling branches built in parallel with rayon
//! - Reproducible searches from a seed
//! - Build statistics and tree rendering
//!
//! ## Basic Usage
//!
//! ```
//! use coins_search::{
//!     Board, CellType, DecisionEngine, DecisionType, PlayerId, SearchConfig, Snapshot,
//!     StandardRules,
//! };
//!
//! fn main() -> Result<(), coins_search::SearchError> {
//!     // A tiny board keeps the tree small
//!     let board = Board::filled(2, 1, CellType::Land)?;
//!     let snapshot = Snapshot::new(board, 2);
//!
//!     let config = SearchConfig::default().with_max_depth(1).with_seed(7);
//!     let mut engine = DecisionEngine::new(StandardRules::new(), config);
//!
//!     // Player 0 has no race yet and starts its first turn
//!     let action = engine.choose_action(&snapshot, PlayerId(0), DecisionType::DeclineRace)?;
//!     println!("Chosen action: {}", action);
//!     println!("{}", engine.get_statistics().summary());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## How It Works
//!
//! A decision tree alternates between decision points and actions:
//!
//! 1. **Generation**: the branch generator lists candidate actions for the
//!    pending decision, pruned by a sampling strategy.
//!
//! 2. **Simulation**: each candidate is applied to its own clone of the
//!    snapshot and the next decision point is derived from the turn order.
//!
//! 3. **Evaluation**: once the deciding player is about to start a turn
//!    `max_depth` rounds later, the snapshot is scored.
//!
//! 4. **Aggregation**: every node merges the statistics of its children.
//!
//! The selection policy then picks one of the root's edges.
//!
//! ## Customizing Policies
//!
//! ```rust
//! use coins_search::{
//!     policy::{ExhaustiveSampling, MinimaxPolicy},
//!     Board, CellType, DecisionEngine, DecisionType, PlayerId, Scoring, SearchConfig,
//!     Snapshot, StandardRules,
//! };
//!
//! fn main() -> Result<(), coins_search::SearchError> {
//!     let board = Board::filled(1, 1, CellType::Land)?;
//!     let snapshot = Snapshot::new(board, 2);
//!
//!     let config = SearchConfig::default()
//!         .with_scoring(Scoring::CoinDifferential)
//!         .with_seed(1);
//!     let mut engine = DecisionEngine::new(StandardRules::new(), config)
//!         .with_sampling_strategy(ExhaustiveSampling::new())
//!         .with_selection_policy(MinimaxPolicy::new());
//!
//!     let tree = engine.build_tree(&snapshot, PlayerId(0), DecisionType::DeclineRace)?;
//!     println!("{}", engine.visualize_tree(&tree, 2));
//!     let action = engine.select(&tree)?;
//!     println!("Minimax picks {}", action);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Examples
//!
//! A two-bot self-play game on a small board:
//!
//! ```bash
//! cargo run --example self_play
//! ```

pub mod action;
pub mod bot;
pub mod builder;
pub mod config;
pub mod game;
pub mod generator;
pub mod policy;
pub mod rules;
pub mod search;
pub mod stats;
pub mod tree;
pub mod utils;

pub use action::{Action, Allocation, Capture, DecisionType, Turn};
pub use bot::TreeBot;
pub use config::SearchConfig;
pub use game::{Board, CellType, GameError, PlayerId, Position, Race, Snapshot, UnitId};
pub use policy::{SamplingStrategy, Scoring, Selection, SelectionPolicy};
pub use rules::{GameRules, StandardRules};
pub use search::{DecisionEngine, SearchTree};
pub use stats::SearchStatistics;
pub use tree::{DecisionNode, Edge};

/// Error types for the decision search
#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    /// No action could be selected at the root
    #[error("No legal actions available from current state")]
    NoLegalActions,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The game model rejected the request
    #[error("Game error: {0}")]
    Game(#[from] GameError),

    /// Statistics of different shapes were merged
    #[error("Incompatible statistics: {0}")]
    IncompatibleStatistics(String),

    /// A tree was advanced along an action it does not contain
    #[error("Action {0} is not in the tree")]
    ActionNotInTree(Action),

    /// The worker pool could not be created
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

/// Result type for search operations
pub type Result<T> = std::result::Result<T, SearchError>;
