//! Game model consumed by the search
//!
//! A [`Snapshot`] holds the board, every player's cells and units, the race
//! pool and the round counter. The search never shares a snapshot between
//! branches; it clones one per branch and mutates the clone through
//! [`GameRules`](crate::rules::GameRules).

pub mod board;
pub mod race;
pub mod snapshot;

pub use board::{Board, Cell, CellType, Position};
pub use race::{Feature, Race};
pub use snapshot::{PlayerId, PlayerState, Snapshot, Unit, UnitId};

/// Errors raised by the game model and the rules
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The player does not exist in the snapshot
    #[error("Unknown player {0}")]
    UnknownPlayer(PlayerId),

    /// Board dimensions do not match the supplied cells
    #[error("Invalid board: {width}x{height} with {cells} cells")]
    InvalidBoard {
        width: usize,
        height: usize,
        cells: usize,
    },

    /// The position is not on the board
    #[error("Cell {0} is not on the board")]
    CellOutOfBoard(Position),

    /// The cell cannot be captured by this player right now
    #[error("Cell {0} cannot be captured")]
    CellNotCapturable(Position),

    /// Too few units were committed to a capture
    #[error("Capturing {position} needs {needed} units, {offered} offered")]
    InsufficientUnits {
        position: Position,
        needed: usize,
        offered: usize,
    },

    /// The unit is not available to attack the cell
    #[error("Unit {unit:?} cannot attack {position}")]
    UnitCannotAttack { unit: UnitId, position: Position },

    /// The unit does not belong to the player
    #[error("Unknown unit {0:?}")]
    UnknownUnit(UnitId),

    /// The unit appears more than once in an action
    #[error("Unit {0:?} used twice")]
    DuplicateUnit(UnitId),

    /// The race is played by someone else
    #[error("Race {0} is not in the pool")]
    RaceUnavailable(Race),

    /// Units were sent to a cell the player does not own
    #[error("Cell {0} is not owned")]
    CellNotOwned(Position),
}
