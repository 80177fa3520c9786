//! Board topology for the Coins game
//!
//! The board is a rectangular grid of cells stored in row-major order. It never
//! changes during a game, so snapshots share it instead of copying it.

use std::fmt;

use super::GameError;

/// Position of a cell on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    /// Row index, counted from the top
    pub row: usize,
    /// Column index, counted from the left
    pub col: usize,
}

impl Position {
    /// Creates a new position
    pub fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Terrain of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CellType {
    Land,
    Forest,
    Mountain,
    Water,
}

impl CellType {
    /// Baseline number of attacking units needed to capture a cell of this type
    pub fn catch_difficulty(self) -> usize {
        match self {
            CellType::Land => 1,
            CellType::Forest => 2,
            CellType::Mountain => 3,
            CellType::Water => 2,
        }
    }

    /// Coins a feudal cell of this type yields per round
    pub fn coins(self) -> u32 {
        match self {
            CellType::Mountain => 2,
            CellType::Land | CellType::Forest | CellType::Water => 1,
        }
    }
}

/// A single board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub position: Position,
    pub kind: CellType,
}

/// Rectangular game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates a board from cell types listed in row-major order
    pub fn new(width: usize, height: usize, kinds: Vec<CellType>) -> Result<Self, GameError> {
        if width == 0 || height == 0 || kinds.len() != width * height {
            return Err(GameError::InvalidBoard {
                width,
                height,
                cells: kinds.len(),
            });
        }

        let cells = kinds
            .into_iter()
            .enumerate()
            .map(|(i, kind)| Cell {
                position: Position::new(i / width, i % width),
                kind,
            })
            .collect();

        Ok(Board {
            width,
            height,
            cells,
        })
    }

    /// Creates a board where every cell has the same type
    pub fn filled(width: usize, height: usize, kind: CellType) -> Result<Self, GameError> {
        Self::new(width, height, vec![kind; width * height])
    }

    /// Creates a board from rows of cell types
    pub fn from_rows(rows: &[Vec<CellType>]) -> Result<Self, GameError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != width) {
            return Err(GameError::InvalidBoard {
                width,
                height,
                cells: rows.iter().map(Vec::len).sum(),
            });
        }
        Self::new(width, height, rows.concat())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns true if the position lies on the board
    pub fn contains(&self, position: Position) -> bool {
        position.row < self.height && position.col < self.width
    }

    /// Returns the cell at the given position
    pub fn cell(&self, position: Position) -> Option<&Cell> {
        if !self.contains(position) {
            return None;
        }
        self.cells.get(position.row * self.width + position.col)
    }

    /// Returns all cells in row-major order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Returns all positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells.iter().map(|cell| cell.position)
    }

    /// Returns the orthogonal neighbours of a position that lie on the board
    pub fn neighbors(&self, position: Position) -> Vec<Position> {
        let mut result = Vec::with_capacity(4);
        if position.row > 0 {
            result.push(Position::new(position.row - 1, position.col));
        }
        if position.col > 0 {
            result.push(Position::new(position.row, position.col - 1));
        }
        if position.col + 1 < self.width {
            result.push(Position::new(position.row, position.col + 1));
        }
        if position.row + 1 < self.height {
            result.push(Position::new(position.row + 1, position.col));
        }
        result
    }

    /// Returns true if two positions are orthogonally adjacent
    pub fn are_adjacent(&self, a: Position, b: Position) -> bool {
        a.row.abs_diff(b.row) + a.col.abs_diff(b.col) == 1
    }

    /// Returns true if the position lies on the outer ring of the board
    pub fn is_edge(&self, position: Position) -> bool {
        self.contains(position)
            && (position.row == 0
                || position.col == 0
                || position.row + 1 == self.height
                || position.col + 1 == self.width)
    }

    /// Returns all edge positions in row-major order
    pub fn edge_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions().filter(move |&p| self.is_edge(p))
    }
}
