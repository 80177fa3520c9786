//! Mutable game state at one point in (possibly simulated) time

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use super::{Board, GameError, Position, Race};

/// Index of a player in turn order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub usize);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Identifier of a unit, unique within a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(pub u32);

/// A single unit of a player's race
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unit {
    pub id: UnitId,
    /// Owned cell the unit stands on; `None` while the unit is in hand
    pub position: Option<Position>,
}

/// Everything the game tracks about one player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerState {
    pub id: PlayerId,
    pub race: Option<Race>,
    pub coins: u32,
    /// Cells held by the current race
    pub owned: BTreeSet<Position>,
    /// Cells yielding coins to this player
    pub feudal: BTreeSet<Position>,
    /// Owned cells left without units, yielding nothing
    pub transit: BTreeSet<Position>,
    /// Cells captured during the current turn
    pub captured_this_turn: BTreeSet<Position>,
    /// Units that may still act this turn
    pub available: Vec<Unit>,
    /// Units that already attacked this turn
    pub exhausted: Vec<Unit>,
}

impl PlayerState {
    pub fn new(id: PlayerId) -> Self {
        PlayerState {
            id,
            race: None,
            coins: 0,
            owned: BTreeSet::new(),
            feudal: BTreeSet::new(),
            transit: BTreeSet::new(),
            captured_this_turn: BTreeSet::new(),
            available: Vec::new(),
            exhausted: Vec::new(),
        }
    }

    /// All units, available first
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.available.iter().chain(self.exhausted.iter())
    }

    pub fn unit_count(&self) -> usize {
        self.available.len() + self.exhausted.len()
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units().find(|unit| unit.id == id)
    }

    /// Number of this player's units standing on a cell
    pub fn units_on(&self, position: Position) -> usize {
        self.units()
            .filter(|unit| unit.position == Some(position))
            .count()
    }
}

/// The whole game state
///
/// Cloning a snapshot is the deep copy used by the search: every simulated
/// branch owns its own copy, only the immutable board is shared.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub board: Arc<Board>,
    pub players: Vec<PlayerState>,
    /// Races nobody currently plays
    pub race_pool: Vec<Race>,
    /// Current round, starting at 1
    pub round: u32,
    next_unit: u32,
}

impl Snapshot {
    /// Creates the opening snapshot with every race in the pool
    pub fn new(board: Board, player_count: usize) -> Self {
        Self::with_race_pool(board, player_count, Race::ALL.to_vec())
    }

    pub fn with_race_pool(board: Board, player_count: usize, race_pool: Vec<Race>) -> Self {
        Snapshot {
            board: Arc::new(board),
            players: (0..player_count)
                .map(|i| PlayerState::new(PlayerId(i)))
                .collect(),
            race_pool,
            round: 1,
            next_unit: 0,
        }
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn player(&self, id: PlayerId) -> Result<&PlayerState, GameError> {
        self.players.get(id.0).ok_or(GameError::UnknownPlayer(id))
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Result<&mut PlayerState, GameError> {
        self.players.get_mut(id.0).ok_or(GameError::UnknownPlayer(id))
    }

    pub fn coins(&self, id: PlayerId) -> Result<u32, GameError> {
        Ok(self.player(id)?.coins)
    }

    /// Player whose current race holds the cell
    pub fn owner_of(&self, position: Position) -> Option<PlayerId> {
        self.players
            .iter()
            .find(|player| player.owned.contains(&position))
            .map(|player| player.id)
    }

    /// Race of the player holding the cell
    pub fn owner_race(&self, position: Position) -> Option<Race> {
        self.owner_of(position)
            .and_then(|id| self.players.get(id.0))
            .and_then(|player| player.race)
    }

    /// Number of units defending a cell
    pub fn defenders(&self, position: Position) -> usize {
        self.owner_of(position)
            .and_then(|id| self.players.get(id.0))
            .map_or(0, |player| player.units_on(position))
    }

    /// Players tied for the highest coin total
    pub fn leaders(&self) -> Vec<PlayerId> {
        let best = self.players.iter().map(|p| p.coins).max().unwrap_or(0);
        self.players
            .iter()
            .filter(|player| player.coins == best)
            .map(|player| player.id)
            .collect()
    }

    /// Cells the player can reach this turn
    ///
    /// Owned cells and their neighbours; the board edge when nothing is owned.
    pub fn achievable_cells(&self, id: PlayerId) -> Result<BTreeSet<Position>, GameError> {
        let player = self.player(id)?;
        if player.owned.is_empty() {
            return Ok(self.board.edge_positions().collect());
        }

        let mut cells = player.owned.clone();
        for &position in &player.owned {
            cells.extend(self.board.neighbors(position));
        }
        Ok(cells)
    }

    /// Minimum number of units the player must commit to capture a cell
    ///
    /// Returns `None` when the player has no race or its race cannot hold the
    /// cell.
    pub fn catch_cost(&self, id: PlayerId, position: Position) -> Result<Option<usize>, GameError> {
        let player = self.player(id)?;
        let (race, cell) = match (player.race, self.board.cell(position)) {
            (Some(race), Some(cell)) => (race, cell),
            _ => return Ok(None),
        };
        if !race.can_enter(cell.kind) {
            return Ok(None);
        }

        let base = (cell.kind.catch_difficulty() as isize + race.catch_modifier(cell.kind)).max(1)
            as usize;
        let defenders = self.defenders(position);
        if defenders > 0 {
            Ok(Some(base.max(defenders) + 1))
        } else {
            Ok(Some(base))
        }
    }

    /// Available units able to attack a cell, in pool order
    ///
    /// Units in hand may attack anywhere. Units on the board attack from an
    /// owned neighbour; for an edge cell without owned neighbours units from
    /// any owned cell may walk around the edge.
    pub fn attack_pool(&self, id: PlayerId, position: Position) -> Result<Vec<UnitId>, GameError> {
        let player = self.player(id)?;
        if player.race.is_none() {
            return Ok(Vec::new());
        }

        let has_owned_neighbor = player
            .owned
            .iter()
            .any(|&owned| self.board.are_adjacent(owned, position));
        let from_anywhere = !has_owned_neighbor && self.board.is_edge(position);

        Ok(player
            .available
            .iter()
            .filter(|unit| match unit.position {
                None => true,
                Some(at) => {
                    player.owned.contains(&at)
                        && (from_anywhere || self.board.are_adjacent(at, position))
                }
            })
            .map(|unit| unit.id)
            .collect())
    }

    /// Mints fresh units in hand
    pub(crate) fn mint_units(&mut self, count: usize) -> Vec<Unit> {
        (0..count)
            .map(|_| {
                let id = UnitId(self.next_unit);
                self.next_unit += 1;
                Unit { id, position: None }
            })
            .collect()
    }
}
