//! State transitions of the Coins game
//!
//! The search only advances snapshots through the [`GameRules`] trait, so a
//! different rule set can be plugged in without touching the tree builder.
//! [`StandardRules`] implements the rules of the base game.

use std::collections::BTreeSet;

use crate::{
    action::{Action, Allocation, Capture},
    game::{GameError, PlayerId, Race, Snapshot},
};

/// Trait for the pure state transitions the search applies to cloned snapshots
///
/// Every method mutates the given snapshot in place. On error the snapshot may
/// be left half-updated; callers work on disposable clones.
pub trait GameRules: Send + Sync {
    /// Starts a turn, abandoning the current race when `decline` is true
    fn apply_decline_race(
        &self,
        snapshot: &mut Snapshot,
        player: PlayerId,
        decline: bool,
    ) -> Result<(), GameError>;

    /// Takes a race from the pool; `None` leaves the snapshot untouched
    fn apply_change_race(
        &self,
        snapshot: &mut Snapshot,
        player: PlayerId,
        race: Option<Race>,
    ) -> Result<(), GameError>;

    /// Captures a cell; `None` leaves the snapshot untouched
    fn apply_catch_cell(
        &self,
        snapshot: &mut Snapshot,
        player: PlayerId,
        capture: Option<&Capture>,
    ) -> Result<(), GameError>;

    /// Places units on owned cells; an empty allocation leaves the snapshot untouched
    fn apply_distribute_units(
        &self,
        snapshot: &mut Snapshot,
        player: PlayerId,
        allocation: &Allocation,
    ) -> Result<(), GameError>;

    /// Credits every player with the coins of its feudal cells
    fn accrue_coins(&self, snapshot: &mut Snapshot);

    /// Applies any action by dispatching on its variant
    fn apply(
        &self,
        snapshot: &mut Snapshot,
        player: PlayerId,
        action: &Action,
    ) -> Result<(), GameError> {
        match action {
            Action::DeclineRace(decline) => self.apply_decline_race(snapshot, player, *decline),
            Action::ChangeRace(race) => self.apply_change_race(snapshot, player, *race),
            Action::CatchCell(capture) => {
                self.apply_catch_cell(snapshot, player, capture.as_ref())
            }
            Action::DistributeUnits(allocation) => {
                self.apply_distribute_units(snapshot, player, allocation)
            }
        }
    }
}

/// Rules of the base game
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardRules;

impl StandardRules {
    pub fn new() -> Self {
        StandardRules
    }

    /// Drops the player's race, units and held cells; feudal cells stay
    fn release_race(snapshot: &mut Snapshot, player: PlayerId) -> Result<(), GameError> {
        let state = snapshot.player_mut(player)?;
        let released = state.race.take();
        state.available.clear();
        state.exhausted.clear();
        state.owned.clear();
        state.transit.clear();
        if let Some(race) = released {
            snapshot.race_pool.push(race);
        }
        Ok(())
    }
}

impl GameRules for StandardRules {
    fn apply_decline_race(
        &self,
        snapshot: &mut Snapshot,
        player: PlayerId,
        decline: bool,
    ) -> Result<(), GameError> {
        let state = snapshot.player_mut(player)?;
        state.captured_this_turn.clear();
        let rested = std::mem::take(&mut state.exhausted);
        state.available.extend(rested);

        if decline {
            Self::release_race(snapshot, player)?;
        }
        Ok(())
    }

    fn apply_change_race(
        &self,
        snapshot: &mut Snapshot,
        player: PlayerId,
        race: Option<Race>,
    ) -> Result<(), GameError> {
        let race = match race {
            Some(race) => race,
            None => return Ok(()),
        };

        let current = snapshot.player(player)?.race;
        if current != Some(race) && !snapshot.race_pool.contains(&race) {
            return Err(GameError::RaceUnavailable(race));
        }

        Self::release_race(snapshot, player)?;
        if let Some(index) = snapshot.race_pool.iter().position(|&r| r == race) {
            snapshot.race_pool.remove(index);
        }

        let units = snapshot.mint_units(race.unit_count());
        let state = snapshot.player_mut(player)?;
        state.race = Some(race);
        state.available = units;
        Ok(())
    }

    fn apply_catch_cell(
        &self,
        snapshot: &mut Snapshot,
        player: PlayerId,
        capture: Option<&Capture>,
    ) -> Result<(), GameError> {
        let capture = match capture {
            Some(capture) => capture,
            None => return Ok(()),
        };
        let target = capture.target;

        if snapshot.board.cell(target).is_none() {
            return Err(GameError::CellOutOfBoard(target));
        }
        {
            let state = snapshot.player(player)?;
            if state.owned.contains(&target) || state.captured_this_turn.contains(&target) {
                return Err(GameError::CellNotCapturable(target));
            }
        }
        if !snapshot.achievable_cells(player)?.contains(&target) {
            return Err(GameError::CellNotCapturable(target));
        }

        let needed = snapshot
            .catch_cost(player, target)?
            .ok_or(GameError::CellNotCapturable(target))?;
        if capture.units.len() < needed {
            return Err(GameError::InsufficientUnits {
                position: target,
                needed,
                offered: capture.units.len(),
            });
        }

        let pool = snapshot.attack_pool(player, target)?;
        let mut seen = BTreeSet::new();
        for &unit in &capture.units {
            if !seen.insert(unit) {
                return Err(GameError::DuplicateUnit(unit));
            }
            if !pool.contains(&unit) {
                return Err(GameError::UnitCannotAttack {
                    unit,
                    position: target,
                });
            }
        }

        // Defenders are pushed back into their owner's hand.
        if let Some(previous) = snapshot.owner_of(target) {
            let state = snapshot.player_mut(previous)?;
            state.owned.remove(&target);
            state.transit.remove(&target);
            for unit in state.available.iter_mut().chain(state.exhausted.iter_mut()) {
                if unit.position == Some(target) {
                    unit.position = None;
                }
            }
        }
        for state in &mut snapshot.players {
            state.feudal.remove(&target);
        }

        let state = snapshot.player_mut(player)?;
        let (mut attackers, rest): (Vec<_>, Vec<_>) = state
            .available
            .drain(..)
            .partition(|unit| seen.contains(&unit.id));
        state.available = rest;
        for unit in &mut attackers {
            unit.position = Some(target);
        }
        state.exhausted.extend(attackers);
        state.owned.insert(target);
        state.feudal.insert(target);
        state.transit.remove(&target);
        state.captured_this_turn.insert(target);
        Ok(())
    }

    fn apply_distribute_units(
        &self,
        snapshot: &mut Snapshot,
        player: PlayerId,
        allocation: &Allocation,
    ) -> Result<(), GameError> {
        if allocation.is_empty() {
            return Ok(());
        }

        let state = snapshot.player_mut(player)?;
        let mut seen = BTreeSet::new();
        for (position, units) in allocation {
            if !state.owned.contains(position) {
                return Err(GameError::CellNotOwned(*position));
            }
            for &unit in units {
                if !seen.insert(unit) {
                    return Err(GameError::DuplicateUnit(unit));
                }
                if state.unit(unit).is_none() {
                    return Err(GameError::UnknownUnit(unit));
                }
            }
        }

        for (position, units) in allocation {
            for unit in state
                .available
                .iter_mut()
                .chain(state.exhausted.iter_mut())
                .filter(|unit| units.contains(&unit.id))
            {
                unit.position = Some(*position);
            }
        }

        let held: Vec<_> = state.owned.iter().copied().collect();
        for position in held {
            if state.units_on(position) > 0 {
                state.transit.remove(&position);
                state.feudal.insert(position);
            } else {
                state.feudal.remove(&position);
                state.transit.insert(position);
            }
        }
        Ok(())
    }

    fn accrue_coins(&self, snapshot: &mut Snapshot) {
        let board = snapshot.board.clone();
        for state in &mut snapshot.players {
            let income: u32 = state
                .feudal
                .iter()
                .filter_map(|&position| board.cell(position))
                .map(|cell| {
                    cell.kind.coins() + state.race.map_or(0, |race| race.coin_bonus(cell.kind))
                })
                .sum();
            state.coins += income;
        }
    }
}
