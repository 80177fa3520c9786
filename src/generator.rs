//! Branch generation for every decision type
//!
//! The generator lists the candidate actions of one decision point. Catch and
//! distribution decisions can explode combinatorially, so the generator
//! defers to a [`SamplingStrategy`] to decide which candidates survive. It
//! never returns an empty list: when nothing is possible the decision's no-op
//! action is offered instead.

use std::collections::BTreeMap;

use log::debug;

use crate::{
    action::{Action, Allocation, Capture, DecisionType, Turn},
    game::{CellType, GameError, PlayerState, Position, Race, Snapshot, UnitId},
    policy::sampling::{SamplingStrategy, SearchRng},
    utils::{composition_count, for_each_composition, Reservoir},
};

/// Key under which interchangeable cells are grouped
///
/// Cells that share a key may still differ in ways the key ignores, such as
/// neighbours beyond the first ring, and are treated as one cluster anyway.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ClusterKey {
    kind: CellType,
    defenders: usize,
    owner_race: Option<Race>,
    profile: Option<Vec<(CellType, Option<Race>)>>,
}

/// Enumerates candidate actions for a decision point
pub struct BranchGenerator<'a> {
    sampling: &'a dyn SamplingStrategy,
}

impl<'a> BranchGenerator<'a> {
    pub fn new(sampling: &'a dyn SamplingStrategy) -> Self {
        BranchGenerator { sampling }
    }

    /// Lists the actions worth exploring for `turn`
    ///
    /// `ply` is the distance from the search root and drives how much the
    /// sampling strategy prunes.
    pub fn generate(
        &self,
        snapshot: &Snapshot,
        turn: &Turn,
        ply: usize,
        rng: &mut SearchRng,
    ) -> Result<Vec<Action>, GameError> {
        let player = snapshot.player(turn.player)?;
        let actions = match turn.decision {
            DecisionType::DeclineRace => Self::decline_race(snapshot, player),
            DecisionType::ChangeRace => Self::change_race(snapshot, player),
            DecisionType::CatchCell => self.catch_cell(snapshot, player, ply, rng)?,
            DecisionType::DistributeUnits => self.distribute_units(player, rng),
        };

        if actions.is_empty() {
            return Ok(vec![turn.decision.no_op()]);
        }
        Ok(actions)
    }

    fn decline_race(snapshot: &Snapshot, player: &PlayerState) -> Vec<Action> {
        let mut actions = vec![Action::DeclineRace(false)];
        if !snapshot.race_pool.is_empty() && snapshot.round > 1 && player.race.is_some() {
            actions.push(Action::DeclineRace(true));
        }
        actions
    }

    fn change_race(snapshot: &Snapshot, player: &PlayerState) -> Vec<Action> {
        // The current race goes back to the pool before picking.
        let mut candidates = snapshot.race_pool.clone();
        if let Some(current) = player.race {
            if !candidates.contains(&current) {
                candidates.push(current);
            }
        }
        candidates
            .into_iter()
            .map(|race| Action::ChangeRace(Some(race)))
            .collect()
    }

    fn catch_cell(
        &self,
        snapshot: &Snapshot,
        player: &PlayerState,
        ply: usize,
        rng: &mut SearchRng,
    ) -> Result<Vec<Action>, GameError> {
        let cells = self.capturable_cells(snapshot, player, ply, rng)?;

        let mut actions = Vec::new();
        for target in cells {
            let cost = match snapshot.catch_cost(player.id, target)? {
                Some(cost) => cost,
                None => continue,
            };
            let pool = snapshot.attack_pool(player.id, target)?;
            if pool.len() < cost {
                continue;
            }

            for size in self.sampling.attack_sizes(cost, pool.len(), ply, rng) {
                actions.push(Action::CatchCell(Some(Capture {
                    target,
                    units: pool[..size].to_vec(),
                })));
            }
        }

        actions.push(Action::CatchCell(None));
        Ok(actions)
    }

    /// Achievable cells the player does not hold and has not taken this turn,
    /// reduced to one representative per cluster
    fn capturable_cells(
        &self,
        snapshot: &Snapshot,
        player: &PlayerState,
        ply: usize,
        rng: &mut SearchRng,
    ) -> Result<Vec<Position>, GameError> {
        let cells: Vec<Position> = snapshot
            .achievable_cells(player.id)?
            .into_iter()
            .filter(|cell| !player.owned.contains(cell))
            .filter(|cell| !player.captured_this_turn.contains(cell))
            .collect();

        if !self.sampling.clusters_cells() {
            return Ok(cells);
        }

        let compare_neighbors = self.sampling.compares_neighbors(ply);
        let mut clusters: BTreeMap<ClusterKey, Vec<Position>> = BTreeMap::new();
        for cell in cells {
            let key = Self::cluster_key(snapshot, cell, compare_neighbors);
            clusters.entry(key).or_default().push(cell);
        }

        let mut representatives: Vec<Position> = clusters
            .into_values()
            .map(|members| members[self.sampling.representative(members.len(), rng)])
            .collect();
        representatives.sort_unstable();
        Ok(representatives)
    }

    fn cluster_key(snapshot: &Snapshot, cell: Position, compare_neighbors: bool) -> ClusterKey {
        let kind = snapshot
            .board
            .cell(cell)
            .map_or(CellType::Land, |c| c.kind);
        let profile = compare_neighbors.then(|| {
            let mut profile: Vec<(CellType, Option<Race>)> = snapshot
                .board
                .neighbors(cell)
                .into_iter()
                .filter_map(|n| {
                    snapshot
                        .board
                        .cell(n)
                        .map(|c| (c.kind, snapshot.owner_race(n)))
                })
                .collect();
            profile.sort_unstable();
            profile
        });

        ClusterKey {
            kind,
            defenders: snapshot.defenders(cell),
            owner_race: snapshot.owner_race(cell),
            profile,
        }
    }

    fn distribute_units(&self, player: &PlayerState, rng: &mut SearchRng) -> Vec<Action> {
        let cells: Vec<Position> = player.owned.iter().copied().collect();
        let units: Vec<UnitId> = player.units().map(|unit| unit.id).collect();

        let mut actions = Vec::new();
        if !cells.is_empty() && !units.is_empty() {
            let total = composition_count(units.len(), cells.len());
            let mut reservoir = self
                .sampling
                .distribution_limit(cells.len())
                .filter(|&limit| (limit as u128) < total)
                .map(Reservoir::new);
            let mut everything = Vec::new();

            for_each_composition(units.len(), cells.len(), &mut |parts| {
                let allocation = Self::allocation(&cells, &units, parts);
                match reservoir.as_mut() {
                    Some(reservoir) => reservoir.offer(allocation, &mut *rng),
                    None => everything.push(allocation),
                }
            });

            let allocations = match reservoir {
                Some(reservoir) => {
                    debug!(
                        "{} kept {} of {} unit distributions",
                        player.id,
                        reservoir.len(),
                        reservoir.seen()
                    );
                    reservoir.into_items()
                }
                None => everything,
            };
            actions.extend(
                allocations
                    .into_iter()
                    .filter(|allocation| !allocation.is_empty())
                    .map(Action::DistributeUnits),
            );
        }

        actions.push(Action::DistributeUnits(Allocation::new()));
        actions
    }

    /// Hands out units in order according to one composition
    fn allocation(cells: &[Position], units: &[UnitId], parts: &[usize]) -> Allocation {
        let mut allocation = Allocation::new();
        let mut offset = 0;
        for (&cell, &count) in cells.iter().zip(parts) {
            if count > 0 {
                allocation.insert(cell, units[offset..offset + count].to_vec());
            }
            offset += count;
        }
        allocation
    }
}
