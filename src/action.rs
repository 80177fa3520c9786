//! Decisions, actions and the fixed phase order of a turn
//!
//! Every pending decision of a player has a [`DecisionType`]; answering it
//! produces an [`Action`]. [`Turn`] tracks which player faces which decision in
//! which round and knows how the game moves on after an action.

use std::collections::BTreeMap;
use std::fmt;

use crate::game::{PlayerId, Position, Race, Snapshot, UnitId};

/// The kinds of decision a player faces during a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecisionType {
    DeclineRace,
    ChangeRace,
    CatchCell,
    DistributeUnits,
}

impl DecisionType {
    /// The action that answers this decision without changing anything
    pub fn no_op(self) -> Action {
        match self {
            DecisionType::DeclineRace => Action::DeclineRace(false),
            DecisionType::ChangeRace => Action::ChangeRace(None),
            DecisionType::CatchCell => Action::CatchCell(None),
            DecisionType::DistributeUnits => Action::DistributeUnits(Allocation::new()),
        }
    }
}

/// A capture order: the target cell and the attacking units, in order
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Capture {
    pub target: Position,
    pub units: Vec<UnitId>,
}

/// Units assigned to owned cells; empty means "allocate nothing"
pub type Allocation = BTreeMap<Position, Vec<UnitId>>;

/// A concrete answer to a decision
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    /// Abandon the current race (`true`) or keep it (`false`)
    DeclineRace(bool),
    /// Pick a race from the pool; `None` keeps things as they are
    ChangeRace(Option<Race>),
    /// Capture a cell; `None` stops capturing for this turn
    CatchCell(Option<Capture>),
    /// Place units on owned cells
    DistributeUnits(Allocation),
}

impl Action {
    /// Decision type this action answers
    pub fn decision(&self) -> DecisionType {
        match self {
            Action::DeclineRace(_) => DecisionType::DeclineRace,
            Action::ChangeRace(_) => DecisionType::ChangeRace,
            Action::CatchCell(_) => DecisionType::CatchCell,
            Action::DistributeUnits(_) => DecisionType::DistributeUnits,
        }
    }

    /// Returns true if applying the action leaves the state untouched
    pub fn is_no_op(&self) -> bool {
        *self == self.decision().no_op()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::DeclineRace(decline) => write!(f, "decline={}", decline),
            Action::ChangeRace(Some(race)) => write!(f, "race={}", race),
            Action::ChangeRace(None) => write!(f, "race=keep"),
            Action::CatchCell(Some(capture)) => {
                write!(f, "catch {} with {}", capture.target, capture.units.len())
            }
            Action::CatchCell(None) => write!(f, "catch stop"),
            Action::DistributeUnits(allocation) if allocation.is_empty() => {
                write!(f, "distribute nothing")
            }
            Action::DistributeUnits(allocation) => {
                write!(f, "distribute")?;
                for (position, units) in allocation {
                    write!(f, " {}x{}", position, units.len())?;
                }
                Ok(())
            }
        }
    }
}

/// A decision point: who decides what, and in which round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Turn {
    pub player: PlayerId,
    pub decision: DecisionType,
    pub round: u32,
}

impl Turn {
    pub fn new(player: PlayerId, decision: DecisionType, round: u32) -> Self {
        Turn {
            player,
            decision,
            round,
        }
    }

    /// The decision point that follows `action`
    ///
    /// `snapshot` is the state after the action has been applied.
    pub fn next(&self, action: &Action, snapshot: &Snapshot) -> Turn {
        let same_player = |decision| Turn::new(self.player, decision, self.round);
        match action {
            Action::DeclineRace(true) => same_player(DecisionType::ChangeRace),
            Action::DeclineRace(false) => {
                let has_race = snapshot
                    .player(self.player)
                    .map_or(false, |player| player.race.is_some());
                if has_race {
                    same_player(DecisionType::CatchCell)
                } else {
                    same_player(DecisionType::ChangeRace)
                }
            }
            Action::ChangeRace(_) => same_player(DecisionType::CatchCell),
            Action::CatchCell(Some(_)) => same_player(DecisionType::CatchCell),
            Action::CatchCell(None) => same_player(DecisionType::DistributeUnits),
            Action::DistributeUnits(_) => {
                let next = (self.player.0 + 1) % snapshot.player_count().max(1);
                let round = if next == 0 { self.round + 1 } else { self.round };
                Turn::new(PlayerId(next), DecisionType::DeclineRace, round)
            }
        }
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?} round {}", self.player, self.decision, self.round)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Board, CellType};

    fn snapshot() -> Snapshot {
        Snapshot::new(Board::filled(2, 2, CellType::Land).unwrap(), 2)
    }

    #[test]
    fn turn_wraps_to_next_round_after_last_player() {
        let state = snapshot();
        let turn = Turn::new(PlayerId(1), DecisionType::DistributeUnits, 3);
        let next = turn.next(&DecisionType::DistributeUnits.no_op(), &state);
        assert_eq!(next, Turn::new(PlayerId(0), DecisionType::DeclineRace, 4));

        let turn = Turn::new(PlayerId(0), DecisionType::DistributeUnits, 3);
        let next = turn.next(&DecisionType::DistributeUnits.no_op(), &state);
        assert_eq!(next, Turn::new(PlayerId(1), DecisionType::DeclineRace, 3));
    }

    #[test]
    fn player_without_race_must_pick_one() {
        let state = snapshot();
        let turn = Turn::new(PlayerId(0), DecisionType::DeclineRace, 1);
        let next = turn.next(&Action::DeclineRace(false), &state);
        assert_eq!(next.decision, DecisionType::ChangeRace);
    }

    #[test]
    fn capturing_repeats_until_stop() {
        let state = snapshot();
        let turn = Turn::new(PlayerId(0), DecisionType::CatchCell, 1);
        let capture = Capture {
            target: Position::new(0, 0),
            units: vec![UnitId(0)],
        };
        assert_eq!(
            turn.next(&Action::CatchCell(Some(capture)), &state).decision,
            DecisionType::CatchCell
        );
        assert_eq!(
            turn.next(&Action::CatchCell(None), &state).decision,
            DecisionType::DistributeUnits
        );
    }

    #[test]
    fn no_op_matches_its_decision() {
        for decision in [
            DecisionType::DeclineRace,
            DecisionType::ChangeRace,
            DecisionType::CatchCell,
            DecisionType::DistributeUnits,
        ] {
            let action = decision.no_op();
            assert_eq!(action.decision(), decision);
            assert!(action.is_no_op());
        }
    }
}
