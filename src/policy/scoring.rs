//! Leaf evaluation and statistic aggregation
//!
//! Every tree carries exactly one kind of [`NodeStats`], chosen by its
//! [`Scoring`] policy. Leaves are evaluated from the terminal snapshot and
//! parents merge their children's statistics. All merge rules are sums,
//! maxima or minima, so the order in which children finish does not matter.

use std::fmt;

use crate::{
    game::{PlayerId, Snapshot},
    utils::win_rate,
    Result, SearchError,
};

/// How terminal states are scored and aggregated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scoring {
    /// Share of terminal cases in which a player is tied for the lead
    WinRate,
    /// Best and worst coin totals a player reaches
    CoinValue,
    /// Worst coin lead over the strongest opponent
    CoinDifferential,
}

/// Which side of a coin range a policy looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Upper,
    Lower,
}

/// Best and worst coin totals reachable below a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoinBounds {
    pub max: u32,
    pub min: u32,
}

/// Aggregated statistic of a decision node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeStats {
    /// Per-player win counts over `cases` terminal states
    Wins { wins: Vec<u64>, cases: u64 },
    /// Per-player coin bounds
    Coins(Vec<CoinBounds>),
    /// Per-player minimal coin differential
    Differential(Vec<i64>),
}

impl NodeStats {
    /// Scoring policy this statistic belongs to
    pub fn scoring(&self) -> Scoring {
        match self {
            NodeStats::Wins { .. } => Scoring::WinRate,
            NodeStats::Coins(_) => Scoring::CoinValue,
            NodeStats::Differential(_) => Scoring::CoinDifferential,
        }
    }

    /// Number of players covered
    pub fn player_count(&self) -> usize {
        match self {
            NodeStats::Wins { wins, .. } => wins.len(),
            NodeStats::Coins(bounds) => bounds.len(),
            NodeStats::Differential(diffs) => diffs.len(),
        }
    }

    /// Value of this statistic for one player
    ///
    /// Unknown players score negative infinity.
    pub fn value(&self, player: PlayerId, bound: Bound) -> f64 {
        let index = player.0;
        match self {
            NodeStats::Wins { wins, cases } => wins
                .get(index)
                .map_or(f64::NEG_INFINITY, |&w| win_rate(w, *cases)),
            NodeStats::Coins(bounds) => bounds.get(index).map_or(f64::NEG_INFINITY, |b| {
                match bound {
                    Bound::Upper => f64::from(b.max),
                    Bound::Lower => f64::from(b.min),
                }
            }),
            NodeStats::Differential(diffs) => {
                diffs.get(index).map_or(f64::NEG_INFINITY, |&d| d as f64)
            }
        }
    }

    /// Values for every player, in player order
    pub fn values(&self, bound: Bound) -> Vec<f64> {
        (0..self.player_count())
            .map(|i| self.value(PlayerId(i), bound))
            .collect()
    }

    /// Merges a sibling's statistic into this one
    pub fn absorb(&mut self, other: &NodeStats) -> Result<()> {
        if self.player_count() != other.player_count() {
            return Err(SearchError::IncompatibleStatistics(format!(
                "{} players vs {} players",
                self.player_count(),
                other.player_count()
            )));
        }

        match (self, other) {
            (
                NodeStats::Wins { wins, cases },
                NodeStats::Wins {
                    wins: other_wins,
                    cases: other_cases,
                },
            ) => {
                for (w, o) in wins.iter_mut().zip(other_wins) {
                    *w += o;
                }
                *cases += other_cases;
            }
            (NodeStats::Coins(bounds), NodeStats::Coins(other_bounds)) => {
                for (b, o) in bounds.iter_mut().zip(other_bounds) {
                    b.max = b.max.max(o.max);
                    b.min = b.min.min(o.min);
                }
            }
            (NodeStats::Differential(diffs), NodeStats::Differential(other_diffs)) => {
                for (d, o) in diffs.iter_mut().zip(other_diffs) {
                    *d = (*d).min(*o);
                }
            }
            (mine, theirs) => {
                return Err(SearchError::IncompatibleStatistics(format!(
                    "{:?} vs {:?}",
                    mine.scoring(),
                    theirs.scoring()
                )))
            }
        }
        Ok(())
    }
}

impl fmt::Display for NodeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeStats::Wins { wins, cases } => write!(f, "wins {:?} of {}", wins, cases),
            NodeStats::Coins(bounds) => {
                write!(f, "coins")?;
                for b in bounds {
                    write!(f, " [{}..{}]", b.min, b.max)?;
                }
                Ok(())
            }
            NodeStats::Differential(diffs) => write!(f, "diff {:?}", diffs),
        }
    }
}

impl Scoring {
    /// Scores a terminal snapshot
    pub fn evaluate(self, snapshot: &Snapshot) -> NodeStats {
        let coins: Vec<u32> = snapshot.players.iter().map(|p| p.coins).collect();
        match self {
            Scoring::WinRate => {
                let best = coins.iter().copied().max().unwrap_or(0);
                NodeStats::Wins {
                    wins: coins.iter().map(|&c| u64::from(c == best)).collect(),
                    cases: 1,
                }
            }
            Scoring::CoinValue => NodeStats::Coins(
                coins
                    .iter()
                    .map(|&c| CoinBounds { max: c, min: c })
                    .collect(),
            ),
            Scoring::CoinDifferential => NodeStats::Differential(
                coins
                    .iter()
                    .enumerate()
                    .map(|(i, &own)| {
                        coins
                            .iter()
                            .enumerate()
                            .filter(|&(j, _)| j != i)
                            .map(|(_, &other)| i64::from(own) - i64::from(other))
                            .min()
                            .unwrap_or(0)
                    })
                    .collect(),
            ),
        }
    }

    /// Merges children's statistics into a parent statistic
    ///
    /// Returns `None` when there are no children.
    pub fn aggregate<'a, I>(self, children: I) -> Result<Option<NodeStats>>
    where
        I: IntoIterator<Item = &'a NodeStats>,
    {
        let mut merged: Option<NodeStats> = None;
        for stats in children {
            if stats.scoring() != self {
                return Err(SearchError::IncompatibleStatistics(format!(
                    "{:?} tree received {:?} statistics",
                    self,
                    stats.scoring()
                )));
            }
            match merged.as_mut() {
                Some(parent) => parent.absorb(stats)?,
                None => merged = Some(stats.clone()),
            }
        }
        Ok(merged)
    }
}
