//! A bot that answers the decisions of one player
//!
//! The bot builds a tree when its turn starts and walks down that tree as it
//! answers the later decisions of the same turn. The tree is dropped once the
//! turn is over; the next turn always starts from a fresh build.

use log::{debug, info, warn};

use crate::{
    action::{Action, DecisionType, Turn},
    game::{PlayerId, Snapshot},
    rules::GameRules,
    search::{DecisionEngine, SearchTree},
    Result,
};

/// Decision-making bot for a single player
pub struct TreeBot<R: GameRules> {
    player: PlayerId,
    engine: DecisionEngine<R>,
    tree: Option<SearchTree>,
}

impl<R: GameRules> TreeBot<R> {
    pub fn new(player: PlayerId, engine: DecisionEngine<R>) -> Self {
        TreeBot {
            player,
            engine,
            tree: None,
        }
    }

    /// Player this bot plays for
    pub fn player(&self) -> PlayerId {
        self.player
    }

    pub fn engine(&self) -> &DecisionEngine<R> {
        &self.engine
    }

    /// Returns true if a tree is kept for the next decision
    pub fn has_tree(&self) -> bool {
        self.tree.is_some()
    }

    /// Forgets the kept tree
    pub fn reset(&mut self) {
        self.tree = None;
    }

    /// Answers `decision` for the bot's player
    ///
    /// Never fails: when no tree can be built or nothing can be selected the
    /// decision's no-op action is returned.
    pub fn decide(&mut self, snapshot: &Snapshot, decision: DecisionType) -> Action {
        match self.try_decide(snapshot, decision) {
            Ok(action) => action,
            Err(err) => {
                warn!(
                    "{} could not decide {:?}: {}, falling back to no-op",
                    self.player, decision, err
                );
                self.tree = None;
                decision.no_op()
            }
        }
    }

    fn try_decide(&mut self, snapshot: &Snapshot, decision: DecisionType) -> Result<Action> {
        let turn = Turn::new(self.player, decision, snapshot.round);
        let tree = match self.tree.take() {
            Some(tree) if tree.turn() == turn && !tree.root.is_terminal() => {
                debug!("{} reusing tree at {}", self.player, turn);
                tree
            }
            _ => self.engine.build_tree(snapshot, self.player, decision)?,
        };

        let action = self.engine.select(&tree)?;
        info!("{} chose {} at {}", self.player, action, turn);

        if decision != DecisionType::DistributeUnits {
            self.tree = tree.advance(&action).ok();
        }
        Ok(action)
    }
}
