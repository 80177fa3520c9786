use coins_search::{
    action::{Action, Allocation, Capture, DecisionType},
    game::{Board, CellType, GameError, PlayerId, PlayerState, Race, Snapshot},
    rules::{GameRules, StandardRules},
    search::{DecisionEngine, SearchTree},
    SearchConfig,
};

const ME: PlayerId = PlayerId(0);
const OPPONENT: PlayerId = PlayerId(1);

/// What goes wrong when the scripted player takes the scripted race
#[derive(Debug, Clone, Copy)]
enum Fault {
    Reject,
    Panic,
    /// Seats an extra player, so the branch's statistics cover three players
    ExtraPlayer,
}

/// Standard rules that misbehave for one race pick of one player
struct FaultyRules {
    player: PlayerId,
    race: Race,
    fault: Fault,
}

impl GameRules for FaultyRules {
    fn apply_decline_race(
        &self,
        snapshot: &mut Snapshot,
        player: PlayerId,
        decline: bool,
    ) -> Result<(), GameError> {
        StandardRules::new().apply_decline_race(snapshot, player, decline)
    }

    fn apply_change_race(
        &self,
        snapshot: &mut Snapshot,
        player: PlayerId,
        race: Option<Race>,
    ) -> Result<(), GameError> {
        if player == self.player && race == Some(self.race) {
            match self.fault {
                Fault::Reject => return Err(GameError::RaceUnavailable(self.race)),
                Fault::Panic => panic!("{} cannot take {}", player, self.race),
                Fault::ExtraPlayer => {
                    let id = PlayerId(snapshot.players.len());
                    snapshot.players.push(PlayerState::new(id));
                }
            }
        }
        StandardRules::new().apply_change_race(snapshot, player, race)
    }

    fn apply_catch_cell(
        &self,
        snapshot: &mut Snapshot,
        player: PlayerId,
        capture: Option<&Capture>,
    ) -> Result<(), GameError> {
        StandardRules::new().apply_catch_cell(snapshot, player, capture)
    }

    fn apply_distribute_units(
        &self,
        snapshot: &mut Snapshot,
        player: PlayerId,
        allocation: &Allocation,
    ) -> Result<(), GameError> {
        StandardRules::new().apply_distribute_units(snapshot, player, allocation)
    }

    fn accrue_coins(&self, snapshot: &mut Snapshot) {
        StandardRules::new().accrue_coins(snapshot)
    }
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn open_game() -> Snapshot {
    Snapshot::new(Board::filled(1, 1, CellType::Land).unwrap(), 2)
}

fn config() -> SearchConfig {
    SearchConfig::default().with_seed(21)
}

fn clean_tree() -> SearchTree {
    let mut engine = DecisionEngine::new(StandardRules::new(), config());
    engine
        .build_tree(&open_game(), ME, DecisionType::ChangeRace)
        .unwrap()
}

/// Builds the tree with one faulty race pick and checks the pick is gone
fn assert_root_branch_dropped(fault: Fault) {
    init_logging();
    let rules = FaultyRules {
        player: ME,
        race: Race::Orc,
        fault,
    };
    let mut engine = DecisionEngine::new(rules, config());
    let tree = engine
        .build_tree(&open_game(), ME, DecisionType::ChangeRace)
        .unwrap();
    let clean = clean_tree();

    assert_eq!(engine.get_statistics().dropped_branches, 1);
    assert!(tree.root.child(&Action::ChangeRace(Some(Race::Orc))).is_none());
    assert_eq!(tree.root.edges.len(), clean.root.edges.len() - 1);

    // Siblings are built exactly as they would be without the failure
    for edge in &tree.root.edges {
        let expected = clean.root.child(&edge.action).unwrap();
        assert_eq!(edge.child.stats, expected.stats);
        assert_eq!(edge.child.size(), expected.size());
    }

    let action = engine.select(&tree).unwrap();
    assert!(matches!(action, Action::ChangeRace(Some(race)) if race != Race::Orc));
}

#[test]
fn test_rejected_branch_is_dropped() {
    assert_root_branch_dropped(Fault::Reject);
}

#[test]
fn test_panicking_branch_is_dropped() {
    assert_root_branch_dropped(Fault::Panic);
}

#[test]
fn test_unmergeable_branch_is_dropped() {
    assert_root_branch_dropped(Fault::ExtraPlayer);
}

#[test]
fn test_deep_failure_keeps_the_root_branches() {
    init_logging();
    let rules = FaultyRules {
        player: OPPONENT,
        race: Race::Elf,
        fault: Fault::ExtraPlayer,
    };
    let mut engine = DecisionEngine::new(rules, config());
    let tree = engine
        .build_tree(&open_game(), ME, DecisionType::ChangeRace)
        .unwrap();
    let clean = clean_tree();

    assert!(engine.get_statistics().dropped_branches >= 1);
    assert_eq!(tree.root.edges.len(), clean.root.edges.len());

    // No opponent Elf pick survives anywhere in the tree
    let mut pending = vec![&tree.root];
    while let Some(node) = pending.pop() {
        for edge in &node.edges {
            assert!(!(edge.player == OPPONENT && edge.action == Action::ChangeRace(Some(Race::Elf))));
            assert_eq!(edge.child.stats.player_count(), 2);
            pending.push(&edge.child);
        }
    }

    // Taking Elf first keeps it from the opponent, so that subtree is untouched
    let elf = Action::ChangeRace(Some(Race::Elf));
    assert_eq!(
        tree.root.child(&elf).unwrap().stats,
        clean.root.child(&elf).unwrap().stats
    );
    assert!(engine.select(&tree).is_ok());
}
