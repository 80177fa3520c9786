use coins_search::{
    action::{Action, Allocation, Capture, DecisionType},
    game::{Board, CellType, GameError, PlayerId, Position, Race, Snapshot},
    rules::{GameRules, StandardRules},
};

const ME: PlayerId = PlayerId(0);
const THEM: PlayerId = PlayerId(1);

fn game_with(board: Board, race: Race) -> Snapshot {
    let mut snapshot = Snapshot::new(board, 2);
    StandardRules::new()
        .apply_change_race(&mut snapshot, ME, Some(race))
        .unwrap();
    snapshot
}

fn capture_with(snapshot: &Snapshot, player: PlayerId, target: Position, size: usize) -> Capture {
    let units = snapshot.attack_pool(player, target).unwrap();
    Capture {
        target,
        units: units[..size].to_vec(),
    }
}

#[test]
fn test_capture_moves_cell_and_units() {
    let rules = StandardRules::new();
    let mut snapshot = game_with(Board::filled(1, 1, CellType::Land).unwrap(), Race::Human);
    let target = Position::new(0, 0);

    let capture = capture_with(&snapshot, ME, target, 2);
    rules
        .apply_catch_cell(&mut snapshot, ME, Some(&capture))
        .unwrap();

    let player = snapshot.player(ME).unwrap();
    assert!(player.owned.contains(&target));
    assert!(player.feudal.contains(&target));
    assert!(player.captured_this_turn.contains(&target));
    assert_eq!(player.available.len(), 3);
    assert_eq!(player.exhausted.len(), 2);
    assert!(player.exhausted.iter().all(|u| u.position == Some(target)));
    assert_eq!(snapshot.defenders(target), 2);
    assert_eq!(snapshot.owner_race(target), Some(Race::Human));
}

#[test]
fn test_stop_actions_leave_state_untouched() {
    let rules = StandardRules::new();
    let mut snapshot = game_with(Board::filled(2, 1, CellType::Land).unwrap(), Race::Elf);
    let capture = capture_with(&snapshot, ME, Position::new(0, 0), 1);
    rules
        .apply_catch_cell(&mut snapshot, ME, Some(&capture))
        .unwrap();

    let before = snapshot.players.clone();
    rules
        .apply(&mut snapshot, ME, &DecisionType::CatchCell.no_op())
        .unwrap();
    rules
        .apply(&mut snapshot, ME, &Action::DistributeUnits(Allocation::new()))
        .unwrap();
    rules
        .apply(&mut snapshot, ME, &DecisionType::ChangeRace.no_op())
        .unwrap();
    assert_eq!(snapshot.players, before);
}

#[test]
fn test_capture_needs_enough_units_against_defenders() {
    let rules = StandardRules::new();
    let mut snapshot = game_with(Board::filled(1, 1, CellType::Land).unwrap(), Race::Human);
    let target = Position::new(0, 0);
    let capture = capture_with(&snapshot, ME, target, 2);
    rules
        .apply_catch_cell(&mut snapshot, ME, Some(&capture))
        .unwrap();
    rules
        .apply_change_race(&mut snapshot, THEM, Some(Race::Orc))
        .unwrap();

    let weak = capture_with(&snapshot, THEM, target, 2);
    let err = rules
        .apply_catch_cell(&mut snapshot, THEM, Some(&weak))
        .unwrap_err();
    assert_eq!(
        err,
        GameError::InsufficientUnits {
            position: target,
            needed: 3,
            offered: 2,
        }
    );
}

#[test]
fn test_capture_pushes_defenders_back_to_hand() {
    let rules = StandardRules::new();
    let mut snapshot = game_with(Board::filled(1, 1, CellType::Land).unwrap(), Race::Human);
    let target = Position::new(0, 0);
    let capture = capture_with(&snapshot, ME, target, 2);
    rules
        .apply_catch_cell(&mut snapshot, ME, Some(&capture))
        .unwrap();
    rules
        .apply_change_race(&mut snapshot, THEM, Some(Race::Orc))
        .unwrap();

    let strong = capture_with(&snapshot, THEM, target, 3);
    rules
        .apply_catch_cell(&mut snapshot, THEM, Some(&strong))
        .unwrap();

    let loser = snapshot.player(ME).unwrap();
    assert!(loser.owned.is_empty());
    assert!(loser.feudal.is_empty());
    assert_eq!(loser.unit_count(), 5);
    assert!(loser.units().all(|u| u.position.is_none()));

    assert_eq!(snapshot.owner_of(target), Some(THEM));
    assert!(snapshot.player(THEM).unwrap().feudal.contains(&target));
}

#[test]
fn test_capture_rejects_foreign_and_repeated_units() {
    let rules = StandardRules::new();
    let mut snapshot = game_with(Board::filled(2, 1, CellType::Land).unwrap(), Race::Human);
    let target = Position::new(0, 0);
    let mut capture = capture_with(&snapshot, ME, target, 1);
    capture.units.push(capture.units[0]);

    let err = rules
        .apply_catch_cell(&mut snapshot, ME, Some(&capture))
        .unwrap_err();
    assert_eq!(err, GameError::DuplicateUnit(capture.units[0]));

    rules
        .apply_change_race(&mut snapshot, THEM, Some(Race::Elf))
        .unwrap();
    let theirs = capture_with(&snapshot, THEM, target, 1);
    let err = rules
        .apply_catch_cell(&mut snapshot, ME, Some(&theirs))
        .unwrap_err();
    assert!(matches!(err, GameError::UnitCannotAttack { .. }));
}

#[test]
fn test_capture_rejects_unreachable_cells() {
    let rules = StandardRules::new();
    let mut snapshot = game_with(Board::filled(3, 3, CellType::Land).unwrap(), Race::Human);
    let center = Position::new(1, 1);

    // Only the board edge is reachable before owning anything
    let capture = Capture {
        target: center,
        units: snapshot.player(ME).unwrap().available[..1]
            .iter()
            .map(|u| u.id)
            .collect(),
    };
    let err = rules
        .apply_catch_cell(&mut snapshot, ME, Some(&capture))
        .unwrap_err();
    assert_eq!(err, GameError::CellNotCapturable(center));

    let outside = Capture {
        target: Position::new(5, 5),
        units: capture.units.clone(),
    };
    let err = rules
        .apply_catch_cell(&mut snapshot, ME, Some(&outside))
        .unwrap_err();
    assert_eq!(err, GameError::CellOutOfBoard(Position::new(5, 5)));
}

#[test]
fn test_decline_keeps_feudal_cells_and_frees_race() {
    let rules = StandardRules::new();
    let mut snapshot = game_with(Board::filled(1, 1, CellType::Land).unwrap(), Race::Dwarf);
    let target = Position::new(0, 0);
    let capture = capture_with(&snapshot, ME, target, 1);
    rules
        .apply_catch_cell(&mut snapshot, ME, Some(&capture))
        .unwrap();
    assert!(!snapshot.race_pool.contains(&Race::Dwarf));

    rules.apply_decline_race(&mut snapshot, ME, true).unwrap();

    let player = snapshot.player(ME).unwrap();
    assert_eq!(player.race, None);
    assert!(player.owned.is_empty());
    assert_eq!(player.unit_count(), 0);
    assert!(player.feudal.contains(&target));
    assert!(snapshot.race_pool.contains(&Race::Dwarf));
    assert_eq!(snapshot.owner_of(target), None);
}

#[test]
fn test_keeping_race_rests_units() {
    let rules = StandardRules::new();
    let mut snapshot = game_with(Board::filled(1, 1, CellType::Land).unwrap(), Race::Human);
    let capture = capture_with(&snapshot, ME, Position::new(0, 0), 2);
    rules
        .apply_catch_cell(&mut snapshot, ME, Some(&capture))
        .unwrap();

    rules.apply_decline_race(&mut snapshot, ME, false).unwrap();

    let player = snapshot.player(ME).unwrap();
    assert_eq!(player.race, Some(Race::Human));
    assert_eq!(player.available.len(), 5);
    assert!(player.exhausted.is_empty());
    assert!(player.captured_this_turn.is_empty());
    assert_eq!(player.units_on(Position::new(0, 0)), 2);
}

#[test]
fn test_change_race_rejects_race_in_play() {
    let mut snapshot = game_with(Board::filled(1, 1, CellType::Land).unwrap(), Race::Human);
    let err = StandardRules::new()
        .apply_change_race(&mut snapshot, THEM, Some(Race::Human))
        .unwrap_err();
    assert_eq!(err, GameError::RaceUnavailable(Race::Human));
}

#[test]
fn test_change_race_swaps_races_through_the_pool() {
    let rules = StandardRules::new();
    let mut snapshot = game_with(Board::filled(1, 1, CellType::Land).unwrap(), Race::Human);
    rules
        .apply_change_race(&mut snapshot, ME, Some(Race::Orc))
        .unwrap();

    let player = snapshot.player(ME).unwrap();
    assert_eq!(player.race, Some(Race::Orc));
    assert_eq!(player.unit_count(), 6);
    assert!(snapshot.race_pool.contains(&Race::Human));
    assert!(!snapshot.race_pool.contains(&Race::Orc));
}

#[test]
fn test_distribution_splits_feudal_and_transit() {
    let rules = StandardRules::new();
    let mut snapshot = game_with(Board::filled(2, 1, CellType::Land).unwrap(), Race::Human);
    let left = Position::new(0, 0);
    let right = Position::new(0, 1);
    for target in [left, right] {
        let capture = capture_with(&snapshot, ME, target, 1);
        rules
            .apply_catch_cell(&mut snapshot, ME, Some(&capture))
            .unwrap();
    }

    let everyone: Vec<_> = snapshot.player(ME).unwrap().units().map(|u| u.id).collect();
    let mut allocation = Allocation::new();
    allocation.insert(left, everyone);
    rules
        .apply_distribute_units(&mut snapshot, ME, &allocation)
        .unwrap();

    let player = snapshot.player(ME).unwrap();
    assert_eq!(player.units_on(left), 5);
    assert!(player.feudal.contains(&left));
    assert!(!player.feudal.contains(&right));
    assert!(player.transit.contains(&right));
    assert!(player.owned.contains(&right));
}

#[test]
fn test_distribution_rejects_cells_not_owned() {
    let mut snapshot = game_with(Board::filled(2, 1, CellType::Land).unwrap(), Race::Human);
    let unit = snapshot.player(ME).unwrap().available[0].id;
    let mut allocation = Allocation::new();
    allocation.insert(Position::new(0, 1), vec![unit]);

    let err = StandardRules::new()
        .apply_distribute_units(&mut snapshot, ME, &allocation)
        .unwrap_err();
    assert_eq!(err, GameError::CellNotOwned(Position::new(0, 1)));
}

#[test]
fn test_coins_accrue_from_feudal_cells() {
    let rules = StandardRules::new();
    let mut snapshot = game_with(Board::filled(1, 1, CellType::Mountain).unwrap(), Race::Dwarf);
    let target = Position::new(0, 0);

    // Mountaineers need two units instead of three
    assert_eq!(snapshot.catch_cost(ME, target).unwrap(), Some(2));
    let capture = capture_with(&snapshot, ME, target, 2);
    rules
        .apply_catch_cell(&mut snapshot, ME, Some(&capture))
        .unwrap();

    rules.accrue_coins(&mut snapshot);
    // Two for the mountain, one more for mining it
    assert_eq!(snapshot.coins(ME).unwrap(), 3);
    assert_eq!(snapshot.coins(THEM).unwrap(), 0);

    rules.accrue_coins(&mut snapshot);
    assert_eq!(snapshot.coins(ME).unwrap(), 6);
    assert_eq!(snapshot.leaders(), vec![ME]);
}

#[test]
fn test_unknown_player_is_rejected() {
    let mut snapshot = game_with(Board::filled(1, 1, CellType::Land).unwrap(), Race::Human);
    let err = StandardRules::new()
        .apply_decline_race(&mut snapshot, PlayerId(4), false)
        .unwrap_err();
    assert_eq!(err, GameError::UnknownPlayer(PlayerId(4)));
}
