use coins_search::{
    action::{DecisionType, Turn},
    Board, CellType, DecisionEngine, GameRules, PlayerId, Race, Scoring, SearchConfig, Selection,
    Snapshot, StandardRules, TreeBot,
};
use std::time::Duration;

const ROUNDS: u32 = 4;

fn main() {
    // Initialize logging
    env_logger::init();

    println!("Coins Self-Play Example");
    println!("=======================");
    println!();

    let board = match Board::from_rows(&[
        vec![CellType::Land, CellType::Forest, CellType::Mountain],
        vec![CellType::Water, CellType::Land, CellType::Land],
    ]) {
        Ok(board) => board,
        Err(e) => {
            println!("Error: {}", e);
            return;
        }
    };
    let mut game = Snapshot::with_race_pool(
        board,
        2,
        vec![Race::Human, Race::Elf, Race::Dwarf, Race::Amphibian],
    );

    // One bot per player, each with its own search settings
    let mut bots = vec![
        TreeBot::new(
            PlayerId(0),
            DecisionEngine::new(
                StandardRules::new(),
                SearchConfig::default()
                    .with_scoring(Scoring::CoinValue)
                    .with_selection(Selection::Max)
                    .with_max_time(Duration::from_secs(2))
                    .with_seed(1),
            ),
        ),
        TreeBot::new(
            PlayerId(1),
            DecisionEngine::new(
                StandardRules::new(),
                SearchConfig::default()
                    .with_scoring(Scoring::CoinDifferential)
                    .with_selection(Selection::Minimax)
                    .with_max_time(Duration::from_secs(2))
                    .with_seed(2),
            ),
        ),
    ];

    let rules = StandardRules::new();
    let mut turn = Turn::new(PlayerId(0), DecisionType::DeclineRace, 1);

    while turn.round <= ROUNDS {
        let bot = &mut bots[turn.player.0];
        let mut action = bot.decide(&game, turn.decision);

        if let Err(e) = rules.apply(&mut game, turn.player, &action) {
            println!("{} played an illegal action ({}), skipping", turn.player, e);
            action = turn.decision.no_op();
        }
        println!("{:<32} {}", turn.to_string(), action);

        let next = turn.next(&action, &game);
        if next.round > turn.round {
            rules.accrue_coins(&mut game);
            game.round = next.round;
            println!();
            println!("End of round {}:", turn.round);
            for player in &game.players {
                let race = player.race.map_or("none".to_string(), |r| r.to_string());
                println!(
                    "  {} race={} cells={} coins={}",
                    player.id,
                    race,
                    player.owned.len(),
                    player.coins
                );
            }
            println!();
        }
        turn = next;
    }

    println!("Final standings:");
    for player in &game.players {
        println!("  {}: {} coins", player.id, player.coins);
    }
    let leaders = game.leaders();
    if leaders.len() == 1 {
        println!("{} wins!", leaders[0]);
    } else {
        println!("Tie between {:?}", leaders);
    }

    // Show stats of each bot's most recent search
    for bot in &bots {
        println!();
        println!("{} {}", bot.player(), bot.engine().get_statistics().summary());
    }
}
