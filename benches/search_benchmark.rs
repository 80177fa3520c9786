#[macro_use]
extern crate criterion;

use coins_search::{
    policy::ExhaustiveSampling, Board, CellType, DecisionEngine, DecisionType, PlayerId,
    Race, Scoring, SearchConfig, Snapshot, StandardRules,
};
use criterion::{black_box, BenchmarkId, Criterion};
use std::time::Duration;

fn board(width: usize) -> Board {
    let kinds = [
        CellType::Land,
        CellType::Forest,
        CellType::Mountain,
        CellType::Water,
    ];
    let cells = (0..width).map(|i| kinds[i % kinds.len()]).collect();
    Board::new(width, 1, cells).expect("valid board")
}

fn game(width: usize) -> Snapshot {
    Snapshot::with_race_pool(board(width), 2, vec![Race::Human, Race::Elf])
}

fn bench_tree_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_build");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(10);

    // Wider boards mean more achievable cells per capture
    for width in [1, 2, 3].iter() {
        let snapshot = game(*width);
        let config = SearchConfig::default().with_seed(1);

        group.bench_with_input(BenchmarkId::new("board_width", width), width, |b, &_| {
            b.iter(|| {
                let mut engine = DecisionEngine::new(StandardRules::new(), config.clone());
                black_box(engine.build_tree(&snapshot, PlayerId(0), DecisionType::DeclineRace))
            })
        });
    }

    // Thread counts on a fixed board
    for threads in [1, 2, 4].iter() {
        let snapshot = game(3);
        let config = SearchConfig::default().with_seed(1).with_max_threads(*threads);

        group.bench_with_input(BenchmarkId::new("threads", threads), threads, |b, &_| {
            b.iter(|| {
                let mut engine = DecisionEngine::new(StandardRules::new(), config.clone());
                black_box(engine.build_tree(&snapshot, PlayerId(0), DecisionType::DeclineRace))
            })
        });
    }

    // Pruned versus exhaustive generation
    let snapshot = game(2);
    let config = SearchConfig::default()
        .with_seed(1)
        .with_scoring(Scoring::CoinValue);
    group.bench_function("random_sampling", |b| {
        b.iter(|| {
            let mut engine = DecisionEngine::new(StandardRules::new(), config.clone());
            black_box(engine.choose_action(&snapshot, PlayerId(0), DecisionType::DeclineRace))
        })
    });
    group.bench_function("exhaustive_sampling", |b| {
        b.iter(|| {
            let mut engine = DecisionEngine::new(StandardRules::new(), config.clone())
                .with_sampling_strategy(ExhaustiveSampling::new());
            black_box(engine.choose_action(&snapshot, PlayerId(0), DecisionType::DeclineRace))
        })
    });

    group.finish();
}

criterion_group!(benches, bench_tree_build);
criterion_main!(benches);
