use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use liars_dice::{Claim, ConnectionRegistry, GameEngine, GamePopulation};
use tokio::sync::mpsc::Receiver;

/// Started game with `n_players` connected players and the first round dealt.
/// Returns the opener so the caller can make the first claim.
fn setup_game(
    n_players: usize,
) -> (GameEngine, GamePopulation, String, String, Vec<Receiver<String>>) {
    let connections = Arc::new(ConnectionRegistry::new(1024));
    let engine = GameEngine::with_seed(connections.clone(), 1);
    let population = GamePopulation::new();
    let game_id = engine.create_game("player0", &population).unwrap();

    let mut receivers = Vec::new();
    for i in 0..n_players {
        let user_id = format!("player{i}");
        receivers.push(connections.register(&user_id));
        engine
            .join_game(&user_id, &game_id, &user_id, &population)
            .unwrap();
    }
    engine.start_game("player0", &game_id, &population).unwrap();
    let opener = engine.start_round(&game_id, &population).unwrap().user_id;

    (engine, population, game_id, opener, receivers)
}

fn drain(receivers: &mut [Receiver<String>]) {
    for receiver in receivers {
        while receiver.try_recv().is_ok() {}
    }
}

/// Benchmark dealing a round for growing tables
fn bench_start_round(c: &mut Criterion) {
    let mut group = c.benchmark_group("start_round");

    for n_players in [2, 4, 8] {
        group.bench_with_input(
            BenchmarkId::from_parameter(n_players),
            &n_players,
            |b, &n| {
                let (engine, population, game_id, _, mut receivers) = setup_game(n);
                b.iter(|| {
                    // Dealing only needs a derivable starting player
                    population
                        .get(&game_id)
                        .unwrap()
                        .lock()
                        .unwrap()
                        .append(
                            liars_dice::Visibility::Public,
                            liars_dice::GameMessage::GameStarted,
                        );
                    engine.start_round(&game_id, &population).unwrap();
                    drain(&mut receivers);
                });
            },
        );
    }

    group.finish();
}

/// Benchmark a full claim sequence around a 4-player table
fn bench_claim_sequence(c: &mut Criterion) {
    c.bench_function("claim_sequence_4_players", |b| {
        b.iter_batched(
            || setup_game(4),
            |(engine, population, game_id, opener, mut receivers)| {
                let mut current = opener;
                for quantity in 1..=20 {
                    let outcome = engine
                        .resolve_claim(&game_id, &current, Claim::new(quantity, 3), &population)
                        .unwrap();
                    current = outcome;
                    drain(&mut receivers);
                }
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

/// Benchmark cross-game admission checks against a large population
fn bench_create_game_scan(c: &mut Criterion) {
    let connections = Arc::new(ConnectionRegistry::default());
    let engine = GameEngine::with_seed(connections, 1);
    let population = GamePopulation::new();
    for i in 0..1_000 {
        engine.create_game(&format!("user{i}"), &population).unwrap();
    }

    c.bench_function("create_game_1000_games", |b| {
        b.iter(|| engine.create_game("newcomer", &population).unwrap());
    });
}

criterion_group!(
    engine_operations,
    bench_start_round,
    bench_claim_sequence,
    bench_create_game_scan,
);

criterion_main!(engine_operations);
