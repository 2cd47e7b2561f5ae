use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use inhouse::lobby::{
    DraftCursor, Lobby, LobbyConfig, InhouseMode, Participant, RotationCursor,
    enumerate_captain_pairs, enumerate_splits,
};
use rand::Rng;
use std::hint::black_box;

/// Helper to create a full roster with random ratings up to `max_rating`
fn random_roster(max_rating: u32) -> Vec<Participant> {
    let mut rng = rand::rng();
    (1..=10)
        .map(|id| Participant::new(id, format!("player{}", id), rng.random_range(0..=max_rating)))
        .collect()
}

/// Benchmark split enumeration across rating spreads
fn bench_enumerate_splits(c: &mut Criterion) {
    let mut group = c.benchmark_group("enumerate_splits");

    for max_rating in [100u32, 6000, 12000].iter() {
        let roster = random_roster(*max_rating);
        group.bench_with_input(
            BenchmarkId::from_parameter(max_rating),
            &roster,
            |b, roster| {
                b.iter(|| enumerate_splits(black_box(roster)));
            },
        );
    }

    group.finish();
}

/// Benchmark captain pair enumeration
fn bench_enumerate_captain_pairs(c: &mut Criterion) {
    let roster = random_roster(6000);

    c.bench_function("enumerate_captain_pairs", |b| {
        b.iter(|| enumerate_captain_pairs(black_box(&roster)));
    });
}

/// Benchmark a generate followed by a full reroll cycle
fn bench_rotation(c: &mut Criterion) {
    let mut group = c.benchmark_group("rotation");
    let roster = random_roster(6000);

    for max_rolls in [1u32, 5, 20].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(max_rolls),
            max_rolls,
            |b, &max_rolls| {
                b.iter(|| {
                    if let Ok(mut cursor) = RotationCursor::generate(&roster, max_rolls) {
                        for _ in 0..max_rolls {
                            black_box(cursor.reroll());
                        }
                    }
                });
            },
        );
    }

    group.bench_function("draft", |b| {
        b.iter(|| {
            if let Ok(mut cursor) = DraftCursor::generate(&roster, 3) {
                for _ in 0..4 {
                    black_box(cursor.reroll());
                }
            }
        });
    });

    group.finish();
}

/// Benchmark filling a lobby and rendering the best teams
fn bench_lobby_generate(c: &mut Criterion) {
    let roster = random_roster(6000);

    c.bench_function("lobby_fill_and_generate", |b| {
        b.iter(|| {
            let mut lobby = Lobby::new(1, LobbyConfig::default(), InhouseMode::Regular, "penguin");
            for participant in &roster {
                let _ = lobby.add(participant.clone());
            }
            black_box(lobby.generate())
        });
    });
}

criterion_group!(
    benches,
    bench_enumerate_splits,
    bench_enumerate_captain_pairs,
    bench_rotation,
    bench_lobby_generate,
);
criterion_main!(benches);
