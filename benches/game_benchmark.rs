//! Benchmarks for pathfinding, map generation and complete sessions.
//!
//! Full sessions use in-process oracles so the numbers measure the engine,
//! not process I/O.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use skirmish::game::{Coord, Grid, Occupancy, Terrain, has_los, next_step_towards};
use skirmish::oracle::ConstantOracle;
use skirmish::session::mapgen;
use skirmish::{SessionConfig, run_session};

/// A 64x64 grid with a long serpentine wall of mountains.
fn maze_grid() -> Grid {
    let mut grid = Grid::filled(64, 64, Terrain::Grass).unwrap();
    for y in (2..64).step_by(4) {
        for x in 0..63 {
            let x = if (y / 4) % 2 == 0 { x } else { x + 1 };
            grid.set(Coord::new(x, y), Terrain::Mountain);
        }
    }
    grid
}

fn bench_pathfinding(c: &mut Criterion) {
    let grid = maze_grid();
    let occupied = Occupancy::new();

    c.bench_function("next_step_towards_64x64_maze", |b| {
        b.iter(|| {
            next_step_towards(
                black_box(Coord::new(0, 0)),
                black_box(Coord::new(63, 63)),
                black_box(&grid),
                black_box(&occupied),
            )
        });
    });

    c.bench_function("has_los_64x64_diagonal", |b| {
        b.iter(|| has_los(black_box(Coord::new(0, 1)), black_box(Coord::new(63, 61)), black_box(&grid)));
    });
}

fn bench_mapgen(c: &mut Criterion) {
    let small = SessionConfig::default();
    let large = SessionConfig {
        grid_size: 64,
        ..SessionConfig::default()
    };

    c.bench_function("mapgen_6x6", |b| {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        b.iter(|| mapgen::generate(black_box(&small), &mut rng).unwrap());
    });

    c.bench_function("mapgen_64x64", |b| {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        b.iter(|| mapgen::generate(black_box(&large), &mut rng).unwrap());
    });
}

fn bench_sessions(c: &mut Criterion) {
    let config = SessionConfig::default();

    c.bench_function("session_idle_player", |b| {
        b.iter(|| {
            let result = run_session(black_box(&config), black_box(42), ConstantOracle::new("no_action"));
            black_box(result)
        });
    });

    c.bench_function("10_sessions_sequential", |b| {
        b.iter(|| {
            for seed in 0..10u64 {
                let result = run_session(&config, seed, ConstantOracle::new("no_action"));
                black_box(result);
            }
        });
    });
}

criterion_group!(benches, bench_pathfinding, bench_mapgen, bench_sessions);
criterion_main!(benches);
