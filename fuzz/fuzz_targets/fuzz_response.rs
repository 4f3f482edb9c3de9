#![no_main]

//! Oracle response parser fuzzer.
//!
//! Feeds arbitrary text to the parser and, when it parses, maps the term
//! against a real request snapshot.

use libfuzzer_sys::fuzz_target;
use skirmish::game::{Coord, EnemyKind, Grid, Terrain, World};
use skirmish::oracle::{OracleRequest, ResponseTerm};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let Ok(term) = ResponseTerm::parse(text) else {
        return;
    };

    let Some(map) = Grid::filled(6, 6, Terrain::Grass) else {
        return;
    };
    let mut world = World::new(map, Coord::new(0, 0), 5);
    world.spawn_enemy(EnemyKind::Ranged, Coord::new(2, 3));
    world.spawn_enemy(EnemyKind::Melee, Coord::new(4, 1));

    let request = OracleRequest::encode(&world, 2);
    let _ = term.into_action(&request);
});
