#![no_main]

//! Action resolution fuzzer.
//!
//! Applies arbitrary actions from arbitrary actors to a mixed-terrain world
//! and checks the world invariants after each one.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use skirmish::game::{
    apply, check_invariants, Action, Coord, EnemyKind, EntityId, Grid, Offset, Terrain, World,
};

/// A fuzzer-generated action.
#[derive(Arbitrary, Debug, Clone, Copy)]
enum FuzzAction {
    Move { x: i32, y: i32 },
    MeleeAttack { target: u8, damage: u8 },
    MeleePush { target: u8, dx: i32, dy: i32 },
    RangedAttack { target: u8, damage: u8 },
    None,
}

impl FuzzAction {
    fn into_action(self) -> Action {
        match self {
            Self::Move { x, y } => Action::Move {
                dest: Coord::new(x, y),
            },
            Self::MeleeAttack { target, damage } => Action::MeleeAttack {
                target: EntityId(u32::from(target % 4)),
                damage: u32::from(damage),
            },
            Self::MeleePush { target, dx, dy } => Action::MeleePush {
                target: EntityId(u32::from(target % 4)),
                direction: Offset::new(dx, dy),
            },
            Self::RangedAttack { target, damage } => Action::RangedAttack {
                target: EntityId(u32::from(target % 4)),
                damage: u32::from(damage),
            },
            Self::None => Action::None,
        }
    }
}

/// Structured input for resolution fuzzing.
#[derive(Arbitrary, Debug)]
struct ResolveInput {
    /// Terrain codes for a 6x6 grid, row-major.
    terrain: [u8; 36],
    /// Actor index and action pairs.
    steps: Vec<(u8, FuzzAction)>,
}

fuzz_target!(|input: ResolveInput| {
    let rows: Vec<Vec<Terrain>> = input
        .terrain
        .chunks(6)
        .map(|row| {
            row.iter()
                .map(|code| match code % 4 {
                    1 => Terrain::Mountain,
                    2 => Terrain::Water,
                    _ => Terrain::Grass,
                })
                .collect()
        })
        .collect();
    let Some(mut map) = Grid::from_rows(&rows) else {
        return;
    };

    // Units start on grass so the starting world is valid.
    let starts = [Coord::new(0, 0), Coord::new(5, 5), Coord::new(5, 0)];
    for start in starts {
        map.set(start, Terrain::Grass);
    }
    let mut world = World::new(map, starts[0], 5);
    world.spawn_enemy(EnemyKind::Ranged, starts[1]);
    world.spawn_enemy(EnemyKind::Melee, starts[2]);

    for (actor, action) in input.steps.into_iter().take(64) {
        apply(&mut world, EntityId(u32::from(actor % 3)), &action.into_action());
        let violations = check_invariants(&world);
        assert!(violations.is_empty(), "invariants broken: {violations:?}");
    }
});
