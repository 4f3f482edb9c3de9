//! End-to-end tests: full sessions, recording and replay, oracle processes.
//!
//! Run with: cargo test --release session_integration

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use skirmish::game::{
    apply, check_invariants, decide_action, Action, Effect, EnemyKind, Grid, Outcome, StepEvent,
    Terrain, World, PLAYER_ID,
};
use skirmish::oracle::ConstantOracle;
use skirmish::replay::{Recording, ReplayEngine};
use skirmish::{
    run_batch, run_session, Coord, Oracle, OracleError, RecordingOracle, Session, SessionConfig,
};

/// Oracle that strikes the first enemy listed in the request for 10 damage.
///
/// Melee attacks are not range-checked at resolution, so this clears any
/// roster in one action per enemy.
struct Executioner;

impl Oracle for Executioner {
    fn ask(&mut self, request: &str) -> Result<String, OracleError> {
        let Some(start) = request.find("enemy(") else {
            return Ok("no_action".to_string());
        };
        let body = &request[start + "enemy(".len()..];
        let end = body.find(')').unwrap();
        let fields: Vec<&str> = body[..end].split(',').collect();
        Ok(format!("melee_attack({},{},10)", fields[1], fields[2]))
    }
}

fn grass_world(player: Coord) -> World {
    terrain_world(player, &[])
}

/// 6x6 grass world with a few cells overridden.
fn terrain_world(player: Coord, cells: &[(Coord, Terrain)]) -> World {
    let mut map = Grid::filled(6, 6, Terrain::Grass).unwrap();
    for &(coord, terrain) in cells {
        map.set(coord, terrain);
    }
    World::new(map, player, 5)
}

#[test]
fn test_melee_closes_in_and_strikes() {
    let mut world = grass_world(Coord::new(0, 0));
    let melee = world.spawn_enemy(EnemyKind::Melee, Coord::new(2, 0));

    let action = decide_action(&world, world.entity(melee).unwrap());
    assert_eq!(action, Action::Move { dest: Coord::new(1, 0) });
    apply(&mut world, melee, &action);
    assert_eq!(world.entity(melee).unwrap().pos.chebyshev(world.player().pos), 1);

    let action = decide_action(&world, world.entity(melee).unwrap());
    assert_eq!(
        action,
        Action::MeleeAttack {
            target: PLAYER_ID,
            damage: 2
        }
    );
    apply(&mut world, melee, &action);
    assert_eq!(world.player().hp, 3);
}

#[test]
fn test_ranged_behind_mountain_moves_instead_of_shooting() {
    let mut world = terrain_world(Coord::new(0, 0), &[(Coord::new(1, 0), Terrain::Mountain)]);
    let ranged = world.spawn_enemy(EnemyKind::Ranged, Coord::new(2, 0));

    let action = decide_action(&world, world.entity(ranged).unwrap());
    assert!(matches!(action, Action::Move { .. }), "got {action:?}");
}

#[test]
fn test_push_into_water_drowns() {
    let mut world = terrain_world(Coord::new(0, 0), &[(Coord::new(2, 0), Terrain::Water)]);
    let melee = world.spawn_enemy(EnemyKind::Melee, Coord::new(1, 0));

    let effect = apply(
        &mut world,
        PLAYER_ID,
        &Action::MeleePush {
            target: melee,
            direction: skirmish::game::Offset::new(1, 0),
        },
    );
    assert!(matches!(effect, Effect::Pushed { drowned: true, .. }));
    assert_eq!(world.entity(melee).unwrap().hp, 0);
    assert_eq!(world.outcome(), Some(Outcome::PlayerWins));
}

#[test]
fn test_executioner_wins_first_turn() {
    let result = run_session(&SessionConfig::default(), 42, Executioner).unwrap();
    assert_eq!(result.winner, Some(Outcome::PlayerWins));
    assert_eq!(result.turns_played, 1);
    assert_eq!(result.enemies_alive, 0);
    assert_eq!(result.player_hp, 5);
    assert_eq!(result.actions, 2);
    assert_eq!(result.oracle_failures, 0);
}

#[test]
fn test_idle_player_never_wins() {
    for seed in 0..20 {
        let result = run_session(&SessionConfig::default(), seed, ConstantOracle::new("no_action")).unwrap();
        assert_ne!(result.winner, Some(Outcome::PlayerWins), "seed {seed}");
        assert!(result.turns_played <= 200);
        if result.winner == Some(Outcome::EnemiesWin) {
            assert_eq!(result.player_hp, 0);
        }
    }
}

#[test]
fn test_invariants_hold_every_step() {
    for seed in 0..20 {
        let config = SessionConfig {
            max_turns: 40,
            ..SessionConfig::default()
        };
        let mut session = Session::new(config, seed, ConstantOracle::new("move(0,0)")).unwrap();
        let grid = session.world().map().clone();
        for _ in 0..400 {
            match session.step() {
                StepEvent::Finished(_) => break,
                StepEvent::Waiting => {
                    session.finish_delay();
                }
                StepEvent::Acted { .. } | StepEvent::DelayStarted { .. } => {}
            }
            let violations = check_invariants(session.world());
            assert!(violations.is_empty(), "seed {seed}: {violations:?}");
            assert_eq!(session.world().map(), &grid, "seed {seed}: terrain changed");
        }
    }
}

#[test]
fn test_sessions_are_deterministic() {
    let config = SessionConfig::default();
    let a = run_session(&config, 7, ConstantOracle::new("no_action")).unwrap();
    let b = run_session(&config, 7, ConstantOracle::new("no_action")).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_batch_matches_single_runs() {
    let config = SessionConfig {
        max_turns: 50,
        ..SessionConfig::default()
    };
    let results = run_batch(&config, 100, 8, |_| Ok(ConstantOracle::new("no_action")));
    assert_eq!(results.len(), 8);

    for (i, result) in results.into_iter().enumerate() {
        let result = result.unwrap();
        let seed = 100 + i as u64;
        assert_eq!(result.seed, seed);
        let single = run_session(&config, seed, ConstantOracle::new("no_action")).unwrap();
        assert_eq!(result, single);
    }
}

#[test]
fn test_batch_reports_oracle_spawn_failures() {
    let results = run_batch(&SessionConfig::default(), 0, 3, |seed| {
        if seed == 1 {
            Err(OracleError::Closed)
        } else {
            Ok(ConstantOracle::new("no_action"))
        }
    });
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
    assert!(results[2].is_ok());
}

#[test]
fn test_config_file_drives_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{ "grid_size": 8, "enemies": ["melee", "melee", "ranged"], "player_hp": 9 }"#,
    )
    .unwrap();

    let config = SessionConfig::load(&path).unwrap();
    let session = Session::new(config, 3, ConstantOracle::new("no_action")).unwrap();
    let world = session.world();
    assert_eq!(world.map().width(), 8);
    assert_eq!(world.entities().len(), 4);
    assert_eq!(world.player().hp, 9);
    assert!(check_invariants(world).is_empty());
}

#[test]
fn test_recording_replays_to_same_state() {
    let config = SessionConfig::default();
    let mut session = Session::new(config.clone(), 11, RecordingOracle::new(Executioner)).unwrap();
    let result = session.run_to_end();
    let responses = session.oracle().responses().to_vec();
    assert_eq!(responses.len(), 2);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fight.json");
    Recording::new(11, config, responses).save(&path).unwrap();

    let mut engine = ReplayEngine::new(Recording::load(&path).unwrap()).unwrap();
    while engine.step_forward().is_ok() {}

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.outcome, result.winner);
    assert_eq!(snapshot.world, session.world());
}

#[cfg(unix)]
mod process {
    use super::*;
    use skirmish::ProcessOracle;

    #[test]
    fn test_shell_oracle_plays_full_session() {
        let oracle = ProcessOracle::spawn("sh", &["-c", "while read -r line; do echo no_action; done"]).unwrap();
        let config = SessionConfig {
            max_turns: 20,
            ..SessionConfig::default()
        };
        let result = run_session(&config, 5, oracle).unwrap();
        assert_eq!(result.oracle_failures, 0);
        assert_ne!(result.winner, Some(Outcome::PlayerWins));
    }

    #[test]
    fn test_echo_oracle_answers_are_malformed() {
        // `cat` sends the request back, which is not a valid action term.
        let oracle = ProcessOracle::spawn::<&str>("cat", &[]).unwrap();
        let config = SessionConfig {
            max_turns: 3,
            ..SessionConfig::default()
        };
        let result = run_session(&config, 5, oracle).unwrap();
        assert!(result.oracle_failures > 0);
    }
}
