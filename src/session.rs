//! Session root: owns the world, the turn controller and the oracle.
//!
//! A session is fully determined by its config, seed and the oracle's
//! answers. The inter-turn delay is left to the caller: a TUI waits out
//! [`Session::turn_delay`] before calling [`Session::finish_delay`], while
//! headless runs end it immediately.

pub mod mapgen;

use std::collections::HashSet;
use std::time::Duration;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;
use crate::error::{ConfigError, OracleError, SessionError};
use crate::game::{Outcome, Phase, StepEvent, TurnController, TurnState, World};
use crate::oracle::{Oracle, OracleProtocol};

/// Discrete events from the input collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Stop the session.
    Quit,
    /// Pause or resume; honored only during the inter-turn delay.
    TogglePause,
    /// Throw away the current fight and generate a new one.
    Restart,
}

/// Read-only view of a session for renderers.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Snapshot<'a> {
    /// Grid and units.
    pub world: &'a World,
    /// Turn bookkeeping.
    pub turn: TurnState,
    /// Controller phase.
    pub phase: Phase,
    /// Whether the delay is paused.
    pub paused: bool,
    /// Outcome once decided.
    pub outcome: Option<Outcome>,
}

impl Snapshot<'_> {
    /// Check if the fight is decided.
    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.outcome.is_some()
    }
}

/// Summary of a finished headless session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    /// Seed the session ran with.
    pub seed: u64,
    /// Outcome, or `None` if the turn cap was hit.
    pub winner: Option<Outcome>,
    /// Turn in which the session ended.
    pub turns_played: u32,
    /// Player hp at the end.
    pub player_hp: u32,
    /// Enemies still alive at the end.
    pub enemies_alive: usize,
    /// Actions resolved across both sides.
    pub actions: u32,
    /// Player decisions that degraded to no action.
    pub oracle_failures: u32,
}

/// One encounter.
#[derive(Debug)]
pub struct Session<O> {
    config: SessionConfig,
    seed: u64,
    rng: ChaCha8Rng,
    world: World,
    controller: TurnController,
    protocol: OracleProtocol<O>,
    paused: bool,
    quit: bool,
}

impl<O: Oracle> Session<O> {
    /// Validate `config`, generate the map and place every unit.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Config`] for invalid settings or an
    /// unplayable map.
    pub fn new(config: SessionConfig, seed: u64, oracle: O) -> Result<Self, SessionError> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let world = build_world(&config, &mut rng)?;
        let controller = TurnController::new(config.player_actions, config.enemy_action_pool);

        tracing::info!(
            seed,
            size = config.grid_size,
            enemies = config.enemies.len(),
            "session started"
        );

        Ok(Self {
            config,
            seed,
            rng,
            world,
            controller,
            protocol: OracleProtocol::new(oracle),
            paused: false,
            quit: false,
        })
    }

    /// Advance by one decision point or phase transition.
    pub fn step(&mut self) -> StepEvent {
        if self.quit {
            return StepEvent::Waiting;
        }
        self.controller.step(&mut self.world, &mut self.protocol)
    }

    /// End the inter-turn delay unless paused.
    ///
    /// Returns `true` if a new phase started.
    pub fn finish_delay(&mut self) -> bool {
        if self.paused || self.quit {
            return false;
        }
        self.controller.finish_delay(&self.world)
    }

    /// Apply an input event. Returns whether it was honored.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a restart cannot generate a playable map.
    pub fn handle_input(&mut self, event: InputEvent) -> Result<bool, ConfigError> {
        match event {
            InputEvent::Quit => {
                self.quit = true;
                Ok(true)
            }
            InputEvent::TogglePause => {
                if !self.controller.in_delay() {
                    return Ok(false);
                }
                self.paused = !self.paused;
                tracing::debug!(paused = self.paused, "pause toggled");
                Ok(true)
            }
            InputEvent::Restart => {
                self.restart()?;
                Ok(true)
            }
        }
    }

    /// Start a fresh fight with a seed drawn from this session's RNG.
    fn restart(&mut self) -> Result<(), ConfigError> {
        let seed = self.rng.next_u64();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.world = build_world(&self.config, &mut rng)?;
        self.rng = rng;
        self.seed = seed;
        self.controller =
            TurnController::new(self.config.player_actions, self.config.enemy_action_pool);
        self.paused = false;
        tracing::info!(seed, "session restarted");
        Ok(())
    }

    /// Run with zero delay until decided, quit, or past `max_turns`.
    pub fn run_to_end(&mut self) -> SessionResult {
        self.paused = false;

        while !self.quit && self.controller.outcome().is_none() {
            if let StepEvent::Waiting = self.step() {
                self.finish_delay();
                if self.controller.state().turn_number > self.config.max_turns {
                    tracing::info!(max_turns = self.config.max_turns, "turn cap reached");
                    break;
                }
            }
        }

        self.result()
    }

    /// Summarize the session as it stands.
    #[must_use]
    pub fn result(&self) -> SessionResult {
        SessionResult {
            seed: self.seed,
            winner: self.controller.outcome(),
            turns_played: self.controller.state().turn_number.min(self.config.max_turns),
            player_hp: self.world.player().hp,
            enemies_alive: self.world.living_enemies().count(),
            actions: self.controller.actions_taken(),
            oracle_failures: self.protocol.failures(),
        }
    }

    /// Read-only view for renderers.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            world: &self.world,
            turn: self.controller.state(),
            phase: self.controller.phase(),
            paused: self.paused,
            outcome: self.controller.outcome(),
        }
    }

    /// The world.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Settings in force.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Seed of the current fight (changes on restart).
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Presentation pause between phases.
    #[must_use]
    pub const fn turn_delay(&self) -> Duration {
        Duration::from_millis(self.config.turn_delay_ms)
    }

    /// Check if the delay is paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Check if a quit was requested.
    #[must_use]
    pub const fn should_quit(&self) -> bool {
        self.quit
    }

    /// Check if the controller is waiting in the inter-turn delay.
    #[must_use]
    pub const fn in_delay(&self) -> bool {
        self.controller.in_delay()
    }

    /// The wrapped oracle.
    #[must_use]
    pub fn oracle(&self) -> &O {
        self.protocol.oracle()
    }

    /// Mutable access to the wrapped oracle.
    pub fn oracle_mut(&mut self) -> &mut O {
        self.protocol.oracle_mut()
    }

    /// Consume the session and return its oracle.
    #[must_use]
    pub fn into_oracle(self) -> O {
        self.protocol.into_inner()
    }
}

/// Generate a map and place the player then each roster enemy on distinct
/// grass cells.
fn build_world(config: &SessionConfig, rng: &mut ChaCha8Rng) -> Result<World, ConfigError> {
    let grid = mapgen::generate(config, rng)?;

    let needed = config.enemies.len() + 1;
    let available = grid.walkable_count();
    if available < needed {
        return Err(ConfigError::NotEnoughWalkable { needed, available });
    }

    let mut taken = HashSet::with_capacity(needed);
    let player_pos = mapgen::random_walkable_position(&grid, &taken, rng);
    taken.insert(player_pos);

    let mut enemy_positions = Vec::with_capacity(config.enemies.len());
    for _ in &config.enemies {
        let pos = mapgen::random_walkable_position(&grid, &taken, rng);
        taken.insert(pos);
        enemy_positions.push(pos);
    }

    let mut world = World::new(grid, player_pos, config.player_hp);
    for (&kind, pos) in config.enemies.iter().zip(enemy_positions) {
        world.spawn_enemy(kind, pos);
    }
    Ok(world)
}

/// Run one headless session to completion.
///
/// # Errors
///
/// Returns [`SessionError::Config`] if the session cannot be built.
pub fn run_session<O: Oracle>(
    config: &SessionConfig,
    seed: u64,
    oracle: O,
) -> Result<SessionResult, SessionError> {
    let mut session = Session::new(config.clone(), seed, oracle)?;
    let result = session.run_to_end();
    tracing::info!(
        seed,
        winner = ?result.winner,
        turns = result.turns_played,
        "session finished"
    );
    Ok(result)
}

/// Run `games` headless sessions in parallel, seeds counting up from
/// `base_seed`. Each game gets its own oracle from `make_oracle`.
///
/// Results are returned in seed order.
pub fn run_batch<O, F>(
    config: &SessionConfig,
    base_seed: u64,
    games: u64,
    make_oracle: F,
) -> Vec<Result<SessionResult, SessionError>>
where
    O: Oracle,
    F: Fn(u64) -> Result<O, OracleError> + Sync,
{
    (0..games)
        .into_par_iter()
        .map(|i| {
            let seed = base_seed.wrapping_add(i);
            let oracle = make_oracle(seed)?;
            run_session(config, seed, oracle)
        })
        .collect()
}
