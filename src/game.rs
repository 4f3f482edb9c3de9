//! Game layer for skirmish.
//!
//! Implements the rules of the encounter:
//! - Terrain grid with grass, mountains and water
//! - Units with hit points and a stable registry
//! - Pathfinding and line of sight
//! - Enemy decision logic
//! - Action resolution and the turn state machine

mod action;
pub mod ai;
mod entity;
pub mod invariants;
mod los;
mod map;
mod pathfinding;
mod resolve;
mod state;
mod turn;

pub use action::Action;
pub use ai::decide_action;
pub use entity::{EnemyKind, Entity, EntityId, Role};
pub use invariants::{assert_invariants, check_invariants, InvariantViolation};
pub use los::{has_los, line_cells};
pub use map::{Coord, Grid, Offset, Terrain};
pub use pathfinding::{next_step_towards, step_away_from, Occupancy};
pub use resolve::{apply, resolve, Effect};
pub use state::{Outcome, World, PLAYER_ID};
pub use turn::{Phase, PlayerAgent, Side, StepEvent, TurnController, TurnState};
