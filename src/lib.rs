// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Skirmish: a deterministic turn-based grid combat engine.
//!
//! One player unit faces several computer-controlled enemies on a small
//! terrain grid. The player's actions come from an external decision oracle
//! that receives a textual snapshot of the world and answers with a single
//! action term.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Session (config, RNG, replay)     │
//! ├──────────────────┬──────────────────┤
//! │  TurnController  │  OracleProtocol  │
//! ├──────────────────┴──────────────────┤
//! │  Resolver · AI · Pathfinding · LOS  │
//! ├─────────────────────────────────────┤
//! │         Grid + entity registry      │
//! └─────────────────────────────────────┘
//! ```
//!
//! Given a config, a seed and the oracle's answers, a session always plays
//! out the same way.

pub mod config;
pub mod error;
pub mod game;
pub mod oracle;
pub mod replay;
pub mod session;

pub use config::{SessionConfig, TerrainWeights};
pub use error::{ConfigError, OracleError, ResolutionError, SessionError};

// Re-export key game types at crate root for convenience
pub use game::{Action, Coord, EnemyKind, Entity, EntityId, Grid, Outcome, Terrain, World};
pub use oracle::{Oracle, OracleProtocol, ProcessOracle, RecordingOracle, ScriptedOracle};
pub use session::{run_batch, run_session, InputEvent, Session, SessionResult, Snapshot};
