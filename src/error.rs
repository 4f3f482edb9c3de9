//! Error types for the simulation.
//!
//! Only [`ConfigError`] and construction-time [`OracleError`]s are fatal.
//! Everything raised while a session is running is absorbed at the turn-loop
//! boundary and logged.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::game::{Coord, EntityId, Terrain};

/// Invalid configuration or an unplayable generated map.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
    /// Map generation produced no grass at all.
    #[error("generated map has no walkable cell")]
    NoWalkableCell,
    /// Too few grass cells to place every unit on its own cell.
    #[error("map has {available} walkable cells but {needed} units must be placed")]
    NotEnoughWalkable {
        /// Units to place (player plus roster).
        needed: usize,
        /// Grass cells on the map.
        available: usize,
    },
    /// Config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// Config file is not valid JSON for a [`crate::SessionConfig`].
    #[error("failed to parse config {path}: {source}")]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_json::Error,
    },
}

/// Failure talking to, or understanding, the decision oracle.
#[derive(Debug, Error)]
pub enum OracleError {
    /// The oracle process could not be started.
    #[error("failed to start oracle `{program}`: {source}")]
    Spawn {
        /// Program that was launched.
        program: String,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// Reading from or writing to the oracle failed.
    #[error("oracle i/o failed: {0}")]
    Io(#[from] io::Error),
    /// The oracle closed its output.
    #[error("oracle closed its output")]
    Closed,
    /// The oracle answered with nothing.
    #[error("oracle returned no result")]
    Empty,
    /// The answer does not match the response grammar.
    #[error("malformed oracle response `{0}`")]
    Malformed(String),
    /// The answer names a target cell with no enemy in the request snapshot.
    #[error("no enemy at {0} in the request snapshot")]
    NoTargetAt(Coord),
}

/// Why an action could not be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// The identifier is not in the registry.
    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),
    /// The acting unit is dead.
    #[error("actor {0} is dead")]
    ActorDead(EntityId),
    /// The target is dead.
    #[error("target {0} is dead")]
    TargetDead(EntityId),
    /// The destination lies off the grid.
    #[error("destination {0} is out of bounds")]
    OutOfBounds(Coord),
    /// The destination terrain does not admit the unit.
    #[error("destination {at} is {terrain:?}")]
    Blocked {
        /// Destination cell.
        at: Coord,
        /// Its terrain.
        terrain: Terrain,
    },
    /// Another living unit stands on the destination.
    #[error("destination {0} is occupied")]
    Occupied(Coord),
    /// A mountain lies between shooter and target.
    #[error("no line of sight from {from} to {to}")]
    NoLineOfSight {
        /// Shooter position.
        from: Coord,
        /// Target position.
        to: Coord,
    },
}

/// Fatal failure while building a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Bad configuration or unplayable map.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Oracle unavailable at startup.
    #[error(transparent)]
    Oracle(#[from] OracleError),
}
