//! The decision oracle for the player unit.
//!
//! The oracle is an opaque text-in, text-out decision source. This module
//! owns the protocol on top of it: [`OracleRequest`] encodes the world,
//! [`ResponseTerm`] parses the answer, and [`OracleProtocol`] ties both to the
//! turn controller. Any failure along the way degrades that single decision
//! to [`Action::None`].

mod process;
mod request;
mod response;
mod scripted;

pub use process::ProcessOracle;
pub use request::OracleRequest;
pub use response::ResponseTerm;
pub use scripted::{ConstantOracle, RecordingOracle, ScriptedOracle};

use crate::error::OracleError;
use crate::game::{Action, PlayerAgent, World};

/// A source of answers to request terms.
pub trait Oracle {
    /// Send one request and wait for one answer.
    ///
    /// # Errors
    ///
    /// Returns an [`OracleError`] if the oracle is unreachable or returns
    /// nothing.
    fn ask(&mut self, request: &str) -> Result<String, OracleError>;
}

impl<O: Oracle + ?Sized> Oracle for Box<O> {
    fn ask(&mut self, request: &str) -> Result<String, OracleError> {
        (**self).ask(request)
    }
}

/// Protocol driver: snapshot, query, parse, resolve targets.
#[derive(Debug)]
pub struct OracleProtocol<O> {
    oracle: O,
    queries: u32,
    failures: u32,
}

impl<O: Oracle> OracleProtocol<O> {
    /// Wrap an oracle.
    #[must_use]
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            queries: 0,
            failures: 0,
        }
    }

    /// Ask for the player's next action.
    ///
    /// # Errors
    ///
    /// Returns the first failure among the query, the parse, and target
    /// resolution.
    pub fn request_action(&mut self, world: &World, actions_left: u32) -> Result<Action, OracleError> {
        let request = OracleRequest::encode(world, actions_left);
        let answer = self.oracle.ask(request.as_str())?;
        ResponseTerm::parse(&answer)?.into_action(&request)
    }

    /// The wrapped oracle.
    #[must_use]
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Mutable access to the wrapped oracle.
    pub fn oracle_mut(&mut self) -> &mut O {
        &mut self.oracle
    }

    /// Unwrap the oracle.
    #[must_use]
    pub fn into_inner(self) -> O {
        self.oracle
    }

    /// Queries sent so far.
    #[must_use]
    pub const fn queries(&self) -> u32 {
        self.queries
    }

    /// Queries that degraded to no action.
    #[must_use]
    pub const fn failures(&self) -> u32 {
        self.failures
    }
}

impl<O: Oracle> PlayerAgent for OracleProtocol<O> {
    fn next_action(&mut self, world: &World, actions_left: u32) -> Action {
        self.queries += 1;
        match self.request_action(world, actions_left) {
            Ok(action) => action,
            Err(error) => {
                self.failures += 1;
                tracing::warn!(%error, "oracle decision failed, skipping action");
                Action::None
            }
        }
    }
}
