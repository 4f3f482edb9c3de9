//! In-memory oracles for tests, replays and benches.

use std::collections::VecDeque;

use crate::error::OracleError;
use crate::oracle::Oracle;

/// Answers from a fixed queue of responses.
///
/// A `None` entry stands for "no result" and yields [`OracleError::Empty`].
/// Once the queue is drained every query fails with [`OracleError::Closed`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedOracle {
    responses: VecDeque<Option<String>>,
}

impl ScriptedOracle {
    /// Build from recorded answers.
    #[must_use]
    pub fn new(responses: impl IntoIterator<Item = Option<String>>) -> Self {
        Self {
            responses: responses.into_iter().collect(),
        }
    }

    /// Build from answers that are all present.
    #[must_use]
    pub fn from_terms<S: Into<String>>(terms: impl IntoIterator<Item = S>) -> Self {
        Self::new(terms.into_iter().map(|t| Some(t.into())))
    }

    /// Answers not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.responses.len()
    }
}

impl Oracle for ScriptedOracle {
    fn ask(&mut self, _request: &str) -> Result<String, OracleError> {
        match self.responses.pop_front() {
            Some(Some(answer)) => Ok(answer),
            Some(None) => Err(OracleError::Empty),
            None => Err(OracleError::Closed),
        }
    }
}

/// Answers every query with the same term.
#[derive(Debug, Clone)]
pub struct ConstantOracle {
    answer: String,
}

impl ConstantOracle {
    /// Always answer `answer`.
    #[must_use]
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
        }
    }
}

impl Oracle for ConstantOracle {
    fn ask(&mut self, _request: &str) -> Result<String, OracleError> {
        Ok(self.answer.clone())
    }
}

/// Wraps an oracle and keeps every answer for later replay.
///
/// Failed queries are stored as `None`.
#[derive(Debug, Clone)]
pub struct RecordingOracle<O> {
    inner: O,
    responses: Vec<Option<String>>,
}

impl<O: Oracle> RecordingOracle<O> {
    /// Record answers from `inner`.
    #[must_use]
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            responses: Vec::new(),
        }
    }

    /// Answers recorded so far.
    #[must_use]
    pub fn responses(&self) -> &[Option<String>] {
        &self.responses
    }

    /// Drop recorded answers, e.g. after a restart.
    pub fn clear(&mut self) {
        self.responses.clear();
    }
}

impl<O: Oracle> Oracle for RecordingOracle<O> {
    fn ask(&mut self, request: &str) -> Result<String, OracleError> {
        let answer = self.inner.ask(request);
        self.responses.push(answer.as_ref().ok().cloned());
        answer
    }
}
