//! Session recording and replay.
//!
//! Because sessions are deterministic, replay requires only:
//! - `seed: u64` - the seed for map generation and placement
//! - `config: SessionConfig` - the settings in force
//! - `responses` - every answer the oracle gave, in order
//!
//! No state deltas needed. To view turn N, re-run the session from turn 1.
//!
//! # Time Travel
//!
//! - **Forward**: continue stepping the session
//! - **Backward**: re-run from turn 1 to (`current_turn` - 1)
//! - **Jump to turn N**: re-run from turn 1 to N

mod render;

pub use render::{cell_glyph, render_ascii, status_line, unit_glyph};

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::game::StepEvent;
use crate::oracle::ScriptedOracle;
use crate::session::{Session, Snapshot};

/// Minimal recording: seed, config and oracle answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    /// Seed of the recorded fight.
    pub seed: u64,
    /// Settings in force.
    pub config: SessionConfig,
    /// Oracle answers in query order; `None` marks a failed query.
    pub responses: Vec<Option<String>>,
}

impl Recording {
    /// Create a new recording.
    #[must_use]
    pub fn new(seed: u64, config: SessionConfig, responses: Vec<Option<String>>) -> Self {
        Self {
            seed,
            config,
            responses,
        }
    }

    /// Save as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), ReplayError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Error type for replay operations.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// Reading or writing the recording failed.
    #[error("recording i/o failed: {0}")]
    Io(#[from] io::Error),
    /// The recording is not valid JSON.
    #[error("invalid recording: {0}")]
    Format(#[from] serde_json::Error),
    /// The recorded session could not be rebuilt.
    #[error("failed to rebuild session: {0}")]
    Session(#[from] SessionError),
    /// Turn number out of bounds.
    #[error("turn {requested} out of bounds (1..={max_turn})")]
    TurnOutOfBounds {
        /// Requested turn.
        requested: u32,
        /// Last reachable turn.
        max_turn: u32,
    },
    /// The session is already decided.
    #[error("session is already over")]
    GameOver,
}

/// Replay engine - steps through a recorded session deterministically.
///
/// Since sessions are deterministic, this engine can:
/// - Step forward by running one full turn
/// - Step backward by replaying from turn 1
/// - Jump to any turn by replaying from turn 1
#[derive(Debug)]
pub struct ReplayEngine {
    recording: Recording,
    session: Session<ScriptedOracle>,
    /// Events of the most recent turn stepped.
    last_events: Vec<StepEvent>,
}

impl ReplayEngine {
    /// Create a replay engine at the start of turn 1.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be rebuilt.
    pub fn new(recording: Recording) -> Result<Self, ReplayError> {
        let oracle = ScriptedOracle::new(recording.responses.iter().cloned());
        let session = Session::new(recording.config.clone(), recording.seed, oracle)?;
        Ok(Self {
            recording,
            session,
            last_events: Vec::new(),
        })
    }

    /// Create a replay engine at the start of `target_turn`.
    ///
    /// # Errors
    ///
    /// Returns an error if the turn is out of bounds or the session cannot be
    /// rebuilt.
    pub fn new_at_turn(recording: Recording, target_turn: u32) -> Result<Self, ReplayError> {
        let mut engine = Self::new(recording)?;
        engine.check_turn(target_turn)?;
        while engine.turn() < target_turn && !engine.is_game_over() {
            engine.step_forward()?;
        }
        Ok(engine)
    }

    /// The recording.
    #[must_use]
    pub const fn recording(&self) -> &Recording {
        &self.recording
    }

    /// Current turn number.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.session.snapshot().turn.turn_number
    }

    /// Read-only view of the replayed session.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<'_> {
        self.session.snapshot()
    }

    /// Events of the most recent turn stepped.
    #[must_use]
    pub fn last_events(&self) -> &[StepEvent] {
        &self.last_events
    }

    /// Check if the session is decided or the turn cap is reached.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.session.snapshot().is_game_over() || self.turn() > self.recording.config.max_turns
    }

    /// Run the rest of the current turn, stopping at the start of the next
    /// player turn or when the session is decided.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::GameOver`] if the session is already over.
    pub fn step_forward(&mut self) -> Result<(), ReplayError> {
        if self.is_game_over() {
            return Err(ReplayError::GameOver);
        }

        self.last_events.clear();
        let start = self.turn();
        loop {
            let event = self.session.step();
            match event {
                StepEvent::Finished(_) => {
                    self.last_events.push(event);
                    break;
                }
                StepEvent::Waiting => {
                    self.session.finish_delay();
                    if self.turn() > start || self.session.snapshot().is_game_over() {
                        break;
                    }
                }
                StepEvent::Acted { .. } | StepEvent::DelayStarted { .. } => {
                    self.last_events.push(event);
                }
            }
        }
        Ok(())
    }

    /// Step back one turn by replaying from turn 1.
    ///
    /// # Errors
    ///
    /// Returns an error if already at turn 1.
    pub fn step_backward(&mut self) -> Result<(), ReplayError> {
        let current = self.turn();
        if current <= 1 {
            return Err(ReplayError::TurnOutOfBounds {
                requested: 0,
                max_turn: self.recording.config.max_turns,
            });
        }
        self.goto_turn(current - 1)
    }

    /// Jump to the start of `target_turn` by replaying from turn 1.
    ///
    /// Stops early if the session is decided first.
    ///
    /// # Errors
    ///
    /// Returns an error if the turn is out of bounds.
    pub fn goto_turn(&mut self, target_turn: u32) -> Result<(), ReplayError> {
        self.check_turn(target_turn)?;
        let recording = self.recording.clone();
        *self = Self::new_at_turn(recording, target_turn)?;
        Ok(())
    }

    /// Render the current state as text.
    #[must_use]
    pub fn render_ascii(&self) -> String {
        render_ascii(&self.snapshot())
    }

    fn check_turn(&self, target_turn: u32) -> Result<(), ReplayError> {
        let max_turn = self.recording.config.max_turns;
        if target_turn == 0 || target_turn > max_turn {
            return Err(ReplayError::TurnOutOfBounds {
                requested: target_turn,
                max_turn,
            });
        }
        Ok(())
    }
}
