//! Replay command implementation.

use super::output::describe_event;
use super::{CliError, OutputFormat};
use serde::Serialize;
use skirmish::game::StepEvent;
use skirmish::replay::{Recording, ReplayEngine, ReplayError};
use skirmish::Snapshot;
use std::path::PathBuf;

/// One replayed turn in JSON output.
#[derive(Debug, Serialize)]
struct JsonTurn<'a> {
    /// Turn the events belong to.
    turn: u32,
    /// Events that led to `state`.
    events: &'a [StepEvent],
    /// State after the events.
    state: Snapshot<'a>,
}

/// Execute the replay command.
///
/// # Errors
///
/// Returns an error if the recording cannot be loaded or replayed.
pub(crate) fn execute(
    recording_path: PathBuf,
    format: OutputFormat,
    turn: Option<u32>,
) -> Result<(), CliError> {
    let recording = Recording::load(&recording_path).map_err(|e| {
        CliError::new(format!("Failed to load recording {}: {e}", recording_path.display()))
    })?;

    let engine = if let Some(target_turn) = turn {
        ReplayEngine::new_at_turn(recording, target_turn)?
    } else {
        ReplayEngine::new(recording)?
    };

    match format {
        OutputFormat::Text => print_text_replay(engine),
        OutputFormat::Json => print_json_replay(engine),
    }
}

fn print_text_replay(mut engine: ReplayEngine) -> Result<(), CliError> {
    println!("Replay (seed: {})", engine.recording().seed);
    println!();
    println!("{}", engine.render_ascii());

    loop {
        let turn = engine.turn();
        match engine.step_forward() {
            Ok(()) => {}
            Err(ReplayError::GameOver) => break,
            Err(e) => return Err(e.into()),
        }

        println!("=== Turn {turn} ===");
        let world = engine.snapshot().world;
        for event in engine.last_events() {
            if let Some(line) = describe_event(event, world) {
                println!("  {line}");
            }
        }
        println!();
        println!("{}", engine.render_ascii());
    }

    Ok(())
}

fn print_json_replay(mut engine: ReplayEngine) -> Result<(), CliError> {
    let mut turns = vec![serde_json::to_value(JsonTurn {
        turn: engine.turn(),
        events: &[],
        state: engine.snapshot(),
    })?];

    loop {
        let turn = engine.turn();
        match engine.step_forward() {
            Ok(()) => {}
            Err(ReplayError::GameOver) => break,
            Err(e) => return Err(e.into()),
        }
        turns.push(serde_json::to_value(JsonTurn {
            turn,
            events: engine.last_events(),
            state: engine.snapshot(),
        })?);
    }

    println!("{}", serde_json::to_string_pretty(&turns)?);
    Ok(())
}
