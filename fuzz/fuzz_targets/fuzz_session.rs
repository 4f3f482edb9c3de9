#![no_main]

//! Full session fuzzer.
//!
//! Drives a whole session with an arbitrary sequence of oracle answers,
//! including missing ones, and checks the world after every step.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use skirmish::game::{check_invariants, StepEvent};
use skirmish::{ScriptedOracle, Session, SessionConfig};

/// Structured input for session fuzzing.
#[derive(Arbitrary, Debug)]
struct SessionInput {
    /// Map and placement seed.
    seed: u64,
    /// Grid side, reduced to 2..=12.
    size: u8,
    /// Oracle answers in query order.
    answers: Vec<Option<String>>,
}

fuzz_target!(|input: SessionInput| {
    let config = SessionConfig {
        grid_size: u16::from(input.size % 11) + 2,
        max_turns: 20,
        ..SessionConfig::default()
    };
    let answers = input.answers.into_iter().take(64);
    let Ok(mut session) = Session::new(config, input.seed, ScriptedOracle::new(answers)) else {
        return;
    };

    for _ in 0..1_000 {
        match session.step() {
            StepEvent::Finished(_) => break,
            StepEvent::Waiting => {
                session.finish_delay();
                if session.snapshot().turn.turn_number > session.config().max_turns {
                    break;
                }
            }
            StepEvent::Acted { .. } | StepEvent::DelayStarted { .. } => {}
        }
        let violations = check_invariants(session.world());
        assert!(violations.is_empty(), "invariants broken: {violations:?}");
    }
});
