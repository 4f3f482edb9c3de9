//! Run command implementation.

use super::output::format_text;
use super::{CliError, OracleArgs, OutputFormat, SessionArgs};
use skirmish::replay::{render_ascii, Recording};
use skirmish::{RecordingOracle, Session};
use std::path::PathBuf;

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the oracle cannot be started, the config is invalid
/// or the recording cannot be saved.
pub(crate) fn execute(
    oracle: &OracleArgs,
    session_args: &SessionArgs,
    format: OutputFormat,
    save: Option<PathBuf>,
    quiet: bool,
) -> Result<(), CliError> {
    let config = session_args.load_config()?;
    let seed = session_args.seed();

    let process = oracle.spawn()?;
    let mut session = Session::new(config.clone(), seed, RecordingOracle::new(process))?;

    if !quiet && format == OutputFormat::Text {
        println!("Running session with seed {seed}...");
        println!("Oracle: {}", oracle.program);
        println!();
        println!("{}", render_ascii(&session.snapshot()));
    }

    let result = session.run_to_end();

    // Save recording if requested
    if let Some(save_path) = save {
        let responses = session.oracle().responses().to_vec();
        Recording::new(seed, config, responses)
            .save(&save_path)
            .map_err(|e| CliError::new(format!("Failed to save recording: {e}")))?;
        if !quiet && format == OutputFormat::Text {
            println!("Recording saved to: {}", save_path.display());
            println!();
        }
    }

    match format {
        OutputFormat::Text => {
            if !quiet {
                println!("{}", render_ascii(&session.snapshot()));
            }
            print!("{}", format_text(&result));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
