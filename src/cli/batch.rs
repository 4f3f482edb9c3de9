//! Batch command implementation.

use super::output::{format_batch_csv, format_batch_text, BatchStats, JsonBatchResult};
use super::{BatchFormat, CliError, OracleArgs, SessionArgs};
use indicatif::{ProgressBar, ProgressStyle};
use skirmish::run_batch;
use std::time::Instant;

/// Execute the batch command.
///
/// # Errors
///
/// Returns an error if the config is invalid or output fails.
pub(crate) fn execute(
    oracle: &OracleArgs,
    session_args: &SessionArgs,
    games: u64,
    threads: Option<usize>,
    format: BatchFormat,
    progress: bool,
) -> Result<(), CliError> {
    let config = session_args.load_config()?;
    let base_seed = session_args.seed();

    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let pb = if progress {
        let pb = ProgressBar::new(games);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} sessions ({per_sec})")
            .map_err(|e| CliError::new(format!("bad progress template: {e}")))?
            .progress_chars("=>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();

    // One oracle process per session; processes hold conversation state.
    let results = run_batch(&config, base_seed, games, |_| oracle.spawn());

    for (i, result) in results.iter().enumerate() {
        if let Err(e) = result {
            tracing::warn!(seed = base_seed.wrapping_add(i as u64), error = %e, "session failed");
        }
    }
    let stats = BatchStats::from_results(&results);

    if let Some(pb) = pb {
        pb.set_position(stats.games_played + stats.games_failed);
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();

    #[allow(clippy::cast_precision_loss)]
    let sessions_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.games_played as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match format {
        BatchFormat::Text => {
            println!();
            print!("{}", format_batch_text(&stats));
            println!();
            println!(
                "Duration: {:.2}s ({:.1} sessions/sec)",
                duration.as_secs_f64(),
                sessions_per_sec
            );
        }
        BatchFormat::Json => {
            let json_result = JsonBatchResult::from_stats(&stats);
            println!("{}", serde_json::to_string_pretty(&json_result)?);
        }
        BatchFormat::Csv => {
            print!("{}", format_batch_csv(&results));
        }
    }

    if stats.games_played == 0 && games > 0 {
        return Err(CliError::new("no session could be started"));
    }
    Ok(())
}
