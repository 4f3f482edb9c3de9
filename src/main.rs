//! Skirmish CLI - run, watch, replay and batch grid skirmishes.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use cli::{LogTarget, OracleArgs, SessionArgs};

/// Skirmish - a deterministic grid skirmish driven by an external oracle
#[derive(Parser, Debug)]
#[command(name = "skirmish")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a single session headless
    Run {
        #[command(flatten)]
        oracle: OracleArgs,

        #[command(flatten)]
        session: SessionArgs,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Save recording to file
        #[arg(long)]
        save: Option<PathBuf>,

        /// Only log warnings and print only the result
        #[arg(short, long)]
        quiet: bool,
    },

    /// Interactive TUI to watch a session in real time
    Watch {
        #[command(flatten)]
        oracle: OracleArgs,

        #[command(flatten)]
        session: SessionArgs,

        /// Delay between phases in milliseconds (default: from config)
        #[arg(long)]
        speed: Option<u64>,

        /// Write logs to this file instead of discarding them
        #[arg(long)]
        log: Option<PathBuf>,
    },

    /// Replay a recorded session
    Replay {
        /// Recording file (.json)
        #[arg(required = true)]
        recording: PathBuf,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Start at specific turn
        #[arg(short, long)]
        turn: Option<u32>,
    },

    /// Run many headless sessions in parallel and aggregate statistics
    Batch {
        #[command(flatten)]
        oracle: OracleArgs,

        #[command(flatten)]
        session: SessionArgs,

        /// Number of sessions to run (default: 100)
        #[arg(short, long, default_value = "100")]
        games: u64,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::BatchFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let logging = match &args.command {
        Commands::Run { quiet, .. } => cli::init_logging(*quiet, LogTarget::Stderr),
        Commands::Watch { log, .. } => cli::init_logging(
            false,
            log.as_deref().map_or(LogTarget::Sink, LogTarget::File),
        ),
        Commands::Replay { .. } => cli::init_logging(true, LogTarget::Stderr),
        Commands::Batch { .. } => cli::init_logging(true, LogTarget::Stderr),
    };
    if let Err(e) = logging {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    let result = match args.command {
        Commands::Run {
            oracle,
            session,
            format,
            save,
            quiet,
        } => cli::run::execute(&oracle, &session, format, save, quiet),

        Commands::Watch {
            oracle,
            session,
            speed,
            log: _,
        } => cli::watch::execute(&oracle, &session, speed),

        Commands::Replay {
            recording,
            format,
            turn,
        } => cli::replay::execute(recording, format, turn),

        Commands::Batch {
            oracle,
            session,
            games,
            threads,
            format,
            progress,
        } => cli::batch::execute(&oracle, &session, games, threads, format, progress),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
