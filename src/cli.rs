//! CLI command implementations for skirmish.

pub(crate) mod batch;
pub(crate) mod replay;
pub(crate) mod run;
pub(crate) mod watch;

mod output;

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::{Args, ValueEnum};
use skirmish::replay::ReplayError;
use skirmish::{ConfigError, OracleError, ProcessOracle, SessionConfig, SessionError};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Output format for the `run` and `replay` commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `batch` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum BatchFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// One CSV row per game.
    Csv,
}

/// How to launch the oracle process.
#[derive(Debug, Clone, Args)]
pub(crate) struct OracleArgs {
    /// Oracle program (e.g. `swipl` or a wrapper script)
    #[arg(long = "oracle", required = true)]
    pub(crate) program: String,

    /// Argument passed to the oracle program (repeatable)
    #[arg(long = "oracle-arg", allow_hyphen_values = true)]
    pub(crate) args: Vec<String>,
}

impl OracleArgs {
    /// Start the oracle process.
    pub(crate) fn spawn(&self) -> Result<ProcessOracle, OracleError> {
        ProcessOracle::spawn(&self.program, &self.args)
    }
}

/// Settings shared by every command that starts sessions.
#[derive(Debug, Clone, Args)]
pub(crate) struct SessionArgs {
    /// Random seed (default: random)
    #[arg(short, long)]
    pub(crate) seed: Option<u64>,

    /// Session config file (JSON)
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,

    /// Override the turn cap from the config
    #[arg(long)]
    pub(crate) max_turns: Option<u32>,
}

impl SessionArgs {
    /// Load the config file, or defaults, and apply overrides.
    pub(crate) fn load_config(&self) -> Result<SessionConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => SessionConfig::load(path)?,
            None => SessionConfig::default(),
        };
        if let Some(max_turns) = self.max_turns {
            config.max_turns = max_turns;
        }
        config.validate()?;
        Ok(config)
    }

    /// The given seed, or one drawn from the clock.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(42)
        })
    }
}

/// Where log output goes.
#[derive(Debug, Clone, Copy)]
pub(crate) enum LogTarget<'a> {
    /// Standard error.
    Stderr,
    /// Append to a file.
    File(&'a Path),
    /// Discard everything.
    Sink,
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides the default filter.
pub(crate) fn init_logging(quiet: bool, target: LogTarget<'_>) -> Result<(), CliError> {
    let default = if quiet { "skirmish=warn" } else { "skirmish=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    let installed = match target {
        LogTarget::Stderr => builder.with_writer(io::stderr).try_init(),
        LogTarget::File(path) => {
            let file = File::options().create(true).append(true).open(path)?;
            builder.with_writer(Mutex::new(file)).with_ansi(false).try_init()
        }
        LogTarget::Sink => builder.with_writer(io::sink).try_init(),
    };
    installed.map_err(|e| CliError::new(format!("failed to install logger: {e}")))
}

/// CLI error type.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// Free-form failure.
    #[error("{0}")]
    Message(String),
    /// Terminal or file I/O failed.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// Bad config.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Oracle could not be started.
    #[error(transparent)]
    Oracle(#[from] OracleError),
    /// Session could not be built.
    #[error(transparent)]
    Session(#[from] SessionError),
    /// Recording could not be loaded, saved or replayed.
    #[error(transparent)]
    Replay(#[from] ReplayError),
    /// Output could not be serialized.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}
