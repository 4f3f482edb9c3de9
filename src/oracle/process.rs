//! Oracle backed by a long-lived child process.

use std::io::{self, BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use crate::error::OracleError;
use crate::oracle::Oracle;

/// Talks to an external program over its stdin and stdout.
///
/// Each query writes the request term followed by `.` and a newline, then
/// reads exactly one line as the answer. A Prolog agent is typically wrapped
/// in a small read-eval loop that answers with the `Action` bound by its
/// `best_action/2` predicate.
///
/// The child is killed when the oracle is dropped.
#[derive(Debug)]
pub struct ProcessOracle {
    program: String,
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl ProcessOracle {
    /// Start `program` with `args`.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::Spawn`] if the process cannot be started.
    pub fn spawn<S: AsRef<str>>(program: &str, args: &[S]) -> Result<Self, OracleError> {
        let spawn_error = |source| OracleError::Spawn {
            program: program.to_string(),
            source,
        };

        let mut child = Command::new(program)
            .args(args.iter().map(AsRef::as_ref))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(spawn_error)?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.kill();
            return Err(spawn_error(io::Error::other("child pipes were not captured")));
        };

        tracing::info!(program, pid = child.id(), "oracle process started");

        Ok(Self {
            program: program.to_string(),
            child,
            stdin,
            stdout: BufReader::new(stdout),
        })
    }

    /// Program this oracle runs.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Oracle for ProcessOracle {
    fn ask(&mut self, request: &str) -> Result<String, OracleError> {
        writeln!(self.stdin, "{request}.")?;
        self.stdin.flush()?;

        let mut line = String::new();
        if self.stdout.read_line(&mut line)? == 0 {
            return Err(OracleError::Closed);
        }

        let answer = line.trim();
        if answer.is_empty() {
            return Err(OracleError::Empty);
        }
        Ok(answer.to_string())
    }
}

impl Drop for ProcessOracle {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        tracing::debug!(program = %self.program, "oracle process stopped");
    }
}
