//! Response type for command execution results.

use std::time::Duration;

use crate::session::{ExitStatus, Output};

/// Response from a remote command execution.
#[derive(Debug, Clone)]
pub struct Response {
    /// The command that was executed.
    pub command: String,

    /// Everything the command wrote to stdout.
    pub stdout: String,

    /// Everything the command wrote to stderr.
    pub stderr: String,

    /// How the command finished.
    pub exit_status: ExitStatus,

    /// Time taken to execute the command.
    pub elapsed: Duration,
}

impl Response {
    /// Build a response from a finished session's output.
    pub fn new(
        command: impl Into<String>,
        output: &Output,
        exit_status: ExitStatus,
        elapsed: Duration,
    ) -> Self {
        Self {
            command: command.into(),
            stdout: output.stdout().into_owned(),
            stderr: output.stderr().into_owned(),
            exit_status,
            elapsed,
        }
    }

    /// Check if the command exited with status 0.
    pub fn is_success(&self) -> bool {
        self.exit_status.success()
    }

    /// Get the stdout lines as an iterator.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.stdout.lines()
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.stdout)
    }
}
