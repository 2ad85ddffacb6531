//! Pseudo-terminal request parameters.

use russh::Pty;

/// Terminal type requested for default sessions.
pub const DEFAULT_TERM: &str = "xterm";

/// Terminal width (columns) for default sessions.
pub const DEFAULT_WIDTH: u32 = 80;

/// Terminal height (rows) for default sessions.
pub const DEFAULT_HEIGHT: u32 = 40;

/// Input and output baud rate for default sessions (14.4 kbaud).
pub const DEFAULT_SPEED: u32 = 14400;

/// A pseudo-terminal request sent when a session is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PtyRequest {
    /// Value of the remote `TERM`.
    pub term: String,

    /// Terminal width in columns.
    pub width: u32,

    /// Terminal height in rows.
    pub height: u32,

    /// Encoded terminal modes.
    pub modes: Vec<(Pty, u32)>,
}

impl PtyRequest {
    /// Create a request with no terminal modes set.
    pub fn new(term: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            term: term.into(),
            width,
            height,
            modes: Vec::new(),
        }
    }

    /// Add a terminal mode.
    pub fn with_mode(mut self, mode: Pty, value: u32) -> Self {
        self.modes.push((mode, value));
        self
    }

    /// Look up the value of a terminal mode.
    pub fn mode(&self, mode: Pty) -> Option<u32> {
        self.modes
            .iter()
            .find(|(m, _)| *m == mode)
            .map(|(_, value)| *value)
    }
}

impl Default for PtyRequest {
    /// `xterm`, 80x40, echo off, 14400 baud in both directions.
    fn default() -> Self {
        Self::new(DEFAULT_TERM, DEFAULT_WIDTH, DEFAULT_HEIGHT)
            .with_mode(Pty::ECHO, 0)
            .with_mode(Pty::TTY_OP_ISPEED, DEFAULT_SPEED)
            .with_mode(Pty::TTY_OP_OSPEED, DEFAULT_SPEED)
    }
}
