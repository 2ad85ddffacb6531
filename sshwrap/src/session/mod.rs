//! Sessions: one channel with a pty and its captured output.
//!
//! A [`Session`] is opened per top-level operation and consumed by
//! [`Session::close`], so a closed session cannot be used again.

mod buffer;
mod pty;

use std::borrow::Cow;
use std::fmt;

use log::{debug, warn};

pub use buffer::Output;
pub use pty::{DEFAULT_HEIGHT, DEFAULT_SPEED, DEFAULT_TERM, DEFAULT_WIDTH, PtyRequest};
pub use russh::Pty;

use crate::error::Result;
use crate::transport::{Connection, SessionChannel};

/// How a remote command finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitStatus {
    /// Exited with a status code.
    Code(u32),

    /// Terminated by a signal.
    Signal(String),

    /// The channel closed without reporting an exit status.
    Unknown,
}

impl ExitStatus {
    /// Check if the command exited with status 0.
    pub fn success(&self) -> bool {
        matches!(self, ExitStatus::Code(0))
    }

    /// The exit code, if the command exited normally.
    pub fn code(&self) -> Option<u32> {
        match self {
            ExitStatus::Code(code) => Some(*code),
            _ => None,
        }
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitStatus::Code(code) => write!(f, "exit status {}", code),
            ExitStatus::Signal(signal) => write!(f, "killed by signal {}", signal),
            ExitStatus::Unknown => write!(f, "no exit status"),
        }
    }
}

/// A logical channel on a connection, with stdout/stderr bound to its own
/// buffers.
pub struct Session<N: Connection> {
    /// Keeps the connection alive for as long as the session exists.
    connection: N,
    channel: N::Channel,
    pty: Option<PtyRequest>,
    output: Output,
}

impl<N: Connection> Session<N> {
    /// Open a session with the default pty (`xterm`, 80x40, echo off,
    /// 14400 baud).
    pub async fn open_default(connection: &N) -> Result<Self> {
        Self::open(connection, PtyRequest::default()).await
    }

    /// Open a session and request the given pty.
    ///
    /// If the pty request fails the channel is closed before the error is
    /// returned.
    pub async fn open(connection: &N, pty: PtyRequest) -> Result<Self> {
        let mut channel = connection.open_channel().await?;

        if let Err(e) = channel.request_pty(&pty).await {
            debug!("PTY request failed, closing channel: {}", e);
            if let Err(close_err) = channel.close().await {
                warn!("Ignoring error while closing session: {}", close_err);
            }
            return Err(e);
        }

        Ok(Self {
            connection: connection.clone(),
            channel,
            pty: Some(pty),
            output: Output::new(),
        })
    }

    /// Open a session without a pty.
    ///
    /// Used for byte-exact transfers, where a terminal's line discipline
    /// would rewrite the payload.
    pub async fn open_raw(connection: &N) -> Result<Self> {
        let channel = connection.open_channel().await?;
        Ok(Self {
            connection: connection.clone(),
            channel,
            pty: None,
            output: Output::new(),
        })
    }

    /// The connection this session runs on.
    pub fn connection(&self) -> &N {
        &self.connection
    }

    /// The pty granted to this session, if one was requested.
    pub fn pty(&self) -> Option<&PtyRequest> {
        self.pty.as_ref()
    }

    /// Output captured so far.
    pub fn output(&self) -> &Output {
        &self.output
    }

    /// Captured stdout text.
    pub fn stdout(&self) -> Cow<'_, str> {
        self.output.stdout()
    }

    /// Captured stderr text.
    pub fn stderr(&self) -> Cow<'_, str> {
        self.output.stderr()
    }

    /// Run a command to completion, capturing into this session's buffers.
    pub(crate) async fn exec(&mut self, command: &str) -> Result<ExitStatus> {
        self.channel.exec(command, &mut self.output).await
    }

    /// Take the captured output, leaving empty buffers behind.
    pub(crate) fn take_output(&mut self) -> Output {
        self.output.take()
    }

    pub(crate) fn channel_mut(&mut self) -> &mut N::Channel {
        &mut self.channel
    }

    /// Close the session's channel.
    pub async fn close(self) -> Result<()> {
        self.channel.close().await
    }

    /// Close the session, logging and discarding any error.
    pub(crate) async fn close_quietly(self) {
        if let Err(e) = self.close().await {
            warn!("Ignoring error while closing session: {}", e);
        }
    }
}

impl<N: Connection + fmt::Debug> fmt::Debug for Session<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("connection", &self.connection)
            .field("pty", &self.pty)
            .field("output", &self.output)
            .finish()
    }
}
