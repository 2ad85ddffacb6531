//! SSH transport layer.
//!
//! The traits in this module are the seam between the client lifecycle
//! (connect, open session, run, close) and the library that speaks SSH.
//! [`SshTransport`] implements them on top of russh; tests can substitute
//! an in-memory implementation.

pub mod config;
mod ssh;

use std::future::Future;

use crate::error::Result;
use crate::session::{ExitStatus, Output, PtyRequest};

pub use config::{AuthMethod, HostKeyVerification, SshConfig};
pub use ssh::{HANDSHAKE_TIMEOUT, SshChannel, SshConnection, SshTransport};

/// Capability to establish authenticated SSH connections.
pub trait Transport: Send + Sync {
    /// Connection type produced by this transport.
    type Connection: Connection;

    /// Dial, handshake and authenticate using `config`.
    fn connect(&self, config: &SshConfig) -> impl Future<Output = Result<Self::Connection>> + Send;
}

/// An authenticated, multiplexed connection.
///
/// Clones share the same underlying connection.
pub trait Connection: Clone + Send + Sync {
    /// Channel type opened on this connection.
    type Channel: SessionChannel;

    /// Open a new session channel.
    fn open_channel(&self) -> impl Future<Output = Result<Self::Channel>> + Send;
}

/// A single session channel.
pub trait SessionChannel: Send {
    /// Request a pseudo-terminal and wait for the server's answer.
    fn request_pty(&mut self, pty: &PtyRequest) -> impl Future<Output = Result<()>> + Send;

    /// Run `command` to completion, writing its streams into `output`.
    fn exec(
        &mut self,
        command: &str,
        output: &mut Output,
    ) -> impl Future<Output = Result<ExitStatus>> + Send;

    /// Close the channel.
    fn close(self) -> impl Future<Output = Result<()>> + Send;
}
