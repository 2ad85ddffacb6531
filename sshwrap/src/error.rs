//! Error types for sshwrap.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::client::Response;

/// Main error type for sshwrap operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// SSH transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Session channel errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Remote command errors
    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    /// File transfer errors
    #[error("Transfer error: {0}")]
    Transfer(#[from] TransferError),
}

impl Error {
    /// The output captured from a remote command before it failed.
    ///
    /// Returns `None` for every error raised before the command started
    /// (dial, handshake, session setup) and for transfers.
    pub fn response(&self) -> Option<&Response> {
        match self {
            Error::Command(CommandError::Failed { response })
            | Error::Command(CommandError::Interrupted { response, .. }) => Some(response.as_ref()),
            _ => None,
        }
    }
}

/// Configuration errors raised before any connection attempt.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No username was supplied
    #[error("Username is required")]
    MissingUsername,

    /// A field holds an unusable value
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

/// Transport layer errors (TCP dial, SSH handshake, authentication).
#[derive(Error, Debug)]
pub enum TransportError {
    /// TCP connection could not be established
    #[error("Connection failed to {addr}: {source}")]
    Dial {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// TCP connection did not complete within the dial timeout
    #[error("Connection to {addr} timed out after {timeout:?}")]
    DialTimeout { addr: String, timeout: Duration },

    /// SSH handshake and authentication did not finish in time
    #[error("SSH handshake timed out after {0:?}")]
    HandshakeTimeout(Duration),

    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// SSH key error
    #[error("SSH key error: {0}")]
    Key(String),

    /// Host is not in known_hosts (strict mode)
    #[error("Host key for {host}:{port} is not known")]
    HostKeyUnknown { host: String, port: u16 },

    /// Host key does not match the known_hosts entry
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged { host: String, port: u16, line: usize },

    /// known_hosts could not be read
    #[error("known_hosts error: {0}")]
    KnownHosts(String),
}

impl TransportError {
    /// Check if the error happened while dialing, before any SSH traffic.
    pub fn is_dial(&self) -> bool {
        matches!(
            self,
            TransportError::Dial { .. } | TransportError::DialTimeout { .. }
        )
    }

    /// Check if the server or the local host key policy rejected the connection.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            TransportError::AuthenticationFailed { .. }
                | TransportError::Key(_)
                | TransportError::HostKeyUnknown { .. }
                | TransportError::HostKeyChanged { .. }
                | TransportError::KnownHosts(_)
        )
    }
}

/// Session errors (channel open, PTY request, close).
#[derive(Error, Debug)]
pub enum SessionError {
    /// Failed to open a session channel
    #[error("Failed to open session channel: {0}")]
    OpenFailed(String),

    /// The server refused the PTY request
    #[error("PTY request rejected by remote host")]
    PtyRejected,

    /// The PTY request could not be sent
    #[error("PTY request failed: {0}")]
    PtyRequestFailed(String),

    /// Channel closed unexpectedly
    #[error("Channel closed")]
    Closed,

    /// Closing the channel failed
    #[error("Failed to close channel: {0}")]
    CloseFailed(String),
}

/// Remote command errors.
#[derive(Error, Debug)]
pub enum CommandError {
    /// The command ran but did not exit successfully
    #[error("Command '{}' failed: {}", .response.command, .response.exit_status)]
    Failed { response: Box<Response> },

    /// The server refused to start the command
    #[error("Exec request for '{command}' rejected by remote host")]
    ExecRejected { command: String },

    /// SSH protocol error while running the command
    #[error("Channel SSH error: {0}")]
    Ssh(russh::Error),

    /// The command did not finish; `response` holds the output captured so far
    #[error("Command '{}' interrupted: {source}", .response.command)]
    Interrupted {
        response: Box<Response>,
        #[source]
        source: Box<Error>,
    },
}

/// File transfer errors.
#[derive(Error, Debug)]
pub enum TransferError {
    /// Local file could not be read or written
    #[error("Local file '{path}': {source}")]
    Local {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Local path is not a regular file
    #[error("'{0}' is not a regular file")]
    NotAFile(PathBuf),

    /// Remote side failed to read or write the file
    #[error("Remote file '{path}': {reason}")]
    Remote { path: String, reason: String },

    /// The server does not offer the copy subsystem
    #[error("Subsystem '{0}' rejected by remote host")]
    SubsystemRejected(String),

    /// The copy sub-protocol could not be started
    #[error("Failed to start file transfer: {0}")]
    Protocol(String),
}

/// Result type alias using sshwrap's Error.
pub type Result<T> = std::result::Result<T, Error>;
