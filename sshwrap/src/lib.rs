//! # sshwrap
//!
//! Async SSH client for one-shot remote commands and single-file transfers.
//!
//! sshwrap takes care of the connection and session lifecycle so callers
//! can run a command or copy a file with one call. The SSH protocol is
//! handled by russh and file copy by the SFTP subsystem.
//!
//! ## Features
//!
//! - Bounded TCP dial and a fixed one-second SSH handshake window
//! - Password, private key, and `none` authentication
//! - known_hosts verification (strict, accept-new, disabled)
//! - Pty-backed command execution with separate stdout/stderr capture
//! - Single-file upload and download
//! - Pluggable transport and copy collaborators for testing
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sshwrap::ClientBuilder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sshwrap::Error> {
//!     let client = ClientBuilder::new("192.168.1.1")
//!         .username("admin")
//!         .password("secret")
//!         .build()?;
//!
//!     let response = client.run("uname -a").await?;
//!     println!("{}", response.stdout);
//!
//!     client.copy_from_remote("/etc/hostname", "hostname.txt").await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod session;
pub mod transfer;
pub mod transport;

// Re-export main types for convenience
pub use client::{ClientBuilder, Response, SshClient};
pub use error::{Error, Result};
pub use session::{ExitStatus, Output, PtyRequest, Session};
pub use transfer::{CopyProtocol, SftpCopy};
pub use transport::{
    AuthMethod, Connection, HostKeyVerification, SessionChannel, SshConfig, SshTransport,
    Transport,
};
