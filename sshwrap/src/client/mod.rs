//! High-level client for one-shot remote commands and file copies.
//!
//! Every top-level operation runs a full connect, open session, act, close
//! cycle. The client itself holds only configuration and the injected
//! transport and copy collaborators, so it can be shared freely between
//! tasks.

mod builder;
mod copy;
pub(crate) mod response;
mod runner;

pub use builder::ClientBuilder;
pub use response::Response;

use std::fmt;

use log::debug;

use crate::error::Result;
use crate::session::Session;
use crate::transfer::{CopyProtocol, SftpCopy};
use crate::transport::{Connection, SshConfig, SshTransport, Transport};

/// Channel type produced by a transport's connections.
pub type ChannelOf<T> = <<T as Transport>::Connection as Connection>::Channel;

/// Session type produced by a transport's connections.
pub type SessionOf<T> = Session<<T as Transport>::Connection>;

/// SSH client handle.
///
/// # Example
///
/// ```rust,no_run
/// use sshwrap::ClientBuilder;
///
/// # async fn example() -> Result<(), sshwrap::Error> {
/// let client = ClientBuilder::new("192.168.1.1")
///     .username("admin")
///     .private_key("/home/admin/.ssh/id_ed25519")
///     .build()?;
///
/// let response = client.run("hostname").await?;
/// println!("{}", response.stdout.trim());
///
/// client.copy_to_remote("report.csv", "/tmp/report.csv").await?;
/// # Ok(())
/// # }
/// ```
pub struct SshClient<T = SshTransport, P = SftpCopy> {
    /// SSH configuration.
    config: SshConfig,

    /// Connector used for every operation.
    transport: T,

    /// File copy collaborator.
    copier: P,
}

impl SshClient {
    /// Create a client using the russh transport and SFTP file copy.
    pub fn new(config: SshConfig) -> Self {
        Self::with_transport(config, SshTransport, SftpCopy)
    }

    /// Start building a client for `host`.
    pub fn builder(host: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(host)
    }
}

impl<T, P> SshClient<T, P>
where
    T: Transport,
    P: CopyProtocol<ChannelOf<T>>,
{
    /// Create a client with custom transport and copy collaborators.
    pub fn with_transport(config: SshConfig, transport: T, copier: P) -> Self {
        Self {
            config,
            transport,
            copier,
        }
    }

    /// Get the SSH configuration.
    pub fn config(&self) -> &SshConfig {
        &self.config
    }

    /// Dial the host and authenticate.
    ///
    /// Use [`connect_and_session`](Self::connect_and_session) unless the
    /// session has to be created separately.
    pub async fn connect(&self) -> Result<T::Connection> {
        self.transport.connect(&self.config).await
    }

    /// Open a session with the default pty on an existing connection.
    pub async fn open_session(&self, connection: &T::Connection) -> Result<SessionOf<T>> {
        let session = Session::open_default(connection).await?;
        debug!("Session ready on {}", self.config.socket_addr());
        Ok(session)
    }

    /// Connect and open a default session, ready for a command.
    pub async fn connect_and_session(&self) -> Result<SessionOf<T>> {
        let connection = self.connect().await?;
        self.open_session(&connection).await
    }
}

impl<T, P> fmt::Debug for SshClient<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SshClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
