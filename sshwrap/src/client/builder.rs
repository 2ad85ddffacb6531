//! Builder for creating SSH clients.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use super::SshClient;
use crate::error::{ConfigError, Result};
use crate::transport::config::{
    AuthMethod, DEFAULT_PORT, DEFAULT_TIMEOUT, HostKeyVerification, SshConfig,
};

/// Builder for constructing an [`SshClient`].
///
/// # Example
///
/// ```rust,no_run
/// use sshwrap::ClientBuilder;
///
/// # async fn example() -> Result<(), sshwrap::Error> {
/// let client = ClientBuilder::new("192.168.1.1")
///     .username("admin")
///     .password("secret")
///     .build()?;
///
/// let response = client.run("uname -a").await?;
/// println!("{}", response.stdout);
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    host: String,
    port: u16,
    username: Option<String>,
    auth: AuthMethod,
    timeout: Duration,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
}

impl ClientBuilder {
    /// Create a new client builder for the specified host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            username: None,
            auth: AuthMethod::None,
            timeout: DEFAULT_TIMEOUT,
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
        }
    }

    /// Set the SSH port (default: 22).
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the username for authentication.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set password authentication.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.auth = AuthMethod::Password {
            password: SecretString::from(password.into()),
        };
        self
    }

    /// Set private key authentication.
    pub fn private_key(mut self, key_path: impl Into<PathBuf>) -> Self {
        self.auth = AuthMethod::PrivateKey {
            path: key_path.into(),
            passphrase: None,
        };
        self
    }

    /// Set private key authentication with passphrase.
    pub fn private_key_with_passphrase(
        mut self,
        key_path: impl Into<PathBuf>,
        passphrase: impl Into<String>,
    ) -> Self {
        self.auth = AuthMethod::PrivateKey {
            path: key_path.into(),
            passphrase: Some(SecretString::from(passphrase.into())),
        };
        self
    }

    /// Set the dial timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the host key verification mode.
    pub fn host_key_verification(mut self, mode: HostKeyVerification) -> Self {
        self.host_key_verification = mode;
        self
    }

    /// Use a known_hosts file other than `~/.ssh/known_hosts`.
    pub fn known_hosts_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.known_hosts_path = Some(path.into());
        self
    }

    /// Build and validate the connection configuration.
    pub fn build_config(self) -> Result<SshConfig> {
        let username = self.username.ok_or(ConfigError::MissingUsername)?;

        let config = SshConfig {
            host: self.host,
            port: self.port,
            username,
            auth: self.auth,
            timeout: self.timeout,
            host_key_verification: self.host_key_verification,
            known_hosts_path: self.known_hosts_path,
        };
        config.validate()?;

        Ok(config)
    }

    /// Build a client using the russh transport and SFTP file copy.
    ///
    /// This does not connect; every operation on the client opens its own
    /// connection.
    pub fn build(self) -> Result<SshClient> {
        Ok(SshClient::new(self.build_config()?))
    }
}
