//! SSH connection configuration.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

use crate::error::{ConfigError, Result};

/// Default SSH port.
pub const DEFAULT_PORT: u16 = 22;

/// Default dial timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Host key verification mode, analogous to OpenSSH's `StrictHostKeyChecking`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostKeyVerification {
    /// Reject unknown and changed keys. Connection fails if the host
    /// is not already in known_hosts.
    Strict,

    /// Accept and auto-learn unknown keys, but reject changed keys.
    /// This is the default and matches common SSH client behavior.
    #[default]
    AcceptNew,

    /// Accept all keys without checking. For testing and lab use only.
    Disabled,
}

/// SSH connection configuration.
///
/// Supplied once and never mutated for the lifetime of a client. Can be
/// built with [`ClientBuilder`](crate::ClientBuilder) or deserialized:
///
/// ```json
/// {
///   "host": "10.0.0.5",
///   "username": "deploy",
///   "auth": { "method": "private_key", "path": "/home/deploy/.ssh/id_ed25519" },
///   "timeout": "10s",
///   "host_key_verification": "strict"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct SshConfig {
    /// Target host (hostname or IP address).
    pub host: String,

    /// SSH port (default: 22).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Username for authentication.
    pub username: String,

    /// Authentication method.
    #[serde(default)]
    pub auth: AuthMethod,

    /// TCP dial timeout, also used as the connection inactivity timeout.
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    /// Host key verification mode.
    #[serde(default)]
    pub host_key_verification: HostKeyVerification,

    /// Path to known_hosts file.
    #[serde(default)]
    pub known_hosts_path: Option<PathBuf>,
}

impl SshConfig {
    /// Create a configuration with default port, timeout and host key policy.
    pub fn new(host: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            username: username.into(),
            auth: AuthMethod::None,
            timeout: DEFAULT_TIMEOUT,
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
        }
    }

    /// Get the socket address for connection.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Reject configurations that can never connect.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "host must not be empty".to_string(),
            }
            .into());
        }
        if self.username.is_empty() {
            return Err(ConfigError::MissingUsername.into());
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid {
                message: "port must not be 0".to_string(),
            }
            .into());
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid {
                message: "timeout must be greater than zero".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Authentication method for SSH connections.
#[derive(Debug, Default, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum AuthMethod {
    /// No authentication (for testing only).
    #[default]
    None,

    /// Password authentication.
    Password {
        #[serde(deserialize_with = "deserialize_secret")]
        password: SecretString,
    },

    /// Private key authentication.
    PrivateKey {
        /// Path to the private key file.
        path: PathBuf,
        /// Optional passphrase for encrypted keys.
        #[serde(default, deserialize_with = "deserialize_optional_secret")]
        passphrase: Option<SecretString>,
    },
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

fn deserialize_secret<'de, D>(deserializer: D) -> std::result::Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

fn deserialize_optional_secret<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|value| value.map(SecretString::from))
}
