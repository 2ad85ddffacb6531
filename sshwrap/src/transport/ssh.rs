//! SSH transport implementation using russh.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, trace, warn};
use russh::client::{self, Handle, Msg};
use russh::keys::{PrivateKey, PrivateKeyWithHashAlg, PublicKey, load_secret_key};
use russh::{Channel, ChannelMsg};
use secrecy::{ExposeSecret, SecretString};
use tokio::net::TcpStream;

use super::config::{AuthMethod, HostKeyVerification, SshConfig};
use super::{Connection, SessionChannel, Transport};
use crate::error::{CommandError, Error, Result, SessionError, TransferError, TransportError};
use crate::session::{ExitStatus, Output, PtyRequest};

/// Upper bound for the SSH handshake, independent of the dial timeout.
///
/// Covers key exchange, host key verification and user authentication.
/// Private keys are read and decrypted before dialing, outside this bound.
pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(1);

/// Credentials ready to send, with any private key already decrypted.
enum Credentials<'a> {
    None,
    Password(&'a SecretString),
    Key(Arc<PrivateKey>),
}

impl<'a> Credentials<'a> {
    /// Resolve the configured auth method.
    ///
    /// Key decryption (bcrypt KDF for encrypted OpenSSH keys) is CPU bound,
    /// so it runs on the blocking pool.
    async fn resolve(auth: &'a AuthMethod) -> Result<Self> {
        match auth {
            AuthMethod::None => Ok(Credentials::None),
            AuthMethod::Password { password } => Ok(Credentials::Password(password)),
            AuthMethod::PrivateKey { path, passphrase } => {
                let key_path = path.clone();
                let passphrase = passphrase.clone();
                let key = tokio::task::spawn_blocking(move || {
                    load_secret_key(&key_path, passphrase.as_ref().map(|p| p.expose_secret()))
                })
                .await
                .map_err(|e| TransportError::Key(format!("{}: {}", path.display(), e)))?
                .map_err(|e| TransportError::Key(format!("{}: {}", path.display(), e)))?;

                debug!("Loaded private key {}", path.display());
                Ok(Credentials::Key(Arc::new(key)))
            }
        }
    }
}

/// russh-backed [`Transport`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SshTransport;

impl Transport for SshTransport {
    type Connection = SshConnection;

    async fn connect(&self, config: &SshConfig) -> Result<SshConnection> {
        SshConnection::establish(config).await
    }
}

/// Authenticated SSH connection wrapping a russh client handle.
///
/// The socket stays open until [`disconnect`](Self::disconnect) is called
/// or the last clone is dropped.
#[derive(Clone)]
pub struct SshConnection {
    /// The russh session handle.
    session: Arc<Handle<SshHandler>>,

    /// Address this connection was dialed to.
    addr: String,
}

impl std::fmt::Debug for SshConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SshConnection")
            .field("addr", &self.addr)
            .field("session", &"<russh::Handle>")
            .finish()
    }
}

impl SshConnection {
    /// Dial the server, then handshake and authenticate.
    async fn establish(config: &SshConfig) -> Result<Self> {
        let addr = config.socket_addr();
        let credentials = Credentials::resolve(&config.auth).await?;

        debug!("Dialing {} (timeout {:?})", addr, config.timeout);
        let stream = match tokio::time::timeout(config.timeout, TcpStream::connect(addr.as_str()))
            .await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => return Err(TransportError::Dial { addr, source }.into()),
            Err(_) => {
                return Err(TransportError::DialTimeout {
                    addr,
                    timeout: config.timeout,
                }
                .into());
            }
        };

        let session = tokio::time::timeout(
            HANDSHAKE_TIMEOUT,
            Self::handshake(config, credentials, stream),
        )
        .await
        .map_err(|_| TransportError::HandshakeTimeout(HANDSHAKE_TIMEOUT))??;

        debug!("Authenticated to {} as '{}'", addr, config.username);

        Ok(Self {
            session: Arc::new(session),
            addr,
        })
    }

    /// Run the SSH handshake over an established TCP stream and authenticate.
    async fn handshake(
        config: &SshConfig,
        credentials: Credentials<'_>,
        stream: TcpStream,
    ) -> Result<Handle<SshHandler>> {
        let ssh_config = Arc::new(client::Config {
            inactivity_timeout: Some(config.timeout),
            ..Default::default()
        });

        let host_key_error: Arc<Mutex<Option<TransportError>>> = Arc::new(Mutex::new(None));

        let handler = SshHandler {
            host: config.host.clone(),
            port: config.port,
            host_key_verification: config.host_key_verification.clone(),
            known_hosts_path: config.known_hosts_path.clone(),
            host_key_error: host_key_error.clone(),
        };

        let mut session = client::connect_stream(ssh_config, stream, handler)
            .await
            .map_err(|e| {
                // Prefer the detailed host key error over russh's generic UnknownKey
                let detailed = host_key_error.lock().ok().and_then(|mut slot| slot.take());
                detailed.unwrap_or(TransportError::Ssh(e))
            })?;

        Self::authenticate(&mut session, &config.username, credentials).await?;

        Ok(session)
    }

    /// Authenticate with the server.
    async fn authenticate(
        session: &mut Handle<SshHandler>,
        username: &str,
        credentials: Credentials<'_>,
    ) -> Result<()> {
        let success = match credentials {
            Credentials::None => session
                .authenticate_none(username)
                .await
                .map_err(TransportError::Ssh)?
                .success(),
            Credentials::Password(password) => session
                .authenticate_password(username, password.expose_secret())
                .await
                .map_err(TransportError::Ssh)?
                .success(),
            Credentials::Key(key) => {
                // Get the best RSA hash algorithm supported by the server
                let hash_alg = session
                    .best_supported_rsa_hash()
                    .await
                    .map_err(TransportError::Ssh)?
                    .flatten();

                session
                    .authenticate_publickey(username, PrivateKeyWithHashAlg::new(key, hash_alg))
                    .await
                    .map_err(TransportError::Ssh)?
                    .success()
            }
        };

        if !success {
            return Err(TransportError::AuthenticationFailed {
                user: username.to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Disconnect politely. Other clones of this connection stop working.
    pub async fn disconnect(&self) -> Result<()> {
        self.session
            .disconnect(russh::Disconnect::ByApplication, "", "en")
            .await
            .map_err(TransportError::Ssh)?;
        Ok(())
    }
}

impl Connection for SshConnection {
    type Channel = SshChannel;

    async fn open_channel(&self) -> Result<SshChannel> {
        let channel = self
            .session
            .channel_open_session()
            .await
            .map_err(|e| SessionError::OpenFailed(e.to_string()))?;

        debug!("Opened channel {:?} on {}", channel.id(), self.addr);

        Ok(SshChannel {
            channel: Some(channel),
        })
    }
}

/// Session channel on an [`SshConnection`].
pub struct SshChannel {
    /// `None` once handed over to a subsystem such as SFTP.
    channel: Option<Channel<Msg>>,
}

impl SshChannel {
    fn channel_mut(&mut self) -> Result<&mut Channel<Msg>> {
        self.channel.as_mut().ok_or_else(|| SessionError::Closed.into())
    }

    /// Start a subsystem (e.g. `sftp`) and hand the raw channel to the caller.
    ///
    /// Closing this `SshChannel` afterwards is a no-op; the subsystem client
    /// owns the channel.
    pub(crate) async fn start_subsystem(
        &mut self,
        name: &str,
    ) -> std::result::Result<Channel<Msg>, TransferError> {
        let Some(channel) = self.channel.as_mut() else {
            return Err(TransferError::Protocol(format!(
                "channel already handed to a subsystem, cannot start '{}'",
                name
            )));
        };

        channel
            .request_subsystem(true, name)
            .await
            .map_err(|e| TransferError::Protocol(format!("{} subsystem request: {}", name, e)))?;

        let accepted = wait_for_reply(channel)
            .await
            .map_err(|e| TransferError::Protocol(format!("{} subsystem request: {}", name, e)))?;
        if !accepted {
            return Err(TransferError::SubsystemRejected(name.to_string()));
        }

        self.channel
            .take()
            .ok_or_else(|| TransferError::Protocol(format!("{} subsystem: channel gone", name)))
    }
}

impl SessionChannel for SshChannel {
    async fn request_pty(&mut self, pty: &PtyRequest) -> Result<()> {
        let channel = self.channel_mut()?;
        channel
            .request_pty(
                true,
                &pty.term,
                pty.width,
                pty.height,
                0,
                0,
                &pty.modes,
            )
            .await
            .map_err(|e| SessionError::PtyRequestFailed(e.to_string()))?;

        if wait_for_reply(channel).await? {
            Ok(())
        } else {
            Err(SessionError::PtyRejected.into())
        }
    }

    async fn exec(&mut self, command: &str, output: &mut Output) -> Result<ExitStatus> {
        let channel = self.channel_mut()?;
        channel
            .exec(true, command)
            .await
            .map_err(CommandError::Ssh)?;

        let mut exit_status = None;
        let mut got_eof = false;

        loop {
            match channel.wait().await {
                Some(ChannelMsg::Data { data }) => output.extend_stdout(&data),
                Some(ChannelMsg::ExtendedData { data, ext }) => {
                    if ext == 1 {
                        output.extend_stderr(&data);
                    }
                }
                Some(ChannelMsg::Failure) if exit_status.is_none() => {
                    return Err(CommandError::ExecRejected {
                        command: command.to_string(),
                    }
                    .into());
                }
                Some(ChannelMsg::ExitStatus { exit_status: code }) => {
                    exit_status = Some(ExitStatus::Code(code));
                    if got_eof {
                        break;
                    }
                }
                Some(ChannelMsg::ExitSignal { signal_name, .. }) => {
                    exit_status = Some(ExitStatus::Signal(format!("{:?}", signal_name)));
                    if got_eof {
                        break;
                    }
                }
                Some(ChannelMsg::Eof) => {
                    got_eof = true;
                    if exit_status.is_some() {
                        break;
                    }
                }
                Some(ChannelMsg::Close) | None => break,
                Some(other) => trace!("Ignoring channel message {:?}", other),
            }
        }

        Ok(exit_status.unwrap_or(ExitStatus::Unknown))
    }

    async fn close(self) -> Result<()> {
        if let Some(channel) = self.channel {
            channel
                .close()
                .await
                .map_err(|e| SessionError::CloseFailed(e.to_string()))?;
        }
        Ok(())
    }
}

/// Wait for the SUCCESS/FAILURE answer to a `want_reply` channel request.
async fn wait_for_reply(channel: &mut Channel<Msg>) -> Result<bool> {
    loop {
        match channel.wait().await {
            Some(ChannelMsg::Success) => return Ok(true),
            Some(ChannelMsg::Failure) => return Ok(false),
            Some(ChannelMsg::Close) | None => return Err(Error::Session(SessionError::Closed)),
            Some(other) => trace!("Ignoring channel message {:?} while awaiting reply", other),
        }
    }
}

/// SSH client handler for russh.
struct SshHandler {
    host: String,
    port: u16,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
    /// Stores a detailed host-key error so connect() can surface it
    /// instead of the generic russh::Error::UnknownKey.
    host_key_error: Arc<Mutex<Option<TransportError>>>,
}

impl SshHandler {
    /// Check the host key against known_hosts.
    ///
    /// Returns `Ok(true)` if matched, `Ok(false)` if host not found,
    /// `Err(TransportError::HostKeyChanged)` if key changed.
    fn check_known_hosts(&self, pubkey: &PublicKey) -> std::result::Result<bool, TransportError> {
        let result = if let Some(ref path) = self.known_hosts_path {
            russh::keys::check_known_hosts_path(&self.host, self.port, pubkey, path)
        } else {
            russh::keys::check_known_hosts(&self.host, self.port, pubkey)
        };

        match result {
            Ok(matched) => Ok(matched),
            Err(russh::keys::Error::KeyChanged { line }) => Err(TransportError::HostKeyChanged {
                host: self.host.clone(),
                port: self.port,
                line,
            }),
            Err(e) => Err(TransportError::KnownHosts(e.to_string())),
        }
    }

    /// Save a new host key to known_hosts.
    fn learn_host_key(&self, pubkey: &PublicKey) -> std::result::Result<(), TransportError> {
        let result = if let Some(ref path) = self.known_hosts_path {
            russh::keys::known_hosts::learn_known_hosts_path(&self.host, self.port, pubkey, path)
        } else {
            russh::keys::known_hosts::learn_known_hosts(&self.host, self.port, pubkey)
        };

        result.map_err(|e| TransportError::KnownHosts(e.to_string()))
    }

    /// Record why the key was rejected.
    fn reject(&self, error: TransportError) -> bool {
        if let Ok(mut slot) = self.host_key_error.lock() {
            *slot = Some(error);
        }
        false
    }
}

impl client::Handler for SshHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        match self.host_key_verification {
            HostKeyVerification::Disabled => Ok(true),

            HostKeyVerification::AcceptNew => match self.check_known_hosts(server_public_key) {
                Ok(true) => Ok(true),
                Ok(false) => {
                    // Unknown host, learn the key
                    if let Err(e) = self.learn_host_key(server_public_key) {
                        warn!("Failed to save host key: {}", e);
                    }
                    Ok(true)
                }
                Err(e) => Ok(self.reject(e)),
            },

            HostKeyVerification::Strict => match self.check_known_hosts(server_public_key) {
                Ok(true) => Ok(true),
                Ok(false) => Ok(self.reject(TransportError::HostKeyUnknown {
                    host: self.host.clone(),
                    port: self.port,
                })),
                Err(e) => Ok(self.reject(e)),
            },
        }
    }
}
