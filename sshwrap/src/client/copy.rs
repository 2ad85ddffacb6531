//! Single-file copy to and from the remote host.

use std::path::Path;

use log::debug;

use super::{ChannelOf, SessionOf, SshClient};
use crate::error::Result;
use crate::session::Session;
use crate::transfer::CopyProtocol;
use crate::transport::Transport;

impl<T, P> SshClient<T, P>
where
    T: Transport,
    P: CopyProtocol<ChannelOf<T>>,
{
    /// Copy a local file to `remote`, returning the number of bytes copied.
    ///
    /// Always uses a fresh connection and session. Directories and globs
    /// are not supported.
    pub async fn copy_to_remote(&self, local: impl AsRef<Path>, remote: &str) -> Result<u64> {
        let local = local.as_ref();
        debug!(
            "Copying {} to {}:{}",
            local.display(),
            self.config().socket_addr(),
            remote
        );

        let mut session = self.transfer_session().await?;
        let result = self.copier.upload(session.channel_mut(), local, remote).await;
        session.close_quietly().await;
        result
    }

    /// Copy `remote` to a local file, returning the number of bytes copied.
    ///
    /// Always uses a fresh connection and session.
    pub async fn copy_from_remote(&self, remote: &str, local: impl AsRef<Path>) -> Result<u64> {
        let local = local.as_ref();
        debug!(
            "Copying {}:{} to {}",
            self.config().socket_addr(),
            remote,
            local.display()
        );

        let mut session = self.transfer_session().await?;
        let result = self
            .copier
            .download(session.channel_mut(), remote, local)
            .await;
        session.close_quietly().await;
        result
    }

    /// Connect and open a session without a pty, so file bytes pass through
    /// untouched.
    async fn transfer_session(&self) -> Result<SessionOf<T>> {
        let connection = self.connect().await?;
        Session::open_raw(&connection).await
    }
}
