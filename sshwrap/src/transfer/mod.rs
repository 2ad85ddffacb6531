//! File copy over an established session.
//!
//! The client does not frame file data itself. It opens a session and
//! hands the channel to a [`CopyProtocol`], which speaks the copy
//! sub-protocol and reports the outcome.

mod sftp;

use std::future::Future;
use std::path::Path;

use crate::error::Result;
use crate::transport::SessionChannel;

pub use sftp::SftpCopy;

/// Collaborator that moves a single file over a session channel.
pub trait CopyProtocol<C: SessionChannel>: Send + Sync {
    /// Copy the local file at `local` to `remote`, returning the bytes written.
    fn upload(
        &self,
        channel: &mut C,
        local: &Path,
        remote: &str,
    ) -> impl Future<Output = Result<u64>> + Send;

    /// Copy the remote file at `remote` to `local`, returning the bytes written.
    fn download(
        &self,
        channel: &mut C,
        remote: &str,
        local: &Path,
    ) -> impl Future<Output = Result<u64>> + Send;
}
