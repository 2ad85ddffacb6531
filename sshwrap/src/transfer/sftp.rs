//! Single-file copy through the SFTP subsystem.
//!
//! Requires the server to expose the subsystem, e.g. a
//! `Subsystem sftp internal-sftp` line in sshd_config.

use std::path::Path;

use log::debug;
use russh_sftp::client::SftpSession;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use super::CopyProtocol;
use crate::error::{Result, TransferError};
use crate::transport::SshChannel;

/// [`CopyProtocol`] backed by russh-sftp.
#[derive(Debug, Clone, Copy, Default)]
pub struct SftpCopy;

impl SftpCopy {
    async fn start(channel: &mut SshChannel) -> Result<SftpSession> {
        let channel = channel.start_subsystem("sftp").await?;
        let sftp = SftpSession::new(channel.into_stream())
            .await
            .map_err(|e| TransferError::Protocol(e.to_string()))?;
        Ok(sftp)
    }

    async fn finish(sftp: SftpSession) {
        if let Err(e) = sftp.close().await {
            debug!("Ignoring error while closing SFTP session: {}", e);
        }
    }
}

/// Open a local file for upload, rejecting anything but regular files.
async fn open_local(local: &Path) -> Result<File> {
    let source = File::open(local).await.map_err(|source| TransferError::Local {
        path: local.to_path_buf(),
        source,
    })?;
    let metadata = source
        .metadata()
        .await
        .map_err(|source| TransferError::Local {
            path: local.to_path_buf(),
            source,
        })?;
    if !metadata.is_file() {
        return Err(TransferError::NotAFile(local.to_path_buf()).into());
    }
    Ok(source)
}

fn remote_error(path: &str, error: impl std::fmt::Display) -> TransferError {
    TransferError::Remote {
        path: path.to_string(),
        reason: error.to_string(),
    }
}

impl CopyProtocol<SshChannel> for SftpCopy {
    async fn upload(&self, channel: &mut SshChannel, local: &Path, remote: &str) -> Result<u64> {
        // The local side is checked first so a bad source never creates a remote file
        let mut source = open_local(local).await?;
        let sftp = Self::start(channel).await?;

        let result: Result<u64> = async {
            let mut dest = sftp.create(remote).await.map_err(|e| remote_error(remote, e))?;
            let copied = tokio::io::copy(&mut source, &mut dest)
                .await
                .map_err(|e| remote_error(remote, e))?;
            dest.shutdown().await.map_err(|e| remote_error(remote, e))?;
            Ok(copied)
        }
        .await;

        Self::finish(sftp).await;

        if let Ok(copied) = &result {
            debug!("Uploaded {} bytes from {} to {}", copied, local.display(), remote);
        }
        result
    }

    async fn download(&self, channel: &mut SshChannel, remote: &str, local: &Path) -> Result<u64> {
        let sftp = Self::start(channel).await?;

        let result: Result<u64> = async {
            // Open the remote side first so a missing source never creates a local file
            let mut source = sftp.open(remote).await.map_err(|e| remote_error(remote, e))?;
            let mut dest = File::create(local)
                .await
                .map_err(|source| TransferError::Local {
                    path: local.to_path_buf(),
                    source,
                })?;
            let copied = tokio::io::copy(&mut source, &mut dest)
                .await
                .map_err(|source| TransferError::Local {
                    path: local.to_path_buf(),
                    source,
                })?;
            dest.flush().await.map_err(|source| TransferError::Local {
                path: local.to_path_buf(),
                source,
            })?;
            Ok(copied)
        }
        .await;

        Self::finish(sftp).await;

        if let Ok(copied) = &result {
            debug!("Downloaded {} bytes from {} to {}", copied, remote, local.display());
        }
        result
    }
}
