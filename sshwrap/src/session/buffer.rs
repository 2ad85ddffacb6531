//! Captured output streams of a remote command.

use std::borrow::Cow;

use bytes::BytesMut;

/// Growable sinks for a session's standard output and standard error.
///
/// Each session owns a fresh `Output`, so nothing captured by one run is
/// visible to the next.
#[derive(Debug, Default, Clone)]
pub struct Output {
    stdout: BytesMut,
    stderr: BytesMut,
}

impl Output {
    /// Create empty buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append bytes written by the remote command to stdout.
    pub fn extend_stdout(&mut self, data: &[u8]) {
        self.stdout.extend_from_slice(data);
    }

    /// Append bytes written by the remote command to stderr.
    pub fn extend_stderr(&mut self, data: &[u8]) {
        self.stderr.extend_from_slice(data);
    }

    /// Raw stdout bytes.
    pub fn stdout_bytes(&self) -> &[u8] {
        &self.stdout
    }

    /// Raw stderr bytes.
    pub fn stderr_bytes(&self) -> &[u8] {
        &self.stderr
    }

    /// Stdout as text (lossy UTF-8 conversion).
    pub fn stdout(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }

    /// Stderr as text (lossy UTF-8 conversion).
    pub fn stderr(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stderr)
    }

    /// Check if neither stream received any data.
    pub fn is_empty(&self) -> bool {
        self.stdout.is_empty() && self.stderr.is_empty()
    }

    /// Take ownership of the contents and reset.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}
