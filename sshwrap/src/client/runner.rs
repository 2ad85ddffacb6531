//! One-shot remote command execution.

use std::time::Instant;

use log::debug;

use super::response::Response;
use super::{ChannelOf, SessionOf, SshClient};
use crate::error::{CommandError, Result};
use crate::session::ExitStatus;
use crate::transfer::CopyProtocol;
use crate::transport::Transport;

impl<T, P> SshClient<T, P>
where
    T: Transport,
    P: CopyProtocol<ChannelOf<T>>,
{
    /// Run a command on a fresh connection and session.
    ///
    /// Output is only available once the command has finished. A command
    /// that exits non-zero (or dies from a signal) yields
    /// [`CommandError::Failed`] carrying the captured output. If the channel
    /// fails mid-run, [`CommandError::Interrupted`] carries whatever was
    /// captured before the failure.
    pub async fn run(&self, command: &str) -> Result<Response> {
        self.run_in(None, command).await
    }

    /// Run a command in `session`, or in a fresh one when `None`.
    ///
    /// The session is always closed before returning; close errors are
    /// logged and ignored.
    pub async fn run_in(&self, session: Option<SessionOf<T>>, command: &str) -> Result<Response> {
        let mut session = match session {
            Some(session) => session,
            None => self.connect_and_session().await?,
        };

        debug!("Running '{}' on {}", command, self.config().socket_addr());
        let start = Instant::now();
        let status = session.exec(command).await;
        let elapsed = start.elapsed();
        let output = session.take_output();

        session.close_quietly().await;

        let status = match status {
            Ok(status) => status,
            Err(e) => {
                debug!("'{}' interrupted after {:?}: {}", command, elapsed, e);
                let response = Response::new(command, &output, ExitStatus::Unknown, elapsed);
                return Err(CommandError::Interrupted {
                    response: Box::new(response),
                    source: Box::new(e),
                }
                .into());
            }
        };

        let response = Response::new(command, &output, status, elapsed);
        debug!(
            "'{}' finished with {} after {:?}",
            command, response.exit_status, elapsed
        );

        if response.is_success() {
            Ok(response)
        } else {
            Err(CommandError::Failed {
                response: Box::new(response),
            }
            .into())
        }
    }
}
