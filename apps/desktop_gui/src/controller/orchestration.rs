//! Command orchestration helpers from UI actions to backend command queue.

use client_core::ClientError;
use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

/// Queue a command for the backend worker. A refusal is reported as
/// `ClientError::Unavailable` so the caller can settle the flow it started.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Result<(), ClientError> {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(_)) => Err(ClientError::Unavailable(
            "UI command queue is full; please retry".to_string(),
        )),
        Err(TrySendError::Disconnected(_)) => Err(ClientError::Unavailable(
            "backend worker disconnected (possible startup/runtime failure)".to_string(),
        )),
    }
}
