//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

/// Returns `false` when the command never reached the worker.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) -> bool {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            return true;
        }
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
            tracing::warn!(command = cmd_name, "ui->backend command queue is full");
        }
        Err(TrySendError::Disconnected(_)) => {
            *status =
                "Backend command processor disconnected (possible startup/runtime failure); restart the app"
                    .to_string();
            tracing::error!(command = cmd_name, "ui->backend command queue disconnected");
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    #[test]
    fn reports_full_queue_in_status() {
        let (tx, _rx) = bounded::<BackendCommand>(1);
        let mut status = String::new();
        assert!(dispatch_backend_command(&tx, BackendCommand::LoadProfile, &mut status));
        assert!(status.is_empty());

        assert!(!dispatch_backend_command(&tx, BackendCommand::Logout, &mut status));
        assert_eq!(status, "UI command queue is full; please retry");
    }

    #[test]
    fn reports_disconnected_worker_in_status() {
        let (tx, rx) = bounded::<BackendCommand>(1);
        drop(rx);
        let mut status = String::new();
        assert!(!dispatch_backend_command(&tx, BackendCommand::LoadProfile, &mut status));
        assert!(status.starts_with("Backend command processor disconnected"));
    }
}
