//! Command orchestration helpers from UI actions to backend command queue.

use client_core::Messages;
use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    QueueFull,
    Disconnected,
}

impl DispatchError {
    pub fn user_message(self, messages: &Messages) -> &str {
        match self {
            DispatchError::QueueFull => &messages.command_queue_full,
            DispatchError::Disconnected => &messages.backend_disconnected,
        }
    }
}

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Result<(), DispatchError> {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(_)) => {
            tracing::warn!(command = cmd_name, "ui command queue is full");
            Err(DispatchError::QueueFull)
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::error!(command = cmd_name, "backend command processor disconnected");
            Err(DispatchError::Disconnected)
        }
    }
}
