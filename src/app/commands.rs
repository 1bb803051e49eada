//! Inbound commands to the application service.
//!
//! Produced by [`rpc::codec::decode_command`](crate::rpc::codec::decode_command)
//! from client text and interpreted by
//! [`AppService::handle_command`](super::service::AppService::handle_command).

use crate::platform::PinId;

use super::registry::PinMode;

/// Commands that a client can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Change a pin's mode.  `initial_level` is driven only when the new
    /// mode is `Output`.
    Configure {
        pin: PinId,
        mode: PinMode,
        initial_level: Option<bool>,
    },

    /// Drive a pin that is already an output.
    Drive { pin: PinId, level: bool },

    /// Push a full snapshot to the requesting connection only.
    RequestSnapshot,
}

/// What the caller must do after a command succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Pin state changed: every connected client gets a fresh snapshot.
    StateChanged,
    /// Only the requester gets a snapshot.
    SnapshotRequested,
}
