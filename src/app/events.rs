//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) and the RPC engine emit
//! these through the [`EventSink`](super::ports::EventSink) port.  Adapters
//! on the other side decide what to do with them (serial log, test
//! recorder, ...).

use crate::error::CommandError;
use crate::platform::PinId;
use crate::rpc::transport::ConnectionId;

use super::registry::PinMode;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Initial modes applied; carries the pin counts.
    Started {
        target: &'static str,
        total: usize,
        controllable: usize,
    },

    /// A pin was reconfigured; `value` is the level read back afterwards.
    PinConfigured {
        pin: PinId,
        mode: PinMode,
        value: bool,
    },

    /// An output was driven; `value` is the level read back afterwards.
    PinDriven { pin: PinId, value: bool },

    /// A sampling pass saw at least one external level change.
    InputsChanged { changed: usize },

    /// A client message was rejected.
    CommandRejected {
        conn: ConnectionId,
        error: CommandError,
    },

    ClientConnected(ConnectionId),

    ClientDisconnected(ConnectionId),
}
