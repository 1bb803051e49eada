//! RPC engine — dispatches incoming client text to the AppService.
//!
//! **Transport-decoupled**: the engine never owns a transport.  Callers
//! feed `(conn, text)` and pass the transport to reply through.
//!
//! Every message goes through the same two-gate pipeline:
//!
//! 1. **Decode**: structured JSON decode into an `AppCommand`
//!    (see [`codec`](super::codec)).
//! 2. **Apply**: the command runs against the registry via
//!    [`AppService::handle_command`].
//!
//! A rejection at either gate produces one error frame for the sender and
//! leaves the registry untouched.  A state change is broadcast to every
//! connection; an explicit snapshot request is answered to the sender only.

use log::error;

use crate::app::commands::CommandOutcome;
use crate::app::events::AppEvent;
use crate::app::ports::{Clock, EventSink, GpioPort};
use crate::app::service::AppService;
use crate::error::CommandError;

use super::codec::{decode_command, encode_error};
use super::stream::SnapshotBroadcaster;
use super::transport::{ConnectionId, Transport};

/// Stateless-per-message dispatcher plus the snapshot broadcaster.
#[derive(Debug, Default)]
pub struct RpcEngine {
    broadcaster: SnapshotBroadcaster,
    rejected_count: u32,
}

impl RpcEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// A client connected: it gets the current state straight away.
    pub fn on_connect<G: GpioPort>(
        &mut self,
        conn: ConnectionId,
        app: &AppService<G>,
        transport: &mut impl Transport,
        clock: &impl Clock,
        sink: &mut impl EventSink,
    ) {
        sink.emit(&AppEvent::ClientConnected(conn));
        self.broadcaster.broadcast_to(conn, app, clock, transport);
    }

    /// A client went away.  Nothing to tear down beyond the transport's
    /// own session bookkeeping.
    pub fn on_disconnect(&mut self, conn: ConnectionId, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::ClientDisconnected(conn));
    }

    /// Decode and apply one text frame from `conn`.
    pub fn on_message<G: GpioPort>(
        &mut self,
        conn: ConnectionId,
        text: &str,
        app: &mut AppService<G>,
        transport: &mut impl Transport,
        clock: &impl Clock,
        sink: &mut impl EventSink,
    ) {
        let outcome = decode_command(text)
            .map_err(CommandError::from)
            .and_then(|cmd| app.handle_command(cmd, sink).map_err(CommandError::from));

        match outcome {
            Ok(CommandOutcome::StateChanged) => {
                self.broadcaster.broadcast_to_all(app, clock, transport);
            }
            Ok(CommandOutcome::SnapshotRequested) => {
                self.broadcaster.broadcast_to(conn, app, clock, transport);
            }
            Err(err) => self.reject(conn, err, transport, sink),
        }
    }

    /// Push the current state to every connection (startup and heartbeat).
    pub fn broadcast_all<G: GpioPort>(
        &mut self,
        app: &AppService<G>,
        transport: &mut impl Transport,
        clock: &impl Clock,
    ) {
        self.broadcaster.broadcast_to_all(app, clock, transport);
    }

    pub fn broadcaster(&self) -> &SnapshotBroadcaster {
        &self.broadcaster
    }

    pub fn rejected_count(&self) -> u32 {
        self.rejected_count
    }

    fn reject(
        &mut self,
        conn: ConnectionId,
        err: CommandError,
        transport: &mut impl Transport,
        sink: &mut impl EventSink,
    ) {
        self.rejected_count = self.rejected_count.wrapping_add(1);
        sink.emit(&AppEvent::CommandRejected { conn, error: err });

        match encode_error(err.wire_message()) {
            Ok(frame) => transport.send(conn, &frame),
            Err(e) => error!("error frame serialisation failed: {}", e),
        }
    }
}
