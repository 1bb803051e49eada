//! Transport → control-loop event channel.
//!
//! Websocket callbacks run on the HTTP server task and never touch pin
//! state.  They push `TransportEvent`s into a bounded `embassy-sync`
//! channel; the control loop drains it between sampling passes, so it is
//! the sole owner of the registry.
//!
//! ```text
//! ┌──────────────┐ TransportEvent ┌──────────────┐
//! │  httpd task  │───────────────▶│ Control Loop │
//! │  (ws handler)│                │  (sync)      │
//! └──────────────┘                └──────────────┘
//! ```

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TryReceiveError, TrySendError};
use heapless::String;
use log::warn;

use super::transport::ConnectionId;

/// Longest inbound text frame the control loop accepts.
pub const MAX_MESSAGE_LEN: usize = 256;

/// Channel depth for inbound transport events.
const INBOX_DEPTH: usize = 16;

/// Something that happened on a client connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Connected(ConnectionId),
    Disconnected(ConnectionId),
    Message {
        conn: ConnectionId,
        text: String<MAX_MESSAGE_LEN>,
    },
}

impl TransportEvent {
    /// Copy a received frame into a bounded event.
    ///
    /// Returns `None` when the text does not fit.
    pub fn message(conn: ConnectionId, text: &str) -> Option<Self> {
        let mut buf = String::new();
        buf.push_str(text).ok()?;
        Some(Self::Message { conn, text: buf })
    }
}

/// Bounded inbound queue plus a count of events it had to drop.
pub struct Inbox {
    events: Channel<CriticalSectionRawMutex, TransportEvent, INBOX_DEPTH>,
    dropped: AtomicU32,
}

impl Default for Inbox {
    fn default() -> Self {
        Self::new()
    }
}

impl Inbox {
    pub const fn new() -> Self {
        Self {
            events: Channel::new(),
            dropped: AtomicU32::new(0),
        }
    }

    /// Next pending event, if any.
    pub fn try_receive(&self) -> Result<TransportEvent, TryReceiveError> {
        self.events.try_receive()
    }

    /// Events refused because the queue was full, since boot.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Inbound event channel: httpd task → control loop.
pub static INBOUND: Inbox = Inbox::new();

/// Queue an event without blocking the caller.  A full inbox drops the
/// event, counts it and logs which connection lost it.
pub fn post(inbox: &Inbox, event: TransportEvent) -> bool {
    match inbox.events.try_send(event) {
        Ok(()) => true,
        Err(TrySendError::Full(event)) => {
            let total = inbox.dropped.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
            let conn = match event {
                TransportEvent::Connected(conn)
                | TransportEvent::Disconnected(conn)
                | TransportEvent::Message { conn, .. } => conn,
            };
            warn!(
                "inbound channel full, event from conn {} dropped ({} total)",
                conn, total
            );
            false
        }
    }
}
