//! WebSocket transport adapter.
//!
//! Implements [`Transport`] over the httpd websocket sessions.
//!
//! The httpd task owns the websocket callbacks; the control loop owns the
//! [`WsTransport`].  They share one session table behind a mutex: the
//! callback attaches a detached sender when a client connects and marks it
//! gone when the socket closes, the control loop sends through whatever is
//! attached and prunes closed sessions in [`cleanup`](Transport::cleanup).
//!
//! - **`target_os = "espidf"`**: sessions hold an
//!   `EspHttpWsDetachedSender`.
//! - **all other targets**: sessions hold an in-memory outbox so host
//!   code can inspect what would have gone on the wire.

use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, warn};

use crate::rpc::transport::{ConnectionId, Transport};

// ───────────────────────────────────────────────────────────────
// Per-session sender
// ───────────────────────────────────────────────────────────────

/// Something that can push one text frame to a single client.
pub trait FrameSender: Send {
    /// Returns `false` if the frame could not be delivered.
    fn send_text(&mut self, text: &str) -> bool;

    fn is_closed(&self) -> bool;
}

#[cfg(target_os = "espidf")]
pub type Sender = esp_idf_svc::http::server::ws::EspHttpWsDetachedSender;

#[cfg(target_os = "espidf")]
impl FrameSender for esp_idf_svc::http::server::ws::EspHttpWsDetachedSender {
    fn send_text(&mut self, text: &str) -> bool {
        use esp_idf_svc::ws::FrameType;
        match self.send(FrameType::Text(false), text.as_bytes()) {
            Ok(()) => true,
            Err(e) => {
                warn!("WS {}: send failed: {}", self.session(), e);
                false
            }
        }
    }

    fn is_closed(&self) -> bool {
        esp_idf_svc::http::server::ws::EspHttpWsDetachedSender::is_closed(self)
    }
}

#[cfg(not(target_os = "espidf"))]
pub type Sender = Outbox;

/// Host-side stand-in for a websocket session.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Default, Clone)]
pub struct Outbox {
    pub frames: Vec<String>,
    pub closed: bool,
}

#[cfg(not(target_os = "espidf"))]
impl FrameSender for Outbox {
    fn send_text(&mut self, text: &str) -> bool {
        if self.closed {
            return false;
        }
        self.frames.push(text.to_owned());
        true
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

// ───────────────────────────────────────────────────────────────
// Session table
// ───────────────────────────────────────────────────────────────

struct Session<S> {
    conn: ConnectionId,
    sender: S,
    open: bool,
}

struct Table<S> {
    sessions: Vec<Session<S>>,
    capacity: usize,
}

/// Handle the httpd callbacks use to register and retire sessions.
pub struct WsSessions<S: FrameSender = Sender> {
    table: Arc<Mutex<Table<S>>>,
}

impl<S: FrameSender> Clone for WsSessions<S> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
        }
    }
}

fn lock<S>(table: &Mutex<Table<S>>) -> MutexGuard<'_, Table<S>> {
    // A panic while holding the lock leaves the table structurally intact.
    match table.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl<S: FrameSender> WsSessions<S> {
    /// Track a new session.  Returns `false` when the table is full.
    pub fn attach(&self, conn: ConnectionId, sender: S) -> bool {
        let mut table = lock(&self.table);
        table.sessions.retain(|s| s.conn != conn);
        if table.sessions.len() >= table.capacity {
            warn!("WS {}: session table full ({}), refusing", conn, table.capacity);
            return false;
        }
        table.sessions.push(Session {
            conn,
            sender,
            open: true,
        });
        true
    }

    /// Mark a session closed; it is dropped on the next cleanup.
    ///
    /// Returns `false` if `conn` was never attached.
    pub fn detach(&self, conn: ConnectionId) -> bool {
        let mut table = lock(&self.table);
        match table.sessions.iter_mut().find(|s| s.conn == conn) {
            Some(session) => {
                session.open = false;
                true
            }
            None => false,
        }
    }

    /// `true` while `conn` holds an open slot in the table.
    pub fn is_attached(&self, conn: ConnectionId) -> bool {
        lock(&self.table)
            .sessions
            .iter()
            .any(|s| s.conn == conn && s.open)
    }

    pub fn len(&self) -> usize {
        lock(&self.table).sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ───────────────────────────────────────────────────────────────
// Transport
// ───────────────────────────────────────────────────────────────

/// Control-loop side of the session table.
pub struct WsTransport<S: FrameSender = Sender> {
    sessions: WsSessions<S>,
}

impl<S: FrameSender> WsTransport<S> {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: WsSessions {
                table: Arc::new(Mutex::new(Table {
                    sessions: Vec::with_capacity(max_sessions),
                    capacity: max_sessions,
                })),
            },
        }
    }

    /// Handle for the httpd websocket callback.
    pub fn sessions(&self) -> WsSessions<S> {
        self.sessions.clone()
    }

    /// Run `f` against the sender of `conn`, if it is attached.
    pub fn with_sender<R>(&self, conn: ConnectionId, f: impl FnOnce(&S) -> R) -> Option<R> {
        let table = lock(&self.sessions.table);
        table
            .sessions
            .iter()
            .find(|s| s.conn == conn)
            .map(|s| f(&s.sender))
    }
}

impl<S: FrameSender> Transport for WsTransport<S> {
    fn send(&mut self, conn: ConnectionId, text: &str) {
        let mut table = lock(&self.sessions.table);
        if let Some(session) = table.sessions.iter_mut().find(|s| s.conn == conn && s.open) {
            if !session.sender.send_text(text) {
                session.open = false;
            }
        }
    }

    fn send_all(&mut self, text: &str) {
        let mut table = lock(&self.sessions.table);
        for session in table.sessions.iter_mut().filter(|s| s.open) {
            if !session.sender.send_text(text) {
                session.open = false;
            }
        }
    }

    fn cleanup(&mut self) {
        let mut table = lock(&self.sessions.table);
        let before = table.sessions.len();
        table
            .sessions
            .retain(|s| s.open && !s.sender.is_closed());
        let dropped = before - table.sessions.len();
        if dropped > 0 {
            debug!("WS: dropped {} closed session(s)", dropped);
        }
    }
}
