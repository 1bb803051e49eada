//! Transport abstraction: any text-frame channel with many clients.
//!
//! Concrete implementations:
//! - ESP-IDF websocket sessions ([`WsTransport`](crate::adapters::ws_transport::WsTransport))
//! - recording mocks in the integration tests
//!
//! The RPC engine is generic over `Transport`, so adding a new
//! transport requires zero changes to the protocol logic.

/// Opaque per-connection handle (the httpd socket descriptor on ESP-IDF).
pub type ConnectionId = i32;

/// Multi-client text transport.
pub trait Transport {
    /// Send one text frame to a single connection.  Unknown or closed
    /// connections are ignored.
    fn send(&mut self, conn: ConnectionId, text: &str);

    /// Send one text frame to every open connection.
    fn send_all(&mut self, text: &str);

    /// Drop connections that have gone away.
    fn cleanup(&mut self);
}

/// A null transport that discards everything.
/// Useful when the network is down but the control loop keeps sampling.
pub struct NullTransport;

impl Transport for NullTransport {
    fn send(&mut self, _conn: ConnectionId, _text: &str) {}

    fn send_all(&mut self, _text: &str) {}

    fn cleanup(&mut self) {}
}
