//! Snapshot push to connected clients.
//!
//! The `SnapshotBroadcaster` serialises the registry fresh on every call
//! and hands the frame to the transport.  `Heartbeat` decides when the
//! poll loop owes everyone a broadcast even though nothing changed.

use log::error;

use crate::app::ports::{Clock, GpioPort};
use crate::app::service::AppService;

use super::codec::encode_snapshot;
use super::transport::{ConnectionId, Transport};

/// Serialises and delivers full-state snapshots.
#[derive(Debug, Default)]
pub struct SnapshotBroadcaster {
    /// Frames handed to the transport (unicast and broadcast alike).
    frames_sent: u32,
}

impl SnapshotBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send one snapshot to a single connection.
    pub fn broadcast_to<G: GpioPort>(
        &mut self,
        conn: ConnectionId,
        app: &AppService<G>,
        clock: &impl Clock,
        transport: &mut impl Transport,
    ) {
        if let Some(frame) = self.render(app, clock) {
            transport.send(conn, &frame);
            self.frames_sent = self.frames_sent.wrapping_add(1);
        }
    }

    /// Send one snapshot to every open connection.
    pub fn broadcast_to_all<G: GpioPort>(
        &mut self,
        app: &AppService<G>,
        clock: &impl Clock,
        transport: &mut impl Transport,
    ) {
        if let Some(frame) = self.render(app, clock) {
            transport.send_all(&frame);
            self.frames_sent = self.frames_sent.wrapping_add(1);
        }
    }

    pub fn frames_sent(&self) -> u32 {
        self.frames_sent
    }

    fn render<G: GpioPort>(&self, app: &AppService<G>, clock: &impl Clock) -> Option<String> {
        encode_snapshot(&app.snapshot(clock.uptime_ms()))
            .map_err(|e| error!("snapshot serialisation failed: {}", e))
            .ok()
    }
}

/// Broadcast clock for the poll loop.
#[derive(Debug, Clone, Copy)]
pub struct Heartbeat {
    interval_ms: u32,
    last_broadcast_ms: u64,
}

impl Heartbeat {
    pub fn new(interval_ms: u32, now_ms: u64) -> Self {
        Self {
            interval_ms,
            last_broadcast_ms: now_ms,
        }
    }

    /// Whether a broadcast is owed at `now_ms`.
    pub fn due(&self, now_ms: u64, changed: bool) -> bool {
        changed || now_ms.saturating_sub(self.last_broadcast_ms) >= u64::from(self.interval_ms)
    }

    /// Restart the interval after a broadcast.
    pub fn reset(&mut self, now_ms: u64) {
        self.last_broadcast_ms = now_ms;
    }
}
