//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (GPIO bank, clock, event sinks) implement these traits.
//! The [`AppService`](super::service::AppService) consumes them via
//! generics, so the domain core never touches hardware directly.
//!
//! The client-facing side (sending frames to websocket sessions) lives in
//! [`crate::rpc::transport`].

pub use embedded_hal::digital::PinState as Level;

use crate::platform::PinId;

use super::registry::PinMode;

// ───────────────────────────────────────────────────────────────
// GPIO port (driven adapter: domain ↔ pin bank)
// ───────────────────────────────────────────────────────────────

/// Register-level access to the GPIO bank.
///
/// Calls are synchronous and treated as infallible: an adapter that sees a
/// driver error logs it and carries on.  The controller reads every level
/// back through [`read`](GpioPort::read) rather than trusting what it wrote.
pub trait GpioPort {
    /// Reconfigure direction and pull resistors.
    fn set_mode(&mut self, pin: PinId, mode: PinMode);

    /// Drive an output level.
    fn write(&mut self, pin: PinId, level: Level);

    /// Current logic level at the pad (`true` = high).
    fn read(&self, pin: PinId) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic process uptime.
pub trait Clock {
    fn uptime_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
