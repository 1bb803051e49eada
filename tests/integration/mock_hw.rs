//! Mock adapters for integration tests.
//!
//! Every mock records what it was asked to do so tests can assert on the
//! full history without touching real GPIO registers or sockets.  The GPIO
//! bank and the clock hand out shared handles so a test can keep poking
//! them after the service/runtime has taken ownership.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::rc::Rc;

use pinboard::app::events::AppEvent;
use pinboard::app::ports::{Clock, EventSink, GpioPort, Level};
use pinboard::app::registry::PinMode;
use pinboard::platform::PinId;
use pinboard::rpc::transport::{ConnectionId, Transport};

// ── GPIO call record ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioCall {
    SetMode(PinId, PinMode),
    Write(PinId, Level),
}

#[derive(Default)]
struct Bank {
    calls: Vec<GpioCall>,
    modes: HashMap<PinId, PinMode>,
    latch: HashMap<PinId, bool>,
    external: HashMap<PinId, bool>,
    stuck_low: HashSet<PinId>,
}

// ── MockGpio ──────────────────────────────────────────────────

/// Simulated bank: outputs read back their latch, pull-ups float high,
/// plain inputs float low, external levels override inputs.
#[derive(Clone, Default)]
pub struct MockGpio {
    bank: Rc<RefCell<Bank>>,
}

#[allow(dead_code)]
impl MockGpio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drive an input from outside the chip.
    pub fn set_external(&self, pin: PinId, level: bool) {
        self.bank.borrow_mut().external.insert(pin, level);
    }

    /// Make a pad always read low (a shorted or clamped output).
    pub fn stick_low(&self, pin: PinId) {
        self.bank.borrow_mut().stuck_low.insert(pin);
    }

    pub fn calls(&self) -> Vec<GpioCall> {
        self.bank.borrow().calls.clone()
    }

    pub fn calls_for(&self, pin: PinId) -> Vec<GpioCall> {
        self.calls()
            .into_iter()
            .filter(|c| match c {
                GpioCall::SetMode(p, _) | GpioCall::Write(p, _) => *p == pin,
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        self.bank.borrow_mut().calls.clear();
    }

    pub fn hw_mode(&self, pin: PinId) -> Option<PinMode> {
        self.bank.borrow().modes.get(&pin).copied()
    }
}

impl GpioPort for MockGpio {
    fn set_mode(&mut self, pin: PinId, mode: PinMode) {
        let mut bank = self.bank.borrow_mut();
        bank.calls.push(GpioCall::SetMode(pin, mode));
        bank.modes.insert(pin, mode);
    }

    fn write(&mut self, pin: PinId, level: Level) {
        let mut bank = self.bank.borrow_mut();
        bank.calls.push(GpioCall::Write(pin, level));
        bank.latch.insert(pin, level == Level::High);
    }

    fn read(&self, pin: PinId) -> bool {
        let bank = self.bank.borrow();
        if bank.stuck_low.contains(&pin) {
            return false;
        }
        let external = bank.external.get(&pin).copied();
        match bank.modes.get(&pin) {
            Some(PinMode::Output) => bank.latch.get(&pin).copied().unwrap_or(false),
            Some(PinMode::InputPullup) => external.unwrap_or(true),
            Some(PinMode::Input) | None => external.unwrap_or(false),
        }
    }
}

// ── MockTransport ─────────────────────────────────────────────

/// One frame as delivered to one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub conn: ConnectionId,
    pub text: String,
}

#[derive(Default)]
pub struct MockTransport {
    open: BTreeSet<ConnectionId>,
    pub deliveries: Vec<Delivery>,
    pub broadcasts: usize,
    pub cleanups: usize,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_connections(conns: &[ConnectionId]) -> Self {
        let mut t = Self::new();
        for &c in conns {
            t.connect(c);
        }
        t
    }

    pub fn connect(&mut self, conn: ConnectionId) {
        self.open.insert(conn);
    }

    pub fn disconnect(&mut self, conn: ConnectionId) {
        self.open.remove(&conn);
    }

    pub fn frames_for(&self, conn: ConnectionId) -> Vec<&str> {
        self.deliveries
            .iter()
            .filter(|d| d.conn == conn)
            .map(|d| d.text.as_str())
            .collect()
    }

    pub fn last_for(&self, conn: ConnectionId) -> Option<serde_json::Value> {
        self.frames_for(conn)
            .last()
            .and_then(|t| serde_json::from_str(t).ok())
    }

    pub fn clear(&mut self) {
        self.deliveries.clear();
        self.broadcasts = 0;
    }
}

impl Transport for MockTransport {
    fn send(&mut self, conn: ConnectionId, text: &str) {
        if self.open.contains(&conn) {
            self.deliveries.push(Delivery {
                conn,
                text: text.to_owned(),
            });
        }
    }

    fn send_all(&mut self, text: &str) {
        self.broadcasts += 1;
        for &conn in &self.open {
            self.deliveries.push(Delivery {
                conn,
                text: text.to_owned(),
            });
        }
    }

    fn cleanup(&mut self) {
        self.cleanups += 1;
    }
}

// ── ManualClock ───────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct ManualClock {
    now_ms: Rc<Cell<u64>>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn at(ms: u64) -> Self {
        let clock = Self::default();
        clock.now_ms.set(ms);
        clock
    }

    pub fn advance(&self, ms: u64) {
        self.now_ms.set(self.now_ms.get() + ms);
    }
}

impl Clock for ManualClock {
    fn uptime_ms(&self) -> u64 {
        self.now_ms.get()
    }
}

// ── LogSink ───────────────────────────────────────────────────

#[derive(Default)]
pub struct LogSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, event: &AppEvent) -> bool {
        self.events.contains(event)
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
