//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART / USB-CDC in production, `log` on the host).

use log::{Level, log};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

fn level_name(value: bool) -> &'static str {
    if value { "HIGH" } else { "LOW" }
}

/// Log level and one-line record for an event.
pub fn render(event: &AppEvent) -> (Level, String) {
    match event {
        AppEvent::Started {
            target,
            total,
            controllable,
        } => (
            Level::Info,
            format!("START | target={target} pins={total} controllable={controllable}"),
        ),
        AppEvent::PinConfigured { pin, mode, value } => (
            Level::Info,
            format!(
                "PIN   | gpio={pin} mode={} value={}",
                mode.as_str(),
                level_name(*value)
            ),
        ),
        AppEvent::PinDriven { pin, value } => (
            Level::Info,
            format!("PIN   | gpio={pin} driven value={}", level_name(*value)),
        ),
        AppEvent::InputsChanged { changed } => {
            (Level::Debug, format!("POLL  | {changed} pin(s) changed"))
        }
        AppEvent::CommandRejected { conn, error } => (
            Level::Warn,
            format!("RPC   | conn={conn} rejected: {}", error.wire_message()),
        ),
        AppEvent::ClientConnected(conn) => (Level::Info, format!("WS    | conn={conn} open")),
        AppEvent::ClientDisconnected(conn) => {
            (Level::Info, format!("WS    | conn={conn} closed"))
        }
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        let (level, line) = render(event);
        log!(level, "{}", line);
    }
}
