//! Fuzz target: full message dispatch against the simulated bank
//!
//! Splits the input on newlines and feeds each line to the engine as a
//! client message.
//!
//! Invariants checked:
//! - No panics under any message sequence
//! - Registry membership never changes
//! - Protected pins are never reconfigured
//!
//! cargo fuzz run fuzz_command_dispatch

#![no_main]

use libfuzzer_sys::fuzz_target;
use pinboard::adapters::gpio::EspGpioAdapter;
use pinboard::app::events::AppEvent;
use pinboard::app::ports::{Clock, EventSink};
use pinboard::app::service::AppService;
use pinboard::platform::Target;
use pinboard::rpc::engine::RpcEngine;
use pinboard::rpc::transport::NullTransport;

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: &AppEvent) {}
}

struct Frozen;

impl Clock for Frozen {
    fn uptime_ms(&self) -> u64 {
        0
    }
}

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let mut app = AppService::new(&Target::Esp32S3, EspGpioAdapter::new());
    let mut engine = RpcEngine::new();
    let mut sink = Discard;
    app.start(&mut sink);
    let before = app.snapshot(0);

    for line in text.lines() {
        engine.on_message(1, line, &mut app, &mut NullTransport, &Frozen, &mut sink);
    }

    let after = app.snapshot(0);
    assert_eq!(after.pins.len(), before.pins.len());
    for (a, b) in after.pins.iter().zip(before.pins.iter()) {
        assert_eq!(a.gpio, b.gpio);
        if !b.can_control {
            assert_eq!(a, b);
        }
    }
});
