//! Command protocol end to end: text in, frames out on the right
//! connections.

use pinboard::app::events::AppEvent;
use pinboard::app::registry::PinMode;
use pinboard::app::service::AppService;
use pinboard::error::{CommandError, DecodeError, PinError};
use pinboard::platform::Target;
use pinboard::rpc::engine::RpcEngine;
use serde_json::{Value, json};

use crate::mock_hw::{LogSink, ManualClock, MockGpio, MockTransport};

struct Rig {
    app: AppService<MockGpio>,
    engine: RpcEngine,
    transport: MockTransport,
    clock: ManualClock,
    sink: LogSink,
    gpio: MockGpio,
}

impl Rig {
    fn new(target: Target, conns: &[i32]) -> Self {
        let gpio = MockGpio::new();
        let mut sink = LogSink::new();
        let mut app = AppService::new(&target, gpio.clone());
        app.start(&mut sink);
        sink.events.clear();
        Self {
            app,
            engine: RpcEngine::new(),
            transport: MockTransport::with_connections(conns),
            clock: ManualClock::at(1_234),
            sink,
            gpio,
        }
    }

    fn send(&mut self, conn: i32, text: &str) {
        self.engine.on_message(
            conn,
            text,
            &mut self.app,
            &mut self.transport,
            &self.clock,
            &mut self.sink,
        );
    }
}

fn pin_entry(frame: &Value, gpio: u8) -> Value {
    frame["pins"]
        .as_array()
        .expect("pins array")
        .iter()
        .find(|p| p["gpio"] == gpio)
        .cloned()
        .expect("pin present")
}

// ── Worked examples ───────────────────────────────────────────

#[test]
fn set_output_high_broadcasts_new_state() {
    let mut rig = Rig::new(Target::Esp32S3, &[1, 2]);
    rig.send(1, r#"{"type":"set","gpio":5,"mode":"output","value":true}"#);

    assert_eq!(rig.app.registry().get(5).unwrap().mode(), PinMode::Output);
    assert!(rig.gpio.calls_for(5).contains(&crate::mock_hw::GpioCall::Write(5, true.into())));

    assert_eq!(rig.transport.broadcasts, 1);
    let frame = rig.transport.last_for(2).expect("snapshot on other conn");
    assert_eq!(frame["type"], "snapshot");
    assert_eq!(
        pin_entry(&frame, 5),
        json!({"gpio": 5, "mode": "output", "value": true, "canControl": true})
    );
}

#[test]
fn write_to_missing_pin_errors_without_broadcast() {
    let mut rig = Rig::new(Target::Esp32S3, &[1, 2]);
    rig.send(1, r#"{"type":"write","gpio":99,"value":true}"#);

    assert_eq!(rig.transport.broadcasts, 0);
    assert_eq!(
        rig.transport.frames_for(1),
        vec![r#"{"type":"error","message":"Unsupported GPIO"}"#]
    );
    assert!(rig.transport.frames_for(2).is_empty());
    assert!(rig.sink.has(&AppEvent::CommandRejected {
        conn: 1,
        error: CommandError::Pin(PinError::NotFound(99)),
    }));
}

// ── Routing ───────────────────────────────────────────────────

#[test]
fn snapshot_request_answers_requester_only() {
    let mut rig = Rig::new(Target::Esp32S3, &[1, 2, 3]);
    rig.send(2, r#"{"type":"snapshot"}"#);

    assert_eq!(rig.transport.frames_for(2).len(), 1);
    assert!(rig.transport.frames_for(1).is_empty());
    assert!(rig.transport.frames_for(3).is_empty());
    assert_eq!(rig.transport.broadcasts, 0);

    let frame = rig.transport.last_for(2).unwrap();
    assert_eq!(frame["target"], "esp32s3");
    assert_eq!(frame["uptimeMs"], 1_234);
    assert_eq!(frame["pins"].as_array().unwrap().len(), 45);
}

#[test]
fn successful_change_reaches_every_connection_identically() {
    let mut rig = Rig::new(Target::Esp32, &[1, 2, 3]);
    rig.send(3, r#"{"type":"set","gpio":2,"mode":"output"}"#);
    rig.send(1, r#"{"type":"write","gpio":2,"value":true}"#);

    assert_eq!(rig.transport.broadcasts, 2);
    assert_eq!(rig.engine.broadcaster().frames_sent(), 2);
    let first = rig.transport.frames_for(1);
    assert_eq!(first.len(), 2);
    assert_eq!(rig.transport.frames_for(2), first);
    assert_eq!(rig.transport.frames_for(3), first);
}

#[test]
fn errors_go_to_sender_only() {
    let mut rig = Rig::new(Target::Esp32S3, &[1, 2]);
    rig.send(2, r#"{"type":"set","gpio":19,"mode":"output"}"#);
    assert_eq!(
        rig.transport.last_for(2).unwrap(),
        json!({"type": "error", "message": "GPIO is reserved or unavailable"})
    );
    assert!(rig.transport.frames_for(1).is_empty());
}

#[test]
fn connect_pushes_one_snapshot_to_newcomer() {
    let mut rig = Rig::new(Target::Host, &[1]);
    rig.transport.connect(7);
    rig.engine.on_connect(
        7,
        &rig.app,
        &mut rig.transport,
        &rig.clock,
        &mut rig.sink,
    );

    assert_eq!(rig.transport.frames_for(7).len(), 1);
    assert!(rig.transport.frames_for(1).is_empty());
    assert_eq!(rig.transport.last_for(7).unwrap()["type"], "snapshot");
    assert!(rig.sink.has(&AppEvent::ClientConnected(7)));
}

#[test]
fn disconnect_sends_nothing() {
    let mut rig = Rig::new(Target::Host, &[1, 2]);
    rig.engine.on_disconnect(2, &mut rig.sink);
    assert!(rig.transport.deliveries.is_empty());
    assert!(rig.sink.has(&AppEvent::ClientDisconnected(2)));
}

// ── Error messages ────────────────────────────────────────────

#[test]
fn each_rejection_has_its_wire_message() {
    let cases = [
        (r#"{"type":"set","gpio":"abc","mode":"output"}"#, "Invalid set payload"),
        (r#"{"type":"bogus"}"#, "Unsupported message type"),
        (r#"{"type":"set","gpio":5,"mode":"pwm"}"#, "Unsupported mode"),
        (r#"{"type":"set","gpio":5,"mode":"output","value":null}"#, "Invalid set payload"),
        (r#"{"type":"write","gpio":5}"#, "Invalid write payload"),
        (r#"{"type":"write","gpio":5,"value":true}"#, "GPIO not in output mode"),
        (r#"{"type":"write","gpio":99,"value":true}"#, "Unsupported GPIO"),
        (r#"{"type":"set","gpio":20,"mode":"input"}"#, "GPIO is reserved or unavailable"),
        ("garbage", "Unsupported message type"),
    ];
    for (text, message) in cases {
        let mut rig = Rig::new(Target::Esp32S3, &[1]);
        rig.send(1, text);
        assert_eq!(
            rig.transport.last_for(1).unwrap(),
            json!({"type": "error", "message": message}),
            "{text}"
        );
        assert_eq!(rig.transport.broadcasts, 0, "{text}");
    }
}

#[test]
fn rejected_message_leaves_registry_untouched() {
    let mut rig = Rig::new(Target::Esp32S3, &[1]);
    let before = rig.app.snapshot(0);
    rig.send(1, r#"{"type":"set","gpio":5,"mode":"output","value":"on"}"#);
    assert_eq!(rig.app.snapshot(0), before);
    assert_eq!(rig.engine.rejected_count(), 1);
    assert!(rig.sink.has(&AppEvent::CommandRejected {
        conn: 1,
        error: CommandError::Decode(DecodeError::InvalidSet),
    }));
}
