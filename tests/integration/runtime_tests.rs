//! Poll loop: sampling, heartbeat and inbound event draining.

use pinboard::app::events::AppEvent;
use pinboard::app::service::AppService;
use pinboard::platform::Target;
use pinboard::rpc::channels::{Inbox, TransportEvent, post};
use pinboard::runtime::Runtime;

use crate::mock_hw::{LogSink, ManualClock, MockGpio, MockTransport};

type TestRuntime = Runtime<MockGpio, MockTransport, ManualClock, LogSink>;

fn runtime(conns: &[i32]) -> (TestRuntime, MockGpio, ManualClock) {
    let gpio = MockGpio::new();
    let clock = ManualClock::at(0);
    let mut sink = LogSink::new();
    let mut app = AppService::new(&Target::Host, gpio.clone());
    app.start(&mut sink);
    let rt = Runtime::new(
        app,
        MockTransport::with_connections(conns),
        clock.clone(),
        sink,
        700,
    );
    (rt, gpio, clock)
}

#[test]
fn quiet_loop_broadcasts_on_heartbeat_only() {
    let (mut rt, _gpio, clock) = runtime(&[1]);

    for _ in 0..20 {
        clock.advance(30);
        assert!(!rt.poll_once());
    }
    assert_eq!(rt.transport().broadcasts, 0);

    clock.advance(100); // 700 ms since start
    assert!(rt.poll_once());
    assert_eq!(rt.transport().broadcasts, 1);

    clock.advance(30);
    assert!(!rt.poll_once());
}

#[test]
fn input_change_broadcasts_immediately() {
    let (mut rt, gpio, clock) = runtime(&[1, 2]);
    clock.advance(30);
    gpio.set_external(4, true);

    assert!(rt.poll_once());
    let frame = rt.transport().last_for(2).unwrap();
    let pin = frame["pins"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["gpio"] == 4)
        .cloned()
        .unwrap();
    assert_eq!(pin["value"], true);

    clock.advance(30);
    assert!(!rt.poll_once(), "no change and heartbeat restarted");
}

#[test]
fn every_pass_does_housekeeping() {
    let (mut rt, _gpio, clock) = runtime(&[]);
    for _ in 0..3 {
        clock.advance(30);
        rt.poll_once();
    }
    assert_eq!(rt.transport().cleanups, 3);
}

#[test]
fn iterate_drains_inbox_before_polling() {
    let (mut rt, _gpio, clock) = runtime(&[]);
    let inbox = Inbox::new();
    rt.transport_mut().connect(3);

    assert!(post(&inbox, TransportEvent::Connected(3)));
    assert!(post(
        &inbox,
        TransportEvent::message(3, r#"{"type":"set","gpio":2,"mode":"output","value":true}"#)
            .unwrap()
    ));
    assert!(post(&inbox, TransportEvent::Disconnected(3)));

    clock.advance(30);
    rt.iterate(&inbox);

    assert!(inbox.try_receive().is_err());
    assert!(rt.app().registry().get(2).unwrap().value());
    // connect snapshot + state-change broadcast
    assert_eq!(rt.transport().frames_for(3).len(), 2);
    assert!(rt.sink().has(&AppEvent::ClientConnected(3)));
    assert!(rt.sink().has(&AppEvent::ClientDisconnected(3)));
}

#[test]
fn explicit_broadcast_restarts_heartbeat() {
    let (mut rt, _gpio, clock) = runtime(&[1]);
    clock.advance(600);
    rt.broadcast_all();
    assert_eq!(rt.transport().broadcasts, 1);

    clock.advance(200);
    assert!(!rt.poll_once());
    clock.advance(500);
    assert!(rt.poll_once());
}
