//! Control loop.
//!
//! One `Runtime` owns the application service (and through it the pin
//! registry), the RPC engine, the transport, the clock and the event sink.
//! It is the only thing that mutates pin state: transport callbacks reach
//! it exclusively through the inbound channel, so every command and every
//! sampling pass runs to completion before the next one starts.
//!
//! ```text
//!   INBOUND ──▶ handle_event ──▶ RpcEngine ──▶ AppService
//!                                    │
//!   poll_once: cleanup → sample_all → (changed | heartbeat) → broadcast
//! ```

use log::debug;

use crate::app::ports::{Clock, EventSink, GpioPort};
use crate::app::service::AppService;
use crate::rpc::channels::{Inbox, TransportEvent};
use crate::rpc::engine::RpcEngine;
use crate::rpc::stream::Heartbeat;
use crate::rpc::transport::Transport;

pub struct Runtime<G, T, C, S>
where
    G: GpioPort,
    T: Transport,
    C: Clock,
    S: EventSink,
{
    app: AppService<G>,
    engine: RpcEngine,
    transport: T,
    clock: C,
    sink: S,
    heartbeat: Heartbeat,
}

impl<G, T, C, S> Runtime<G, T, C, S>
where
    G: GpioPort,
    T: Transport,
    C: Clock,
    S: EventSink,
{
    /// Wrap an already started service.  The heartbeat interval starts now.
    pub fn new(app: AppService<G>, transport: T, clock: C, sink: S, heartbeat_ms: u32) -> Self {
        let heartbeat = Heartbeat::new(heartbeat_ms, clock.uptime_ms());
        Self {
            app,
            engine: RpcEngine::new(),
            transport,
            clock,
            sink,
            heartbeat,
        }
    }

    /// Apply one transport event.
    pub fn handle_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Connected(conn) => self.engine.on_connect(
                conn,
                &self.app,
                &mut self.transport,
                &self.clock,
                &mut self.sink,
            ),
            TransportEvent::Disconnected(conn) => self.engine.on_disconnect(conn, &mut self.sink),
            TransportEvent::Message { conn, text } => self.engine.on_message(
                conn,
                &text,
                &mut self.app,
                &mut self.transport,
                &self.clock,
                &mut self.sink,
            ),
        }
    }

    /// One poll-loop pass: housekeeping, sampling, conditional broadcast.
    ///
    /// Returns `true` if a snapshot went out.
    pub fn poll_once(&mut self) -> bool {
        self.transport.cleanup();
        let changed = self.app.sample_all(&mut self.sink);
        let now = self.clock.uptime_ms();
        if !self.heartbeat.due(now, changed) {
            return false;
        }
        if changed {
            debug!("pin levels changed, broadcasting");
        }
        self.engine
            .broadcast_all(&self.app, &mut self.transport, &self.clock);
        self.heartbeat.reset(now);
        true
    }

    /// Drain every pending transport event, then run one poll pass.
    pub fn iterate(&mut self, inbox: &Inbox) -> bool {
        while let Ok(event) = inbox.try_receive() {
            self.handle_event(event);
        }
        self.poll_once()
    }

    /// Push the current state to everyone and restart the heartbeat.
    pub fn broadcast_all(&mut self) {
        self.engine
            .broadcast_all(&self.app, &mut self.transport, &self.clock);
        self.heartbeat.reset(self.clock.uptime_ms());
    }

    pub fn app(&self) -> &AppService<G> {
        &self.app
    }

    pub fn engine(&self) -> &RpcEngine {
        &self.engine
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
