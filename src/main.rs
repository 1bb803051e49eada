//! Pinboard firmware entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  EspGpioAdapter   LogEventSink   Esp32TimeAdapter  WsTransport │
//! │  (GpioPort)       (EventSink)    (Clock)           (Transport) │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │        Runtime → RpcEngine → AppService (pure logic)   │    │
//! │  │        PinController · PinRegistry                     │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  httpd task: web assets + /ws ──▶ INBOUND channel ──▶ Runtime  │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::http::server::ws::EspHttpWsConnection;
use esp_idf_svc::http::server::{Configuration as HttpConfig, EspHttpServer};
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::ws::FrameType;
use esp_idf_sys::{ESP_ERR_INVALID_SIZE, ESP_FAIL, EspError};
use log::{info, warn};

use pinboard::adapters::assets;
use pinboard::adapters::gpio::EspGpioAdapter;
use pinboard::adapters::log_sink::LogEventSink;
use pinboard::adapters::time::Esp32TimeAdapter;
use pinboard::adapters::wifi::{self, WifiCredentials};
use pinboard::adapters::ws_transport::{WsSessions, WsTransport};
use pinboard::app::service::AppService;
use pinboard::config::BridgeConfig;
use pinboard::platform::Target;
use pinboard::rpc::channels::{self, INBOUND, MAX_MESSAGE_LEN, TransportEvent};
use pinboard::runtime::Runtime;

// ── WebSocket endpoint ────────────────────────────────────────
//
// Runs on the httpd task.  Never touches pin state: every event is
// forwarded to the control loop through the inbound channel.

fn mount_ws(server: &mut EspHttpServer<'static>, sessions: WsSessions, max_len: usize) -> Result<()> {
    server.ws_handler("/ws", move |ws: &mut EspHttpWsConnection| -> Result<(), EspError> {
        let conn = ws.session();

        if ws.is_new() {
            let sender = ws.create_detached_sender()?;
            if !sessions.attach(conn, sender) {
                // Erroring out makes httpd close the socket.
                return Err(EspError::from_infallible::<ESP_FAIL>());
            }
            channels::post(&INBOUND, TransportEvent::Connected(conn));
            return Ok(());
        }

        if ws.is_closed() {
            if sessions.detach(conn) {
                channels::post(&INBOUND, TransportEvent::Disconnected(conn));
            }
            return Ok(());
        }

        // Only attached sessions may reach the control loop.
        if !sessions.is_attached(conn) {
            warn!("WS {}: frame from unregistered session, closing", conn);
            return Err(EspError::from_infallible::<ESP_FAIL>());
        }

        let (frame_type, len) = ws.recv(&mut [])?;
        if len == 0 {
            return Ok(());
        }
        if len > max_len {
            warn!("WS {}: {} byte frame exceeds limit {}, closing", conn, len, max_len);
            return Err(EspError::from_infallible::<ESP_ERR_INVALID_SIZE>());
        }

        let mut buf = [0u8; MAX_MESSAGE_LEN];
        ws.recv(&mut buf[..len])?;
        if !matches!(frame_type, FrameType::Text(false)) {
            return Ok(());
        }

        let Ok(text) = core::str::from_utf8(&buf[..len]) else {
            warn!("WS {}: non-UTF-8 text frame dropped", conn);
            return Ok(());
        };
        match TransportEvent::message(conn, text.trim_end_matches('\0')) {
            Some(event) => {
                channels::post(&INBOUND, event);
            }
            None => warn!("WS {}: message too long, dropped", conn),
        }
        Ok(())
    })?;
    Ok(())
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Pinboard v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = BridgeConfig::default();
    config.validate()?;
    let creds = WifiCredentials::from_build_env()?;

    // ── 3. Pin registry + initial modes ───────────────────────
    let mut sink = LogEventSink::new();
    let mut app = AppService::new(&Target::active(), EspGpioAdapter::new());
    app.start(&mut sink);

    // ── 4. Network ────────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;
    let _wifi = wifi::connect_station(peripherals.modem, sysloop, nvs, &creds, &config)?;

    // ── 5. HTTP server: /ws first, then the catch-all assets ──
    let transport: WsTransport = WsTransport::new(usize::from(config.max_ws_sessions));
    let mut server = EspHttpServer::new(&HttpConfig {
        http_port: config.http_port,
        max_open_sockets: usize::from(config.max_ws_sessions) + 2,
        uri_match_wildcard: true,
        ..Default::default()
    })?;
    mount_ws(
        &mut server,
        transport.sessions(),
        usize::from(config.max_message_len),
    )?;
    assets::mount(&mut server)?;
    info!("HTTP server listening on port {}", config.http_port);

    // ── 6. Control loop ───────────────────────────────────────
    let mut runtime = Runtime::new(
        app,
        transport,
        Esp32TimeAdapter::new(),
        sink,
        config.heartbeat_interval_ms,
    );
    runtime.broadcast_all();

    loop {
        runtime.iterate(&INBOUND);
        FreeRtos::delay_ms(config.poll_interval_ms);
    }
}
