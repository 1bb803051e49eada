//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements | Connects to                    |
//! |----------------|------------|--------------------------------|
//! | `gpio`         | GpioPort   | ESP-IDF GPIO driver / sim bank |
//! | `time`         | Clock      | ESP32 system timer             |
//! | `log_sink`     | EventSink  | Serial log output              |
//! | `ws_transport` | Transport  | httpd WebSocket sessions       |
//! | `wifi`         | —          | ESP-IDF WiFi STA bring-up      |
//! | `assets`       | —          | Embedded web UI routes         |

pub mod assets;
pub mod gpio;
pub mod log_sink;
pub mod time;
pub mod wifi;
pub mod ws_transport;
