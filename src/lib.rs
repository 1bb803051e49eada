//! Pinboard firmware library.
//!
//! Live GPIO inspection and control for ESP32-class boards over a
//! WebSocket.  Exposes the pure-logic modules for integration testing;
//! all ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod error;
pub mod platform;
pub mod rpc;
pub mod runtime;
