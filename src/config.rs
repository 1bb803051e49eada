//! Runtime configuration parameters.
//!
//! All tunable timing and sizing knobs for the pin bridge.  Defaults are
//! compiled in; the binary validates them once at boot before anything
//! touches hardware.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::rpc::channels::MAX_MESSAGE_LEN;

/// Core bridge configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    // --- Control loop ---
    /// Sleep between poll-loop iterations (milliseconds)
    pub poll_interval_ms: u32,
    /// Maximum silence before an unconditional broadcast (milliseconds)
    pub heartbeat_interval_ms: u32,

    // --- Wi-Fi ---
    /// Connection attempts before giving up
    pub wifi_max_attempts: u16,
    /// Delay between connection attempts (milliseconds)
    pub wifi_retry_delay_ms: u32,

    // --- HTTP / WebSocket ---
    /// TCP port for the asset server and `/ws`
    pub http_port: u16,
    /// Concurrent websocket sessions tracked for broadcast
    pub max_ws_sessions: u8,
    /// Longest inbound text frame accepted (bytes)
    pub max_message_len: u16,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            // Control loop
            poll_interval_ms: 30,
            heartbeat_interval_ms: 700,

            // Wi-Fi
            wifi_max_attempts: 60, // ~30 s at 500 ms
            wifi_retry_delay_ms: 500,

            // HTTP
            http_port: 80,
            max_ws_sessions: 8,
            max_message_len: MAX_MESSAGE_LEN as u16,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(why) => write!(f, "invalid configuration: {why}"),
        }
    }
}

impl core::error::Error for ConfigError {}

impl BridgeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("poll_interval_ms must be > 0"));
        }
        if self.heartbeat_interval_ms <= self.poll_interval_ms {
            return Err(ConfigError::ValidationFailed(
                "heartbeat_interval_ms must be > poll_interval_ms",
            ));
        }
        if self.wifi_max_attempts == 0 {
            return Err(ConfigError::ValidationFailed("wifi_max_attempts must be > 0"));
        }
        if self.wifi_retry_delay_ms == 0 {
            return Err(ConfigError::ValidationFailed("wifi_retry_delay_ms must be > 0"));
        }
        if self.max_ws_sessions == 0 {
            return Err(ConfigError::ValidationFailed("max_ws_sessions must be > 0"));
        }
        if self.max_message_len == 0 || usize::from(self.max_message_len) > MAX_MESSAGE_LEN {
            return Err(ConfigError::ValidationFailed(
                "max_message_len must be 1–256",
            ));
        }
        Ok(())
    }
}
