//! JSON message codec.
//!
//! Client → device:
//! ```text
//! {"type":"set","gpio":5,"mode":"output","value":true}   value optional
//! {"type":"write","gpio":5,"value":false}
//! {"type":"snapshot"}
//! ```
//!
//! Device → client:
//! ```text
//! {"type":"snapshot","target":"esp32s3","uptimeMs":1234,
//!  "pins":[{"gpio":0,"mode":"input","value":false,"canControl":true}, ...]}
//! {"type":"error","message":"Unsupported GPIO"}
//! ```
//!
//! Decoding is schema-driven: the envelope picks the message kind, then the
//! whole payload is deserialised into a typed struct.  A message either
//! decodes completely or not at all.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::app::commands::AppCommand;
use crate::app::registry::{PinMode, Snapshot};
use crate::error::DecodeError;
use crate::platform::PinId;

// ── Inbound ───────────────────────────────────────────────────

#[derive(Deserialize)]
struct SetPayload<'a> {
    gpio: PinId,
    mode: &'a str,
    #[serde(default, deserialize_with = "present_level")]
    value: Option<bool>,
}

/// Only called when `value` is present, so `null` is rejected like any
/// other non-boolean.
fn present_level<'de, D: Deserializer<'de>>(de: D) -> Result<Option<bool>, D::Error> {
    bool::deserialize(de).map(Some)
}

#[derive(Deserialize)]
struct WritePayload {
    gpio: PinId,
    value: bool,
}

/// Decode one client text frame into a command.
pub fn decode_command(text: &str) -> Result<AppCommand, DecodeError> {
    let msg: Value = serde_json::from_str(text).map_err(|_| DecodeError::UnsupportedType)?;
    let kind = msg
        .as_object()
        .and_then(|obj| obj.get("type"))
        .and_then(Value::as_str)
        .ok_or(DecodeError::UnsupportedType)?;

    match kind {
        "set" => {
            let payload = SetPayload::deserialize(&msg).map_err(|_| DecodeError::InvalidSet)?;
            let mode = PinMode::from_wire(payload.mode).ok_or(DecodeError::UnsupportedMode)?;
            Ok(AppCommand::Configure {
                pin: payload.gpio,
                mode,
                initial_level: payload.value,
            })
        }
        "write" => {
            let payload =
                WritePayload::deserialize(&msg).map_err(|_| DecodeError::InvalidWrite)?;
            Ok(AppCommand::Drive {
                pin: payload.gpio,
                level: payload.value,
            })
        }
        "snapshot" => Ok(AppCommand::RequestSnapshot),
        _ => Err(DecodeError::UnsupportedType),
    }
}

// ── Outbound ──────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WirePin {
    gpio: PinId,
    mode: PinMode,
    value: bool,
    can_control: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotFrame<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    target: &'a str,
    uptime_ms: u64,
    pins: Vec<WirePin>,
}

#[derive(Serialize)]
struct ErrorFrame<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    message: &'a str,
}

/// Serialise a snapshot frame.  Pin order is taken from the snapshot as-is.
pub fn encode_snapshot(snapshot: &Snapshot) -> Result<String, serde_json::Error> {
    let frame = SnapshotFrame {
        kind: "snapshot",
        target: snapshot.target,
        uptime_ms: snapshot.uptime_ms,
        pins: snapshot
            .pins
            .iter()
            .map(|p| WirePin {
                gpio: p.gpio,
                mode: p.mode,
                value: p.value,
                can_control: p.can_control,
            })
            .collect(),
    };
    serde_json::to_string(&frame)
}

pub fn encode_error(message: &str) -> Result<String, serde_json::Error> {
    serde_json::to_string(&ErrorFrame {
        kind: "error",
        message,
    })
}
