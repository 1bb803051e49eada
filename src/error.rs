//! Error types for the pin runtime and its command protocol.
//!
//! Every variant is `Copy` and local: an error terminates processing of one
//! inbound message and turns into exactly one error frame for the client
//! that sent it.  Nothing here is fatal to the control loop.

use core::fmt;

use crate::platform::PinId;

// ---------------------------------------------------------------------------
// Decode errors (client sent something we cannot turn into a command)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// A `set` message with a missing or malformed field.
    InvalidSet,
    /// A `write` message with a missing or malformed field.
    InvalidWrite,
    /// A `set` message naming a mode we do not know.
    UnsupportedMode,
    /// Not a JSON object, no `type`, or a `type` we do not handle.
    UnsupportedType,
}

impl DecodeError {
    /// Stable text carried in the `error` frame.
    pub const fn wire_message(self) -> &'static str {
        match self {
            Self::InvalidSet => "Invalid set payload",
            Self::InvalidWrite => "Invalid write payload",
            Self::UnsupportedMode => "Unsupported mode",
            Self::UnsupportedType => "Unsupported message type",
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSet => write!(f, "malformed set payload"),
            Self::InvalidWrite => write!(f, "malformed write payload"),
            Self::UnsupportedMode => write!(f, "unknown pin mode"),
            Self::UnsupportedType => write!(f, "unrecognised message type"),
        }
    }
}

// ---------------------------------------------------------------------------
// Pin errors (command was well-formed but illegal for the registry)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinError {
    /// The pin does not exist on this platform.
    NotFound(PinId),
    /// The pin exists but is protected by the platform profile.
    Forbidden(PinId),
    /// The operation is illegal in the pin's current mode.
    InvalidState(PinId),
}

impl PinError {
    pub const fn wire_message(self) -> &'static str {
        match self {
            Self::NotFound(_) => "Unsupported GPIO",
            Self::Forbidden(_) => "GPIO is reserved or unavailable",
            Self::InvalidState(_) => "GPIO not in output mode",
        }
    }

    pub const fn pin(self) -> PinId {
        match self {
            Self::NotFound(pin) | Self::Forbidden(pin) | Self::InvalidState(pin) => pin,
        }
    }
}

impl fmt::Display for PinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(pin) => write!(f, "GPIO {pin} not present on this target"),
            Self::Forbidden(pin) => write!(f, "GPIO {pin} is protected"),
            Self::InvalidState(pin) => write!(f, "GPIO {pin} is not an output"),
        }
    }
}

// ---------------------------------------------------------------------------
// Command error (either of the above, as reported back to a client)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    Decode(DecodeError),
    Pin(PinError),
}

impl CommandError {
    pub const fn wire_message(self) -> &'static str {
        match self {
            Self::Decode(e) => e.wire_message(),
            Self::Pin(e) => e.wire_message(),
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(e) => write!(f, "decode: {e}"),
            Self::Pin(e) => write!(f, "pin: {e}"),
        }
    }
}

impl From<DecodeError> for CommandError {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

impl From<PinError> for CommandError {
    fn from(e: PinError) -> Self {
        Self::Pin(e)
    }
}
