//! Pin registry — the canonical record of every GPIO on the running target.
//!
//! Built once at startup from a [`PlatformProfile`] and never resized.
//! Entries are kept sorted by pin id, which is also the order every
//! snapshot is serialised in.  Only the controller mutates entries; the
//! mutable accessors are private to the `app` module.

use heapless::Vec;
use log::warn;
use serde::Serialize;

use crate::platform::{MAX_PINS, PinId, PlatformProfile};

/// Hardware configuration of a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PinMode {
    Input,
    InputPullup,
    Output,
}

impl PinMode {
    /// Protocol name of the mode.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::InputPullup => "input_pullup",
            Self::Output => "output",
        }
    }

    /// Parse a protocol mode name.
    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            "input" => Some(Self::Input),
            "input_pullup" => Some(Self::InputPullup),
            "output" => Some(Self::Output),
            _ => None,
        }
    }
}

/// Runtime state of one GPIO.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinState {
    id: PinId,
    mode: PinMode,
    value: bool,
    controllable: bool,
}

impl PinState {
    fn new(id: PinId, controllable: bool) -> Self {
        Self {
            id,
            mode: PinMode::Input,
            value: false,
            controllable,
        }
    }

    pub fn id(&self) -> PinId {
        self.id
    }

    pub fn mode(&self) -> PinMode {
        self.mode
    }

    /// Last driven (output) or sampled (input) logic level.
    pub fn value(&self) -> bool {
        self.value
    }

    /// `false` for pins the platform profile marks protected.
    pub fn controllable(&self) -> bool {
        self.controllable
    }

    pub(in crate::app) fn set_mode(&mut self, mode: PinMode) {
        self.mode = mode;
    }

    pub(in crate::app) fn set_value(&mut self, value: bool) {
        self.value = value;
    }
}

/// One pin as it appears in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinSnapshot {
    pub gpio: PinId,
    pub mode: PinMode,
    pub value: bool,
    pub can_control: bool,
}

/// Point-in-time copy of the whole registry plus process metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub target: &'static str,
    pub uptime_ms: u64,
    /// Ascending by `gpio`.
    pub pins: Vec<PinSnapshot, MAX_PINS>,
}

/// Fixed set of [`PinState`]s, one per hardware-valid pin.
#[derive(Debug, Clone)]
pub struct PinRegistry {
    pins: Vec<PinState, MAX_PINS>,
}

impl PinRegistry {
    /// Enumerate `profile` and record every valid pin in `Input` mode, low.
    ///
    /// Touches no hardware.  Ids are ordered and deduplicated first, so
    /// when the profile lists more than [`MAX_PINS`] pins the highest ids
    /// are the ones dropped (with a warning).
    pub fn build(profile: &impl PlatformProfile) -> Self {
        let mut listed = [false; PinId::MAX as usize + 1];
        for id in profile.enumerate_valid_pins() {
            listed[usize::from(id)] = true;
        }

        let mut pins: Vec<PinState, MAX_PINS> = Vec::new();
        for id in (0..=PinId::MAX).filter(|&id| listed[usize::from(id)]) {
            if pins.push(PinState::new(id, !profile.is_protected(id))).is_err() {
                warn!(
                    "registry: {} exposes more than {} pins, GPIO {} ignored",
                    profile.target_name(),
                    MAX_PINS,
                    id
                );
            }
        }
        Self { pins }
    }

    pub fn get(&self, id: PinId) -> Option<&PinState> {
        let idx = self.pins.binary_search_by_key(&id, |p| p.id).ok()?;
        self.pins.get(idx)
    }

    pub(in crate::app) fn get_mut(&mut self, id: PinId) -> Option<&mut PinState> {
        let idx = self.pins.binary_search_by_key(&id, |p| p.id).ok()?;
        self.pins.get_mut(idx)
    }

    /// All pins, ascending by id.
    pub fn iter(&self) -> impl Iterator<Item = &PinState> {
        self.pins.iter()
    }

    pub(in crate::app) fn iter_mut(&mut self) -> impl Iterator<Item = &mut PinState> {
        self.pins.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// Copy the registry into a [`Snapshot`].
    pub fn snapshot(&self, target: &'static str, uptime_ms: u64) -> Snapshot {
        let mut pins = Vec::new();
        for p in &self.pins {
            // Same capacity as `self.pins`, cannot overflow.
            let _ = pins.push(PinSnapshot {
                gpio: p.id,
                mode: p.mode,
                value: p.value,
                can_control: p.controllable,
            });
        }
        Snapshot {
            target,
            uptime_ms,
            pins,
        }
    }
}
