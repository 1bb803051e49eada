//! Pin controller — the only code that mutates pin mode/value or touches
//! the GPIO bank.
//!
//! Every mutating operation is guarded by the pin's `controllable` flag.
//! Levels are always read back from hardware after a write: the value the
//! registry records is what the pad reports, not what was requested, so a
//! drive that the hardware silently clamps shows up as such.

use log::debug;

use heapless::Vec;

use crate::error::PinError;
use crate::platform::{MAX_PINS, PinId};

use super::ports::{GpioPort, Level};
use super::registry::{PinMode, PinRegistry, PinState};

/// Owns the registry together with the GPIO bank it describes.
pub struct PinController<G: GpioPort> {
    registry: PinRegistry,
    gpio: G,
}

impl<G: GpioPort> PinController<G> {
    pub fn new(registry: PinRegistry, gpio: G) -> Self {
        Self { registry, gpio }
    }

    /// Read-only view for snapshots and queries.
    pub fn registry(&self) -> &PinRegistry {
        &self.registry
    }

    #[cfg(test)]
    pub(crate) fn gpio(&self) -> &G {
        &self.gpio
    }

    /// Push every controllable pin's recorded mode to hardware and sample it.
    ///
    /// Called once at startup.  Protected pins are left exactly as the
    /// bootloader configured them.
    pub fn apply_initial_modes(&mut self) {
        for id in self.controllable_ids() {
            let Some(mode) = self.registry.get(id).map(PinState::mode) else {
                continue;
            };
            self.gpio.set_mode(id, mode);
            let value = self.sample(id);
            let _ = self.record(id, |pin| pin.set_value(value));
            debug!(
                "GPIO {} mode={} value={}",
                id,
                mode.as_str(),
                if value { "HIGH" } else { "LOW" }
            );
        }
    }

    /// Reconfigure a pin and re-read its level.
    pub fn configure(&mut self, id: PinId, mode: PinMode) -> Result<PinState, PinError> {
        self.controllable_pin(id)?;
        self.gpio.set_mode(id, mode);
        // Input modes take their value from the pad; an output reports
        // whatever its latch is holding.
        let value = self.sample(id);
        self.record(id, |pin| {
            pin.set_mode(mode);
            pin.set_value(value);
            *pin
        })
    }

    /// Drive an output and record the level read back from the pad.
    pub fn drive(&mut self, id: PinId, level: bool) -> Result<PinState, PinError> {
        match self.controllable_pin(id)?.mode() {
            PinMode::Output => {}
            PinMode::Input | PinMode::InputPullup => return Err(PinError::InvalidState(id)),
        }
        self.gpio.write(id, Level::from(level));
        let value = self.sample(id);
        self.record(id, |pin| {
            pin.set_value(value);
            *pin
        })
    }

    /// Current hardware level.  Does not touch the registry.
    ///
    /// Every read-back in this controller goes through here.
    pub fn sample(&self, id: PinId) -> bool {
        self.gpio.read(id)
    }

    /// Re-sample every controllable pin; returns how many values changed.
    ///
    /// Protected pins keep the value recorded at construction.
    pub fn sample_all(&mut self) -> usize {
        let mut changed = 0;
        for id in self.controllable_ids() {
            let level = self.sample(id);
            let moved = self.record(id, |pin| {
                let moved = pin.value() != level;
                pin.set_value(level);
                moved
            });
            if moved.unwrap_or(false) {
                changed += 1;
            }
        }
        changed
    }

    fn controllable_ids(&self) -> Vec<PinId, MAX_PINS> {
        self.registry
            .iter()
            .filter(|p| p.controllable())
            .map(PinState::id)
            .collect()
    }

    fn controllable_pin(&self, id: PinId) -> Result<PinState, PinError> {
        let pin = *self.registry.get(id).ok_or(PinError::NotFound(id))?;
        if !pin.controllable() {
            return Err(PinError::Forbidden(id));
        }
        Ok(pin)
    }

    /// Apply `update` to a registered pin and return what it yields.
    fn record<R>(
        &mut self,
        id: PinId,
        update: impl FnOnce(&mut PinState) -> R,
    ) -> Result<R, PinError> {
        self.registry
            .get_mut(id)
            .map(update)
            .ok_or(PinError::NotFound(id))
    }
}
