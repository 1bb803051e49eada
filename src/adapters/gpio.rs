//! GPIO bank adapter.
//!
//! Implements [`GpioPort`] over the whole pad matrix.
//!
//! - **`target_os = "espidf"`**: raw `gpio_*` driver calls through
//!   `esp-idf-sys`.  Outputs are configured as input/output so the pad
//!   level can be read back after a write.
//! - **`not(target_os = "espidf")`**: an in-memory simulated bank for
//!   host tests: pull-ups read high when undriven, outputs read back their
//!   latch, and external levels can be injected with
//!   [`set_external_level`](EspGpioAdapter::set_external_level).

use crate::app::ports::{GpioPort, Level};
use crate::app::registry::PinMode;
use crate::platform::PinId;

#[cfg(not(target_os = "espidf"))]
use crate::platform::MAX_PINS;

/// Simulated pad.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Clone, Copy, Default)]
struct SimPad {
    mode: Option<PinMode>,
    latch: bool,
    /// Level forced by something outside the chip; `None` = floating.
    external: Option<bool>,
}

/// GPIO adapter for ESP32-family SoCs.
pub struct EspGpioAdapter {
    #[cfg(not(target_os = "espidf"))]
    pads: [SimPad; MAX_PINS],
}

impl Default for EspGpioAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl EspGpioAdapter {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            pads: [SimPad::default(); MAX_PINS],
        }
    }

    /// Force the level an input sees; `None` lets the pad float.
    #[cfg(not(target_os = "espidf"))]
    pub fn set_external_level(&mut self, pin: PinId, level: Option<bool>) {
        if let Some(pad) = self.pads.get_mut(usize::from(pin)) {
            pad.external = level;
        }
    }

    /// Mode last applied to `pin`, if any.
    #[cfg(not(target_os = "espidf"))]
    pub fn mode_of(&self, pin: PinId) -> Option<PinMode> {
        self.pads.get(usize::from(pin)).and_then(|pad| pad.mode)
    }
}

// ── Device ────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
impl GpioPort for EspGpioAdapter {
    fn set_mode(&mut self, pin: PinId, mode: PinMode) {
        use esp_idf_sys::{
            esp, gpio_mode_t_GPIO_MODE_INPUT, gpio_mode_t_GPIO_MODE_INPUT_OUTPUT,
            gpio_pull_mode_t_GPIO_FLOATING, gpio_pull_mode_t_GPIO_PULLUP_ONLY, gpio_reset_pin,
            gpio_set_direction, gpio_set_pull_mode,
        };

        let num = i32::from(pin);
        let (direction, pull) = match mode {
            PinMode::Input => (gpio_mode_t_GPIO_MODE_INPUT, gpio_pull_mode_t_GPIO_FLOATING),
            PinMode::InputPullup => (gpio_mode_t_GPIO_MODE_INPUT, gpio_pull_mode_t_GPIO_PULLUP_ONLY),
            PinMode::Output => (
                gpio_mode_t_GPIO_MODE_INPUT_OUTPUT,
                gpio_pull_mode_t_GPIO_FLOATING,
            ),
        };

        // SAFETY: `pin` comes from the registry, which only holds pads the
        // SoC reports as valid GPIOs.
        let result = unsafe {
            esp!(gpio_reset_pin(num))
                .and_then(|()| esp!(gpio_set_direction(num, direction)))
                .and_then(|()| esp!(gpio_set_pull_mode(num, pull)))
        };
        if let Err(e) = result {
            log::warn!("GPIO {} set_mode({}) failed: {}", pin, mode.as_str(), e);
        }
    }

    fn write(&mut self, pin: PinId, level: Level) {
        let raw = u32::from(level == Level::High);
        // SAFETY: see `set_mode`.
        if let Err(e) = esp_idf_sys::esp!(unsafe { esp_idf_sys::gpio_set_level(i32::from(pin), raw) })
        {
            log::warn!("GPIO {} write failed: {}", pin, e);
        }
    }

    fn read(&self, pin: PinId) -> bool {
        // SAFETY: see `set_mode`.
        unsafe { esp_idf_sys::gpio_get_level(i32::from(pin)) != 0 }
    }
}

// ── Host simulation ───────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
impl GpioPort for EspGpioAdapter {
    fn set_mode(&mut self, pin: PinId, mode: PinMode) {
        if let Some(pad) = self.pads.get_mut(usize::from(pin)) {
            pad.mode = Some(mode);
        }
    }

    fn write(&mut self, pin: PinId, level: Level) {
        if let Some(pad) = self.pads.get_mut(usize::from(pin)) {
            pad.latch = level == Level::High;
        }
    }

    fn read(&self, pin: PinId) -> bool {
        let Some(pad) = self.pads.get(usize::from(pin)) else {
            return false;
        };
        match pad.mode {
            Some(PinMode::Output) => pad.latch,
            Some(PinMode::InputPullup) => pad.external.unwrap_or(true),
            Some(PinMode::Input) | None => pad.external.unwrap_or(false),
        }
    }
}
