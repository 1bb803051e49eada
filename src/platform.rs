//! Board profiles: which GPIOs exist and which must never be touched.
//!
//! Single source of truth for pin validity.  The registry is built from a
//! [`PlatformProfile`]; nothing else in the firmware hard-codes pin numbers.
//!
//! Valid-pin masks mirror the SoC `GPIO_VALID_GPIO_MASK` of each target,
//! capped at 64 pins.  Protected pins are board-critical (USB, console,
//! SPI flash) and reconfiguring them causes disconnects or reset loops.

/// Physical GPIO number.  The wire protocol carries it as `0..=255`.
pub type PinId = u8;

/// Upper bound on registry size.  No supported SoC exposes more.
pub const MAX_PINS: usize = 64;

/// What the runtime needs to know about the hardware target.
pub trait PlatformProfile {
    /// Short tag reported in every snapshot (`"esp32s3"`, ...).
    fn target_name(&self) -> &'static str;

    /// Every hardware-valid GPIO, ascending.
    fn enumerate_valid_pins(&self) -> impl Iterator<Item = PinId>;

    /// `true` if the pin must never be user-controllable.
    fn is_protected(&self, pin: PinId) -> bool;
}

// ---------------------------------------------------------------------------
// ESP32 (classic)
// ---------------------------------------------------------------------------

/// GPIO 0–39, without 20, 24 and 28–31 (not bonded out).
const ESP32_VALID_MASK: u64 =
    0xFF_FFFF_FFFF & !((1 << 20) | (1 << 24) | (1 << 28) | (1 << 29) | (1 << 30) | (1 << 31));

// ---------------------------------------------------------------------------
// ESP32-S3
// ---------------------------------------------------------------------------

/// GPIO 0–48, without 22–25.
const ESP32S3_VALID_MASK: u64 = ((1 << 49) - 1) & !((1 << 22) | (1 << 23) | (1 << 24) | (1 << 25));

/// USB D-/D+, must stay untouched for stable monitor/flash.
const ESP32S3_PROTECTED: &[PinId] = &[19, 20];

// ---------------------------------------------------------------------------
// ESP32-C6
// ---------------------------------------------------------------------------

/// GPIO 0–30.
const ESP32C6_VALID_MASK: u64 = (1 << 31) - 1;

/// USB-JTAG (12, 13), console UART (16, 17), SPI flash / strapping (24–30).
const ESP32C6_PROTECTED: &[PinId] = &[12, 13, 16, 17, 24, 25, 26, 27, 28, 29, 30];

// ---------------------------------------------------------------------------
// Host simulation
// ---------------------------------------------------------------------------

/// GPIO 0–21 on the simulated bank.
const HOST_VALID_MASK: u64 = (1 << 22) - 1;

/// Built-in profiles for the targets this firmware ships on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Esp32,
    Esp32S3,
    Esp32C6,
    /// Host build with the simulated GPIO bank.
    Host,
}

impl Target {
    pub const ALL: [Self; 4] = [Self::Esp32, Self::Esp32S3, Self::Esp32C6, Self::Host];

    /// Profile of the chip this binary was compiled for.
    pub const fn active() -> Self {
        ACTIVE
    }

    const fn valid_mask(self) -> u64 {
        match self {
            Self::Esp32 => ESP32_VALID_MASK,
            Self::Esp32S3 => ESP32S3_VALID_MASK,
            Self::Esp32C6 => ESP32C6_VALID_MASK,
            Self::Host => HOST_VALID_MASK,
        }
    }

    const fn protected(self) -> &'static [PinId] {
        match self {
            Self::Esp32 | Self::Host => &[],
            Self::Esp32S3 => ESP32S3_PROTECTED,
            Self::Esp32C6 => ESP32C6_PROTECTED,
        }
    }
}

impl PlatformProfile for Target {
    fn target_name(&self) -> &'static str {
        match self {
            Self::Esp32 => "esp32",
            Self::Esp32S3 => "esp32s3",
            Self::Esp32C6 => "esp32c6",
            Self::Host => "host",
        }
    }

    fn enumerate_valid_pins(&self) -> impl Iterator<Item = PinId> {
        let mask = self.valid_mask();
        (0..MAX_PINS as u8).filter(move |&pin| mask & (1u64 << pin) != 0)
    }

    fn is_protected(&self, pin: PinId) -> bool {
        self.protected().contains(&pin)
    }
}

#[cfg(esp32c6)]
const ACTIVE: Target = Target::Esp32C6;
#[cfg(esp32s3)]
const ACTIVE: Target = Target::Esp32S3;
#[cfg(esp32)]
const ACTIVE: Target = Target::Esp32;
#[cfg(not(any(esp32, esp32s3, esp32c6)))]
const ACTIVE: Target = Target::Host;
