//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the pin controller (and through it the registry)
//! plus the platform tag.  It exposes a hardware-agnostic API; all I/O
//! flows through the [`GpioPort`] the controller was built with and the
//! [`EventSink`] passed at call sites.
//!
//! ```text
//!  AppCommand ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                 │       AppService        │
//!    GpioPort ◀──│  Controller · Registry  │
//!                 └────────────────────────┘
//! ```

use log::info;

use crate::error::PinError;
use crate::platform::PlatformProfile;

use super::commands::{AppCommand, CommandOutcome};
use super::controller::PinController;
use super::events::AppEvent;
use super::ports::{EventSink, GpioPort};
use super::registry::{PinMode, PinRegistry, Snapshot};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all pin-state logic.
pub struct AppService<G: GpioPort> {
    controller: PinController<G>,
    target: &'static str,
}

impl<G: GpioPort> AppService<G> {
    /// Build the registry for `profile` over the given GPIO bank.
    ///
    /// Does **not** touch hardware; call [`start`](Self::start) next.
    pub fn new(profile: &impl PlatformProfile, gpio: G) -> Self {
        let registry = PinRegistry::build(profile);
        Self {
            controller: PinController::new(registry, gpio),
            target: profile.target_name(),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Apply the initial mode of every controllable pin and log the pin map.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        self.controller.apply_initial_modes();
        self.log_pin_map();

        let registry = self.controller.registry();
        sink.emit(&AppEvent::Started {
            target: self.target,
            total: registry.len(),
            controllable: registry.iter().filter(|p| p.controllable()).count(),
        });
    }

    // ── Command handling ──────────────────────────────────────

    /// Apply a decoded client command.
    ///
    /// Nothing is mutated when an error is returned.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        sink: &mut impl EventSink,
    ) -> Result<CommandOutcome, PinError> {
        match cmd {
            AppCommand::Configure {
                pin,
                mode,
                initial_level,
            } => {
                let state = self.controller.configure(pin, mode)?;
                sink.emit(&AppEvent::PinConfigured {
                    pin,
                    mode,
                    value: state.value(),
                });
                match (mode, initial_level) {
                    (PinMode::Output, Some(level)) => {
                        let state = self.controller.drive(pin, level)?;
                        sink.emit(&AppEvent::PinDriven {
                            pin,
                            value: state.value(),
                        });
                    }
                    (PinMode::Output, None) | (PinMode::Input | PinMode::InputPullup, _) => {}
                }
                Ok(CommandOutcome::StateChanged)
            }
            AppCommand::Drive { pin, level } => {
                let state = self.controller.drive(pin, level)?;
                sink.emit(&AppEvent::PinDriven {
                    pin,
                    value: state.value(),
                });
                Ok(CommandOutcome::StateChanged)
            }
            AppCommand::RequestSnapshot => Ok(CommandOutcome::SnapshotRequested),
        }
    }

    // ── Sampling ──────────────────────────────────────────────

    /// One sampling pass over every controllable pin.
    ///
    /// Returns `true` if any recorded value changed.
    pub fn sample_all(&mut self, sink: &mut impl EventSink) -> bool {
        let changed = self.controller.sample_all();
        if changed > 0 {
            sink.emit(&AppEvent::InputsChanged { changed });
        }
        changed > 0
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn snapshot(&self, uptime_ms: u64) -> Snapshot {
        self.controller.registry().snapshot(self.target, uptime_ms)
    }

    pub fn registry(&self) -> &PinRegistry {
        self.controller.registry()
    }

    pub fn target(&self) -> &'static str {
        self.target
    }

    pub fn controller(&self) -> &PinController<G> {
        &self.controller
    }

    // ── Internal ──────────────────────────────────────────────

    fn log_pin_map(&self) {
        let registry = self.controller.registry();
        let join = |controllable: bool| {
            registry
                .iter()
                .filter(|p| p.controllable() == controllable)
                .map(|p| p.id().to_string())
                .collect::<Vec<_>>()
                .join(",")
        };

        info!("Target={} GPIO total={}", self.target, registry.len());
        info!("GPIO controllable: {}", join(true));
        let reserved = join(false);
        if !reserved.is_empty() {
            info!("GPIO reserved: {}", reserved);
        }
    }
}
