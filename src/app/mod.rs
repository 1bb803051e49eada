//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the pin-state model and the rules for changing it:
//! registry construction, controllability guards, read-back after every
//! write, and change detection while sampling.  All interaction with
//! hardware happens through **port traits** defined in [`ports`], keeping
//! this layer fully testable without real peripherals.

pub mod commands;
pub mod controller;
pub mod events;
pub mod ports;
pub mod registry;
pub mod service;
