//! Application core: command vocabulary, telemetry events, port traits and
//! the node loop that ties them to a subsystem.
//!
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer testable without real peripherals.

pub mod commands;
pub mod events;
pub mod node;
pub mod ports;
