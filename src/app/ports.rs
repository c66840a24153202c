//! Port traits: the hexagonal boundary between controller logic and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Controller (domain)
//! ```
//!
//! Board adapters (GPIO drivers, simulated hardware, test mocks) implement
//! these traits.  Controllers consume them via generics, so the domain core
//! never touches hardware directly.  Blocking waits use
//! [`embedded_hal::delay::DelayNs`] rather than a bespoke trait.

use crate::fsm::context::{MotorDrive, SensorSnapshot};
use crate::tick::Tick;

use super::events::TelemetryEvent;

// ───────────────────────────────────────────────────────────────
// Sensor port (hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: sampled once per cycle, never cached.
pub trait SensorPort {
    fn read_sensors(&mut self) -> SensorSnapshot;
}

// ───────────────────────────────────────────────────────────────
// Actuator ports (domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Motor-like output shared by the lift and elevator.
pub trait MotorPort {
    fn drive_motor(&mut self, drive: MotorDrive);

    /// Drive currently applied to the hardware.
    fn motor_drive(&self) -> MotorDrive;
}

/// Lift interlock outputs.
pub trait InterlockPort {
    /// Engage (`true`) or release (`false`) the mechanical lock.
    fn set_lock_engaged(&mut self, engaged: bool);

    /// Energise (`true`) or isolate (`false`) the lift's track section.
    fn set_track_power(&mut self, energized: bool);

    fn lock_engaged(&self) -> bool;

    fn track_powered(&self) -> bool;
}

/// Fridge dispense mechanism (servo / gate solenoid).
pub trait DispenserPort {
    fn set_dispenser(&mut self, energized: bool);

    fn dispenser_energized(&self) -> bool;
}

/// Current cabinet climate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateReading {
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

/// Fridge environmental I/O.
pub trait ClimatePort {
    /// Sample temperature and relative humidity.  `None` if the source has
    /// no valid reading this cycle.
    fn read_climate(&mut self) -> Option<ClimateReading>;

    /// Peltier / compressor output.
    fn set_cooling(&mut self, on: bool);

    /// Circulation fan output.
    fn set_fan(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → telemetry)
// ───────────────────────────────────────────────────────────────

/// Controllers emit [`TelemetryEvent`]s through this port.  Adapters decide
/// where they go (serial line, log, test recorder).
pub trait EventSink {
    fn emit(&mut self, event: &TelemetryEvent);
}

// ───────────────────────────────────────────────────────────────
// Time port
// ───────────────────────────────────────────────────────────────

/// Monotonic tick source, injectable so tests drive time deterministically.
pub trait TimePort {
    fn now(&self) -> Tick;
}

/// A reading frozen at one instant.
impl TimePort for Tick {
    fn now(&self) -> Tick {
        *self
    }
}
