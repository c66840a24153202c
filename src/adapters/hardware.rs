//! Board adapters: bridge real peripherals to the domain port traits.
//!
//! One adapter per firmware role.  Each owns the [`SensorHub`] and the
//! actuator drivers fitted to that board and is the only place the node
//! touches hardware.  Pin types are generic so the same adapters run on
//! ESP-IDF `PinDriver`s and on host-side test pins.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::app::ports::{
    ClimatePort, ClimateReading, DispenserPort, InterlockPort, MotorPort, SensorPort,
};
use crate::drivers::motor::MotorDriver;
use crate::drivers::relay::Relay;
use crate::fsm::context::{MotorDrive, SensorSnapshot};
use crate::sensors::SensorHub;

// ───────────────────────────────────────────────────────────────
// Lift board
// ───────────────────────────────────────────────────────────────

/// Track lift: H-bridge, lock solenoid, track isolation relay.
///
/// The lock is fail-safe: the solenoid must be energised to **release**
/// it, so a dead board leaves the track locked.
pub struct LiftBoard<O, I, D> {
    sensors: SensorHub<I>,
    motor: MotorDriver<O, O>,
    lock_solenoid: Relay<O>,
    track_relay: Relay<O>,
    delay: D,
}

impl<O: OutputPin, I: InputPin, D: DelayNs> LiftBoard<O, I, D> {
    pub fn new(
        sensors: SensorHub<I>,
        motor: MotorDriver<O, O>,
        lock_solenoid: Relay<O>,
        track_relay: Relay<O>,
        delay: D,
    ) -> Self {
        Self {
            sensors,
            motor,
            lock_solenoid,
            track_relay,
            delay,
        }
    }
}

impl<O: OutputPin, I: InputPin, D> SensorPort for LiftBoard<O, I, D> {
    fn read_sensors(&mut self) -> SensorSnapshot {
        self.sensors.read()
    }
}

impl<O: OutputPin, I, D> MotorPort for LiftBoard<O, I, D> {
    fn drive_motor(&mut self, drive: MotorDrive) {
        self.motor.set_or_coast(drive);
    }

    fn motor_drive(&self) -> MotorDrive {
        self.motor.drive()
    }
}

impl<O: OutputPin, I, D> InterlockPort for LiftBoard<O, I, D> {
    fn set_lock_engaged(&mut self, engaged: bool) {
        self.lock_solenoid.set_logged(!engaged, "lift lock");
    }

    fn set_track_power(&mut self, energized: bool) {
        self.track_relay.set_logged(energized, "track power");
    }

    fn lock_engaged(&self) -> bool {
        !self.lock_solenoid.is_energized()
    }

    fn track_powered(&self) -> bool {
        self.track_relay.is_energized()
    }
}

impl<O, I, D: DelayNs> DelayNs for LiftBoard<O, I, D> {
    fn delay_ns(&mut self, ns: u32) {
        self.delay.delay_ns(ns);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}

// ───────────────────────────────────────────────────────────────
// Elevator board
// ───────────────────────────────────────────────────────────────

/// Elevator: H-bridge, end-of-travel switches, emergency-stop loop.
pub struct ElevatorBoard<O, I> {
    sensors: SensorHub<I>,
    motor: MotorDriver<O, O>,
}

impl<O: OutputPin, I: InputPin> ElevatorBoard<O, I> {
    pub fn new(sensors: SensorHub<I>, motor: MotorDriver<O, O>) -> Self {
        Self { sensors, motor }
    }
}

impl<O, I: InputPin> SensorPort for ElevatorBoard<O, I> {
    fn read_sensors(&mut self) -> SensorSnapshot {
        self.sensors.read()
    }
}

impl<O: OutputPin, I> MotorPort for ElevatorBoard<O, I> {
    fn drive_motor(&mut self, drive: MotorDrive) {
        self.motor.set_or_coast(drive);
    }

    fn motor_drive(&self) -> MotorDrive {
        self.motor.drive()
    }
}

// ───────────────────────────────────────────────────────────────
// Fridge board
// ───────────────────────────────────────────────────────────────

/// Fridge: dispense gate, peltier and fan relays, door and confirmation
/// switches.  The climate source `C` is either a real sensor or the
/// simulated cabinet; it is told about cooling and fan changes too.
pub struct FridgeBoard<O, I, C, D> {
    sensors: SensorHub<I>,
    dispenser: Relay<O>,
    peltier: Relay<O>,
    fan: Relay<O>,
    climate: C,
    delay: D,
}

impl<O: OutputPin, I: InputPin, C: ClimatePort, D: DelayNs> FridgeBoard<O, I, C, D> {
    pub fn new(
        sensors: SensorHub<I>,
        dispenser: Relay<O>,
        peltier: Relay<O>,
        fan: Relay<O>,
        climate: C,
        delay: D,
    ) -> Self {
        Self {
            sensors,
            dispenser,
            peltier,
            fan,
            climate,
            delay,
        }
    }
}

impl<O, I: InputPin, C, D> SensorPort for FridgeBoard<O, I, C, D> {
    fn read_sensors(&mut self) -> SensorSnapshot {
        self.sensors.read()
    }
}

impl<O: OutputPin, I, C, D> DispenserPort for FridgeBoard<O, I, C, D> {
    fn set_dispenser(&mut self, energized: bool) {
        self.dispenser.set_logged(energized, "dispenser");
    }

    fn dispenser_energized(&self) -> bool {
        self.dispenser.is_energized()
    }
}

impl<O: OutputPin, I, C: ClimatePort, D> ClimatePort for FridgeBoard<O, I, C, D> {
    fn read_climate(&mut self) -> Option<ClimateReading> {
        self.climate.read_climate()
    }

    fn set_cooling(&mut self, on: bool) {
        self.peltier.set_logged(on, "peltier");
        self.climate.set_cooling(self.peltier.is_energized());
    }

    fn set_fan(&mut self, on: bool) {
        self.fan.set_logged(on, "fan");
        self.climate.set_fan(self.fan.is_energized());
    }
}

impl<O, I, C, D: DelayNs> DelayNs for FridgeBoard<O, I, C, D> {
    fn delay_ns(&mut self, ns: u32) {
        self.delay.delay_ns(ns);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
