//! Mock hardware and a node-loop test bench.
//!
//! [`MockBoard`] implements every port the three subsystems use and records
//! each output write, so tests can assert on the exact actuation history.
//! Its blocking delay advances the shared [`SimClock`].

use embedded_hal::delay::DelayNs;
use kitt::adapters::sim::{LoopbackTransport, SimClock, SimDelay};
use kitt::app::node::{NodeLoop, Subsystem};
use kitt::app::ports::{
    ClimatePort, ClimateReading, DispenserPort, InterlockPort, MotorPort, SensorPort,
};
use kitt::fsm::context::{MotorDrive, SensorSnapshot};
use kitt::sensors::cabinet::SimulatedCabinet;

// ── Hardware call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HwCall {
    Motor(MotorDrive),
    Lock(bool),
    TrackPower(bool),
    Dispenser(bool),
    Cooling(bool),
    Fan(bool),
    Delay(u32),
}

// ── MockBoard ─────────────────────────────────────────────────

pub struct MockBoard {
    pub sensors: SensorSnapshot,
    /// Fixed climate reading, used when no cabinet model is attached.
    pub climate: Option<ClimateReading>,
    pub cabinet: Option<SimulatedCabinet>,
    /// Assert the dispense confirmation during any delay with the
    /// dispenser energised.
    pub confirm_on_dispense: bool,
    /// Return this many milliseconds early from every blocking delay, as
    /// an RTOS tick delay can.
    pub delay_shortfall_ms: u32,
    pub calls: Vec<HwCall>,
    motor: MotorDrive,
    lock: bool,
    track: bool,
    dispenser: bool,
    cooling: bool,
    fan: bool,
    delay: SimDelay,
}

#[allow(dead_code)]
impl MockBoard {
    /// Board at rest: motor off, lock engaged, track powered.
    pub fn new(clock: &SimClock) -> Self {
        Self {
            sensors: SensorSnapshot::default(),
            climate: None,
            cabinet: None,
            confirm_on_dispense: false,
            delay_shortfall_ms: 0,
            calls: Vec::new(),
            motor: MotorDrive::Off,
            lock: true,
            track: true,
            dispenser: false,
            cooling: false,
            fan: false,
            delay: clock.delay(),
        }
    }

    pub fn motor(&self) -> MotorDrive {
        self.motor
    }

    pub fn lock(&self) -> bool {
        self.lock
    }

    pub fn track(&self) -> bool {
        self.track
    }

    pub fn dispenser(&self) -> bool {
        self.dispenser
    }

    pub fn cooling(&self) -> bool {
        self.cooling
    }

    pub fn fan(&self) -> bool {
        self.fan
    }

    /// Output writes only, delays excluded.
    pub fn writes(&self) -> Vec<HwCall> {
        self.calls
            .iter()
            .copied()
            .filter(|c| !matches!(c, HwCall::Delay(_)))
            .collect()
    }

    pub fn take_calls(&mut self) -> Vec<HwCall> {
        std::mem::take(&mut self.calls)
    }
}

impl SensorPort for MockBoard {
    fn read_sensors(&mut self) -> SensorSnapshot {
        self.sensors
    }
}

impl MotorPort for MockBoard {
    fn drive_motor(&mut self, drive: MotorDrive) {
        self.calls.push(HwCall::Motor(drive));
        self.motor = drive;
    }

    fn motor_drive(&self) -> MotorDrive {
        self.motor
    }
}

impl InterlockPort for MockBoard {
    fn set_lock_engaged(&mut self, engaged: bool) {
        self.calls.push(HwCall::Lock(engaged));
        self.lock = engaged;
    }

    fn set_track_power(&mut self, energized: bool) {
        self.calls.push(HwCall::TrackPower(energized));
        self.track = energized;
    }

    fn lock_engaged(&self) -> bool {
        self.lock
    }

    fn track_powered(&self) -> bool {
        self.track
    }
}

impl DispenserPort for MockBoard {
    fn set_dispenser(&mut self, energized: bool) {
        self.calls.push(HwCall::Dispenser(energized));
        self.dispenser = energized;
    }

    fn dispenser_energized(&self) -> bool {
        self.dispenser
    }
}

impl ClimatePort for MockBoard {
    fn read_climate(&mut self) -> Option<ClimateReading> {
        match self.cabinet.as_mut() {
            Some(cabinet) => cabinet.read_climate(),
            None => self.climate,
        }
    }

    fn set_cooling(&mut self, on: bool) {
        self.calls.push(HwCall::Cooling(on));
        self.cooling = on;
        if let Some(cabinet) = self.cabinet.as_mut() {
            cabinet.set_cooling(on);
        }
    }

    fn set_fan(&mut self, on: bool) {
        self.calls.push(HwCall::Fan(on));
        self.fan = on;
        if let Some(cabinet) = self.cabinet.as_mut() {
            cabinet.set_fan(on);
        }
    }
}

impl DelayNs for MockBoard {
    fn delay_ns(&mut self, ns: u32) {
        self.delay.delay_ns(ns);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.calls.push(HwCall::Delay(ms));
        self.delay.delay_ms(ms.saturating_sub(self.delay_shortfall_ms));
        if self.confirm_on_dispense && self.dispenser {
            self.sensors.dispense_confirmed = true;
        }
    }
}

// ── Bench ─────────────────────────────────────────────────────

/// A booted node on a mock board, one simulated poll period per cycle.
pub struct Bench<S> {
    pub clock: SimClock,
    pub gateway: LoopbackTransport,
    pub hw: MockBoard,
    pub node: NodeLoop<S, LoopbackTransport>,
    poll_ms: u32,
}

#[allow(dead_code)]
impl<S: Subsystem<MockBoard>> Bench<S> {
    pub fn new(subsystem: S, poll_ms: u32) -> Self {
        Self::with_heartbeat(subsystem, poll_ms, 0)
    }

    pub fn with_heartbeat(subsystem: S, poll_ms: u32, heartbeat_secs: u32) -> Self {
        Self::boot(subsystem, poll_ms, heartbeat_secs, |_| {})
    }

    /// Boot after `prepare` has set up the board (e.g. limit switches).
    pub fn boot(
        subsystem: S,
        poll_ms: u32,
        heartbeat_secs: u32,
        prepare: impl FnOnce(&mut MockBoard),
    ) -> Self {
        let clock = SimClock::new();
        let gateway = LoopbackTransport::new();
        let mut hw = MockBoard::new(&clock);
        prepare(&mut hw);
        let mut node = NodeLoop::new(subsystem, gateway.clone(), poll_ms, heartbeat_secs);
        node.start(&clock, &mut hw);
        Self {
            clock,
            gateway,
            hw,
            node,
            poll_ms,
        }
    }

    pub fn send(&self, line: &str) {
        self.gateway.inject(line);
    }

    /// One control cycle, then one poll period of simulated time.
    pub fn cycle(&mut self) {
        self.node.run_cycle(&self.clock, &mut self.hw);
        self.clock.advance(self.poll_ms);
    }

    pub fn cycles(&mut self, n: u32) {
        for _ in 0..n {
            self.cycle();
        }
    }

    /// Keep cycling until `done` holds or `max_cycles` have run.  Returns
    /// the number of cycles taken.
    pub fn cycle_until(&mut self, max_cycles: u32, mut done: impl FnMut(&Self) -> bool) -> u32 {
        for n in 0..max_cycles {
            if done(self) {
                return n;
            }
            self.cycle();
        }
        max_cycles
    }

    /// Send one command and run the cycle that consumes it.
    pub fn command(&mut self, line: &str) {
        self.send(line);
        self.cycle();
    }

    /// Telemetry written since the last call.
    pub fn lines(&self) -> Vec<String> {
        self.gateway.take_lines()
    }

    pub fn subsystem(&self) -> &S {
        self.node.subsystem()
    }
}
