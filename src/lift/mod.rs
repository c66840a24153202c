//! Track lift subsystem.
//!
//! Raises and lowers a track section that must be mechanically locked and
//! electrically isolated whenever it is not fully raised.  Before any motion
//! the lock is released and the controller blocks for the configured settle
//! interval; a lowering additionally cuts track power before the motor
//! starts.

pub mod states;

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::app::commands::LiftCommand;
use crate::app::events::SubsystemId;
use crate::app::node::Subsystem;
use crate::app::ports::{EventSink, InterlockPort, MotorPort, SensorPort, TimePort};
use crate::config::LiftConfig;
use crate::controller::ActuatorController;
use crate::fsm::context::{MotionContext, MotorDrive, TimeoutAction, TravelLimits};
use crate::fsm::StateId;
use crate::tick::Tick;

use states::{build_state_table, LiftContext};

/// Everything the lift controller drives or samples.
pub trait LiftHardware: SensorPort + MotorPort + InterlockPort + DelayNs {}

impl<T: SensorPort + MotorPort + InterlockPort + DelayNs> LiftHardware for T {}

pub struct LiftController {
    inner: ActuatorController<()>,
    config: LiftConfig,
}

impl LiftController {
    pub fn new(config: LiftConfig) -> Self {
        let limits = TravelLimits {
            max_travel_ms: config.max_travel_ms,
            stall_ms: None,
            on_timeout: TimeoutAction::Fault,
        };
        let ctx = MotionContext::new(SubsystemId::Lift, limits, ());
        Self {
            inner: ActuatorController::new(build_state_table(), ctx),
            config,
        }
    }

    pub fn state(&self) -> StateId {
        self.inner.state()
    }

    pub fn context(&self) -> &LiftContext {
        self.inner.ctx()
    }

    /// Release the lock, settle, isolate the track when lowering, then
    /// start the motor.  Travel is timed from a clock reading taken after
    /// the settle delay, however long the delay actually took.
    fn begin_travel(&mut self, direction: StateId, clock: &impl TimePort, hw: &mut impl LiftHardware) {
        self.inner.ctx_mut().commands.lock_engaged = false;
        self.apply(hw);
        hw.delay_ms(self.config.lock_release_delay_ms);

        if direction == StateId::MovingBackward {
            self.inner.ctx_mut().commands.track_power = false;
            self.apply(hw);
        }

        self.inner.begin_motion(direction, clock.now());
    }

    fn stop(&mut self) {
        if self.inner.state() == StateId::Fault {
            warn!("lift: STOP in FAULT, motor held off");
            self.inner.cut_motor();
            return;
        }
        self.inner.cut_motor();
        self.inner.force(StateId::Idle);
        self.inner.ctx_mut().publish_status("stopped");
    }

    fn reset(&mut self, now: Tick, hw: &mut impl LiftHardware) {
        let sensors = hw.read_sensors();
        self.inner.observe(now, sensors);

        let ctx = self.inner.ctx_mut();
        ctx.fault = None;
        ctx.commands.motor = MotorDrive::Off;
        ctx.commands.lock_engaged = true;
        if sensors.limit_top {
            ctx.commands.track_power = true;
        }

        self.inner.force(StateId::Idle);
        info!("lift: reset, track power {}", if self.inner.ctx().commands.track_power { "on" } else { "off" });
        self.inner.ctx_mut().publish_status("ready");
    }

    /// Write pending outputs in motor, lock, power order.
    fn apply(&self, hw: &mut impl LiftHardware) {
        self.inner.apply_motor(hw);
        let cmds = self.inner.ctx().commands;
        if hw.lock_engaged() != cmds.lock_engaged {
            hw.set_lock_engaged(cmds.lock_engaged);
        }
        if hw.track_powered() != cmds.track_power {
            hw.set_track_power(cmds.track_power);
        }
    }
}

impl<H: LiftHardware> Subsystem<H> for LiftController {
    type Command = LiftCommand;

    fn id(&self) -> SubsystemId {
        SubsystemId::Lift
    }

    fn start(&mut self, now: Tick, hw: &mut H, sink: &mut impl EventSink) {
        self.inner.start(now);
        self.apply(hw);
        self.inner.drain_outbox(sink);
    }

    fn handle_command(&mut self, cmd: LiftCommand, clock: &impl TimePort, hw: &mut H, sink: &mut impl EventSink) {
        let state = self.inner.state();
        match cmd {
            LiftCommand::Lower | LiftCommand::Raise if state == StateId::Fault => {
                warn!("lift: {cmd:?} ignored in FAULT");
            }
            LiftCommand::Lower | LiftCommand::Raise if state.is_moving() => {
                warn!("lift: {cmd:?} ignored while {}", self.inner.state_name());
            }
            LiftCommand::Lower => {
                info!("lift: LOWER accepted");
                self.begin_travel(StateId::MovingBackward, clock, hw);
            }
            LiftCommand::Raise => {
                info!("lift: RAISE accepted");
                self.begin_travel(StateId::MovingForward, clock, hw);
            }
            LiftCommand::Stop => self.stop(),
            LiftCommand::Reset => self.reset(clock.now(), hw),
            LiftCommand::Status => {
                let ctx = self.inner.ctx_mut();
                let word = ctx.last_status;
                ctx.publish_status(word);
            }
        }
        self.apply(hw);
        self.inner.drain_outbox(sink);
    }

    fn update(&mut self, now: Tick, hw: &mut H, sink: &mut impl EventSink) {
        let sensors = hw.read_sensors();
        self.inner.step(now, sensors);
        self.apply(hw);
        self.inner.drain_outbox(sink);
    }

    fn state_label(&self) -> &'static str {
        self.inner.state_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::events::TelemetryEvent;
    use crate::fsm::context::SensorSnapshot;

    /// Records output writes and delays in call order.
    #[derive(Default)]
    struct Rig {
        sensors: SensorSnapshot,
        motor: MotorDrive,
        lock: bool,
        power: bool,
        trace: Vec<String>,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                lock: true,
                power: true,
                ..Self::default()
            }
        }
    }

    impl SensorPort for Rig {
        fn read_sensors(&mut self) -> SensorSnapshot {
            self.sensors
        }
    }
    impl MotorPort for Rig {
        fn drive_motor(&mut self, drive: MotorDrive) {
            self.motor = drive;
            self.trace.push(format!("motor {drive:?}"));
        }
        fn motor_drive(&self) -> MotorDrive {
            self.motor
        }
    }
    impl InterlockPort for Rig {
        fn set_lock_engaged(&mut self, engaged: bool) {
            self.lock = engaged;
            self.trace.push(format!("lock {engaged}"));
        }
        fn set_track_power(&mut self, energized: bool) {
            self.power = energized;
            self.trace.push(format!("power {energized}"));
        }
        fn lock_engaged(&self) -> bool {
            self.lock
        }
        fn track_powered(&self) -> bool {
            self.power
        }
    }
    impl embedded_hal::delay::DelayNs for Rig {
        fn delay_ns(&mut self, ns: u32) {
            self.trace.push(format!("delay {}", ns / 1_000_000));
        }
        fn delay_ms(&mut self, ms: u32) {
            self.trace.push(format!("delay {ms}"));
        }
    }

    #[derive(Default)]
    struct Lines(Vec<String>);
    impl EventSink for Lines {
        fn emit(&mut self, event: &TelemetryEvent) {
            self.0.push(event.to_string());
        }
    }

    fn booted() -> (LiftController, Rig, Lines) {
        let mut lift = LiftController::new(LiftConfig::default());
        let mut rig = Rig::new();
        let mut out = Lines::default();
        lift.start(Tick(0), &mut rig, &mut out);
        (lift, rig, out)
    }

    #[test]
    fn boots_ready_with_lock_and_power() {
        let (lift, rig, out) = booted();
        assert_eq!(out.0, ["lift/state ready"]);
        assert!(rig.lock && rig.power);
        assert_eq!(lift.state(), StateId::Idle);
    }

    #[test]
    fn lower_sequences_interlocks_before_motor() {
        let (mut lift, mut rig, mut out) = booted();
        lift.handle_command(LiftCommand::Lower, &Tick(0), &mut rig, &mut out);
        assert_eq!(
            rig.trace,
            ["lock false", "delay 250", "power false", "motor Reverse"]
        );
        assert_eq!(out.0.last().map(String::as_str), Some("lift/state lowering"));
        assert_eq!(lift.state(), StateId::MovingBackward);
    }

    #[test]
    fn raise_keeps_power_off_until_top_limit() {
        let (mut lift, mut rig, mut out) = booted();
        lift.handle_command(LiftCommand::Lower, &Tick(0), &mut rig, &mut out);
        rig.sensors.limit_bottom = true;
        lift.update(Tick(2_000), &mut rig, &mut out);
        assert_eq!(out.0.last().map(String::as_str), Some("lift/state lowered"));
        assert!(rig.lock && !rig.power);

        rig.sensors.limit_bottom = false;
        lift.handle_command(LiftCommand::Raise, &Tick(3_000), &mut rig, &mut out);
        assert!(!rig.power);
        rig.sensors.limit_top = true;
        lift.update(Tick(5_000), &mut rig, &mut out);
        assert!(rig.power && rig.lock);
        assert_eq!(rig.motor, MotorDrive::Off);
        assert_eq!(out.0.last().map(String::as_str), Some("lift/state raised"));
    }

    #[test]
    fn stop_leaves_interlocks_alone() {
        let (mut lift, mut rig, mut out) = booted();
        lift.handle_command(LiftCommand::Lower, &Tick(0), &mut rig, &mut out);
        lift.handle_command(LiftCommand::Stop, &Tick(500), &mut rig, &mut out);
        assert_eq!(rig.motor, MotorDrive::Off);
        assert!(!rig.lock);
        assert!(!rig.power);
        assert_eq!(out.0.last().map(String::as_str), Some("lift/state stopped"));
    }

    #[test]
    fn motion_command_while_moving_is_ignored() {
        let (mut lift, mut rig, mut out) = booted();
        lift.handle_command(LiftCommand::Raise, &Tick(0), &mut rig, &mut out);
        let lines = out.0.len();
        lift.handle_command(LiftCommand::Lower, &Tick(100), &mut rig, &mut out);
        assert_eq!(lift.state(), StateId::MovingForward);
        assert_eq!(out.0.len(), lines);
    }

    #[test]
    fn timeout_faults_and_reset_recovers() {
        let (mut lift, mut rig, mut out) = booted();
        lift.handle_command(LiftCommand::Lower, &Tick(0), &mut rig, &mut out);
        lift.update(Tick(8_001), &mut rig, &mut out);
        assert_eq!(lift.state(), StateId::Fault);
        assert_eq!(out.0.last().map(String::as_str), Some("lift/state fault_timeout"));
        assert!(!rig.lock, "interlocks are left as-is on fault");

        lift.handle_command(LiftCommand::Raise, &Tick(9_000), &mut rig, &mut out);
        assert_eq!(rig.motor, MotorDrive::Off);

        lift.handle_command(LiftCommand::Reset, &Tick(9_100), &mut rig, &mut out);
        assert_eq!(lift.state(), StateId::Idle);
        assert!(rig.lock);
        assert!(!rig.power, "power only returns with the top limit");
        assert_eq!(out.0.last().map(String::as_str), Some("lift/state ready"));
    }

    #[test]
    fn status_replays_last_word() {
        let (mut lift, mut rig, mut out) = booted();
        lift.handle_command(LiftCommand::Status, &Tick(10), &mut rig, &mut out);
        assert_eq!(out.0, ["lift/state ready", "lift/state ready"]);
        assert!(rig.trace.is_empty());
    }
}
