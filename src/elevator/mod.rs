//! Multi-level elevator subsystem.
//!
//! Positions a platform across a fixed number of discrete levels.  The
//! emergency-stop input is checked before the state machine every cycle
//! and overrides any motion in progress.

pub mod states;

use log::{info, warn};

use crate::app::commands::ElevatorCommand;
use crate::app::events::SubsystemId;
use crate::app::node::Subsystem;
use crate::app::ports::{EventSink, MotorPort, SensorPort, TimePort};
use crate::config::ElevatorConfig;
use crate::controller::ActuatorController;
use crate::fsm::context::{MotionContext, SensorSnapshot, TimeoutAction, TravelLimits};
use crate::fsm::StateId;
use crate::safety::TravelSupervisor;
use crate::tick::Tick;

use states::{build_state_table, publish_position, ElevatorContext, ElevatorPolicy};

pub trait ElevatorHardware: SensorPort + MotorPort {}

impl<T: SensorPort + MotorPort> ElevatorHardware for T {}

pub struct ElevatorController {
    inner: ActuatorController<ElevatorPolicy>,
}

impl ElevatorController {
    pub fn new(config: &ElevatorConfig) -> Self {
        let limits = TravelLimits {
            max_travel_ms: config.command_timeout_ms,
            stall_ms: Some(config.stall_timeout_ms),
            on_timeout: TimeoutAction::Stop,
        };
        let policy = ElevatorPolicy {
            level_count: config.level_count,
            level_travel_ms: config.level_travel_ms,
        };
        let mut ctx = MotionContext::new(SubsystemId::Elevator, limits, policy);
        ctx.current_position = Some(config.initial_level.min(policy.top_level()));
        Self {
            inner: ActuatorController::new(build_state_table(), ctx),
        }
    }

    pub fn state(&self) -> StateId {
        self.inner.state()
    }

    pub fn level(&self) -> u8 {
        self.inner.ctx().current_position.unwrap_or(0)
    }

    pub fn context(&self) -> &ElevatorContext {
        self.inner.ctx()
    }

    fn top_level(&self) -> u8 {
        self.inner.ctx().policy.top_level()
    }

    /// Snap the position to a limit switch if one is asserted.
    fn resync(&mut self, sensors: &SensorSnapshot) {
        let top = self.top_level();
        let ctx = self.inner.ctx_mut();
        if sensors.limit_bottom {
            ctx.current_position = Some(0);
        } else if sensors.limit_top {
            ctx.current_position = Some(top);
        }
    }

    fn request_level(&mut self, target: u8, now: Tick, hw: &mut impl ElevatorHardware) {
        let state = self.inner.state();
        if state == StateId::Fault {
            warn!("elevator: level {target} ignored in FAULT");
            return;
        }
        if state.is_moving() {
            warn!("elevator: level {target} ignored while {}", self.inner.state_name());
            return;
        }

        let current = self.level();
        if target == current {
            self.inner.ctx_mut().publish_status("already_at_level");
            return;
        }

        let sensors = hw.read_sensors();
        if let Some(reason) = TravelSupervisor::emergency_stop(&sensors) {
            warn!("elevator: level {target} refused, emergency stop asserted");
            self.inner.observe(now, sensors);
            self.inner.ctx_mut().fault = Some(reason);
            self.inner.force(StateId::Fault);
            return;
        }

        info!("elevator: level {current} -> {target}");
        self.inner.ctx_mut().target_position = Some(target);
        let direction = if target > current {
            StateId::MovingForward
        } else {
            StateId::MovingBackward
        };
        self.inner.begin_motion(direction, now);
    }

    fn stop(&mut self) {
        if self.inner.state() == StateId::Fault {
            warn!("elevator: STOP in FAULT, motor held off");
            self.inner.cut_motor();
            return;
        }
        self.inner.cut_motor();
        self.inner.force(StateId::Idle);
        let ctx = self.inner.ctx_mut();
        ctx.publish_status("stopped");
        publish_position(ctx);
    }

    fn reset(&mut self, now: Tick, hw: &mut impl ElevatorHardware) {
        let sensors = hw.read_sensors();
        self.inner.observe(now, sensors);

        if TravelSupervisor::emergency_stop(&sensors).is_some() {
            warn!("elevator: RESET refused, emergency stop still asserted");
            self.inner.ctx_mut().publish_status("emergency_stop");
            return;
        }

        self.inner.ctx_mut().fault = None;
        self.inner.cut_motor();
        self.resync(&sensors);
        self.inner.force(StateId::Idle);
        info!("elevator: reset at level {}", self.level());
        let ctx = self.inner.ctx_mut();
        ctx.publish_status("ready");
        publish_position(ctx);
    }

    fn clamp_level(&self, requested: i32) -> u8 {
        let top = self.top_level();
        u8::try_from(requested.clamp(0, i32::from(top))).unwrap_or(top)
    }
}

impl<H: ElevatorHardware> Subsystem<H> for ElevatorController {
    type Command = ElevatorCommand;

    fn id(&self) -> SubsystemId {
        SubsystemId::Elevator
    }

    fn start(&mut self, now: Tick, hw: &mut H, sink: &mut impl EventSink) {
        let sensors = hw.read_sensors();
        self.resync(&sensors);
        self.inner.start(now);
        publish_position(self.inner.ctx_mut());
        self.inner.apply_motor(hw);
        self.inner.drain_outbox(sink);
    }

    fn handle_command(&mut self, cmd: ElevatorCommand, clock: &impl TimePort, hw: &mut H, sink: &mut impl EventSink) {
        let now = clock.now();
        match cmd {
            ElevatorCommand::Level(n) => {
                let target = self.clamp_level(n);
                self.request_level(target, now, hw);
            }
            ElevatorCommand::Up => {
                let target = self.level().saturating_add(1).min(self.top_level());
                self.request_level(target, now, hw);
            }
            ElevatorCommand::Down => {
                let target = self.level().saturating_sub(1);
                self.request_level(target, now, hw);
            }
            ElevatorCommand::Stop => self.stop(),
            ElevatorCommand::Reset => self.reset(now, hw),
            ElevatorCommand::Status => {
                let ctx = self.inner.ctx_mut();
                let word = ctx.last_status;
                ctx.publish_status(word);
                publish_position(ctx);
            }
        }
        self.inner.apply_motor(hw);
        self.inner.drain_outbox(sink);
    }

    fn update(&mut self, now: Tick, hw: &mut H, sink: &mut impl EventSink) {
        let sensors = hw.read_sensors();
        match TravelSupervisor::emergency_stop(&sensors) {
            Some(reason) if self.inner.state() != StateId::Fault => {
                warn!("elevator: emergency stop asserted");
                self.inner.observe(now, sensors);
                self.inner.ctx_mut().fault = Some(reason);
                self.inner.force(StateId::Fault);
            }
            _ => {
                self.inner.step(now, sensors);
            }
        }
        self.inner.apply_motor(hw);
        self.inner.drain_outbox(sink);
    }

    fn state_label(&self) -> &'static str {
        self.inner.state_name()
    }
}
