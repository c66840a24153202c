//! Generic actuator controller.
//!
//! [`ActuatorController`] owns one [`Fsm`] and its [`MotionContext`] and is
//! the piece the lift and elevator policies share.  It knows nothing about
//! interlocks or levels; it stamps motion timing, steps the state table,
//! writes the motor through [`MotorPort`] and flushes queued telemetry.
//!
//! ```text
//!  command ──▶ begin_motion / force ──┐
//!                                     ▼
//!  sensors ──▶ step(now, snapshot) ──▶ Fsm<MotionContext<P>> ──▶ commands
//!                                     │
//!                                     └──▶ outbox ──▶ EventSink
//! ```
//!
//! The free functions at the bottom are state handlers every motion
//! subsystem reuses in its table.

use log::{error, info};

use crate::app::ports::{EventSink, MotorPort};
use crate::fsm::context::{MotionContext, MotorDrive, SensorSnapshot};
use crate::fsm::{Fsm, StateDescriptor, StateId};
use crate::tick::Tick;

pub struct ActuatorController<P> {
    fsm: Fsm<MotionContext<P>>,
    ctx: MotionContext<P>,
}

impl<P> ActuatorController<P> {
    pub fn new(table: [StateDescriptor<MotionContext<P>>; StateId::COUNT], ctx: MotionContext<P>) -> Self {
        Self {
            fsm: Fsm::new(table, StateId::Idle),
            ctx,
        }
    }

    /// Enter IDLE and announce readiness.
    pub fn start(&mut self, now: Tick) {
        self.ctx.now = now;
        self.fsm.start(&mut self.ctx);
        self.ctx.publish_status("ready");
    }

    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Name of the current state as given in the subsystem's table.
    pub fn state_name(&self) -> &'static str {
        self.fsm.current_name()
    }

    pub fn ctx(&self) -> &MotionContext<P> {
        &self.ctx
    }

    pub fn ctx_mut(&mut self) -> &mut MotionContext<P> {
        &mut self.ctx
    }

    /// Load this cycle's time and sensor snapshot without stepping.
    pub fn observe(&mut self, now: Tick, sensors: SensorSnapshot) {
        self.ctx.now = now;
        self.ctx.sensors = sensors;
    }

    /// Run one cycle of the current state's update handler.
    pub fn step(&mut self, now: Tick, sensors: SensorSnapshot) -> Option<StateId> {
        self.observe(now, sensors);
        self.fsm.tick(&mut self.ctx)
    }

    /// Start a motion at `start`.  Both supervision stamps are reset.
    pub fn begin_motion(&mut self, direction: StateId, start: Tick) {
        debug_assert!(direction.is_moving());
        self.ctx.now = start;
        self.ctx.motion_start = start;
        self.ctx.last_progress = start;
        info!(
            "{}: motion {:?} started at {} ms",
            self.ctx.subsystem.as_str(),
            direction,
            start.as_millis()
        );
        self.fsm.force_transition(direction, &mut self.ctx);
    }

    /// Jump straight to `state`.  A request for the current state is a no-op.
    pub fn force(&mut self, state: StateId) {
        self.fsm.force_transition(state, &mut self.ctx);
    }

    /// Cut the motor without leaving the current state.
    pub fn cut_motor(&mut self) {
        self.ctx.commands.motor = MotorDrive::Off;
    }

    /// Write the requested motor drive if it differs from the hardware.
    pub fn apply_motor(&self, hw: &mut impl MotorPort) {
        let wanted = self.ctx.commands.motor;
        if hw.motor_drive() != wanted {
            hw.drive_motor(wanted);
        }
    }

    /// Hand every queued telemetry line to `sink`, oldest first.
    pub fn drain_outbox(&mut self, sink: &mut impl EventSink) {
        for event in self.ctx.outbox.iter() {
            sink.emit(event);
        }
        self.ctx.outbox.clear();
    }
}

// ---------------------------------------------------------------------------
// Shared state handlers
// ---------------------------------------------------------------------------

/// IDLE entry: motor off.
pub fn idle_enter<P>(ctx: &mut MotionContext<P>) {
    ctx.commands.motor = MotorDrive::Off;
    ctx.target_position = None;
}

/// Exit from either moving state.
pub fn motion_exit<P>(ctx: &mut MotionContext<P>) {
    ctx.commands.motor = MotorDrive::Off;
}

/// FAULT entry: motor off, reason published.  Interlocks are left as-is.
pub fn fault_enter<P>(ctx: &mut MotionContext<P>) {
    ctx.commands.motor = MotorDrive::Off;
    ctx.target_position = None;
    let word = ctx.fault.map_or("fault", |r| r.as_str());
    error!("{}: FAULT latched ({word})", ctx.subsystem.as_str());
    ctx.publish_status(word);
}

/// Update handler for states that only leave on command.
pub fn hold<P>(_ctx: &mut MotionContext<P>) -> Option<StateId> {
    None
}
