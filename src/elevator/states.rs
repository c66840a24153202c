//! Elevator state handlers.
//!
//! Position is a level index.  The extremes are confirmed by limit
//! switches; intermediate levels are reached by dead reckoning once the
//! per-level travel time has elapsed since the last progress.
//!
//! Each moving cycle evaluates, in order: limit switch, dead-reckoning
//! step, arrival, absolute command timeout (stop as `idle`), stall window
//! (`fault_stall`).

use log::{debug, warn};

use crate::app::events::TelemetryKind;
use crate::controller::{fault_enter, hold, idle_enter, motion_exit};
use crate::fsm::context::{MotionContext, MotorDrive};
use crate::fsm::{StateDescriptor, StateId};
use crate::safety::{TravelSupervisor, Verdict};

/// Elevator geometry carried in the motion context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElevatorPolicy {
    pub level_count: u8,
    pub level_travel_ms: u32,
}

impl ElevatorPolicy {
    pub fn top_level(&self) -> u8 {
        self.level_count.saturating_sub(1)
    }
}

pub type ElevatorContext = MotionContext<ElevatorPolicy>;

pub fn build_state_table() -> [StateDescriptor<ElevatorContext>; StateId::COUNT] {
    [
        StateDescriptor {
            id: StateId::Idle,
            name: "idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_update: hold,
        },
        StateDescriptor {
            id: StateId::MovingForward,
            name: "moving_up",
            on_enter: Some(moving_up_enter),
            on_exit: Some(motion_exit),
            on_update: moving_up_update,
        },
        StateDescriptor {
            id: StateId::MovingBackward,
            name: "moving_down",
            on_enter: Some(moving_down_enter),
            on_exit: Some(motion_exit),
            on_update: moving_down_update,
        },
        StateDescriptor {
            id: StateId::Fault,
            name: "fault",
            on_enter: Some(fault_enter),
            on_exit: None,
            on_update: hold,
        },
    ]
}

/// Queue `position level=<n>` for the current level.
pub fn publish_position(ctx: &mut ElevatorContext) {
    let level = ctx.current_position.unwrap_or(0);
    ctx.publish_fmt(TelemetryKind::Position, format_args!("level={level}"));
}

fn moving_up_enter(ctx: &mut ElevatorContext) {
    ctx.commands.motor = MotorDrive::Forward;
    ctx.publish_status("moving_up");
}

fn moving_down_enter(ctx: &mut ElevatorContext) {
    ctx.commands.motor = MotorDrive::Reverse;
    ctx.publish_status("moving_down");
}

fn moving_up_update(ctx: &mut ElevatorContext) -> Option<StateId> {
    travel_update(ctx, true)
}

fn moving_down_update(ctx: &mut ElevatorContext) -> Option<StateId> {
    travel_update(ctx, false)
}

fn travel_update(ctx: &mut ElevatorContext, up: bool) -> Option<StateId> {
    let limit_hit = if up {
        ctx.sensors.limit_top
    } else {
        ctx.sensors.limit_bottom
    };
    if limit_hit {
        ctx.current_position = Some(if up { ctx.policy.top_level() } else { 0 });
        ctx.mark_progress();
        return Some(arrive(ctx));
    }

    let stepped = dead_reckon(ctx, up);
    if ctx.current_position == ctx.target_position {
        return Some(arrive(ctx));
    }
    if stepped {
        publish_position(ctx);
    }

    match TravelSupervisor::check(ctx) {
        Verdict::Continue => None,
        Verdict::TimedOutStop => {
            warn!(
                "elevator: command timeout after {} ms, stopping",
                ctx.motion_elapsed_ms()
            );
            Some(arrive(ctx))
        }
        Verdict::Fault(reason) => {
            ctx.fault = Some(reason);
            Some(StateId::Fault)
        }
    }
}

/// Step one level once the per-level travel time has elapsed.  Returns
/// whether the level changed.  Never steps onto an extreme level.
fn dead_reckon(ctx: &mut ElevatorContext, up: bool) -> bool {
    let Some(current) = ctx.current_position else {
        return false;
    };
    let next = if up {
        current.checked_add(1)
    } else {
        current.checked_sub(1)
    };
    let Some(next) = next else {
        return false;
    };
    if next == 0 || next >= ctx.policy.top_level() {
        return false;
    }
    if ctx.progress_elapsed_ms() < ctx.policy.level_travel_ms {
        return false;
    }
    debug!("elevator: dead-reckoned to level {next}");
    ctx.current_position = Some(next);
    ctx.mark_progress();
    true
}

/// Report final position and `idle`.  Motor is cut by the state exit.
fn arrive(ctx: &mut ElevatorContext) -> StateId {
    publish_position(ctx);
    ctx.publish_status("idle");
    StateId::Idle
}
