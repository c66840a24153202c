//! Lift state handlers and table builder.
//!
//! ```text
//!  IDLE ──[LOWER: unlock, settle, isolate]──▶ LOWERING ──[bottom limit]──▶ IDLE (lowered)
//!  IDLE ──[RAISE: unlock, settle]──────────▶ RAISING  ──[top limit]─────▶ IDLE (raised)
//!
//!  LOWERING / RAISING ──[STOP]──────────────▶ IDLE (stopped)
//!  LOWERING / RAISING ──[max travel]────────▶ FAULT (fault_timeout)
//!  FAULT ──[RESET]──▶ IDLE (ready)
//! ```
//!
//! Track power stays off from the start of a lowering until a raise
//! confirms the top limit.

use log::{info, warn};

use crate::controller::{fault_enter, hold, idle_enter, motion_exit};
use crate::fsm::context::{MotionContext, MotorDrive};
use crate::fsm::{StateDescriptor, StateId};
use crate::safety::{TravelSupervisor, Verdict};

/// The lift carries no policy state of its own.
pub type LiftContext = MotionContext<()>;

/// Build the lift's state table.  Called once per controller.
pub fn build_state_table() -> [StateDescriptor<LiftContext>; StateId::COUNT] {
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
            name: "raising",
            on_enter: Some(raising_enter),
            on_exit: Some(motion_exit),
            on_update: raising_update,
        },
        StateDescriptor {
            id: StateId::MovingBackward,
            name: "lowering",
            on_enter: Some(lowering_enter),
            on_exit: Some(motion_exit),
            on_update: lowering_update,
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

// ═══════════════════════════════════════════════════════════════════════════
//  RAISING
// ═══════════════════════════════════════════════════════════════════════════

fn raising_enter(ctx: &mut LiftContext) {
    ctx.commands.lock_engaged = false;
    ctx.commands.motor = MotorDrive::Forward;
    ctx.publish_status("raising");
}

fn raising_update(ctx: &mut LiftContext) -> Option<StateId> {
    if ctx.sensors.limit_top {
        ctx.mark_progress();
        ctx.commands.motor = MotorDrive::Off;
        ctx.commands.lock_engaged = true;
        ctx.commands.track_power = true;
        info!("lift: raised after {} ms", ctx.motion_elapsed_ms());
        ctx.publish_status("raised");
        return Some(StateId::Idle);
    }
    supervise(ctx)
}

// ═══════════════════════════════════════════════════════════════════════════
//  LOWERING
// ═══════════════════════════════════════════════════════════════════════════

fn lowering_enter(ctx: &mut LiftContext) {
    ctx.commands.lock_engaged = false;
    ctx.commands.track_power = false;
    ctx.commands.motor = MotorDrive::Reverse;
    ctx.publish_status("lowering");
}

fn lowering_update(ctx: &mut LiftContext) -> Option<StateId> {
    if ctx.sensors.limit_bottom {
        ctx.mark_progress();
        ctx.commands.motor = MotorDrive::Off;
        ctx.commands.lock_engaged = true;
        info!("lift: lowered after {} ms", ctx.motion_elapsed_ms());
        ctx.publish_status("lowered");
        return Some(StateId::Idle);
    }
    supervise(ctx)
}

fn supervise(ctx: &mut LiftContext) -> Option<StateId> {
    match TravelSupervisor::check(ctx) {
        Verdict::Continue => None,
        Verdict::TimedOutStop => {
            warn!("lift: travel budget spent, stopping");
            ctx.publish_status("stopped");
            Some(StateId::Idle)
        }
        Verdict::Fault(reason) => {
            ctx.fault = Some(reason);
            Some(StateId::Fault)
        }
    }
}
