//! Motion supervision.
//!
//! The supervisor runs **every cycle while a motion is in progress** and
//! decides whether the motion has run out of time or stopped making
//! progress.  It also owns the emergency-stop check, which runs in every
//! state before the FSM is stepped.
//!
//! ## Verdict lifecycle
//!
//! 1. A motion starts; `motion_start` and `last_progress` are stamped.
//! 2. Each cycle the subsystem handler records progress (level change,
//!    limit hit) through [`MotionContext::mark_progress`].
//! 3. [`TravelSupervisor::check`] compares both stamps against the
//!    configured [`TravelLimits`] using wraparound-safe arithmetic.
//! 4. The handler turns the verdict into a transition: FAULT for a stall
//!    or a faulting timeout, IDLE for a stopping timeout.
//!
//! The absolute budget is evaluated before the stall window.

use log::error;

use crate::error::FaultReason;
use crate::fsm::context::{MotionContext, SensorSnapshot, TimeoutAction, TravelLimits};

/// Outcome of one supervision check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Motion may continue.
    Continue,
    /// Absolute budget exhausted and the policy says stop quietly.
    TimedOutStop,
    /// Motion must be aborted and FAULT latched.
    Fault(FaultReason),
}

/// Stateless travel/stall supervisor.
pub struct TravelSupervisor;

impl TravelSupervisor {
    /// Evaluate the motion timing of `ctx` at `ctx.now`.
    pub fn check<P>(ctx: &MotionContext<P>) -> Verdict {
        Self::evaluate(
            &ctx.limits,
            ctx.motion_elapsed_ms(),
            ctx.progress_elapsed_ms(),
        )
    }

    /// Pure form of [`check`](Self::check) on elapsed durations.
    pub fn evaluate(limits: &TravelLimits, motion_ms: u32, progress_ms: u32) -> Verdict {
        if motion_ms > limits.max_travel_ms {
            return match limits.on_timeout {
                TimeoutAction::Fault => {
                    error!("travel timeout after {motion_ms} ms");
                    Verdict::Fault(FaultReason::Timeout)
                }
                TimeoutAction::Stop => Verdict::TimedOutStop,
            };
        }
        if let Some(stall_ms) = limits.stall_ms {
            if progress_ms > stall_ms {
                error!("stall: no progress for {progress_ms} ms");
                return Verdict::Fault(FaultReason::Stall);
            }
        }
        Verdict::Continue
    }

    /// Emergency-stop check.  Independent of state, command and timing.
    pub fn emergency_stop(sensors: &SensorSnapshot) -> Option<FaultReason> {
        sensors
            .emergency_stop_asserted
            .then_some(FaultReason::EmergencyStop)
    }
}
