//! Shared mutable context threaded through every FSM handler.
//!
//! `MotionContext` is the single struct that state handlers read from and
//! write to.  It holds the current cycle's sensor snapshot, the requested
//! actuator outputs, motion timing and position, the latched fault, and a
//! small outbox of telemetry the controller flushes after each step.  The
//! subsystem-specific part lives in the `policy` field.

use log::warn;

use crate::app::events::{SubsystemId, TelemetryEvent, TelemetryKind};
use crate::error::FaultReason;
use crate::tick::Tick;

// ---------------------------------------------------------------------------
// Sensor snapshot (read-only to state handlers; written once per cycle)
// ---------------------------------------------------------------------------

/// Boolean inputs sampled once per cycle.  Never carried across cycles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SensorSnapshot {
    /// Upper travel limit switch asserted (lift raised / elevator top level).
    pub limit_top: bool,
    /// Lower travel limit switch asserted (lift lowered / elevator level 0).
    pub limit_bottom: bool,
    /// Fridge door closed.
    pub door_closed: bool,
    /// Fridge dispense-confirmation sensor asserted.
    pub dispense_confirmed: bool,
    /// Emergency-stop input asserted.
    pub emergency_stop_asserted: bool,
}

// ---------------------------------------------------------------------------
// Actuator commands (written by state handlers; applied by the controller)
// ---------------------------------------------------------------------------

/// Requested motor drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotorDrive {
    #[default]
    Off,
    /// Raising / moving up.
    Forward,
    /// Lowering / moving down.
    Reverse,
}

impl MotorDrive {
    pub fn is_energized(self) -> bool {
        !matches!(self, Self::Off)
    }
}

/// Outputs state handlers request.  Interlock fields are ignored by
/// subsystems that have no lock or isolated track section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorCommands {
    pub motor: MotorDrive,
    /// Mechanical lock engaged (lift only).
    pub lock_engaged: bool,
    /// Isolated track section energised (lift only).
    pub track_power: bool,
}

impl ActuatorCommands {
    /// Boot state: motor off, lock engaged, track powered.
    pub fn safe_default() -> Self {
        Self {
            motor: MotorDrive::Off,
            lock_engaged: true,
            track_power: true,
        }
    }
}

impl Default for ActuatorCommands {
    fn default() -> Self {
        Self::safe_default()
    }
}

// ---------------------------------------------------------------------------
// Travel limits
// ---------------------------------------------------------------------------

/// What the supervisor does when the absolute travel budget runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutAction {
    /// Latch FAULT with [`FaultReason::Timeout`].
    Fault,
    /// Stop and report arrival wherever the carriage is.
    Stop,
}

/// Timing budget for one motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TravelLimits {
    pub max_travel_ms: u32,
    /// Progress window; `None` disables stall detection.
    pub stall_ms: Option<u32>,
    pub on_timeout: TimeoutAction,
}

// ---------------------------------------------------------------------------
// MotionContext
// ---------------------------------------------------------------------------

/// Telemetry queued by handlers during one step.
pub type Outbox = heapless::Vec<TelemetryEvent, 8>;

/// The shared context passed to every state handler function.
pub struct MotionContext<P> {
    pub subsystem: SubsystemId,

    // -- Timing --
    /// Tick of the cycle being evaluated.
    pub now: Tick,
    /// Tick at which the current motion started.
    pub motion_start: Tick,
    /// Tick of the last observed progress (level change or limit hit).
    pub last_progress: Tick,

    // -- Position (none for the lift) --
    pub current_position: Option<u8>,
    pub target_position: Option<u8>,

    // -- I/O --
    pub sensors: SensorSnapshot,
    pub commands: ActuatorCommands,

    // -- Supervision --
    pub limits: TravelLimits,
    /// Latched fault, set when entering FAULT.
    pub fault: Option<FaultReason>,

    pub outbox: Outbox,
    /// Last state word published, replayed by `STATUS`.
    pub last_status: &'static str,

    /// Subsystem-specific configuration and bookkeeping.
    pub policy: P,
}

impl<P> MotionContext<P> {
    pub fn new(subsystem: SubsystemId, limits: TravelLimits, policy: P) -> Self {
        Self {
            subsystem,
            now: Tick::ZERO,
            motion_start: Tick::ZERO,
            last_progress: Tick::ZERO,
            current_position: None,
            target_position: None,
            sensors: SensorSnapshot::default(),
            commands: ActuatorCommands::safe_default(),
            limits,
            fault: None,
            outbox: Outbox::new(),
            last_status: "ready",
            policy,
        }
    }

    /// Milliseconds since the current motion started.
    pub fn motion_elapsed_ms(&self) -> u32 {
        self.now.elapsed_since(self.motion_start)
    }

    /// Milliseconds since progress was last observed.
    pub fn progress_elapsed_ms(&self) -> u32 {
        self.now.elapsed_since(self.last_progress)
    }

    /// Record progress at the current tick.
    pub fn mark_progress(&mut self) {
        self.last_progress = self.now;
    }

    /// Queue a state word on the subsystem's status topic.
    pub fn publish_status(&mut self, word: &'static str) {
        self.last_status = word;
        self.publish(self.subsystem.status_kind(), word);
    }

    /// Queue a telemetry line with a literal payload.
    pub fn publish(&mut self, kind: TelemetryKind, payload: &str) {
        let event = TelemetryEvent::new(self.subsystem, kind, payload);
        self.enqueue(event);
    }

    /// Queue a telemetry line with a formatted payload.
    pub fn publish_fmt(&mut self, kind: TelemetryKind, args: core::fmt::Arguments<'_>) {
        let event = TelemetryEvent::with_args(self.subsystem, kind, args);
        self.enqueue(event);
    }

    fn enqueue(&mut self, event: TelemetryEvent) {
        if let Err(dropped) = self.outbox.push(event) {
            warn!("telemetry outbox full, dropping: {dropped}");
        }
    }
}
