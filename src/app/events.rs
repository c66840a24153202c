//! Outbound telemetry events.
//!
//! Controllers emit these through the [`EventSink`](super::ports::EventSink)
//! port.  On the wire each event is a single line of the form
//! `"<subsystem>/<kind> <payload>"`; routing onto any wider bus is owned by
//! the external gateway.

use core::fmt::{self, Write};

use log::warn;

/// Maximum payload length carried by one telemetry line.
pub const PAYLOAD_CAPACITY: usize = 64;

/// Fixed-capacity telemetry payload.
pub type Payload = heapless::String<PAYLOAD_CAPACITY>;

/// Which firmware node produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubsystemId {
    Lift,
    Elevator,
    Fridge,
}

impl SubsystemId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lift => "lift",
            Self::Elevator => "elevator",
            Self::Fridge => "fridge",
        }
    }

    /// Topic the subsystem reports its state words on.
    pub const fn status_kind(self) -> TelemetryKind {
        match self {
            Self::Lift => TelemetryKind::State,
            Self::Elevator | Self::Fridge => TelemetryKind::Status,
        }
    }
}

/// Topic suffix of a telemetry line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TelemetryKind {
    /// Lift state word (`lift/state`).
    State,
    /// Elevator / fridge status word.
    Status,
    /// Elevator level report.
    Position,
    /// Fridge environmental readings.
    Telemetry,
    /// Fridge cooling / fan output changes.
    Outputs,
    /// Periodic liveness report.
    Heartbeat,
}

impl TelemetryKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::State => "state",
            Self::Status => "status",
            Self::Position => "position",
            Self::Telemetry => "telemetry",
            Self::Outputs => "outputs",
            Self::Heartbeat => "heartbeat",
        }
    }
}

/// One fire-and-forget telemetry line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryEvent {
    pub subsystem: SubsystemId,
    pub kind: TelemetryKind,
    pub payload: Payload,
}

impl TelemetryEvent {
    /// Event with a literal payload (truncated to [`PAYLOAD_CAPACITY`]).
    pub fn new(subsystem: SubsystemId, kind: TelemetryKind, payload: &str) -> Self {
        let mut p = Payload::new();
        let _ = p.push_str(&payload[..floor_char_boundary(payload, PAYLOAD_CAPACITY)]);
        Self {
            subsystem,
            kind,
            payload: p,
        }
    }

    /// Event with a formatted payload.
    pub fn with_args(subsystem: SubsystemId, kind: TelemetryKind, args: fmt::Arguments<'_>) -> Self {
        let mut p = Payload::new();
        if p.write_fmt(args).is_err() {
            warn!("telemetry payload truncated for {}/{}", subsystem.as_str(), kind.as_str());
        }
        Self {
            subsystem,
            kind,
            payload: p,
        }
    }

    /// The payload as a string slice.
    pub fn payload(&self) -> &str {
        self.payload.as_str()
    }
}

impl fmt::Display for TelemetryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} {}",
            self.subsystem.as_str(),
            self.kind.as_str(),
            self.payload
        )
    }
}

fn floor_char_boundary(s: &str, max: usize) -> usize {
    if s.len() <= max {
        return s.len();
    }
    let mut i = max;
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}
