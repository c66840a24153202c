//! Unified error types for the KITT firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! outer control loop's error handling uniform.  All variants are `Copy` so
//! they can be passed through the controllers without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A command line could not be turned into a typed command.
    Command(CommandError),
    /// An output pin could not be driven.
    Actuator(ActuatorError),
    /// The command / telemetry channel failed.
    Channel(ChannelError),
    /// Configuration is invalid or could not be parsed.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command(e) => write!(f, "command: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Channel(e) => write!(f, "channel: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Command errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// Blank line.
    Empty,
    /// Verb is not part of this subsystem's vocabulary.
    UnknownVerb,
    /// Verb requires a numeric argument and none was given.
    MissingArgument,
    /// Argument present but not a base-10 integer.
    InvalidArgument,
    /// Verb takes no argument (or only one) but more tokens followed.
    UnexpectedArgument,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty command"),
            Self::UnknownVerb => write!(f, "unknown verb"),
            Self::MissingArgument => write!(f, "missing argument"),
            Self::InvalidArgument => write!(f, "invalid argument"),
            Self::UnexpectedArgument => write!(f, "unexpected argument"),
        }
    }
}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Self::Command(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// GPIO set failed.
    GpioWriteFailed,
    /// GPIO read failed.
    GpioReadFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
            Self::GpioReadFailed => write!(f, "GPIO read failed"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Channel errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelError {
    /// The underlying transport reported a read failure.
    ReadFailed,
    /// The underlying transport reported a write failure.
    WriteFailed,
    /// Incoming line exceeded the receive buffer and was discarded.
    LineTooLong,
    /// Incoming line was not valid UTF-8.
    InvalidUtf8,
    /// Outgoing line did not fit the transmit buffer.
    Overflow,
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed => write!(f, "read failed"),
            Self::WriteFailed => write!(f, "write failed"),
            Self::LineTooLong => write!(f, "line too long"),
            Self::InvalidUtf8 => write!(f, "invalid UTF-8"),
            Self::Overflow => write!(f, "transmit buffer overflow"),
        }
    }
}

impl From<ChannelError> for Error {
    fn from(e: ChannelError) -> Self {
        Self::Channel(e)
    }
}

// ---------------------------------------------------------------------------
// Latched motion faults
// ---------------------------------------------------------------------------

/// Why a motion controller latched into FAULT.  The wire token is what the
/// gateway sees in the status / state telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultReason {
    /// Motion exceeded its maximum allotted duration.
    Timeout,
    /// No measurable progress within the stall window.
    Stall,
    /// Emergency-stop input asserted.
    EmergencyStop,
}

impl FaultReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "fault_timeout",
            Self::Stall => "fault_stall",
            Self::EmergencyStop => "emergency_stop",
        }
    }
}

impl fmt::Display for FaultReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
