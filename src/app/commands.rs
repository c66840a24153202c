//! Inbound commands.
//!
//! The gateway sends one text line per command: a case-sensitive verb and at
//! most one signed integer argument.  Lines are tokenised into a
//! [`RawCommand`] and then mapped onto the subsystem's own command enum.
//! Anything that does not map yields a [`CommandError`].

use crate::error::CommandError;

/// Tokenised command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawCommand<'a> {
    pub verb: &'a str,
    pub arg: Option<i32>,
}

impl<'a> RawCommand<'a> {
    /// Split `line` into verb and optional integer argument.
    pub fn tokenize(line: &'a str) -> Result<Self, CommandError> {
        let mut tokens = line.split_ascii_whitespace();
        let verb = tokens.next().ok_or(CommandError::Empty)?;
        let arg = match tokens.next() {
            Some(tok) => Some(
                tok.parse::<i32>()
                    .map_err(|_| CommandError::InvalidArgument)?,
            ),
            None => None,
        };
        if tokens.next().is_some() {
            return Err(CommandError::UnexpectedArgument);
        }
        Ok(Self { verb, arg })
    }

    fn bare<T>(self, cmd: T) -> Result<T, CommandError> {
        match self.arg {
            None => Ok(cmd),
            Some(_) => Err(CommandError::UnexpectedArgument),
        }
    }
}

/// Typed command vocabulary of one subsystem.
pub trait ParseCommand: Sized + Copy + core::fmt::Debug {
    fn from_raw(raw: RawCommand<'_>) -> Result<Self, CommandError>;

    fn parse(line: &str) -> Result<Self, CommandError> {
        Self::from_raw(RawCommand::tokenize(line)?)
    }
}

/// Track lift commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiftCommand {
    Lower,
    Raise,
    Stop,
    Reset,
    Status,
}

impl ParseCommand for LiftCommand {
    fn from_raw(raw: RawCommand<'_>) -> Result<Self, CommandError> {
        match raw.verb {
            "LOWER" => raw.bare(Self::Lower),
            "RAISE" => raw.bare(Self::Raise),
            "STOP" => raw.bare(Self::Stop),
            "RESET" => raw.bare(Self::Reset),
            "STATUS" => raw.bare(Self::Status),
            _ => Err(CommandError::UnknownVerb),
        }
    }
}

/// Elevator commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElevatorCommand {
    /// Go to a level; clamped into range by the controller.
    Level(i32),
    Up,
    Down,
    Stop,
    Reset,
    Status,
}

impl ParseCommand for ElevatorCommand {
    fn from_raw(raw: RawCommand<'_>) -> Result<Self, CommandError> {
        match raw.verb {
            "LEVEL" => raw.arg.map(Self::Level).ok_or(CommandError::MissingArgument),
            "UP" => raw.bare(Self::Up),
            "DOWN" => raw.bare(Self::Down),
            "STOP" => raw.bare(Self::Stop),
            "RESET" => raw.bare(Self::Reset),
            "STATUS" => raw.bare(Self::Status),
            _ => Err(CommandError::UnknownVerb),
        }
    }
}

/// Fridge / dispenser commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FridgeCommand {
    Dispense,
    Status,
}

impl ParseCommand for FridgeCommand {
    fn from_raw(raw: RawCommand<'_>) -> Result<Self, CommandError> {
        match raw.verb {
            "DISPENSE" => raw.bare(Self::Dispense),
            "STATUS" => raw.bare(Self::Status),
            _ => Err(CommandError::UnknownVerb),
        }
    }
}
