//! Single-channel relay / solenoid / SSR output.
//!
//! Used for the lift lock solenoid, the track-section isolation relay, the
//! fridge peltier and fan, and the dispense gate.  Polarity is per channel
//! since relay boards differ in whether a low input energises the coil.

use embedded_hal::digital::{OutputPin, PinState};
use log::warn;

use crate::error::ActuatorError;

/// Electrical level that energises the load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    ActiveHigh,
    ActiveLow,
}

impl Polarity {
    /// Pin level for a logical `asserted` value.
    pub fn level(self, asserted: bool) -> PinState {
        PinState::from(asserted == matches!(self, Self::ActiveHigh))
    }
}

pub struct Relay<P> {
    pin: P,
    polarity: Polarity,
    energized: bool,
}

impl<P: OutputPin> Relay<P> {
    /// Take the pin and drive it to `initial`.
    pub fn new(pin: P, polarity: Polarity, initial: bool) -> Result<Self, ActuatorError> {
        let mut relay = Self {
            pin,
            polarity,
            energized: !initial,
        };
        relay.set(initial)?;
        Ok(relay)
    }

    pub fn set(&mut self, energized: bool) -> Result<(), ActuatorError> {
        self.pin
            .set_state(self.polarity.level(energized))
            .map_err(|_| ActuatorError::GpioWriteFailed)?;
        self.energized = energized;
        Ok(())
    }

    /// Like [`set`](Self::set) but logs instead of returning the error.  The
    /// tracked state keeps its last confirmed value on failure.
    pub fn set_logged(&mut self, energized: bool, what: &str) {
        if let Err(e) = self.set(energized) {
            warn!("{what}: {e}");
        }
    }

    pub fn is_energized(&self) -> bool {
        self.energized
    }
}
