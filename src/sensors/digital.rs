//! Debounce-free digital input: limit switches, door reed switch,
//! dispense beam-break and the emergency-stop loop.
//!
//! Switches are wired to pull-up inputs, so most read active-low; the
//! polarity is configured per input.

use embedded_hal::digital::InputPin;

use crate::drivers::Polarity;
use crate::error::ActuatorError;

pub struct DigitalInput<P> {
    pin: P,
    polarity: Polarity,
}

impl<P: InputPin> DigitalInput<P> {
    pub fn new(pin: P, polarity: Polarity) -> Self {
        Self { pin, polarity }
    }

    /// `true` when the input is at its active level.
    pub fn is_asserted(&mut self) -> Result<bool, ActuatorError> {
        let high = self
            .pin
            .is_high()
            .map_err(|_| ActuatorError::GpioReadFailed)?;
        Ok(high == matches!(self.polarity, Polarity::ActiveHigh))
    }
}
