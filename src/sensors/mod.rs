//! Sensor subsystem: digital inputs, the aggregating [`SensorHub`] and the
//! simulated fridge cabinet.
//!
//! The hub owns every input fitted to a board and produces a fresh
//! [`SensorSnapshot`] each cycle.  Nothing is cached between cycles.

pub mod cabinet;
pub mod digital;

use embedded_hal::digital::InputPin;
use log::warn;

use crate::fsm::context::SensorSnapshot;
use digital::DigitalInput;

/// Inputs fitted to one board.  Absent inputs read as not asserted, except
/// the door, which reads as closed when no door switch is fitted.
pub struct SensorHub<I> {
    limit_top: Option<DigitalInput<I>>,
    limit_bottom: Option<DigitalInput<I>>,
    door_closed: Option<DigitalInput<I>>,
    dispense_confirmed: Option<DigitalInput<I>>,
    emergency_stop: Option<DigitalInput<I>>,
    read_failures: u32,
}

impl<I: InputPin> SensorHub<I> {
    pub fn new() -> Self {
        Self {
            limit_top: None,
            limit_bottom: None,
            door_closed: None,
            dispense_confirmed: None,
            emergency_stop: None,
            read_failures: 0,
        }
    }

    #[must_use]
    pub fn with_limit_top(mut self, input: DigitalInput<I>) -> Self {
        self.limit_top = Some(input);
        self
    }

    #[must_use]
    pub fn with_limit_bottom(mut self, input: DigitalInput<I>) -> Self {
        self.limit_bottom = Some(input);
        self
    }

    #[must_use]
    pub fn with_door(mut self, input: DigitalInput<I>) -> Self {
        self.door_closed = Some(input);
        self
    }

    #[must_use]
    pub fn with_dispense_confirm(mut self, input: DigitalInput<I>) -> Self {
        self.dispense_confirmed = Some(input);
        self
    }

    #[must_use]
    pub fn with_emergency_stop(mut self, input: DigitalInput<I>) -> Self {
        self.emergency_stop = Some(input);
        self
    }

    /// Sample every fitted input.
    ///
    /// A failed read takes the value that keeps the system safe: the
    /// emergency stop reads as asserted, the door as open, and the limit and
    /// confirmation switches as not reached.
    pub fn read(&mut self) -> SensorSnapshot {
        SensorSnapshot {
            limit_top: self.sample(Input::LimitTop, false, false),
            limit_bottom: self.sample(Input::LimitBottom, false, false),
            door_closed: self.sample(Input::Door, true, false),
            dispense_confirmed: self.sample(Input::DispenseConfirm, false, false),
            emergency_stop_asserted: self.sample(Input::EmergencyStop, false, true),
        }
    }

    pub fn read_failures(&self) -> u32 {
        self.read_failures
    }

    fn sample(&mut self, which: Input, absent: bool, on_error: bool) -> bool {
        let slot = match which {
            Input::LimitTop => &mut self.limit_top,
            Input::LimitBottom => &mut self.limit_bottom,
            Input::Door => &mut self.door_closed,
            Input::DispenseConfirm => &mut self.dispense_confirmed,
            Input::EmergencyStop => &mut self.emergency_stop,
        };
        let Some(input) = slot else {
            return absent;
        };
        match input.is_asserted() {
            Ok(v) => v,
            Err(e) => {
                self.read_failures = self.read_failures.wrapping_add(1);
                warn!("sensor {which:?}: {e}");
                on_error
            }
        }
    }
}

impl<I: InputPin> Default for SensorHub<I> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy)]
enum Input {
    LimitTop,
    LimitBottom,
    Door,
    DispenseConfirm,
    EmergencyStop,
}
