//! Brushed DC motor on an H-bridge (two-input driver such as a DRV8871 or
//! L298N half).
//!
//! | IN1 | IN2 | Drive   |
//! |-----|-----|---------|
//! |  0  |  0  | coast   |
//! |  1  |  0  | forward |
//! |  0  |  1  | reverse |
//!
//! Both inputs are pulled low before a new direction is applied, so the
//! bridge never sees both legs high.
//!
//! ## Safety contract
//!
//! This driver is a dumb actuator.  Travel limits and interlocks are
//! enforced by the controllers.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::error::ActuatorError;
use crate::fsm::context::MotorDrive;

pub struct MotorDriver<A, B> {
    in1: A,
    in2: B,
    drive: MotorDrive,
}

impl<A: OutputPin, B: OutputPin> MotorDriver<A, B> {
    /// Take both pins and force the bridge to coast.
    pub fn new(in1: A, in2: B) -> Result<Self, ActuatorError> {
        let mut driver = Self {
            in1,
            in2,
            drive: MotorDrive::Off,
        };
        driver.release()?;
        Ok(driver)
    }

    pub fn set(&mut self, drive: MotorDrive) -> Result<(), ActuatorError> {
        self.release()?;
        match drive {
            MotorDrive::Off => {}
            MotorDrive::Forward => self.in1.set_high().map_err(|_| ActuatorError::GpioWriteFailed)?,
            MotorDrive::Reverse => self.in2.set_high().map_err(|_| ActuatorError::GpioWriteFailed)?,
        }
        self.drive = drive;
        Ok(())
    }

    /// Apply `drive`, falling back to coast if the pins reject it.
    pub fn set_or_coast(&mut self, drive: MotorDrive) {
        if let Err(e) = self.set(drive) {
            warn!("motor: {e} applying {drive:?}, coasting");
            if let Err(e) = self.release() {
                warn!("motor: {e} while coasting");
            }
        }
    }

    pub fn drive(&self) -> MotorDrive {
        self.drive
    }

    fn release(&mut self) -> Result<(), ActuatorError> {
        self.drive = MotorDrive::Off;
        // Both legs are driven low even if the first write fails.
        let a = self.in1.set_low().map_err(|_| ActuatorError::GpioWriteFailed);
        let b = self.in2.set_low().map_err(|_| ActuatorError::GpioWriteFailed);
        a.and(b)
    }
}
