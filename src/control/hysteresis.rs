//! Two-threshold on/off controller.
//!
//! The output switches on strictly above `setpoint + deadband` and off
//! strictly below `setpoint - deadband`.  Inside the band the previous
//! output is held, so a reading that wanders within the band never
//! toggles the actuator.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hysteresis {
    setpoint: f32,
    deadband: f32,
    on: bool,
}

impl Hysteresis {
    /// Controller starting with its output off.
    pub fn new(setpoint: f32, deadband: f32) -> Self {
        Self {
            setpoint,
            deadband: deadband.abs(),
            on: false,
        }
    }

    /// Feed one measurement and return the resulting output.
    pub fn update(&mut self, value: f32) -> bool {
        if value > self.upper() {
            self.on = true;
        } else if value < self.lower() {
            self.on = false;
        }
        self.on
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn upper(&self) -> f32 {
        self.setpoint + self.deadband
    }

    pub fn lower(&self) -> f32 {
        self.setpoint - self.deadband
    }
}
