//! Dispensing fridge subsystem.
//!
//! Two loops share the hardware and never wait on each other:
//!
//! * the **environmental loop** runs on its own period, derives the dew
//!   point and drives the cooling and fan outputs;
//! * the **dispense action** runs synchronously inside the cycle that
//!   received `DISPENSE` and blocks for the hold time.
//!
//! Every dispense outcome is a status word.  There is no FAULT state.

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::app::commands::FridgeCommand;
use crate::app::events::{SubsystemId, TelemetryEvent, TelemetryKind};
use crate::app::node::Subsystem;
use crate::app::ports::{ClimatePort, DispenserPort, EventSink, SensorPort, TimePort};
use crate::config::FridgeConfig;
use crate::control::hysteresis::Hysteresis;
use crate::control::psychrometrics::{dew_point_c, dew_point_margin_c};
use crate::tick::Tick;

pub trait FridgeHardware: SensorPort + DispenserPort + ClimatePort + DelayNs {}

impl<T: SensorPort + DispenserPort + ClimatePort + DelayNs> FridgeHardware for T {}

/// Result of the most recent environmental pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EnvironmentalState {
    pub temperature_c: f32,
    pub humidity_pct: f32,
    pub dew_point_c: f32,
    pub peltier_on: bool,
    pub fan_on: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispenseState {
    Idle,
    Dispensing,
}

pub struct FridgeController {
    config: FridgeConfig,
    cooling: Hysteresis,
    env: EnvironmentalState,
    last_env_run: Option<Tick>,
    state: DispenseState,
    last_status: &'static str,
}

impl FridgeController {
    pub fn new(config: FridgeConfig) -> Self {
        Self {
            cooling: Hysteresis::new(config.target_temp_c, config.deadband_c),
            config,
            env: EnvironmentalState::default(),
            last_env_run: None,
            state: DispenseState::Idle,
            last_status: "ready",
        }
    }

    pub fn environment(&self) -> &EnvironmentalState {
        &self.env
    }

    pub fn dispense_state(&self) -> DispenseState {
        self.state
    }

    fn publish_status(&mut self, word: &'static str, sink: &mut impl EventSink) {
        self.last_status = word;
        sink.emit(&TelemetryEvent::new(SubsystemId::Fridge, TelemetryKind::Status, word));
    }

    fn publish_telemetry(&self, sink: &mut impl EventSink) {
        let env = &self.env;
        sink.emit(&TelemetryEvent::with_args(
            SubsystemId::Fridge,
            TelemetryKind::Telemetry,
            format_args!(
                "temp_c={:.2} humidity={:.2} dewpoint_c={:.2}",
                env.temperature_c, env.humidity_pct, env.dew_point_c
            ),
        ));
    }

    fn publish_outputs(&self, sink: &mut impl EventSink) {
        let word = |on: bool| if on { "on" } else { "off" };
        sink.emit(&TelemetryEvent::with_args(
            SubsystemId::Fridge,
            TelemetryKind::Outputs,
            format_args!(
                "peltier={} fan={}",
                word(self.env.peltier_on),
                word(self.env.fan_on)
            ),
        ));
    }

    /// One pass of the environmental loop.
    pub fn run_environment(&mut self, hw: &mut impl ClimatePort, sink: &mut impl EventSink) {
        let Some(reading) = hw.read_climate() else {
            warn!("fridge: no climate reading this pass");
            return;
        };
        if !reading.temperature_c.is_finite() || !reading.humidity_pct.is_finite() {
            warn!("fridge: discarding non-finite climate reading");
            return;
        }

        let t = reading.temperature_c;
        let rh = reading.humidity_pct;
        let dew = dew_point_c(t, rh);
        let peltier_on = self.cooling.update(t);
        let fan_on = dew_point_margin_c(t, rh) > self.config.dew_point_margin_c;

        let changed = peltier_on != self.env.peltier_on || fan_on != self.env.fan_on;
        if peltier_on != self.env.peltier_on {
            hw.set_cooling(peltier_on);
        }
        if fan_on != self.env.fan_on {
            hw.set_fan(fan_on);
        }

        self.env = EnvironmentalState {
            temperature_c: t,
            humidity_pct: rh,
            dew_point_c: dew,
            peltier_on,
            fan_on,
        };

        self.publish_telemetry(sink);
        if changed {
            info!("fridge: peltier={peltier_on} fan={fan_on} at {t:.2} C");
            self.publish_outputs(sink);
        }
    }

    /// Door check, hold, confirmation sample, release.
    fn dispense(&mut self, hw: &mut impl FridgeHardware, sink: &mut impl EventSink) {
        if !hw.read_sensors().door_closed {
            warn!("fridge: DISPENSE refused, door open");
            self.publish_status("error_door_open", sink);
            return;
        }

        self.state = DispenseState::Dispensing;
        self.publish_status("dispensing", sink);
        hw.set_dispenser(true);
        hw.delay_ms(self.config.dispense_duration_ms);

        let confirmed = hw.read_sensors().dispense_confirmed;
        hw.set_dispenser(false);
        self.state = DispenseState::Idle;

        if confirmed {
            info!("fridge: dispense confirmed");
            self.publish_status("done", sink);
        } else {
            warn!(
                "fridge: no confirmation after {} ms",
                self.config.dispense_duration_ms
            );
            self.publish_status("error_dispense_timeout", sink);
        }
    }
}

impl<H: FridgeHardware> Subsystem<H> for FridgeController {
    type Command = FridgeCommand;

    fn id(&self) -> SubsystemId {
        SubsystemId::Fridge
    }

    fn start(&mut self, _now: Tick, hw: &mut H, sink: &mut impl EventSink) {
        hw.set_dispenser(false);
        hw.set_cooling(false);
        hw.set_fan(false);
        self.publish_status("ready", sink);
    }

    fn handle_command(&mut self, cmd: FridgeCommand, _clock: &impl TimePort, hw: &mut H, sink: &mut impl EventSink) {
        match cmd {
            FridgeCommand::Dispense => self.dispense(hw, sink),
            FridgeCommand::Status => {
                self.publish_status(self.last_status, sink);
                if self.last_env_run.is_some() {
                    self.publish_telemetry(sink);
                }
            }
        }
    }

    fn update(&mut self, now: Tick, hw: &mut H, sink: &mut impl EventSink) {
        let interval = self.config.environment_interval_ms;
        let due = self
            .last_env_run
            .is_none_or(|last| now.elapsed_since(last) >= interval);
        if due {
            self.last_env_run = Some(now);
            self.run_environment(hw, sink);
        }
    }

    fn state_label(&self) -> &'static str {
        match self.state {
            DispenseState::Idle => "idle",
            DispenseState::Dispensing => "dispensing",
        }
    }
}
