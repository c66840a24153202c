//! Node configuration parameters
//!
//! All tunable parameters for the three firmware roles.  A board runs exactly
//! one role; the other role sections are carried so a single document can be
//! shared across the fleet.  Values can be overridden with a JSON document.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Which subsystem this board controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    Lift,
    Elevator,
    Fridge,
}

/// Track lift timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiftConfig {
    /// Settle time between releasing the lock and energising the motor (ms).
    pub lock_release_delay_ms: u32,
    /// Maximum travel time in either direction before faulting (ms).
    pub max_travel_ms: u32,
}

impl Default for LiftConfig {
    fn default() -> Self {
        Self {
            lock_release_delay_ms: 250,
            max_travel_ms: 8_000,
        }
    }
}

/// Multi-level elevator geometry and timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevatorConfig {
    /// Number of discrete levels served.
    pub level_count: u8,
    /// Level assumed at boot when no limit switch is asserted.
    pub initial_level: u8,
    /// Dead-reckoned travel time between adjacent levels (ms).
    pub level_travel_ms: u32,
    /// Maximum time without progress before declaring a stall (ms).
    pub stall_timeout_ms: u32,
    /// Absolute time budget for one command (ms).
    pub command_timeout_ms: u32,
}

impl Default for ElevatorConfig {
    fn default() -> Self {
        Self {
            level_count: 3,
            initial_level: 0,
            level_travel_ms: 3_000,
            stall_timeout_ms: 5_000,
            command_timeout_ms: 15_000,
        }
    }
}

/// Dispensing fridge set-points and timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FridgeConfig {
    /// Cabinet temperature set-point (°C).
    pub target_temp_c: f32,
    /// Half-width of the cooling hysteresis band (°C).
    pub deadband_c: f32,
    /// Minimum temperature above dew point for the fan to run (°C).
    pub dew_point_margin_c: f32,
    /// Time the dispense output is held before confirmation (ms).
    pub dispense_duration_ms: u32,
    /// Environmental loop period (ms).
    pub environment_interval_ms: u32,
}

impl Default for FridgeConfig {
    fn default() -> Self {
        Self {
            target_temp_c: 4.0,
            deadband_c: 1.0,
            dew_point_margin_c: 2.0,
            dispense_duration_ms: 2_000,
            environment_interval_ms: 1_000,
        }
    }
}

/// Complete configuration for one firmware node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    pub role: NodeRole,
    /// Control loop period (ms).
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u32,
    /// Heartbeat telemetry period (seconds, 0 = disabled).
    #[serde(default = "default_heartbeat_secs")]
    pub heartbeat_interval_secs: u32,
    #[serde(default)]
    pub lift: LiftConfig,
    #[serde(default)]
    pub elevator: ElevatorConfig,
    #[serde(default)]
    pub fridge: FridgeConfig,
}

fn default_poll_interval_ms() -> u32 {
    50
}

fn default_heartbeat_secs() -> u32 {
    30
}

impl NodeConfig {
    /// Defaults for a board running `role`.
    pub fn for_role(role: NodeRole) -> Self {
        let poll_interval_ms = match role {
            NodeRole::Lift | NodeRole::Elevator => default_poll_interval_ms(), // 20 Hz
            NodeRole::Fridge => 1_000,                                         // 1 Hz
        };
        Self {
            role,
            poll_interval_ms,
            heartbeat_interval_secs: default_heartbeat_secs(),
            lift: LiftConfig::default(),
            elevator: ElevatorConfig::default(),
            fridge: FridgeConfig::default(),
        }
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Self =
            serde_json::from_str(json).map_err(|_| Error::Config("malformed JSON"))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the controllers cannot run with.
    pub fn validate(&self) -> Result<(), Error> {
        if self.poll_interval_ms == 0 {
            return Err(Error::Config("poll_interval_ms must be > 0"));
        }
        if self.lift.max_travel_ms == 0 {
            return Err(Error::Config("lift.max_travel_ms must be > 0"));
        }

        let e = &self.elevator;
        if e.level_count < 2 {
            return Err(Error::Config("elevator.level_count must be >= 2"));
        }
        if e.initial_level >= e.level_count {
            return Err(Error::Config("elevator.initial_level out of range"));
        }
        if e.level_travel_ms == 0 {
            return Err(Error::Config("elevator.level_travel_ms must be > 0"));
        }
        if e.stall_timeout_ms <= e.level_travel_ms {
            return Err(Error::Config(
                "elevator.stall_timeout_ms must exceed level_travel_ms",
            ));
        }
        if e.stall_timeout_ms >= e.command_timeout_ms {
            return Err(Error::Config(
                "elevator.stall_timeout_ms must be below command_timeout_ms",
            ));
        }

        let f = &self.fridge;
        if !f.target_temp_c.is_finite() || !f.deadband_c.is_finite() || f.deadband_c < 0.0 {
            return Err(Error::Config("fridge hysteresis band invalid"));
        }
        if !f.dew_point_margin_c.is_finite() || f.dew_point_margin_c < 0.0 {
            return Err(Error::Config("fridge.dew_point_margin_c invalid"));
        }
        if f.environment_interval_ms == 0 {
            return Err(Error::Config("fridge.environment_interval_ms must be > 0"));
        }
        Ok(())
    }
}
