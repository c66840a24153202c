//! GPIO assignments for the three KITT node boards.
//!
//! Each board runs one role, so the maps overlap freely.  The binary is
//! the only consumer; drivers never hard-code pin numbers.
//!
//! Switch inputs are wired to the internal pull-up and close to ground,
//! so they read active-low.  Relay boards are opto-isolated and energise
//! on a HIGH output.

// ---------------------------------------------------------------------------
// Gateway link (shared by all roles)
// ---------------------------------------------------------------------------

pub const GATEWAY_UART_TX_GPIO: i32 = 17;
pub const GATEWAY_UART_RX_GPIO: i32 = 18;
pub const GATEWAY_BAUD: u32 = 115_200;

// ---------------------------------------------------------------------------
// Track lift
// ---------------------------------------------------------------------------

/// H-bridge IN1 (raise).
pub const LIFT_MOTOR_FWD_GPIO: i32 = 4;
/// H-bridge IN2 (lower).
pub const LIFT_MOTOR_REV_GPIO: i32 = 5;
/// Lock solenoid relay.  Energised = lock released.
pub const LIFT_LOCK_SOLENOID_GPIO: i32 = 6;
/// Track isolation relay.  Energised = track powered.
pub const LIFT_TRACK_RELAY_GPIO: i32 = 7;
pub const LIFT_LIMIT_TOP_GPIO: i32 = 10;
pub const LIFT_LIMIT_BOTTOM_GPIO: i32 = 11;

// ---------------------------------------------------------------------------
// Elevator
// ---------------------------------------------------------------------------

pub const ELEVATOR_MOTOR_UP_GPIO: i32 = 4;
pub const ELEVATOR_MOTOR_DOWN_GPIO: i32 = 5;
pub const ELEVATOR_LIMIT_TOP_GPIO: i32 = 10;
pub const ELEVATOR_LIMIT_BOTTOM_GPIO: i32 = 11;
/// Normally-closed e-stop loop: an open loop (HIGH) is asserted.
pub const ELEVATOR_ESTOP_GPIO: i32 = 12;

// ---------------------------------------------------------------------------
// Fridge / dispenser
// ---------------------------------------------------------------------------

/// Dispense gate solenoid.
pub const FRIDGE_DISPENSER_GPIO: i32 = 4;
pub const FRIDGE_PELTIER_GPIO: i32 = 5;
pub const FRIDGE_FAN_GPIO: i32 = 6;
/// Door reed switch: LOW = closed (magnet present).
pub const FRIDGE_DOOR_GPIO: i32 = 10;
/// Item-present beam break at the dispense chute.
pub const FRIDGE_DISPENSE_CONFIRM_GPIO: i32 = 11;
