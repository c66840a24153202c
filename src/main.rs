//! KITT node firmware entry point.
//!
//! One image per board; the role (lift, elevator or fridge) comes from the
//! node configuration embedded at build time.
//!
//! ```text
//!  gateway ◀──UART──▶ UartTransport ──▶ NodeLoop ──▶ LiftController
//!                                          │         ElevatorController
//!                                          │         FridgeController
//!                                          ▼               │
//!                                   MonotonicClock         ▼
//!                                                  LiftBoard / ElevatorBoard
//!                                                  / FridgeBoard (GPIO)
//! ```

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{AnyIOPin, AnyInputPin, AnyOutputPin, Input, Output, PinDriver, Pull};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::uart::{config::Config as UartConfig, UartDriver};
use esp_idf_hal::units::Hertz;
use log::{info, warn};

use kitt::adapters::hardware::{ElevatorBoard, FridgeBoard, LiftBoard};
use kitt::adapters::log_sink::LogTransport;
use kitt::adapters::time::MonotonicClock;
use kitt::adapters::uart::UartTransport;
use kitt::app::node::NodeLoop;
use kitt::channel::transport::Transport;
use kitt::config::{NodeConfig, NodeRole};
use kitt::drivers::motor::MotorDriver;
use kitt::drivers::relay::Relay;
use kitt::drivers::Polarity;
use kitt::elevator::ElevatorController;
use kitt::error::Error;
use kitt::fridge::FridgeController;
use kitt::lift::LiftController;
use kitt::pins;
use kitt::sensors::cabinet::{CabinetModel, SimulatedCabinet};
use kitt::sensors::digital::DigitalInput;
use kitt::sensors::SensorHub;

type OutPin = PinDriver<'static, AnyOutputPin, Output>;
type InPin = PinDriver<'static, AnyInputPin, Input>;

fn main() -> Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("KITT node v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config();
    info!(
        "role {:?}, poll {} ms, heartbeat {} s",
        config.role, config.poll_interval_ms, config.heartbeat_interval_secs
    );

    let peripherals = Peripherals::take()?;
    let uart_config = UartConfig::new().baudrate(Hertz(pins::GATEWAY_BAUD));
    // SAFETY: the gateway pins are not claimed anywhere else.
    let (tx, rx) = unsafe {
        (
            AnyIOPin::new(pins::GATEWAY_UART_TX_GPIO),
            AnyIOPin::new(pins::GATEWAY_UART_RX_GPIO),
        )
    };
    match UartDriver::new(
        peripherals.uart1,
        tx,
        rx,
        None::<AnyIOPin>,
        None::<AnyIOPin>,
        &uart_config,
    ) {
        Ok(uart) => run_node(&config, UartTransport::new(uart)),
        Err(e) => {
            warn!("gateway UART unavailable ({e}), telemetry goes to the log only");
            run_node(&config, LogTransport::new())
        }
    }
}

/// Embedded JSON document if present and valid, otherwise role defaults.
fn load_config() -> NodeConfig {
    let role = match option_env!("KITT_NODE_ROLE") {
        Some("elevator") => NodeRole::Elevator,
        Some("fridge") => NodeRole::Fridge,
        _ => NodeRole::Lift,
    };
    match option_env!("KITT_NODE_CONFIG").map(NodeConfig::from_json) {
        Some(Ok(config)) => config,
        Some(Err(e)) => {
            warn!("embedded config rejected ({e}), using {role:?} defaults");
            NodeConfig::for_role(role)
        }
        None => NodeConfig::for_role(role),
    }
}

fn output(gpio: i32) -> Result<OutPin> {
    // SAFETY: every GPIO number comes from the role's pin map and is
    // claimed exactly once.
    Ok(PinDriver::output(unsafe { AnyOutputPin::new(gpio) })?)
}

fn input(gpio: i32, polarity: Polarity) -> Result<DigitalInput<InPin>> {
    // SAFETY: as for `output`.
    let mut pin = PinDriver::input(unsafe { AnyInputPin::new(gpio) })?;
    pin.set_pull(Pull::Up)?;
    Ok(DigitalInput::new(pin, polarity))
}

fn relay(gpio: i32, initial: bool) -> Result<Relay<OutPin>> {
    Ok(Relay::new(output(gpio)?, Polarity::ActiveHigh, initial).map_err(Error::from)?)
}

fn run_node<T: Transport>(config: &NodeConfig, transport: T) -> Result<()> {
    let clock = MonotonicClock::new();
    let mut pace = FreeRtos;

    match config.role {
        NodeRole::Lift => {
            let sensors = SensorHub::new()
                .with_limit_top(input(pins::LIFT_LIMIT_TOP_GPIO, Polarity::ActiveLow)?)
                .with_limit_bottom(input(pins::LIFT_LIMIT_BOTTOM_GPIO, Polarity::ActiveLow)?);
            let motor = MotorDriver::new(
                output(pins::LIFT_MOTOR_FWD_GPIO)?,
                output(pins::LIFT_MOTOR_REV_GPIO)?,
            )
            .map_err(Error::from)?;
            // Boot locked with the track powered.
            let lock = relay(pins::LIFT_LOCK_SOLENOID_GPIO, false)?;
            let track = relay(pins::LIFT_TRACK_RELAY_GPIO, true)?;
            let mut board = LiftBoard::new(sensors, motor, lock, track, FreeRtos);

            let lift = LiftController::new(config.lift.clone());
            NodeLoop::new(lift, transport, config.poll_interval_ms, config.heartbeat_interval_secs)
                .run(&clock, &mut pace, &mut board)
        }
        NodeRole::Elevator => {
            let sensors = SensorHub::new()
                .with_limit_top(input(pins::ELEVATOR_LIMIT_TOP_GPIO, Polarity::ActiveLow)?)
                .with_limit_bottom(input(pins::ELEVATOR_LIMIT_BOTTOM_GPIO, Polarity::ActiveLow)?)
                .with_emergency_stop(input(pins::ELEVATOR_ESTOP_GPIO, Polarity::ActiveHigh)?);
            let motor = MotorDriver::new(
                output(pins::ELEVATOR_MOTOR_UP_GPIO)?,
                output(pins::ELEVATOR_MOTOR_DOWN_GPIO)?,
            )
            .map_err(Error::from)?;
            let mut board = ElevatorBoard::new(sensors, motor);

            let elevator = ElevatorController::new(&config.elevator);
            NodeLoop::new(elevator, transport, config.poll_interval_ms, config.heartbeat_interval_secs)
                .run(&clock, &mut pace, &mut board)
        }
        NodeRole::Fridge => {
            let sensors = SensorHub::new()
                .with_door(input(pins::FRIDGE_DOOR_GPIO, Polarity::ActiveLow)?)
                .with_dispense_confirm(input(pins::FRIDGE_DISPENSE_CONFIRM_GPIO, Polarity::ActiveLow)?);
            // No climate probe is fitted yet; the cabinet model stands in.
            let climate = SimulatedCabinet::new(CabinetModel::default());
            let mut board = FridgeBoard::new(
                sensors,
                relay(pins::FRIDGE_DISPENSER_GPIO, false)?,
                relay(pins::FRIDGE_PELTIER_GPIO, false)?,
                relay(pins::FRIDGE_FAN_GPIO, false)?,
                climate,
                FreeRtos,
            );

            let fridge = FridgeController::new(config.fridge.clone());
            NodeLoop::new(fridge, transport, config.poll_interval_ms, config.heartbeat_interval_secs)
                .run(&clock, &mut pace, &mut board)
        }
    }
}
