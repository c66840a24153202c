//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements                           | Connects to             |
//! |------------|--------------------------------------|-------------------------|
//! | `hardware` | SensorPort, MotorPort, InterlockPort | GPIO via `embedded-hal` |
//! |            | DispenserPort, ClimatePort, DelayNs  |                         |
//! | `log_sink` | Transport                            | Serial log output       |
//! | `sim`      | TimePort, DelayNs, Transport         | In-memory simulation    |
//! | `time`     | TimePort                             | ESP32 system timer      |
//! | `uart`     | Transport                            | Gateway UART (ESP-IDF)  |

pub mod hardware;
pub mod log_sink;
pub mod sim;
pub mod time;
#[cfg(feature = "espidf")]
pub mod uart;
