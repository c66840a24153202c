//! Actuator drivers on `embedded-hal` digital pins.
//!
//! Drivers are generic over the pin types, so the same code drives ESP-IDF
//! `PinDriver`s on the board and in-memory pins on the host.

pub mod motor;
pub mod relay;

pub use relay::Polarity;
