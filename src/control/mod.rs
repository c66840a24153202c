//! Closed-loop helpers for the fridge environmental loop.

pub mod hysteresis;
pub mod psychrometrics;
