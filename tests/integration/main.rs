//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below exercises one subsystem through the full node loop:
//! command lines go in through a loopback transport, telemetry lines come
//! back out, and a recording mock board stands in for the GPIO.  Time is
//! simulated, so every test runs on the host in microseconds.

mod elevator_tests;
mod fridge_tests;
mod lift_tests;
mod mock_hw;
mod node_loop_tests;
