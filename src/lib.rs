//! KITT delivery firmware library.
//!
//! Every control policy, the command channel and the board adapters are
//! pure logic over `embedded-hal` traits and compile on the host.  Only
//! `adapters::uart` and the `kitt-node` binary need ESP-IDF (`espidf`
//! feature).

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod channel;
pub mod config;
pub mod control;
pub mod controller;
pub mod drivers;
pub mod elevator;
pub mod error;
pub mod fridge;
pub mod fsm;
pub mod lift;
pub mod pins;
pub mod safety;
pub mod sensors;
pub mod tick;
