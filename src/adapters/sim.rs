//! Host-side simulation harness.
//!
//! [`SimClock`] and [`SimDelay`] share one millisecond counter, so a
//! blocking delay inside a controller (lock settle, dispense hold) moves
//! simulated time forward exactly as it would on the board.
//! [`LoopbackTransport`] is an in-memory byte pipe whose handle can be
//! cloned: the node loop owns one end, the test or simulator the other.

use core::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;

use crate::app::ports::TimePort;
use crate::channel::transport::Transport;
use crate::tick::Tick;

#[derive(Clone, Default)]
pub struct SimClock {
    ms: Rc<Cell<u32>>,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(ms: u32) -> Self {
        let clock = Self::new();
        clock.ms.set(ms);
        clock
    }

    /// Move time forward, wrapping at `u32::MAX`.
    pub fn advance(&self, ms: u32) {
        self.ms.set(self.ms.get().wrapping_add(ms));
    }

    /// A delay source that advances this clock.
    pub fn delay(&self) -> SimDelay {
        SimDelay {
            ms: Rc::clone(&self.ms),
            sub_ms_ns: 0,
            total_ms: 0,
        }
    }
}

impl TimePort for SimClock {
    fn now(&self) -> Tick {
        Tick(self.ms.get())
    }
}

/// Blocking delay that only advances the shared simulated clock.
pub struct SimDelay {
    ms: Rc<Cell<u32>>,
    sub_ms_ns: u32,
    total_ms: u64,
}

impl SimDelay {
    /// Total simulated milliseconds this delay has blocked for.
    pub fn total_ms(&self) -> u64 {
        self.total_ms
    }

    fn advance(&mut self, ms: u32) {
        self.ms.set(self.ms.get().wrapping_add(ms));
        self.total_ms += u64::from(ms);
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        let total = u64::from(self.sub_ms_ns) + u64::from(ns);
        self.sub_ms_ns = (total % 1_000_000) as u32;
        self.advance((total / 1_000_000) as u32);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.advance(ms);
    }
}

#[derive(Clone, Default)]
pub struct LoopbackTransport {
    inbound: Rc<RefCell<VecDeque<u8>>>,
    outbound: Rc<RefCell<Vec<u8>>>,
}

impl LoopbackTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a command line (a `\n` is appended).
    pub fn inject(&self, line: &str) {
        let mut rx = self.inbound.borrow_mut();
        rx.extend(line.as_bytes());
        rx.push_back(b'\n');
    }

    /// Queue raw bytes exactly as given.
    pub fn inject_bytes(&self, bytes: &[u8]) {
        self.inbound.borrow_mut().extend(bytes);
    }

    /// Drain everything written so far, split into lines.
    pub fn take_lines(&self) -> Vec<String> {
        let bytes = core::mem::take(&mut *self.outbound.borrow_mut());
        String::from_utf8_lossy(&bytes)
            .lines()
            .map(str::to_owned)
            .collect()
    }
}

impl Transport for LoopbackTransport {
    type Error = core::convert::Infallible;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut rx = self.inbound.borrow_mut();
        let mut n = 0;
        while n < buf.len() {
            match rx.pop_front() {
                Some(b) => {
                    buf[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        self.outbound.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn available(&self) -> bool {
        !self.inbound.borrow().is_empty()
    }
}
