//! Transport abstraction for the gateway link.
//!
//! Concrete implementations:
//! - UART to the bridging gateway (ESP-IDF)
//! - In-memory loopback (host simulation and tests)
//! - Console log when no gateway is attached
//!
//! The command channel is generic over `Transport`, so a new link needs no
//! changes to framing or to the controllers.

/// Byte-oriented, non-blocking transport.
pub trait Transport {
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes into `buf`.  Returns 0 if no data is
    /// available.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write `data`, returning the number of bytes accepted.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Check if data is available for reading.
    fn available(&self) -> bool;
}
