//! Log-backed transport.
//!
//! Used when a node runs without a gateway link: every telemetry line is
//! written to the ESP-IDF logger (UART0 / USB-CDC console) and no commands
//! are ever received.

use log::info;

use crate::channel::transport::Transport;

const LINE_CAPACITY: usize = 128;

pub struct LogTransport {
    line: heapless::Vec<u8, LINE_CAPACITY>,
}

impl LogTransport {
    pub fn new() -> Self {
        Self {
            line: heapless::Vec::new(),
        }
    }

    fn emit_line(&mut self) {
        if !self.line.is_empty() {
            info!("TELEM | {}", String::from_utf8_lossy(&self.line));
            self.line.clear();
        }
    }
}

impl Default for LogTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for LogTransport {
    type Error = core::convert::Infallible;

    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> {
        Ok(0)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        for &b in data {
            if b == b'\n' {
                self.emit_line();
            } else if self.line.push(b).is_err() {
                self.emit_line();
                let _ = self.line.push(b);
            }
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.emit_line();
        Ok(())
    }

    fn available(&self) -> bool {
        false
    }
}
