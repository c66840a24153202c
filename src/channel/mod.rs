//! Command / telemetry line channel.
//!
//! ```text
//!  gateway ──bytes──▶ Transport ──▶ LineDecoder ──▶ poll_line() ──▶ parser
//!  gateway ◀─bytes─── Transport ◀── send_line() ◀── EventSink::emit()
//! ```
//!
//! Inbound bytes are pulled one at a time so that at most one command line
//! is consumed per control cycle; anything behind it stays in the transport
//! for the next cycle.  Outbound frames are fire-and-forget.

pub mod line;
pub mod transport;

use core::fmt::Write;

use log::{debug, warn};

use crate::app::events::TelemetryEvent;
use crate::app::ports::EventSink;
use crate::error::ChannelError;

use line::{Line, LineDecoder};
use transport::Transport;

/// Longest outbound line: topic prefix plus payload.
pub const TELEMETRY_LINE_CAPACITY: usize = 96;

pub struct CommandChannel<T: Transport> {
    transport: T,
    decoder: LineDecoder,
    lines_sent: u32,
    send_failures: u32,
    read_failures: u32,
}

impl<T: Transport> CommandChannel<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            decoder: LineDecoder::new(),
            lines_sent: 0,
            send_failures: 0,
            read_failures: 0,
        }
    }

    /// Next complete command line, if one has arrived.  Never blocks.
    /// Framing errors are logged and the offending line skipped.  A
    /// transport read error drops any partial line.
    pub fn poll_line(&mut self) -> Option<Line> {
        let mut byte = [0u8; 1];
        loop {
            match self.transport.read(&mut byte) {
                Ok(0) => return None,
                Ok(_) => match self.decoder.push(byte[0]) {
                    Some(Ok(line)) => return Some(line),
                    Some(Err(e)) => warn!("command channel: {e}"),
                    None => {}
                },
                Err(e) => {
                    self.read_failures = self.read_failures.wrapping_add(1);
                    warn!("command channel: {} ({e:?})", ChannelError::ReadFailed);
                    self.decoder.reset();
                    return None;
                }
            }
        }
    }

    /// Write `line` followed by `\n` and flush.
    pub fn send_line(&mut self, line: &str) -> Result<(), ChannelError> {
        self.write_all(line.as_bytes())?;
        self.write_all(b"\n")?;
        self.transport
            .flush()
            .map_err(|_| ChannelError::WriteFailed)?;
        self.lines_sent = self.lines_sent.wrapping_add(1);
        Ok(())
    }

    fn write_all(&mut self, mut data: &[u8]) -> Result<(), ChannelError> {
        while !data.is_empty() {
            match self.transport.write(data) {
                Ok(0) => return Err(ChannelError::Overflow),
                Ok(n) => data = &data[n.min(data.len())..],
                Err(_) => return Err(ChannelError::WriteFailed),
            }
        }
        Ok(())
    }

    pub fn lines_sent(&self) -> u32 {
        self.lines_sent
    }

    pub fn send_failures(&self) -> u32 {
        self.send_failures
    }

    pub fn read_failures(&self) -> u32 {
        self.read_failures
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}

impl<T: Transport> EventSink for CommandChannel<T> {
    fn emit(&mut self, event: &TelemetryEvent) {
        let mut text: heapless::String<TELEMETRY_LINE_CAPACITY> = heapless::String::new();
        if write!(text, "{event}").is_err() {
            warn!("telemetry line truncated: {}/{}", event.subsystem.as_str(), event.kind.as_str());
        }
        debug!("tx: {text}");
        if let Err(e) = self.send_line(&text) {
            self.send_failures = self.send_failures.wrapping_add(1);
            warn!("telemetry dropped ({e}): {text}");
        }
    }
}
