//! Newline framing for command lines.
//!
//! Wire format: ASCII text terminated by `\n`.  Carriage returns are
//! dropped wherever they appear, so `\r\n` terminals work unchanged.  A
//! line longer than [`MAX_LINE_LEN`] is reported once and the rest of it is
//! discarded up to the next newline.  Blank lines are skipped.

use crate::error::ChannelError;

/// Longest command line accepted, excluding the terminator.
pub const MAX_LINE_LEN: usize = 64;

/// One decoded command line.
pub type Line = heapless::String<MAX_LINE_LEN>;

enum DecoderState {
    Collecting,
    /// Overlong line; drop bytes until the next newline.
    Discarding,
}

/// Streaming line decoder, fed one byte at a time.
pub struct LineDecoder {
    state: DecoderState,
    buf: heapless::Vec<u8, MAX_LINE_LEN>,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self {
            state: DecoderState::Collecting,
            buf: heapless::Vec::new(),
        }
    }

    /// Feed one byte.  Returns a complete line, a framing error, or `None`
    /// while a line is still being collected.
    pub fn push(&mut self, byte: u8) -> Option<Result<Line, ChannelError>> {
        match self.state {
            DecoderState::Discarding => {
                if byte == b'\n' {
                    self.state = DecoderState::Collecting;
                }
                None
            }
            DecoderState::Collecting => match byte {
                b'\r' => None,
                b'\n' => self.finish(),
                _ => {
                    if self.buf.push(byte).is_err() {
                        self.buf.clear();
                        self.state = DecoderState::Discarding;
                        return Some(Err(ChannelError::LineTooLong));
                    }
                    None
                }
            },
        }
    }

    /// Bytes buffered toward the current line.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Drop any partial line.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.state = DecoderState::Collecting;
    }

    fn finish(&mut self) -> Option<Result<Line, ChannelError>> {
        if self.buf.is_empty() {
            return None;
        }
        let bytes = core::mem::take(&mut self.buf);
        let result = heapless::String::from_utf8(bytes).map_err(|_| ChannelError::InvalidUtf8);
        Some(result)
    }
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new()
    }
}
