//! Fuzz target: `LineDecoder::push`
//!
//! Streams arbitrary bytes through the line decoder.  Lines it yields must
//! be non-empty, within `MAX_LINE_LEN`, and free of CR/LF; after a reset
//! the decoder must frame a fresh command correctly.
//!
//! cargo fuzz run fuzz_line_decoder

#![no_main]

use kitt::channel::line::{LineDecoder, MAX_LINE_LEN};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut decoder = LineDecoder::new();

    for &b in data {
        if let Some(Ok(line)) = decoder.push(b) {
            assert!(!line.is_empty());
            assert!(line.len() <= MAX_LINE_LEN);
            assert!(!line.contains(['\r', '\n']));
        }
        assert!(decoder.pending() <= MAX_LINE_LEN);
    }

    decoder.reset();
    let mut framed = None;
    for &b in b"STATUS\n" {
        if let Some(r) = decoder.push(b) {
            framed = Some(r);
        }
    }
    assert_eq!(framed.and_then(Result::ok).as_deref(), Some("STATUS"));
});
