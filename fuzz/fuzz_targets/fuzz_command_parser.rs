//! Fuzz target: command parsers
//!
//! Every subsystem's parser must turn arbitrary text into either a typed
//! command or a `CommandError`, never a panic.  A parsed `LEVEL` must carry
//! the integer that appears on the line.
//!
//! cargo fuzz run fuzz_command_parser

#![no_main]

use kitt::app::commands::{ElevatorCommand, FridgeCommand, LiftCommand, ParseCommand, RawCommand};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(line) = core::str::from_utf8(data) else {
        return;
    };

    let _ = LiftCommand::parse(line);
    let _ = FridgeCommand::parse(line);

    if let Ok(ElevatorCommand::Level(n)) = ElevatorCommand::parse(line) {
        let raw = RawCommand::tokenize(line).expect("parsed line must tokenize");
        assert_eq!(raw.verb, "LEVEL");
        assert_eq!(raw.arg, Some(n));
    }
});
