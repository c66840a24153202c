//! Node loop and line channel behaviour shared by every role.

use kitt::app::ports::TimePort;
use kitt::config::{ElevatorConfig, LiftConfig};
use kitt::elevator::ElevatorController;
use kitt::lift::LiftController;

use crate::mock_hw::Bench;

fn lift(heartbeat_secs: u32) -> Bench<LiftController> {
    let b = Bench::with_heartbeat(LiftController::new(LiftConfig::default()), 50, heartbeat_secs);
    b.lines();
    b
}

#[test]
fn malformed_lines_are_dropped_silently() {
    let mut b = lift(0);
    for line in ["FLY", "lower", "LOWER now", "RAISE 3", "", "   "] {
        b.command(line);
    }
    assert!(b.lines().is_empty());
    assert!(b.hw.calls.is_empty());
    // The empty line never reaches the parser; whitespace does.
    assert_eq!(b.node.rejected(), 5);
}

#[test]
fn one_command_per_cycle() {
    let mut b = lift(0);
    b.send("STATUS");
    b.send("STATUS");
    b.cycle();
    assert_eq!(b.lines(), ["lift/state ready"]);
    b.cycle();
    assert_eq!(b.lines(), ["lift/state ready"]);
    b.cycle();
    assert!(b.lines().is_empty());
}

#[test]
fn crlf_and_split_lines_are_reassembled() {
    let mut b = lift(0);
    b.gateway.inject_bytes(b"STA");
    b.cycle();
    assert!(b.lines().is_empty());
    b.gateway.inject_bytes(b"TUS\r\n");
    b.cycle();
    assert_eq!(b.lines(), ["lift/state ready"]);
}

#[test]
fn overlong_line_does_not_poison_the_next_command() {
    let mut b = lift(0);
    b.send(&"X".repeat(200));
    b.send("STATUS");
    b.cycle();
    assert_eq!(b.lines(), ["lift/state ready"]);
}

#[test]
fn heartbeat_reports_uptime_and_state() {
    let mut b = lift(1);
    b.cycles(20);
    assert!(b.lines().is_empty());
    b.cycle();
    assert_eq!(b.lines(), ["lift/heartbeat uptime_ms=1000 state=idle"]);
    b.cycles(19);
    assert!(b.lines().is_empty());
}

#[test]
fn heartbeat_carries_moving_state() {
    let mut b = Bench::with_heartbeat(ElevatorController::new(&ElevatorConfig::default()), 50, 1);
    b.command("LEVEL 1");
    b.lines();
    b.cycle_until(40, |b| b.clock.now().as_millis() > 1_000);
    assert_eq!(
        b.lines(),
        ["elevator/heartbeat uptime_ms=1000 state=moving_up"]
    );
}

#[test]
fn cycles_are_counted() {
    let mut b = lift(0);
    b.cycles(7);
    assert_eq!(b.node.cycles(), 7);
    assert_eq!(b.node.channel().lines_sent(), 1);
}
