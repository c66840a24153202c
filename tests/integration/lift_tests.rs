//! Track lift through the node loop: interlock sequencing, travel
//! timeout, FAULT latching and RESET recovery.

use kitt::app::ports::TimePort;
use kitt::config::LiftConfig;
use kitt::fsm::context::MotorDrive;
use kitt::fsm::StateId;
use kitt::lift::LiftController;
use kitt::tick::Tick;

use crate::mock_hw::{Bench, HwCall};

const POLL_MS: u32 = 50;

fn bench() -> Bench<LiftController> {
    let bench = Bench::new(LiftController::new(LiftConfig::default()), POLL_MS);
    assert_eq!(bench.lines(), ["lift/state ready"]);
    bench
}

/// LOWER and run until the bottom limit trips.
fn lowered() -> Bench<LiftController> {
    let mut b = bench();
    b.command("LOWER");
    b.cycles(4);
    b.hw.sensors.limit_bottom = true;
    b.cycle();
    assert_eq!(b.subsystem().state(), StateId::Idle);
    b.lines();
    b.hw.take_calls();
    b
}

#[test]
fn boot_leaves_outputs_untouched() {
    let b = bench();
    assert!(b.hw.calls.is_empty());
    assert!(b.hw.lock());
    assert!(b.hw.track());
}

#[test]
fn lower_releases_lock_and_isolates_track_before_motor() {
    let mut b = bench();
    b.command("LOWER");
    assert_eq!(
        b.hw.take_calls(),
        [
            HwCall::Lock(false),
            HwCall::Delay(250),
            HwCall::TrackPower(false),
            HwCall::Motor(MotorDrive::Reverse),
        ]
    );
    assert_eq!(b.lines(), ["lift/state lowering"]);
    assert_eq!(b.subsystem().state(), StateId::MovingBackward);

    b.cycles(5);
    assert!(b.lines().is_empty());

    b.hw.sensors.limit_bottom = true;
    b.cycle();
    assert_eq!(b.lines(), ["lift/state lowered"]);
    assert_eq!(
        b.hw.take_calls(),
        [HwCall::Motor(MotorDrive::Off), HwCall::Lock(true)]
    );
    assert!(!b.hw.track(), "track stays isolated while lowered");
}

#[test]
fn raise_restores_track_power_only_at_the_top() {
    let mut b = lowered();
    b.command("RAISE");
    assert_eq!(
        b.hw.take_calls(),
        [
            HwCall::Lock(false),
            HwCall::Delay(250),
            HwCall::Motor(MotorDrive::Forward),
        ]
    );
    assert_eq!(b.lines(), ["lift/state raising"]);

    b.hw.sensors.limit_bottom = false;
    b.cycles(3);
    assert!(!b.hw.track());

    b.hw.sensors.limit_top = true;
    b.cycle();
    assert_eq!(
        b.hw.take_calls(),
        [
            HwCall::Motor(MotorDrive::Off),
            HwCall::Lock(true),
            HwCall::TrackPower(true),
        ]
    );
    assert_eq!(b.lines(), ["lift/state raised"]);
}

#[test]
fn stop_mid_travel_returns_to_idle() {
    let mut b = bench();
    b.command("LOWER");
    b.cycles(3);
    b.lines();
    b.command("STOP");
    assert_eq!(b.subsystem().state(), StateId::Idle);
    assert_eq!(b.hw.motor(), MotorDrive::Off);
    assert_eq!(b.lines(), ["lift/state stopped"]);
}

#[test]
fn motion_commands_are_ignored_while_moving() {
    let mut b = bench();
    b.command("LOWER");
    b.hw.take_calls();
    b.lines();
    b.command("RAISE");
    b.command("LOWER");
    assert!(b.hw.calls.is_empty());
    assert!(b.lines().is_empty());
    assert_eq!(b.subsystem().state(), StateId::MovingBackward);
}

#[test]
fn travel_timeout_latches_fault_within_one_poll() {
    let mut b = bench();
    b.command("LOWER");
    // Motor started after the 250 ms lock settle.
    let motion_start = Tick(250);
    let mut fault_seen_at = None;
    for _ in 0..400 {
        let before = b.clock.now();
        b.cycle();
        if b.subsystem().state() == StateId::Fault {
            fault_seen_at = Some(before);
            break;
        }
    }
    let at = fault_seen_at.expect("lift never timed out");
    let travelled = at.elapsed_since(motion_start);
    assert!(travelled > 8_000);
    assert!(travelled <= 8_000 + POLL_MS);
    assert_eq!(b.hw.motor(), MotorDrive::Off);
    assert_eq!(b.lines().last().map(String::as_str), Some("lift/state fault_timeout"));
}

#[test]
fn short_settle_delay_does_not_trip_the_travel_timeout() {
    let mut b = Bench::boot(LiftController::new(LiftConfig::default()), POLL_MS, 0, |hw| {
        hw.delay_shortfall_ms = 10;
    });
    b.lines();
    b.command("LOWER");
    assert_eq!(b.lines(), ["lift/state lowering"]);
    assert_eq!(b.subsystem().state(), StateId::MovingBackward);
    assert_eq!(b.subsystem().context().motion_start, Tick(240));

    b.cycles(20);
    assert_eq!(b.subsystem().state(), StateId::MovingBackward);
    assert_eq!(b.hw.motor(), MotorDrive::Reverse);
    assert!(b.lines().is_empty());
}

#[test]
fn fault_holds_outputs_until_reset() {
    let mut b = bench();
    b.command("LOWER");
    b.cycle_until(400, |b| b.subsystem().state() == StateId::Fault);
    b.lines();
    b.hw.take_calls();

    for cmd in ["RAISE", "LOWER", "STOP"] {
        b.command(cmd);
    }
    b.cycles(10);
    assert!(b.hw.calls.is_empty(), "outputs changed in FAULT: {:?}", b.hw.calls);
    assert_eq!(b.subsystem().state(), StateId::Fault);

    b.command("STATUS");
    assert_eq!(b.lines(), ["lift/state fault_timeout"]);

    b.command("RESET");
    assert_eq!(b.subsystem().state(), StateId::Idle);
    assert_eq!(b.lines(), ["lift/state ready"]);
    assert_eq!(b.hw.take_calls(), [HwCall::Lock(true)]);
    assert!(!b.hw.track(), "track stays off away from the raised position");
}

#[test]
fn reset_at_raised_limit_restores_track_power() {
    let mut b = lowered();
    b.hw.sensors.limit_bottom = false;
    b.command("RAISE");
    b.cycle_until(400, |b| b.subsystem().state() == StateId::Fault);
    b.hw.take_calls();

    b.hw.sensors.limit_top = true;
    b.command("RESET");
    assert_eq!(
        b.hw.take_calls(),
        [HwCall::Lock(true), HwCall::TrackPower(true)]
    );
}

#[test]
fn status_replays_last_state_without_actuation() {
    let mut b = lowered();
    b.command("STATUS");
    assert_eq!(b.lines(), ["lift/state lowered"]);
    assert!(b.hw.calls.is_empty());
}
