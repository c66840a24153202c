//! Elevator through the node loop: dead reckoning, limit snapping,
//! stall detection and the emergency stop.

use kitt::config::ElevatorConfig;
use kitt::elevator::ElevatorController;
use kitt::fsm::context::MotorDrive;
use kitt::fsm::StateId;

use crate::mock_hw::{Bench, HwCall};

const POLL_MS: u32 = 50;

fn bench() -> Bench<ElevatorController> {
    let b = Bench::new(ElevatorController::new(&ElevatorConfig::default()), POLL_MS);
    assert_eq!(b.lines(), ["elevator/status ready", "elevator/position level=0"]);
    b
}

#[test]
fn climbs_by_dead_reckoning_and_snaps_to_top_limit() {
    let mut b = bench();
    b.command("LEVEL 2");
    assert_eq!(b.hw.motor(), MotorDrive::Forward);
    assert_eq!(b.lines(), ["elevator/status moving_up"]);

    // Motion started at 0 ms; polls at 50..=2950 ms stay on level 0.
    b.cycles(59);
    assert_eq!(b.subsystem().level(), 0);
    assert!(b.lines().is_empty());

    // One configured level interval (3000 ms) moves exactly one level.
    b.cycle();
    assert_eq!(b.subsystem().level(), 1);
    assert_eq!(b.lines(), ["elevator/position level=1"]);
    assert_eq!(b.subsystem().state(), StateId::MovingForward);

    b.hw.sensors.limit_top = true;
    b.cycle();
    assert_eq!(b.lines(), ["elevator/position level=2", "elevator/status idle"]);
    assert_eq!(b.hw.motor(), MotorDrive::Off);
    assert_eq!(b.subsystem().level(), 2);
}

#[test]
fn descends_one_level_by_dead_reckoning() {
    let mut b = Bench::boot(
        ElevatorController::new(&ElevatorConfig::default()),
        POLL_MS,
        0,
        |hw| hw.sensors.limit_top = true,
    );
    assert_eq!(b.subsystem().level(), 2);
    b.lines();

    b.command("DOWN");
    b.hw.sensors.limit_top = false;
    assert_eq!(b.hw.motor(), MotorDrive::Reverse);
    b.cycle_until(200, |b| b.subsystem().state() == StateId::Idle);
    assert_eq!(b.subsystem().level(), 1);
    assert_eq!(
        b.lines(),
        [
            "elevator/status moving_down",
            "elevator/position level=1",
            "elevator/status idle",
        ]
    );
}

#[test]
fn missing_top_limit_is_a_stall() {
    let mut b = bench();
    b.command("UP");
    b.command("LEVEL 2");
    b.cycle_until(400, |b| b.subsystem().state() != StateId::MovingForward);
    // UP targets level 1, which dead reckoning reaches.
    assert_eq!(b.subsystem().state(), StateId::Idle);
    b.lines();

    b.command("UP");
    b.cycle_until(400, |b| b.subsystem().state() != StateId::MovingForward);
    assert_eq!(b.subsystem().state(), StateId::Fault);
    assert_eq!(b.hw.motor(), MotorDrive::Off);
    assert_eq!(
        b.lines(),
        ["elevator/status moving_up", "elevator/status fault_stall"]
    );
}

#[test]
fn emergency_stop_overrides_motion_and_blocks_reset() {
    let mut b = bench();
    b.command("LEVEL 1");
    b.cycles(5);
    b.lines();

    b.hw.sensors.emergency_stop_asserted = true;
    b.cycle();
    assert_eq!(b.subsystem().state(), StateId::Fault);
    assert_eq!(b.hw.motor(), MotorDrive::Off);
    assert_eq!(b.lines(), ["elevator/status emergency_stop"]);

    b.hw.take_calls();
    b.command("UP");
    b.command("RESET");
    assert_eq!(b.subsystem().state(), StateId::Fault);
    assert_eq!(b.lines(), ["elevator/status emergency_stop"]);
    assert!(b.hw.calls.is_empty());

    b.hw.sensors.emergency_stop_asserted = false;
    b.hw.sensors.limit_bottom = true;
    b.command("RESET");
    assert_eq!(b.subsystem().state(), StateId::Idle);
    assert_eq!(b.lines(), ["elevator/status ready", "elevator/position level=0"]);
}

#[test]
fn requests_are_ignored_while_moving() {
    let mut b = bench();
    b.command("LEVEL 1");
    b.lines();
    b.hw.take_calls();
    b.command("LEVEL 2");
    b.command("DOWN");
    assert_eq!(b.subsystem().context().target_position, Some(1));
    assert!(b.lines().is_empty());
    assert!(!b.hw.calls.iter().any(|c| matches!(c, HwCall::Motor(_))));
}

#[test]
fn status_reports_state_and_position() {
    let mut b = bench();
    b.command("LEVEL 0");
    assert_eq!(b.lines(), ["elevator/status already_at_level"]);
    b.command("STATUS");
    assert_eq!(
        b.lines(),
        ["elevator/status already_at_level", "elevator/position level=0"]
    );
}

#[test]
fn stop_reports_position() {
    let mut b = bench();
    b.command("LEVEL 1");
    b.cycles(2);
    b.lines();
    b.command("STOP");
    assert_eq!(b.subsystem().state(), StateId::Idle);
    assert_eq!(b.lines(), ["elevator/status stopped", "elevator/position level=0"]);
}
