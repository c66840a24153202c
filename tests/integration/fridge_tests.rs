//! Fridge through the node loop: dispense outcomes and the environmental
//! loop against the simulated cabinet.

use kitt::app::ports::{ClimateReading, TimePort};
use kitt::config::FridgeConfig;
use kitt::control::psychrometrics::dew_point_c;
use kitt::fridge::{DispenseState, FridgeController};
use kitt::sensors::cabinet::{CabinetModel, SimulatedCabinet};
use kitt::tick::Tick;

use crate::mock_hw::{Bench, HwCall};

const POLL_MS: u32 = 1_000;

fn bench() -> Bench<FridgeController> {
    let mut b = Bench::new(FridgeController::new(FridgeConfig::default()), POLL_MS);
    assert_eq!(b.lines(), ["fridge/status ready"]);
    assert_eq!(
        b.hw.take_calls(),
        [HwCall::Dispenser(false), HwCall::Cooling(false), HwCall::Fan(false)]
    );
    b
}

#[test]
fn dispense_with_door_open_is_refused() {
    let mut b = bench();
    b.command("DISPENSE");
    assert_eq!(b.lines(), ["fridge/status error_door_open"]);
    assert!(b.hw.calls.is_empty());
}

#[test]
fn confirmed_dispense_holds_then_reports_done() {
    let mut b = bench();
    b.hw.sensors.door_closed = true;
    b.hw.confirm_on_dispense = true;
    b.command("DISPENSE");
    assert_eq!(
        b.hw.take_calls(),
        [HwCall::Dispenser(true), HwCall::Delay(2_000), HwCall::Dispenser(false)]
    );
    assert_eq!(b.lines(), ["fridge/status dispensing", "fridge/status done"]);
    // The hold blocked the cycle for the full dispense time.
    assert_eq!(b.clock.now(), Tick(2_000 + POLL_MS));
    assert_eq!(b.subsystem().dispense_state(), DispenseState::Idle);
}

#[test]
fn unconfirmed_dispense_times_out_and_releases() {
    let mut b = bench();
    b.hw.sensors.door_closed = true;
    b.command("DISPENSE");
    assert_eq!(
        b.lines(),
        ["fridge/status dispensing", "fridge/status error_dispense_timeout"]
    );
    assert!(!b.hw.dispenser());
}

#[test]
fn status_includes_latest_environment() {
    let mut b = bench();
    b.hw.climate = Some(ClimateReading {
        temperature_c: 4.0,
        humidity_pct: 60.0,
    });
    b.cycle();
    let first = b.lines();
    assert!(first[0].starts_with("fridge/telemetry temp_c=4.00 humidity=60.00 dewpoint_c="));
    // In band: cooling stays off.  Dry air: fan on.
    assert_eq!(first[1], "fridge/outputs peltier=off fan=on");

    b.command("STATUS");
    let status = b.lines();
    assert_eq!(status[0], "fridge/status ready");
    assert!(status[1].starts_with("fridge/telemetry temp_c=4.00"));
}

#[test]
fn unchanged_outputs_are_not_rewritten() {
    let mut b = bench();
    b.hw.climate = Some(ClimateReading {
        temperature_c: 8.0,
        humidity_pct: 40.0,
    });
    b.cycles(5);
    assert_eq!(b.hw.take_calls(), [HwCall::Cooling(true), HwCall::Fan(true)]);
    let outputs = b
        .lines()
        .iter()
        .filter(|l| l.starts_with("fridge/outputs"))
        .count();
    assert_eq!(outputs, 1);
}

#[test]
fn cabinet_settles_into_the_hysteresis_band() {
    let mut b = bench();
    b.hw.cabinet = Some(SimulatedCabinet::new(CabinetModel::default()));

    let mut temps = Vec::new();
    for _ in 0..300 {
        b.cycle();
        let env = *b.subsystem().environment();
        temps.push(env.temperature_c);

        let spread = env.temperature_c - dew_point_c(env.temperature_c, env.humidity_pct);
        assert_eq!(env.fan_on, spread > 2.0);
        assert_eq!(b.hw.cooling(), env.peltier_on);
    }

    assert!(temps[0] > 20.0);
    for t in &temps[120..] {
        assert!((2.0..=6.0).contains(t), "cabinet left the band: {t}");
    }

    let switch_ons = b
        .hw
        .calls
        .iter()
        .filter(|c| **c == HwCall::Cooling(true))
        .count();
    assert!(switch_ons >= 3, "cooling never cycled");
    assert!(b.lines().iter().any(|l| l.starts_with("fridge/outputs peltier=off")));
}
