use davis_anemometer::anemometer::wind_speed_kmh;
use davis_anemometer::sim::{CupRotor, SimulatedReedSwitch, SimulatedTimer, SimulatedVane};
use davis_anemometer::{AnemometerDriver, ElapsedTimer, Error, StdTimer};
use std::thread;
use std::time::Duration;

fn simulated() -> (
    SimulatedVane,
    SimulatedReedSwitch,
    SimulatedTimer,
    AnemometerDriver<SimulatedVane, SimulatedReedSwitch, SimulatedTimer>,
) {
    let vane = SimulatedVane::new(0.0);
    let reed_switch = SimulatedReedSwitch::new();
    let timer = SimulatedTimer::new();
    let anemometer = AnemometerDriver::new(vane.clone(), reed_switch.clone(), timer.clone());
    (vane, reed_switch, timer, anemometer)
}

#[test]
fn speed_matches_pulse_rate_for_many_windows() {
    let (_vane, reed_switch, timer, mut anemometer) = simulated();
    anemometer.enable().unwrap();

    for (pulses, window_ms) in [(0u32, 3000u64), (1, 1000), (12, 3000), (250, 2500), (37, 7400)] {
        reed_switch.pulses(pulses);
        timer.advance(Duration::from_millis(window_ms));

        let expected = pulses as f32 * (2.25 / (window_ms as f32 / 1000.0)) * 1.609;
        let speed = anemometer.read_wind_speed();
        assert!(
            (speed - expected).abs() <= expected * 1e-5 + 1e-6,
            "{} pulses in {} ms: expected {} got {}",
            pulses,
            window_ms,
            expected,
            speed
        );
    }
}

#[test]
fn rotor_round_trip_through_driver() {
    let (_vane, reed_switch, timer, mut anemometer) = simulated();
    anemometer.enable().unwrap();

    let rotor = CupRotor::new(36.2);
    rotor.spin(&reed_switch, &timer, Duration::from_secs(30));

    let speed = anemometer.read_wind_speed();
    // one pulse of quantization over 30 s
    assert!((speed - 36.2).abs() < wind_speed_kmh(1, 30_000));
}

#[test]
fn vane_sweep_covers_compass() {
    let (vane, _reed_switch, _timer, mut anemometer) = simulated();

    for degrees in 0..360u16 {
        vane.set_heading(degrees as f32);
        assert_eq!(anemometer.read_wind_direction().unwrap(), degrees);
    }
}

#[test]
fn pulses_while_disabled_are_never_counted() {
    let (_vane, reed_switch, timer, mut anemometer) = simulated();

    reed_switch.pulses(20);
    anemometer.enable().unwrap();
    assert_eq!(anemometer.pending_pulses(), 0);

    reed_switch.pulses(5);
    anemometer.disable().unwrap();
    reed_switch.pulses(5);
    anemometer.enable().unwrap();

    timer.advance(Duration::from_secs(2));
    assert_eq!(anemometer.read_wind_speed(), 0.0);
}

#[test]
fn fail_fast_read_after_consumed_window() {
    let (_vane, reed_switch, timer, mut anemometer) = simulated();
    anemometer.enable().unwrap();

    reed_switch.pulses(6);
    timer.advance(Duration::from_secs(3));
    assert!(anemometer.try_read_wind_speed().is_ok());

    let err = anemometer.try_read_wind_speed().unwrap_err();
    assert_eq!(err, Error::SamplingWindowTooShort { elapsed_ms: 0 });
    assert_eq!(
        err.to_string(),
        "Sampling window of 0 ms is too short for a wind speed reading"
    );
}

#[test]
fn concurrent_pulses_are_not_lost() {
    const DELIVERED: u64 = 100_000;

    let (_vane, reed_switch, timer, mut anemometer) = simulated();
    anemometer.enable().unwrap();

    let cups = {
        let reed_switch = reed_switch.clone();
        thread::spawn(move || {
            for _ in 0..DELIVERED {
                reed_switch.pulse();
            }
        })
    };

    // every window is 1 s long, so km/h maps straight back to a pulse count
    let pulses_in_window = |speed: f32| (speed / (2.25 * 1.609)).round() as u64;
    let mut counted = 0u64;
    while !cups.is_finished() {
        timer.advance(Duration::from_secs(1));
        counted += pulses_in_window(anemometer.read_wind_speed());
    }
    cups.join().unwrap();

    timer.advance(Duration::from_secs(1));
    counted += pulses_in_window(anemometer.read_wind_speed());
    assert_eq!(counted, DELIVERED);

    let (_vane, reed_switch, timer) = anemometer.release().unwrap();
    assert!(!reed_switch.is_armed());
    assert!(!timer.is_running());
}

#[test]
fn real_clock_window() {
    let reed_switch = SimulatedReedSwitch::new();
    let mut anemometer =
        AnemometerDriver::new(SimulatedVane::new(0.0), reed_switch.clone(), StdTimer::new());
    anemometer.enable().unwrap();

    reed_switch.pulses(4);
    thread::sleep(Duration::from_millis(50));

    let elapsed_ms = anemometer.elapsed().as_millis() as u64;
    assert!(elapsed_ms >= 50);
    let speed = anemometer.read_wind_speed();
    assert!(speed.is_finite());
    assert!(speed > 0.0);
    assert!(speed <= wind_speed_kmh(4, 50));

    let (_vane, _reed_switch, timer) = anemometer.release().unwrap();
    assert!(timer.elapsed_ms() < 50);
}
