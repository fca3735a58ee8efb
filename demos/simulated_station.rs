use davis_anemometer::global_settings::RECOMMENDED_SAMPLING_INTERVAL;
use davis_anemometer::sim::{CupRotor, SimulatedReedSwitch, SimulatedVane};
use davis_anemometer::{AnemometerDriver, StdTimer};
use log::info;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[toml_cfg::toml_config]
pub struct Config {
    #[default(3000)]
    sample_interval_ms: u64,
    #[default(5)]
    samples: u32,
    #[default(14)]
    wind_speed_kmh: u32,
    #[default(225)]
    wind_heading_deg: u32,
}

// Feeds reed switch pulses at the rotor's rate until told to stop
fn spin_cups(
    rotor: CupRotor,
    reed_switch: SimulatedReedSwitch,
    running: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let Some(period) = rotor.pulse_period() else {
            return;
        };
        while running.load(Ordering::Relaxed) {
            thread::sleep(period);
            reed_switch.pulse();
        }
    })
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let interval = Duration::from_millis(CONFIG.sample_interval_ms);
    if interval < RECOMMENDED_SAMPLING_INTERVAL {
        log::warn!(
            "sampling every {} ms, readings below {} ms are noisy",
            CONFIG.sample_interval_ms,
            RECOMMENDED_SAMPLING_INTERVAL.as_millis()
        );
    }
    if CONFIG.samples == 0 {
        anyhow::bail!("samples must be at least 1")
    }

    let vane = SimulatedVane::default();
    vane.set_heading(CONFIG.wind_heading_deg as f32);
    let reed_switch = SimulatedReedSwitch::new();
    let rotor = CupRotor::new(CONFIG.wind_speed_kmh as f32);

    let mut anemometer = AnemometerDriver::new(vane, reed_switch.clone(), StdTimer::new());
    anemometer.enable()?;

    let running = Arc::new(AtomicBool::new(true));
    let cups = spin_cups(rotor, reed_switch, Arc::clone(&running));

    info!(
        "simulating {} km/h from {} deg, sampling every {} ms",
        rotor.speed_kmh(),
        CONFIG.wind_heading_deg,
        CONFIG.sample_interval_ms
    );

    for sample in 1..=CONFIG.samples {
        thread::sleep(interval);
        let speed = anemometer.try_read_wind_speed()?;
        let direction = anemometer.read_wind_direction()?;
        info!("sample {}: {:.1} km/h from {} deg", sample, speed, direction);
    }

    running.store(false, Ordering::Relaxed);
    if cups.join().is_err() {
        anyhow::bail!("cup simulator thread panicked")
    }
    anemometer.disable()?;

    Ok(())
}
