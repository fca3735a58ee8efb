use std::time::Duration;

// Davis calibration: 1 pulse per second equals 2.25 mph
pub const SPEED_CALIBRATION_MPH_PER_HZ: f32 = 2.25;
pub const MPH_TO_KMH: f32 = 1.609;
pub const DEGREES_PER_REVOLUTION: f32 = 360.0;
// Interval between wind speed readings the sensor needs to be accurate
pub const RECOMMENDED_SAMPLING_INTERVAL: Duration = Duration::from_secs(3);
// Shortest window try_read_wind_speed accepts [ms]
pub const MIN_SAMPLING_WINDOW_MS: u64 = 1;
