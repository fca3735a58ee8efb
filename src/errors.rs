use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    AdcRead,
    InterruptSubscribe,
    InterruptUnsubscribe,
    SamplingWindowTooShort { elapsed_ms: u64 },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdcRead => write!(f, "Failed to read the wind vane ADC channel"),
            Self::InterruptSubscribe => {
                write!(f, "Failed to subscribe the reed switch edge interrupt")
            }
            Self::InterruptUnsubscribe => {
                write!(f, "Failed to unsubscribe the reed switch edge interrupt")
            }
            Self::SamplingWindowTooShort { elapsed_ms } => write!(
                f,
                "Sampling window of {} ms is too short for a wind speed reading",
                elapsed_ms
            ),
        }
    }
}

impl std::error::Error for Error {}
