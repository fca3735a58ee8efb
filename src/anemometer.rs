/*
 * Davis Anemometer Driver
 *
 * MIT license
 *
 * Copyright (c) 2021-2023 Michael Zill
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 *
 * Apache license, Version 2.0
 *
 * Copyright (c) 2021-2023 Michael Zill
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */
use crate::errors::Error;
use crate::global_settings::*;
use crate::peripherals::{AnalogInput, EdgeInterrupt, ElapsedTimer};
use log::{debug, warn};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Driver for a cup-and-vane anemometer.
///
/// Wind speed is measured by counting reed switch pulses over a sampling
/// window, wind direction by reading the vane potentiometer. The pulse
/// count and the window timer are only ever reset together.
pub struct AnemometerDriver<D, S, T>
where
    D: AnalogInput,
    S: EdgeInterrupt,
    T: ElapsedTimer,
{
    direction: D,
    speed: S,
    timer: T,
    pulses: Arc<AtomicU32>,
    enabled: bool,
}

impl<D, S, T> AnemometerDriver<D, S, T>
where
    D: AnalogInput,
    S: EdgeInterrupt,
    T: ElapsedTimer,
{
    /// Binds the driver to its peripherals. No I/O happens until `enable`.
    pub fn new(direction: D, speed: S, timer: T) -> Self {
        AnemometerDriver {
            direction,
            speed,
            timer,
            pulses: Arc::new(AtomicU32::new(0)),
            enabled: false,
        }
    }

    /// Arms pulse counting and starts a fresh sampling window.
    ///
    /// Calling this while enabled re-arms the interrupt and discards the
    /// window in flight.
    pub fn enable(&mut self) -> Result<(), Error> {
        let pulses = Arc::clone(&self.pulses);
        self.speed.subscribe_falling_edge(move || count_pulse(&pulses))?;

        critical_section::with(|_| {
            self.timer.start();
            self.timer.reset();
            self.pulses.store(0, Ordering::Relaxed);
        });
        self.enabled = true;

        debug!("anemometer enabled");
        Ok(())
    }

    /// Disarms pulse counting. Does nothing when already disabled.
    pub fn disable(&mut self) -> Result<(), Error> {
        if !self.enabled {
            return Ok(());
        }

        self.speed.unsubscribe()?;

        critical_section::with(|_| {
            self.timer.stop();
            self.pulses.store(0, Ordering::Relaxed);
        });
        self.enabled = false;

        debug!("anemometer disabled");
        Ok(())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Wind direction in degrees clockwise from the vane's reference mark,
    /// in `0..360`.
    pub fn read_wind_direction(&mut self) -> Result<u16, Error> {
        let position = self.direction.read_normalized()?;
        Ok(heading_from_position(position))
    }

    /// Wind speed in km/h over the window since the last reading.
    ///
    /// Every call starts a new window, so calls must be spaced out (about
    /// `RECOMMENDED_SAMPLING_INTERVAL`). A zero length window yields `NaN`
    /// or infinity; use `try_read_wind_speed` to reject it instead.
    pub fn read_wind_speed(&mut self) -> f32 {
        let (elapsed_ms, count) = self.take_window();
        if elapsed_ms == 0 {
            warn!("wind speed sampled over an empty window ({} pulses)", count);
        }

        let speed = wind_speed_kmh(count, elapsed_ms);
        debug!(
            "wind speed {:.2} km/h ({} pulses in {} ms)",
            speed, count, elapsed_ms
        );
        speed
    }

    /// Like `read_wind_speed`, but refuses windows shorter than
    /// `MIN_SAMPLING_WINDOW_MS`. A refused window keeps accumulating.
    pub fn try_read_wind_speed(&mut self) -> Result<f32, Error> {
        let elapsed_ms = self.timer.elapsed_ms();
        if elapsed_ms < MIN_SAMPLING_WINDOW_MS {
            return Err(Error::SamplingWindowTooShort { elapsed_ms });
        }

        Ok(self.read_wind_speed())
    }

    /// Pulses counted in the current window, without consuming it.
    pub fn pending_pulses(&self) -> u32 {
        self.pulses.load(Ordering::Relaxed)
    }

    /// Length of the current window.
    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.timer.elapsed_ms())
    }

    /// Disables the driver and hands back its peripherals.
    pub fn release(mut self) -> Result<(D, S, T), Error> {
        self.disable()?;
        Ok((self.direction, self.speed, self.timer))
    }

    fn take_window(&mut self) -> (u64, u32) {
        critical_section::with(|_| {
            let elapsed_ms = self.timer.elapsed_ms();
            let count = self.pulses.swap(0, Ordering::Relaxed);
            self.timer.reset();
            (elapsed_ms, count)
        })
    }
}

// runs in interrupt context
fn count_pulse(pulses: &AtomicU32) {
    pulses.fetch_add(1, Ordering::Relaxed);
}

/// Scales a normalized vane position to a heading, rounding to the nearest
/// degree. 360 wraps to 0, so positions above about 0.99861 read as 0 where
/// truncating the scaled value would give 359.
pub fn heading_from_position(position: f32) -> u16 {
    let position = if position.is_nan() {
        0.0
    } else {
        position.clamp(0.0, 1.0)
    };

    ((position * DEGREES_PER_REVOLUTION).round() as u16) % 360
}

/// Davis conversion: each pulse per second is 2.25 mph.
pub fn wind_speed_kmh(pulses: u32, elapsed_ms: u64) -> f32 {
    let elapsed_s = elapsed_ms as f32 / 1000.0;
    pulses as f32 * (SPEED_CALIBRATION_MPH_PER_HZ / elapsed_s) * MPH_TO_KMH
}
