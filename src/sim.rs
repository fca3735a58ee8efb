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
//! Simulated anemometer hardware.
//!
//! Every simulated peripheral is a cheap cloneable handle: hand one clone to
//! the driver and keep another to move the vane, spin the cups or advance
//! time.

use crate::errors::Error;
use crate::global_settings::{MPH_TO_KMH, SPEED_CALIBRATION_MPH_PER_HZ};
use crate::peripherals::{AnalogInput, EdgeInterrupt, ElapsedTimer};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

type PulseHandler = Box<dyn Fn() + Send + 'static>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Default)]
struct VaneState {
    position: f32,
    faulty: bool,
}

/// Wind vane potentiometer with a settable position.
#[derive(Clone, Debug, Default)]
pub struct SimulatedVane {
    state: Arc<Mutex<VaneState>>,
}

impl SimulatedVane {
    pub fn new(position: f32) -> Self {
        let vane = Self::default();
        vane.set_position(position);
        vane
    }

    /// Sets the normalized potentiometer position.
    pub fn set_position(&self, position: f32) {
        lock(&self.state).position = position;
    }

    pub fn set_heading(&self, degrees: f32) {
        self.set_position(degrees / 360.0);
    }

    /// While faulty every read fails like a broken ADC conversion.
    pub fn set_faulty(&self, faulty: bool) {
        lock(&self.state).faulty = faulty;
    }
}

impl AnalogInput for SimulatedVane {
    fn read_normalized(&mut self) -> Result<f32, Error> {
        let state = lock(&self.state);
        if state.faulty {
            return Err(Error::AdcRead);
        }
        Ok(state.position)
    }
}

#[derive(Default)]
struct ReedSwitchState {
    handler: Option<PulseHandler>,
    faulty: bool,
}

/// Reed switch input. Pulses only reach the driver while a handler is
/// subscribed, the same as a disarmed interrupt line.
#[derive(Clone, Default)]
pub struct SimulatedReedSwitch {
    state: Arc<Mutex<ReedSwitchState>>,
}

impl SimulatedReedSwitch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        lock(&self.state).handler.is_some()
    }

    /// While faulty the interrupt controller refuses both subscribing and
    /// unsubscribing. An already subscribed handler keeps firing.
    pub fn set_faulty(&self, faulty: bool) {
        lock(&self.state).faulty = faulty;
    }

    /// One falling edge.
    pub fn pulse(&self) {
        if let Some(handler) = lock(&self.state).handler.as_ref() {
            handler();
        }
    }

    pub fn pulses(&self, count: u32) {
        for _ in 0..count {
            self.pulse();
        }
    }
}

impl EdgeInterrupt for SimulatedReedSwitch {
    fn subscribe_falling_edge<F>(&mut self, handler: F) -> Result<(), Error>
    where
        F: Fn() + Send + 'static,
    {
        let mut state = lock(&self.state);
        if state.faulty {
            return Err(Error::InterruptSubscribe);
        }
        state.handler = Some(Box::new(handler));
        Ok(())
    }

    fn unsubscribe(&mut self) -> Result<(), Error> {
        let mut state = lock(&self.state);
        if state.faulty {
            return Err(Error::InterruptUnsubscribe);
        }
        state.handler = None;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct ClockState {
    running: bool,
    elapsed: Duration,
}

/// Manually driven elapsed time counter.
#[derive(Clone, Debug, Default)]
pub struct SimulatedTimer {
    clock: Arc<Mutex<ClockState>>,
}

impl SimulatedTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        lock(&self.clock).running
    }

    /// Moves simulated time forward. A stopped timer does not count.
    pub fn advance(&self, by: Duration) {
        let mut clock = lock(&self.clock);
        if clock.running {
            clock.elapsed += by;
        }
    }
}

impl ElapsedTimer for SimulatedTimer {
    fn start(&mut self) {
        lock(&self.clock).running = true;
    }

    fn stop(&mut self) {
        lock(&self.clock).running = false;
    }

    fn reset(&mut self) {
        lock(&self.clock).elapsed = Duration::ZERO;
    }

    fn elapsed_ms(&self) -> u64 {
        lock(&self.clock).elapsed.as_millis() as u64
    }
}

/// Cup assembly turning at a constant wind speed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CupRotor {
    speed_kmh: f32,
}

impl CupRotor {
    pub fn new(speed_kmh: f32) -> Self {
        CupRotor {
            speed_kmh: speed_kmh.max(0.0),
        }
    }

    pub fn speed_kmh(&self) -> f32 {
        self.speed_kmh
    }

    /// Reed switch closures per second at this wind speed.
    pub fn pulse_frequency_hz(&self) -> f32 {
        self.speed_kmh / MPH_TO_KMH / SPEED_CALIBRATION_MPH_PER_HZ
    }

    /// Time between two pulses, `None` when the cups stand still or turn
    /// too slowly for the period to fit a `Duration`.
    pub fn pulse_period(&self) -> Option<Duration> {
        let hz = self.pulse_frequency_hz();
        if hz > 0.0 {
            Duration::try_from_secs_f32(1.0 / hz).ok()
        } else {
            None
        }
    }

    /// Whole pulses delivered during `window`.
    pub fn pulses_in(&self, window: Duration) -> u32 {
        (self.pulse_frequency_hz() * window.as_secs_f32()).round() as u32
    }

    /// Spins the cups for `window`: fires the pulses and advances the timer.
    pub fn spin(
        &self,
        reed_switch: &SimulatedReedSwitch,
        timer: &SimulatedTimer,
        window: Duration,
    ) {
        reed_switch.pulses(self.pulses_in(window));
        timer.advance(window);
    }
}
