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
//! Capability traits for the three peripherals the anemometer driver owns,
//! plus adapters for `embedded-hal` ADCs and the host clock.

use crate::errors::Error;
use core::marker::PhantomData;
use embedded_hal::adc::{Channel, OneShot};
use std::time::{Duration, Instant};

/// Analog source for the wind vane potentiometer.
pub trait AnalogInput {
    /// Returns the current reading normalized to `[0.0, 1.0)`.
    fn read_normalized(&mut self) -> Result<f32, Error>;
}

/// Digital input able to call a handler on falling edges of the reed switch.
pub trait EdgeInterrupt {
    /// Registers `handler` for falling edges, replacing any previously
    /// subscribed handler. The handler runs in interrupt context.
    fn subscribe_falling_edge<F>(&mut self, handler: F) -> Result<(), Error>
    where
        F: Fn() + Send + 'static;

    /// Removes the handler. No further edges are delivered afterwards.
    fn unsubscribe(&mut self) -> Result<(), Error>;
}

/// Monotonic elapsed time counter with millisecond resolution.
///
/// `reset` zeroes the counter without changing whether it is running.
pub trait ElapsedTimer {
    fn start(&mut self);
    fn stop(&mut self);
    fn reset(&mut self);
    fn elapsed_ms(&self) -> u64;
}

/// Wind vane read through an `embedded-hal` one-shot ADC channel.
///
/// Raw samples are divided by `2^resolution_bits`, so a full scale reading
/// never reaches 1.0.
pub struct OneShotAnalog<A, ADC, Word, PIN>
where
    PIN: Channel<ADC>,
    A: OneShot<ADC, Word, PIN>,
{
    adc: A,
    pin: PIN,
    full_scale: f32,
    _marker: PhantomData<(ADC, Word)>,
}

impl<A, ADC, Word, PIN> OneShotAnalog<A, ADC, Word, PIN>
where
    PIN: Channel<ADC>,
    A: OneShot<ADC, Word, PIN>,
    Word: Into<u32>,
{
    pub fn new(adc: A, pin: PIN, resolution_bits: u8) -> Self {
        OneShotAnalog {
            adc,
            pin,
            full_scale: (1u64 << resolution_bits.min(32)) as f32,
            _marker: PhantomData,
        }
    }

    pub fn release(self) -> (A, PIN) {
        (self.adc, self.pin)
    }
}

impl<A, ADC, Word, PIN> AnalogInput for OneShotAnalog<A, ADC, Word, PIN>
where
    PIN: Channel<ADC>,
    A: OneShot<ADC, Word, PIN>,
    Word: Into<u32>,
{
    fn read_normalized(&mut self) -> Result<f32, Error> {
        let raw: u32 = nb::block!(self.adc.read(&mut self.pin))
            .map_err(|_| Error::AdcRead)?
            .into();

        Ok(raw as f32 / self.full_scale)
    }
}

/// `ElapsedTimer` backed by `std::time::Instant`.
#[derive(Debug, Default)]
pub struct StdTimer {
    running_since: Option<Instant>,
    accumulated: Duration,
}

impl StdTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }
}

impl ElapsedTimer for StdTimer {
    fn start(&mut self) {
        if self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
    }

    fn stop(&mut self) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += since.elapsed();
        }
    }

    fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
        if self.running_since.is_some() {
            self.running_since = Some(Instant::now());
        }
    }

    fn elapsed_ms(&self) -> u64 {
        let running = self
            .running_since
            .map(|since| since.elapsed())
            .unwrap_or_default();

        (self.accumulated + running).as_millis() as u64
    }
}
