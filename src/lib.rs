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
//! Driver for Davis style cup-and-vane anemometers.
//!
//! Wind speed comes from a reed switch closing once per cup revolution; the
//! driver counts falling edges from interrupt context and converts the count
//! over the elapsed sampling window to km/h. Wind direction comes from the
//! vane potentiometer read through an ADC and is scaled to a compass heading.
//!
//! The peripherals are injected through the traits in [`peripherals`], so the
//! same driver runs against a real HAL or the simulated hardware in [`sim`].
//!
//! ```
//! use davis_anemometer::sim::{SimulatedReedSwitch, SimulatedTimer, SimulatedVane};
//! use davis_anemometer::AnemometerDriver;
//! use std::time::Duration;
//!
//! let vane = SimulatedVane::new(0.5);
//! let reed_switch = SimulatedReedSwitch::new();
//! let timer = SimulatedTimer::new();
//! let mut anemometer = AnemometerDriver::new(vane, reed_switch.clone(), timer.clone());
//!
//! anemometer.enable()?;
//! reed_switch.pulses(10);
//! timer.advance(Duration::from_secs(4));
//!
//! assert_eq!(anemometer.read_wind_direction()?, 180);
//! assert!((anemometer.read_wind_speed() - 9.05).abs() < 0.01);
//! # Ok::<(), davis_anemometer::Error>(())
//! ```

pub mod anemometer;
pub mod errors;
pub mod global_settings;
pub mod peripherals;
pub mod sim;

pub use anemometer::AnemometerDriver;
pub use errors::Error;
pub use peripherals::{AnalogInput, EdgeInterrupt, ElapsedTimer, OneShotAnalog, StdTimer};
