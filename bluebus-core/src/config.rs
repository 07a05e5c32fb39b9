//! Bus configuration
//!
//! Policies the hardware leaves undefined are explicit settings here rather
//! than baked-in guesses.

use bluebus_hal::I2cConfig;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default source clock (SMCLK after reset on the FR5994)
pub const DEFAULT_SOURCE_CLOCK_HZ: u32 = 1_000_000;

/// What to do when the master clocks a byte out of us and there is none
///
/// Applies after `on_request` has run and the transmit queue is still empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnderrunPolicy {
    /// Leave the transmit buffer untouched; the peripheral stretches SCL
    /// until a byte is written
    #[default]
    Stretch,
    /// Write this filler byte
    Pad(u8),
}

/// Bound on foreground spin-waits for bus hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SpinLimit {
    /// Wait until the condition holds, however long that takes
    #[default]
    Unbounded,
    /// Give up with `BusError::Busy` after this many status polls
    Polls(u32),
}

impl SpinLimit {
    /// Poll `done` until it returns true or the limit expires
    ///
    /// Returns whether the condition was met.
    pub fn wait(self, mut done: impl FnMut() -> bool) -> bool {
        match self {
            SpinLimit::Unbounded => {
                while !done() {
                    core::hint::spin_loop();
                }
                true
            }
            SpinLimit::Polls(limit) => {
                for _ in 0..limit {
                    if done() {
                        return true;
                    }
                    core::hint::spin_loop();
                }
                false
            }
        }
    }
}

/// Per-bus configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BusConfig {
    /// SCL frequency when acting as master
    pub i2c: I2cConfig,
    /// Frequency of the clock feeding the bit-rate divider
    pub source_clock_hz: u32,
    /// Transmit underrun behaviour
    pub underrun: UnderrunPolicy,
    /// Spin-wait bound for master start/stop
    pub spin: SpinLimit,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            i2c: I2cConfig::STANDARD,
            source_clock_hz: DEFAULT_SOURCE_CLOCK_HZ,
            underrun: UnderrunPolicy::Stretch,
            spin: SpinLimit::Unbounded,
        }
    }
}

impl BusConfig {
    /// Bit-rate divider for the configured clocks
    pub fn divider(&self) -> u16 {
        self.i2c.divider(self.source_clock_hz)
    }
}
