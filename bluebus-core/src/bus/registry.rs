//! Peripheral ownership and interrupt-safe driver storage
//!
//! Each physical bus may back at most one driver. [`BusRegistry`] enforces
//! that by handing out a single [`Peripheral`] token per bus, and
//! [`BusSlot`] is where the interrupt vector finds the driver for its bus.

use core::cell::RefCell;

use bluebus_hal::{BusIndex, I2cRegisters};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use portable_atomic::{AtomicU8, Ordering};

use super::driver::BusDriver;
use super::handler::BusHandler;

/// Proof of exclusive ownership of one physical bus
///
/// Not `Clone`: the only way to get one is [`BusRegistry::take`].
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Peripheral {
    bus: BusIndex,
}

impl Peripheral {
    pub fn bus(&self) -> BusIndex {
        self.bus
    }
}

/// Hands out one [`Peripheral`] per bus
pub struct BusRegistry {
    claimed: AtomicU8,
}

impl Default for BusRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BusRegistry {
    pub const fn new() -> Self {
        Self {
            claimed: AtomicU8::new(0),
        }
    }

    /// Claim a bus
    ///
    /// Returns `None` if the bus was already claimed.
    pub fn take(&self, bus: BusIndex) -> Option<Peripheral> {
        let bit = 1u8 << bus.index();
        let previous = self.claimed.fetch_or(bit, Ordering::AcqRel);
        if previous & bit != 0 {
            #[cfg(feature = "defmt")]
            defmt::warn!("{} already claimed", bus);
            return None;
        }
        Some(Peripheral { bus })
    }

    /// Whether a bus has been claimed
    pub fn is_claimed(&self, bus: BusIndex) -> bool {
        self.claimed.load(Ordering::Acquire) & (1 << bus.index()) != 0
    }
}

/// Driver storage shared between foreground code and one interrupt vector
pub struct BusSlot<R, H> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Option<BusDriver<R, H>>>>,
}

impl<R, H> Default for BusSlot<R, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, H> BusSlot<R, H> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Store a driver
    ///
    /// Hands the driver back if the slot is already occupied.
    pub fn install(&self, driver: BusDriver<R, H>) -> Result<(), BusDriver<R, H>> {
        self.inner.lock(|cell| {
            match cell.try_borrow_mut() {
                Ok(mut slot) if slot.is_none() => {
                    *slot = Some(driver);
                    Ok(())
                }
                _ => Err(driver),
            }
        })
    }

    /// Run `f` on the installed driver with interrupts masked
    ///
    /// Returns `None` if nothing is installed or the slot is already in use
    /// further up the call stack.
    pub fn lock<U>(&self, f: impl FnOnce(&mut BusDriver<R, H>) -> U) -> Option<U> {
        self.inner.lock(|cell| {
            let mut slot = cell.try_borrow_mut().ok()?;
            slot.as_mut().map(f)
        })
    }

    pub fn is_installed(&self) -> bool {
        self.inner
            .lock(|cell| cell.try_borrow().map(|slot| slot.is_some()).unwrap_or(true))
    }
}

impl<R: I2cRegisters, H: BusHandler> BusSlot<R, H> {
    /// Interrupt vector body: service one pending event
    pub fn on_interrupt(&self) {
        self.lock(|driver| driver.isr_dispatch());
    }
}
