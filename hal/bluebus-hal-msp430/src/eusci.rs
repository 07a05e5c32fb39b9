//! eUSCI_B register blocks for MSP430FR5994
//!
//! Provides volatile access to the four eUSCI_B peripherals in I2C mode.

use core::ptr;

use bluebus_hal::gpio::{I2cPins, PinFunction};
use bluebus_hal::i2c::{BusIndex, I2cRegisters, Reg};

/// Base addresses of eUSCI_B0..B3
pub const EUSCI_B_BASE: [usize; BusIndex::COUNT] = [0x0640, 0x0680, 0x06C0, 0x0700];

/// SDA/SCL pin assignment per bus
///
/// See the pin function tables in the MSP430FR599x datasheet.
pub const I2C_PINS: [I2cPins; BusIndex::COUNT] = [
    I2cPins::new(1, 6, 7, PinFunction::Secondary), // B0: P1.6 / P1.7
    I2cPins::new(5, 0, 1, PinFunction::Primary),   // B1: P5.0 / P5.1
    I2cPins::new(7, 0, 1, PinFunction::Primary),   // B2: P7.0 / P7.1
    I2cPins::new(6, 4, 5, PinFunction::Primary),   // B3: P6.4 / P6.5
];

/// One memory-mapped eUSCI_B register block
#[derive(Debug)]
pub struct UcbRegisters {
    bus: BusIndex,
    base: usize,
}

impl UcbRegisters {
    /// Take the register block of `bus`
    ///
    /// # Safety
    ///
    /// At most one `UcbRegisters` may exist per bus, and the program must be
    /// running on an MSP430FR5994 where these addresses are the eUSCI_B blocks.
    pub unsafe fn new(bus: BusIndex) -> Self {
        Self {
            bus,
            base: EUSCI_B_BASE[bus.index()],
        }
    }

    fn address(&self, reg: Reg) -> *mut u16 {
        (self.base + reg.offset()) as *mut u16
    }
}

impl I2cRegisters for UcbRegisters {
    fn read(&mut self, reg: Reg) -> u16 {
        // SAFETY: `new` guarantees `base` is a live eUSCI_B block and the
        // offset stays within it.
        unsafe { ptr::read_volatile(self.address(reg)) }
    }

    fn write(&mut self, reg: Reg, value: u16) {
        // SAFETY: see `read`.
        unsafe { ptr::write_volatile(self.address(reg), value) }
    }

    fn bus(&self) -> BusIndex {
        self.bus
    }

    fn pins(&self) -> I2cPins {
        I2C_PINS[self.bus.index()]
    }
}
