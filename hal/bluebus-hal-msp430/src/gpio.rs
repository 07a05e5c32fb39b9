//! Digital I/O port function selection for MSP430FR5994
//!
//! Odd ports sit at the base of each port pair; even ports share the pair's
//! registers one byte higher.

use core::ptr;

use bluebus_hal::gpio::{PinFunction, PinMux, SystemControl};

/// Base address of each port pair (P1/P2, P3/P4, ...)
const PORT_PAIR_BASE: [usize; 5] = [0x0200, 0x0220, 0x0240, 0x0260, 0x0280];

/// SEL0 offset within a port
const SEL0: usize = 0x0A;
/// SEL1 offset within a port
const SEL1: usize = 0x0C;

/// Power management control 0
const PM5CTL0: usize = 0x0130;
/// Lock I/O pin configuration upon entry/exit of LPMx.5
const LOCKLPM5: u16 = 0x0001;

/// Highest port number on the package
pub const MAX_PORT: u8 = 9;

/// Base address of a port, if it exists
pub fn port_base(port: u8) -> Option<usize> {
    if port == 0 || port > MAX_PORT {
        return None;
    }
    let pair = PORT_PAIR_BASE[((port - 1) / 2) as usize];
    let odd_offset = if port % 2 == 0 { 1 } else { 0 };
    Some(pair + odd_offset)
}

/// Owner of the digital I/O function registers
#[derive(Debug)]
pub struct Ports {
    _private: (),
}

impl Ports {
    /// Take the port registers
    ///
    /// # Safety
    ///
    /// At most one `Ports` may exist, and the program must be running on an
    /// MSP430FR5994.
    pub unsafe fn new() -> Self {
        Self { _private: () }
    }

    fn update(address: usize, mask: u8, set: bool) {
        let reg = address as *mut u8;
        // SAFETY: `address` is a SEL register of an existing port and `Ports`
        // is the only writer.
        unsafe {
            let value = ptr::read_volatile(reg);
            let value = if set { value | mask } else { value & !mask };
            ptr::write_volatile(reg, value);
        }
    }
}

impl PinMux for Ports {
    fn select(&mut self, port: u8, mask: u8, function: PinFunction) {
        let Some(base) = port_base(port) else {
            #[cfg(feature = "defmt")]
            defmt::warn!("no such port P{}", port);
            return;
        };
        Self::update(base + SEL0, mask, function.sel0());
        Self::update(base + SEL1, mask, function.sel1());
    }

    fn unlock(&mut self) {
        let reg = PM5CTL0 as *mut u16;
        // SAFETY: PM5CTL0 is a fixed system register owned through `Ports`.
        unsafe {
            let value = ptr::read_volatile(reg);
            ptr::write_volatile(reg, value & !LOCKLPM5);
        }
    }
}

impl SystemControl for Ports {
    fn enable_interrupts(&mut self) {
        // SAFETY: bus state is only shared with interrupt handlers through
        // critical-section protected slots.
        #[cfg(target_arch = "msp430")]
        unsafe {
            msp430::interrupt::enable();
        }
    }
}
