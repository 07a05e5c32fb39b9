//! I2C bus abstractions
//!
//! Provides the register-block trait the bus driver uses to talk to one
//! eUSCI_B peripheral, plus bus identification and clock configuration.

use crate::gpio::I2cPins;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Physical eUSCI_B peripheral index
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusIndex {
    B0 = 0,
    B1 = 1,
    B2 = 2,
    B3 = 3,
}

impl BusIndex {
    /// Number of physical buses
    pub const COUNT: usize = 4;

    /// All buses in index order
    pub const ALL: [BusIndex; Self::COUNT] = [BusIndex::B0, BusIndex::B1, BusIndex::B2, BusIndex::B3];

    /// Index into per-bus tables
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Look up a bus by its numeric index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Registers of one eUSCI_B block in I2C mode
///
/// Offsets are relative to the block's base address. All registers are
/// 16 bits wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reg {
    /// Control word 0 (mode, reset, start/stop generation)
    Ctlw0,
    /// Control word 1 (automatic stop, glitch filter)
    Ctlw1,
    /// Bit rate divider
    Brw,
    /// Status (bus busy, byte counter)
    Statw,
    /// Byte counter threshold for automatic stop
    Tbcnt,
    /// Receive buffer
    Rxbuf,
    /// Transmit buffer
    Txbuf,
    /// Own address 0
    I2coa0,
    /// Slave address (master mode)
    I2csa,
    /// Interrupt enable
    Ie,
    /// Interrupt flags
    Ifg,
    /// Interrupt vector
    Iv,
}

impl Reg {
    /// Byte offset from the block base address
    pub const fn offset(self) -> usize {
        match self {
            Reg::Ctlw0 => 0x00,
            Reg::Ctlw1 => 0x02,
            Reg::Brw => 0x06,
            Reg::Statw => 0x08,
            Reg::Tbcnt => 0x0A,
            Reg::Rxbuf => 0x0C,
            Reg::Txbuf => 0x0E,
            Reg::I2coa0 => 0x14,
            Reg::I2csa => 0x20,
            Reg::Ie => 0x2A,
            Reg::Ifg => 0x2C,
            Reg::Iv => 0x2E,
        }
    }
}

/// Access to one eUSCI_B register block
///
/// Implementations must honour the hardware's read side effects:
///
/// - Reading [`Reg::Iv`] returns the highest-priority pending interrupt and
///   clears its flag.
/// - Reading [`Reg::Rxbuf`] clears the receive flag in [`Reg::Ifg`].
pub trait I2cRegisters {
    /// Read a register
    fn read(&mut self, reg: Reg) -> u16;

    /// Write a register
    fn write(&mut self, reg: Reg, value: u16);

    /// Bus this register block belongs to
    fn bus(&self) -> BusIndex;

    /// SDA/SCL pin assignment for this bus
    fn pins(&self) -> I2cPins;

    /// Read-modify-write a register
    fn modify(&mut self, reg: Reg, f: impl FnOnce(u16) -> u16) {
        let value = self.read(reg);
        self.write(reg, f(value));
    }

    /// Set the bits in `mask`
    fn set_bits(&mut self, reg: Reg, mask: u16) {
        self.modify(reg, |v| v | mask);
    }

    /// Clear the bits in `mask`
    fn clear_bits(&mut self, reg: Reg, mask: u16) {
        self.modify(reg, |v| v & !mask);
    }

    /// Check whether any bit in `mask` is set
    fn any_set(&mut self, reg: Reg, mask: u16) -> bool {
        self.read(reg) & mask != 0
    }
}

/// I2C configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct I2cConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self {
            frequency: 100_000, // 100kHz standard mode
        }
    }
}

impl I2cConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self { frequency: 100_000 };

    /// Fast mode (400 kHz)
    pub const FAST: Self = Self { frequency: 400_000 };

    /// Fast mode plus (1 MHz)
    pub const FAST_PLUS: Self = Self {
        frequency: 1_000_000,
    };

    /// Bit rate divider for the given source clock
    ///
    /// Never returns 0; the hardware treats a zero divider as "stopped".
    pub fn divider(&self, source_clock_hz: u32) -> u16 {
        let div = source_clock_hz / self.frequency.max(1);
        div.clamp(1, u16::MAX as u32) as u16
    }
}
