//! GPIO pin function selection
//!
//! Each I2C bus is wired to a fixed SDA/SCL pin pair whose port function
//! registers (SEL1:SEL0) must route the pins to the eUSCI_B module before
//! the bus is enabled.

/// Port pin function, encoded as SEL1:SEL0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinFunction {
    /// General purpose I/O
    Gpio = 0b00,
    /// Primary module function
    Primary = 0b01,
    /// Secondary module function
    Secondary = 0b10,
    /// Tertiary module function
    Tertiary = 0b11,
}

impl PinFunction {
    /// Whether SEL0 is set for this function
    pub const fn sel0(self) -> bool {
        (self as u8) & 0b01 != 0
    }

    /// Whether SEL1 is set for this function
    pub const fn sel1(self) -> bool {
        (self as u8) & 0b10 != 0
    }
}

/// Fixed SDA/SCL assignment of one bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cPins {
    /// Port number (P1 = 1)
    pub port: u8,
    /// SDA pin within the port
    pub sda: u8,
    /// SCL pin within the port
    pub scl: u8,
    /// Function that routes the pins to the bus
    pub function: PinFunction,
}

impl I2cPins {
    /// Create a pin assignment
    pub const fn new(port: u8, sda: u8, scl: u8, function: PinFunction) -> Self {
        Self {
            port,
            sda,
            scl,
            function,
        }
    }

    /// Port bitmask covering both pins
    pub const fn mask(&self) -> u8 {
        (1 << self.sda) | (1 << self.scl)
    }
}

/// Pin function multiplexer
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait PinMux {
    /// Route the pins in `mask` of `port` to `function`
    fn select(&mut self, port: u8, mask: u8, function: PinFunction);

    /// Release the power-on high-impedance lock so the configured
    /// port settings take effect
    fn unlock(&mut self);

    /// Route an I2C pin pair and unlock the port settings
    fn route_i2c(&mut self, pins: I2cPins) {
        self.select(pins.port, pins.mask(), pins.function);
        self.unlock();
    }
}

/// System-level control needed to bring a bus up
pub trait SystemControl: PinMux {
    /// Enable maskable interrupts globally
    fn enable_interrupts(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_select_bits() {
        assert!(PinFunction::Primary.sel0());
        assert!(!PinFunction::Primary.sel1());
        assert!(!PinFunction::Secondary.sel0());
        assert!(PinFunction::Secondary.sel1());
        assert!(PinFunction::Tertiary.sel0() && PinFunction::Tertiary.sel1());
    }

    #[test]
    fn test_pin_mask() {
        let pins = I2cPins::new(1, 6, 7, PinFunction::Secondary);
        assert_eq!(pins.mask(), 0b1100_0000);
    }
}
