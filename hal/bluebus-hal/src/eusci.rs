//! eUSCI_B register bit definitions for I2C mode
//!
//! Bit positions follow the MSP430FR5xx/6xx family user's guide.

/// CTLW0 bits
pub mod ctlw0 {
    /// Software reset enable
    pub const UCSWRST: u16 = 0x0001;
    /// Transmit START condition
    pub const UCTXSTT: u16 = 0x0002;
    /// Transmit STOP condition
    pub const UCTXSTP: u16 = 0x0004;
    /// Transmit NACK
    pub const UCTXNACK: u16 = 0x0008;
    /// Transmitter / receiver
    pub const UCTR: u16 = 0x0010;
    /// Clock source SMCLK
    pub const UCSSEL_SMCLK: u16 = 0x0080;
    /// Synchronous mode
    pub const UCSYNC: u16 = 0x0100;
    /// I2C mode
    pub const UCMODE_3: u16 = 0x0600;
    /// Master mode select
    pub const UCMST: u16 = 0x0800;
}

/// CTLW1 bits
pub mod ctlw1 {
    /// Automatic STOP when the byte counter threshold is reached
    pub const UCASTP_2: u16 = 0x0008;
    /// Automatic STOP generation mask
    pub const UCASTP_MASK: u16 = 0x000C;
}

/// STATW bits
pub mod statw {
    /// Bus busy
    pub const UCBBUSY: u16 = 0x0010;
}

/// I2COA0 bits
pub mod i2coa {
    /// Own address enable
    pub const UCOAEN: u16 = 0x0400;
    /// 7-bit address mask
    pub const ADDRESS_MASK: u16 = 0x007F;
}

/// IE / IFG bits (the layouts match)
pub mod irq {
    /// Receive, own address 0
    pub const UCRXIFG0: u16 = 0x0001;
    /// Transmit, own address 0
    pub const UCTXIFG0: u16 = 0x0002;
    /// START condition
    pub const UCSTTIFG: u16 = 0x0004;
    /// STOP condition
    pub const UCSTPIFG: u16 = 0x0008;
    /// Arbitration lost
    pub const UCALIFG: u16 = 0x0010;
    /// NACK received
    pub const UCNACKIFG: u16 = 0x0020;

    /// Sources armed in slave mode
    pub const SLAVE_SOURCES: u16 = UCRXIFG0 | UCTXIFG0 | UCSTTIFG | UCSTPIFG;
    /// Sources armed in master mode
    pub const MASTER_SOURCES: u16 = SLAVE_SOURCES | UCNACKIFG | UCALIFG;
}

/// Decoded interrupt vector register
///
/// Reading IV yields an even value identifying the highest-priority
/// pending source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Vector {
    /// No interrupt pending
    None,
    /// Arbitration lost
    ArbitrationLost,
    /// NACK received (master)
    Nack,
    /// START condition received with own address
    Start,
    /// STOP condition received
    Stop,
    /// Data received for own address `n` (0-3)
    Rx(u8),
    /// Transmit buffer empty for own address `n` (0-3)
    Tx(u8),
    /// Byte counter threshold reached
    ByteCount,
    /// Clock low timeout
    ClockLowTimeout,
    /// Ninth bit position
    Bit9,
}

impl Vector {
    /// Raw IV value for this vector
    pub const fn raw(self) -> u16 {
        match self {
            Vector::None => 0x00,
            Vector::ArbitrationLost => 0x02,
            Vector::Nack => 0x04,
            Vector::Start => 0x06,
            Vector::Stop => 0x08,
            Vector::Rx(n) => 0x16 - 4 * (n as u16 & 0x3),
            Vector::Tx(n) => 0x18 - 4 * (n as u16 & 0x3),
            Vector::ByteCount => 0x1A,
            Vector::ClockLowTimeout => 0x1C,
            Vector::Bit9 => 0x1E,
        }
    }

    /// Decode a raw IV value
    ///
    /// Values outside the documented range decode as [`Vector::None`].
    pub const fn from_raw(raw: u16) -> Self {
        match raw {
            0x02 => Vector::ArbitrationLost,
            0x04 => Vector::Nack,
            0x06 => Vector::Start,
            0x08 => Vector::Stop,
            0x0A => Vector::Rx(3),
            0x0C => Vector::Tx(3),
            0x0E => Vector::Rx(2),
            0x10 => Vector::Tx(2),
            0x12 => Vector::Rx(1),
            0x14 => Vector::Tx(1),
            0x16 => Vector::Rx(0),
            0x18 => Vector::Tx(0),
            0x1A => Vector::ByteCount,
            0x1C => Vector::ClockLowTimeout,
            0x1E => Vector::Bit9,
            _ => Vector::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_table_matches_hardware() {
        assert_eq!(Vector::from_raw(0x06), Vector::Start);
        assert_eq!(Vector::from_raw(0x08), Vector::Stop);
        assert_eq!(Vector::from_raw(0x16), Vector::Rx(0));
        assert_eq!(Vector::from_raw(0x18), Vector::Tx(0));
        assert_eq!(Vector::from_raw(0x0A), Vector::Rx(3));
        assert_eq!(Vector::from_raw(0x0C), Vector::Tx(3));
    }

    #[test]
    fn test_vector_raw_inverts_decode() {
        for raw in (0x00..=0x1E).step_by(2) {
            assert_eq!(Vector::from_raw(raw).raw(), raw);
        }
    }

    #[test]
    fn test_master_arms_error_sources() {
        assert_ne!(irq::MASTER_SOURCES & irq::UCNACKIFG, 0);
        assert_ne!(irq::MASTER_SOURCES & irq::UCALIFG, 0);
        assert_eq!(irq::SLAVE_SOURCES & (irq::UCNACKIFG | irq::UCALIFG), 0);
    }

    #[test]
    fn test_odd_vector_is_none() {
        assert_eq!(Vector::from_raw(0x07), Vector::None);
        assert_eq!(Vector::from_raw(0x40), Vector::None);
    }
}
