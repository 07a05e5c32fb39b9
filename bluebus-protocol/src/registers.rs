//! Register table
//!
//! Offsets and lengths of every named region in the 256-byte address space.
//!
//! | Offset | Len | Register     | Contents                                  |
//! |--------|-----|--------------|-------------------------------------------|
//! | 0x00   | 1   | WhoAmI       | Device identity                           |
//! | 0x01   | 1   | SensorHealth | bit i = sensor i healthy                  |
//! | 0x02   | 1   | Battery      | Battery level                             |
//! | 0x10   | 1   | Operation    | bit0 = reset requested, bit1 = operate    |
//! | 0x11   | 1   | Calibration  | bit i = sensor i calibrating              |
//! | 0x80   | 12  | RawMag       | 3 × f32                                   |
//! | 0x8C   | 12  | RawAcc       | 3 × f32                                   |
//! | 0x98   | 12  | RawGyro      | 3 × f32                                   |
//! | 0xA4   | 12  | Euler        | 3 × f32                                   |
//! | 0xB0   | 16  | Quaternion   | 4 × f32                                   |
//! | 0xC0   | 16  | GenFloats    | 4 × f32 scratch                           |
//! | 0xD0   | 48  | GenBufs      | 3 × 16-byte scratch buffers               |

/// Size of the device address space in bytes
pub const ADDRESS_SPACE_SIZE: usize = 256;

/// Number of general-purpose floats
pub const GEN_FLOAT_COUNT: usize = 4;

/// Number of general-purpose buffers
pub const GEN_BUF_COUNT: usize = 3;

/// Length of one general-purpose buffer
pub const GEN_BUF_LEN: usize = 16;

/// Operation register: reset requested
pub const OPERATION_RESET: u8 = 1 << 0;

/// Operation register: operation enabled
pub const OPERATION_OPERATE: u8 = 1 << 1;

/// Named regions of the address space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    WhoAmI,
    SensorHealth,
    Battery,
    Operation,
    Calibration,
    RawMag,
    RawAcc,
    RawGyro,
    Euler,
    Quaternion,
    GenFloats,
    GenBufs,
}

impl Register {
    /// Every register in address order
    pub const ALL: [Register; 12] = [
        Register::WhoAmI,
        Register::SensorHealth,
        Register::Battery,
        Register::Operation,
        Register::Calibration,
        Register::RawMag,
        Register::RawAcc,
        Register::RawGyro,
        Register::Euler,
        Register::Quaternion,
        Register::GenFloats,
        Register::GenBufs,
    ];

    /// Offset of the first byte
    pub const fn offset(self) -> u8 {
        match self {
            // Status
            Register::WhoAmI => 0x00,
            Register::SensorHealth => 0x01,
            Register::Battery => 0x02,
            // Control
            Register::Operation => 0x10,
            Register::Calibration => 0x11,
            // Data
            Register::RawMag => 0x80,
            Register::RawAcc => 0x8C,
            Register::RawGyro => 0x98,
            Register::Euler => 0xA4,
            Register::Quaternion => 0xB0,
            Register::GenFloats => 0xC0,
            Register::GenBufs => 0xD0,
        }
    }

    /// Length in bytes
    pub const fn len(self) -> usize {
        match self {
            Register::WhoAmI
            | Register::SensorHealth
            | Register::Battery
            | Register::Operation
            | Register::Calibration => 1,
            Register::RawMag | Register::RawAcc | Register::RawGyro | Register::Euler => 12,
            Register::Quaternion => 16,
            Register::GenFloats => 4 * GEN_FLOAT_COUNT,
            Register::GenBufs => GEN_BUF_LEN * GEN_BUF_COUNT,
        }
    }

    /// One past the last byte
    pub const fn end(self) -> usize {
        self.offset() as usize + self.len()
    }

    /// Byte range within the address space
    pub const fn range(self) -> core::ops::Range<usize> {
        self.offset() as usize..self.end()
    }
}

const _: () = {
    let mut i = 0;
    while i < Register::ALL.len() {
        assert!(Register::ALL[i].end() <= ADDRESS_SPACE_SIZE);
        if i > 0 {
            assert!(Register::ALL[i - 1].end() <= Register::ALL[i].offset() as usize);
        }
        i += 1;
    }
};
