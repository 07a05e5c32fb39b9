//! Bluebus register-map protocol
//!
//! This crate defines the register table the device exposes to an I2C
//! master. A master addresses it exactly like a commodity sensor IC:
//!
//! ```text
//! write:  START | ADDR+W | REG | D0 | D1 | ... | STOP
//! read:   START | ADDR+W | REG | rSTART | ADDR+R | D(REG) | D(REG+1) | ... | STOP
//! ```
//!
//! The first byte of a write selects the register; following bytes are
//! stored at auto-incrementing offsets. Reads stream bytes starting at the
//! selected register.
//!
//! Multi-byte values are the raw native-endian image of IEEE-754 `f32`s,
//! which existing masters depend on byte for byte.

#![no_std]
#![deny(unsafe_code)]

pub mod registers;
pub mod types;

pub use registers::{
    Register, ADDRESS_SPACE_SIZE, GEN_BUF_COUNT, GEN_BUF_LEN, GEN_FLOAT_COUNT, OPERATION_OPERATE,
    OPERATION_RESET,
};
pub use types::{Quaternion, Sensor, Vector3};
