//! MSP430FR5994-specific HAL for the Bluebus firmware
//!
//! This crate implements the `bluebus-hal` traits over the memory-mapped
//! eUSCI_B and digital I/O registers of the MSP430FR5994:
//!
//! - [`UcbRegisters`] - one eUSCI_B block in I2C mode
//! - [`Ports`] - pin function selection, LOCKLPM5 release, interrupt enable
//!
//! # Usage
//!
//! Register blocks alias fixed hardware addresses, so constructing one is
//! `unsafe`: the caller guarantees a single owner per peripheral. The bus
//! registry in `bluebus-core` hands out exactly one token per bus, which is
//! the intended way to uphold that.

#![no_std]

pub mod eusci;
pub mod gpio;

pub use eusci::{UcbRegisters, EUSCI_B_BASE, I2C_PINS};
pub use gpio::Ports;
