//! Bluebus Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits that the bus driver
//! in `bluebus-core` is written against. A chip-specific HAL implements them
//! over memory-mapped registers; the core crate ships a mock implementation
//! so the interrupt state machine can be driven on the host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  bluebus-core (driver, register map)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  bluebus-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ bluebus-hal-  │       │ MockRegisters │
//! │    msp430     │       │  (host tests) │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`i2c::I2cRegisters`] - eUSCI_B register block access
//! - [`gpio::PinMux`] - Pin function selection
//! - [`gpio::SystemControl`] - Pin muxing plus global interrupt enable

#![no_std]
#![deny(unsafe_code)]

pub mod eusci;
pub mod gpio;
pub mod i2c;

// Re-export key traits at crate root for convenience
pub use eusci::Vector;
pub use gpio::{I2cPins, PinFunction, PinMux, SystemControl};
pub use i2c::{BusIndex, I2cConfig, I2cRegisters, Reg};
