//! Board-agnostic bus logic for the Bluebus firmware
//!
//! This crate contains everything between the eUSCI_B interrupt vector and
//! the sensor code that fills in device registers:
//!
//! - Bounded FIFO queues shared by interrupt and foreground code
//! - Bus driver: interrupt dispatch state machine, slave and master modes
//! - Peripheral registry and interrupt-safe driver slots
//! - Register-map device emulation on top of the driver callbacks
//! - Bus configuration types
//!
//! Nothing here touches hardware directly; all register access goes through
//! [`bluebus_hal::I2cRegisters`], so the whole state machine runs on the host
//! against `mock::MockRegisters`.

#![no_std]
#![deny(unsafe_code)]

pub mod bus;
pub mod config;
pub mod queue;
pub mod receiver;
pub mod regmap;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use bus::{
    BusDriver, BusError, BusHandler, BusRegistry, BusSlot, Callbacks, Diagnostics, IsrBus, Mode,
    Peripheral,
};
pub use config::{BusConfig, SpinLimit, UnderrunPolicy};
pub use queue::BoundedQueue;
pub use regmap::{RegisterMap, RegisterValue};
