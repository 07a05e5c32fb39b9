//! Emulated sensor endpoint
//!
//! Brings up a bus as a slave at the device address with a [`RegisterMap`]
//! answering for it.

use bluebus_hal::{BusIndex, I2cRegisters, SystemControl};

use crate::bus::{BusDriver, Peripheral};
use crate::config::BusConfig;
use crate::regmap::RegisterMap;

/// Address the device answers at
pub const DEVICE_ADDRESS: u8 = 0x3A;

/// Bus the device is wired to
pub const DEVICE_BUS: BusIndex = BusIndex::B1;

/// Start a slave driver at [`DEVICE_ADDRESS`] backed by a fresh register map
pub fn attach<R: I2cRegisters>(
    peripheral: Peripheral,
    regs: R,
    sys: &mut impl SystemControl,
    config: BusConfig,
    who_am_i: u8,
) -> BusDriver<R, RegisterMap> {
    let mut driver = BusDriver::new(peripheral, regs, RegisterMap::new(who_am_i), config);
    driver.begin_slave(sys, DEVICE_ADDRESS);

    #[cfg(feature = "defmt")]
    defmt::info!("device attached on {} at {=u8:#x}", driver.bus(), DEVICE_ADDRESS);

    driver
}
