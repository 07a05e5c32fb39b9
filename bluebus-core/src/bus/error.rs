//! Bus status and mode types

use embedded_hal::i2c::{Error, ErrorKind, NoAcknowledgeSource};

/// Operating role of a bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Not yet configured
    #[default]
    Unused,
    /// Driving the clock
    Master,
    /// Responding at an own address
    Slave,
}

/// Error from a master-mode operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// Operation not valid in the bus's current mode, or bad argument
    InvalidOp,
    /// Bus or hardware did not become ready within the spin limit, or a
    /// request is already in flight
    Busy,
    /// Peer did not acknowledge an address or data byte
    Nack,
    /// Another master won arbitration
    ArbitrationLost,
}

impl Error for BusError {
    fn kind(&self) -> ErrorKind {
        match self {
            BusError::Nack => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Unknown),
            BusError::ArbitrationLost => ErrorKind::ArbitrationLoss,
            BusError::InvalidOp | BusError::Busy => ErrorKind::Other,
        }
    }
}
