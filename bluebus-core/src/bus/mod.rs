//! I2C bus driver
//!
//! Translates eUSCI_B interrupt events into buffered byte streams and
//! synchronous callback invocations.
//!
//! # Transaction framing (slave role)
//!
//! ```text
//!          START                   STOP
//!   Idle ─────────▶ Open ───────────────────▶ Idle
//!                   │  ▲    (flush RX to on_receive)
//!    repeated START │  │
//!   (flush RX to    └──┘
//!    on_receive)
//! ```
//!
//! Receive and transmit events inside an open transaction move single bytes
//! between the hardware buffers and the driver's bounded queues. A repeated
//! start ends a write phase without ending the transaction.

pub mod driver;
pub mod error;
pub mod handler;
pub mod registry;

pub use driver::{BusDriver, Diagnostics};
pub use error::{BusError, Mode};
pub use handler::{BusHandler, Callbacks, IsrBus};
pub use registry::{BusRegistry, BusSlot, Peripheral};
