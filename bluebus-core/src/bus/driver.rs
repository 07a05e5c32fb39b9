//! Bus driver implementation
//!
//! One [`BusDriver`] owns one eUSCI_B register block, the receive and
//! transmit queues, and the handler that interrupt dispatch calls into.

use bluebus_hal::eusci::{ctlw0, ctlw1, i2coa, irq, statw, Vector};
use bluebus_hal::{BusIndex, I2cConfig, I2cRegisters, Reg, SystemControl};

use super::error::{BusError, Mode};
use super::handler::{BusHandler, Callbacks, IsrBus, ReceiveFn, RequestFn};
use super::registry::Peripheral;
use crate::config::{BusConfig, UnderrunPolicy};
use crate::queue::{BoundedQueue, BUS_QUEUE_CAPACITY};

/// Largest read a single request can ask for (TBCNT is 8 bits)
pub const MAX_REQUEST_LEN: usize = 255;

/// Event counters for one bus
///
/// All counters saturate. None of them affect bus behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Diagnostics {
    /// START conditions, including repeated starts
    pub starts: u32,
    /// Starts that arrived while a transaction was already open
    pub repeated_starts: u32,
    /// STOP conditions
    pub stops: u32,
    /// Bytes taken from the receive buffer
    pub bytes_received: u32,
    /// Bytes written to the transmit buffer from the queue
    pub bytes_sent: u32,
    /// Received bytes lost to a full receive queue
    pub rx_dropped: u32,
    /// Bytes rejected by a full transmit queue
    pub tx_dropped: u32,
    /// Transmit requests with nothing to send after `on_request`
    pub tx_underruns: u32,
    /// NACKs received in master mode
    pub nacks: u32,
    /// Arbitration losses
    pub arbitration_lost: u32,
}

fn bump(counter: &mut u32) {
    *counter = counter.saturating_add(1);
}

/// Master read in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingRead {
    remaining: usize,
    stop: bool,
}

/// Buffered, interrupt-driven driver for one I2C bus
pub struct BusDriver<R, H> {
    bus: BusIndex,
    regs: R,
    handler: H,
    config: BusConfig,
    mode: Mode,
    address: u8,
    /// A start has been seen and no stop has closed it
    started: bool,
    /// `on_request` has run since the last start
    requested: bool,
    rx: BoundedQueue<u8, BUS_QUEUE_CAPACITY>,
    tx: BoundedQueue<u8, BUS_QUEUE_CAPACITY>,
    pending: Option<PendingRead>,
    error: Option<BusError>,
    stats: Diagnostics,
}

impl<R: I2cRegisters, H: BusHandler> BusDriver<R, H> {
    /// Create an unconfigured driver for a claimed peripheral
    ///
    /// `regs` must be the register block of the claimed bus.
    pub fn new(peripheral: Peripheral, regs: R, handler: H, config: BusConfig) -> Self {
        debug_assert_eq!(
            peripheral.bus(),
            regs.bus(),
            "register block does not belong to the claimed bus"
        );
        Self {
            bus: peripheral.bus(),
            regs,
            handler,
            config,
            mode: Mode::Unused,
            address: 0,
            started: false,
            requested: false,
            rx: BoundedQueue::new(),
            tx: BoundedQueue::new(),
            pending: None,
            error: None,
            stats: Diagnostics::default(),
        }
    }

    /// Configure the peripheral as bus master
    pub fn begin_master(&mut self, sys: &mut impl SystemControl) {
        self.reset_state(Mode::Master);
        sys.route_i2c(self.regs.pins());

        let divider = self.config.divider();
        self.regs.write(Reg::Ctlw0, ctlw0::UCSWRST);
        self.regs.set_bits(
            Reg::Ctlw0,
            ctlw0::UCMODE_3 | ctlw0::UCSYNC | ctlw0::UCMST | ctlw0::UCSSEL_SMCLK,
        );
        self.regs.write(Reg::Brw, divider);
        self.regs.clear_bits(Reg::Ctlw0, ctlw0::UCSWRST);
        self.regs.set_bits(Reg::Ie, irq::MASTER_SOURCES);

        sys.enable_interrupts();

        #[cfg(feature = "defmt")]
        defmt::debug!("{}: master, divider {}", self.bus, divider);
    }

    /// Configure the peripheral as a slave answering at `address`
    ///
    /// Only the low 7 bits of `address` are used.
    pub fn begin_slave(&mut self, sys: &mut impl SystemControl, address: u8) {
        self.reset_state(Mode::Slave);
        self.address = address & i2coa::ADDRESS_MASK as u8;
        sys.route_i2c(self.regs.pins());

        self.regs.write(Reg::Ctlw0, ctlw0::UCSWRST);
        self.regs.set_bits(Reg::Ctlw0, ctlw0::UCMODE_3 | ctlw0::UCSYNC);
        self.regs
            .write(Reg::I2coa0, i2coa::UCOAEN | self.address as u16);
        self.regs.clear_bits(Reg::Ctlw0, ctlw0::UCSWRST);
        self.regs.set_bits(Reg::Ie, irq::SLAVE_SOURCES);

        sys.enable_interrupts();

        #[cfg(feature = "defmt")]
        defmt::debug!("{}: slave at {=u8:#x}", self.bus, self.address);
    }

    /// Change the master SCL frequency
    pub fn set_clock(&mut self, i2c: I2cConfig) -> Result<(), BusError> {
        self.require_master()?;
        self.config.i2c = i2c;
        let divider = self.config.divider();
        self.while_reset(|regs| regs.write(Reg::Brw, divider));

        #[cfg(feature = "defmt")]
        defmt::debug!("{}: {} Hz, divider {}", self.bus, i2c.frequency, divider);
        Ok(())
    }

    /// Replace the event handler, returning the previous one
    pub fn bind(&mut self, handler: H) -> H {
        core::mem::replace(&mut self.handler, handler)
    }

    /// Queue bytes for transmission
    ///
    /// Returns how many fit in the transmit queue. Bytes that do not fit are
    /// discarded and will never be sent.
    pub fn write(&mut self, bytes: &[u8]) -> usize {
        bytes.iter().take_while(|&&b| self.tx.push(b)).count()
    }

    /// Queue one byte for transmission
    pub fn write_byte(&mut self, byte: u8) -> bool {
        self.tx.push(byte)
    }

    /// Take the oldest received byte
    pub fn read(&mut self) -> Option<u8> {
        self.rx.pop()
    }

    /// Bytes waiting in the receive queue
    pub fn available(&self) -> usize {
        self.rx.size()
    }

    /// Start a master read of `quantity` bytes from `address`
    ///
    /// Returns immediately; received bytes are delivered to `on_receive`
    /// once the last one arrives. With `stop`, the hardware byte counter ends
    /// the transfer with a STOP; otherwise a repeated start keeps the bus.
    pub fn request_from(&mut self, address: u8, quantity: usize, stop: bool) -> Result<(), BusError> {
        self.require_master()?;
        if quantity == 0 || quantity > MAX_REQUEST_LEN {
            return Err(BusError::InvalidOp);
        }
        if self.pending.is_some() {
            return Err(BusError::Busy);
        }

        self.regs
            .write(Reg::I2csa, address as u16 & i2coa::ADDRESS_MASK);
        self.while_reset(|regs| {
            if stop {
                regs.write(Reg::Tbcnt, quantity as u16);
                regs.modify(Reg::Ctlw1, |v| (v & !ctlw1::UCASTP_MASK) | ctlw1::UCASTP_2);
            } else {
                regs.clear_bits(Reg::Ctlw1, ctlw1::UCASTP_MASK);
            }
        });
        self.regs.clear_bits(Reg::Ctlw0, ctlw0::UCTR);
        self.regs.set_bits(Reg::Ctlw0, ctlw0::UCTXSTT);

        self.pending = Some(PendingRead {
            remaining: quantity,
            stop,
        });
        self.started = true;
        Ok(())
    }

    /// Open a master write to `address`
    ///
    /// Waits for the bus to be free, then for the START to go out, each
    /// bounded by the configured spin limit.
    pub fn begin_transmission(&mut self, address: u8) -> Result<(), BusError> {
        self.require_master()?;
        let spin = self.config.spin;

        let regs = &mut self.regs;
        if !spin.wait(|| !regs.any_set(Reg::Statw, statw::UCBBUSY)) {
            #[cfg(feature = "defmt")]
            defmt::warn!("{}: bus busy", self.bus);
            return Err(BusError::Busy);
        }

        self.regs
            .write(Reg::I2csa, address as u16 & i2coa::ADDRESS_MASK);
        self.regs.set_bits(Reg::Ctlw0, ctlw0::UCTR | ctlw0::UCTXSTT);

        let regs = &mut self.regs;
        if !spin.wait(|| !regs.any_set(Reg::Ctlw0, ctlw0::UCTXSTT)) {
            #[cfg(feature = "defmt")]
            defmt::warn!("{}: start not sent", self.bus);
            return Err(BusError::Busy);
        }

        self.started = true;
        Ok(())
    }

    /// Close the current master transaction with a STOP
    ///
    /// Reports a NACK or arbitration loss recorded during the transaction.
    pub fn end_transmission(&mut self) -> Result<(), BusError> {
        self.require_master()?;
        self.issue_stop();

        let spin = self.config.spin;
        let regs = &mut self.regs;
        if !spin.wait(|| !regs.any_set(Reg::Ctlw0, ctlw0::UCTXSTP)) {
            #[cfg(feature = "defmt")]
            defmt::warn!("{}: stop not sent", self.bus);
            return Err(BusError::Busy);
        }

        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Take the error recorded by interrupt dispatch, if any
    pub fn take_error(&mut self) -> Option<BusError> {
        self.error.take()
    }

    /// Service one pending interrupt
    ///
    /// Called from the eUSCI_B interrupt vector, never from application code.
    pub fn isr_dispatch(&mut self) {
        let vector = Vector::from_raw(self.regs.read(Reg::Iv));
        match vector {
            Vector::None => {}
            Vector::ArbitrationLost => {
                bump(&mut self.stats.arbitration_lost);
                self.error = Some(BusError::ArbitrationLost);
            }
            Vector::Nack => {
                bump(&mut self.stats.nacks);
                if self.mode == Mode::Master {
                    self.pending = None;
                    self.issue_stop();
                    self.error = Some(BusError::Nack);
                }
            }
            Vector::Start => self.on_start(),
            Vector::Stop => self.on_stop(),
            Vector::Rx(_) => self.on_rx(),
            Vector::Tx(_) => self.on_tx(),
            // Not armed
            Vector::ByteCount | Vector::ClockLowTimeout | Vector::Bit9 => {}
        }
    }

    fn on_start(&mut self) {
        bump(&mut self.stats.starts);
        if !self.started {
            self.started = true;
        } else {
            // No stop since the last start: the write phase is over
            bump(&mut self.stats.repeated_starts);
            self.flush_rx();
        }
        self.requested = false;
    }

    fn on_stop(&mut self) {
        bump(&mut self.stats.stops);
        // The receive interrupt for the final byte can be lost right before
        // a stop; pick the byte up here.
        if self.regs.any_set(Reg::Ifg, irq::UCRXIFG0) {
            self.receive_byte();
            self.count_pending_byte();
        }
        // The stop ends any master read, complete or not
        if self.mode == Mode::Master {
            self.pending = None;
        }
        self.flush_rx();
        self.started = false;
        self.requested = false;
    }

    fn on_rx(&mut self) {
        self.receive_byte();
        let Some(stop) = self.count_pending_byte() else {
            return;
        };
        if stop {
            self.issue_stop();
        } else {
            self.regs.set_bits(Reg::Ctlw0, ctlw0::UCTXSTT);
        }
        self.flush_rx();
    }

    /// Count a received byte against the master read in flight
    ///
    /// Returns the read's stop flag when this byte completed it.
    fn count_pending_byte(&mut self) -> Option<bool> {
        if self.mode != Mode::Master {
            return None;
        }
        let pending = self.pending.as_mut()?;
        pending.remaining = pending.remaining.saturating_sub(1);
        if pending.remaining > 0 {
            return None;
        }
        let stop = pending.stop;
        self.pending = None;
        Some(stop)
    }

    fn on_tx(&mut self) {
        if let Some(byte) = self.tx.pop() {
            self.regs.write(Reg::Txbuf, byte as u16);
            bump(&mut self.stats.bytes_sent);
            return;
        }
        // A master transmitter only sends what the application queued
        if self.mode != Mode::Slave {
            return;
        }

        self.requested = true;
        let mut bus = IsrBus::new(&mut self.rx, &mut self.tx);
        self.handler.on_request(&mut bus);

        match self.tx.pop() {
            Some(byte) => {
                self.regs.write(Reg::Txbuf, byte as u16);
                bump(&mut self.stats.bytes_sent);
            }
            None => {
                bump(&mut self.stats.tx_underruns);
                if let UnderrunPolicy::Pad(fill) = self.config.underrun {
                    self.regs.write(Reg::Txbuf, fill as u16);
                }
            }
        }
    }

    fn receive_byte(&mut self) {
        let byte = self.regs.read(Reg::Rxbuf) as u8;
        bump(&mut self.stats.bytes_received);
        if !self.rx.push(byte) {
            bump(&mut self.stats.rx_dropped);
        }
    }

    /// Hand queued receive bytes to the handler
    fn flush_rx(&mut self) {
        if self.rx.empty() {
            return;
        }
        let count = self.rx.size();
        let mut bus = IsrBus::new(&mut self.rx, &mut self.tx);
        self.handler.on_receive(&mut bus, count);
    }

    /// Request a STOP without waiting for it
    fn issue_stop(&mut self) {
        self.regs.set_bits(Reg::Ctlw0, ctlw0::UCTXSTP);
        self.started = false;
    }

    /// Run `f` with the peripheral held in software reset
    ///
    /// Reset clears the interrupt enables, so they are re-armed afterwards.
    fn while_reset(&mut self, f: impl FnOnce(&mut R)) {
        let sources = self.regs.read(Reg::Ie);
        self.regs.set_bits(Reg::Ctlw0, ctlw0::UCSWRST);
        f(&mut self.regs);
        self.regs.clear_bits(Reg::Ctlw0, ctlw0::UCSWRST);
        self.regs.set_bits(Reg::Ie, sources);
    }

    fn require_master(&self) -> Result<(), BusError> {
        if self.mode == Mode::Master {
            Ok(())
        } else {
            Err(BusError::InvalidOp)
        }
    }

    fn reset_state(&mut self, mode: Mode) {
        self.mode = mode;
        self.started = false;
        self.requested = false;
        self.pending = None;
        self.error = None;
        self.rx.clear();
        self.tx.clear();
    }
}

impl<R, H> BusDriver<R, H> {
    /// Physical bus this driver owns
    pub fn bus(&self) -> BusIndex {
        self.bus
    }

    /// Current operating role
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Own slave address (meaningful in slave mode)
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Whether a transaction is open
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Whether `on_request` has run since the last start
    pub fn requested(&self) -> bool {
        self.requested
    }

    /// Whether a master read is still collecting bytes
    pub fn request_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Bytes waiting in the transmit queue
    pub fn tx_queued(&self) -> usize {
        self.tx.size()
    }

    /// Event counters, including queue overflow
    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics {
            rx_dropped: self.rx.dropped(),
            tx_dropped: self.tx.dropped(),
            ..self.stats
        }
    }

    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn registers(&self) -> &R {
        &self.regs
    }

    pub fn registers_mut(&mut self) -> &mut R {
        &mut self.regs
    }
}

impl<R> BusDriver<R, Callbacks> {
    /// Bind the function called when a write phase ends
    pub fn on_receive(&mut self, f: ReceiveFn) {
        self.handler.set_receive(f);
    }

    /// Bind the function called when the master wants a byte
    pub fn on_request(&mut self, f: RequestFn) {
        self.handler.set_request(f);
    }
}
