//! Simulated eUSCI_B register block
//!
//! Lets the driver's interrupt state machine run on the host. Tests queue
//! [`MockEvent`]s; each read of the interrupt vector register delivers the
//! next one, loading the receive buffer first where the event carries data.

use bluebus_hal::eusci::{ctlw0, irq, statw, Vector};
use bluebus_hal::{BusIndex, I2cPins, I2cRegisters, PinFunction, PinMux, Reg, SystemControl};
use heapless::{Deque, Vec};

use crate::bus::{BusDriver, BusHandler};

const WORDS: usize = Reg::Iv.offset() / 2 + 1;

/// Bus event as seen through the interrupt vector register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockEvent {
    Start,
    Stop,
    /// Stop arriving while a received byte was never signalled
    StopWithUnreadRx(u8),
    Rx(u8),
    Tx,
    Nack,
    ArbitrationLost,
}

/// Host-side stand-in for one eUSCI_B block
#[derive(Debug)]
pub struct MockRegisters {
    words: [u16; WORDS],
    events: Deque<MockEvent, 64>,
    sent: Vec<u8, 256>,
    bus: BusIndex,
    pins: I2cPins,
    start_delay: u32,
    stop_delay: u32,
    start_left: u32,
    stop_left: u32,
    busy_left: u32,
}

impl Default for MockRegisters {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRegisters {
    /// All registers zero, wired like bus B1
    pub fn new() -> Self {
        Self::for_bus(BusIndex::B1, I2cPins::new(5, 0, 1, PinFunction::Primary))
    }

    /// All registers zero, standing in for `bus`
    pub fn for_bus(bus: BusIndex, pins: I2cPins) -> Self {
        Self {
            words: [0; WORDS],
            events: Deque::new(),
            sent: Vec::new(),
            bus,
            pins,
            start_delay: 0,
            stop_delay: 0,
            start_left: 0,
            stop_left: 0,
            busy_left: 0,
        }
    }

    /// Queue an event for the next interrupt vector read
    ///
    /// # Panics
    ///
    /// If more than 64 events are pending.
    pub fn push_event(&mut self, event: MockEvent) {
        if self.events.push_back(event).is_err() {
            panic!("mock event queue full");
        }
    }

    /// Events not yet delivered
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Register value without read side effects
    pub fn peek(&self, reg: Reg) -> u16 {
        self.words[reg.offset() / 2]
    }

    /// Bytes written to the transmit buffer, oldest first
    pub fn sent(&self) -> &[u8] {
        &self.sent
    }

    /// Status polls a START stays pending before the hardware clears it
    pub fn set_start_delay(&mut self, polls: u32) {
        self.start_delay = polls;
    }

    /// Status polls a STOP stays pending before the hardware clears it
    pub fn set_stop_delay(&mut self, polls: u32) {
        self.stop_delay = polls;
    }

    /// Report the bus busy for the next `polls` status reads
    pub fn set_busy_polls(&mut self, polls: u32) {
        self.busy_left = polls;
    }

    /// Clear a pending START as if the address had gone out
    pub fn clear_start(&mut self) {
        self.words[Reg::Ctlw0.offset() / 2] &= !ctlw0::UCTXSTT;
    }

    fn word(&mut self, reg: Reg) -> &mut u16 {
        &mut self.words[reg.offset() / 2]
    }

    fn load_rx(&mut self, byte: u8) {
        *self.word(Reg::Rxbuf) = byte as u16;
        *self.word(Reg::Ifg) |= irq::UCRXIFG0;
    }

    fn next_vector(&mut self) -> u16 {
        let vector = match self.events.pop_front() {
            None => Vector::None,
            Some(MockEvent::Start) => Vector::Start,
            Some(MockEvent::Stop) => Vector::Stop,
            Some(MockEvent::StopWithUnreadRx(byte)) => {
                self.load_rx(byte);
                Vector::Stop
            }
            Some(MockEvent::Rx(byte)) => {
                self.load_rx(byte);
                Vector::Rx(0)
            }
            Some(MockEvent::Tx) => Vector::Tx(0),
            Some(MockEvent::Nack) => Vector::Nack,
            Some(MockEvent::ArbitrationLost) => Vector::ArbitrationLost,
        };
        vector.raw()
    }

    /// Control word read: pending START/STOP bits count down and self-clear
    fn read_ctlw0(&mut self) -> u16 {
        let mut value = self.peek(Reg::Ctlw0);
        if value & ctlw0::UCTXSTT != 0 {
            if self.start_left == 0 {
                value &= !ctlw0::UCTXSTT;
            } else {
                self.start_left -= 1;
            }
        }
        if value & ctlw0::UCTXSTP != 0 {
            if self.stop_left == 0 {
                value &= !ctlw0::UCTXSTP;
            } else {
                self.stop_left -= 1;
            }
        }
        *self.word(Reg::Ctlw0) = value;
        value
    }

    fn write_ctlw0(&mut self, value: u16) {
        let old = self.peek(Reg::Ctlw0);
        let raised = value & !old;
        if raised & ctlw0::UCTXSTT != 0 {
            self.start_left = self.start_delay;
        }
        if raised & ctlw0::UCTXSTP != 0 {
            self.stop_left = self.stop_delay;
        }
        // Entering reset clears interrupt enables and flags
        if raised & ctlw0::UCSWRST != 0 {
            *self.word(Reg::Ie) = 0;
            *self.word(Reg::Ifg) = 0;
        }
        *self.word(Reg::Ctlw0) = value;
    }
}

impl I2cRegisters for MockRegisters {
    fn read(&mut self, reg: Reg) -> u16 {
        match reg {
            Reg::Iv => self.next_vector(),
            Reg::Ctlw0 => self.read_ctlw0(),
            Reg::Rxbuf => {
                *self.word(Reg::Ifg) &= !irq::UCRXIFG0;
                self.peek(Reg::Rxbuf)
            }
            Reg::Statw => {
                let value = self.peek(Reg::Statw);
                if self.busy_left > 0 {
                    self.busy_left -= 1;
                    value | statw::UCBBUSY
                } else {
                    value & !statw::UCBBUSY
                }
            }
            _ => self.peek(reg),
        }
    }

    fn write(&mut self, reg: Reg, value: u16) {
        match reg {
            Reg::Ctlw0 => self.write_ctlw0(value),
            Reg::Txbuf => {
                *self.word(Reg::Txbuf) = value;
                let _ = self.sent.push(value as u8);
            }
            Reg::Iv => {}
            _ => *self.word(reg) = value,
        }
    }

    fn bus(&self) -> BusIndex {
        self.bus
    }

    fn pins(&self) -> I2cPins {
        self.pins
    }
}

/// Records pin routing and interrupt enabling
#[derive(Debug, Default)]
pub struct MockSystem {
    pub selected: Vec<(u8, u8, PinFunction), 8>,
    pub unlocked: bool,
    pub interrupts_enabled: bool,
}

impl PinMux for MockSystem {
    fn select(&mut self, port: u8, mask: u8, function: PinFunction) {
        let _ = self.selected.push((port, mask, function));
    }

    fn unlock(&mut self) {
        self.unlocked = true;
    }
}

impl SystemControl for MockSystem {
    fn enable_interrupts(&mut self) {
        self.interrupts_enabled = true;
    }
}

impl<H: BusHandler> BusDriver<MockRegisters, H> {
    /// Deliver each event through interrupt dispatch, in order
    pub fn simulate(&mut self, events: &[MockEvent]) {
        for &event in events {
            self.registers_mut().push_event(event);
            self.isr_dispatch();
        }
    }
}
