//! Callbacks invoked from interrupt dispatch
//!
//! # Interrupt context
//!
//! Every method in this module runs synchronously inside the bus interrupt
//! handler. Handlers must not block, spin, or do lengthy work: while they
//! run, the peripheral holds SCL and every lower-priority interrupt waits.
//! The [`IsrBus`] argument can only be created by the dispatcher, so a
//! function taking one is by construction interrupt-context code.

use crate::queue::{BoundedQueue, BUS_QUEUE_CAPACITY};

/// View of a bus's queues, valid for one callback invocation
pub struct IsrBus<'a> {
    rx: &'a mut BoundedQueue<u8, BUS_QUEUE_CAPACITY>,
    tx: &'a mut BoundedQueue<u8, BUS_QUEUE_CAPACITY>,
}

impl<'a> IsrBus<'a> {
    pub(crate) fn new(
        rx: &'a mut BoundedQueue<u8, BUS_QUEUE_CAPACITY>,
        tx: &'a mut BoundedQueue<u8, BUS_QUEUE_CAPACITY>,
    ) -> Self {
        Self { rx, tx }
    }

    /// Bytes waiting in the receive queue
    pub fn available(&self) -> usize {
        self.rx.size()
    }

    /// Take the oldest received byte
    pub fn read(&mut self) -> Option<u8> {
        self.rx.pop()
    }

    /// Queue bytes for transmission
    ///
    /// Returns how many fit; the rest are discarded.
    pub fn write(&mut self, bytes: &[u8]) -> usize {
        bytes.iter().take_while(|&&b| self.tx.push(b)).count()
    }

    /// Queue one byte for transmission
    pub fn write_byte(&mut self, byte: u8) -> bool {
        self.tx.push(byte)
    }
}

/// Receiver of bus events
///
/// See the module documentation for the interrupt-context contract. Both
/// methods default to doing nothing.
pub trait BusHandler {
    /// A write phase ended (repeated start or stop) with `count` bytes queued
    fn on_receive(&mut self, bus: &mut IsrBus<'_>, count: usize) {
        let _ = (bus, count);
    }

    /// The master wants a byte and the transmit queue is empty
    ///
    /// Expected to queue at least one byte with [`IsrBus::write`].
    fn on_request(&mut self, bus: &mut IsrBus<'_>) {
        let _ = bus;
    }
}

/// Plain function called on receive
pub type ReceiveFn = fn(&mut IsrBus<'_>, usize);

/// Plain function called on request
pub type RequestFn = fn(&mut IsrBus<'_>);

fn ignore_receive(_: &mut IsrBus<'_>, _: usize) {}

fn ignore_request(_: &mut IsrBus<'_>) {}

/// Handler built from two independently bound functions
#[derive(Clone, Copy)]
pub struct Callbacks {
    receive: ReceiveFn,
    request: RequestFn,
}

impl Default for Callbacks {
    fn default() -> Self {
        Self::new()
    }
}

impl Callbacks {
    /// Both callbacks do nothing
    pub const fn new() -> Self {
        Self {
            receive: ignore_receive,
            request: ignore_request,
        }
    }

    /// Replace the receive callback
    pub fn set_receive(&mut self, f: ReceiveFn) {
        self.receive = f;
    }

    /// Replace the request callback
    pub fn set_request(&mut self, f: RequestFn) {
        self.request = f;
    }
}

impl BusHandler for Callbacks {
    fn on_receive(&mut self, bus: &mut IsrBus<'_>, count: usize) {
        (self.receive)(bus, count)
    }

    fn on_request(&mut self, bus: &mut IsrBus<'_>) {
        (self.request)(bus)
    }
}

impl<H: BusHandler + ?Sized> BusHandler for &mut H {
    fn on_receive(&mut self, bus: &mut IsrBus<'_>, count: usize) {
        (**self).on_receive(bus, count)
    }

    fn on_request(&mut self, bus: &mut IsrBus<'_>) {
        (**self).on_request(bus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_reports_short_count() {
        let mut rx = BoundedQueue::new();
        let mut tx = BoundedQueue::new();
        let mut bus = IsrBus::new(&mut rx, &mut tx);
        let data = [0xAAu8; BUS_QUEUE_CAPACITY + 3];
        assert_eq!(bus.write(&data), BUS_QUEUE_CAPACITY);
        assert!(!bus.write_byte(1));
        assert_eq!(tx.size(), BUS_QUEUE_CAPACITY);
    }

    #[test]
    fn test_read_drains_in_order() {
        let mut rx = BoundedQueue::new();
        let mut tx = BoundedQueue::new();
        rx.push(1);
        rx.push(2);
        let mut bus = IsrBus::new(&mut rx, &mut tx);
        assert_eq!(bus.available(), 2);
        assert_eq!(bus.read(), Some(1));
        assert_eq!(bus.read(), Some(2));
        assert_eq!(bus.read(), None);
    }

    #[test]
    fn test_default_callbacks_do_nothing() {
        let mut rx = BoundedQueue::new();
        let mut tx = BoundedQueue::new();
        rx.push(9);
        let mut callbacks = Callbacks::new();
        {
            let mut bus = IsrBus::new(&mut rx, &mut tx);
            callbacks.on_receive(&mut bus, 1);
            callbacks.on_request(&mut bus);
        }
        assert_eq!(rx.size(), 1);
        assert!(tx.empty());
    }

    #[test]
    fn test_bound_request_callback_runs() {
        fn answer(bus: &mut IsrBus<'_>) {
            bus.write(&[0x42, 0x43]);
        }
        let mut rx = BoundedQueue::new();
        let mut tx = BoundedQueue::new();
        let mut callbacks = Callbacks::new();
        callbacks.set_request(answer);
        callbacks.on_request(&mut IsrBus::new(&mut rx, &mut tx));
        assert_eq!(tx.pop(), Some(0x42));
        assert_eq!(tx.pop(), Some(0x43));
    }
}
