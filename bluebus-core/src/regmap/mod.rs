//! Register-map device emulation
//!
//! A [`RegisterMap`] bound to a slave-mode [`BusDriver`](crate::BusDriver)
//! looks to the bus master like a commodity sensor IC: a 256-byte register
//! file addressed by an auto-incrementing cursor.
//!
//! ```text
//! write:  START addr d0 d1 .. dn STOP      space[addr..] = d0..dn
//! read:   START addr STOP START r0 r1 .. STOP   (or repeated start)
//!                                          r0.. = space[addr..]
//! ```
//!
//! The first byte of every write phase selects the cursor; any further bytes
//! are stored at the cursor, which advances and wraps at 256. Each byte the
//! master reads is taken from the cursor, which then advances.

mod device;
mod value;

pub use value::RegisterValue;

use bluebus_protocol::{Register, ADDRESS_SPACE_SIZE};

use crate::bus::{BusHandler, IsrBus};

/// 256-byte register file with a bus-facing cursor
#[derive(Debug, Clone)]
pub struct RegisterMap {
    space: [u8; ADDRESS_SPACE_SIZE],
    cursor: u8,
    /// Next received byte selects the cursor
    address_phase: bool,
}

impl RegisterMap {
    /// Zeroed register file with WhoAmI preset
    pub const fn new(who_am_i: u8) -> Self {
        let mut space = [0; ADDRESS_SPACE_SIZE];
        space[Register::WhoAmI.offset() as usize] = who_am_i;
        Self {
            space,
            cursor: 0,
            address_phase: true,
        }
    }

    /// Read a value starting at `offset`
    ///
    /// # Panics
    ///
    /// If the value would extend past the end of the address space.
    pub fn get<T: RegisterValue>(&self, offset: u8) -> T {
        let start = offset as usize;
        T::from_image(&self.space[start..start + T::SIZE])
    }

    /// Store a value starting at `offset`
    ///
    /// # Panics
    ///
    /// If the value would extend past the end of the address space.
    pub fn set<T: RegisterValue>(&mut self, offset: u8, value: T) {
        let start = offset as usize;
        value.write_image(&mut self.space[start..start + T::SIZE]);
    }

    /// Address the next bus read or write will use
    pub fn cursor(&self) -> u8 {
        self.cursor
    }

    /// Whole address space
    pub fn as_bytes(&self) -> &[u8; ADDRESS_SPACE_SIZE] {
        &self.space
    }

    pub(crate) fn region(&self, register: Register) -> &[u8] {
        &self.space[register.range()]
    }

    pub(crate) fn region_mut(&mut self, register: Register) -> &mut [u8] {
        &mut self.space[register.range()]
    }
}

impl BusHandler for RegisterMap {
    fn on_receive(&mut self, bus: &mut IsrBus<'_>, _count: usize) {
        while let Some(byte) = bus.read() {
            if self.address_phase {
                self.cursor = byte;
                self.address_phase = false;
            } else {
                self.space[self.cursor as usize] = byte;
                self.cursor = self.cursor.wrapping_add(1);
            }
        }
        // Every write phase starts with a register address
        self.address_phase = true;
    }

    fn on_request(&mut self, bus: &mut IsrBus<'_>) {
        bus.write_byte(self.space[self.cursor as usize]);
        self.cursor = self.cursor.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::{BusDriver, BusRegistry};
    use crate::config::BusConfig;
    use crate::mock::{MockEvent, MockRegisters, MockSystem};
    use crate::queue::BUS_QUEUE_CAPACITY;
    use bluebus_hal::BusIndex;
    use bluebus_protocol::Vector3;

    /// Counts receive callbacks on the way to the register map
    struct Counted {
        map: RegisterMap,
        receives: usize,
        requests: usize,
    }

    impl BusHandler for Counted {
        fn on_receive(&mut self, bus: &mut IsrBus<'_>, count: usize) {
            self.receives += 1;
            self.map.on_receive(bus, count);
        }

        fn on_request(&mut self, bus: &mut IsrBus<'_>) {
            self.requests += 1;
            self.map.on_request(bus);
        }
    }

    fn device(map: RegisterMap) -> BusDriver<MockRegisters, Counted> {
        let registry = BusRegistry::new();
        let mut drv = BusDriver::new(
            registry.take(BusIndex::B1).unwrap(),
            MockRegisters::new(),
            Counted {
                map,
                receives: 0,
                requests: 0,
            },
            BusConfig::default(),
        );
        drv.begin_slave(&mut MockSystem::default(), 0x3A);
        drv
    }

    fn write_phase(drv: &mut BusDriver<MockRegisters, Counted>, bytes: &[u8]) {
        drv.simulate(&[MockEvent::Start]);
        for &b in bytes {
            drv.simulate(&[MockEvent::Rx(b)]);
        }
    }

    #[test]
    fn test_new_presets_who_am_i() {
        let map = RegisterMap::new(0xB1);
        assert_eq!(map.get::<u8>(Register::WhoAmI.offset()), 0xB1);
        assert_eq!(map.cursor(), 0);
        assert!(map.as_bytes()[1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_typed_access_is_native_endian() {
        let mut map = RegisterMap::new(0);
        map.set::<f32>(0xC0, -4.25);
        map.set::<u16>(0xC4, 0x1234);
        map.set::<i32>(0xC8, -7);
        assert_eq!(&map.as_bytes()[0xC0..0xC4], &(-4.25f32).to_ne_bytes());
        assert_eq!(map.get::<f32>(0xC0), -4.25);
        assert_eq!(map.get::<u16>(0xC4), 0x1234);
        assert_eq!(map.get::<i32>(0xC8), -7);
    }

    #[test]
    fn test_last_byte_is_addressable() {
        let mut map = RegisterMap::new(0);
        map.set::<u8>(0xFF, 9);
        assert_eq!(map.get::<u8>(0xFF), 9);
        map.set::<u32>(0xFC, 1);
        assert_eq!(map.get::<u32>(0xFC), 1);
    }

    #[test]
    #[should_panic]
    fn test_value_past_end_panics() {
        let map = RegisterMap::new(0);
        let _ = map.get::<u16>(0xFF);
    }

    #[test]
    fn test_burst_write_sets_raw_mag() {
        let mut drv = device(RegisterMap::new(0xB1));
        let mut burst = [0u8; 13];
        burst[0] = 0x80;
        burst[1..].copy_from_slice(&Vector3::new(1.0, 2.0, 3.0).to_ne_bytes());

        write_phase(&mut drv, &burst);
        assert_eq!(drv.handler().receives, 0);
        drv.simulate(&[MockEvent::Stop]);

        let map = &drv.handler().map;
        assert_eq!(drv.handler().receives, 1);
        assert_eq!(map.get::<f32>(0x80), 1.0);
        assert_eq!(map.get::<f32>(0x84), 2.0);
        assert_eq!(map.get::<f32>(0x88), 3.0);
        assert_eq!(&map.as_bytes()[0x80..0x8C], &burst[1..]);
        assert_eq!(map.cursor(), 0x8C);
    }

    #[test]
    fn test_select_then_read_in_new_transaction() {
        let mut map = RegisterMap::new(0);
        map.set::<u8>(Register::WhoAmI.offset(), 0xB1);
        let mut drv = device(map);

        write_phase(&mut drv, &[0x00]);
        drv.simulate(&[MockEvent::Stop]);
        drv.simulate(&[MockEvent::Start, MockEvent::Tx, MockEvent::Stop]);

        assert_eq!(drv.handler().requests, 1);
        assert_eq!(drv.registers().sent(), &[0xB1]);
        assert_eq!(drv.handler().map.cursor(), 0x01);
    }

    #[test]
    fn test_select_then_read_after_repeated_start() {
        let mut map = RegisterMap::new(0);
        map.set::<u8>(0x10, 0x02);
        let mut drv = device(map);

        write_phase(&mut drv, &[0x10]);
        drv.simulate(&[MockEvent::Start]);
        assert_eq!(drv.handler().receives, 1);
        assert_eq!(drv.handler().map.cursor(), 0x10);

        drv.simulate(&[MockEvent::Tx, MockEvent::Stop]);
        assert_eq!(drv.registers().sent(), &[0x02]);
        assert_eq!(drv.handler().receives, 1);
    }

    #[test]
    fn test_burst_read_streams_consecutive_bytes() {
        let mut map = RegisterMap::new(0);
        let euler = Vector3::euler(10.0, -5.0, 0.5);
        map.update_euler(euler);
        let mut drv = device(map);

        write_phase(&mut drv, &[Register::Euler.offset()]);
        drv.simulate(&[MockEvent::Start]);
        for _ in 0..Vector3::SIZE {
            drv.simulate(&[MockEvent::Tx]);
        }
        drv.simulate(&[MockEvent::Stop]);

        assert_eq!(drv.registers().sent(), &euler.to_ne_bytes());
        assert_eq!(drv.handler().map.cursor(), Register::Euler.end() as u8);
    }

    #[test]
    fn test_oversized_burst_loses_tail() {
        let mut drv = device(RegisterMap::new(0));
        drv.simulate(&[MockEvent::Start, MockEvent::Rx(0x20)]);
        for i in 0..39u8 {
            drv.simulate(&[MockEvent::Rx(0xA0 + i)]);
            assert!(drv.available() <= BUS_QUEUE_CAPACITY);
        }
        drv.simulate(&[MockEvent::Stop]);

        let map = &drv.handler().map;
        let stored = BUS_QUEUE_CAPACITY - 1;
        for i in 0..stored {
            assert_eq!(map.as_bytes()[0x20 + i], 0xA0 + i as u8);
        }
        assert_eq!(map.as_bytes()[0x20 + stored], 0);
        assert_eq!(map.cursor(), 0x20 + stored as u8);
        assert_eq!(drv.diagnostics().rx_dropped, 8);
    }

    #[test]
    fn test_burst_wraps_at_end_of_space() {
        let mut drv = device(RegisterMap::new(0x77));
        let mut burst = [0u8; 11];
        burst[0] = 0xFC;
        for (i, b) in burst[1..].iter_mut().enumerate() {
            *b = i as u8 + 1;
        }
        write_phase(&mut drv, &burst);
        drv.simulate(&[MockEvent::Stop]);

        let map = &drv.handler().map;
        assert_eq!(&map.as_bytes()[0xFC..], &[1, 2, 3, 4]);
        assert_eq!(&map.as_bytes()[0x00..0x06], &[5, 6, 7, 8, 9, 10]);
        assert_eq!(map.cursor(), 0x06);
    }

    #[test]
    fn test_read_wraps_cursor() {
        let mut map = RegisterMap::new(0x5A);
        map.set::<u8>(0xFF, 0xEE);
        let mut drv = device(map);

        write_phase(&mut drv, &[0xFF]);
        drv.simulate(&[MockEvent::Stop, MockEvent::Start, MockEvent::Tx, MockEvent::Tx]);
        assert_eq!(drv.registers().sent(), &[0xEE, 0x5A]);
        assert_eq!(drv.handler().map.cursor(), 0x01);
    }

    #[test]
    fn test_each_write_phase_reselects_address() {
        let mut drv = device(RegisterMap::new(0));
        write_phase(&mut drv, &[0x10, 0x01]);
        drv.simulate(&[MockEvent::Stop]);
        write_phase(&mut drv, &[0x11, 0x04]);
        drv.simulate(&[MockEvent::Stop]);

        let map = &drv.handler().map;
        assert_eq!(map.get::<u8>(0x10), 0x01);
        assert_eq!(map.get::<u8>(0x11), 0x04);
        assert_eq!(map.cursor(), 0x12);
    }

    #[test]
    fn test_borrowed_map_serves_bus() {
        let mut map = RegisterMap::new(0);
        {
            let registry = BusRegistry::new();
            let mut drv = BusDriver::new(
                registry.take(BusIndex::B1).unwrap(),
                MockRegisters::new(),
                &mut map,
                BusConfig::default(),
            );
            drv.begin_slave(&mut MockSystem::default(), 0x3A);
            drv.simulate(&[
                MockEvent::Start,
                MockEvent::Rx(0x20),
                MockEvent::Rx(0xAB),
                MockEvent::Stop,
            ]);
        }
        assert_eq!(map.get::<u8>(0x20), 0xAB);
        assert_eq!(map.cursor(), 0x21);
    }
}
