//! Named register accessors
//!
//! Sensor and application code updates the register map through these
//! instead of raw offsets.

use bluebus_protocol::{
    Quaternion, Register, Sensor, Vector3, GEN_BUF_COUNT, GEN_BUF_LEN, GEN_FLOAT_COUNT,
    OPERATION_OPERATE, OPERATION_RESET,
};

use super::RegisterMap;

impl RegisterMap {
    fn byte(&self, register: Register) -> u8 {
        self.get(register.offset())
    }

    fn set_bit(&mut self, register: Register, mask: u8, on: bool) {
        let value = self.byte(register);
        let value = if on { value | mask } else { value & !mask };
        self.set(register.offset(), value);
    }

    pub fn who_am_i(&self) -> u8 {
        self.byte(Register::WhoAmI)
    }

    /// Whether the master has requested a reset
    pub fn should_reset(&self) -> bool {
        self.byte(Register::Operation) & OPERATION_RESET != 0
    }

    /// Acknowledge a reset request
    pub fn clear_reset(&mut self) {
        self.set_bit(Register::Operation, OPERATION_RESET, false);
    }

    /// Whether the master has enabled operation
    pub fn should_operate(&self) -> bool {
        self.byte(Register::Operation) & OPERATION_OPERATE != 0
    }

    /// Whether the master has asked for `sensor` to be calibrated
    pub fn should_calibrate(&self, sensor: Sensor) -> bool {
        self.byte(Register::Calibration) & sensor.bit() != 0
    }

    pub fn set_calibrating(&mut self, sensor: Sensor, calibrating: bool) {
        self.set_bit(Register::Calibration, sensor.bit(), calibrating);
    }

    /// Set or clear the health bit of `sensor`, leaving the others alone
    pub fn update_sensor_health(&mut self, sensor: Sensor, healthy: bool) {
        self.set_bit(Register::SensorHealth, sensor.bit(), healthy);
    }

    pub fn sensor_healthy(&self, sensor: Sensor) -> bool {
        self.byte(Register::SensorHealth) & sensor.bit() != 0
    }

    pub fn set_battery(&mut self, level: u8) {
        self.set(Register::Battery.offset(), level);
    }

    pub fn battery(&self) -> u8 {
        self.byte(Register::Battery)
    }

    /// Store a raw sample for `sensor`
    pub fn update_sensor_data(&mut self, sensor: Sensor, sample: Vector3) {
        self.region_mut(sensor.data_register())
            .copy_from_slice(&sample.to_ne_bytes());
    }

    pub fn sensor_data(&self, sensor: Sensor) -> Vector3 {
        self.vector(sensor.data_register())
    }

    /// Store Euler angles as (azimuth, pitch, roll)
    pub fn update_euler(&mut self, angles: Vector3) {
        self.region_mut(Register::Euler)
            .copy_from_slice(&angles.to_ne_bytes());
    }

    pub fn euler(&self) -> Vector3 {
        self.vector(Register::Euler)
    }

    pub fn update_quaternion(&mut self, q: Quaternion) {
        self.region_mut(Register::Quaternion)
            .copy_from_slice(&q.to_ne_bytes());
    }

    pub fn quaternion(&self) -> Quaternion {
        let mut image = [0u8; Quaternion::SIZE];
        image.copy_from_slice(self.region(Register::Quaternion));
        Quaternion::from_ne_bytes(image)
    }

    /// Store general-purpose float `index`
    ///
    /// # Panics
    ///
    /// If `index` is not below [`GEN_FLOAT_COUNT`].
    pub fn update_general_float(&mut self, index: usize, value: f32) {
        let offset = Self::general_float_offset(index);
        self.set(offset, value);
    }

    /// # Panics
    ///
    /// If `index` is not below [`GEN_FLOAT_COUNT`].
    pub fn general_float(&self, index: usize) -> f32 {
        self.get(Self::general_float_offset(index))
    }

    /// Store general-purpose buffer `index`
    ///
    /// # Panics
    ///
    /// If `index` is not below [`GEN_BUF_COUNT`].
    pub fn update_general_buffer(&mut self, index: usize, data: &[u8; GEN_BUF_LEN]) {
        let start = Self::general_buffer_start(index);
        self.region_mut(Register::GenBufs)[start..start + GEN_BUF_LEN].copy_from_slice(data);
    }

    /// # Panics
    ///
    /// If `index` is not below [`GEN_BUF_COUNT`].
    pub fn general_buffer(&self, index: usize) -> [u8; GEN_BUF_LEN] {
        let start = Self::general_buffer_start(index);
        let mut out = [0u8; GEN_BUF_LEN];
        out.copy_from_slice(&self.region(Register::GenBufs)[start..start + GEN_BUF_LEN]);
        out
    }

    fn vector(&self, register: Register) -> Vector3 {
        let mut image = [0u8; Vector3::SIZE];
        image.copy_from_slice(self.region(register));
        Vector3::from_ne_bytes(image)
    }

    fn general_float_offset(index: usize) -> u8 {
        assert!(index < GEN_FLOAT_COUNT, "general float {} out of range", index);
        Register::GenFloats.offset() + (index * 4) as u8
    }

    fn general_buffer_start(index: usize) -> usize {
        assert!(index < GEN_BUF_COUNT, "general buffer {} out of range", index);
        index * GEN_BUF_LEN
    }
}
