//! Payload types stored in the register map

use crate::registers::Register;

/// Sensors reported through the register map
///
/// The discriminant is the sensor's bit in SensorHealth and Calibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Sensor {
    Magnetometer = 0,
    Accelerometer = 1,
    Gyroscope = 2,
}

impl Sensor {
    /// All sensors in bit order
    pub const ALL: [Sensor; 3] = [Sensor::Magnetometer, Sensor::Accelerometer, Sensor::Gyroscope];

    /// Bitmask of this sensor in SensorHealth / Calibration
    pub const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// Register holding this sensor's raw vector
    pub const fn data_register(self) -> Register {
        match self {
            Sensor::Magnetometer => Register::RawMag,
            Sensor::Accelerometer => Register::RawAcc,
            Sensor::Gyroscope => Register::RawGyro,
        }
    }
}

/// Three-axis vector
///
/// Also carries Euler angles as (azimuth, pitch, roll) in (x, y, z).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    /// Size of the register image
    pub const SIZE: usize = 12;

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euler angles
    pub const fn euler(azimuth: f32, pitch: f32, roll: f32) -> Self {
        Self::new(azimuth, pitch, roll)
    }

    /// Native-endian register image: x, y, z
    pub fn to_ne_bytes(self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        for (chunk, v) in out.chunks_exact_mut(4).zip([self.x, self.y, self.z]) {
            chunk.copy_from_slice(&v.to_ne_bytes());
        }
        out
    }

    /// Decode a native-endian register image
    pub fn from_ne_bytes(bytes: [u8; Self::SIZE]) -> Self {
        let f = |i: usize| f32::from_ne_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]);
        Self::new(f(0), f(4), f(8))
    }
}

/// Orientation quaternion
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quaternion {
    /// Size of the register image
    pub const SIZE: usize = 16;

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Native-endian register image: x, y, z, w
    pub fn to_ne_bytes(self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        for (chunk, v) in out
            .chunks_exact_mut(4)
            .zip([self.x, self.y, self.z, self.w])
        {
            chunk.copy_from_slice(&v.to_ne_bytes());
        }
        out
    }

    /// Decode a native-endian register image
    pub fn from_ne_bytes(bytes: [u8; Self::SIZE]) -> Self {
        let f = |i: usize| f32::from_ne_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]);
        Self::new(f(0), f(4), f(8), f(12))
    }
}

const _: () = {
    assert!(Vector3::SIZE == Register::RawMag.len());
    assert!(Vector3::SIZE == Register::Euler.len());
    assert!(Quaternion::SIZE == Register::Quaternion.len());
};
