//! Plain values stored in the register map

/// A value with a fixed native-endian byte image
pub trait RegisterValue: Copy {
    /// Bytes occupied in the address space
    const SIZE: usize;

    /// Decode from exactly `SIZE` bytes
    fn from_image(bytes: &[u8]) -> Self;

    /// Encode into exactly `SIZE` bytes
    fn write_image(self, bytes: &mut [u8]);
}

macro_rules! impl_register_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl RegisterValue for $ty {
                const SIZE: usize = core::mem::size_of::<$ty>();

                fn from_image(bytes: &[u8]) -> Self {
                    let mut image = [0u8; core::mem::size_of::<$ty>()];
                    image.copy_from_slice(bytes);
                    <$ty>::from_ne_bytes(image)
                }

                fn write_image(self, bytes: &mut [u8]) {
                    bytes.copy_from_slice(&self.to_ne_bytes());
                }
            }
        )*
    };
}

impl_register_value!(u8, i8, u16, i16, u32, i32, f32);
