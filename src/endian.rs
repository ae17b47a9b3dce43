use core::fmt::Debug;

/// Little endian integer as laid out on disk, safe to embed in packed structs
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
#[repr(transparent)]
pub struct Little<T: Copy + Default + Debug + PartialEq + Eq>(T);

macro_rules! define {
    ($type:ty) => {
        impl Little<$type> {
            #[inline]
            pub fn to_ne(self) -> $type {
                <$type>::from_le(self.0)
            }

            #[inline]
            pub fn from_slice(bytes: &[u8]) -> $type {
                let mut array = [0u8; core::mem::size_of::<$type>()];
                array.copy_from_slice(&bytes[..core::mem::size_of::<$type>()]);
                <$type>::from_le_bytes(array)
            }
        }

        impl From<$type> for Little<$type> {
            #[inline]
            fn from(t: $type) -> Self {
                Self(<$type>::to_le(t))
            }
        }
    };
}

define!(u16);
define!(u32);
