#[cfg(feature = "std")]
pub mod std;

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::error::Error;

/// Random access backing store holding a FAT32 volume
pub trait IO {
    type Error: Debug;

    /// Fill `buf` with bytes starting at `offset`
    fn read(&mut self, offset: u64, buf: &mut [u8]) -> Result<(), Self::Error>;
    fn write(&mut self, offset: u64, data: &[u8]) -> Result<(), Self::Error>;
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Access past the end of an in-memory image
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OutOfBounds {
    pub offset: u64,
    pub length: usize,
}

impl OutOfBounds {
    fn check(image: &[u8], offset: u64, length: usize) -> Result<core::ops::Range<usize>, Self> {
        let error = Self { offset, length };
        let start = usize::try_from(offset).map_err(|_| error)?;
        let end = start.checked_add(length).ok_or(error)?;
        if end > image.len() {
            return Err(error);
        }
        Ok(start..end)
    }
}

/// RAM image, never grows
impl IO for Vec<u8> {
    type Error = OutOfBounds;

    fn read(&mut self, offset: u64, buf: &mut [u8]) -> Result<(), Self::Error> {
        let range = OutOfBounds::check(self, offset, buf.len())?;
        buf.copy_from_slice(&self[range]);
        Ok(())
    }

    fn write(&mut self, offset: u64, data: &[u8]) -> Result<(), Self::Error> {
        let range = OutOfBounds::check(self, offset, data.len())?;
        self[range].copy_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

pub(crate) struct Wrapper<IO>(IO);

impl<E: Debug, T: IO<Error = E>> Wrapper<T> {
    pub fn new(io: T) -> Self {
        Self(io)
    }

    pub fn into_inner(self) -> T {
        self.0
    }

    pub fn read(&mut self, offset: u64, buf: &mut [u8]) -> Result<(), Error<E>> {
        self.0.read(offset, buf).map_err(|e| Error::IO(e))
    }

    pub fn write(&mut self, offset: u64, data: &[u8]) -> Result<(), Error<E>> {
        self.0.write(offset, data).map_err(|e| Error::IO(e))
    }

    pub fn flush(&mut self) -> Result<(), Error<E>> {
        self.0.flush().map_err(|e| Error::IO(e))
    }
}

#[cfg(test)]
mod test {
    use super::{OutOfBounds, IO};

    #[test]
    fn test_memory_bounds() {
        let mut image = vec![0u8; 16];
        image.write(12, &[1, 2, 3, 4]).unwrap();
        let mut buf = [0u8; 2];
        image.read(13, &mut buf).unwrap();
        assert_eq!(buf, [2, 3]);
        assert_eq!(image.write(14, &[0; 4]), Err(OutOfBounds { offset: 14, length: 4 }));
        assert_eq!(image.read(u64::MAX, &mut buf), Err(OutOfBounds { offset: u64::MAX, length: 2 }));
    }
}
