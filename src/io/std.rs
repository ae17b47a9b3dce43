use std::fs;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Any seekable byte stream, typically a disk image file
#[derive(Debug)]
pub struct FileIO<F = fs::File> {
    file: F,
    base: u64,
}

impl FileIO {
    /// Open image for both read and write
    pub fn open<P: AsRef<Path>>(filepath: P) -> std::io::Result<Self> {
        let file = fs::File::options().read(true).write(true).open(filepath)?;
        Ok(Self::new(file))
    }
}

impl<F: Read + Write + Seek> FileIO<F> {
    pub fn new(file: F) -> Self {
        Self { file, base: 0 }
    }

    /// Shift every access, used to mount a partition inside a whole-disk image
    pub fn set_base(&mut self, base: u64) {
        self.base = base;
    }

    pub fn into_inner(self) -> F {
        self.file
    }
}

impl<F: Read + Write + Seek> super::IO for FileIO<F> {
    type Error = std::io::Error;

    fn read(&mut self, offset: u64, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.file.seek(SeekFrom::Start(self.base + offset))?;
        self.file.read_exact(buf)
    }

    fn write(&mut self, offset: u64, data: &[u8]) -> Result<(), Self::Error> {
        self.file.seek(SeekFrom::Start(self.base + offset))?;
        self.file.write_all(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.file.flush()
    }
}
