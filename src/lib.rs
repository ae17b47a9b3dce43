#![doc = include_str!("../README.md")]
#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

extern crate heapless;
#[macro_use]
extern crate log;

mod cluster_heap;
mod endian;
pub mod error;
mod fat;
pub(crate) mod fs;
pub mod io;
mod region;
pub mod session;
#[cfg(test)]
mod testing;
pub mod types;

use core::fmt::Debug;

use cluster_heap::cache::SingleCluster;
use cluster_heap::clusters::ClusterStore;
pub use cluster_heap::directory::{Directory, Listing};
pub use cluster_heap::file::File;
use error::Error;
use fat::FatTable;
pub use fs::VolumeParameters;
use io::Wrapper;
use region::boot::{BootSector, BOOT_SECTOR_SIZE};
pub use region::data::attributes::Attributes;
pub use region::data::timestamp::{DateTime, Timestamp};
pub use region::data::{DirectoryEntry, Label};
pub use session::Session;
use types::ClusterID;

/// A mounted FAT32 volume
pub struct Fat32<IO> {
    pub(crate) store: ClusterStore<IO>,
    pub(crate) fat: FatTable,
}

impl<E: Debug, IO: io::IO<Error = E>> Fat32<IO> {
    /// Mount, geometry and the FAT mirror are loaded once here
    pub fn new(io: IO) -> Result<Self, Error<E>> {
        let mut io = Wrapper::new(io);
        let mut bytes = [0u8; BOOT_SECTOR_SIZE];
        io.read(0, &mut bytes)?;
        let boot_sector = BootSector::from_bytes(&bytes);
        if !boot_sector.has_signature() {
            warn!("Boot sector signature missing");
        }
        let mut params = VolumeParameters::new(&boot_sector)?;
        debug!("Volume parameters: {:?}", params);

        let fat = FatTable::load(&mut io, &params)?;
        params.eoc_marker = fat.eoc_marker();
        let store = ClusterStore::new(io, params, SingleCluster::default());
        debug!("Root directory on cluster {}", params.root_cluster);
        Ok(Self { store, fat })
    }

    pub fn parameters(&self) -> &VolumeParameters {
        self.store.parameters()
    }

    pub fn root_directory(&mut self) -> Directory<'_, IO> {
        let root = self.parameters().root_cluster;
        Directory::new(self, root)
    }

    /// Directory starting at `cluster`, stored 0 stands for root
    pub fn directory(&mut self, cluster: ClusterID) -> Directory<'_, IO> {
        Directory::new(self, cluster)
    }

    pub fn volume_label(&mut self) -> Result<Option<Label>, Error<E>> {
        self.root_directory().label()
    }

    pub fn into_io(self) -> IO {
        self.store.into_inner()
    }
}

#[cfg(test)]
mod test {
    use super::Fat32;
    use crate::error::{DataError, Error};
    use crate::region::fat::END_OF_CHAIN;
    use crate::testing::{boot_sector_bytes, short_entry, ImageBuilder};

    #[test]
    fn test_mount() {
        let mut builder = ImageBuilder::new(512, 4);
        builder.set_fat(1, 0x0FFF_FFF8);
        let fs = builder.mount();
        let params = fs.parameters();
        assert_eq!(params.bytes_per_cluster(), 2048);
        assert_eq!(u32::from(params.root_cluster), 2);
        assert_eq!(params.eoc_marker, 0x0FFF_FFF8);
    }

    #[test]
    fn test_mount_dirty_eoc() {
        let mut builder = ImageBuilder::new(512, 1);
        builder.set_fat(1, 0x0400_0000);
        assert_eq!(builder.mount().parameters().eoc_marker, END_OF_CHAIN);
    }

    #[test]
    fn test_invalid_volume() {
        let mut image = vec![0u8; 64 * 1024];
        let result = Fat32::new(image.clone()).map(|_| ());
        assert_eq!(result, Err(Error::Data(DataError::InvalidVolume)));
        image[..512].copy_from_slice(&boot_sector_bytes(512, 0, 32, 2, 1, 2, 128));
        let result = Fat32::new(image).map(|_| ());
        assert_eq!(result, Err(Error::Data(DataError::InvalidVolume)));
    }

    #[test]
    fn test_volume_label() {
        let mut builder = ImageBuilder::new(512, 1);
        assert_eq!(builder.mount().volume_label().unwrap(), None);
        builder.put_slot(2, 0, short_entry(b"FAT32 IMG  ", 0x08, 0, 0));
        let label = builder.mount().volume_label().unwrap();
        assert_eq!(label.as_deref(), Some("FAT32 IMG"));
    }
}
