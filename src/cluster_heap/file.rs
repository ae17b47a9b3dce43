use alloc::vec::Vec;
use core::cmp::{max, min};
use core::fmt::Debug;

use crate::error::{DataError, Error};
use crate::region::data::DirectoryEntry;
use crate::types::ClusterID;
use crate::Fat32;

/// Read-only view of a regular file
pub struct File<'a, IO> {
    fs: &'a mut Fat32<IO>,
    entry: DirectoryEntry,
}

impl<'a, E: Debug, IO: crate::io::IO<Error = E>> File<'a, IO> {
    pub(crate) fn new(fs: &'a mut Fat32<IO>, entry: DirectoryEntry) -> Self {
        Self { fs, entry }
    }

    pub fn entry(&self) -> &DirectoryEntry {
        &self.entry
    }

    pub fn size(&self) -> u32 {
        self.entry.size()
    }

    /// Bytes in `[offset, offset + length)`, clamped to the declared size.
    ///
    /// A chain shorter than the clamped range fails with `TruncatedChain`.
    pub fn read_at(&mut self, offset: u32, length: u32) -> Result<Vec<u8>, Error<E>> {
        let start = offset as u64;
        let end = min(start + length as u64, self.size() as u64);
        if start >= end {
            return Ok(Vec::new());
        }
        let first = self.entry.first_cluster();
        if first == ClusterID::ROOT_ALIAS {
            warn!("File {} has size {} but no cluster", self.entry.name(), self.size());
            return Err(DataError::TruncatedChain.into());
        }

        let Fat32 { store, fat, .. } = &mut *self.fs;
        let cluster_size = store.parameters().bytes_per_cluster() as u64;
        let mut data = Vec::with_capacity((end - start) as usize);
        let mut position = 0u64;
        for cluster in fat.chain(first) {
            let cluster = cluster?;
            let cluster_end = position + cluster_size;
            if cluster_end > start {
                let bytes = store.cluster(cluster)?;
                let from = (max(start, position) - position) as usize;
                let to = (min(end, cluster_end) - position) as usize;
                data.extend_from_slice(&bytes[from..to]);
            }
            position = cluster_end;
            if position >= end {
                return Ok(data);
            }
        }
        warn!("Chain of {} ends at byte {} of {}", self.entry.name(), position, end);
        Err(DataError::TruncatedChain.into())
    }
}
