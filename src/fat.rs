use alloc::vec::Vec;
use core::fmt::Debug;

use crate::cluster_heap::cache::ClusterCache;
use crate::cluster_heap::clusters::ClusterStore;
use crate::endian::Little as LE;
use crate::error::{AllocationError, DataError, Error};
use crate::fs::VolumeParameters;
use crate::io::{self, Wrapper};
use crate::region::fat::{self, Entry, RawEntry, ENTRY_SIZE, VALUE_MASK};
use crate::types::ClusterID;

/// In-memory mirror of FAT copy #0, written through on every change
pub(crate) struct FatTable {
    entries: Vec<u32>,
    eoc_marker: u32,
    fat_count: u8,
}

impl FatTable {
    pub fn load<E: Debug, IO: io::IO<Error = E>>(
        io: &mut Wrapper<IO>,
        params: &VolumeParameters,
    ) -> Result<Self, Error<E>> {
        let mut bytes = alloc::vec![0u8; params.cluster_limit as usize * ENTRY_SIZE];
        io.read(params.fat_offset, &mut bytes)?;
        let entries: Vec<u32> = bytes
            .chunks_exact(ENTRY_SIZE)
            .map(LE::<u32>::from_slice)
            .collect();
        let reserved = entries.get(1).map_or(0, |&raw| raw & VALUE_MASK);
        let eoc_marker = match fat::is_end_of_chain(reserved) {
            true => reserved,
            false => {
                warn!("FAT[1] {:#010x} is not an end-of-chain marker, using default", reserved);
                fat::END_OF_CHAIN
            }
        };
        debug!("FAT loaded, {} entries, EOC marker {:#010x}", entries.len(), eoc_marker);
        Ok(Self { entries, eoc_marker, fat_count: params.fat_count })
    }

    pub fn eoc_marker(&self) -> u32 {
        self.eoc_marker
    }

    /// Number of addressable clusters, including the two reserved entries
    pub fn limit(&self) -> u32 {
        self.entries.len() as u32
    }

    /// Low 28 bits of the entry for `cluster`
    pub fn next_of(&self, cluster: ClusterID) -> Result<u32, DataError> {
        match self.entries.get(cluster.index()) {
            Some(&raw) if cluster.valid() => Ok(raw & VALUE_MASK),
            _ => Err(DataError::InvalidCluster(cluster.into())),
        }
    }

    pub fn is_end_of_chain(&self, value: u32) -> bool {
        fat::is_end_of_chain(value)
    }

    /// Chain successor, `None` once end of chain is reached
    pub fn successor(&self, cluster: ClusterID) -> Result<Option<ClusterID>, DataError> {
        let value = self.next_of(cluster)?;
        if self.is_end_of_chain(value) {
            return Ok(None);
        }
        match Entry::try_from(value) {
            Ok(Entry::Next(next)) if u32::from(next) < self.limit() => Ok(Some(next)),
            _ => {
                warn!("Cluster {} links to {:#010x}, chain is corrupted", cluster, value);
                Err(DataError::InvalidCluster(value))
            }
        }
    }

    pub fn chain(&self, start: ClusterID) -> Chain<'_> {
        Chain { fat: self, next: Some(Ok(start)), remaining: self.limit() }
    }

    /// Rewrites the low 28 bits in every FAT copy, reserved nibble untouched
    pub fn set_entry<E, IO, C>(
        &mut self,
        store: &mut ClusterStore<IO, C>,
        cluster: ClusterID,
        value: u32,
    ) -> Result<(), Error<E>>
    where
        E: Debug,
        IO: io::IO<Error = E>,
        C: ClusterCache,
    {
        let index = cluster.index();
        let current = match self.entries.get(index) {
            Some(&raw) if cluster.valid() => raw,
            _ => return Err(DataError::InvalidCluster(cluster.into()).into()),
        };
        let mut entry = RawEntry::new(current);
        entry.set_value(value & VALUE_MASK);
        let bytes = entry.raw().to_le_bytes();
        let params = *store.parameters();
        for copy in 0..self.fat_count {
            store.write(params.fat_entry_offset(copy, cluster), &bytes)?;
        }
        self.entries[index] = entry.raw();
        trace!("FAT[{}] {:#010x} -> {:#010x}", cluster, current, entry.raw());
        Ok(())
    }

    /// First-fit scan from cluster 2, claims the cluster as end of chain
    pub fn allocate_free<E, IO, C>(
        &mut self,
        store: &mut ClusterStore<IO, C>,
    ) -> Result<ClusterID, Error<E>>
    where
        E: Debug,
        IO: io::IO<Error = E>,
        C: ClusterCache,
    {
        let first = ClusterID::FIRST.index();
        let position = self.entries[first..].iter().position(|&raw| raw & VALUE_MASK == 0);
        let cluster = match position {
            Some(position) => ClusterID::from((first + position) as u32),
            None => return Err(AllocationError::NoFreeSpace.into()),
        };
        self.set_entry(store, cluster, self.eoc_marker)?;
        debug!("Allocated cluster {}", cluster);
        Ok(cluster)
    }

    /// Successor is taken before each entry is cleared
    pub fn free_chain<E, IO, C>(
        &mut self,
        store: &mut ClusterStore<IO, C>,
        start: ClusterID,
    ) -> Result<(), Error<E>>
    where
        E: Debug,
        IO: io::IO<Error = E>,
        C: ClusterCache,
    {
        let mut cluster = start;
        loop {
            // Already-cleared entries surface as corruption, so loops terminate
            let next = self.successor(cluster)?;
            self.set_entry(store, cluster, 0)?;
            match next {
                Some(next) => cluster = next,
                None => break,
            }
        }
        debug!("Released chain starting at cluster {}", start);
        Ok(())
    }
}

/// Clusters of a chain in order, bounded against cycles
pub(crate) struct Chain<'a> {
    fat: &'a FatTable,
    next: Option<Result<ClusterID, DataError>>,
    remaining: u32,
}

impl<'a> Iterator for Chain<'a> {
    type Item = Result<ClusterID, DataError>;

    fn next(&mut self) -> Option<Self::Item> {
        let cluster = match self.next.take()? {
            Ok(cluster) => cluster,
            Err(error) => return Some(Err(error)),
        };
        if self.remaining == 0 {
            warn!("Chain revisits cluster {}", cluster);
            return Some(Err(DataError::InvalidCluster(cluster.into())));
        }
        self.remaining -= 1;
        if !cluster.valid() || u32::from(cluster) >= self.fat.limit() {
            return Some(Err(DataError::InvalidCluster(cluster.into())));
        }
        self.next = self.fat.successor(cluster).transpose();
        Some(Ok(cluster))
    }
}

#[cfg(test)]
mod test {
    use super::FatTable;
    use crate::cluster_heap::cache::SingleCluster;
    use crate::cluster_heap::clusters::ClusterStore;
    use crate::error::{AllocationError, DataError, Error};
    use crate::io::{OutOfBounds, Wrapper};
    use crate::region::fat::END_OF_CHAIN;
    use crate::testing::ImageBuilder;
    use crate::types::ClusterID;

    fn load(builder: &ImageBuilder) -> (FatTable, ClusterStore<Vec<u8>>) {
        let params = builder.parameters();
        let mut io = Wrapper::new(builder.build());
        let fat = FatTable::load(&mut io, &params).unwrap();
        (fat, ClusterStore::new(io, params, SingleCluster::default()))
    }

    fn raw_entry(image: &[u8], offset: u64) -> u32 {
        let offset = offset as usize;
        u32::from_le_bytes(image[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn test_chain() {
        let mut builder = ImageBuilder::new(512, 1);
        builder.chain(&[3, 9, 4]);
        let (fat, _) = load(&builder);
        let clusters: Result<Vec<_>, _> = fat.chain(3.into()).collect();
        assert_eq!(clusters.unwrap(), vec![3.into(), 9.into(), 4.into()]);
        assert_eq!(fat.next_of(3.into()), Ok(9));
        assert!(fat.is_end_of_chain(fat.next_of(4.into()).unwrap()));
        assert_eq!(fat.next_of(0.into()), Err(DataError::InvalidCluster(0)));
    }

    #[test]
    fn test_chain_cycle() {
        let mut builder = ImageBuilder::new(512, 1);
        builder.set_fat(3, 4);
        builder.set_fat(4, 3);
        let (fat, _) = load(&builder);
        let result: Result<Vec<_>, _> = fat.chain(3.into()).collect();
        assert!(matches!(result, Err(DataError::InvalidCluster(_))));
    }

    #[test]
    fn test_eoc_marker_fallback() {
        let mut builder = ImageBuilder::new(512, 1);
        builder.set_fat(1, 0x0FFF_FFF8);
        assert_eq!(load(&builder).0.eoc_marker(), 0x0FFF_FFF8);
        builder.set_fat(1, 0x0800_0000);
        assert_eq!(load(&builder).0.eoc_marker(), END_OF_CHAIN);
    }

    #[test]
    fn test_allocate_first_fit() {
        let mut builder = ImageBuilder::new(512, 1);
        builder.chain(&[3, 4]);
        builder.set_fat(6, 0xA000_0000);
        let (mut fat, mut store) = load(&builder);
        assert_eq!(fat.allocate_free(&mut store).unwrap(), ClusterID::from(5));
        assert_eq!(fat.allocate_free(&mut store).unwrap(), ClusterID::from(6));
        let params = *store.parameters();
        let image = store.into_inner();
        for copy in 0..params.fat_count {
            assert_eq!(raw_entry(&image, params.fat_entry_offset(copy, 5.into())), END_OF_CHAIN);
            assert_eq!(raw_entry(&image, params.fat_entry_offset(copy, 6.into())), 0xAFFF_FFFF);
        }
    }

    #[test]
    fn test_no_free_space() {
        let mut builder = ImageBuilder::new(512, 1);
        let limit = builder.parameters().cluster_limit;
        for cluster in 3..limit {
            builder.set_fat(cluster, END_OF_CHAIN);
        }
        let (mut fat, mut store) = load(&builder);
        let result = fat.allocate_free(&mut store);
        assert_eq!(result, Err(Error::<OutOfBounds>::Allocation(AllocationError::NoFreeSpace)));
    }

    #[test]
    fn test_free_chain_preserves_reserved() {
        let mut builder = ImageBuilder::new(512, 1);
        builder.chain(&[7, 8, 12]);
        builder.set_fat(8, 0xA000_000C);
        let (mut fat, mut store) = load(&builder);
        fat.free_chain(&mut store, 7.into()).unwrap();
        for cluster in [7u32, 8, 12] {
            assert_eq!(fat.next_of(cluster.into()), Ok(0));
        }
        let params = *store.parameters();
        let image = store.into_inner();
        for copy in 0..params.fat_count {
            assert_eq!(raw_entry(&image, params.fat_entry_offset(copy, 8.into())), 0xA000_0000);
            assert_eq!(raw_entry(&image, params.fat_entry_offset(copy, 7.into())), 0);
        }
    }

    #[test]
    fn test_free_broken_chain() {
        let mut builder = ImageBuilder::new(512, 1);
        builder.set_fat(3, 5);
        let (mut fat, mut store) = load(&builder);
        let result = fat.free_chain(&mut store, 3.into());
        assert_eq!(result, Err(Error::Data(DataError::InvalidCluster(0))));
        // cluster 3 was released before the broken link surfaced
        assert_eq!(fat.next_of(3.into()), Ok(0));
    }
}
