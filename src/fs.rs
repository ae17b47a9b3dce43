use crate::error::DataError;
use crate::region::boot::BootSector;
use crate::region::{data, fat};
use crate::types::ClusterID;

/// Immutable volume geometry, computed once at mount
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VolumeParameters {
    pub bytes_per_sector: u16,
    pub sectors_per_cluster: u8,
    pub reserved_sector_count: u16,
    pub fat_count: u8,
    pub sectors_per_fat: u32,
    pub root_cluster: ClusterID,
    pub eoc_marker: u32,
    pub fat_offset: u64,
    pub data_offset: u64,
    /// One past the highest cluster backed by both FAT and data region
    pub cluster_limit: u32,
}

impl VolumeParameters {
    pub(crate) fn new(boot_sector: &BootSector) -> Result<Self, DataError> {
        let bytes_per_sector = boot_sector.bytes_per_sector.to_ne();
        let sectors_per_cluster = boot_sector.sectors_per_cluster;
        let reserved_sector_count = boot_sector.reserved_sector_count.to_ne();
        let fat_count = boot_sector.number_of_fats;
        let sectors_per_fat = boot_sector.sectors_per_fat_32.to_ne();
        let root_cluster = ClusterID::from(boot_sector.root_cluster.to_ne());
        if bytes_per_sector == 0 || sectors_per_cluster == 0 {
            return Err(DataError::InvalidVolume);
        }
        // room for "." and ".." in a fresh directory cluster
        if (bytes_per_sector as usize * sectors_per_cluster as usize) < 2 * data::ENTRY_SIZE {
            return Err(DataError::InvalidVolume);
        }
        if fat_count == 0 || sectors_per_fat == 0 || !root_cluster.valid() {
            return Err(DataError::InvalidVolume);
        }

        let sector_size = bytes_per_sector as u64;
        let fat_offset = reserved_sector_count as u64 * sector_size;
        let fat_length = sectors_per_fat as u64 * sector_size;
        let data_offset = fat_offset + fat_count as u64 * fat_length;

        let fat_entries = fat_length / fat::ENTRY_SIZE as u64;
        let mut cluster_limit = core::cmp::min(fat_entries, fat::VALUE_MASK as u64 + 1);
        let total_sectors = boot_sector.total_sectors() as u64;
        if total_sectors > 0 {
            let data_sectors = (total_sectors * sector_size).saturating_sub(data_offset) / sector_size;
            let data_clusters = data_sectors / sectors_per_cluster as u64;
            cluster_limit = core::cmp::min(cluster_limit, data_clusters + 2);
        }
        if root_cluster.index() as u64 >= cluster_limit {
            return Err(DataError::InvalidVolume);
        }
        Ok(Self {
            bytes_per_sector,
            sectors_per_cluster,
            reserved_sector_count,
            fat_count,
            sectors_per_fat,
            root_cluster,
            eoc_marker: fat::END_OF_CHAIN,
            fat_offset,
            data_offset,
            cluster_limit: cluster_limit as u32,
        })
    }

    pub fn bytes_per_cluster(&self) -> u32 {
        self.sectors_per_cluster as u32 * self.bytes_per_sector as u32
    }

    pub fn fat_length(&self) -> u64 {
        self.sectors_per_fat as u64 * self.bytes_per_sector as u64
    }

    /// Entries per cluster of a directory
    pub(crate) fn slots_per_cluster(&self) -> usize {
        self.bytes_per_cluster() as usize / data::ENTRY_SIZE
    }

    /// Stored cluster 0 stands for root
    pub fn resolve(&self, cluster: ClusterID) -> ClusterID {
        match cluster {
            ClusterID::ROOT_ALIAS => self.root_cluster,
            cluster => cluster,
        }
    }

    /// Absolute byte offset of a data cluster, aliases must be resolved beforehand
    pub fn cluster_offset(&self, cluster: ClusterID) -> Result<u64, DataError> {
        if !cluster.valid() || u32::from(cluster) >= self.cluster_limit {
            return Err(DataError::InvalidCluster(cluster.into()));
        }
        Ok(self.data_offset + cluster.offset() as u64 * self.bytes_per_cluster() as u64)
    }

    /// Inverse of [`cluster_offset`](Self::cluster_offset), with offset within cluster
    pub(crate) fn locate(&self, offset: u64) -> Option<(ClusterID, usize)> {
        let relative = offset.checked_sub(self.data_offset)?;
        let cluster_size = self.bytes_per_cluster() as u64;
        let cluster = ClusterID::FIRST + (relative / cluster_size) as u32;
        if u32::from(cluster) >= self.cluster_limit {
            return None;
        }
        Some((cluster, (relative % cluster_size) as usize))
    }

    pub(crate) fn fat_entry_offset(&self, copy: u8, cluster: ClusterID) -> u64 {
        self.fat_offset + copy as u64 * self.fat_length() + (cluster.index() * fat::ENTRY_SIZE) as u64
    }
}

#[cfg(test)]
mod test {
    use super::VolumeParameters;
    use crate::error::DataError;
    use crate::region::boot::BootSector;
    use crate::testing::boot_sector_bytes;
    use crate::types::ClusterID;

    fn parameters(bytes_per_sector: u16, sectors_per_cluster: u8) -> Result<VolumeParameters, DataError> {
        let bytes = boot_sector_bytes(bytes_per_sector, sectors_per_cluster, 32, 2, 16, 2, 65536);
        VolumeParameters::new(&BootSector::from_bytes(&bytes))
    }

    #[test]
    fn test_geometry() {
        let params = parameters(512, 4).unwrap();
        assert_eq!(params.bytes_per_cluster(), 2048);
        assert_eq!(params.fat_offset, 32 * 512);
        assert_eq!(params.data_offset, (32 + 2 * 16) * 512);
        assert_eq!(params.cluster_limit, 16 * 512 / 4);
        assert_eq!(params.cluster_offset(ClusterID::FIRST), Ok(params.data_offset));
        assert_eq!(params.cluster_offset(5.into()), Ok(params.data_offset + 3 * 2048));
        assert_eq!(params.locate(params.data_offset + 3 * 2048 + 17), Some((5.into(), 17)));
        assert_eq!(params.locate(params.fat_offset), None);
        assert_eq!(params.resolve(ClusterID::ROOT_ALIAS), ClusterID::FIRST);
        assert_eq!(params.fat_entry_offset(1, 3.into()), params.fat_offset + 16 * 512 + 12);
    }

    #[test]
    fn test_invalid_cluster() {
        let params = parameters(512, 1).unwrap();
        assert_eq!(params.cluster_offset(0.into()), Err(DataError::InvalidCluster(0)));
        assert_eq!(params.cluster_offset(1.into()), Err(DataError::InvalidCluster(1)));
        let limit = params.cluster_limit;
        assert_eq!(params.cluster_offset(limit.into()), Err(DataError::InvalidCluster(limit)));
    }

    #[test]
    fn test_zero_divisor() {
        assert_eq!(parameters(0, 1), Err(DataError::InvalidVolume));
        assert_eq!(parameters(512, 0), Err(DataError::InvalidVolume));
    }
}
