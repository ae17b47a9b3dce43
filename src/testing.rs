//! In-memory FAT32 images for unit tests

use crate::fs::VolumeParameters;
use crate::region::boot::{BootSector, BOOT_SECTOR_SIZE};
use crate::region::data::ENTRY_SIZE;
use crate::region::fat::END_OF_CHAIN;
use crate::Fat32;

const RESERVED_SECTORS: u16 = 32;
const FAT_COUNT: u8 = 2;
const DATA_CLUSTERS: u32 = 64;

pub(crate) fn boot_sector_bytes(
    bytes_per_sector: u16,
    sectors_per_cluster: u8,
    reserved_sectors: u16,
    fat_count: u8,
    sectors_per_fat: u32,
    root_cluster: u32,
    total_sectors: u32,
) -> [u8; BOOT_SECTOR_SIZE] {
    let mut bytes = [0u8; BOOT_SECTOR_SIZE];
    bytes[..3].copy_from_slice(&[0xEB, 0x58, 0x90]);
    bytes[3..11].copy_from_slice(b"MSWIN4.1");
    bytes[11..13].copy_from_slice(&bytes_per_sector.to_le_bytes());
    bytes[13] = sectors_per_cluster;
    bytes[14..16].copy_from_slice(&reserved_sectors.to_le_bytes());
    bytes[16] = fat_count;
    bytes[21] = 0xF8;
    bytes[32..36].copy_from_slice(&total_sectors.to_le_bytes());
    bytes[36..40].copy_from_slice(&sectors_per_fat.to_le_bytes());
    bytes[44..48].copy_from_slice(&root_cluster.to_le_bytes());
    bytes[66] = 0x29;
    bytes[71..82].copy_from_slice(b"NO NAME    ");
    bytes[82..90].copy_from_slice(b"FAT32   ");
    bytes[510..].copy_from_slice(&[0x55, 0xAA]);
    bytes
}

/// 32-byte short entry with 8.3 name already space padded
pub(crate) fn short_entry(name: &[u8; 11], attributes: u8, cluster: u32, size: u32) -> [u8; ENTRY_SIZE] {
    let mut bytes = [0u8; ENTRY_SIZE];
    bytes[..11].copy_from_slice(name);
    bytes[11] = attributes;
    bytes[20..22].copy_from_slice(&((cluster >> 16) as u16).to_le_bytes());
    bytes[26..28].copy_from_slice(&(cluster as u16).to_le_bytes());
    bytes[28..32].copy_from_slice(&size.to_le_bytes());
    bytes
}

/// Freshly formatted volume with an empty root directory on cluster 2
pub(crate) struct ImageBuilder {
    image: Vec<u8>,
    params: VolumeParameters,
}

impl ImageBuilder {
    pub fn new(bytes_per_sector: u16, sectors_per_cluster: u8) -> Self {
        let entries_per_sector = bytes_per_sector as u32 / 4;
        let sectors_per_fat = (DATA_CLUSTERS + 2).div_ceil(entries_per_sector);
        let fat_sectors = FAT_COUNT as u32 * sectors_per_fat;
        let data_sectors = DATA_CLUSTERS * sectors_per_cluster as u32;
        let total_sectors = RESERVED_SECTORS as u32 + fat_sectors + data_sectors;
        let boot_sector = boot_sector_bytes(
            bytes_per_sector,
            sectors_per_cluster,
            RESERVED_SECTORS,
            FAT_COUNT,
            sectors_per_fat,
            2,
            total_sectors,
        );
        let params = VolumeParameters::new(&BootSector::from_bytes(&boot_sector)).unwrap();
        let mut image = vec![0u8; total_sectors as usize * bytes_per_sector as usize];
        image[..BOOT_SECTOR_SIZE].copy_from_slice(&boot_sector);
        let mut builder = Self { image, params };
        builder.set_fat(0, 0x0FFF_FFF8);
        builder.set_fat(1, END_OF_CHAIN);
        builder.set_fat(2, END_OF_CHAIN);
        builder
    }

    pub fn parameters(&self) -> VolumeParameters {
        self.params
    }

    /// Raw entry in every FAT copy
    pub fn set_fat(&mut self, cluster: u32, raw: u32) {
        for copy in 0..self.params.fat_count {
            let offset = self.params.fat_entry_offset(copy, cluster.into()) as usize;
            self.image[offset..offset + 4].copy_from_slice(&raw.to_le_bytes());
        }
    }

    pub fn chain(&mut self, clusters: &[u32]) {
        for pair in clusters.windows(2) {
            self.set_fat(pair[0], pair[1]);
        }
        if let Some(&last) = clusters.last() {
            self.set_fat(last, END_OF_CHAIN);
        }
    }

    pub fn put_slot(&mut self, cluster: u32, index: usize, slot: [u8; ENTRY_SIZE]) {
        let offset = self.params.cluster_offset(cluster.into()).unwrap() as usize + index * ENTRY_SIZE;
        self.image[offset..offset + ENTRY_SIZE].copy_from_slice(&slot);
    }

    /// Spread `data` over `clusters` in order
    pub fn put_data(&mut self, clusters: &[u32], data: &[u8]) {
        let cluster_size = self.params.bytes_per_cluster() as usize;
        for (&cluster, chunk) in clusters.iter().zip(data.chunks(cluster_size)) {
            let offset = self.params.cluster_offset(cluster.into()).unwrap() as usize;
            self.image[offset..offset + chunk.len()].copy_from_slice(chunk);
        }
    }

    pub fn build(&self) -> Vec<u8> {
        self.image.clone()
    }

    pub fn mount(&self) -> Fat32<Vec<u8>> {
        Fat32::new(self.build()).unwrap()
    }
}
