// FAT32 boot sector, BIOS parameter block plus extended boot record

use hex_literal::hex;

use crate::endian::Little as LE;

pub(crate) const BOOT_SECTOR_SIZE: usize = 512;

#[derive(Copy, Clone, Debug)]
#[repr(C, packed(1))]
pub(crate) struct BootSector {
    pub jump_boot: [u8; 3],
    pub oem_name: [u8; 8],
    pub bytes_per_sector: LE<u16>,
    pub sectors_per_cluster: u8,
    pub reserved_sector_count: LE<u16>,
    pub number_of_fats: u8,
    pub root_entry_count: LE<u16>, // 0 on FAT32
    pub total_sectors_16: LE<u16>,
    pub media: u8,
    pub sectors_per_fat_16: LE<u16>, // 0 on FAT32
    pub sectors_per_track: LE<u16>,
    pub number_of_heads: LE<u16>,
    pub hidden_sectors: LE<u32>,
    pub total_sectors_32: LE<u32>,
    pub sectors_per_fat_32: LE<u32>,
    pub extended_flags: LE<u16>,
    pub filesystem_version: LE<u16>,
    pub root_cluster: LE<u32>,
    pub fsinfo_sector: LE<u16>,
    pub backup_boot_sector: LE<u16>,
    _reserved: [u8; 12],
    pub drive_number: u8,
    _reserved1: u8,
    pub boot_signature: u8,
    pub volume_id: LE<u32>,
    pub volume_label: [u8; 11],
    pub filesystem_type: [u8; 8],
    pub bootcode: [u8; 420],
    pub signature: [u8; 2],
}

impl BootSector {
    pub fn from_bytes(bytes: &[u8; BOOT_SECTOR_SIZE]) -> Self {
        unsafe { core::mem::transmute(*bytes) }
    }

    pub fn has_signature(&self) -> bool {
        self.signature == hex!("55 AA")
    }

    /// Total sector count, 16-bit field takes precedence when set
    pub fn total_sectors(&self) -> u32 {
        match self.total_sectors_16.to_ne() {
            0 => self.total_sectors_32.to_ne(),
            sectors => sectors as u32,
        }
    }
}
