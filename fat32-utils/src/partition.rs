use fat32::io::std::FileIO;
use fat32::io::IO;
use mbr_nostd::{MasterBootRecord, PartitionTable};

use crate::MountError;

const SECTOR_SIZE: u64 = 512;

/// Byte offset of the N-th primary partition
pub fn offset(io: &mut FileIO, index: usize) -> Result<u64, MountError> {
    let mut buffer = [0u8; SECTOR_SIZE as usize];
    io.read(0, &mut buffer)?;
    let mbr = MasterBootRecord::from_bytes(&buffer).map_err(|_| MountError::Partition("Not MBR"))?;
    let entries = mbr.partition_table_entries();
    let entry = entries.get(index).ok_or(MountError::Partition("Partition out of range"))?;
    if entry.sector_count == 0 {
        return Err(MountError::Partition("Invalid partition"));
    }
    let offset = entry.logical_block_address as u64 * SECTOR_SIZE;
    debug!("Partition {} at offset {:#x}, {} sectors", index, offset, entry.sector_count);
    Ok(offset)
}
