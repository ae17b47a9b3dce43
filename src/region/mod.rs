/// Boot region, volume geometry parameters
/// (reserved sectors, boot sector at sector 0)
pub(crate) mod boot;

/// FAT region, [`number-of-fats`][link] copies of
/// [`sectors-per-fat`][link] sectors each
///
/// [link]: boot::BootSector
pub(crate) mod fat;

/// Data region, directory entries
pub(crate) mod data;
