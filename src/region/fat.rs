use bitfield::bitfield;

use crate::types::ClusterID;

pub(crate) const ENTRY_SIZE: usize = 4;
pub(crate) const VALUE_MASK: u32 = 0x0FFF_FFFF;
pub(crate) const BAD_CLUSTER: u32 = 0x0FFF_FFF7;
pub(crate) const END_OF_CHAIN: u32 = 0x0FFF_FFFF;

bitfield! {
    /// FAT32 entries only use 28 bits, top nibble is reserved
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct RawEntry(u32);
    pub value, set_value: 27, 0;
    pub reserved, set_reserved: 31, 28;
}

impl RawEntry {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }
}

pub(crate) fn is_end_of_chain(value: u32) -> bool {
    (0x0FFF_FFF8..=END_OF_CHAIN).contains(&(value & VALUE_MASK))
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Entry {
    Free,
    Next(ClusterID),
    BadCluster,
    Last,
}

impl TryFrom<u32> for Entry {
    type Error = u32;
    fn try_from(value: u32) -> Result<Self, u32> {
        match value & VALUE_MASK {
            0 => Ok(Self::Free),
            next @ 2..=0x0FFF_FFEF => Ok(Self::Next(next.into())),
            BAD_CLUSTER => Ok(Self::BadCluster),
            value if is_end_of_chain(value) => Ok(Self::Last),
            value => Err(value),
        }
    }
}
