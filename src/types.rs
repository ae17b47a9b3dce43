use derive_more::{Display, From, Into};

#[derive(Copy, Clone, Debug, Default, Display, From, Into, Eq, Ord, PartialOrd, PartialEq)]
pub struct ClusterID(u32);

impl ClusterID {
    /// Legacy alias stored in ".." entries that point at the root directory
    pub const ROOT_ALIAS: Self = Self(0);
    pub const FIRST: Self = Self(2);

    /// Whether this cluster may address the data region
    pub fn valid(&self) -> bool {
        self.0 >= Self::FIRST.0
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn offset(self) -> u32 {
        self.0 - Self::FIRST.0
    }

    pub(crate) fn from_halves(high: u16, low: u16) -> Self {
        Self((high as u32) << 16 | low as u32)
    }

    pub(crate) fn high(self) -> u16 {
        (self.0 >> 16) as u16
    }

    pub(crate) fn low(self) -> u16 {
        self.0 as u16
    }
}

impl<I: Into<u32>> core::ops::Add<I> for ClusterID {
    type Output = Self;

    fn add(self, rhs: I) -> Self {
        Self(self.0 + rhs.into())
    }
}
