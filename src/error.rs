use core::fmt::Debug;

use displaydoc::Display;
use thiserror::Error;

/// On-disk structures that violate FAT32 invariants
#[derive(Copy, Clone, Debug, Display, Error, PartialEq, Eq)]
pub enum DataError {
    /// Invalid FAT32 volume geometry
    InvalidVolume,
    /// Cluster {0} does not address the data region
    InvalidCluster(u32),
    /// Cluster chain ends before declared size
    TruncatedChain,
    /// Directory entry vanished during removal
    RemovalIncomplete,
}

#[derive(Copy, Clone, Debug, Display, Error, PartialEq, Eq)]
pub enum OperationError {
    /// No such file or directory
    NotFound,
    /// Not a directory
    NotADirectory,
    /// Is a directory
    IsADirectory,
    /// Directory not empty
    NotEmpty,
    /// File or directory already exists
    AlreadyExists,
    /// No free directory slot in allocated clusters
    DirectoryFull,
}

#[derive(Copy, Clone, Debug, Display, Error, PartialEq, Eq)]
pub enum AllocationError {
    /// No free cluster left on volume
    NoFreeSpace,
}

#[derive(Copy, Clone, Debug, Display, Error, PartialEq, Eq)]
pub enum InputError {
    /// Invalid short name
    InvalidName,
}

#[derive(Debug, Display, Error, PartialEq, Eq)]
pub enum Error<E: Debug> {
    /// IO error: {0:?}
    IO(E),
    /// {0}
    Data(DataError),
    /// {0}
    Operation(OperationError),
    /// {0}
    Allocation(AllocationError),
    /// {0}
    Input(InputError),
}

macro_rules! from_category {
    ($variant:ident, $type:ty) => {
        impl<E: Debug> From<$type> for Error<E> {
            fn from(error: $type) -> Self {
                Self::$variant(error)
            }
        }
    };
}

from_category!(Data, DataError);
from_category!(Operation, OperationError);
from_category!(Allocation, AllocationError);
from_category!(Input, InputError);
