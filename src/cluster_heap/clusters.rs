use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use super::cache::{ClusterCache, SingleCluster};
use crate::error::{DataError, Error};
use crate::fs::VolumeParameters;
use crate::io::{self, Wrapper};
use crate::types::ClusterID;

/// Sole gateway to raw image bytes
pub(crate) struct ClusterStore<IO, C = SingleCluster> {
    io: Wrapper<IO>,
    params: VolumeParameters,
    cache: C,
}

impl<E: Debug, IO: io::IO<Error = E>, C: ClusterCache> ClusterStore<IO, C> {
    pub fn new(io: Wrapper<IO>, params: VolumeParameters, cache: C) -> Self {
        Self { io, params, cache }
    }

    pub fn parameters(&self) -> &VolumeParameters {
        &self.params
    }

    pub fn into_inner(self) -> IO {
        self.io.into_inner()
    }

    /// Whole cluster content, served from cache when possible
    pub fn cluster(&mut self, cluster: ClusterID) -> Result<&[u8], Error<E>> {
        if self.cache.get(cluster).is_none() {
            let offset = self.params.cluster_offset(cluster)?;
            let mut bytes = vec![0u8; self.params.bytes_per_cluster() as usize];
            trace!("Load cluster {} at offset {:#x}", cluster, offset);
            self.io.read(offset, &mut bytes)?;
            self.cache.put(cluster, bytes);
        }
        let option = self.cache.get(cluster);
        option.ok_or(Error::Data(DataError::InvalidCluster(cluster.into())))
    }

    /// Data region bytes go through the cache one cluster at a time
    pub fn read(&mut self, offset: u64, length: usize) -> Result<Vec<u8>, Error<E>> {
        let cluster_size = self.params.bytes_per_cluster() as usize;
        let mut bytes = Vec::with_capacity(length);
        let mut cursor = offset;
        while bytes.len() < length {
            let remain = length - bytes.len();
            let (cluster, within) = match self.params.locate(cursor) {
                Some(location) => location,
                None => {
                    let start = bytes.len();
                    bytes.resize(length, 0);
                    self.io.read(cursor, &mut bytes[start..])?;
                    break;
                }
            };
            let size = core::cmp::min(remain, cluster_size - within);
            bytes.extend_from_slice(&self.cluster(cluster)?[within..within + size]);
            cursor += size as u64;
        }
        Ok(bytes)
    }

    /// Write through, cached data region bytes are patched in place
    pub fn write(&mut self, offset: u64, data: &[u8]) -> Result<(), Error<E>> {
        self.io.write(offset, data)?;
        let cluster_size = self.params.bytes_per_cluster() as usize;
        let (mut cursor, mut remain) = (offset, data);
        while !remain.is_empty() {
            let (cluster, within) = match self.params.locate(cursor) {
                Some(location) => location,
                None => break,
            };
            let length = core::cmp::min(remain.len(), cluster_size - within);
            if let Some(bytes) = self.cache.get_mut(cluster) {
                bytes[within..within + length].copy_from_slice(&remain[..length]);
            }
            cursor += length as u64;
            remain = &remain[length..];
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), Error<E>> {
        self.io.flush()
    }
}
