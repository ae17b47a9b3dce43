use core::fmt::Debug;

use crate::cluster_heap::cache::ClusterCache;
use crate::cluster_heap::clusters::ClusterStore;
use crate::error::{DataError, Error};
use crate::fat::{Chain, FatTable};
use crate::fs::VolumeParameters;
use crate::region::data::{RawSlot, ENTRY_SIZE};
use crate::types::ClusterID;

/// Position of a slot within a directory chain
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct SlotRef {
    pub cluster: ClusterID,
    pub index: usize,
}

impl SlotRef {
    pub fn offset(&self, params: &VolumeParameters) -> Result<u64, DataError> {
        Ok(params.cluster_offset(self.cluster)? + (self.index * ENTRY_SIZE) as u64)
    }

    /// Slot that follows within the same cluster
    pub fn successor(&self, params: &VolumeParameters) -> Option<Self> {
        let index = self.index + 1;
        match index < params.slots_per_cluster() {
            true => Some(Self { cluster: self.cluster, index }),
            false => None,
        }
    }
}

/// Raw 32-byte slots of a directory in chain order, end-of-directory included
pub(crate) struct SlotIter<'a, IO, C> {
    store: &'a mut ClusterStore<IO, C>,
    chain: Chain<'a>,
    cluster: Option<ClusterID>,
    index: usize,
    slots_per_cluster: usize,
}

impl<'a, E: Debug, IO: crate::io::IO<Error = E>, C: ClusterCache> SlotIter<'a, IO, C> {
    /// `start` must already be resolved from the root alias
    pub fn new(store: &'a mut ClusterStore<IO, C>, fat: &'a FatTable, start: ClusterID) -> Self {
        let slots_per_cluster = store.parameters().slots_per_cluster();
        Self { store, chain: fat.chain(start), cluster: None, index: 0, slots_per_cluster }
    }

    pub fn next(&mut self) -> Result<Option<(SlotRef, RawSlot)>, Error<E>> {
        loop {
            if let Some(cluster) = self.cluster {
                if self.index < self.slots_per_cluster {
                    let start = self.index * ENTRY_SIZE;
                    let mut slot: RawSlot = [0u8; ENTRY_SIZE];
                    slot.copy_from_slice(&self.store.cluster(cluster)?[start..start + ENTRY_SIZE]);
                    let slot_ref = SlotRef { cluster, index: self.index };
                    self.index += 1;
                    return Ok(Some((slot_ref, slot)));
                }
            }
            match self.chain.next() {
                Some(cluster) => {
                    let cluster = cluster?;
                    trace!("Directory continues on cluster {}", cluster);
                    self.cluster = Some(cluster);
                    self.index = 0;
                }
                None => return Ok(None),
            }
        }
    }
}
