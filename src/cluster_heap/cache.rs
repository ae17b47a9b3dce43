use alloc::vec::Vec;

use crate::types::ClusterID;

/// Cluster content cache owned by [`ClusterStore`](super::clusters::ClusterStore)
pub(crate) trait ClusterCache {
    fn get(&self, cluster: ClusterID) -> Option<&[u8]>;
    fn get_mut(&mut self, cluster: ClusterID) -> Option<&mut [u8]>;
    fn put(&mut self, cluster: ClusterID, bytes: Vec<u8>);
}

/// Holds exactly one cluster, any miss evicts it
#[derive(Default)]
pub(crate) struct SingleCluster {
    cached: Option<(ClusterID, Vec<u8>)>,
}

impl ClusterCache for SingleCluster {
    fn get(&self, cluster: ClusterID) -> Option<&[u8]> {
        match &self.cached {
            Some((id, bytes)) if *id == cluster => Some(bytes.as_slice()),
            _ => None,
        }
    }

    fn get_mut(&mut self, cluster: ClusterID) -> Option<&mut [u8]> {
        match &mut self.cached {
            Some((id, bytes)) if *id == cluster => Some(bytes.as_mut_slice()),
            _ => None,
        }
    }

    fn put(&mut self, cluster: ClusterID, bytes: Vec<u8>) {
        self.cached = Some((cluster, bytes));
    }
}
