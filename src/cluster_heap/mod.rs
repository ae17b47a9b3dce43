/// Single-cluster read cache behind [`ClusterStore`](clusters::ClusterStore)
pub(crate) mod cache;
pub(crate) mod clusters;
pub(crate) mod directory;
pub(crate) mod file;
