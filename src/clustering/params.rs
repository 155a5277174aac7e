use crate::clustering::linkage::Linkage;
use crate::core::float::ClusterFloat;
use crate::distances::{DistanceKind, DistanceMetric};
use std::sync::Arc;

pub struct ClusteringParams<F: ClusterFloat> {
    pub distance_metric: Arc<dyn DistanceMetric<F>>,
    pub linkage: Linkage,
    /// Cluster count at which the partition snapshot is taken; counts at or
    /// above the number of rows yield the all-singleton partition.
    pub target_cluster_count: usize,
    /// Memoize row-to-row distances. Only affects speed, never results.
    pub use_cache: bool,
}

impl<F: ClusterFloat> ClusteringParams<F> {
    pub fn new(linkage: Linkage, distance: DistanceKind, target_cluster_count: usize) -> Self {
        Self {
            distance_metric: distance.metric(),
            linkage,
            target_cluster_count,
            use_cache: true,
        }
    }

    pub fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    pub fn with_linkage(mut self, linkage: Linkage) -> Self {
        self.linkage = linkage;
        self
    }
}

impl<F: ClusterFloat> Clone for ClusteringParams<F> {
    fn clone(&self) -> Self {
        Self {
            distance_metric: Arc::clone(&self.distance_metric),
            linkage: self.linkage,
            target_cluster_count: self.target_cluster_count,
            use_cache: self.use_cache,
        }
    }
}
