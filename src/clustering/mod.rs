//! Agglomerative hierarchical clustering.
//!
//! Every row starts as its own cluster; the two closest clusters are merged
//! until a single root remains. The merges form a dendrogram, the sequence of
//! `(clusters left, merge distance)` pairs forms the fusion trace, and the
//! working list is snapshotted into a flat partition when it reaches the
//! requested cluster count.

pub mod cache;
pub mod config;
pub mod hierarchical;
pub mod linkage;
pub mod node;
pub mod params;
pub mod persist;
pub mod result;

pub use crate::distances::{DistanceKind, DistanceMetric};
pub use cache::DistanceCache;
pub use config::Config;
pub use hierarchical::{CancelFlag, EngineState, HierarchicalClustering, NoMonitor, RunMonitor};
pub use linkage::Linkage;
pub use node::ClusterNode;
pub use params::ClusteringParams;
pub use persist::{load_outcome, save_outcome, DendrogramRecord, MergeRecord, OutcomeRecord};
pub use result::{ClusteringOutcome, FusionStep, FusionTrace, PartitionSnapshot};

use crate::core::feature::FeatureVector;
use crate::core::float::ClusterFloat;
use rayon::prelude::*;
use std::error::Error;
use std::fmt;
use std::io;

/// Error types of a clustering run
#[derive(Debug)]
pub enum ClusteringError {
    /// Linkage name not one of single, average, complete
    UnknownLinkage(String),
    /// Distance name not one of euclidean, manhattan
    UnknownDistance(String),
    /// Target cluster count below one
    InvalidTargetCount(usize),
    /// No input rows
    EmptyInput,
    /// Two input rows share an identifier
    DuplicateRowId(String),
    /// The run was cancelled before it finished
    Cancelled,
    /// The working list never held the requested number of clusters
    SnapshotUnavailable(usize),
    /// Malformed or invalid configuration
    Config(String),
    /// A data file cell or record could not be turned into a row
    InvalidData(String),
    Csv(csv::Error),
    Io(io::Error),
    Serialization(String),
}

impl fmt::Display for ClusteringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusteringError::UnknownLinkage(name) => write!(f, "Unsupported linkage: {}", name),
            ClusteringError::UnknownDistance(name) => {
                write!(f, "Unsupported distance metric: {}", name)
            }
            ClusteringError::InvalidTargetCount(k) => {
                write!(f, "target_cluster_count must be at least 1, got {}", k)
            }
            ClusteringError::EmptyInput => write!(f, "At least one input row is required"),
            ClusteringError::DuplicateRowId(id) => write!(f, "Duplicate row identifier: {}", id),
            ClusteringError::Cancelled => write!(f, "Clustering was cancelled"),
            ClusteringError::SnapshotUnavailable(k) => {
                write!(f, "No partition with {} clusters was produced", k)
            }
            ClusteringError::Config(msg) => write!(f, "Configuration error: {}", msg),
            ClusteringError::InvalidData(msg) => write!(f, "Invalid data: {}", msg),
            ClusteringError::Csv(e) => write!(f, "CSV error: {}", e),
            ClusteringError::Io(e) => write!(f, "I/O error: {}", e),
            ClusteringError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl Error for ClusteringError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ClusteringError::Io(e) => Some(e),
            ClusteringError::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ClusteringError {
    fn from(e: io::Error) -> Self {
        ClusteringError::Io(e)
    }
}

impl From<csv::Error> for ClusteringError {
    fn from(e: csv::Error) -> Self {
        ClusteringError::Csv(e)
    }
}

impl From<bincode::Error> for ClusteringError {
    fn from(e: bincode::Error) -> Self {
        ClusteringError::Serialization(e.to_string())
    }
}

impl From<serde_yaml::Error> for ClusteringError {
    fn from(e: serde_yaml::Error) -> Self {
        ClusteringError::Config(e.to_string())
    }
}

pub type ClusteringResult<T> = Result<T, ClusteringError>;

/// Clusters the same rows once per linkage, in parallel. Every run gets its
/// own working list and distance cache. Results follow the order of `linkages`.
pub fn compare_linkages<F: ClusterFloat>(
    rows: &[FeatureVector<F>],
    template: &ClusteringParams<F>,
    linkages: &[Linkage],
) -> Vec<ClusteringResult<ClusteringOutcome<F>>> {
    linkages
        .par_iter()
        .map(|&linkage| {
            let params = template.clone().with_linkage(linkage);
            HierarchicalClustering::new(params, rows.to_vec())?.fit()
        })
        .collect()
}
