use crate::clustering::ClusteringError;
use crate::core::feature::FeatureVector;
use crate::core::float::ClusterFloat;
use ndarray_stats::DeviationExt;
use num_traits::Float;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Trait defining the interface for distance metrics between two rows.
///
/// Only coordinates present in both vectors take part. Two vectors without a
/// single shared coordinate are at distance zero. Non-finite coordinates are
/// not filtered and propagate into the result.
pub trait DistanceMetric<F: ClusterFloat>: Send + Sync {
    fn compute(&self, point1: &FeatureVector<F>, point2: &FeatureVector<F>) -> F;
}

/// Both rows are dense and of equal length, so ndarray-stats can run on the raw storage.
#[inline]
fn dense_pair<F: ClusterFloat>(point1: &FeatureVector<F>, point2: &FeatureVector<F>) -> bool {
    point1.is_complete() && point2.is_complete() && point1.len() == point2.len()
}

/// [Euclidean Distance](https://en.wikipedia.org/wiki/Euclidean_distance)
#[derive(Debug, Clone, Copy)]
pub struct EuclideanDistance;

impl<F: ClusterFloat> DistanceMetric<F> for EuclideanDistance {
    #[inline]
    fn compute(&self, point1: &FeatureVector<F>, point2: &FeatureVector<F>) -> F {
        if dense_pair(point1, point2) {
            if let Ok(sq) = point1.values().sq_l2_dist(&point2.values()) {
                return sq.sqrt();
            }
        }
        point1
            .aligned(point2)
            .fold(F::zero(), |acc, (a, b)| {
                let diff = a - b;
                acc + diff * diff
            })
            .sqrt()
    }
}

/// [Manhattan Distance](https://en.wikipedia.org/wiki/Taxicab_geometry)
#[derive(Debug, Clone, Copy)]
pub struct ManhattanDistance;

impl<F: ClusterFloat> DistanceMetric<F> for ManhattanDistance {
    #[inline]
    fn compute(&self, point1: &FeatureVector<F>, point2: &FeatureVector<F>) -> F {
        if dense_pair(point1, point2) {
            if let Ok(d) = point1.values().l1_dist(&point2.values()) {
                return d;
            }
        }
        point1
            .aligned(point2)
            .fold(F::zero(), |acc, (a, b)| acc + Float::abs(a - b))
    }
}

/// The `distance` configuration option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceKind {
    #[default]
    Euclidean,
    Manhattan,
}

impl DistanceKind {
    pub fn metric<F: ClusterFloat>(self) -> Arc<dyn DistanceMetric<F>> {
        match self {
            DistanceKind::Euclidean => Arc::new(EuclideanDistance),
            DistanceKind::Manhattan => Arc::new(ManhattanDistance),
        }
    }
}

impl FromStr for DistanceKind {
    type Err = ClusteringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "euclidean" => Ok(DistanceKind::Euclidean),
            "manhattan" => Ok(DistanceKind::Manhattan),
            _ => Err(ClusteringError::UnknownDistance(s.to_string())),
        }
    }
}

impl fmt::Display for DistanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceKind::Euclidean => write!(f, "euclidean"),
            DistanceKind::Manhattan => write!(f, "manhattan"),
        }
    }
}
