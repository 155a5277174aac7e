pub mod distance;

pub use distance::{DistanceKind, DistanceMetric, EuclideanDistance, ManhattanDistance};
