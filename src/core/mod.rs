pub mod feature;
pub mod float;
pub mod reader;

pub use feature::{feature_vectors_from_array, feature_vectors_from_records, FeatureVector};
pub use float::ClusterFloat;
pub use reader::{read_rows, read_rows_from};
