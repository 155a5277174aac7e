/// hiclust: agglomerative hierarchical clustering in Rust
///
/// Rows are merged bottom-up under single, average or complete linkage until
/// one cluster remains, yielding a dendrogram, a fusion trace and a flat
/// partition at a requested cluster count.
///
/// # Modules
/// - `clustering`: the clustering engine, linkage policies, distance cache and results.
/// - `core`: feature vectors and the float bound shared by every component.
/// - `distances`: row-to-row distance metrics.
/// - `visualization`: terminal report of a finished run.
pub mod clustering;
pub mod core;
pub mod distances;
pub mod visualization;
