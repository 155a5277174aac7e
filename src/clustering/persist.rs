use crate::clustering::node::ClusterNode;
use crate::clustering::result::{ClusteringOutcome, FusionTrace, PartitionSnapshot};
use crate::clustering::ClusteringResult;
use crate::core::float::ClusterFloat;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// One merge in SciPy linkage-matrix convention: leaves are `0..n`, the
/// cluster created by merge `i` (0-based) is `n + i`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MergeRecord<F> {
    pub left: usize,
    pub right: usize,
    pub distance: F,
    pub size: usize,
}

/// Flat, serializable form of a dendrogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DendrogramRecord<F> {
    /// Row identifiers by row index.
    pub row_ids: Vec<String>,
    pub merges: Vec<MergeRecord<F>>,
}

impl<F: ClusterFloat> DendrogramRecord<F> {
    /// Flattens a tree into linkage-matrix form. Leaves are numbered
    /// `0..n` by ascending row index and the merge at rank `r` (ordered by
    /// step) gets id `n + r`, so any subtree of a run flattens as well.
    pub fn from_root(root: &ClusterNode<F>) -> Self {
        let mut rows = root.leaf_rows();
        rows.sort_unstable_by_key(|row| row.index());
        let n = rows.len();
        let leaf_ids: FxHashMap<usize, usize> =
            rows.iter().enumerate().map(|(position, row)| (row.index(), position)).collect();
        let row_ids = rows.iter().map(|row| row.id().to_string()).collect();

        let merged = root.merges();
        let merge_ids: FxHashMap<usize, usize> = merged
            .iter()
            .enumerate()
            .filter_map(|(rank, node)| Some((node.step()?, n + rank)))
            .collect();

        let node_id = |node: &ClusterNode<F>| match node.step() {
            Some(step) => merge_ids[&step],
            None => leaf_ids[&node.leaves()[0]],
        };
        let merges = merged
            .into_iter()
            .filter_map(|node| {
                let (left, right) = node.children()?;
                Some(MergeRecord {
                    left: node_id(left),
                    right: node_id(right),
                    distance: node.height(),
                    size: node.leaf_count(),
                })
            })
            .collect();

        Self { row_ids, merges }
    }

    pub fn n_rows(&self) -> usize {
        self.row_ids.len()
    }
}

/// What gets written to disk for a finished run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRecord<F> {
    pub dendrogram: DendrogramRecord<F>,
    pub fusion_trace: FusionTrace<F>,
    pub partition: PartitionSnapshot,
}

impl<F: ClusterFloat> OutcomeRecord<F> {
    pub fn from_outcome(outcome: &ClusteringOutcome<F>) -> Self {
        Self {
            dendrogram: DendrogramRecord::from_root(&outcome.root),
            fusion_trace: outcome.fusion_trace.clone(),
            partition: outcome.partition.clone(),
        }
    }
}

/// Writes the outcome as gzip-compressed bincode.
pub fn save_outcome<F: ClusterFloat, P: AsRef<Path>>(
    outcome: &ClusteringOutcome<F>,
    path: P,
) -> ClusteringResult<()> {
    let file = File::create(path)?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    bincode::serialize_into(&mut encoder, &OutcomeRecord::from_outcome(outcome))?;
    encoder.finish()?.flush()?;
    Ok(())
}

pub fn load_outcome<F: ClusterFloat, P: AsRef<Path>>(path: P) -> ClusteringResult<OutcomeRecord<F>> {
    let file = File::open(path)?;
    let decompressor = GzDecoder::new(BufReader::new(file));
    Ok(bincode::deserialize_from(decompressor)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clustering::{ClusteringError, ClusteringParams, HierarchicalClustering, Linkage};
    use crate::distances::DistanceKind;
    use ndarray::array;
    use tempfile::TempDir;

    fn outcome() -> ClusteringOutcome<f64> {
        let data = array![[1.0], [2.0], [9.0], [10.0]];
        let params = ClusteringParams::new(Linkage::Single, DistanceKind::Euclidean, 2);
        HierarchicalClustering::from_array(params, data.view())
            .unwrap()
            .fit()
            .unwrap()
    }

    #[test]
    fn test_dendrogram_record_uses_linkage_matrix_ids() {
        let record = DendrogramRecord::from_root(&outcome().root);

        assert_eq!(record.n_rows(), 4);
        assert_eq!(record.row_ids, vec!["Row0", "Row1", "Row2", "Row3"]);
        assert_eq!(
            record.merges,
            vec![
                MergeRecord { left: 0, right: 1, distance: 1.0, size: 2 },
                MergeRecord { left: 2, right: 3, distance: 1.0, size: 2 },
                MergeRecord { left: 4, right: 5, distance: 7.0, size: 4 },
            ]
        );
    }

    #[test]
    fn test_dendrogram_record_of_a_subtree() {
        let outcome = outcome();
        let (_, right) = outcome.root.children().unwrap();
        let record = DendrogramRecord::from_root(right);

        assert_eq!(record.row_ids, vec!["Row2", "Row3"]);
        assert_eq!(record.merges, vec![MergeRecord { left: 0, right: 1, distance: 1.0, size: 2 }]);

        let leaf = DendrogramRecord::from_root(right.children().unwrap().1);
        assert_eq!(leaf.row_ids, vec!["Row3"]);
        assert!(leaf.merges.is_empty());
    }

    #[test]
    fn test_save_and_load_outcome() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("outcome.bin.gz");
        let outcome = outcome();

        save_outcome(&outcome, &path).unwrap();
        let loaded: OutcomeRecord<f64> = load_outcome(&path).unwrap();

        assert_eq!(loaded, OutcomeRecord::from_outcome(&outcome));
        assert_eq!(loaded.partition.cluster_of("Row1"), loaded.partition.cluster_of("Row0"));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = load_outcome::<f64, _>(temp_dir.path().join("absent.bin.gz"));
        assert!(matches!(result, Err(ClusteringError::Io(_))));
    }
}
