use crate::clustering::node::ClusterNode;
use crate::core::float::ClusterFloat;
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One merge as seen from outside: the number of clusters left after it and
/// the linkage distance it happened at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusionStep<F> {
    pub cluster_count: usize,
    pub distance: F,
}

/// Merges in the order they happened, one entry per step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FusionTrace<F> {
    steps: Vec<FusionStep<F>>,
}

impl<F: ClusterFloat> FusionTrace<F> {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    pub(crate) fn push(&mut self, step: FusionStep<F>) {
        self.steps.push(step);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[FusionStep<F>] {
        &self.steps
    }

    pub fn iter(&self) -> impl Iterator<Item = &FusionStep<F>> {
        self.steps.iter()
    }

    pub fn distances(&self) -> Vec<F> {
        self.steps.iter().map(|s| s.distance).collect()
    }

    pub fn last(&self) -> Option<&FusionStep<F>> {
        self.steps.last()
    }

    /// True when no merge happened at a smaller distance than the one before it.
    pub fn is_monotonic(&self) -> bool {
        self.steps.windows(2).all(|w| w[0].distance <= w[1].distance)
    }
}

/// Flat assignment of every row to one of the clusters that were live when
/// the snapshot was taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionSnapshot {
    cluster_count: usize,
    row_ids: Vec<String>,
    assignments: Vec<usize>,
    by_id: FxHashMap<String, usize>,
}

impl PartitionSnapshot {
    /// Builds a snapshot from the live clusters. Cluster `k` is the `k`-th
    /// entry of `clusters`; every row reachable from them gets its label.
    pub fn capture<'a, F, I>(clusters: I) -> Self
    where
        F: ClusterFloat + 'a,
        I: IntoIterator<Item = &'a ClusterNode<F>>,
    {
        let clusters: Vec<&ClusterNode<F>> = clusters.into_iter().collect();

        // Rows are laid out by ascending row index, so clusters cut from a
        // subtree get compact positions too.
        let mut members: Vec<(usize, String, usize)> = clusters
            .iter()
            .enumerate()
            .flat_map(|(label, cluster)| {
                cluster
                    .leaf_rows()
                    .into_iter()
                    .map(move |row| (row.index(), row.id().to_string(), label))
            })
            .collect();
        members.sort_unstable_by_key(|(index, _, _)| *index);

        let (row_ids, assignments): (Vec<String>, Vec<usize>) =
            members.into_iter().map(|(_, id, label)| (id, label)).unzip();

        let by_id = row_ids
            .iter()
            .enumerate()
            .map(|(index, id)| (id.clone(), index))
            .collect();

        Self {
            cluster_count: clusters.len(),
            row_ids,
            assignments,
            by_id,
        }
    }

    pub fn cluster_count(&self) -> usize {
        self.cluster_count
    }

    /// Number of rows covered.
    pub fn len(&self) -> usize {
        self.row_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_ids.is_empty()
    }

    /// Cluster number of each row, by row index.
    pub fn assignments(&self) -> &[usize] {
        &self.assignments
    }

    pub fn row_ids(&self) -> &[String] {
        &self.row_ids
    }

    pub fn cluster_of(&self, row_id: &str) -> Option<usize> {
        self.by_id.get(row_id).map(|&index| self.assignments[index])
    }

    pub fn label_of(&self, row_id: &str) -> Option<String> {
        self.cluster_of(row_id).map(Self::label)
    }

    pub fn label(cluster: usize) -> String {
        format!("cluster_{}", cluster)
    }

    /// `(row id, label)` for every row in input order.
    pub fn labels(&self) -> impl Iterator<Item = (&str, String)> {
        self.row_ids
            .iter()
            .zip(self.assignments.iter())
            .map(|(id, &cluster)| (id.as_str(), Self::label(cluster)))
    }

    /// Row ids grouped by cluster number.
    pub fn members(&self) -> Vec<Vec<&str>> {
        let mut members = vec![Vec::new(); self.cluster_count];
        for (id, &cluster) in self.row_ids.iter().zip(self.assignments.iter()) {
            members[cluster].push(id.as_str());
        }
        members
    }

    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.cluster_count];
        for &cluster in &self.assignments {
            sizes[cluster] += 1;
        }
        sizes
    }

    /// True when both snapshots group rows the same way, whatever the labels.
    pub fn same_grouping(&self, other: &PartitionSnapshot) -> bool {
        if self.cluster_count != other.cluster_count || self.row_ids != other.row_ids {
            return false;
        }
        let mut mapping: FxHashMap<usize, usize> = FxHashMap::default();
        self.assignments
            .iter()
            .zip(other.assignments.iter())
            .all(|(&a, &b)| *mapping.entry(a).or_insert(b) == b)
    }
}

impl fmt::Display for PartitionSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Partition into {} clusters:", self.cluster_count)?;
        for (id, label) in self.labels() {
            writeln!(f, "  {}: {}", id, label)?;
        }
        Ok(())
    }
}

/// Everything a finished run produces.
#[derive(Debug)]
pub struct ClusteringOutcome<F: ClusterFloat> {
    /// Root of the dendrogram, owning every merge of the run.
    pub root: ClusterNode<F>,
    pub fusion_trace: FusionTrace<F>,
    /// Partition captured when the working list reached the target count.
    pub partition: PartitionSnapshot,
}

impl<F: ClusterFloat> ClusteringOutcome<F> {
    pub fn n_rows(&self) -> usize {
        self.root.leaf_count()
    }

    /// Partition into `k` clusters recovered from the dendrogram after the run.
    pub fn partition_at(&self, k: usize) -> PartitionSnapshot {
        PartitionSnapshot::capture(self.root.cut(k))
    }
}
