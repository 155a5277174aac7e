use crate::clustering::cache::DistanceCache;
use crate::clustering::node::ClusterNode;
use crate::clustering::params::ClusteringParams;
use crate::clustering::result::{ClusteringOutcome, FusionStep, FusionTrace, PartitionSnapshot};
use crate::clustering::{ClusteringError, ClusteringResult};
use crate::core::feature::{feature_vectors_from_array, FeatureVector};
use crate::core::float::ClusterFloat;
use crate::distances::DistanceMetric;
use fxhash::FxHashSet;
use log::{debug, info, warn};
use ndarray::ArrayView2;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Running,
    Done,
}

/// Hooks polled by [`HierarchicalClustering::fit_with_monitor`] between merges.
pub trait RunMonitor {
    /// Checked once before every merge. Returning true aborts the run.
    fn is_cancelled(&self) -> bool {
        false
    }

    /// Called once after every merge with the completed fraction in `(0, 1]`.
    fn report_progress(&mut self, _fraction: f64) {}
}

/// Monitor that never cancels and ignores progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMonitor;

impl RunMonitor for NoMonitor {}

/// Cancellation flag that can be shared with another thread.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl RunMonitor for CancelFlag {
    fn is_cancelled(&self) -> bool {
        self.is_set()
    }
}

/// Agglomerative clustering run.
///
/// Starts with one singleton cluster per row and merges the two closest
/// clusters per [`step`](Self::step) until one cluster, the dendrogram root,
/// is left. Each run owns its working list and distance cache, so separate
/// runs can execute on separate threads.
pub struct HierarchicalClustering<F: ClusterFloat> {
    rows: Vec<Arc<FeatureVector<F>>>,
    params: ClusteringParams<F>,
    clusters: Vec<ClusterNode<F>>,
    cache: Option<DistanceCache<F>>,
    fusion_trace: FusionTrace<F>,
    partition: Option<PartitionSnapshot>,
    state: EngineState,
}

impl<F: ClusterFloat> HierarchicalClustering<F> {
    /// Validates the run and builds the singleton clusters. Row indices are
    /// reassigned `0..n` in the order given.
    pub fn new(params: ClusteringParams<F>, rows: Vec<FeatureVector<F>>) -> ClusteringResult<Self> {
        if rows.is_empty() {
            return Err(ClusteringError::EmptyInput);
        }
        if params.target_cluster_count == 0 {
            return Err(ClusteringError::InvalidTargetCount(params.target_cluster_count));
        }
        let mut seen = FxHashSet::default();
        if let Some(dup) = rows.iter().find(|row| !seen.insert(row.id())) {
            return Err(ClusteringError::DuplicateRowId(dup.id().to_string()));
        }

        let rows: Vec<Arc<FeatureVector<F>>> = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| Arc::new(row.with_index(i)))
            .collect();
        let n = rows.len();

        info!(
            "Clustering {} rows with {} linkage (target {} clusters, cache {})",
            n,
            params.linkage,
            params.target_cluster_count,
            if params.use_cache { "on" } else { "off" }
        );

        let clusters: Vec<ClusterNode<F>> = rows.iter().cloned().map(ClusterNode::leaf).collect();
        let cache = params.use_cache.then(|| DistanceCache::new(n));
        let partition = (params.target_cluster_count >= n).then(|| PartitionSnapshot::capture(&clusters));
        let state = if n == 1 {
            EngineState::Done
        } else {
            EngineState::Running
        };

        Ok(Self {
            rows,
            params,
            clusters,
            cache,
            fusion_trace: FusionTrace::new(),
            partition,
            state,
        })
    }

    /// Clusters the rows of `data`, naming them `Row0`, `Row1`, ...
    pub fn from_array(params: ClusteringParams<F>, data: ArrayView2<F>) -> ClusteringResult<Self> {
        Self::new(params, feature_vectors_from_array(data))
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn params(&self) -> &ClusteringParams<F> {
        &self.params
    }

    /// Live clusters, in working-list order.
    pub fn clusters(&self) -> &[ClusterNode<F>] {
        &self.clusters
    }

    pub fn fusion_trace(&self) -> &FusionTrace<F> {
        &self.fusion_trace
    }

    /// Snapshot taken so far, if the target count has been reached.
    pub fn partition(&self) -> Option<&PartitionSnapshot> {
        self.partition.as_ref()
    }

    pub fn cache(&self) -> Option<&DistanceCache<F>> {
        self.cache.as_ref()
    }

    /// Merges the closest pair of live clusters. Returns `None` once a single
    /// cluster is left.
    pub fn step(&mut self) -> Option<FusionStep<F>> {
        if self.state == EngineState::Done {
            return None;
        }
        let Some((a, b, distance)) = self.closest_pair() else {
            self.state = EngineState::Done;
            return None;
        };

        // a < b, so removing b first keeps a in place.
        let right = self.clusters.remove(b);
        let left = self.clusters.remove(a);
        let step = self.fusion_trace.len() + 1;
        debug!(
            "Merge {}: {} + {} rows at distance {}",
            step,
            left.leaf_count(),
            right.leaf_count(),
            distance
        );
        if !distance.is_finite() {
            warn!("Merge {} happened at non-finite distance {}", step, distance);
        }
        self.clusters.push(ClusterNode::merge(left, right, distance, step));

        let fusion = FusionStep {
            cluster_count: self.clusters.len(),
            distance,
        };
        self.fusion_trace.push(fusion);

        if self.clusters.len() == self.params.target_cluster_count {
            self.partition = Some(PartitionSnapshot::capture(&self.clusters));
        }
        if self.clusters.len() == 1 {
            self.state = EngineState::Done;
        }
        Some(fusion)
    }

    /// Runs to completion.
    pub fn fit(self) -> ClusteringResult<ClusteringOutcome<F>> {
        self.fit_with_monitor(&mut NoMonitor)
    }

    /// Runs to completion, polling `monitor` for cancellation before each
    /// merge and reporting progress after it. A cancelled run yields nothing.
    pub fn fit_with_monitor(mut self, monitor: &mut dyn RunMonitor) -> ClusteringResult<ClusteringOutcome<F>> {
        let total = self.rows.len().saturating_sub(1);
        while self.state == EngineState::Running {
            if monitor.is_cancelled() {
                warn!(
                    "Clustering cancelled after {} of {} merges",
                    self.fusion_trace.len(),
                    total
                );
                return Err(ClusteringError::Cancelled);
            }
            if self.step().is_some() {
                monitor.report_progress(self.fusion_trace.len() as f64 / total as f64);
            }
        }
        self.into_outcome()
    }

    fn into_outcome(mut self) -> ClusteringResult<ClusteringOutcome<F>> {
        let root = self.clusters.pop().ok_or(ClusteringError::EmptyInput)?;
        let partition = self
            .partition
            .take()
            .ok_or(ClusteringError::SnapshotUnavailable(self.params.target_cluster_count))?;
        if let Some(cache) = &self.cache {
            debug!(
                "Distance cache: {} of {} pairs filled, {} hits",
                cache.filled(),
                cache.capacity(),
                cache.hits()
            );
        }
        info!(
            "Clustering finished after {} merges, root height {}",
            self.fusion_trace.len(),
            root.height()
        );
        Ok(ClusteringOutcome {
            root,
            fusion_trace: self.fusion_trace,
            partition,
        })
    }

    /// Scans every unordered pair of live clusters in row-major order and
    /// returns the first one at the minimum linkage distance.
    fn closest_pair(&mut self) -> Option<(usize, usize, F)> {
        let linkage = self.params.linkage;
        let metric = self.params.distance_metric.as_ref();
        let rows = &self.rows;
        let cache = &mut self.cache;
        let leaf_sets: Vec<&[usize]> = self.clusters.iter().map(|c| c.leaves()).collect();

        let mut best: Option<(usize, usize, F)> = None;
        for i in 0..leaf_sets.len() {
            for j in (i + 1)..leaf_sets.len() {
                let d = linkage.compute(leaf_sets[i], leaf_sets[j], |p, q| {
                    leaf_distance(rows, metric, cache.as_mut(), p, q)
                });
                match best {
                    Some((_, _, best_d)) if !(d < best_d) => {}
                    _ => best = Some((i, j, d)),
                }
            }
        }
        best
    }
}

/// Distance between two rows, going through the cache when one is present.
/// Rows are always passed to the metric lower index first.
fn leaf_distance<F: ClusterFloat>(
    rows: &[Arc<FeatureVector<F>>],
    metric: &dyn DistanceMetric<F>,
    cache: Option<&mut DistanceCache<F>>,
    i: usize,
    j: usize,
) -> F {
    let (lo, hi) = if i < j { (i, j) } else { (j, i) };
    let compute = || metric.compute(&rows[lo], &rows[hi]);
    match cache {
        Some(cache) => cache.get_or_compute(lo, hi, compute),
        None => compute(),
    }
}
