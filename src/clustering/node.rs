use crate::core::feature::FeatureVector;
use crate::core::float::ClusterFloat;
use std::cell::OnceCell;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;

/// A node of the dendrogram.
///
/// Leaves wrap a single input row. An internal node is the sole owner of its
/// two children and never changes after the merge that created it; merged
/// clusters stay reachable through it for later rendering or cutting.
#[derive(Debug)]
pub enum ClusterNode<F: ClusterFloat> {
    Leaf {
        row: Arc<FeatureVector<F>>,
        index: usize,
    },
    Internal {
        left: Box<ClusterNode<F>>,
        right: Box<ClusterNode<F>>,
        /// Linkage distance at which the children were joined.
        distance: F,
        /// 1-based number of the merge that created this node.
        step: usize,
        leaf_count: usize,
        leaves: OnceCell<Vec<usize>>,
    },
}

impl<F: ClusterFloat> ClusterNode<F> {
    pub fn leaf(row: Arc<FeatureVector<F>>) -> Self {
        let index = row.index();
        ClusterNode::Leaf { row, index }
    }

    /// Joins two clusters. The children's leaf sets move into the new node,
    /// so only the clusters still being merged hold one.
    pub fn merge(mut left: ClusterNode<F>, mut right: ClusterNode<F>, distance: F, step: usize) -> Self {
        let leaf_count = left.leaf_count() + right.leaf_count();
        let mut leaves = left.take_leaves();
        leaves.extend(right.take_leaves());
        ClusterNode::Internal {
            left: Box::new(left),
            right: Box::new(right),
            distance,
            step,
            leaf_count,
            leaves: OnceCell::from(leaves),
        }
    }

    fn take_leaves(&mut self) -> Vec<usize> {
        if let ClusterNode::Internal { leaves, .. } = self {
            if let Some(cached) = leaves.take() {
                return cached;
            }
        }
        self.leaf_rows().into_iter().map(FeatureVector::index).collect()
    }

    pub(crate) fn holds_leaf_set(&self) -> bool {
        match self {
            ClusterNode::Leaf { .. } => false,
            ClusterNode::Internal { leaves, .. } => leaves.get().is_some(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, ClusterNode::Leaf { .. })
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            ClusterNode::Leaf { .. } => 1,
            ClusterNode::Internal { leaf_count, .. } => *leaf_count,
        }
    }

    /// Merge distance, `None` for a leaf.
    pub fn distance(&self) -> Option<F> {
        match self {
            ClusterNode::Leaf { .. } => None,
            ClusterNode::Internal { distance, .. } => Some(*distance),
        }
    }

    /// Merge distance, zero for a leaf. This is the y-coordinate used when
    /// drawing the dendrogram.
    pub fn height(&self) -> F {
        self.distance().unwrap_or_else(F::zero)
    }

    pub fn step(&self) -> Option<usize> {
        match self {
            ClusterNode::Leaf { .. } => None,
            ClusterNode::Internal { step, .. } => Some(*step),
        }
    }

    pub fn children(&self) -> Option<(&ClusterNode<F>, &ClusterNode<F>)> {
        match self {
            ClusterNode::Leaf { .. } => None,
            ClusterNode::Internal { left, right, .. } => Some((left.as_ref(), right.as_ref())),
        }
    }

    /// The wrapped row of a leaf.
    pub fn row(&self) -> Option<&FeatureVector<F>> {
        match self {
            ClusterNode::Leaf { row, .. } => Some(row.as_ref()),
            ClusterNode::Internal { .. } => None,
        }
    }

    /// Row indices of every leaf below this node, left subtree first.
    /// Nodes that were merged into a parent rebuild it on request.
    pub fn leaves(&self) -> &[usize] {
        match self {
            ClusterNode::Leaf { index, .. } => std::slice::from_ref(index),
            ClusterNode::Internal { leaves, .. } => leaves
                .get_or_init(|| self.leaf_rows().into_iter().map(FeatureVector::index).collect())
                .as_slice(),
        }
    }

    /// Leaf rows in left-to-right order.
    pub fn leaf_rows(&self) -> Vec<&FeatureVector<F>> {
        let mut rows = Vec::with_capacity(self.leaf_count());
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                ClusterNode::Leaf { row, .. } => rows.push(row.as_ref()),
                ClusterNode::Internal { left, right, .. } => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        rows
    }

    pub fn row_ids(&self) -> Vec<&str> {
        self.leaf_rows().into_iter().map(FeatureVector::id).collect()
    }

    /// Internal nodes of the subtree, in the order their merges happened.
    pub fn merges(&self) -> Vec<&ClusterNode<F>> {
        let mut internal = Vec::with_capacity(self.leaf_count().saturating_sub(1));
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if let Some((left, right)) = node.children() {
                internal.push(node);
                stack.push(right);
                stack.push(left);
            }
        }
        internal.sort_by_key(|node| node.step());
        internal
    }

    /// Splits the tree back into `k` clusters by undoing its most recent
    /// merges, which reproduces the working list the engine held when it had
    /// `k` clusters. Asking for more clusters than leaves returns every leaf.
    pub fn cut(&self, k: usize) -> Vec<&ClusterNode<F>> {
        let mut frontier = BinaryHeap::new();
        frontier.push(ByStep(self));
        let mut done = Vec::new();
        while frontier.len() + done.len() < k {
            let Some(ByStep(node)) = frontier.pop() else {
                break;
            };
            match node.children() {
                Some((left, right)) => {
                    frontier.push(ByStep(left));
                    frontier.push(ByStep(right));
                }
                None => done.push(node),
            }
        }
        done.extend(frontier.into_iter().map(|ByStep(node)| node));
        done
    }
}

/// Heap entry ordering nodes by merge step; leaves sort below every merge.
struct ByStep<'a, F: ClusterFloat>(&'a ClusterNode<F>);

impl<F: ClusterFloat> PartialEq for ByStep<'_, F> {
    fn eq(&self, other: &Self) -> bool {
        self.0.step() == other.0.step()
    }
}

impl<F: ClusterFloat> Eq for ByStep<'_, F> {}

impl<F: ClusterFloat> PartialOrd for ByStep<'_, F> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<F: ClusterFloat> Ord for ByStep<'_, F> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.step().cmp(&other.0.step())
    }
}
