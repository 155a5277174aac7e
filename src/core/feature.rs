use crate::core::float::ClusterFloat;
use ndarray::{Array1, ArrayView1, ArrayView2};

/// One input row: an ordered run of numeric coordinates, some of which may be
/// missing, tagged with the row identifier and the row index it was read at.
///
/// The row index is the coordinate used by the distance cache, the identifier
/// is what callers see in partition snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector<F: ClusterFloat> {
    id: String,
    index: usize,
    values: Array1<F>,
    present: Array1<bool>,
    complete: bool,
}

impl<F: ClusterFloat> FeatureVector<F> {
    /// Builds a vector from optional coordinates; `None` marks a missing value.
    pub fn new(id: impl Into<String>, index: usize, values: Vec<Option<F>>) -> Self {
        let present: Array1<bool> = values.iter().map(Option::is_some).collect();
        let values: Array1<F> = values.into_iter().map(|v| v.unwrap_or_else(F::zero)).collect();
        let complete = present.iter().all(|&p| p);
        Self {
            id: id.into(),
            index,
            values,
            present,
            complete,
        }
    }

    /// Builds a vector where every coordinate is present.
    pub fn dense(id: impl Into<String>, index: usize, values: Array1<F>) -> Self {
        let present = Array1::from_elem(values.len(), true);
        Self {
            id: id.into(),
            index,
            values,
            present,
            complete: true,
        }
    }

    /// Same row, re-indexed. Used when a run assigns indices in consumption order.
    pub(crate) fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when no coordinate is missing.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Raw coordinate storage. Missing positions hold zero; check `get` or
    /// `is_present` before reading them.
    pub fn values(&self) -> ArrayView1<'_, F> {
        self.values.view()
    }

    pub fn is_present(&self, position: usize) -> bool {
        self.present.get(position).copied().unwrap_or(false)
    }

    pub fn get(&self, position: usize) -> Option<F> {
        if self.is_present(position) {
            Some(self.values[position])
        } else {
            None
        }
    }

    /// Iterates the coordinates present in both vectors, position by position.
    pub fn aligned<'a>(&'a self, other: &'a Self) -> impl Iterator<Item = (F, F)> + 'a {
        self.values
            .iter()
            .zip(self.present.iter())
            .zip(other.values.iter().zip(other.present.iter()))
            .filter_map(|((&a, &pa), (&b, &pb))| if pa && pb { Some((a, b)) } else { None })
    }
}

/// Turns every row of `data` into a dense vector with id `Row{i}`.
pub fn feature_vectors_from_array<F: ClusterFloat>(data: ArrayView2<F>) -> Vec<FeatureVector<F>> {
    data.rows()
        .into_iter()
        .enumerate()
        .map(|(i, row)| FeatureVector::dense(format!("Row{}", i), i, row.to_owned()))
        .collect()
}

/// Materializes `(id, coordinates)` records, assigning indices in record order.
pub fn feature_vectors_from_records<F, I, S>(records: I) -> Vec<FeatureVector<F>>
where
    F: ClusterFloat,
    I: IntoIterator<Item = (S, Vec<Option<F>>)>,
    S: Into<String>,
{
    records
        .into_iter()
        .enumerate()
        .map(|(i, (id, values))| FeatureVector::new(id, i, values))
        .collect()
}
