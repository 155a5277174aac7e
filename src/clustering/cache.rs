use crate::core::float::ClusterFloat;

/// Memoized leaf-to-leaf distances for one clustering run.
///
/// The unordered pair `(i, j)` with `i < j` over `n` rows is stored at the
/// linear position
///
/// ```text
/// k(i, j) = i * n - i * (i + 1) / 2 + (j - i - 1)
/// ```
///
/// which enumerates the strict upper triangle row by row, so the backing
/// array holds exactly `n * (n - 1) / 2` slots. A slot is written once and
/// never overwritten.
#[derive(Debug, Clone)]
pub struct DistanceCache<F: ClusterFloat> {
    n: usize,
    slots: Vec<Option<F>>,
    hits: usize,
    misses: usize,
}

impl<F: ClusterFloat> DistanceCache<F> {
    pub fn new(n: usize) -> Self {
        let size = n * n.saturating_sub(1) / 2;
        Self {
            n,
            slots: vec![None; size],
            hits: 0,
            misses: 0,
        }
    }

    /// Number of rows the cache was sized for.
    pub fn n_rows(&self) -> usize {
        self.n
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of pairs whose distance has been stored so far.
    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }

    /// Linear slot of the unordered pair. Panics on `i == j` or an index
    /// outside `0..n`; both are internal usage errors.
    #[inline]
    pub fn slot(&self, i: usize, j: usize) -> usize {
        assert!(
            i < self.n && j < self.n,
            "cache index ({}, {}) out of range for {} rows",
            i,
            j,
            self.n
        );
        assert_ne!(i, j, "the cache holds no diagonal entries");
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        lo * self.n - lo * (lo + 1) / 2 + (hi - lo - 1)
    }

    /// Already stored distance of the pair, if any.
    pub fn get(&self, i: usize, j: usize) -> Option<F> {
        self.slots[self.slot(i, j)]
    }

    /// Returns the stored distance of `(i, j)`, computing and storing it on
    /// first request. `compute` is called at most once per unordered pair.
    pub fn get_or_compute<C>(&mut self, i: usize, j: usize, compute: C) -> F
    where
        C: FnOnce() -> F,
    {
        let k = self.slot(i, j);
        match self.slots[k] {
            Some(d) => {
                self.hits += 1;
                d
            }
            None => {
                self.misses += 1;
                let d = compute();
                self.slots[k] = Some(d);
                d
            }
        }
    }
}
