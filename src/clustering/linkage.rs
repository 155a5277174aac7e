use crate::clustering::ClusteringError;
use crate::core::float::ClusterFloat;
use std::fmt;
use std::str::FromStr;

/// How the distance between two clusters is derived from the distances of
/// their member rows.
///
/// | Linkage  | Cluster distance              |
/// |----------|-------------------------------|
/// | Single   | min d(a, b), a ∈ A, b ∈ B     |
/// | Complete | max d(a, b)                   |
/// | Average  | Σ d(a, b) / (\|A\| · \|B\|)   |
///
/// Average linkage averages all pairwise row distances; it is not the
/// distance between centroids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Linkage {
    Single,
    #[default]
    Average,
    Complete,
}

impl Linkage {
    pub const ALL: [Linkage; 3] = [Linkage::Single, Linkage::Average, Linkage::Complete];

    /// Computes the linkage distance between the leaf sets `a` and `b`.
    ///
    /// `pair_distance` receives one row index from each side. Pairs are
    /// visited in `a`-major order so repeated calls with the same inputs
    /// accumulate identically. Both sides must be non-empty.
    pub fn compute<F, D>(&self, a: &[usize], b: &[usize], mut pair_distance: D) -> F
    where
        F: ClusterFloat,
        D: FnMut(usize, usize) -> F,
    {
        debug_assert!(!a.is_empty() && !b.is_empty());
        let mut pairs = a.iter().flat_map(|&i| b.iter().map(move |&j| (i, j)));

        let Some((i0, j0)) = pairs.next() else {
            return F::zero();
        };
        let first = pair_distance(i0, j0);

        match self {
            Linkage::Single => pairs.fold(first, |best, (i, j)| {
                let d = pair_distance(i, j);
                if d < best {
                    d
                } else {
                    best
                }
            }),
            Linkage::Complete => pairs.fold(first, |worst, (i, j)| {
                let d = pair_distance(i, j);
                if d > worst {
                    d
                } else {
                    worst
                }
            }),
            Linkage::Average => {
                let sum = pairs.fold(first, |acc, (i, j)| acc + pair_distance(i, j));
                let count = F::from_usize(a.len() * b.len()).unwrap_or_else(F::one);
                sum / count
            }
        }
    }
}

impl FromStr for Linkage {
    type Err = ClusteringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(Linkage::Single),
            "average" => Ok(Linkage::Average),
            "complete" => Ok(Linkage::Complete),
            _ => Err(ClusteringError::UnknownLinkage(s.to_string())),
        }
    }
}

impl fmt::Display for Linkage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Linkage::Single => write!(f, "single"),
            Linkage::Average => write!(f, "average"),
            Linkage::Complete => write!(f, "complete"),
        }
    }
}
