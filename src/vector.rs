use serde::{Deserialize, Serialize};

/// Sparse document vector: `(term index, weight)` pairs sorted by term index.
///
/// Entries are kept sorted so that the dot product is a single merge pass and
/// two vectors built from the same counts sum their components in the same
/// order, which keeps scores bit-for-bit reproducible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Build from `(term index, weight)` pairs in any order; zero weights are dropped.
    pub fn from_pairs(mut entries: Vec<(usize, f64)>) -> Self {
        entries.retain(|&(_, w)| w != 0.0);
        entries.sort_by_key(|&(idx, _)| idx);
        Self { entries }
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Scale to unit length. The zero vector is left as is.
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, w) in &mut self.entries {
                *w /= norm;
            }
        }
    }

    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (a, b) = (&self.entries, &other.entries);
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;

        while i < a.len() && j < b.len() {
            match a[i].0.cmp(&b[j].0) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a[i].1 * b[j].1;
                    i += 1;
                    j += 1;
                }
            }
        }

        sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs_sorts_and_drops_zeros() {
        let v = SparseVector::from_pairs(vec![(3, 1.0), (0, 2.0), (1, 0.0)]);
        assert_eq!(v.entries(), &[(0, 2.0), (3, 1.0)]);
    }

    #[test]
    fn test_normalize() {
        let v = SparseVector::from_pairs(vec![(0, 3.0), (1, 4.0)]).normalized();
        assert!((v.norm() - 1.0).abs() < 1e-12);
        assert!((v.entries()[0].1 - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_zero_vector_stays_zero() {
        let v = SparseVector::default().normalized();
        assert!(v.is_zero());
        assert_eq!(v.norm(), 0.0);
    }

    #[test]
    fn test_dot_only_counts_shared_indices() {
        let a = SparseVector::from_pairs(vec![(0, 1.0), (2, 2.0), (5, 3.0)]);
        let b = SparseVector::from_pairs(vec![(2, 4.0), (4, 1.0), (5, 1.0)]);
        assert_eq!(a.dot(&b), 11.0);
        assert_eq!(a.dot(&SparseVector::default()), 0.0);
    }
}
