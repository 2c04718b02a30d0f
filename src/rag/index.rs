use crate::core::errors::DocqaError;

/// Flat in-memory vector index with exact Euclidean search.
///
/// Vectors are stored in insertion order and every query scans all of
/// them. Ties on distance resolve to the lower insertion index.
#[derive(Debug, Default)]
pub struct FlatIndex {
    vectors: Vec<Vec<f32>>,
    dimension: usize,
}

impl FlatIndex {
    /// Build an index from a set of vectors. All vectors must share the
    /// same dimension.
    pub fn build(vectors: Vec<Vec<f32>>) -> Result<Self, DocqaError> {
        let dimension = vectors.first().map(|v| v.len()).unwrap_or(0);
        if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
            return Err(DocqaError::InvalidInput(format!(
                "mixed embedding dimensions: expected {}, got {}",
                dimension,
                bad.len()
            )));
        }
        Ok(Self { vectors, dimension })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Return up to `k` nearest vectors as `(index, distance)` pairs in
    /// ascending distance order. An empty index or a dimension mismatch
    /// yields an empty result rather than an error.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<(usize, f32)> {
        if self.vectors.is_empty() || k == 0 {
            return Vec::new();
        }
        if query.len() != self.dimension {
            tracing::warn!(
                "query dimension {} does not match index dimension {}",
                query.len(),
                self.dimension
            );
            return Vec::new();
        }

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(idx, v)| (idx, euclidean(query, v)))
            .collect();

        scored.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        scored.truncate(k);
        scored
    }
}

fn euclidean(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mixed_dimensions() {
        let result = FlatIndex::build(vec![vec![1.0, 2.0], vec![1.0]]);
        assert!(result.is_err());
    }

    #[test]
    fn empty_index_returns_empty() {
        let index = FlatIndex::build(Vec::new()).unwrap();
        assert!(index.search(&[1.0, 2.0], 5).is_empty());
    }

    #[test]
    fn indexed_vector_is_its_own_nearest_neighbor() {
        let index = FlatIndex::build(vec![
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![5.0, 5.0],
        ])
        .unwrap();

        let results = index.search(&[0.0, 1.0], 1);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, 1);
        assert!(results[0].1.abs() < 1e-6);
    }

    #[test]
    fn distances_are_non_decreasing() {
        let index = FlatIndex::build(vec![
            vec![0.0, 0.0],
            vec![3.0, 4.0],
            vec![1.0, 1.0],
            vec![10.0, 0.0],
        ])
        .unwrap();

        let results = index.search(&[0.0, 0.0], 4);
        assert_eq!(results.len(), 4);
        for pair in results.windows(2) {
            assert!(pair[0].1 <= pair[1].1);
        }
    }

    #[test]
    fn ties_resolve_to_lower_insertion_index() {
        let index = FlatIndex::build(vec![
            vec![1.0, 0.0],
            vec![-1.0, 0.0],
            vec![0.0, 1.0],
        ])
        .unwrap();

        // All three are at distance 1 from the origin.
        let results = index.search(&[0.0, 0.0], 3);
        let order: Vec<usize> = results.iter().map(|(idx, _)| *idx).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn k_larger_than_index_returns_everything() {
        let index = FlatIndex::build(vec![vec![0.0], vec![1.0]]).unwrap();
        assert_eq!(index.search(&[0.0], 10).len(), 2);
    }

    #[test]
    fn dimension_mismatch_returns_empty() {
        let index = FlatIndex::build(vec![vec![1.0, 2.0]]).unwrap();
        assert!(index.search(&[1.0], 1).is_empty());
    }
}
