//! Nearest-neighbour index abstraction over a fitted vector space.
//!
//! Defines a trait for similarity search backends and an exact
//! brute-force L2 implementation.

/// A search hit: corpus position and its distance to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub position: usize,
    pub distance: f32,
}

/// Trait for similarity index backends.
///
/// Implementations must:
/// - return at most `top_k` neighbours, closest first
/// - break distance ties by ascending position
/// - return nothing for `top_k == 0` or an empty index
pub trait VectorIndex: Send + Sync {
    /// Search for the `top_k` vectors closest to `query`.
    fn search(&self, query: &[f32], top_k: usize) -> Vec<Neighbor>;

    /// Number of indexed vectors.
    fn len(&self) -> usize;

    /// Dimensionality of the indexed vectors.
    fn dimensions(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Exact k-NN under Euclidean distance, scanning every vector.
///
/// Distances are expanded as `|q|² + |v|² - 2·q·v` against squared norms
/// recorded at build time. Norms within rounding of 1 are stored as exactly
/// `1.0`, so a zero query is equidistant from every unit vector and ties
/// fall to position.
#[derive(Debug, Clone)]
pub struct FlatL2Index {
    dimensions: usize,
    vectors: Vec<Vec<f32>>,
    squared_norms: Vec<f32>,
}

/// Tolerance for treating a vector as unit length.
const UNIT_EPSILON: f32 = 1e-4;

impl FlatL2Index {
    /// Build an index; vector `i` is reported as position `i`.
    pub fn new(dimensions: usize, vectors: Vec<Vec<f32>>) -> Self {
        debug_assert!(vectors.iter().all(|v| v.len() == dimensions));
        let squared_norms = vectors
            .iter()
            .map(|v| {
                let squared = dot(v, v);
                if (squared - 1.0).abs() < UNIT_EPSILON {
                    1.0
                } else {
                    squared
                }
            })
            .collect();

        Self {
            dimensions,
            vectors,
            squared_norms,
        }
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

impl VectorIndex for FlatL2Index {
    fn search(&self, query: &[f32], top_k: usize) -> Vec<Neighbor> {
        if top_k == 0 || self.vectors.is_empty() {
            return Vec::new();
        }
        debug_assert_eq!(query.len(), self.dimensions);

        let query_norm = dot(query, query);
        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .zip(&self.squared_norms)
            .enumerate()
            .map(|(position, (vector, norm))| {
                let squared = query_norm + norm - 2.0 * dot(query, vector);
                (position, squared.max(0.0))
            })
            .collect();

        // Stable on position for equal distances
        scored.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        scored.truncate(top_k);

        scored
            .into_iter()
            .map(|(position, squared)| Neighbor {
                position,
                distance: squared.sqrt(),
            })
            .collect()
    }

    fn len(&self) -> usize {
        self.vectors.len()
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(hits: &[Neighbor]) -> Vec<usize> {
        hits.iter().map(|n| n.position).collect()
    }

    #[test]
    fn test_search_orders_by_distance() {
        let index = FlatL2Index::new(
            2,
            vec![vec![5.0, 5.0], vec![1.0, 0.0], vec![0.0, 2.0]],
        );
        let hits = index.search(&[0.0, 0.0], 3);
        assert_eq!(positions(&hits), vec![1, 2, 0]);
        assert!((hits[0].distance - 1.0).abs() < 1e-6);
        assert!((hits[1].distance - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_ties_break_by_position() {
        let index = FlatL2Index::new(
            2,
            vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![0.0, 1.0]],
        );
        let hits = index.search(&[0.0, 0.0], 3);
        assert_eq!(positions(&hits), vec![0, 1, 2]);
    }

    #[test]
    fn test_top_k_truncates() {
        let index = FlatL2Index::new(1, vec![vec![3.0], vec![1.0], vec![2.0]]);
        assert_eq!(positions(&index.search(&[0.0], 2)), vec![1, 2]);
        assert_eq!(index.search(&[0.0], 10).len(), 3);
    }

    #[test]
    fn test_zero_k_and_empty_index() {
        let index = FlatL2Index::new(1, vec![vec![1.0]]);
        assert!(index.search(&[1.0], 0).is_empty());

        let empty = FlatL2Index::new(4, Vec::new());
        assert!(empty.is_empty());
        assert!(empty.search(&[0.0; 4], 5).is_empty());
    }

    #[test]
    fn test_zero_query_ties_on_unit_vectors() {
        let third = 1.0f32 / 3.0f32.sqrt();
        let index = FlatL2Index::new(
            3,
            vec![
                vec![third, third, third],
                vec![1.0, 0.0, 0.0],
                vec![0.0, 0.0, 0.0],
                vec![0.6, 0.8, 0.0],
            ],
        );
        let hits = index.search(&[0.0; 3], 4);
        assert_eq!(positions(&hits), vec![2, 0, 1, 3]);
        assert_eq!(hits[0].distance, 0.0);
        assert!(hits[1..].iter().all(|n| n.distance == 1.0));
    }

    #[test]
    fn test_self_distance_is_not_negative() {
        let index = FlatL2Index::new(2, vec![vec![0.6, 0.8]]);
        let hits = index.search(&[0.6, 0.8], 1);
        assert!(hits[0].distance >= 0.0);
        assert!(hits[0].distance < 1e-3);
    }

    #[test]
    fn test_zero_dimensional_space() {
        let index = FlatL2Index::new(0, vec![Vec::new(), Vec::new()]);
        let hits = index.search(&[], 5);
        assert_eq!(positions(&hits), vec![0, 1]);
        assert!(hits.iter().all(|n| n.distance == 0.0));
    }
}
