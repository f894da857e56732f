//! Exact nearest-neighbor index over a dense, immutable corpus.
//!
//! The corpus is small and static, so the index is a flat row-major matrix
//! searched by brute force. Correctness and determinism matter more here
//! than sub-linear lookups; an approximate structure can be swapped in
//! behind the same `build`/`search` contract if scale ever demands it.

use crate::vector::{VectorDimension, VectorError};

/// Immutable top-k similarity index using squared Euclidean distance.
///
/// Positions returned by [`search`](Self::search) are 0-based and match the
/// order vectors were passed to [`build`](Self::build). There is no
/// incremental update: a new corpus means a new `build`.
#[derive(Debug)]
pub struct VectorIndex {
    /// Row-major corpus data, `rows * dimension` values.
    data: Vec<f32>,
    rows: usize,
    dimension: VectorDimension,
}

impl VectorIndex {
    /// Builds an index over the given vectors, in input order.
    ///
    /// Fails with [`VectorError::EmptyCorpus`] on an empty input and with
    /// [`VectorError::InconsistentCorpus`] if any row's length differs from
    /// the first. The sanitizer is expected to prevent ragged input, but the
    /// index still checks.
    pub fn build(vectors: &[Vec<f32>]) -> Result<Self, VectorError> {
        let first = vectors.first().ok_or(VectorError::EmptyCorpus)?;
        let dimension = VectorDimension::new(first.len())?;

        let mut data = Vec::with_capacity(vectors.len() * dimension.get());
        for (position, vector) in vectors.iter().enumerate() {
            if vector.len() != dimension.get() {
                return Err(VectorError::InconsistentCorpus {
                    position,
                    expected: dimension.get(),
                    actual: vector.len(),
                });
            }
            data.extend_from_slice(vector);
        }

        Ok(Self {
            data,
            rows: vectors.len(),
            dimension,
        })
    }

    /// Returns the positions and squared-L2 distances of the `k` corpus
    /// vectors closest to `query`, ascending by distance.
    ///
    /// `k` is clamped to the corpus size. Ties in distance break by
    /// ascending position, so identical inputs always produce identical
    /// ordered output. Fails with [`VectorError::DimensionMismatch`] if the
    /// query length differs from the corpus dimension.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>, VectorError> {
        self.dimension.validate_vector(query)?;

        let k = k.min(self.rows);
        if k == 0 {
            return Ok(Vec::new());
        }

        let dim = self.dimension.get();
        let mut hits: Vec<(usize, f32)> = (0..self.rows)
            .map(|row| {
                let start = row * dim;
                let distance = squared_l2(query, &self.data[start..start + dim]);
                (row, distance)
            })
            .collect();

        // Corpus and query values are finite, so partial_cmp never sees NaN;
        // position is the deterministic tie-break.
        hits.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        hits.truncate(k);

        Ok(hits)
    }

    /// Number of vectors in the corpus.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Dimension every corpus vector and query must have.
    #[must_use]
    pub fn dimension(&self) -> VectorDimension {
        self.dimension
    }
}

/// Sum of squared per-dimension differences. Monotonic with true Euclidean
/// distance, so ranking by it is equivalent and cheaper.
fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
