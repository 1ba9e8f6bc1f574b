//! Row-major embedding storage.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// A dense `rows x dim` table of `f32` embeddings in one contiguous buffer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingTable {
    rows: usize,
    dim: usize,
    data: Vec<f32>,
}

impl EmbeddingTable {
    /// Creates a table initialized uniformly in `[-s, s]` with
    /// `s = 1/sqrt(dim)`, drawn from a seeded RNG.
    #[must_use]
    pub fn new_seeded(rows: usize, dim: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        #[allow(clippy::cast_precision_loss)]
        let scale = 1.0 / (dim.max(1) as f32).sqrt();
        let data = (0..rows * dim)
            .map(|_| rng.gen_range(-scale..=scale))
            .collect();
        Self { rows, dim, data }
    }

    /// Creates a zeroed table (optimizer accumulator state).
    #[must_use]
    pub fn zeros(rows: usize, dim: usize) -> Self {
        Self {
            rows,
            dim,
            data: vec![0.0; rows * dim],
        }
    }

    /// Number of rows, including the OOV row.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Embedding dimension.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Immutable view of row `r`.
    ///
    /// # Panics
    ///
    /// Panics if `r >= rows`.
    #[must_use]
    pub fn row(&self, r: usize) -> &[f32] {
        &self.data[r * self.dim..(r + 1) * self.dim]
    }

    /// Mutable view of row `r`.
    ///
    /// # Panics
    ///
    /// Panics if `r >= rows`.
    pub fn row_mut(&mut self, r: usize) -> &mut [f32] {
        &mut self.data[r * self.dim..(r + 1) * self.dim]
    }
}
