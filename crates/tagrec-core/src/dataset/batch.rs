//! Seeded mini-batch iteration over training pairs.
//!
//! Pairs are pre-resolved to embedding-table rows once; each epoch then
//! reshuffles a permutation and yields fixed-size index batches, final
//! short batch included.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::Interaction;
use crate::vocab::Vocabulary;

/// One training batch: parallel user/item embedding-table rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// User-tower rows, one per pair
    pub user_rows: Vec<usize>,
    /// Recipe-tower rows, one per pair
    pub item_rows: Vec<usize>,
}

impl Batch {
    /// Number of pairs in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.user_rows.len()
    }

    /// True when the batch holds no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.user_rows.is_empty()
    }
}

/// Reshufflable batch source over a fixed set of interaction pairs.
pub struct BatchIterator {
    user_rows: Vec<usize>,
    item_rows: Vec<usize>,
    batch_size: usize,
    rng: StdRng,
}

impl BatchIterator {
    /// Resolves pairs against the tower vocabularies and prepares an
    /// iterator with its own seeded RNG.
    #[must_use]
    pub fn new(
        pairs: &[Interaction],
        users: &Vocabulary,
        items: &Vocabulary,
        batch_size: usize,
        seed: u64,
    ) -> Self {
        let user_rows = pairs.iter().map(|p| users.row_of(&p.user_id)).collect();
        let item_rows = pairs.iter().map(|p| items.row_of(&p.recipe_id)).collect();
        Self {
            user_rows,
            item_rows,
            batch_size: batch_size.max(1),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Total number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.user_rows.len()
    }

    /// True when there are no pairs at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.user_rows.is_empty()
    }

    /// Number of batches one epoch yields.
    #[must_use]
    pub fn batches_per_epoch(&self) -> usize {
        self.len().div_ceil(self.batch_size)
    }

    /// Shuffles and returns the batches of one epoch.
    pub fn epoch(&mut self) -> Vec<Batch> {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.shuffle(&mut self.rng);

        order
            .chunks(self.batch_size)
            .map(|chunk| Batch {
                user_rows: chunk.iter().map(|&i| self.user_rows[i]).collect(),
                item_rows: chunk.iter().map(|&i| self.item_rows[i]).collect(),
            })
            .collect()
    }

    /// Unshuffled batches in input order (used for validation passes).
    #[must_use]
    pub fn sequential(&self) -> Vec<Batch> {
        (0..self.len())
            .collect::<Vec<_>>()
            .chunks(self.batch_size)
            .map(|chunk| Batch {
                user_rows: chunk.iter().map(|&i| self.user_rows[i]).collect(),
                item_rows: chunk.iter().map(|&i| self.item_rows[i]).collect(),
            })
            .collect()
    }
}
