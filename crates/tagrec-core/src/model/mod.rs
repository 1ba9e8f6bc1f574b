//! The two-tower retrieval model.
//!
//! Each tower is a vocabulary lookup in front of an embedding table: the
//! query tower embeds synthetic users (tags), the candidate tower embeds
//! recipes. Affinity between a user and a recipe is the dot product of
//! their embeddings. The model is a plain struct composition; training
//! lives in [`crate::train`], scoring in [`crate::recommend`].

mod artifact;
mod embedding;

pub use artifact::ARTIFACT_VERSION;
pub use embedding::EmbeddingTable;

use serde::{Deserialize, Serialize};

use crate::vocab::Vocabulary;

/// Vocabulary lookup plus embedding table.
///
/// Unknown identifiers resolve to the out-of-vocabulary row rather than
/// erroring, mirroring lookup-layer semantics: the OOV row is a real,
/// trained-from-init embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tower {
    vocab: Vocabulary,
    table: EmbeddingTable,
}

impl Tower {
    /// Builds a tower over `vocab` with seeded random init.
    #[must_use]
    pub fn new(vocab: Vocabulary, dim: usize, seed: u64) -> Self {
        let table = EmbeddingTable::new_seeded(vocab.table_rows(), dim, seed);
        Self { vocab, table }
    }

    /// Embedding for an identifier; the OOV row when unknown.
    #[must_use]
    pub fn lookup(&self, id: &str) -> &[f32] {
        self.table.row(self.vocab.row_of(id))
    }

    /// The tower's vocabulary.
    #[must_use]
    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    /// The underlying embedding table.
    #[must_use]
    pub fn table(&self) -> &EmbeddingTable {
        &self.table
    }

    /// Mutable access for the trainer.
    pub(crate) fn table_mut(&mut self) -> &mut EmbeddingTable {
        &mut self.table
    }

    fn rehydrate(&mut self) {
        self.vocab.rehydrate();
    }
}

/// The trained (or to-be-trained) pair of towers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwoTowerModel {
    dim: usize,
    users: Tower,
    items: Tower,
}

impl TwoTowerModel {
    /// Builds both towers with deterministic, seed-derived initialization.
    ///
    /// The towers draw from distinct streams of the same seed so that user
    /// and item tables never start out identical.
    #[must_use]
    pub fn new(users: Vocabulary, items: Vocabulary, dim: usize, seed: u64) -> Self {
        Self {
            dim,
            users: Tower::new(users, dim, seed),
            items: Tower::new(items, dim, seed.wrapping_add(0x9e37_79b9)),
        }
    }

    /// Embedding dimension shared by both towers.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The user (tag) tower.
    #[must_use]
    pub fn user_tower(&self) -> &Tower {
        &self.users
    }

    /// The recipe tower.
    #[must_use]
    pub fn item_tower(&self) -> &Tower {
        &self.items
    }

    /// Mutable tower pair for the trainer.
    pub(crate) fn towers_mut(&mut self) -> (&mut Tower, &mut Tower) {
        (&mut self.users, &mut self.items)
    }

    fn rehydrate(&mut self) {
        self.users.rehydrate();
        self.items.rehydrate();
    }
}
