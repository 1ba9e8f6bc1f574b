//! Deterministic string vocabularies for embedding lookup.
//!
//! A [`Vocabulary`] assigns each distinct identifier a stable index based on
//! lexicographic order, so repeated runs over the same dataset produce
//! identical embedding-table layouts. Index 0 of the associated embedding
//! table is reserved for out-of-vocabulary identifiers; entry `i` of the
//! vocabulary occupies table row `i + 1`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Table row reserved for identifiers outside the vocabulary.
pub const OOV_ROW: usize = 0;

/// Sorted, deduplicated identifier set with O(1) id-to-index lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vocabulary {
    ids: Vec<String>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl PartialEq for Vocabulary {
    fn eq(&self, other: &Self) -> bool {
        // The index is derived from ids; equality is defined by ids alone.
        self.ids == other.ids
    }
}

impl Eq for Vocabulary {}

impl Vocabulary {
    /// Builds a vocabulary from an iterator of identifiers.
    ///
    /// Duplicates collapse; the surviving set is sorted lexicographically.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        ids.sort_unstable();
        ids.dedup();

        let index = Self::build_index(&ids);
        Self { ids, index }
    }

    fn build_index(ids: &[String]) -> HashMap<String, usize> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect()
    }

    /// Rebuilds the lookup index after deserialization.
    ///
    /// The index is derived state and is skipped by serde; artifact loading
    /// calls this once after decoding.
    pub fn rehydrate(&mut self) {
        self.index = Self::build_index(&self.ids);
    }

    /// Number of identifiers in the vocabulary (excluding the OOV slot).
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true when the vocabulary holds no identifiers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Embedding-table row count: one row per identifier plus the OOV row.
    #[must_use]
    pub fn table_rows(&self) -> usize {
        self.ids.len() + 1
    }

    /// Embedding-table row for an identifier; [`OOV_ROW`] when unknown.
    #[must_use]
    pub fn row_of(&self, id: &str) -> usize {
        self.index.get(id).map_or(OOV_ROW, |&i| i + 1)
    }

    /// Identifier stored at vocabulary position `i`, if in range.
    #[must_use]
    pub fn id_at(&self, i: usize) -> Option<&str> {
        self.ids.get(i).map(String::as_str)
    }

    /// Iterates identifiers in index order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// All identifiers as a slice, in index order.
    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }
}
