//! Tag-based top-K recommendation over trained towers.
//!
//! A query is a set of preferred tags. Each tag maps to its synthetic user
//! embedding (unknown tags resolve to the OOV row), the embeddings are
//! averaged into one query vector, and every recipe in the candidate
//! vocabulary is scored by dot product. This is a brute-force O(catalog)
//! scan per query with no index and no caching between calls.

use crate::dataset::{synthetic_user_id, Catalog};
use crate::error::{Error, Result};
use crate::model::TwoTowerModel;
use crate::ops;

/// One scored recommendation joined back to its catalog record.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    /// Recipe identifier
    pub recipe_id: String,
    /// Display name
    pub name: String,
    /// Raw tag string from the catalog
    pub tags: String,
    /// Calorie count, if the catalog had one
    pub calories: Option<f32>,
    /// Image URL
    pub img_url: String,
    /// Dot-product affinity between the query vector and this recipe
    pub score: f32,
}

/// Scores every candidate recipe against a set of preferred tags.
///
/// Results are sorted by descending score; ties keep vocabulary order
/// (stable sort). At most `top_k` entries are returned; when fewer
/// candidates exist, all of them are returned without error. `top_k` of 0
/// yields an empty result.
///
/// # Errors
///
/// Returns [`Error::EmptyTagQuery`] when `preferred_tags` is empty.
pub fn recommend_for_tags(
    model: &TwoTowerModel,
    catalog: &Catalog,
    preferred_tags: &[String],
    top_k: usize,
) -> Result<Vec<Recommendation>> {
    if preferred_tags.is_empty() {
        return Err(Error::EmptyTagQuery);
    }

    let user_tower = model.user_tower();
    let tag_embeddings: Vec<&[f32]> = preferred_tags
        .iter()
        .map(|tag| user_tower.lookup(&synthetic_user_id(tag)))
        .collect();
    let query = ops::mean_rows(&tag_embeddings, model.dim());

    let ranked = score_candidates(model, &query);

    let index = catalog.id_index();
    let results = ranked
        .into_iter()
        .filter_map(|(vocab_idx, score)| {
            let recipe_id = model.item_tower().vocab().id_at(vocab_idx)?;
            let recipe = index
                .get(recipe_id)
                .map(|&pos| &catalog.recipes()[pos])?;
            Some(Recommendation {
                recipe_id: recipe.recipe_id.clone(),
                name: recipe.name.clone(),
                tags: recipe.tags.clone(),
                calories: recipe.calories,
                img_url: recipe.img_url.clone(),
                score,
            })
        })
        .take(top_k)
        .collect();

    Ok(results)
}

/// Scores the full candidate vocabulary against a query vector and returns
/// `(vocabulary index, score)` pairs sorted by descending score, ties in
/// vocabulary order.
#[must_use]
pub fn score_candidates(model: &TwoTowerModel, query: &[f32]) -> Vec<(usize, f32)> {
    let items = model.item_tower();
    let mut scored: Vec<(usize, f32)> = (0..items.vocab().len())
        .map(|i| (i, ops::dot(query, items.table().row(i + 1))))
        .collect();

    // Stable sort keeps vocabulary order among equal scores.
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored
}
