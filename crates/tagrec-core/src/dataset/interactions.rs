//! Synthetic user-recipe interaction expansion.
//!
//! Every (tag, recipe) membership becomes one interaction pair, with the
//! tag promoted to a synthetic user identity. Pairs are deduplicated; the
//! first occurrence wins and the original encounter order is preserved so
//! downstream shuffles are the only source of reordering.

use std::collections::HashSet;

use super::Catalog;

/// Prefix that turns a tag token into a synthetic user identifier.
pub const TAG_USER_PREFIX: &str = "tag::";

/// One "this recipe carries this tag" observation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Interaction {
    /// Synthetic user id (`tag::<token>`)
    pub user_id: String,
    /// Recipe identifier
    pub recipe_id: String,
}

/// Builds the synthetic user id for a tag token.
#[must_use]
pub fn synthetic_user_id(tag: &str) -> String {
    format!("{TAG_USER_PREFIX}{tag}")
}

/// Expands a catalog into deduplicated interaction pairs.
///
/// A recipe tagged `{a, b}` yields exactly `(tag::a, id)` and
/// `(tag::b, id)`; identical pairs arising from multiple source rows
/// collapse to one.
#[must_use]
pub fn build_interactions(catalog: &Catalog) -> Vec<Interaction> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut interactions = Vec::new();

    for recipe in catalog.recipes() {
        for tag in &recipe.tag_list {
            let key = (synthetic_user_id(tag), recipe.recipe_id.clone());
            if seen.insert(key.clone()) {
                interactions.push(Interaction {
                    user_id: key.0,
                    recipe_id: key.1,
                });
            }
        }
    }

    tracing::info!(pairs = interactions.len(), "interactions expanded");
    interactions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{split_tags, Recipe};

    fn recipe(id: &str, tags: &str) -> Recipe {
        Recipe {
            recipe_id: id.to_string(),
            name: format!("recipe {id}"),
            tags: tags.to_string(),
            calories: Some(100.0),
            img_url: String::new(),
            tag_list: split_tags(tags),
        }
    }

    #[test]
    fn test_two_tags_two_pairs() {
        let catalog = Catalog::from_recipes(vec![recipe("r1", "a,b")]);
        let pairs = build_interactions(&catalog);
        assert_eq!(
            pairs,
            vec![
                Interaction {
                    user_id: "tag::a".into(),
                    recipe_id: "r1".into()
                },
                Interaction {
                    user_id: "tag::b".into(),
                    recipe_id: "r1".into()
                },
            ]
        );
    }

    #[test]
    fn test_duplicate_pairs_collapse() {
        // Same (tag, recipe) pair from two source rows.
        let catalog =
            Catalog::from_recipes(vec![recipe("r1", "a,a|a"), recipe("r1", "a")]);
        let pairs = build_interactions(&catalog);
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn test_encounter_order_preserved() {
        let catalog = Catalog::from_recipes(vec![recipe("r2", "z,a"), recipe("r1", "m")]);
        let pairs = build_interactions(&catalog);
        let users: Vec<&str> = pairs.iter().map(|p| p.user_id.as_str()).collect();
        assert_eq!(users, vec!["tag::z", "tag::a", "tag::m"]);
    }

    #[test]
    fn test_determinism() {
        let make = || {
            let catalog = Catalog::from_recipes(vec![
                recipe("r1", "a,b"),
                recipe("r2", "b,c"),
                recipe("r3", "a"),
            ]);
            build_interactions(&catalog)
        };
        assert_eq!(make(), make());
    }
}
