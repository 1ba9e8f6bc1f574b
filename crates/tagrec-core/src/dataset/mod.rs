//! Dataset preparation: catalog loading, tag parsing, interaction
//! expansion, train/validation splitting, and mini-batching.
//!
//! The catalog is a CSV of recipes. Each recipe carries a free-text `tags`
//! column; parsing it yields the per-recipe tag list that drives the
//! synthetic user construction (`tag::<token>`).

mod batch;
mod interactions;
mod split;

pub use batch::{Batch, BatchIterator};
pub use interactions::{build_interactions, synthetic_user_id, Interaction, TAG_USER_PREFIX};
pub use split::{train_val_split, SplitSets};

use std::path::Path;

use crate::error::{Error, Result};

/// Required catalog columns, checked against the CSV header at load time.
const REQUIRED_COLUMNS: [&str; 5] = ["recipe_id", "name", "tags", "calories", "img_url"];

/// A single catalog entry with its parsed tag list.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    /// Catalog identifier, kept as a string throughout the pipeline
    pub recipe_id: String,
    /// Display name
    pub name: String,
    /// Raw tag column as it appeared in the CSV
    pub tags: String,
    /// Calorie count; `None` when the field is empty or unparseable
    pub calories: Option<f32>,
    /// Image URL
    pub img_url: String,
    /// Distinct non-empty tag tokens, in order of first appearance
    pub tag_list: Vec<String>,
}

/// The loaded recipe catalog.
///
/// Only recipes with at least one parsed tag are retained; the number of
/// rows dropped for having no usable tags is recorded for diagnostics.
#[derive(Debug, Clone)]
pub struct Catalog {
    recipes: Vec<Recipe>,
    dropped_untagged: usize,
}

impl Catalog {
    /// Loads the catalog from a CSV file.
    ///
    /// The header must contain `recipe_id`, `name`, `tags`, `calories` and
    /// `img_url`. Rows whose tag column parses to nothing are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CatalogNotFound`] if the file does not exist,
    /// [`Error::MissingColumn`] on a bad header, [`Error::EmptyDataset`]
    /// when no row survives tag parsing, and I/O or CSV errors otherwise.
    pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::CatalogNotFound(path.display().to_string()));
        }

        let mut reader = csv::Reader::from_path(path)?;

        let headers = reader.headers()?.clone();
        let col = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| Error::MissingColumn(name.to_string()))
        };
        let mut columns = [0usize; REQUIRED_COLUMNS.len()];
        for (slot, name) in columns.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = col(name)?;
        }
        let [id_col, name_col, tags_col, calories_col, img_col] = columns;

        let mut recipes = Vec::new();
        let mut dropped_untagged = 0usize;

        for record in reader.records() {
            let record = record?;
            let field = |i: usize| record.get(i).unwrap_or("").to_string();

            let tags = field(tags_col);
            let tag_list = split_tags(&tags);
            if tag_list.is_empty() {
                dropped_untagged += 1;
                continue;
            }

            recipes.push(Recipe {
                recipe_id: field(id_col),
                name: field(name_col),
                tags,
                calories: field(calories_col).trim().parse::<f32>().ok(),
                img_url: field(img_col),
                tag_list,
            });
        }

        if recipes.is_empty() {
            return Err(Error::EmptyDataset);
        }

        tracing::info!(
            recipes = recipes.len(),
            dropped_untagged,
            "catalog loaded"
        );

        Ok(Self {
            recipes,
            dropped_untagged,
        })
    }

    /// Builds a catalog directly from recipe records (used by tests and by
    /// callers that source the catalog elsewhere). Untagged recipes are
    /// dropped here as well.
    #[must_use]
    pub fn from_recipes(recipes: Vec<Recipe>) -> Self {
        let before = recipes.len();
        let recipes: Vec<Recipe> = recipes
            .into_iter()
            .filter(|r| !r.tag_list.is_empty())
            .collect();
        let dropped_untagged = before - recipes.len();
        Self {
            recipes,
            dropped_untagged,
        }
    }

    /// Retained recipes in catalog order.
    #[must_use]
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Number of rows dropped for carrying no parseable tag.
    #[must_use]
    pub fn dropped_untagged(&self) -> usize {
        self.dropped_untagged
    }

    /// Looks up a recipe by identifier with a linear scan.
    ///
    /// The catalog is scanned once per query result set; callers needing
    /// repeated lookups should index with [`Catalog::id_index`].
    #[must_use]
    pub fn find(&self, recipe_id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.recipe_id == recipe_id)
    }

    /// Builds an id-to-position index over the retained recipes.
    #[must_use]
    pub fn id_index(&self) -> std::collections::HashMap<&str, usize> {
        self.recipes
            .iter()
            .enumerate()
            .map(|(i, r)| (r.recipe_id.as_str(), i))
            .collect()
    }
}

/// Parses a raw tag string into distinct, trimmed, non-empty tokens.
///
/// Tokens are separated by `,`, `|` or `/`. Order of first appearance is
/// preserved; duplicates within one string collapse.
///
/// # Example
///
/// ```
/// use tagrec_core::dataset::split_tags;
///
/// assert_eq!(split_tags("a, b|c/d"), vec!["a", "b", "c", "d"]);
/// assert_eq!(split_tags("  , | "), Vec::<String>::new());
/// ```
#[must_use]
pub fn split_tags(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for token in raw.split(|c| c == ',' || c == '|' || c == '/') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        if !out.iter().any(|t| t == token) {
            out.push(token.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const HEADER: &str = "recipe_id,name,tags,calories,img_url\n";

    #[test]
    fn test_split_tags_mixed_separators() {
        assert_eq!(split_tags("a, b|c/d"), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_split_tags_whitespace_and_empties() {
        assert_eq!(split_tags(" spicy ,  , vegan "), vec!["spicy", "vegan"]);
        assert!(split_tags("").is_empty());
        assert!(split_tags(" , | / ").is_empty());
    }

    #[test]
    fn test_split_tags_dedupes_preserving_order() {
        assert_eq!(split_tags("b,a,b,a"), vec!["b", "a"]);
    }

    #[test]
    fn test_load_csv_drops_untagged_rows() {
        let file = write_csv(&format!(
            "{HEADER}r1,Bibimbap,\"spicy,rice\",550,http://img/1\nr2,Plain,,120,http://img/2\n"
        ));
        let catalog = Catalog::load_csv(file.path()).unwrap();
        assert_eq!(catalog.recipes().len(), 1);
        assert_eq!(catalog.dropped_untagged(), 1);
        assert_eq!(catalog.recipes()[0].tag_list, vec!["spicy", "rice"]);
    }

    #[test]
    fn test_load_csv_missing_file() {
        let err = Catalog::load_csv("/nonexistent/recipes.csv").unwrap_err();
        assert!(matches!(err, Error::CatalogNotFound(_)));
    }

    #[test]
    fn test_load_csv_missing_column() {
        let file = write_csv("recipe_id,name,calories,img_url\nr1,A,100,u\n");
        let err = Catalog::load_csv(file.path()).unwrap_err();
        assert!(matches!(err, Error::MissingColumn(c) if c == "tags"));
    }

    #[test]
    fn test_load_csv_all_rows_untagged() {
        let file = write_csv(&format!("{HEADER}r1,A,,100,u\nr2,B, ,200,u\n"));
        let err = Catalog::load_csv(file.path()).unwrap_err();
        assert!(matches!(err, Error::EmptyDataset));
    }

    #[test]
    fn test_load_csv_unparseable_calories() {
        let file = write_csv(&format!("{HEADER}r1,A,spicy,n/a,u\nr2,B,mild,250,u\n"));
        let catalog = Catalog::load_csv(file.path()).unwrap();
        assert_eq!(catalog.recipes()[0].calories, None);
        assert_eq!(catalog.recipes()[1].calories, Some(250.0));
    }

    #[test]
    fn test_find_by_id() {
        let file = write_csv(&format!("{HEADER}r1,A,spicy,100,u\nr2,B,mild,200,u\n"));
        let catalog = Catalog::load_csv(file.path()).unwrap();
        assert_eq!(catalog.find("r2").unwrap().name, "B");
        assert!(catalog.find("r3").is_none());
    }
}
