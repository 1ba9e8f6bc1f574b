//! # `tagrec` Core
//!
//! Two-tower retrieval engine for tag-based recommendation.
//!
//! `tagrec` trains embedding towers from a tagged item catalog: every tag
//! becomes a synthetic user (`tag::<token>`), every (tag, item) membership
//! becomes an interaction pair, and the towers learn to place matching
//! pairs close under the dot product. Recommendation is a brute-force
//! scored scan of the full candidate vocabulary.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tagrec_core::dataset::Catalog;
//! use tagrec_core::pipeline::train_from_catalog;
//! use tagrec_core::recommend::recommend_for_tags;
//! use tagrec_core::train::{TrainConfig, Trainer};
//!
//! fn main() -> tagrec_core::Result<()> {
//!     let catalog = Catalog::load_csv("recipes.csv")?;
//!     let trainer = Trainer::new(TrainConfig::default())?;
//!
//!     let run = train_from_catalog(&catalog, &trainer)?;
//!
//!     let tags = vec!["spicy".to_string(), "low-sodium".to_string()];
//!     let top = recommend_for_tags(&run.model, &catalog, &tags, 5)?;
//!     for rec in top {
//!         println!("{:.4}  {}  {}", rec.score, rec.recipe_id, rec.name);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub mod dataset;
pub mod error;
pub mod metrics;
pub mod model;
pub mod ops;
pub mod pipeline;
pub mod recommend;
pub mod train;
pub mod vocab;

pub use dataset::{split_tags, Catalog, Interaction, Recipe};
pub use error::{Error, Result};
pub use model::{EmbeddingTable, Tower, TwoTowerModel, ARTIFACT_VERSION};
pub use pipeline::{train_from_catalog, train_from_catalog_with, PipelineRun};
pub use recommend::{recommend_for_tags, Recommendation};
pub use train::{TrainConfig, TrainEvent, TrainReport, Trainer};
pub use vocab::Vocabulary;
