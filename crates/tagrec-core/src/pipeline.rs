//! End-to-end training pipeline: catalog in, trained model out.
//!
//! Assembles the stages in order — interaction expansion, train/validation
//! split, vocabulary construction, tower training — so callers (the CLI,
//! tests) drive one entry point instead of wiring the stages themselves.

use crate::dataset::{build_interactions, train_val_split, Catalog};
use crate::error::Result;
use crate::model::TwoTowerModel;
use crate::train::{TrainEvent, TrainReport, Trainer};
use crate::vocab::Vocabulary;

/// Everything a training run produces.
#[derive(Debug)]
pub struct PipelineRun {
    /// The trained towers
    pub model: TwoTowerModel,
    /// Per-epoch losses and metrics
    pub report: TrainReport,
    /// Total deduplicated interaction pairs
    pub interaction_count: usize,
    /// Pairs in the training split
    pub train_count: usize,
    /// Pairs in the validation split
    pub val_count: usize,
}

/// Runs the full pipeline over a loaded catalog.
///
/// # Errors
///
/// Propagates configuration, split, and training errors from the
/// underlying stages.
pub fn train_from_catalog(catalog: &Catalog, trainer: &Trainer) -> Result<PipelineRun> {
    train_from_catalog_with(catalog, trainer, |_| {})
}

/// Like [`train_from_catalog`], forwarding [`TrainEvent`]s to `observer`.
///
/// # Errors
///
/// Propagates configuration, split, and training errors from the
/// underlying stages.
pub fn train_from_catalog_with<F>(
    catalog: &Catalog,
    trainer: &Trainer,
    observer: F,
) -> Result<PipelineRun>
where
    F: FnMut(TrainEvent),
{
    let cfg = trainer.config();

    let interactions = build_interactions(catalog);
    let interaction_count = interactions.len();

    let sets = train_val_split(&interactions, cfg.val_fraction, cfg.seed)?;
    tracing::info!(
        train = sets.train.len(),
        val = sets.val.len(),
        "interactions split"
    );

    // User vocabulary comes from the interactions; the candidate
    // vocabulary covers every retained recipe in the catalog.
    let users = Vocabulary::from_ids(interactions.iter().map(|p| p.user_id.clone()));
    let items = Vocabulary::from_ids(catalog.recipes().iter().map(|r| r.recipe_id.clone()));

    let (model, report) = trainer.fit_with(&sets.train, &sets.val, users, items, observer)?;

    Ok(PipelineRun {
        model,
        report,
        interaction_count,
        train_count: sets.train.len(),
        val_count: sets.val.len(),
    })
}
