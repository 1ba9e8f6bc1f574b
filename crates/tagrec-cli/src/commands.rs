//! Subcommand implementations for the `tagrec` binary.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tagrec_core::dataset::Catalog;
use tagrec_core::pipeline::train_from_catalog_with;
use tagrec_core::recommend::recommend_for_tags;
use tagrec_core::train::{TrainConfig, TrainEvent, Trainer};
use tagrec_core::{split_tags, TwoTowerModel};

use crate::output;

/// Arguments for `tagrec train`.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Path to the recipe catalog CSV
    #[arg(short, long, env = "TAGREC_DATA")]
    pub data: PathBuf,

    /// Number of training epochs
    #[arg(long, default_value_t = 3, env = "TAGREC_EPOCHS")]
    pub epochs: usize,

    /// Mini-batch size (also the in-batch negative pool)
    #[arg(long, default_value_t = 1024, env = "TAGREC_BATCH_SIZE")]
    pub batch_size: usize,

    /// Embedding dimension of both towers
    #[arg(long, default_value_t = 64, env = "TAGREC_EMBED_DIM")]
    pub embed_dim: usize,

    /// Adagrad learning rate
    #[arg(long, default_value_t = 0.1, env = "TAGREC_LEARNING_RATE")]
    pub learning_rate: f32,

    /// Fraction of interactions held out for validation
    #[arg(long, default_value_t = 0.1, env = "TAGREC_VAL_FRACTION")]
    pub val_fraction: f64,

    /// Seed for init, splitting, and shuffles
    #[arg(long, default_value_t = 42, env = "TAGREC_SEED")]
    pub seed: u64,

    /// Write the trained model artifact to this path
    #[arg(long, env = "TAGREC_SAVE_MODEL")]
    pub save_model: Option<PathBuf>,

    /// Preferred tags to query after training (comma/pipe/slash separated)
    #[arg(long)]
    pub tags: Option<String>,

    /// Number of recommendations to print
    #[arg(long, default_value_t = 5)]
    pub top_k: usize,
}

/// Arguments for `tagrec recommend`.
#[derive(Args, Debug)]
pub struct RecommendArgs {
    /// Path to a saved model artifact
    #[arg(short, long, env = "TAGREC_MODEL")]
    pub model: PathBuf,

    /// Path to the recipe catalog CSV (for joining results)
    #[arg(short, long, env = "TAGREC_DATA")]
    pub data: PathBuf,

    /// Preferred tags (comma/pipe/slash separated)
    #[arg(long)]
    pub tags: String,

    /// Number of recommendations to print
    #[arg(long, default_value_t = 5)]
    pub top_k: usize,
}

/// Runs the training pipeline, then the optional post-training query.
pub fn train(args: &TrainArgs) -> anyhow::Result<()> {
    let catalog = Catalog::load_csv(&args.data)
        .with_context(|| format!("loading catalog from {}", args.data.display()))?;

    println!(
        "{} {} recipes ({} untagged rows dropped)",
        "Catalog:".bold(),
        catalog.recipes().len(),
        catalog.dropped_untagged()
    );

    let config = TrainConfig {
        epochs: args.epochs,
        batch_size: args.batch_size,
        embed_dim: args.embed_dim,
        learning_rate: args.learning_rate,
        val_fraction: args.val_fraction,
        seed: args.seed,
        ..TrainConfig::default()
    };
    let trainer = Trainer::new(config).context("invalid training configuration")?;
    tracing::debug!(config = ?trainer.config(), "training configuration");

    let mut bar: Option<ProgressBar> = None;
    let run = train_from_catalog_with(&catalog, &trainer, |event| match event {
        TrainEvent::EpochStart {
            epoch,
            total_epochs,
            batches,
        } => {
            let pb = ProgressBar::new(batches as u64);
            pb.set_style(
                ProgressStyle::with_template(
                    "{prefix:>10} [{bar:30.cyan/blue}] {pos}/{len} {msg}",
                )
                .expect("valid progress template")
                .progress_chars("=> "),
            );
            pb.set_prefix(format!("epoch {epoch}/{total_epochs}"));
            bar = Some(pb);
        }
        TrainEvent::BatchEnd { loss, .. } => {
            if let Some(pb) = &bar {
                pb.set_message(format!("loss {loss:.4}"));
                pb.inc(1);
            }
        }
        TrainEvent::EpochEnd(report) => {
            if let Some(pb) = bar.take() {
                pb.finish_and_clear();
            }
            output::print_epoch(report);
        }
    })
    .context("training failed")?;

    println!(
        "{} {} pairs ({} train / {} validation)",
        "Interactions:".bold(),
        run.interaction_count,
        run.train_count,
        run.val_count
    );

    if let Some(path) = &args.save_model {
        run.model
            .save(path)
            .with_context(|| format!("saving model to {}", path.display()))?;
        println!("{} {}", "Saved model:".bold(), path.display().to_string().green());
    }

    if let Some(raw_tags) = &args.tags {
        query_and_print(&run.model, &catalog, raw_tags, args.top_k)?;
    }

    Ok(())
}

/// Loads a saved artifact and queries it.
pub fn recommend(args: &RecommendArgs) -> anyhow::Result<()> {
    let model = TwoTowerModel::load(&args.model)
        .with_context(|| format!("loading model from {}", args.model.display()))?;
    let catalog = Catalog::load_csv(&args.data)
        .with_context(|| format!("loading catalog from {}", args.data.display()))?;

    query_and_print(&model, &catalog, &args.tags, args.top_k)
}

fn query_and_print(
    model: &TwoTowerModel,
    catalog: &Catalog,
    raw_tags: &str,
    top_k: usize,
) -> anyhow::Result<()> {
    let tags = split_tags(raw_tags);
    let results = recommend_for_tags(model, catalog, &tags, top_k)
        .with_context(|| format!("scoring tags {tags:?}"))?;

    println!(
        "\n{} {}",
        "Recommendations for".bold(),
        tags.join(", ").cyan()
    );
    output::print_recommendations(&results);
    Ok(())
}
