//! Retrieval training: epoch loop, loss, optimizer, and evaluation.

mod adagrad;
mod loss;

pub use adagrad::Adagrad;
pub use loss::{in_batch_softmax_loss, in_batch_softmax_step, BatchStep};

use crate::dataset::{BatchIterator, Interaction};
use crate::error::{Error, Result};
use crate::metrics::{factorized_rank, top_k_accuracies};
use crate::model::TwoTowerModel;
use crate::ops;
use crate::vocab::Vocabulary;

/// Training hyperparameters.
///
/// Defaults reproduce the reference configuration: batch 1024, dimension
/// 64, 3 epochs, Adagrad at 0.1, 10% validation, seed 42.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainConfig {
    /// Number of passes over the training pairs
    pub epochs: usize,
    /// Pairs per mini-batch (also the in-batch negative pool size)
    pub batch_size: usize,
    /// Embedding dimension of both towers
    pub embed_dim: usize,
    /// Adagrad learning rate
    pub learning_rate: f32,
    /// Fraction of interactions held out for validation
    pub val_fraction: f64,
    /// Seed driving init, the split, and per-epoch shuffles
    pub seed: u64,
    /// Cutoffs for factorized top-K evaluation
    pub eval_ks: Vec<usize>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            epochs: 3,
            batch_size: 1024,
            embed_dim: 64,
            learning_rate: 0.1,
            val_fraction: 0.1,
            seed: 42,
            eval_ks: vec![1, 5, 10, 50, 100],
        }
    }
}

impl TrainConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for zero epochs/batch/dimension,
    /// a non-positive learning rate, or a validation fraction outside
    /// `[0.0, 1.0)`.
    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(Error::InvalidConfig("epochs must be at least 1".into()));
        }
        if self.batch_size == 0 {
            return Err(Error::InvalidConfig("batch_size must be at least 1".into()));
        }
        if self.embed_dim == 0 {
            return Err(Error::InvalidConfig("embed_dim must be at least 1".into()));
        }
        if self.learning_rate <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if !(0.0..1.0).contains(&self.val_fraction) {
            return Err(Error::InvalidConfig(format!(
                "val_fraction must be in [0.0, 1.0), got {}",
                self.val_fraction
            )));
        }
        Ok(())
    }
}

/// Per-epoch training outcome.
#[derive(Debug, Clone)]
pub struct EpochReport {
    /// 1-based epoch number
    pub epoch: usize,
    /// Mean training loss over the epoch's batches
    pub train_loss: f32,
    /// Mean validation loss; `None` when the validation split is empty
    pub val_loss: Option<f32>,
    /// Factorized top-K accuracy per requested cutoff
    pub top_k_accuracy: Vec<(usize, f64)>,
}

/// Full training outcome.
#[derive(Debug, Clone)]
pub struct TrainReport {
    /// One entry per completed epoch
    pub epochs: Vec<EpochReport>,
}

/// Progress notifications emitted during [`Trainer::fit_with`].
#[derive(Debug, Clone, Copy)]
pub enum TrainEvent<'a> {
    /// An epoch is starting
    EpochStart {
        /// 1-based epoch number
        epoch: usize,
        /// Total epochs configured
        total_epochs: usize,
        /// Batches this epoch will run
        batches: usize,
    },
    /// A batch finished
    BatchEnd {
        /// 1-based epoch number
        epoch: usize,
        /// 0-based batch index within the epoch
        batch: usize,
        /// Loss of this batch
        loss: f32,
    },
    /// An epoch finished
    EpochEnd(&'a EpochReport),
}

/// Drives the two-tower training loop.
pub struct Trainer {
    config: TrainConfig,
}

impl Trainer {
    /// Creates a trainer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the configuration is invalid.
    pub fn new(config: TrainConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The trainer's configuration.
    #[must_use]
    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    /// Trains a fresh model; see [`Trainer::fit_with`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyDataset`] when the training split is empty.
    pub fn fit(
        &self,
        train: &[Interaction],
        val: &[Interaction],
        users: Vocabulary,
        items: Vocabulary,
    ) -> Result<(TwoTowerModel, TrainReport)> {
        self.fit_with(train, val, users, items, |_| {})
    }

    /// Trains a fresh model, emitting [`TrainEvent`]s to `observer`.
    ///
    /// Initialization, batching, and the split upstream are all seeded, so
    /// identical inputs and configuration produce an identical model.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyDataset`] when the training split is empty.
    pub fn fit_with<F>(
        &self,
        train: &[Interaction],
        val: &[Interaction],
        users: Vocabulary,
        items: Vocabulary,
        mut observer: F,
    ) -> Result<(TwoTowerModel, TrainReport)>
    where
        F: FnMut(TrainEvent),
    {
        if train.is_empty() {
            return Err(Error::EmptyDataset);
        }

        let cfg = &self.config;
        let mut model = TwoTowerModel::new(users, items, cfg.embed_dim, cfg.seed);

        let mut batches = BatchIterator::new(
            train,
            model.user_tower().vocab(),
            model.item_tower().vocab(),
            cfg.batch_size,
            cfg.seed.wrapping_add(1),
        );
        let val_batches = BatchIterator::new(
            val,
            model.user_tower().vocab(),
            model.item_tower().vocab(),
            cfg.batch_size,
            cfg.seed.wrapping_add(2),
        )
        .sequential();

        let mut user_opt = Adagrad::new(
            cfg.learning_rate,
            model.user_tower().table().rows(),
            cfg.embed_dim,
        );
        let mut item_opt = Adagrad::new(
            cfg.learning_rate,
            model.item_tower().table().rows(),
            cfg.embed_dim,
        );

        let mut epochs = Vec::with_capacity(cfg.epochs);
        for epoch in 1..=cfg.epochs {
            let epoch_batches = batches.epoch();
            observer(TrainEvent::EpochStart {
                epoch,
                total_epochs: cfg.epochs,
                batches: epoch_batches.len(),
            });

            let mut loss_sum = 0.0f32;
            for (batch_idx, batch) in epoch_batches.iter().enumerate() {
                let step = in_batch_softmax_step(&model, batch);
                let (user_tower, item_tower) = model.towers_mut();
                for (&row, grad) in &step.user_grads {
                    user_opt.apply(user_tower.table_mut().row_mut(row), row, grad);
                }
                for (&row, grad) in &step.item_grads {
                    item_opt.apply(item_tower.table_mut().row_mut(row), row, grad);
                }

                loss_sum += step.loss;
                observer(TrainEvent::BatchEnd {
                    epoch,
                    batch: batch_idx,
                    loss: step.loss,
                });
            }

            #[allow(clippy::cast_precision_loss)]
            let train_loss = loss_sum / epoch_batches.len() as f32;

            let val_loss = mean_val_loss(&model, &val_batches);
            let top_k_accuracy = evaluate_factorized_top_k(&model, val, &cfg.eval_ks);

            let report = EpochReport {
                epoch,
                train_loss,
                val_loss,
                top_k_accuracy,
            };
            tracing::info!(
                epoch,
                train_loss,
                val_loss = val_loss.unwrap_or(f32::NAN),
                "epoch complete"
            );
            observer(TrainEvent::EpochEnd(&report));
            epochs.push(report);
        }

        Ok((model, TrainReport { epochs }))
    }
}

fn mean_val_loss(model: &TwoTowerModel, val_batches: &[crate::dataset::Batch]) -> Option<f32> {
    if val_batches.is_empty() {
        return None;
    }
    let sum: f32 = val_batches
        .iter()
        .map(|b| in_batch_softmax_loss(model, b))
        .sum();
    #[allow(clippy::cast_precision_loss)]
    let mean = sum / val_batches.len() as f32;
    Some(mean)
}

/// Scores every validation pair against the full candidate vocabulary and
/// reports top-K accuracy at each cutoff.
///
/// This is the factorized-retrieval evaluation: the true recipe competes
/// with the whole catalog, not just in-batch negatives.
#[must_use]
pub fn evaluate_factorized_top_k(
    model: &TwoTowerModel,
    val: &[Interaction],
    ks: &[usize],
) -> Vec<(usize, f64)> {
    if val.is_empty() || ks.is_empty() {
        return ks.iter().map(|&k| (k, 0.0)).collect();
    }

    let items = model.item_tower();
    let n_items = items.vocab().len();
    let mut scores = vec![0.0f32; n_items];

    let ranks: Vec<usize> = val
        .iter()
        .map(|pair| {
            let user_emb = model.user_tower().lookup(&pair.user_id);
            for (i, score) in scores.iter_mut().enumerate() {
                // Vocabulary entry i occupies table row i + 1.
                *score = ops::dot(user_emb, items.table().row(i + 1));
            }
            let true_idx = items.vocab().row_of(&pair.recipe_id).saturating_sub(1);
            factorized_rank(&scores, true_idx)
        })
        .collect();

    top_k_accuracies(&ranks, ks)
}
