//! In-batch sampled-softmax retrieval loss.
//!
//! For a batch of B positive (user, item) pairs, every other item in the
//! batch serves as a negative candidate: logits are the B x B matrix of
//! user-item dot products, the positive for row `i` sits on the diagonal,
//! and the loss is the mean categorical cross-entropy of the diagonal.
//! Gradients flow to every user and item row the batch touches; duplicate
//! rows accumulate.

use std::collections::HashMap;

use crate::dataset::Batch;
use crate::model::TwoTowerModel;
use crate::ops;

/// Loss and per-row gradients for one batch.
#[derive(Debug)]
pub struct BatchStep {
    /// Mean cross-entropy over the batch
    pub loss: f32,
    /// Accumulated gradients per user-tower row
    pub user_grads: HashMap<usize, Vec<f32>>,
    /// Accumulated gradients per item-tower row
    pub item_grads: HashMap<usize, Vec<f32>>,
}

/// Computes the in-batch softmax loss and its gradients.
///
/// Cost is O(B^2 * dim) in the batch size; the B x B probability matrix is
/// materialized row by row and never stored whole.
#[must_use]
pub fn in_batch_softmax_step(model: &TwoTowerModel, batch: &Batch) -> BatchStep {
    let dim = model.dim();
    let b = batch.len();
    debug_assert!(b > 0);

    let user_rows: Vec<&[f32]> = batch
        .user_rows
        .iter()
        .map(|&r| model.user_tower().table().row(r))
        .collect();
    let item_rows: Vec<&[f32]> = batch
        .item_rows
        .iter()
        .map(|&r| model.item_tower().table().row(r))
        .collect();

    let mut user_grads: HashMap<usize, Vec<f32>> = HashMap::new();
    let mut item_grads: HashMap<usize, Vec<f32>> = HashMap::new();

    #[allow(clippy::cast_precision_loss)]
    let inv_b = 1.0 / b as f32;

    let mut logits = vec![0.0f32; b];
    let mut probs = vec![0.0f32; b];
    let mut loss = 0.0f32;

    for i in 0..b {
        for (logit, item) in logits.iter_mut().zip(&item_rows) {
            *logit = ops::dot(user_rows[i], item);
        }
        ops::softmax_into(&logits, &mut probs);

        loss -= probs[i].max(f32::MIN_POSITIVE).ln();

        // dS[i][j] = (P[i][j] - [i == j]) / B
        let user_grad = user_grads
            .entry(batch.user_rows[i])
            .or_insert_with(|| vec![0.0; dim]);
        for j in 0..b {
            let coeff = (probs[j] - f32::from(u8::from(i == j))) * inv_b;
            ops::axpy(coeff, item_rows[j], user_grad);
        }

        for j in 0..b {
            let coeff = (probs[j] - f32::from(u8::from(i == j))) * inv_b;
            let item_grad = item_grads
                .entry(batch.item_rows[j])
                .or_insert_with(|| vec![0.0; dim]);
            ops::axpy(coeff, user_rows[i], item_grad);
        }
    }

    BatchStep {
        loss: loss * inv_b,
        user_grads,
        item_grads,
    }
}

/// Loss only, for validation passes.
#[must_use]
pub fn in_batch_softmax_loss(model: &TwoTowerModel, batch: &Batch) -> f32 {
    let b = batch.len();
    debug_assert!(b > 0);

    let user_rows: Vec<&[f32]> = batch
        .user_rows
        .iter()
        .map(|&r| model.user_tower().table().row(r))
        .collect();
    let item_rows: Vec<&[f32]> = batch
        .item_rows
        .iter()
        .map(|&r| model.item_tower().table().row(r))
        .collect();

    let mut logits = vec![0.0f32; b];
    let mut probs = vec![0.0f32; b];
    let mut loss = 0.0f32;
    for i in 0..b {
        for (logit, item) in logits.iter_mut().zip(&item_rows) {
            *logit = ops::dot(user_rows[i], item);
        }
        ops::softmax_into(&logits, &mut probs);
        loss -= probs[i].max(f32::MIN_POSITIVE).ln();
    }

    #[allow(clippy::cast_precision_loss)]
    let mean = loss / b as f32;
    mean
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::Vocabulary;

    fn tiny_model() -> TwoTowerModel {
        TwoTowerModel::new(
            Vocabulary::from_ids(["tag::a", "tag::b"]),
            Vocabulary::from_ids(["r1", "r2"]),
            4,
            42,
        )
    }

    fn batch(user_rows: Vec<usize>, item_rows: Vec<usize>) -> Batch {
        Batch {
            user_rows,
            item_rows,
        }
    }

    #[test]
    fn test_uniform_logits_loss_is_ln_b() {
        // Zeroed towers give identical (zero) logits everywhere, so the
        // softmax is uniform and the loss is ln(B).
        let mut model = tiny_model();
        for row in 0..model.user_tower().table().rows() {
            model.towers_mut().0.table_mut().row_mut(row).fill(0.0);
        }
        let b = batch(vec![1, 2], vec![1, 2]);
        let loss = in_batch_softmax_loss(&model, &b);
        assert!((loss - 2.0f32.ln()).abs() < 1e-5);
    }

    #[test]
    fn test_gradients_reduce_loss() {
        let model = tiny_model();
        let b = batch(vec![1, 2], vec![1, 2]);

        let step = in_batch_softmax_step(&model, &b);
        let before = step.loss;

        // Manual gradient-descent step (no optimizer state) in the descent
        // direction must reduce the loss for a small enough rate.
        let mut updated = model.clone();
        let lr = 0.05f32;
        {
            let (users, items) = updated.towers_mut();
            for (&row, grad) in &step.user_grads {
                let params = users.table_mut().row_mut(row);
                for (p, g) in params.iter_mut().zip(grad) {
                    *p -= lr * g;
                }
            }
            for (&row, grad) in &step.item_grads {
                let params = items.table_mut().row_mut(row);
                for (p, g) in params.iter_mut().zip(grad) {
                    *p -= lr * g;
                }
            }
        }

        let after = in_batch_softmax_loss(&updated, &b);
        assert!(after < before, "loss must decrease: {before} -> {after}");
    }

    #[test]
    fn test_duplicate_rows_accumulate() {
        let model = tiny_model();
        // Same user row appears twice.
        let b = batch(vec![1, 1], vec![1, 2]);
        let step = in_batch_softmax_step(&model, &b);
        assert_eq!(step.user_grads.len(), 1);
        assert_eq!(step.item_grads.len(), 2);
    }

    #[test]
    fn test_gradient_matches_finite_difference() {
        let model = tiny_model();
        let b = batch(vec![1, 2], vec![2, 1]);
        let step = in_batch_softmax_step(&model, &b);

        // Perturb one user coordinate and compare the loss delta with the
        // analytic gradient.
        let eps = 1e-3f32;
        let grad = step.user_grads.get(&1).unwrap()[0];

        let mut plus = model.clone();
        plus.towers_mut().0.table_mut().row_mut(1)[0] += eps;
        let mut minus = model.clone();
        minus.towers_mut().0.table_mut().row_mut(1)[0] -= eps;

        let numeric = (in_batch_softmax_loss(&plus, &b) - in_batch_softmax_loss(&minus, &b))
            / (2.0 * eps);
        assert!(
            (grad - numeric).abs() < 1e-2,
            "analytic {grad} vs numeric {numeric}"
        );
    }
}
