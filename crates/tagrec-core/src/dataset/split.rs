//! Seeded train/validation splitting of interaction pairs.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::Interaction;
use crate::error::{Error, Result};

/// Outcome of [`train_val_split`].
#[derive(Debug, Clone)]
pub struct SplitSets {
    /// Training pairs
    pub train: Vec<Interaction>,
    /// Validation pairs
    pub val: Vec<Interaction>,
}

/// Splits interactions into train/validation sets with a seeded shuffle.
///
/// The validation set takes `ceil(val_fraction * n)` pairs; the same seed
/// over the same input always produces the same membership.
///
/// # Errors
///
/// Returns [`Error::InvalidConfig`] when `val_fraction` is outside
/// `[0.0, 1.0)`.
pub fn train_val_split(
    interactions: &[Interaction],
    val_fraction: f64,
    seed: u64,
) -> Result<SplitSets> {
    if !(0.0..1.0).contains(&val_fraction) {
        return Err(Error::InvalidConfig(format!(
            "val_fraction must be in [0.0, 1.0), got {val_fraction}"
        )));
    }

    let mut order: Vec<usize> = (0..interactions.len()).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);

    #[allow(clippy::cast_precision_loss, clippy::cast_sign_loss)]
    #[allow(clippy::cast_possible_truncation)]
    let val_count = ((interactions.len() as f64) * val_fraction).ceil() as usize;

    let val = order[..val_count]
        .iter()
        .map(|&i| interactions[i].clone())
        .collect();
    let train = order[val_count..]
        .iter()
        .map(|&i| interactions[i].clone())
        .collect();

    Ok(SplitSets { train, val })
}
