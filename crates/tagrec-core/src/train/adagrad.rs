//! Adagrad optimizer over embedding-table rows.
//!
//! Embedding gradients are sparse (only rows touched by a batch move), so
//! the optimizer applies per-row updates against a dense accumulator of
//! squared gradients.

/// Adagrad with per-parameter accumulated squared gradients.
///
/// # Update Rule
///
/// ```text
/// acc += g^2
/// theta -= lr * g / (sqrt(acc) + eps)
/// ```
///
/// The accumulator starts at `initial_accumulator` (default 0.1) so early
/// steps are not unbounded.
#[derive(Debug, Clone)]
pub struct Adagrad {
    learning_rate: f32,
    epsilon: f32,
    dim: usize,
    accum: Vec<f32>,
}

impl Adagrad {
    /// Default accumulator seed value.
    pub const DEFAULT_INITIAL_ACCUMULATOR: f32 = 0.1;
    /// Default numerical-stability epsilon.
    pub const DEFAULT_EPSILON: f32 = 1e-7;

    /// Creates an optimizer for a `rows x dim` table.
    #[must_use]
    pub fn new(learning_rate: f32, rows: usize, dim: usize) -> Self {
        Self {
            learning_rate,
            epsilon: Self::DEFAULT_EPSILON,
            dim,
            accum: vec![Self::DEFAULT_INITIAL_ACCUMULATOR; rows * dim],
        }
    }

    /// Overrides the stability epsilon.
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Returns the learning rate.
    #[must_use]
    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    /// Applies a gradient to one row of `params`.
    ///
    /// # Panics
    ///
    /// Debug-asserts `grad.len() == dim`.
    pub fn apply(&mut self, params: &mut [f32], row: usize, grad: &[f32]) {
        debug_assert_eq!(grad.len(), self.dim);
        debug_assert_eq!(params.len(), self.dim);

        let acc = &mut self.accum[row * self.dim..(row + 1) * self.dim];
        for ((p, a), &g) in params.iter_mut().zip(acc.iter_mut()).zip(grad.iter()) {
            *a += g * g;
            *p -= self.learning_rate * g / (a.sqrt() + self.epsilon);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_step_known_value() {
        let mut opt = Adagrad::new(0.1, 1, 1);
        let mut params = [1.0f32];
        opt.apply(&mut params, 0, &[1.0]);

        // acc = 0.1 + 1 = 1.1; step = 0.1 * 1 / (sqrt(1.1) + 1e-7)
        let expected = 1.0 - 0.1 / 1.1f32.sqrt();
        assert!((params[0] - expected).abs() < 1e-5);
    }

    #[test]
    fn test_steps_shrink_for_constant_gradient() {
        let mut opt = Adagrad::new(0.1, 1, 1);
        let mut params = [0.0f32];

        let mut prev = params[0];
        let mut last_step = f32::INFINITY;
        for _ in 0..5 {
            opt.apply(&mut params, 0, &[1.0]);
            let step = (prev - params[0]).abs();
            assert!(step < last_step, "effective step must shrink");
            last_step = step;
            prev = params[0];
        }
    }

    #[test]
    fn test_rows_accumulate_independently() {
        let mut opt = Adagrad::new(0.1, 2, 1);
        let mut row0 = [0.0f32];
        let mut row1 = [0.0f32];

        opt.apply(&mut row0, 0, &[1.0]);
        opt.apply(&mut row0, 0, &[1.0]);
        opt.apply(&mut row1, 1, &[1.0]);

        // Row 1's fresh first step equals row 0's first step; row 0's
        // second step was already smaller.
        let first_step = 0.1 / 1.1f32.sqrt();
        assert!((row1[0] + first_step).abs() < 1e-5);
        assert!(row0[0] < -first_step && row0[0] > -2.0 * first_step);
    }

    #[test]
    fn test_zero_gradient_is_noop() {
        let mut opt = Adagrad::new(0.1, 1, 2);
        let mut params = [0.5f32, -0.5];
        opt.apply(&mut params, 0, &[0.0, 0.0]);
        assert_eq!(params, [0.5, -0.5]);
    }
}
