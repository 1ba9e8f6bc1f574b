//! Fuzz target for the dense vector kernels.
//!
//! Tests dot/axpy/mean/softmax with arbitrary vectors to find:
//! - Panics on edge cases (NaN, Inf, very large/small values)
//! - Numerical stability issues (softmax must stay finite and normalized
//!   for finite input)
//!
//! # Running
//!
//! ```bash
//! cd fuzz
//! cargo +nightly fuzz run fuzz_vector_ops
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tagrec_core::ops::{axpy, dot, mean_rows, softmax_into};

/// Fuzzing input for kernel calls.
#[derive(Arbitrary, Debug)]
struct OpsInput {
    /// First vector (limited to reasonable size)
    vec_a: Vec<f32>,
    /// Second vector (will be truncated/padded to match vec_a length)
    vec_b: Vec<f32>,
    /// Scale factor for axpy
    alpha: f32,
}

fuzz_target!(|input: OpsInput| {
    if input.vec_a.is_empty() {
        return;
    }

    // Limit vector size to prevent OOM
    let max_dim = 2048;
    let dim = input.vec_a.len().min(max_dim);

    let a: Vec<f32> = input.vec_a.into_iter().take(dim).collect();
    let mut b: Vec<f32> = input.vec_b.into_iter().take(dim).collect();
    b.resize(dim, 0.0);

    // None of these may panic.
    let _ = dot(&a, &b);
    axpy(input.alpha, &a, &mut b);
    let _ = mean_rows(&[&a, &b], dim);

    let mut probs = vec![0.0f32; dim];
    softmax_into(&a, &mut probs);
    if a.iter().all(|v| v.is_finite()) {
        let sum: f32 = probs.iter().sum();
        assert!(sum.is_finite());
    }
});
