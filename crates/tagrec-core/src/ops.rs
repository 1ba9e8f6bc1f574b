//! Dense `f32` vector kernels shared by training and scoring.
//!
//! The recommendation path is a brute-force scan over the full catalog, so
//! these stay portable scalar loops with a 4-wide unrolled accumulator; the
//! compiler autovectorizes them well enough for catalog-sized workloads.

/// Dot product of two equal-length slices.
///
/// # Panics
///
/// Debug-asserts that both slices have the same length; in release builds a
/// shorter `b` truncates the sum.
#[must_use]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());

    let mut acc = [0.0f32; 4];
    let chunks = a.len() / 4;
    for i in 0..chunks {
        let base = i * 4;
        acc[0] += a[base] * b[base];
        acc[1] += a[base + 1] * b[base + 1];
        acc[2] += a[base + 2] * b[base + 2];
        acc[3] += a[base + 3] * b[base + 3];
    }

    let mut sum = acc[0] + acc[1] + acc[2] + acc[3];
    for i in (chunks * 4)..a.len() {
        sum += a[i] * b[i];
    }
    sum
}

/// In-place `y += alpha * x`.
pub fn axpy(alpha: f32, x: &[f32], y: &mut [f32]) {
    debug_assert_eq!(x.len(), y.len());
    for (yi, xi) in y.iter_mut().zip(x.iter()) {
        *yi += alpha * xi;
    }
}

/// Element-wise mean of a set of equal-length rows.
///
/// Returns a zero vector of `dim` when `rows` is empty; callers guard the
/// empty case before reaching here.
#[must_use]
pub fn mean_rows(rows: &[&[f32]], dim: usize) -> Vec<f32> {
    let mut out = vec![0.0f32; dim];
    if rows.is_empty() {
        return out;
    }

    for row in rows {
        axpy(1.0, row, &mut out);
    }

    #[allow(clippy::cast_precision_loss)]
    let inv = 1.0 / rows.len() as f32;
    for v in &mut out {
        *v *= inv;
    }
    out
}

/// Numerically stable softmax over a slice, written into `out`.
///
/// Subtracts the row maximum before exponentiation so large logits cannot
/// overflow.
pub fn softmax_into(logits: &[f32], out: &mut [f32]) {
    debug_assert_eq!(logits.len(), out.len());

    let max = logits.iter().fold(f32::NEG_INFINITY, |m, &v| m.max(v));
    let mut sum = 0.0f32;
    for (o, &l) in out.iter_mut().zip(logits.iter()) {
        let e = (l - max).exp();
        *o = e;
        sum += e;
    }
    let inv = 1.0 / sum;
    for o in out.iter_mut() {
        *o *= inv;
    }
}
