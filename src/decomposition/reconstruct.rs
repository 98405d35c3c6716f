use super::Decomposition;
use crate::Matrix;
use ndarray::{Axis, s};

/// A rank-k approximation together with the k that produced it.
#[derive(Clone, Debug)]
pub struct Reconstruction {
    pub k: usize,
    pub matrix: Matrix,
}

/// Clamps a requested retention count into `[0, rank]`.
pub fn clamp_retention(k: i64, rank: usize) -> usize {
    if k <= 0 {
        0
    } else {
        (k as u64).min(rank as u64) as usize
    }
}

/// Rebuilds a matrix from the first `k` singular triplets.
///
/// Computes `(U[:, ..k] · diag(S[..k])) · Vᵗ[..k, :]`. Out-of-range `k` is
/// clamped, so `k <= 0` gives the zero matrix and `k >= rank` gives the full
/// reconstruction.
pub fn reconstruct(decomposition: &Decomposition, k: i64) -> Matrix {
    let k = clamp_retention(k, decomposition.rank());
    let (rows, cols) = decomposition.shape();
    if k == 0 {
        return Matrix::zeros((rows, cols));
    }

    let mut scaled = decomposition.u.slice(s![.., ..k]).to_owned();
    for (mut col, &sigma) in scaled
        .axis_iter_mut(Axis(1))
        .zip(decomposition.singular_values.iter())
    {
        col *= sigma;
    }

    scaled.dot(&decomposition.vt.slice(s![..k, ..]))
}

/// Turns retention fractions into singular value counts, `floor(f * rank)`.
pub fn retention_levels(rank: usize, fractions: &[f64]) -> Vec<usize> {
    fractions
        .iter()
        .map(|&f| ((f * rank as f64).floor().max(0.0) as usize).min(rank))
        .collect()
}

/// Reconstructs every level in `levels`, each clamped to the rank.
pub fn reconstruct_levels(decomposition: &Decomposition, levels: &[usize]) -> Vec<Reconstruction> {
    levels
        .iter()
        .map(|&k| {
            let k = k.min(decomposition.rank());
            Reconstruction {
                k,
                matrix: reconstruct(decomposition, k as i64),
            }
        })
        .collect()
}
