use crate::error::{InputError, Result, SvdError};
use crate::{Matrix, Vector};
use ndarray::{Axis, s};
use std::cmp::Ordering;
use tracing::{debug, warn};

const DEFAULT_MAX_SWEEPS: usize = 60;

/// Shape of the factors produced by [`Decomposer`].
///
/// With `r = min(M, N)`:
/// - `Economy`: `u` is M×r, `vt` is r×N.
/// - `Full`: `u` is M×M, `vt` is N×N. The extra basis vectors pair with
///   implicit zero singular values.
///
/// `singular_values` always has length r.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Layout {
    #[default]
    Economy,
    Full,
}

/// The factors `A = U · diag(S) · Vᵗ` of a matrix.
///
/// Rows of `vt` are the right singular vectors. Singular values are sorted
/// in non-increasing order.
#[derive(Clone, Debug)]
pub struct Decomposition {
    pub u: Matrix,
    pub singular_values: Vector,
    pub vt: Matrix,
}

impl Decomposition {
    /// Number of singular values, `min(M, N)`.
    pub fn rank(&self) -> usize {
        self.singular_values.len()
    }

    /// Shape `(M, N)` of the decomposed matrix.
    pub fn shape(&self) -> (usize, usize) {
        (self.u.nrows(), self.vt.ncols())
    }

    /// Count of singular values strictly above `tol` times the largest one.
    pub fn numerical_rank(&self, tol: f64) -> usize {
        let s_max = self.singular_values.get(0).copied().unwrap_or(0.0);
        self.singular_values
            .iter()
            .filter(|&&sigma| sigma > tol * s_max)
            .count()
    }

    /// Fraction of the squared spectrum carried by the first `k` values.
    ///
    /// A zero matrix has nothing to lose, so its ratio is 1.0 for every k.
    pub fn energy_ratio(&self, k: usize) -> f64 {
        let s_max = self.singular_values.get(0).copied().unwrap_or(0.0);
        if s_max == 0.0 {
            return 1.0;
        }
        let energy = self.singular_values.mapv(|sigma| (sigma / s_max).powi(2));
        let total = energy.sum();
        let k = k.min(self.rank());
        energy.slice(s![..k]).sum() / total
    }

    /// Rank-`k` approximation, see [`reconstruct`](super::reconstruct).
    pub fn reconstruct(&self, k: i64) -> Matrix {
        super::reconstruct(self, k)
    }
}

/// One-sided Jacobi SVD.
///
/// Tall inputs are orthogonalized column by column; wide inputs are
/// decomposed through their transpose.
#[derive(Clone, Debug)]
pub struct Decomposer {
    layout: Layout,
    max_sweeps: usize,
    tolerance: Option<f64>,
}

impl Decomposer {
    pub fn new() -> Self {
        Self {
            layout: Layout::Economy,
            max_sweeps: DEFAULT_MAX_SWEEPS,
            tolerance: None,
        }
    }

    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn max_sweeps(mut self, max_sweeps: usize) -> Self {
        self.max_sweeps = max_sweeps;
        self
    }

    /// Column pairs whose normalized inner product is at or below `tolerance`
    /// count as orthogonal. Defaults to a small multiple of machine epsilon.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    pub fn decompose(&self, x: &Matrix) -> Result<Decomposition> {
        validate(x)?;

        let (m, n) = x.dim();
        let transposed = m < n;
        let work = if transposed { x.t().to_owned() } else { x.to_owned() };
        let (rows, cols) = work.dim();

        // Sums of squares of the raw entries overflow near 1e154 and lose
        // precision below 1e-154, so sweep on the matrix divided by max|a_ij|.
        let scale = max_abs(&work);
        let work = if scale > 0.0 { work / scale } else { work };

        let tol = self
            .tolerance
            .unwrap_or(f64::EPSILON * rows.max(64) as f64);
        let (w, v, sweeps) = self.orthogonalize(work, tol)?;

        // Singular values are the column norms of W = A·V.
        let norms: Vec<f64> = w
            .axis_iter(Axis(1))
            .map(|col| col.dot(&col).sqrt())
            .collect();
        let mut order: Vec<usize> = (0..cols).collect();
        order.sort_by(|&a, &b| norms[b].partial_cmp(&norms[a]).unwrap_or(Ordering::Equal));

        let cutoff = norms[order[0]] * f64::EPSILON * rows as f64;
        let mut left = Matrix::zeros((rows, cols));
        let mut right = Matrix::zeros((cols, cols));
        let mut singular_values = Vector::zeros(cols);
        let mut null_columns = Vec::new();

        for (dst, &src) in order.iter().enumerate() {
            let sigma = norms[src];
            singular_values[dst] = sigma * scale;
            right.column_mut(dst).assign(&v.column(src));
            if sigma > cutoff && sigma > 0.0 {
                left.column_mut(dst).assign(&(&w.column(src) / sigma));
            } else {
                null_columns.push(dst);
            }
        }
        complete_basis(&mut left, &null_columns);

        if self.layout == Layout::Full && rows > cols {
            let mut full = Matrix::zeros((rows, rows));
            full.slice_mut(s![.., ..cols]).assign(&left);
            complete_basis(&mut full, &(cols..rows).collect::<Vec<_>>());
            left = full;
        }

        let decomposition = if transposed {
            Decomposition {
                u: right,
                singular_values,
                vt: left.reversed_axes(),
            }
        } else {
            Decomposition {
                u: left,
                singular_values,
                vt: right.reversed_axes(),
            }
        };

        debug!(
            rows = m,
            cols = n,
            sweeps,
            null_columns = null_columns.len(),
            "decomposition converged"
        );

        Ok(decomposition)
    }

    /// Rotates column pairs of `w` until they are mutually orthogonal,
    /// accumulating the rotations into `v`. Returns the sweep count.
    fn orthogonalize(&self, mut w: Matrix, tol: f64) -> Result<(Matrix, Matrix, usize)> {
        let cols = w.ncols();
        let mut v = Matrix::eye(cols);

        for sweep in 1..=self.max_sweeps {
            let mut rotated = false;
            for i in 0..cols.saturating_sub(1) {
                for j in (i + 1)..cols {
                    if rotate_pair(&mut w, &mut v, i, j, tol) {
                        rotated = true;
                    }
                }
            }
            if !rotated {
                return Ok((w, v, sweep));
            }
        }

        warn!(
            rows = w.nrows(),
            cols,
            max_sweeps = self.max_sweeps,
            "jacobi sweeps exhausted"
        );
        Err(SvdError::NotConverged {
            sweeps: self.max_sweeps,
        })
    }
}

impl Default for Decomposer {
    fn default() -> Self {
        Self::new()
    }
}

/// Factors `x` with the default [`Decomposer`] settings.
pub fn decompose(x: &Matrix) -> Result<Decomposition> {
    Decomposer::new().decompose(x)
}

fn max_abs(x: &Matrix) -> f64 {
    x.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
}

fn validate(x: &Matrix) -> Result<()> {
    let (rows, cols) = x.dim();
    if rows == 0 || cols == 0 {
        return Err(InputError::Empty { rows, cols }.into());
    }
    if let Some(((row, col), &value)) = x.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(InputError::NonFinite { row, col, value }.into());
    }
    Ok(())
}

fn rotate_pair(w: &mut Matrix, v: &mut Matrix, i: usize, j: usize, tol: f64) -> bool {
    let (alpha, beta, gamma) = {
        let ci = w.column(i);
        let cj = w.column(j);
        (ci.dot(&ci), cj.dot(&cj), ci.dot(&cj))
    };

    if gamma == 0.0 || gamma.abs() <= tol * alpha.sqrt() * beta.sqrt() {
        return false;
    }

    let zeta = (beta - alpha) / (2.0 * gamma);
    let t = zeta.signum() / (zeta.abs() + 1.0_f64.hypot(zeta));
    let c = 1.0 / (1.0 + t * t).sqrt();
    let s = c * t;

    rotate_columns(w, i, j, c, s);
    rotate_columns(v, i, j, c, s);
    true
}

fn rotate_columns(m: &mut Matrix, i: usize, j: usize, c: f64, s: f64) {
    let ci = m.column(i).to_owned();
    let cj = m.column(j).to_owned();
    m.column_mut(i).assign(&(&ci * c - &cj * s));
    m.column_mut(j).assign(&(&ci * s + &cj * c));
}

/// Fills the zero columns listed in `targets` with unit vectors orthogonal
/// to every other column of `q`.
///
/// The remaining columns must already be orthonormal.
fn complete_basis(q: &mut Matrix, targets: &[usize]) {
    for &target in targets {
        // The canonical vector least covered by the current span has a
        // residual of at least 1/sqrt(rows).
        let k = q
            .axis_iter(Axis(0))
            .map(|row| row.dot(&row))
            .enumerate()
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
            .map(|(k, _)| k)
            .unwrap_or(0);

        let mut candidate = Vector::zeros(q.nrows());
        candidate[k] = 1.0;
        for _ in 0..2 {
            let coeffs = q.t().dot(&candidate);
            candidate = &candidate - &q.dot(&coeffs);
        }

        let norm = candidate.dot(&candidate).sqrt();
        if norm > 0.0 {
            q.column_mut(target).assign(&(candidate / norm));
        }
    }
}
