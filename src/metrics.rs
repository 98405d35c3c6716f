use crate::error::{Result, SvdError};
use crate::Matrix;

fn check_shapes(original: &Matrix, approx: &Matrix) -> Result<()> {
    if original.dim() != approx.dim() {
        return Err(SvdError::ShapeMismatch {
            expected: original.dim(),
            got: approx.dim(),
        });
    }
    Ok(())
}

/// `sqrt(Σ x_ij²)`, summed on entries divided by `max|x_ij|` so that very
/// large or very small matrices neither overflow nor underflow.
pub fn frobenius_norm(x: &Matrix) -> f64 {
    let scale = x.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if scale == 0.0 || scale.is_infinite() {
        return scale;
    }
    scale * x.iter().map(|v| (v / scale).powi(2)).sum::<f64>().sqrt()
}

/// `‖original − approx‖_F`.
pub fn reconstruction_error(original: &Matrix, approx: &Matrix) -> Result<f64> {
    check_shapes(original, approx)?;
    Ok(frobenius_norm(&(original - approx)))
}

/// Reconstruction error divided by `‖original‖_F`.
pub fn relative_error(original: &Matrix, approx: &Matrix) -> Result<f64> {
    let err = reconstruction_error(original, approx)?;
    let norm = frobenius_norm(original);

    if norm == 0.0 {
        // Zero original: exact when the approximation is zero too
        return Ok(if err == 0.0 { 0.0 } else { f64::INFINITY });
    }

    Ok(err / norm)
}

pub fn mean_squared_error(original: &Matrix, approx: &Matrix) -> Result<f64> {
    check_shapes(original, approx)?;
    let diff = original - approx;
    Ok(diff.mapv(|x| x * x).mean().unwrap_or(0.0))
}
