use thiserror::Error;

/// Reasons an input matrix is rejected before any factorization work starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("matrix must have at least one row and one column, got {rows}x{cols}")]
    Empty { rows: usize, cols: usize },

    #[error("entry at ({row}, {col}) is not finite: {value}")]
    NonFinite { row: usize, col: usize, value: f64 },
}

/// All errors returned by `svdrecon`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SvdError {
    #[error("invalid input matrix: {0}")]
    InvalidInput(#[from] InputError),

    #[error("singular value decomposition did not converge after {sweeps} sweeps")]
    NotConverged { sweeps: usize },

    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },

    #[error("image error: {0}")]
    Image(String),
}

impl SvdError {
    /// True for errors raised while validating the input matrix.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, SvdError::InvalidInput(_))
    }
}

pub type Result<T> = std::result::Result<T, SvdError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_converts() {
        let err: SvdError = InputError::Empty { rows: 0, cols: 3 }.into();
        assert!(err.is_invalid_input());
        assert_eq!(
            err.to_string(),
            "invalid input matrix: matrix must have at least one row and one column, got 0x3"
        );
    }

    #[test]
    fn test_not_converged_is_not_input_error() {
        let err = SvdError::NotConverged { sweeps: 60 };
        assert!(!err.is_invalid_input());
        assert!(err.to_string().contains("60 sweeps"));
    }
}
