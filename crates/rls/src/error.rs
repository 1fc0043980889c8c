//! Error types for the sysid-rls crate.

/// Error type for recursive least-squares estimation and the supporting
/// linear algebra.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RlsError {
    /// Returned when a regressor's length differs from the parameter count.
    #[error("regressor has length {got}, expected {expected}")]
    DimensionMismatch {
        /// Number of parameters being estimated.
        expected: usize,
        /// Length of the regressor supplied.
        got: usize,
    },

    /// Returned when an explicit initial covariance is not `n x n` for `n`
    /// parameters.
    #[error("initial covariance has shape {rows}x{cols}, expected {expected}x{expected}")]
    CovarianceShape {
        /// Number of parameters being estimated.
        expected: usize,
        /// Rows of the supplied matrix.
        rows: usize,
        /// Columns of the supplied matrix.
        cols: usize,
    },

    /// Returned when the gain denominator `lambda + x'Px` is not finite or
    /// not positive.
    #[error("gain denominator is not a positive finite number (got {denominator})")]
    Singular {
        /// The offending denominator.
        denominator: f64,
    },

    /// Returned when a covariance diagonal entry stops being finite and
    /// positive, or a Cholesky factorization fails.
    #[error("covariance is not positive definite (diagonal entry {index})")]
    NotPositiveDefinite {
        /// Index of the first failing diagonal entry or pivot.
        index: usize,
    },

    /// Returned when the forgetting factor lies outside `(0, 1]`.
    #[error("forgetting factor must be in (0, 1], got {lambda}")]
    InvalidForgettingFactor {
        /// The rejected value.
        lambda: f64,
    },

    /// Returned when the initial covariance scale is not finite and positive.
    #[error("initial covariance must be finite and positive, got {value}")]
    InvalidInitialCovariance {
        /// The rejected value.
        value: f64,
    },
}
