//! Error types for the sysid-pem crate.

use sysid_poly::PolyError;
use sysid_rls::RlsError;

/// Error type for all fallible operations in the sysid-pem crate.
///
/// Shape and data problems are reported before any computation starts;
/// numerical failures abort the estimation call without a partial model.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PemError {
    /// Returned when an order matrix does not have the shape its role needs.
    #[error("{role} must have shape {expected_rows}x{expected_cols}, got {rows}x{cols}")]
    ShapeMismatch {
        /// Order name (`na`, `nb`, ...).
        role: &'static str,
        /// Required number of rows.
        expected_rows: usize,
        /// Required number of columns.
        expected_cols: usize,
        /// Rows supplied.
        rows: usize,
        /// Columns supplied.
        cols: usize,
    },

    /// Returned when a nested order list has rows of different lengths.
    #[error("{role} rows have unequal lengths")]
    RaggedOrders {
        /// Order name (`na`, `nb`, ...).
        role: &'static str,
    },

    /// Returned when input and output data have different sample counts.
    #[error("input and output must have the same number of samples (inputs: {inputs}, outputs: {outputs})")]
    SampleCountMismatch {
        /// Rows of the input matrix.
        inputs: usize,
        /// Rows of the output matrix.
        outputs: usize,
    },

    /// Returned when there are no samples or no output channels.
    #[error("input data is empty")]
    EmptyData,

    /// Returned when the data contains NaN or infinite values.
    #[error("input data contains non-finite values")]
    NonFiniteData,

    /// Returned when the record is too short for the requested orders.
    #[error("not enough data for model identification: got {n} samples, need at least {min}")]
    InsufficientData {
        /// Number of samples provided.
        n: usize,
        /// Minimum number of samples accepted.
        min: usize,
    },

    /// Returned when no stable C/F polynomials can be found between two
    /// successive iterates.
    #[error("output {output}: no stable noise/denominator polynomials after {halvings} step halvings")]
    UnstableModel {
        /// Output channel being estimated.
        output: usize,
        /// Number of halvings attempted.
        halvings: usize,
    },

    /// Returned when a predictor filter produced non-finite values.
    #[error("output {output}: predictor filter diverged")]
    UnstableFilter {
        /// Output channel being estimated.
        output: usize,
    },

    /// Returned when a parameter vector has the wrong length.
    #[error("parameter vector has length {got}, expected {expected}")]
    ParameterLengthMismatch {
        /// Model parameter count.
        expected: usize,
        /// Length supplied.
        got: usize,
    },

    /// Returned when the recursive estimator is asked for a structure with
    /// noise-model polynomials.
    #[error("recursive estimation supports equation-error structures only, got {structure}")]
    NotEquationError {
        /// Name of the rejected structure.
        structure: String,
    },

    /// Returned when a configuration parameter is invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a chi-squared distribution cannot be constructed.
    ///
    /// The `message` field is a `String` because statrs errors do not
    /// implement `Clone`.
    #[error("chi-squared construction failed (df={df}): {message}")]
    ChiSquaredConstruction {
        /// Degrees of freedom requested.
        df: usize,
        /// Description of the failure.
        message: String,
    },

    /// Wrapped error from the RLS crate.
    #[error(transparent)]
    Rls(#[from] RlsError),

    /// Wrapped error from the polynomial crate.
    #[error(transparent)]
    Poly(#[from] PolyError),
}
