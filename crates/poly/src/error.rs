//! Error types for the sysid-poly crate.

/// Error type for all fallible operations in the sysid-poly crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PolyError {
    /// Returned when a filter denominator has no coefficients.
    #[error("denominator polynomial is empty")]
    EmptyDenominator,

    /// Returned when a filter denominator starts with a zero coefficient.
    #[error("denominator leading coefficient is zero")]
    ZeroLeadingCoefficient,

    /// Returned when the number of entries does not fill a `rows x cols` grid.
    #[error("polynomial matrix of shape {rows}x{cols} cannot hold {len} entries")]
    ShapeMismatch {
        /// Requested number of rows.
        rows: usize,
        /// Requested number of columns.
        cols: usize,
        /// Number of entries supplied.
        len: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_empty_denominator() {
        let err = PolyError::EmptyDenominator;
        assert_eq!(err.to_string(), "denominator polynomial is empty");
    }

    #[test]
    fn error_zero_leading() {
        let err = PolyError::ZeroLeadingCoefficient;
        assert_eq!(err.to_string(), "denominator leading coefficient is zero");
    }

    #[test]
    fn error_shape_mismatch() {
        let err = PolyError::ShapeMismatch {
            rows: 2,
            cols: 2,
            len: 3,
        };
        assert_eq!(
            err.to_string(),
            "polynomial matrix of shape 2x2 cannot hold 3 entries"
        );
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<PolyError>();
    }
}
