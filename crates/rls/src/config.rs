//! Configuration for the recursive least-squares estimator.

use crate::error::RlsError;

/// Tuning knobs for [`Rls`](crate::Rls).
///
/// # Example
///
/// ```
/// use sysid_rls::RlsConfig;
///
/// let config = RlsConfig::new()
///     .with_forgetting_factor(0.99)
///     .with_initial_covariance(1e4);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RlsConfig {
    /// Exponential weighting of past samples, in `(0, 1]`.
    forgetting_factor: f64,
    /// Scale of the diffuse prior `P0 = p0 * I`.
    initial_covariance: f64,
    /// Symmetrize P every this many updates; 0 symmetrizes only at finish.
    symmetrize_interval: usize,
}

impl RlsConfig {
    /// Creates a configuration with the defaults.
    ///
    /// Defaults: `forgetting_factor = 1.0`, `initial_covariance = 1e6`,
    /// `symmetrize_interval = 10`.
    pub fn new() -> Self {
        Self {
            forgetting_factor: 1.0,
            initial_covariance: 1e6,
            symmetrize_interval: 10,
        }
    }

    /// Sets the forgetting factor.
    pub fn with_forgetting_factor(mut self, lambda: f64) -> Self {
        self.forgetting_factor = lambda;
        self
    }

    /// Sets the initial covariance scale.
    pub fn with_initial_covariance(mut self, p0: f64) -> Self {
        self.initial_covariance = p0;
        self
    }

    /// Sets how often P is re-symmetrized.
    pub fn with_symmetrize_interval(mut self, interval: usize) -> Self {
        self.symmetrize_interval = interval;
        self
    }

    /// Returns the forgetting factor.
    pub fn forgetting_factor(&self) -> f64 {
        self.forgetting_factor
    }

    /// Returns the initial covariance scale.
    pub fn initial_covariance(&self) -> f64 {
        self.initial_covariance
    }

    /// Returns the symmetrization interval.
    pub fn symmetrize_interval(&self) -> usize {
        self.symmetrize_interval
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`RlsError::InvalidForgettingFactor`] | not in `(0, 1]` or NaN |
    /// | [`RlsError::InvalidInitialCovariance`] | not finite or `<= 0` |
    pub fn validate(&self) -> Result<(), RlsError> {
        let lambda = self.forgetting_factor;
        if !(lambda > 0.0 && lambda <= 1.0) {
            return Err(RlsError::InvalidForgettingFactor { lambda });
        }
        let p0 = self.initial_covariance;
        if !p0.is_finite() || p0 <= 0.0 {
            return Err(RlsError::InvalidInitialCovariance { value: p0 });
        }
        Ok(())
    }
}

impl Default for RlsConfig {
    fn default() -> Self {
        Self::new()
    }
}
