//! Configuration for prediction-error estimation.

use sysid_rls::RlsConfig;

use crate::error::PemError;

/// Stopping rules for the pseudo-linear regression passes plus the
/// configuration of the RLS core each pass runs.
///
/// # Example
///
/// ```
/// use sysid_pem::PemConfig;
/// use sysid_rls::RlsConfig;
///
/// let config = PemConfig::new()
///     .with_tolerance(1e-8)
///     .with_max_iterations(50)
///     .with_rls(RlsConfig::new().with_initial_covariance(1e4));
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PemConfig {
    /// Relative parameter change below which iteration stops.
    tolerance: f64,
    /// Cap on full passes over the data per output.
    max_iterations: usize,
    /// Settings of the RLS core.
    rls: RlsConfig,
}

impl PemConfig {
    /// Creates a configuration with the defaults.
    ///
    /// Defaults: `tolerance = 1e-6`, `max_iterations = 100`,
    /// `rls = RlsConfig::new()`.
    pub fn new() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 100,
            rls: RlsConfig::new(),
        }
    }

    /// Sets the convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum number of passes.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the RLS core configuration.
    pub fn with_rls(mut self, rls: RlsConfig) -> Self {
        self.rls = rls;
        self
    }

    /// Returns the convergence tolerance.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Returns the maximum number of passes.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Returns the RLS core configuration.
    pub fn rls(&self) -> &RlsConfig {
        &self.rls
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`PemError::InvalidConfig`] | tolerance not finite and positive, or `max_iterations == 0` |
    /// | [`PemError::Rls`] | the RLS configuration is invalid |
    pub fn validate(&self) -> Result<(), PemError> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(PemError::InvalidConfig {
                reason: format!(
                    "tolerance must be finite and positive, got {}",
                    self.tolerance
                ),
            });
        }
        if self.max_iterations == 0 {
            return Err(PemError::InvalidConfig {
                reason: "max_iterations must be at least 1".to_string(),
            });
        }
        self.rls.validate()?;
        Ok(())
    }
}

impl Default for PemConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sysid_rls::RlsError;

    #[test]
    fn test_defaults() {
        let cfg = PemConfig::default();
        assert!((cfg.tolerance() - 1e-6).abs() < f64::EPSILON);
        assert_eq!(cfg.max_iterations(), 100);
        assert_eq!(cfg.rls(), &RlsConfig::new());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_builder_chaining() {
        let cfg = PemConfig::new()
            .with_tolerance(1e-4)
            .with_max_iterations(5)
            .with_rls(RlsConfig::new().with_forgetting_factor(0.98));
        assert!((cfg.tolerance() - 1e-4).abs() < f64::EPSILON);
        assert_eq!(cfg.max_iterations(), 5);
        assert!((cfg.rls().forgetting_factor() - 0.98).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate_tolerance() {
        for tol in [0.0, -1e-3, f64::NAN, f64::INFINITY] {
            let cfg = PemConfig::new().with_tolerance(tol);
            assert!(matches!(
                cfg.validate(),
                Err(PemError::InvalidConfig { .. })
            ));
        }
    }

    #[test]
    fn test_validate_max_iterations() {
        let cfg = PemConfig::new().with_max_iterations(0);
        let err = cfg.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid configuration: max_iterations must be at least 1"
        );
    }

    #[test]
    fn test_validate_nested_rls() {
        let cfg = PemConfig::new().with_rls(RlsConfig::new().with_forgetting_factor(2.0));
        assert!(matches!(
            cfg.validate(),
            Err(PemError::Rls(RlsError::InvalidForgettingFactor { .. }))
        ));
    }
}
