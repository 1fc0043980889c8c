//! Recursive least-squares estimator.
//!
//! The estimator moves through three typed states:
//!
//! ```mermaid
//! graph LR
//!     A["RlsConfig"] -->|"Rls::new(n, &config)?"| B["Rls"]
//!     B -->|".update(x, y)?"| B
//!     B -->|".finish()?"| C["RlsEstimate"]
//! ```

use ndarray::linalg::general_mat_mul;
use ndarray::{Array1, Array2, ArrayView1, Axis};

use crate::config::RlsConfig;
use crate::error::RlsError;
use crate::linalg::{cholesky, symmetrize};

/// A running recursive least-squares estimate.
///
/// Each [`Rls::update()`] applies
///
/// ```text
/// g     = P x / (lambda + x' P x)
/// theta = theta + g (y - x' theta)
/// P     = (P - g x' P) / lambda
/// ```
#[derive(Debug, Clone)]
pub struct Rls {
    theta: Array1<f64>,
    p: Array2<f64>,
    lambda: f64,
    symmetrize_interval: usize,
    updates: usize,
}

impl Rls {
    /// Starts from `theta = 0`, `P = p0 I` with `p0` from the config.
    ///
    /// # Errors
    ///
    /// Any [`RlsConfig::validate()`] failure.
    ///
    /// # Example
    ///
    /// ```
    /// use ndarray::array;
    /// use sysid_rls::{Rls, RlsConfig};
    ///
    /// let mut rls = Rls::new(1, &RlsConfig::new()).unwrap();
    /// for _ in 0..10 {
    ///     rls.update(array![1.0].view(), 3.0).unwrap();
    /// }
    /// assert!((rls.theta()[0] - 3.0).abs() < 1e-5);
    /// ```
    pub fn new(n_params: usize, config: &RlsConfig) -> Result<Self, RlsError> {
        config.validate()?;
        let mut p = Array2::<f64>::zeros((n_params, n_params));
        p.diag_mut().fill(config.initial_covariance());
        Ok(Self {
            theta: Array1::zeros(n_params),
            p,
            lambda: config.forgetting_factor(),
            symmetrize_interval: config.symmetrize_interval(),
            updates: 0,
        })
    }

    /// Starts from an explicit `theta0` and `P0`.
    ///
    /// # Errors
    ///
    /// [`RlsError::CovarianceShape`] when `p0` is not `n x n` for
    /// `n = theta0.len()`, plus any config validation failure.
    pub fn with_initial(
        theta0: Array1<f64>,
        p0: Array2<f64>,
        config: &RlsConfig,
    ) -> Result<Self, RlsError> {
        config.validate()?;
        let n = theta0.len();
        let (rows, cols) = p0.dim();
        if (rows, cols) != (n, n) {
            return Err(RlsError::CovarianceShape {
                expected: n,
                rows,
                cols,
            });
        }
        Ok(Self {
            theta: theta0,
            p: p0,
            lambda: config.forgetting_factor(),
            symmetrize_interval: config.symmetrize_interval(),
            updates: 0,
        })
    }

    /// Consumes one regressor/target pair and returns the a-priori
    /// prediction error `y - x' theta`.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`RlsError::DimensionMismatch`] | `x.len() != n_params` |
    /// | [`RlsError::Singular`] | `lambda + x'Px` not finite or not positive |
    /// | [`RlsError::NotPositiveDefinite`] | a diagonal entry of P became non-finite or non-positive |
    pub fn update(&mut self, x: ArrayView1<'_, f64>, y: f64) -> Result<f64, RlsError> {
        let n = self.theta.len();
        if x.len() != n {
            return Err(RlsError::DimensionMismatch {
                expected: n,
                got: x.len(),
            });
        }

        let px = self.p.dot(&x);
        let denominator = self.lambda + x.dot(&px);
        if !denominator.is_finite() || denominator <= f64::MIN_POSITIVE {
            return Err(RlsError::Singular { denominator });
        }
        let gain = &px / denominator;

        let error = y - x.dot(&self.theta);
        self.theta.scaled_add(error, &gain);

        // P x' P == (P x)(P x)' / denom for symmetric P, written as a rank-1 update.
        let inv_lambda = 1.0 / self.lambda;
        let g_col = gain.view().insert_axis(Axis(1));
        let px_row = px.view().insert_axis(Axis(0));
        general_mat_mul(-inv_lambda, &g_col, &px_row, inv_lambda, &mut self.p);

        self.updates += 1;
        if self.symmetrize_interval > 0 && self.updates % self.symmetrize_interval == 0 {
            symmetrize(&mut self.p);
        }
        self.check_diagonal()?;

        Ok(error)
    }

    fn check_diagonal(&self) -> Result<(), RlsError> {
        match self
            .p
            .diag()
            .iter()
            .position(|&d| !d.is_finite() || d <= 0.0)
        {
            Some(index) => Err(RlsError::NotPositiveDefinite { index }),
            None => Ok(()),
        }
    }

    /// Current parameter estimate.
    pub fn theta(&self) -> &Array1<f64> {
        &self.theta
    }

    /// Current covariance matrix.
    pub fn covariance(&self) -> &Array2<f64> {
        &self.p
    }

    /// Number of updates applied so far.
    pub fn updates(&self) -> usize {
        self.updates
    }

    /// Number of parameters being estimated.
    pub fn n_params(&self) -> usize {
        self.theta.len()
    }

    /// Symmetrizes P one last time and freezes the estimate.
    ///
    /// The per-update check only looks at the diagonal; here the whole of P
    /// must admit a Cholesky factorization.
    ///
    /// # Errors
    ///
    /// [`RlsError::NotPositiveDefinite`] with the failing pivot when the
    /// final P is not positive definite.
    pub fn finish(mut self) -> Result<RlsEstimate, RlsError> {
        symmetrize(&mut self.p);
        cholesky(self.p.view())?;
        Ok(RlsEstimate {
            theta: self.theta,
            covariance: self.p,
            updates: self.updates,
        })
    }
}

/// The frozen result of an [`Rls`] run.
#[derive(Debug, Clone, PartialEq)]
pub struct RlsEstimate {
    theta: Array1<f64>,
    covariance: Array2<f64>,
    updates: usize,
}

impl RlsEstimate {
    /// Final parameter estimate.
    pub fn theta(&self) -> &Array1<f64> {
        &self.theta
    }

    /// Final covariance matrix (symmetric).
    pub fn covariance(&self) -> &Array2<f64> {
        &self.covariance
    }

    /// Number of updates that produced this estimate.
    pub fn updates(&self) -> usize {
        self.updates
    }

    /// Splits into `(theta, covariance)`.
    pub fn into_parts(self) -> (Array1<f64>, Array2<f64>) {
        (self.theta, self.covariance)
    }
}
