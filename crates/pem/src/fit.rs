//! Fitted polynomial model results.

use std::fmt;

use ndarray::{Array1, Array2, ArrayView1, s};
use statrs::distribution::{ChiSquared, ContinuousCDF};
use sysid_poly::{PolyMatrix, format_coefficient};

use crate::error::PemError;
use crate::orders::{Orders, Structure};

/// Convergence report of one output channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelStatus {
    /// Number of full passes over the data, including the equation-error
    /// start.
    pub iterations: usize,
    /// `false` when the iteration cap was hit first.
    pub converged: bool,
    /// Relative parameter change of the last pass. Zero for single-pass
    /// structures.
    pub final_change: f64,
}

/// A fitted polynomial model produced by [`ModelSpec::fit()`](crate::ModelSpec::fit).
///
/// Holds the stacked parameter vector θ, its block-diagonal covariance P
/// (unscaled, as left by the RLS core; see
/// [`FittedModel::parameter_covariance()`] for the scaled one), the polynomial containers and one
/// [`ChannelStatus`] plus innovation variance per output.
///
/// ```mermaid
/// graph LR
///     B["FittedModel"] --> C[".theta() / .covariance()"]
///     B --> D[".a() .b() .c() .d() .f()"]
///     B --> E[".noise_variance()"]
///     B --> F[".within_confidence(&theta0, level)?"]
/// ```
#[derive(Clone, Debug)]
pub struct FittedModel {
    orders: Orders,
    theta: Array1<f64>,
    covariance: Array2<f64>,
    a: PolyMatrix,
    b: PolyMatrix,
    c: PolyMatrix,
    d: PolyMatrix,
    f: PolyMatrix,
    status: Vec<ChannelStatus>,
    noise_variance: Vec<f64>,
}

impl FittedModel {
    pub(crate) fn new(
        orders: Orders,
        theta: Array1<f64>,
        covariance: Array2<f64>,
        [a, b, c, d, f]: [PolyMatrix; 5],
        status: Vec<ChannelStatus>,
        noise_variance: Vec<f64>,
    ) -> Self {
        Self {
            orders,
            theta,
            covariance,
            a,
            b,
            c,
            d,
            f,
            status,
            noise_variance,
        }
    }

    /// Returns the normalized orders the model was fitted with.
    pub fn orders(&self) -> &Orders {
        &self.orders
    }

    /// Returns the model structure.
    pub fn structure(&self) -> Structure {
        self.orders.structure()
    }

    /// Returns the stacked parameter vector, output by output.
    pub fn theta(&self) -> &Array1<f64> {
        &self.theta
    }

    /// Returns the raw RLS covariance P (block-diagonal across outputs).
    pub fn covariance(&self) -> &Array2<f64> {
        &self.covariance
    }

    /// Returns the `ny x ny` autoregressive polynomials.
    pub fn a(&self) -> &PolyMatrix {
        &self.a
    }

    /// Returns the `ny x nu` input numerators, delays included.
    pub fn b(&self) -> &PolyMatrix {
        &self.b
    }

    /// Returns the `ny x 1` noise numerators.
    pub fn c(&self) -> &PolyMatrix {
        &self.c
    }

    /// Returns the `ny x 1` noise denominators.
    pub fn d(&self) -> &PolyMatrix {
        &self.d
    }

    /// Returns the `ny x nu` input denominators.
    pub fn f(&self) -> &PolyMatrix {
        &self.f
    }

    /// Returns one [`ChannelStatus`] per output.
    pub fn status(&self) -> &[ChannelStatus] {
        &self.status
    }

    /// `true` when every output converged.
    pub fn converged(&self) -> bool {
        self.status.iter().all(|s| s.converged)
    }

    /// Returns the innovation variance of each output.
    pub fn noise_variance(&self) -> &[f64] {
        &self.noise_variance
    }

    /// Returns `len(θ)`.
    pub fn n_params(&self) -> usize {
        self.theta.len()
    }

    /// Returns the slice of θ belonging to output `j`.
    ///
    /// # Panics
    ///
    /// Panics if `j >= ny`.
    pub fn output_theta(&self, j: usize) -> ArrayView1<'_, f64> {
        let start: usize = (0..j).map(|k| self.orders.n_params_output(k)).sum();
        let end = start + self.orders.n_params_output(j);
        self.theta.slice(s![start..end])
    }

    /// P with each output's block scaled by that output's innovation
    /// variance, the usual estimate of the parameter covariance.
    pub fn parameter_covariance(&self) -> Array2<f64> {
        let mut scaled = self.covariance.clone();
        let mut offset = 0;
        for (j, &sigma2) in self.noise_variance.iter().enumerate() {
            let n = self.orders.n_params_output(j);
            scaled
                .slice_mut(s![offset..offset + n, offset..offset + n])
                .mapv_inplace(|v| v * sigma2);
            offset += n;
        }
        scaled
    }

    /// Computes `(θ - θ0)' Σ^-1 (θ - θ0)` where `Σ` is
    /// [`parameter_covariance()`](Self::parameter_covariance).
    ///
    /// For a consistent estimate this is approximately `χ²(len θ)`
    /// distributed.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`PemError::ParameterLengthMismatch`] | `theta0.len() != len(θ)` |
    /// | [`PemError::Rls`] | the scaled covariance is not positive definite, e.g. a zero innovation variance |
    pub fn ellipsoid_statistic(&self, theta0: &[f64]) -> Result<f64, PemError> {
        if theta0.len() != self.theta.len() {
            return Err(PemError::ParameterLengthMismatch {
                expected: self.theta.len(),
                got: theta0.len(),
            });
        }
        let d = &self.theta - &ArrayView1::from(theta0);
        let covariance = self.parameter_covariance();
        Ok(sysid_rls::quadratic_form(covariance.view(), d.view())?)
    }

    /// `true` when `theta0` lies inside the confidence ellipsoid at `level`,
    /// i.e. the ellipsoid statistic is below the `χ²(len θ)` quantile.
    ///
    /// # Errors
    ///
    /// [`PemError::InvalidConfig`] when `level` is not in `(0, 1)`, plus the
    /// errors of [`FittedModel::ellipsoid_statistic()`].
    pub fn within_confidence(&self, theta0: &[f64], level: f64) -> Result<bool, PemError> {
        if !(level > 0.0 && level < 1.0) {
            return Err(PemError::InvalidConfig {
                reason: format!("confidence level must be in (0, 1), got {level}"),
            });
        }
        let statistic = self.ellipsoid_statistic(theta0)?;
        let df = self.theta.len();
        let chi2 = ChiSquared::new(df as f64).map_err(|e| PemError::ChiSquaredConstruction {
            df,
            message: e.to_string(),
        })?;
        Ok(statistic < chi2.inverse_cdf(level))
    }
}

impl fmt::Display for FittedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} model: {} output(s), {} input(s), {} parameters",
            self.structure(),
            self.orders.ny(),
            self.orders.nu(),
            self.n_params()
        )?;
        for (j, (status, sigma2)) in self.status.iter().zip(&self.noise_variance).enumerate() {
            let state = if status.converged {
                "converged"
            } else {
                "not converged"
            };
            writeln!(
                f,
                "  output {j}: {state} after {} pass(es), change {:.3e}, noise variance {:.4e}",
                status.iterations, status.final_change, sigma2
            )?;
        }

        let o = &self.orders;
        let any_nc = (0..o.ny()).any(|j| o.nc(j) > 0);
        let any_nd = (0..o.ny()).any(|j| o.nd(j) > 0);
        let any_nf = (0..o.ny()).any(|j| (0..o.nu()).any(|i| o.nf(j, i) > 0));
        let blocks = [
            ("A", &self.a, true),
            ("B", &self.b, true),
            ("C", &self.c, any_nc),
            ("D", &self.d, any_nd),
            ("F", &self.f, any_nf),
        ];
        for (name, matrix, shown) in blocks {
            if !shown {
                continue;
            }
            for ((r, c), p) in matrix.iter() {
                writeln!(f, "  {name}[{r},{c}] = {p}")?;
            }
        }

        if self.n_params() > 0 {
            let rendered: Vec<String> = self.theta.iter().map(|&v| format_coefficient(v)).collect();
            write!(f, "  theta = [{}]", rendered.join(", "))?;
        }
        Ok(())
    }
}
