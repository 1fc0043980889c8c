//! Model specification (unfitted).

use ndarray::Array2;
use tracing::info;

use crate::assembly::assemble;
use crate::config::PemConfig;
use crate::data::{Signals, column};
use crate::driver::fit_channel;
use crate::error::PemError;
use crate::fit::FittedModel;
use crate::orders::{OrderSet, OrderSpec, Orders};
use crate::recursive::{RecursiveFit, fit_recursive};

/// An unfitted polynomial model: orders plus estimator settings.
///
/// This is the entry point of the workflow. Pick a structure with one of
/// the constructors, optionally attach a [`PemConfig`], then call
/// [`ModelSpec::fit()`] to obtain a [`FittedModel`].
///
/// ```mermaid
/// graph LR
///     A["ModelSpec::oe(nb, nf, nk)"] -->|".with_config(cfg)"| A
///     A -->|".fit(&u, &y)?"| B["FittedModel"]
///     A -->|".fit_recursive(&u, &y)?"| C["RecursiveFit"]
/// ```
///
/// Orders accept anything convertible into [`OrderSpec`]: a scalar for
/// SISO models, a flat list, or a nested matrix. Only `nk` broadcasts a
/// scalar over all channels.
#[derive(Clone, Debug)]
pub struct ModelSpec {
    orders: OrderSet,
    config: PemConfig,
}

impl ModelSpec {
    /// `A y = B u + e`.
    ///
    /// # Example
    ///
    /// ```
    /// use sysid_pem::ModelSpec;
    ///
    /// let orders = ModelSpec::arx(2, 1, 1).orders(1, 1).unwrap();
    /// assert_eq!(orders.n_params(), 4);
    /// assert_eq!(orders.max_lag(), 2);
    /// ```
    pub fn arx(
        na: impl Into<OrderSpec>,
        nb: impl Into<OrderSpec>,
        nk: impl Into<OrderSpec>,
    ) -> Self {
        Self::from_orders(OrderSet {
            na: na.into(),
            nb: nb.into(),
            nk: nk.into(),
            ..OrderSet::default()
        })
    }

    /// `A y = B u + C e`.
    pub fn armax(
        na: impl Into<OrderSpec>,
        nb: impl Into<OrderSpec>,
        nc: impl Into<OrderSpec>,
        nk: impl Into<OrderSpec>,
    ) -> Self {
        Self::from_orders(OrderSet {
            na: na.into(),
            nb: nb.into(),
            nc: nc.into(),
            nk: nk.into(),
            ..OrderSet::default()
        })
    }

    /// `y = B/F u + e`.
    pub fn oe(
        nb: impl Into<OrderSpec>,
        nf: impl Into<OrderSpec>,
        nk: impl Into<OrderSpec>,
    ) -> Self {
        Self::from_orders(OrderSet {
            nb: nb.into(),
            nf: nf.into(),
            nk: nk.into(),
            ..OrderSet::default()
        })
    }

    /// `y = B/F u + C/D e`.
    pub fn bj(
        nb: impl Into<OrderSpec>,
        nc: impl Into<OrderSpec>,
        nd: impl Into<OrderSpec>,
        nf: impl Into<OrderSpec>,
        nk: impl Into<OrderSpec>,
    ) -> Self {
        Self::from_orders(OrderSet {
            nb: nb.into(),
            nc: nc.into(),
            nd: nd.into(),
            nf: nf.into(),
            nk: nk.into(),
            ..OrderSet::default()
        })
    }

    /// `A y = B/F u + C/D e`, every polynomial chosen by the caller.
    pub fn general(
        na: impl Into<OrderSpec>,
        nb: impl Into<OrderSpec>,
        nc: impl Into<OrderSpec>,
        nd: impl Into<OrderSpec>,
        nf: impl Into<OrderSpec>,
        nk: impl Into<OrderSpec>,
    ) -> Self {
        Self::from_orders(OrderSet {
            na: na.into(),
            nb: nb.into(),
            nc: nc.into(),
            nd: nd.into(),
            nf: nf.into(),
            nk: nk.into(),
        })
    }

    fn from_orders(orders: OrderSet) -> Self {
        Self {
            orders,
            config: PemConfig::default(),
        }
    }

    /// Replaces the estimator settings.
    pub fn with_config(mut self, config: PemConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the estimator settings.
    pub fn config(&self) -> &PemConfig {
        &self.config
    }

    /// Normalizes the orders for `ny` outputs and `nu` inputs.
    ///
    /// # Errors
    ///
    /// [`PemError::ShapeMismatch`] or [`PemError::RaggedOrders`].
    pub fn orders(&self, ny: usize, nu: usize) -> Result<Orders, PemError> {
        self.orders.normalize(ny, nu)
    }

    /// Fits the model to inputs `u` (N x nu) and outputs `y` (N x ny).
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`PemError::InvalidConfig`] / [`PemError::Rls`] | settings fail validation |
    /// | [`PemError::EmptyData`] | no samples or no outputs |
    /// | [`PemError::SampleCountMismatch`] | `u` and `y` differ in length |
    /// | [`PemError::NonFiniteData`] | NaN or infinite samples |
    /// | [`PemError::ShapeMismatch`] | orders disagree with `(ny, nu)` |
    /// | [`PemError::InsufficientData`] | record too short for the orders |
    /// | [`PemError::UnstableModel`] / [`PemError::UnstableFilter`] | iteration diverged |
    pub fn fit(&self, u: &Array2<f64>, y: &Array2<f64>) -> Result<FittedModel, PemError> {
        let (orders, data) = self.prepare(u, y)?;
        info!(
            structure = %orders.structure(),
            n = data.n(),
            ny = data.ny(),
            nu = data.nu(),
            params = orders.n_params(),
            "fitting model"
        );
        let fits = (0..orders.ny())
            .map(|j| fit_channel(&orders, &data, j, &self.config))
            .collect::<Result<Vec<_>, _>>()?;
        let model = assemble(orders, fits)?;
        info!(converged = model.converged(), "estimation complete");
        Ok(model)
    }

    /// [`fit()`](Self::fit) for a single input and a single output.
    ///
    /// # Errors
    ///
    /// Same as [`ModelSpec::fit()`].
    pub fn fit_siso(&self, u: &[f64], y: &[f64]) -> Result<FittedModel, PemError> {
        self.fit(&column(u), &column(y))
    }

    /// Runs one recursive pass and keeps θ after every update.
    ///
    /// Only equation-error structures (ARX, FIR) have a regressor that does
    /// not depend on earlier estimates, so only they are accepted.
    ///
    /// # Errors
    ///
    /// [`PemError::NotEquationError`] for structures with C, D or F terms,
    /// plus the errors of [`ModelSpec::fit()`].
    pub fn fit_recursive(&self, u: &Array2<f64>, y: &Array2<f64>) -> Result<RecursiveFit, PemError> {
        let (orders, data) = self.prepare(u, y)?;
        let structure = orders.structure();
        if !structure.is_equation_error() {
            return Err(PemError::NotEquationError {
                structure: structure.to_string(),
            });
        }
        fit_recursive(orders, &data, &self.config)
    }

    fn prepare(&self, u: &Array2<f64>, y: &Array2<f64>) -> Result<(Orders, Signals), PemError> {
        self.config.validate()?;
        let data = Signals::from_arrays(u, y)?;
        let orders = self.orders.normalize(data.ny(), data.nu())?;
        orders.check_samples(data.n())?;
        Ok((orders, data))
    }
}
