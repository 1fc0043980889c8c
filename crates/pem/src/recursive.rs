//! Single-pass recursive estimation with the parameter trajectory kept.

use ndarray::{Array1, Array2};
use sysid_rls::Rls;
use tracing::debug;

use crate::assembly::{ChannelPolys, assemble};
use crate::config::PemConfig;
use crate::data::Signals;
use crate::driver::ChannelFit;
use crate::error::PemError;
use crate::fit::{ChannelStatus, FittedModel};
use crate::layout::ChannelLayout;
use crate::orders::Orders;
use crate::predictor::Innovations;
use crate::regressor::{RegressorBuilder, SignalSet};

/// Result of [`ModelSpec::fit_recursive()`](crate::ModelSpec::fit_recursive).
///
/// Row `r` of [`trajectory(j)`](Self::trajectory) is output `j`'s θ after
/// the update at time `start() + r`. The last row equals that output's
/// block of the final model's θ.
#[derive(Clone, Debug)]
pub struct RecursiveFit {
    model: FittedModel,
    trajectories: Vec<Array2<f64>>,
    start: usize,
}

impl RecursiveFit {
    /// Returns the model after the last update.
    pub fn model(&self) -> &FittedModel {
        &self.model
    }

    /// Consumes the result, keeping only the final model.
    pub fn into_model(self) -> FittedModel {
        self.model
    }

    /// Returns the `(N - L) x len(θ_j)` estimate history of output `j`.
    ///
    /// # Panics
    ///
    /// Panics if `j >= ny`.
    pub fn trajectory(&self, j: usize) -> &Array2<f64> {
        &self.trajectories[j]
    }

    /// Time index of the first update, `L`.
    pub fn start(&self) -> usize {
        self.start
    }
}

pub(crate) fn fit_recursive(
    orders: Orders,
    data: &Signals,
    config: &PemConfig,
) -> Result<RecursiveFit, PemError> {
    let start = orders.max_lag();
    let steps = data.n() - start;
    let mut fits = Vec::with_capacity(orders.ny());
    let mut trajectories = Vec::with_capacity(orders.ny());

    for j in 0..orders.ny() {
        let layout = ChannelLayout::new(&orders, j);
        let builder = RegressorBuilder::new(&orders, &layout, data, j);
        let set = SignalSet::EquationError { proxy: None };
        let mut rls = Rls::new(layout.len(), config.rls())?;
        let mut x = Array1::zeros(layout.len());
        let mut trajectory = Array2::zeros((steps, layout.len()));

        for (row, t) in (start..data.n()).enumerate() {
            builder.fill(t, set, &mut x);
            let target = builder.target(t, set, &x, rls.theta());
            rls.update(x.view(), target)?;
            trajectory.row_mut(row).assign(rls.theta());
        }
        debug!(output = j, updates = rls.updates(), "recursive pass complete");

        let (theta, covariance) = rls.finish()?.into_parts();
        let coeffs = theta.to_vec();
        let polys = ChannelPolys::from_theta(&orders, &layout, j, &coeffs);
        let noise_variance = Innovations::compute(&polys, data, j)?.mean_square(start);
        fits.push(ChannelFit {
            theta,
            covariance,
            status: ChannelStatus {
                iterations: 1,
                converged: true,
                final_change: 0.0,
            },
            noise_variance,
        });
        trajectories.push(trajectory);
    }

    Ok(RecursiveFit {
        model: assemble(orders, fits)?,
        trajectories,
        start,
    })
}
