//! Pseudo-linear regression driver.
//!
//! Each output is estimated on its own. Pass 0 is an ordinary
//! equation-error least-squares fit. Every later pass rebuilds the
//! predictor signals from the previous estimate and runs a fresh RLS core
//! over the noise-model-filtered regressor with the pseudo-target
//! `e(t) + psi(t)' theta_prev`. The fixed point of this iteration is a
//! stationary point of the prediction-error criterion.

use ndarray::{Array1, Array2};
use sysid_rls::{Rls, RlsEstimate};
use tracing::{debug, warn};

use crate::assembly::ChannelPolys;
use crate::config::PemConfig;
use crate::data::Signals;
use crate::error::PemError;
use crate::fit::ChannelStatus;
use crate::layout::ChannelLayout;
use crate::orders::Orders;
use crate::predictor::{FilteredSignals, Innovations};
use crate::regressor::{RegressorBuilder, SignalSet};

/// Step halvings tried before a candidate is declared unrecoverable.
pub(crate) const MAX_HALVINGS: usize = 30;

/// Floor on `|theta|` in the relative-change test.
const NORM_FLOOR: f64 = 1e-12;

/// Estimate of one output channel.
#[derive(Debug, Clone)]
pub(crate) struct ChannelFit {
    pub(crate) theta: Array1<f64>,
    pub(crate) covariance: Array2<f64>,
    pub(crate) status: ChannelStatus,
    pub(crate) noise_variance: f64,
}

/// Everything a pass needs about one output.
struct Channel<'a> {
    orders: &'a Orders,
    layout: ChannelLayout,
    data: &'a Signals,
    output: usize,
}

impl Channel<'_> {
    fn polys(&self, theta: &Array1<f64>) -> ChannelPolys {
        let coeffs = theta.to_vec();
        ChannelPolys::from_theta(self.orders, &self.layout, self.output, &coeffs)
    }

    /// First input carrying an F polynomial, when the output has no own
    /// autoregressive term to absorb the common denominator.
    fn proxy_input(&self) -> Option<usize> {
        let j = self.output;
        if self.orders.na(j, j) > 0 {
            return None;
        }
        (0..self.orders.nu()).find(|&i| self.orders.nf(j, i) > 0)
    }

    /// Runs one full forward RLS pass over `t in [L, N)`.
    fn run_pass(
        &self,
        set: SignalSet<'_>,
        theta_prev: &Array1<f64>,
        config: &PemConfig,
    ) -> Result<RlsEstimate, PemError> {
        let builder = RegressorBuilder::new(self.orders, &self.layout, self.data, self.output);
        let mut rls = Rls::new(self.layout.len(), config.rls())?;
        let mut x = Array1::zeros(self.layout.len());
        for t in self.orders.max_lag()..self.data.n() {
            builder.fill(t, set, &mut x);
            let target = builder.target(t, set, &x, theta_prev);
            rls.update(x.view(), target)?;
        }
        Ok(rls.finish()?)
    }

    /// Moves `candidate` halfway toward `previous` until C and every F are
    /// stable.
    fn stabilize(
        &self,
        previous: &Array1<f64>,
        mut candidate: Array1<f64>,
    ) -> Result<Array1<f64>, PemError> {
        for halving in 0..=MAX_HALVINGS {
            if self.polys(&candidate).predictor_is_stable() {
                if halving > 0 {
                    debug!(output = self.output, halving, "step halved for stability");
                }
                return Ok(candidate);
            }
            candidate = previous + &((&candidate - previous) * 0.5);
        }
        Err(PemError::UnstableModel {
            output: self.output,
            halvings: MAX_HALVINGS,
        })
    }

    /// Copies the denominator found for `proxy` into the other inputs' F
    /// blocks, truncated or zero-padded. A copy that turns out unstable is
    /// reset to `F = 1`.
    fn seed_common_denominator(&self, proxy: usize, theta: &mut Array1<f64>) {
        let common: Vec<f64> = self.layout.f[proxy].clone().map(|idx| theta[idx]).collect();
        for (i, range) in self.layout.f.iter().enumerate() {
            if i == proxy || range.is_empty() {
                continue;
            }
            let mut seeded = vec![1.0];
            seeded.extend(
                (0..range.len()).map(|l| common.get(l).copied().unwrap_or(0.0)),
            );
            if !sysid_poly::is_stable(&seeded) {
                seeded.iter_mut().skip(1).for_each(|c| *c = 0.0);
            }
            for (l, idx) in range.clone().enumerate() {
                theta[idx] = seeded[l + 1];
            }
        }
    }
}

fn relative_change(new: &Array1<f64>, old: &Array1<f64>) -> f64 {
    let diff = (new - old).mapv(|v| v * v).sum().sqrt();
    let norm = new.mapv(|v| v * v).sum().sqrt();
    diff / norm.max(NORM_FLOOR)
}

/// Estimates output `output`.
///
/// Structures without C, D or F terms finish after the single
/// equation-error pass. Otherwise passes repeat until the relative change
/// of θ drops below the tolerance (only checked once the warm-up passes are
/// over) or the iteration cap is hit, which is reported as not converged.
#[tracing::instrument(skip(orders, data, config))]
pub(crate) fn fit_channel(
    orders: &Orders,
    data: &Signals,
    output: usize,
    config: &PemConfig,
) -> Result<ChannelFit, PemError> {
    let channel = Channel {
        orders,
        layout: ChannelLayout::new(orders, output),
        data,
        output,
    };
    let j = output;
    let noisy = orders.has_noise_model(j);
    // With both C and D present their columns coincide at C = D = 1, so the
    // first filtered pass leaves C out.
    let warmup = usize::from(orders.nc(j) > 0 && orders.nd(j) > 0);
    let proxy = channel.proxy_input();

    let mut theta = Array1::<f64>::zeros(channel.layout.len());
    let mut covariance;
    let mut passes = 0;
    let mut change;
    let mut converged = false;

    loop {
        let estimate = if passes == 0 {
            channel.run_pass(SignalSet::EquationError { proxy }, &theta, config)?
        } else {
            let polys = channel.polys(&theta);
            let signals =
                FilteredSignals::compute(orders, &polys, data, j, passes > warmup)?;
            channel.run_pass(SignalSet::Filtered(&signals), &theta, config)?
        };
        let (candidate, p) = estimate.into_parts();
        covariance = p;

        let mut candidate = channel.stabilize(&theta, candidate)?;
        if let (0, Some(i)) = (passes, proxy) {
            channel.seed_common_denominator(i, &mut candidate);
        }

        change = relative_change(&candidate, &theta);
        theta = candidate;
        passes += 1;
        debug!(output = j, pass = passes, change, "pass complete");

        if !noisy {
            converged = true;
            change = 0.0;
            break;
        }
        if passes > warmup + 1 && change < config.tolerance() {
            converged = true;
            break;
        }
        if passes >= config.max_iterations() {
            break;
        }
    }

    if !converged {
        warn!(
            output = j,
            passes,
            change,
            tolerance = config.tolerance(),
            "pseudo-linear regression did not converge"
        );
    }

    let innovations = Innovations::compute(&channel.polys(&theta), data, j)?;
    Ok(ChannelFit {
        theta,
        covariance,
        status: ChannelStatus {
            iterations: passes,
            converged,
            final_change: change,
        },
        noise_variance: innovations.mean_square(orders.max_lag()),
    })
}
