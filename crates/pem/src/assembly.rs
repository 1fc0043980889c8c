//! Model assembly: flat θ back into polynomial containers.

use ndarray::{Array1, Array2, s};
use sysid_poly::{PolyMatrix, Polynomial, is_stable};

use crate::driver::ChannelFit;
use crate::error::PemError;
use crate::fit::FittedModel;
use crate::layout::ChannelLayout;
use crate::orders::Orders;

/// Full coefficient sequences of one output's polynomials, leading terms
/// and delays restored.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ChannelPolys {
    /// `A_jk` for every output `k`; leading 1 on the diagonal, 0 elsewhere.
    pub(crate) a: Vec<Vec<f64>>,
    /// `B_ji` for every input, `nk` leading zeros.
    pub(crate) b: Vec<Vec<f64>>,
    pub(crate) c: Vec<f64>,
    pub(crate) d: Vec<f64>,
    pub(crate) f: Vec<Vec<f64>>,
}

impl ChannelPolys {
    pub(crate) fn from_theta(
        orders: &Orders,
        layout: &ChannelLayout,
        j: usize,
        theta: &[f64],
    ) -> Self {
        let with_lead = |lead: f64, tail: &[f64]| {
            let mut p = Vec::with_capacity(tail.len() + 1);
            p.push(lead);
            p.extend_from_slice(tail);
            p
        };
        let a = layout
            .a
            .iter()
            .enumerate()
            .map(|(k, r)| with_lead(if k == j { 1.0 } else { 0.0 }, &theta[r.clone()]))
            .collect();
        let b = layout
            .b
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let mut p = vec![0.0; orders.nk(j, i)];
                p.extend_from_slice(&theta[r.clone()]);
                p
            })
            .collect();
        let f = layout
            .f
            .iter()
            .map(|r| with_lead(1.0, &theta[r.clone()]))
            .collect();
        Self {
            a,
            b,
            c: with_lead(1.0, &theta[layout.c.clone()]),
            d: with_lead(1.0, &theta[layout.d.clone()]),
            f,
        }
    }

    /// `true` when C and every F have all roots inside the unit circle, so
    /// the predictor filters `1/C` and `1/F_i` stay bounded.
    pub(crate) fn predictor_is_stable(&self) -> bool {
        is_stable(&self.c) && self.f.iter().all(|f| is_stable(f))
    }
}

/// Packages per-output estimates into the immutable [`FittedModel`].
pub(crate) fn assemble(orders: Orders, fits: Vec<ChannelFit>) -> Result<FittedModel, PemError> {
    let (ny, nu) = (orders.ny(), orders.nu());
    let total = orders.n_params();

    let mut theta = Array1::<f64>::zeros(total);
    let mut covariance = Array2::<f64>::zeros((total, total));
    let mut a = Vec::with_capacity(ny * ny);
    let mut b = Vec::with_capacity(ny * nu);
    let mut c = Vec::with_capacity(ny);
    let mut d = Vec::with_capacity(ny);
    let mut f = Vec::with_capacity(ny * nu);
    let mut status = Vec::with_capacity(ny);
    let mut noise_variance = Vec::with_capacity(ny);

    let mut offset = 0;
    for (j, fit) in fits.into_iter().enumerate() {
        let layout = ChannelLayout::new(&orders, j);
        let n = layout.len();
        theta.slice_mut(s![offset..offset + n]).assign(&fit.theta);
        covariance
            .slice_mut(s![offset..offset + n, offset..offset + n])
            .assign(&fit.covariance);

        let coeffs = fit.theta.to_vec();
        let polys = ChannelPolys::from_theta(&orders, &layout, j, &coeffs);
        for (k, coeffs) in polys.a.iter().enumerate() {
            a.push(if k == j {
                Polynomial::monic(&coeffs[1..])
            } else {
                Polynomial::strictly_causal(&coeffs[1..])
            });
        }
        for (i, coeffs) in polys.b.iter().enumerate() {
            let nk = orders.nk(j, i);
            b.push(Polynomial::delayed(nk, &coeffs[nk..]));
        }
        c.push(Polynomial::monic(&polys.c[1..]));
        d.push(Polynomial::monic(&polys.d[1..]));
        for coeffs in &polys.f {
            f.push(Polynomial::monic(&coeffs[1..]));
        }

        status.push(fit.status);
        noise_variance.push(fit.noise_variance);
        offset += n;
    }

    Ok(FittedModel::new(
        orders,
        theta,
        covariance,
        [
            PolyMatrix::from_entries(ny, ny, a)?,
            PolyMatrix::from_entries(ny, nu, b)?,
            PolyMatrix::from_entries(ny, 1, c)?,
            PolyMatrix::from_entries(ny, 1, d)?,
            PolyMatrix::from_entries(ny, nu, f)?,
        ],
        status,
        noise_variance,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::ChannelStatus;
    use crate::orders::OrderSet;

    fn bj_orders() -> Orders {
        OrderSet {
            nb: 1.into(),
            nc: 1.into(),
            nd: 2.into(),
            nf: 2.into(),
            nk: 2.into(),
            ..OrderSet::default()
        }
        .normalize(1, 1)
        .unwrap()
    }

    #[test]
    fn from_theta_restores_leading_terms() {
        let orders = bj_orders();
        let layout = ChannelLayout::new(&orders, 0);
        let theta = [0.5, 0.1, 0.8, -1.6, 0.64, -1.2, 0.36];
        let polys = ChannelPolys::from_theta(&orders, &layout, 0, &theta);
        assert_eq!(polys.a, vec![vec![1.0]]);
        assert_eq!(polys.b, vec![vec![0.0, 0.0, 0.5, 0.1]]);
        assert_eq!(polys.c, vec![1.0, 0.8]);
        assert_eq!(polys.d, vec![1.0, -1.6, 0.64]);
        assert_eq!(polys.f, vec![vec![1.0, -1.2, 0.36]]);
        assert!(polys.predictor_is_stable());
    }

    #[test]
    fn unstable_f_detected() {
        let orders = bj_orders();
        let layout = ChannelLayout::new(&orders, 0);
        let theta = [0.5, 0.1, 0.8, 0.0, 0.0, -2.5, 1.0];
        let polys = ChannelPolys::from_theta(&orders, &layout, 0, &theta);
        assert!(!polys.predictor_is_stable());
    }

    #[test]
    fn off_diagonal_a_has_zero_lead() {
        let orders = OrderSet {
            na: [[1, 1], [1, 1]].into(),
            nb: [[0], [0]].into(),
            nk: 1.into(),
            ..OrderSet::default()
        }
        .normalize(2, 1)
        .unwrap();
        let layout = ChannelLayout::new(&orders, 1);
        let polys = ChannelPolys::from_theta(&orders, &layout, 1, &[0.2, -0.5, 0.9]);
        assert_eq!(polys.a, vec![vec![0.0, 0.2], vec![1.0, -0.5]]);
        assert_eq!(polys.b, vec![vec![0.0, 0.9]]);
    }

    #[test]
    fn assemble_builds_block_diagonal_covariance() {
        let orders = OrderSet {
            na: [[1, 0], [0, 1]].into(),
            nb: [[0], [0]].into(),
            nk: 1.into(),
            ..OrderSet::default()
        }
        .normalize(2, 1)
        .unwrap();
        let status = ChannelStatus {
            iterations: 1,
            converged: true,
            final_change: 0.0,
        };
        let fits = vec![
            ChannelFit {
                theta: Array1::from(vec![-0.5, 1.0]),
                covariance: Array2::from_elem((2, 2), 1.0),
                status,
                noise_variance: 0.1,
            },
            ChannelFit {
                theta: Array1::from(vec![-0.3, 2.0]),
                covariance: Array2::from_elem((2, 2), 2.0),
                status,
                noise_variance: 0.2,
            },
        ];
        let model = assemble(orders, fits).unwrap();
        assert_eq!(model.theta().to_vec(), vec![-0.5, 1.0, -0.3, 2.0]);
        let p = model.covariance();
        assert_eq!(p[[0, 1]], 1.0);
        assert_eq!(p[[3, 2]], 2.0);
        assert_eq!(p[[0, 3]], 0.0);
        assert_eq!(p[[2, 1]], 0.0);
        assert_eq!(model.a()[(1, 1)].coeffs(), &[1.0, -0.3]);
        assert_eq!(model.a()[(0, 1)].coeffs(), &[0.0]);
        assert_eq!(model.b()[(1, 0)].coeffs(), &[0.0, 2.0]);
        assert_eq!(model.b()[(1, 0)].delay(), 1);
        assert_eq!(model.noise_variance(), &[0.1, 0.2]);
    }
}
