//! One-step-ahead predictor signals of a single output.
//!
//! From the current polynomials of output `j`:
//!
//! ```text
//! w_i = B_i / F_i u_i                 noise-free input contributions
//! v   = sum_k A_jk y_k - sum_i w_i    equation noise
//! e   = D / C v                       innovations
//! ```
//!
//! The filtered copies feed the regressor of the next pass.

use sysid_poly::{convolve, filter};

use crate::assembly::ChannelPolys;
use crate::data::Signals;
use crate::error::PemError;
use crate::orders::Orders;

/// `w`, `v` and `e` of one output.
#[derive(Debug, Clone)]
pub(crate) struct Innovations {
    pub(crate) w: Vec<Vec<f64>>,
    pub(crate) v: Vec<f64>,
    pub(crate) e: Vec<f64>,
}

impl Innovations {
    pub(crate) fn compute(
        polys: &ChannelPolys,
        data: &Signals,
        output: usize,
    ) -> Result<Self, PemError> {
        let n = data.n();
        let mut w = Vec::with_capacity(data.nu());
        for i in 0..data.nu() {
            w.push(filter(&polys.b[i], &polys.f[i], data.u(i))?);
        }

        let mut v = vec![0.0; n];
        for (k, a) in polys.a.iter().enumerate() {
            let ay = filter(a, &[1.0], data.y(k))?;
            v.iter_mut().zip(&ay).for_each(|(acc, x)| *acc += x);
        }
        for wi in &w {
            v.iter_mut().zip(wi).for_each(|(acc, x)| *acc -= x);
        }

        let e = filter(&polys.d, &polys.c, &v)?;
        let innovations = Self { w, v, e };
        if !innovations.is_finite() {
            return Err(PemError::UnstableFilter { output });
        }
        Ok(innovations)
    }

    fn is_finite(&self) -> bool {
        self.e
            .iter()
            .chain(&self.v)
            .chain(self.w.iter().flatten())
            .all(|x| x.is_finite())
    }

    /// Mean square innovation over `t in [start, n)`.
    pub(crate) fn mean_square(&self, start: usize) -> f64 {
        let tail = &self.e[start.min(self.e.len())..];
        if tail.is_empty() {
            return 0.0;
        }
        tail.iter().map(|x| x * x).sum::<f64>() / tail.len() as f64
    }
}

/// Noise-model-filtered signals used by a filtered pass.
///
/// Only the channels whose order is non-zero are filtered; the rest stay
/// empty and are never indexed.
#[derive(Debug, Clone)]
pub(crate) struct FilteredSignals {
    /// `D/C y_k`
    pub(crate) y: Vec<Vec<f64>>,
    /// `D/(C F_i) u_i`
    pub(crate) u: Vec<Vec<f64>>,
    /// `D/(C F_i) w_i`
    pub(crate) w: Vec<Vec<f64>>,
    /// `1/C e`
    pub(crate) e: Vec<f64>,
    /// `1/C v`
    pub(crate) v: Vec<f64>,
    /// Innovations `e`, the base of the pseudo-target.
    pub(crate) innovations: Vec<f64>,
    /// Whether the C columns take part in this pass.
    pub(crate) c_active: bool,
}

impl FilteredSignals {
    pub(crate) fn compute(
        orders: &Orders,
        polys: &ChannelPolys,
        data: &Signals,
        output: usize,
        c_active: bool,
    ) -> Result<Self, PemError> {
        let j = output;
        let inn = Innovations::compute(polys, data, j)?;
        let (c, d) = (&polys.c, &polys.d);

        let mut y = Vec::with_capacity(data.ny());
        for k in 0..data.ny() {
            y.push(if orders.na(j, k) > 0 {
                filter(d, c, data.y(k))?
            } else {
                Vec::new()
            });
        }

        let mut u = Vec::with_capacity(data.nu());
        let mut w = Vec::with_capacity(data.nu());
        for i in 0..data.nu() {
            let cf = convolve(c, &polys.f[i]);
            u.push(filter(d, &cf, data.u(i))?);
            w.push(if orders.nf(j, i) > 0 {
                filter(d, &cf, &inn.w[i])?
            } else {
                Vec::new()
            });
        }

        let e = if orders.nc(j) > 0 {
            filter(&[1.0], c, &inn.e)?
        } else {
            Vec::new()
        };
        let v = if orders.nd(j) > 0 {
            filter(&[1.0], c, &inn.v)?
        } else {
            Vec::new()
        };

        let signals = Self {
            y,
            u,
            w,
            e,
            v,
            innovations: inn.e,
            c_active,
        };
        if !signals.is_finite() {
            return Err(PemError::UnstableFilter { output });
        }
        Ok(signals)
    }

    fn is_finite(&self) -> bool {
        self.y
            .iter()
            .chain(&self.u)
            .chain(&self.w)
            .flatten()
            .chain(&self.e)
            .chain(&self.v)
            .all(|x| x.is_finite())
    }
}
