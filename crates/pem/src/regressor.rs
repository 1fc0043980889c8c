//! Regression vectors for one output channel.

use ndarray::Array1;

use crate::data::Signals;
use crate::layout::ChannelLayout;
use crate::orders::Orders;
use crate::predictor::FilteredSignals;

/// Which signals the regressor is built from.
#[derive(Debug, Clone, Copy)]
pub(crate) enum SignalSet<'a> {
    /// Raw data. C and D columns are zero; the F columns of `proxy` use the
    /// measured own output in place of the noise-free output.
    EquationError { proxy: Option<usize> },
    /// Noise-model-filtered signals from the previous estimate.
    Filtered(&'a FilteredSignals),
}

/// Builds `x(t)` for one output in the θ layout order.
pub(crate) struct RegressorBuilder<'a> {
    orders: &'a Orders,
    layout: &'a ChannelLayout,
    data: &'a Signals,
    output: usize,
}

impl<'a> RegressorBuilder<'a> {
    pub(crate) fn new(
        orders: &'a Orders,
        layout: &'a ChannelLayout,
        data: &'a Signals,
        output: usize,
    ) -> Self {
        Self {
            orders,
            layout,
            data,
            output,
        }
    }

    /// Fills `x` with the regressor at time `t`. Requires `t >= L`.
    pub(crate) fn fill(&self, t: usize, set: SignalSet<'_>, x: &mut Array1<f64>) {
        let j = self.output;
        let o = self.orders;
        let lay = self.layout;
        x.fill(0.0);

        for (k, range) in lay.a.iter().enumerate() {
            let yk = match set {
                SignalSet::EquationError { .. } => self.data.y(k),
                SignalSet::Filtered(sig) => sig.y[k].as_slice(),
            };
            for (l, idx) in range.clone().enumerate() {
                x[idx] = -yk[t - 1 - l];
            }
        }

        for (i, range) in lay.b.iter().enumerate() {
            let ui = match set {
                SignalSet::EquationError { .. } => self.data.u(i),
                SignalSet::Filtered(sig) => sig.u[i].as_slice(),
            };
            let nk = o.nk(j, i);
            for (l, idx) in range.clone().enumerate() {
                x[idx] = ui[t - nk - l];
            }
        }

        match set {
            SignalSet::EquationError { proxy } => {
                if let Some(i) = proxy {
                    let yj = self.data.y(j);
                    for (l, idx) in lay.f[i].clone().enumerate() {
                        x[idx] = -yj[t - 1 - l];
                    }
                }
            }
            SignalSet::Filtered(sig) => {
                if sig.c_active {
                    for (l, idx) in lay.c.clone().enumerate() {
                        x[idx] = sig.e[t - 1 - l];
                    }
                }
                for (l, idx) in lay.d.clone().enumerate() {
                    x[idx] = -sig.v[t - 1 - l];
                }
                for (i, range) in lay.f.iter().enumerate() {
                    for (l, idx) in range.clone().enumerate() {
                        x[idx] = -sig.w[i][t - 1 - l];
                    }
                }
            }
        }
    }

    /// Target of the regression at time `t`: `y_j(t)` for raw data, the
    /// pseudo-target `e(t) + x(t)' theta_prev` for filtered signals.
    pub(crate) fn target(
        &self,
        t: usize,
        set: SignalSet<'_>,
        x: &Array1<f64>,
        theta_prev: &Array1<f64>,
    ) -> f64 {
        match set {
            SignalSet::EquationError { .. } => self.data.y(self.output)[t],
            SignalSet::Filtered(sig) => sig.innovations[t] + x.dot(theta_prev),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::OrderSet;
    use ndarray::Array2;

    fn ramp_signals(n: usize, nu: usize, ny: usize) -> Signals {
        // u_i(t) = 100 (i + 1) + t, y_k(t) = -(10 (k + 1) + t)
        let u = Array2::from_shape_fn((n, nu), |(t, i)| 100.0 * (i + 1) as f64 + t as f64);
        let y = Array2::from_shape_fn((n, ny), |(t, k)| -(10.0 * (k + 1) as f64 + t as f64));
        Signals::from_arrays(&u, &y).unwrap()
    }

    #[test]
    fn arx_regressor_layout() {
        let orders = OrderSet {
            na: 2.into(),
            nb: 1.into(),
            nk: 1.into(),
            ..OrderSet::default()
        }
        .normalize(1, 1)
        .unwrap();
        let layout = ChannelLayout::new(&orders, 0);
        let data = ramp_signals(10, 1, 1);
        let builder = RegressorBuilder::new(&orders, &layout, &data, 0);
        let mut x = Array1::zeros(layout.len());
        let set = SignalSet::EquationError { proxy: None };
        builder.fill(5, set, &mut x);
        // [-y(4), -y(3), u(4), u(3)]
        assert_eq!(x.to_vec(), vec![14.0, 13.0, 104.0, 103.0]);
        let target = builder.target(5, set, &x, &Array1::zeros(4));
        assert_eq!(target, -15.0);
    }

    #[test]
    fn mimo_regressor_orders_blocks() {
        let orders = OrderSet {
            na: [[1, 2], [1, 1]].into(),
            nb: [[0, 1], [0, 0]].into(),
            nk: [[2, 1], [1, 1]].into(),
            ..OrderSet::default()
        }
        .normalize(2, 2)
        .unwrap();
        let layout = ChannelLayout::new(&orders, 0);
        let data = ramp_signals(10, 2, 2);
        let builder = RegressorBuilder::new(&orders, &layout, &data, 0);
        let mut x = Array1::zeros(layout.len());
        builder.fill(6, SignalSet::EquationError { proxy: None }, &mut x);
        // -y0(5) | -y1(5), -y1(4) | u0(4) | u1(5), u1(4)
        assert_eq!(
            x.to_vec(),
            vec![15.0, 25.0, 24.0, 104.0, 205.0, 204.0]
        );
    }

    #[test]
    fn equation_error_proxy_uses_own_output() {
        let orders = OrderSet {
            nb: [[0, 0]].into(),
            nf: [[2, 1]].into(),
            nk: 1.into(),
            ..OrderSet::default()
        }
        .normalize(1, 2)
        .unwrap();
        let layout = ChannelLayout::new(&orders, 0);
        let data = ramp_signals(10, 2, 1);
        let builder = RegressorBuilder::new(&orders, &layout, &data, 0);
        let mut x = Array1::zeros(layout.len());
        builder.fill(4, SignalSet::EquationError { proxy: Some(0) }, &mut x);
        // u0(3) | u1(3) | F0: -y(3), -y(2) | F1: 0
        assert_eq!(x.to_vec(), vec![103.0, 203.0, 13.0, 12.0, 0.0]);
    }

    #[test]
    fn filtered_set_reads_filtered_signals() {
        let orders = OrderSet {
            na: 1.into(),
            nb: 0.into(),
            nc: 1.into(),
            nd: 1.into(),
            nf: 1.into(),
            nk: 1.into(),
            ..OrderSet::default()
        }
        .normalize(1, 1)
        .unwrap();
        let layout = ChannelLayout::new(&orders, 0);
        let data = ramp_signals(5, 1, 1);
        let sig = FilteredSignals {
            y: vec![vec![1.0, 2.0, 3.0, 4.0, 5.0]],
            u: vec![vec![10.0, 20.0, 30.0, 40.0, 50.0]],
            w: vec![vec![0.1, 0.2, 0.3, 0.4, 0.5]],
            e: vec![7.0, 8.0, 9.0, 10.0, 11.0],
            v: vec![-1.0, -2.0, -3.0, -4.0, -5.0],
            innovations: vec![0.0, 0.0, 0.0, 0.5, 0.0],
            c_active: false,
        };
        let builder = RegressorBuilder::new(&orders, &layout, &data, 0);
        let mut x = Array1::zeros(layout.len());
        builder.fill(3, SignalSet::Filtered(&sig), &mut x);
        // A: -yf(2) | B: uf(2) | C: inactive | D: -vf(2) | F: -wf(2)
        assert_eq!(x.to_vec(), vec![-3.0, 30.0, 0.0, 3.0, -0.3]);

        let active = FilteredSignals {
            c_active: true,
            ..sig
        };
        builder.fill(3, SignalSet::Filtered(&active), &mut x);
        assert_eq!(x[2], 9.0);

        let theta_prev = Array1::from(vec![1.0, 0.0, 0.0, 0.0, 0.0]);
        let target = builder.target(3, SignalSet::Filtered(&active), &x, &theta_prev);
        assert_eq!(target, 0.5 - 3.0);
    }
}
