//! Data generators shared by the estimation tests.

#![allow(dead_code)]

use ndarray::Array2;
use rand::Rng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use sysid_pem::FittedModel;

/// Confidence level of every ellipsoid check.
pub const LEVEL: f64 = 0.995;

/// `n x nu` white inputs, uniform on `[-sqrt(3), sqrt(3)]` (unit variance).
pub fn uniform_inputs(rng: &mut StdRng, n: usize, nu: usize) -> Array2<f64> {
    let bound = 3f64.sqrt();
    Array2::from_shape_fn((n, nu), |_| rng.random_range(-bound..bound))
}

/// `n x channels` Gaussian white noise.
pub fn gaussian(rng: &mut StdRng, n: usize, channels: usize, std: f64) -> Array2<f64> {
    let normal = Normal::new(0.0, std).unwrap();
    Array2::from_shape_fn((n, channels), |_| normal.sample(rng))
}

/// `b / a` applied to `x`.
pub fn filter(b: &[f64], a: &[f64], x: &[f64]) -> Vec<f64> {
    sysid_poly::filter(b, a, x).unwrap()
}

/// Element-wise sum of equally long signals.
pub fn sum(signals: &[Vec<f64>]) -> Vec<f64> {
    let n = signals[0].len();
    (0..n).map(|t| signals.iter().map(|s| s[t]).sum()).collect()
}

/// Stacks signals as the columns of an `n x len` matrix.
pub fn columns(signals: &[Vec<f64>]) -> Array2<f64> {
    let n = signals[0].len();
    Array2::from_shape_fn((n, signals.len()), |(t, c)| signals[c][t])
}

/// Simulates `A y = B u + C e` for `ny` outputs.
///
/// `a[j][k]`, `b[j][i]` and `c[j]` are full coefficient sequences: `a[j][j]`
/// and `c[j]` start with 1, `a[j][k]` (`k != j`) with 0, and `b[j][i]`
/// carries its delay as leading zeros.
pub fn simulate(
    a: &[Vec<Vec<f64>>],
    b: &[Vec<Vec<f64>>],
    c: &[Vec<f64>],
    u: &Array2<f64>,
    e: &Array2<f64>,
) -> Array2<f64> {
    let (n, ny) = e.dim();
    let mut y = Array2::<f64>::zeros((n, ny));
    for t in 0..n {
        for j in 0..ny {
            let mut value = 0.0;
            for (k, poly) in a[j].iter().enumerate() {
                for (l, coeff) in poly.iter().enumerate().skip(1) {
                    if t >= l {
                        value -= coeff * y[[t - l, k]];
                    }
                }
            }
            for (i, poly) in b[j].iter().enumerate() {
                for (l, coeff) in poly.iter().enumerate() {
                    if t >= l {
                        value += coeff * u[[t - l, i]];
                    }
                }
            }
            for (l, coeff) in c[j].iter().enumerate() {
                if t >= l {
                    value += coeff * e[[t - l, j]];
                }
            }
            y[[t, j]] = value;
        }
    }
    y
}

/// Asserts that `theta0` lies inside the model's 99.5% confidence ellipsoid.
pub fn assert_in_ellipsoid(model: &FittedModel, theta0: &[f64]) {
    let statistic = model.ellipsoid_statistic(theta0).unwrap();
    assert!(
        model.within_confidence(theta0, LEVEL).unwrap(),
        "ellipsoid statistic {statistic} too large, theta = {}",
        model.theta()
    );
}
