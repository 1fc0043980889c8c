//! One-call estimation functions named after the model structures.
//!
//! Each is shorthand for the matching [`ModelSpec`] constructor followed by
//! [`ModelSpec::fit()`] with the default [`PemConfig`](crate::PemConfig).

use ndarray::Array2;

use crate::error::PemError;
use crate::fit::FittedModel;
use crate::orders::OrderSpec;
use crate::spec::ModelSpec;

/// Fits `A y = B u + e`.
///
/// # Example
///
/// ```
/// use ndarray::Array2;
/// use sysid_pem::arx;
///
/// // y(t) = 0.5 y(t-1) + u(t-1)
/// let n = 50;
/// let u = Array2::from_shape_fn((n, 1), |(t, _)| ((t * 7919) % 13) as f64 - 6.0);
/// let mut y = Array2::zeros((n, 1));
/// for t in 1..n {
///     y[[t, 0]] = 0.5 * y[[t - 1, 0]] + u[[t - 1, 0]];
/// }
/// let model = arx(1, 0, 1, &u, &y).unwrap();
/// assert!((model.theta()[0] + 0.5).abs() < 1e-6);
/// assert!((model.theta()[1] - 1.0).abs() < 1e-6);
/// ```
///
/// # Errors
///
/// See [`ModelSpec::fit()`].
pub fn arx(
    na: impl Into<OrderSpec>,
    nb: impl Into<OrderSpec>,
    nk: impl Into<OrderSpec>,
    u: &Array2<f64>,
    y: &Array2<f64>,
) -> Result<FittedModel, PemError> {
    ModelSpec::arx(na, nb, nk).fit(u, y)
}

/// Fits `A y = B u + C e`.
///
/// # Errors
///
/// See [`ModelSpec::fit()`].
pub fn armax(
    na: impl Into<OrderSpec>,
    nb: impl Into<OrderSpec>,
    nc: impl Into<OrderSpec>,
    nk: impl Into<OrderSpec>,
    u: &Array2<f64>,
    y: &Array2<f64>,
) -> Result<FittedModel, PemError> {
    ModelSpec::armax(na, nb, nc, nk).fit(u, y)
}

/// Fits `y = B/F u + e`.
///
/// # Errors
///
/// See [`ModelSpec::fit()`].
pub fn oe(
    nb: impl Into<OrderSpec>,
    nf: impl Into<OrderSpec>,
    nk: impl Into<OrderSpec>,
    u: &Array2<f64>,
    y: &Array2<f64>,
) -> Result<FittedModel, PemError> {
    ModelSpec::oe(nb, nf, nk).fit(u, y)
}

/// Fits `y = B/F u + C/D e`.
///
/// # Errors
///
/// See [`ModelSpec::fit()`].
#[allow(clippy::too_many_arguments)]
pub fn bj(
    nb: impl Into<OrderSpec>,
    nc: impl Into<OrderSpec>,
    nd: impl Into<OrderSpec>,
    nf: impl Into<OrderSpec>,
    nk: impl Into<OrderSpec>,
    u: &Array2<f64>,
    y: &Array2<f64>,
) -> Result<FittedModel, PemError> {
    ModelSpec::bj(nb, nc, nd, nf, nk).fit(u, y)
}

/// Fits the general structure `A y = B/F u + C/D e`.
///
/// # Errors
///
/// See [`ModelSpec::fit()`].
#[allow(clippy::too_many_arguments)]
pub fn pem(
    na: impl Into<OrderSpec>,
    nb: impl Into<OrderSpec>,
    nc: impl Into<OrderSpec>,
    nd: impl Into<OrderSpec>,
    nf: impl Into<OrderSpec>,
    nk: impl Into<OrderSpec>,
    u: &Array2<f64>,
    y: &Array2<f64>,
) -> Result<FittedModel, PemError> {
    ModelSpec::general(na, nb, nc, nd, nf, nk).fit(u, y)
}
