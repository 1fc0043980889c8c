//! Validated input/output records, stored channel-major.

use ndarray::Array2;

use crate::error::PemError;

/// Input and output samples split into per-channel vectors.
#[derive(Debug, Clone)]
pub(crate) struct Signals {
    u: Vec<Vec<f64>>,
    y: Vec<Vec<f64>>,
    n: usize,
}

impl Signals {
    /// Validates time-major `u` (N x nu) and `y` (N x ny).
    ///
    /// An input matrix with zero columns is allowed (pure time-series
    /// models); zero outputs or zero samples are not.
    pub(crate) fn from_arrays(u: &Array2<f64>, y: &Array2<f64>) -> Result<Self, PemError> {
        let (n, ny) = y.dim();
        if n == 0 || ny == 0 {
            return Err(PemError::EmptyData);
        }
        if u.nrows() != n {
            return Err(PemError::SampleCountMismatch {
                inputs: u.nrows(),
                outputs: n,
            });
        }
        if u.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(PemError::NonFiniteData);
        }
        Ok(Self {
            u: u.columns().into_iter().map(|c| c.to_vec()).collect(),
            y: y.columns().into_iter().map(|c| c.to_vec()).collect(),
            n,
        })
    }

    pub(crate) fn n(&self) -> usize {
        self.n
    }

    pub(crate) fn ny(&self) -> usize {
        self.y.len()
    }

    pub(crate) fn nu(&self) -> usize {
        self.u.len()
    }

    pub(crate) fn u(&self, i: usize) -> &[f64] {
        &self.u[i]
    }

    pub(crate) fn y(&self, k: usize) -> &[f64] {
        &self.y[k]
    }
}

/// Wraps SISO slices as N x 1 matrices.
pub(crate) fn column(values: &[f64]) -> Array2<f64> {
    Array2::from_shape_fn((values.len(), 1), |(t, _)| values[t])
}
