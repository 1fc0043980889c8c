//! Direct-form rational filtering and polynomial products.

use crate::error::PolyError;

/// Filters `x` through the rational transfer function `b(q) / a(q)`.
///
/// Both polynomials are given in ascending powers of `q^-1`. The filter starts
/// from rest (zero initial conditions), so
///
/// ```text
/// a[0] y(t) = sum_k b[k] x(t-k) - sum_{k>=1} a[k] y(t-k)
/// ```
///
/// An empty numerator yields an all-zero output.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`PolyError::EmptyDenominator`] | `a` is empty |
/// | [`PolyError::ZeroLeadingCoefficient`] | `a[0] == 0` |
///
/// # Example
///
/// ```
/// use sysid_poly::filter;
///
/// // Impulse response of 1 / (1 - 0.5 q^-1)
/// let y = filter(&[1.0], &[1.0, -0.5], &[1.0, 0.0, 0.0]).unwrap();
/// assert_eq!(y, vec![1.0, 0.5, 0.25]);
/// ```
pub fn filter(b: &[f64], a: &[f64], x: &[f64]) -> Result<Vec<f64>, PolyError> {
    let a0 = *a.first().ok_or(PolyError::EmptyDenominator)?;
    if a0 == 0.0 {
        return Err(PolyError::ZeroLeadingCoefficient);
    }

    let mut y = vec![0.0; x.len()];
    for t in 0..x.len() {
        let mut acc = 0.0;
        for (k, &bk) in b.iter().enumerate().take(t + 1) {
            acc += bk * x[t - k];
        }
        for (k, &ak) in a.iter().enumerate().skip(1).take(t) {
            acc -= ak * y[t - k];
        }
        y[t] = acc / a0;
    }
    Ok(y)
}

/// Multiplies two polynomials (discrete convolution of coefficient sequences).
///
/// Returns an empty vector when either operand is empty.
pub fn convolve(p: &[f64], q: &[f64]) -> Vec<f64> {
    if p.is_empty() || q.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0; p.len() + q.len() - 1];
    for (i, &pi) in p.iter().enumerate() {
        for (j, &qj) in q.iter().enumerate() {
            out[i + j] += pi * qj;
        }
    }
    out
}
