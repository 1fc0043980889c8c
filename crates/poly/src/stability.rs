//! Stability of monic polynomials via reflection coefficients.
//!
//! A monic polynomial `1 + a_1 q^-1 + ... + a_n q^-n` has all its roots
//! strictly inside the unit circle iff every reflection coefficient produced
//! by the step-down (reverse Levinson) recursion has magnitude below one
//! (Schur-Cohn). The forward recursion builds a polynomial from reflection
//! coefficients and is stable by construction for `|r_k| < 1`.

/// Runs the step-down recursion on the free coefficients `a_1..a_n` of a
/// monic polynomial.
///
/// Returns the reflection coefficients `[r_1, .., r_n]` (in forward order),
/// or `None` as soon as one of them reaches magnitude one, at which point the
/// recursion is undefined and the polynomial is not stable.
pub fn reflection_coefficients(tail: &[f64]) -> Option<Vec<f64>> {
    let n = tail.len();
    let mut current = tail.to_vec();
    let mut reflections = vec![0.0; n];

    for m in (1..=n).rev() {
        let k = current[m - 1];
        if !k.is_finite() || k.abs() >= 1.0 {
            return None;
        }
        reflections[m - 1] = k;
        if m == 1 {
            break;
        }
        let denom = 1.0 - k * k;
        let prev: Vec<f64> = (0..m - 1)
            .map(|i| (current[i] - k * current[m - 2 - i]) / denom)
            .collect();
        current = prev;
    }

    Some(reflections)
}

/// Returns `true` when the monic polynomial `[1, a_1, .., a_n]` has all its
/// roots strictly inside the unit circle.
///
/// The leading coefficient is assumed to be one and is not inspected. A
/// constant polynomial (no free coefficients) is stable.
///
/// # Example
///
/// ```
/// use sysid_poly::is_stable;
///
/// assert!(is_stable(&[1.0, -1.2, 0.36])); // double root at 0.6
/// assert!(!is_stable(&[1.0, -2.5, 1.0])); // root at 2.0
/// ```
pub fn is_stable(monic: &[f64]) -> bool {
    match monic.split_first() {
        None => true,
        Some((_, tail)) => reflection_coefficients(tail).is_some(),
    }
}

/// Builds the monic polynomial `[1, a_1, .., a_n]` whose step-down recursion
/// yields the reflection coefficients `r`.
///
/// Any `r` with `|r_k| < 1` produces a stable polynomial, which makes this a
/// convenient way to draw random stable denominators.
pub fn monic_from_reflections(r: &[f64]) -> Vec<f64> {
    let n = r.len();
    let mut coeffs = vec![0.0; n];
    let mut prev = vec![0.0; n];

    for m in 0..n {
        prev[..m].copy_from_slice(&coeffs[..m]);
        coeffs[m] = r[m];
        for i in 0..m {
            coeffs[i] = prev[i] + r[m] * prev[m - 1 - i];
        }
    }

    let mut monic = Vec::with_capacity(n + 1);
    monic.push(1.0);
    monic.extend(coeffs);
    monic
}
