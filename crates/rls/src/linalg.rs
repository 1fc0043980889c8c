//! Dense linear algebra for small symmetric positive-definite systems.
//!
//! Parameter counts in polynomial models are small (tens at most), so plain
//! Cholesky on `ndarray` storage is enough; no LAPACK backend is pulled in.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::error::RlsError;

/// Lower-triangular Cholesky factor `L` with `a = L L'`.
///
/// Only the lower triangle of `a` is read.
///
/// # Errors
///
/// [`RlsError::NotPositiveDefinite`] with the index of the first
/// non-positive (or non-finite) pivot.
pub fn cholesky(a: ArrayView2<'_, f64>) -> Result<Array2<f64>, RlsError> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));
    for j in 0..n {
        let mut diag = a[[j, j]];
        for k in 0..j {
            diag -= l[[j, k]] * l[[j, k]];
        }
        if !diag.is_finite() || diag <= 0.0 {
            return Err(RlsError::NotPositiveDefinite { index: j });
        }
        let ljj = diag.sqrt();
        l[[j, j]] = ljj;
        for i in (j + 1)..n {
            let mut s = a[[i, j]];
            for k in 0..j {
                s -= l[[i, k]] * l[[j, k]];
            }
            l[[i, j]] = s / ljj;
        }
    }
    Ok(l)
}

/// Solves `L L' x = b` given the Cholesky factor `L`.
pub fn cholesky_solve(l: ArrayView2<'_, f64>, b: ArrayView1<'_, f64>) -> Array1<f64> {
    let n = l.nrows();
    // forward: L z = b
    let mut z = b.to_owned();
    for i in 0..n {
        let mut s = z[i];
        for k in 0..i {
            s -= l[[i, k]] * z[k];
        }
        z[i] = s / l[[i, i]];
    }
    // backward: L' x = z
    for i in (0..n).rev() {
        let mut s = z[i];
        for k in (i + 1)..n {
            s -= l[[k, i]] * z[k];
        }
        z[i] = s / l[[i, i]];
    }
    z
}

/// Solves the SPD system `a x = b`.
pub fn solve_spd(a: ArrayView2<'_, f64>, b: ArrayView1<'_, f64>) -> Result<Array1<f64>, RlsError> {
    let l = cholesky(a)?;
    Ok(cholesky_solve(l.view(), b))
}

/// Inverts an SPD matrix column by column through its Cholesky factor.
pub fn inverse_spd(a: ArrayView2<'_, f64>) -> Result<Array2<f64>, RlsError> {
    let n = a.nrows();
    let l = cholesky(a)?;
    let mut inv = Array2::<f64>::zeros((n, n));
    let mut e = Array1::<f64>::zeros(n);
    for j in 0..n {
        e.fill(0.0);
        e[j] = 1.0;
        let col = cholesky_solve(l.view(), e.view());
        inv.column_mut(j).assign(&col);
    }
    symmetrize(&mut inv);
    Ok(inv)
}

/// Computes `d' P^-1 d` for SPD `p` without forming the inverse.
pub fn quadratic_form(p: ArrayView2<'_, f64>, d: ArrayView1<'_, f64>) -> Result<f64, RlsError> {
    let x = solve_spd(p, d)?;
    Ok(d.dot(&x))
}

/// Replaces `a` with `(a + a') / 2`.
pub fn symmetrize(a: &mut Array2<f64>) {
    let n = a.nrows();
    for i in 0..n {
        for j in (i + 1)..n {
            let m = 0.5 * (a[[i, j]] + a[[j, i]]);
            a[[i, j]] = m;
            a[[j, i]] = m;
        }
    }
}

/// Batch least squares with a diffuse prior.
///
/// Rows of `x` are regressors and `y` the matching targets. Returns
/// `(theta, P)` with `R = X'X + I / p0`, `theta = R^-1 X'y` and `P = R^-1`.
/// This is the fixed point that [`Rls`](crate::Rls) reaches with unit
/// forgetting from `P0 = p0 I`, `theta0 = 0`.
pub fn normal_equations(
    x: ArrayView2<'_, f64>,
    y: ArrayView1<'_, f64>,
    p0: f64,
) -> Result<(Array1<f64>, Array2<f64>), RlsError> {
    if x.nrows() != y.len() {
        return Err(RlsError::DimensionMismatch {
            expected: x.nrows(),
            got: y.len(),
        });
    }
    if !p0.is_finite() || p0 <= 0.0 {
        return Err(RlsError::InvalidInitialCovariance { value: p0 });
    }
    let mut r = x.t().dot(&x);
    r.diag_mut().mapv_inplace(|v| v + 1.0 / p0);
    let rhs = x.t().dot(&y);
    let l = cholesky(r.view())?;
    let theta = cholesky_solve(l.view(), rhs.view());
    let p = inverse_spd(r.view())?;
    Ok((theta, p))
}

/// Stacks regressor rows into a matrix (helper for batch comparisons).
pub fn stack_rows(rows: &[Array1<f64>]) -> Array2<f64> {
    let n = rows.first().map_or(0, |r| r.len());
    let mut out = Array2::<f64>::zeros((rows.len(), n));
    for (mut dst, src) in out.axis_iter_mut(Axis(0)).zip(rows) {
        dst.assign(src);
    }
    out
}
