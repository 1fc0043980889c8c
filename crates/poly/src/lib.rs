//! # sysid-poly
//!
//! Polynomials in the backward shift operator `q^-1`, the building block of
//! the ARX / ARMAX / OE / BJ model family.
//!
//! | Item | Purpose |
//! |------|---------|
//! | [`filter()`] | `y = B(q)/A(q) x` from rest |
//! | [`convolve()`] | polynomial product |
//! | [`is_stable()`] | step-down (Schur-Cohn) stability test |
//! | [`monic_from_reflections()`] | stable polynomial from reflection coefficients |
//! | [`Polynomial`] | coefficient sequence with delay metadata |
//! | [`PolyMatrix`] | `(row, col) -> Polynomial` grid for MIMO models |
//!
//! ```
//! use sysid_poly::{Polynomial, filter};
//!
//! let a = Polynomial::monic(&[-1.2, 0.36]);
//! let b = Polynomial::delayed(1, &[0.5, 0.1]);
//! let step = vec![1.0; 50];
//! let y = filter(b.coeffs(), a.coeffs(), &step).unwrap();
//! // DC gain B(1)/A(1) = 0.6 / 0.16
//! assert!((y[49] - 3.75).abs() < 1e-2);
//! ```

mod error;
mod filter;
mod polynomial;
mod stability;

pub use error::PolyError;
pub use filter::{convolve, filter};
pub use polynomial::{PolyMatrix, Polynomial, format_coefficient};
pub use stability::{is_stable, monic_from_reflections, reflection_coefficients};
