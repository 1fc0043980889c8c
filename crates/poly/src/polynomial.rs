//! Coefficient containers for polynomials in `q^-1`.

use std::fmt;
use std::ops::Index;

use crate::error::PolyError;
use crate::stability;

/// A polynomial in the backward shift operator `q^-1`.
///
/// Coefficients are stored in ascending powers, leading zeros included, so
/// `coeffs()[k]` multiplies `q^-k`. The `delay` records how many of those
/// leading zeros are structural (the pure input delay `nk` of a B polynomial).
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coeffs: Vec<f64>,
    delay: usize,
}

impl Polynomial {
    /// Wraps a coefficient sequence with no structural delay.
    pub fn new(coeffs: Vec<f64>) -> Self {
        Self { coeffs, delay: 0 }
    }

    /// The constant polynomial `1`.
    pub fn one() -> Self {
        Self::new(vec![1.0])
    }

    /// The constant polynomial `0`.
    pub fn zero() -> Self {
        Self::new(vec![0.0])
    }

    /// Builds `1 + tail[0] q^-1 + tail[1] q^-2 + ...`.
    ///
    /// # Example
    ///
    /// ```
    /// use sysid_poly::Polynomial;
    ///
    /// let a = Polynomial::monic(&[-1.2, 0.36]);
    /// assert_eq!(a.coeffs(), &[1.0, -1.2, 0.36]);
    /// assert_eq!(a.degree(), 2);
    /// ```
    pub fn monic(tail: &[f64]) -> Self {
        let mut coeffs = Vec::with_capacity(tail.len() + 1);
        coeffs.push(1.0);
        coeffs.extend_from_slice(tail);
        Self::new(coeffs)
    }

    /// Builds `q^-delay (b[0] + b[1] q^-1 + ...)`.
    ///
    /// An empty `b` yields the zero polynomial padded to the delay.
    pub fn delayed(delay: usize, b: &[f64]) -> Self {
        let mut coeffs = vec![0.0; delay];
        if b.is_empty() {
            coeffs.push(0.0);
        } else {
            coeffs.extend_from_slice(b);
        }
        Self { coeffs, delay }
    }

    /// Builds `0 + tail[0] q^-1 + ...`, the shape of an off-diagonal A entry.
    pub fn strictly_causal(tail: &[f64]) -> Self {
        let mut coeffs = Vec::with_capacity(tail.len() + 1);
        coeffs.push(0.0);
        coeffs.extend_from_slice(tail);
        Self::new(coeffs)
    }

    /// All coefficients in ascending powers of `q^-1`.
    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    /// The coefficients after the structural delay.
    pub fn free(&self) -> &[f64] {
        &self.coeffs[self.delay.min(self.coeffs.len())..]
    }

    /// Highest power of `q^-1` stored.
    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    /// Number of structural leading zeros.
    pub fn delay(&self) -> usize {
        self.delay
    }

    /// `true` when the leading coefficient is exactly one.
    pub fn is_monic(&self) -> bool {
        self.coeffs.first() == Some(&1.0)
    }

    /// `true` for a monic polynomial whose roots lie strictly inside the
    /// unit circle. Non-monic polynomials are never reported stable.
    pub fn is_stable(&self) -> bool {
        self.is_monic() && stability::is_stable(&self.coeffs)
    }

    /// Evaluates `self(q)` applied to `x`, i.e. `self / 1`.
    pub fn apply(&self, x: &[f64]) -> Vec<f64> {
        // A denominator of [1.0] can never fail.
        crate::filter::filter(&self.coeffs, &[1.0], x).unwrap_or_default()
    }
}

impl fmt::Display for Polynomial {
    /// Renders e.g. `1 - 1.2q^-1 + 0.36q^-2`, skipping zero terms.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut wrote = false;
        for (k, &c) in self.coeffs.iter().enumerate() {
            if c == 0.0 {
                continue;
            }
            let magnitude = format_coefficient(c.abs());
            let sign = if c < 0.0 { "-" } else { "+" };
            if wrote {
                write!(f, " {sign} ")?;
            } else if c < 0.0 {
                write!(f, "-")?;
            }
            match k {
                0 => write!(f, "{magnitude}")?,
                _ if magnitude == "1" => write!(f, "q^-{k}")?,
                _ => write!(f, "{magnitude}q^-{k}")?,
            }
            wrote = true;
        }
        if !wrote {
            write!(f, "0")?;
        }
        Ok(())
    }
}

/// Formats a coefficient with up to four decimals, trailing zeros removed.
pub fn format_coefficient(value: f64) -> String {
    let s = format!("{value:.4}");
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "" | "-" | "-0" => "0".to_string(),
        _ => trimmed.to_string(),
    }
}

/// A rows x cols grid of polynomials, e.g. the `A` (ny x ny) or `B`
/// (ny x nu) block of a MIMO model. Entries are stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct PolyMatrix {
    rows: usize,
    cols: usize,
    entries: Vec<Polynomial>,
}

impl PolyMatrix {
    /// Builds a matrix from row-major entries.
    ///
    /// # Errors
    ///
    /// [`PolyError::ShapeMismatch`] when `entries.len() != rows * cols`.
    pub fn from_entries(
        rows: usize,
        cols: usize,
        entries: Vec<Polynomial>,
    ) -> Result<Self, PolyError> {
        if entries.len() != rows * cols {
            return Err(PolyError::ShapeMismatch {
                rows,
                cols,
                len: entries.len(),
            });
        }
        Ok(Self {
            rows,
            cols,
            entries,
        })
    }

    /// Number of rows (outputs).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The entry at `(row, col)`, or `None` when out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<&Polynomial> {
        if row < self.rows && col < self.cols {
            self.entries.get(row * self.cols + col)
        } else {
            None
        }
    }

    /// Iterates `((row, col), polynomial)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &Polynomial)> {
        let cols = self.cols.max(1);
        self.entries
            .iter()
            .enumerate()
            .map(move |(idx, p)| ((idx / cols, idx % cols), p))
    }
}

impl Index<(usize, usize)> for PolyMatrix {
    type Output = Polynomial;

    fn index(&self, (row, col): (usize, usize)) -> &Polynomial {
        assert!(
            row < self.rows && col < self.cols,
            "index ({row}, {col}) out of range for {}x{} polynomial matrix",
            self.rows,
            self.cols
        );
        &self.entries[row * self.cols + col]
    }
}
