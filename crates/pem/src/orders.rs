//! Polynomial order specifications and their normalized MIMO form.

use std::fmt;

use ndarray::{Array1, Array2, Axis};

use crate::error::PemError;

/// A user-supplied order specification for one polynomial role.
///
/// Scalars, flat lists and nested lists are accepted and normalized against
/// the data shape by [`ModelSpec::orders()`](crate::ModelSpec::orders). An
/// empty list means the polynomial is absent (all orders zero).
///
/// ```
/// use sysid_pem::OrderSpec;
///
/// assert_eq!(OrderSpec::from(2), OrderSpec::Scalar(2));
/// assert_eq!(OrderSpec::from(vec![1, 2]), OrderSpec::List(vec![1, 2]));
/// assert_eq!(
///     OrderSpec::from([[2, 1], [0, 2]]),
///     OrderSpec::Matrix(vec![vec![2, 1], vec![0, 2]])
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderSpec {
    /// A single value.
    Scalar(usize),
    /// A flat sequence.
    List(Vec<usize>),
    /// A row-major nested sequence.
    Matrix(Vec<Vec<usize>>),
}

impl OrderSpec {
    /// The empty specification (polynomial absent).
    pub fn empty() -> Self {
        Self::List(Vec::new())
    }

    /// `true` when no values are given.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Scalar(_) => false,
            Self::List(v) => v.is_empty(),
            Self::Matrix(rows) => rows.iter().all(Vec::is_empty),
        }
    }
}

impl Default for OrderSpec {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<usize> for OrderSpec {
    fn from(v: usize) -> Self {
        Self::Scalar(v)
    }
}

impl From<Vec<usize>> for OrderSpec {
    fn from(v: Vec<usize>) -> Self {
        Self::List(v)
    }
}

impl From<&[usize]> for OrderSpec {
    fn from(v: &[usize]) -> Self {
        Self::List(v.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for OrderSpec {
    fn from(v: [usize; N]) -> Self {
        Self::List(v.to_vec())
    }
}

impl From<Vec<Vec<usize>>> for OrderSpec {
    fn from(rows: Vec<Vec<usize>>) -> Self {
        Self::Matrix(rows)
    }
}

impl<const R: usize, const C: usize> From<[[usize; C]; R]> for OrderSpec {
    fn from(rows: [[usize; C]; R]) -> Self {
        Self::Matrix(rows.iter().map(|r| r.to_vec()).collect())
    }
}

impl From<Array2<usize>> for OrderSpec {
    fn from(m: Array2<usize>) -> Self {
        Self::Matrix(m.outer_iter().map(|row| row.to_vec()).collect())
    }
}

/// The polynomial a specification belongs to; decides its normalized shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Role {
    Na,
    Nb,
    Nc,
    Nd,
    Nf,
    Nk,
}

impl Role {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Role::Na => "na",
            Role::Nb => "nb",
            Role::Nc => "nc",
            Role::Nd => "nd",
            Role::Nf => "nf",
            Role::Nk => "nk",
        }
    }

    /// `(rows, cols)` the normalized matrix must have.
    pub(crate) fn shape(self, ny: usize, nu: usize) -> (usize, usize) {
        match self {
            Role::Na => (ny, ny),
            Role::Nb | Role::Nf | Role::Nk => (ny, nu),
            Role::Nc | Role::Nd => (ny, 1),
        }
    }

    fn is_column(self) -> bool {
        matches!(self, Role::Nc | Role::Nd)
    }
}

/// Normalizes one specification into its role-shaped matrix.
pub(crate) fn normalize(
    spec: &OrderSpec,
    role: Role,
    ny: usize,
    nu: usize,
) -> Result<Array2<usize>, PemError> {
    let (expected_rows, expected_cols) = role.shape(ny, nu);
    if spec.is_empty() {
        return Ok(Array2::zeros((expected_rows, expected_cols)));
    }

    let matrix = match spec {
        OrderSpec::Scalar(v) if role == Role::Nk => {
            Array2::from_elem((expected_rows, expected_cols), *v)
        }
        OrderSpec::Scalar(v) => Array2::from_elem((1, 1), *v),
        OrderSpec::List(values) => {
            let flat = Array1::from(values.clone());
            if role.is_column() {
                flat.insert_axis(Axis(1))
            } else {
                flat.insert_axis(Axis(0))
            }
        }
        OrderSpec::Matrix(rows) => {
            let cols = rows[0].len();
            if rows.iter().any(|r| r.len() != cols) {
                return Err(PemError::RaggedOrders { role: role.name() });
            }
            Array2::from_shape_fn((rows.len(), cols), |(i, j)| rows[i][j])
        }
    };

    let (rows, cols) = matrix.dim();
    if (rows, cols) != (expected_rows, expected_cols) {
        return Err(PemError::ShapeMismatch {
            role: role.name(),
            expected_rows,
            expected_cols,
            rows,
            cols,
        });
    }
    Ok(matrix)
}

/// The six raw specifications of a model, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct OrderSet {
    pub(crate) na: OrderSpec,
    pub(crate) nb: OrderSpec,
    pub(crate) nc: OrderSpec,
    pub(crate) nd: OrderSpec,
    pub(crate) nf: OrderSpec,
    pub(crate) nk: OrderSpec,
}

impl OrderSet {
    pub(crate) fn normalize(&self, ny: usize, nu: usize) -> Result<Orders, PemError> {
        Ok(Orders {
            ny,
            nu,
            na: normalize(&self.na, Role::Na, ny, nu)?,
            nb: normalize(&self.nb, Role::Nb, ny, nu)?,
            nc: normalize(&self.nc, Role::Nc, ny, nu)?,
            nd: normalize(&self.nd, Role::Nd, ny, nu)?,
            nf: normalize(&self.nf, Role::Nf, ny, nu)?,
            nk: normalize(&self.nk, Role::Nk, ny, nu)?,
        })
    }
}

/// The model family a set of orders describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Structure {
    /// `y = B u + e`
    Fir,
    /// `A y = B u + e`
    Arx,
    /// `A y = B u + C e`
    Armax,
    /// `y = B/F u + e`
    Oe,
    /// `y = B/F u + C/D e`
    Bj,
    /// Any other combination of A, B, C, D, F.
    General,
}

impl Structure {
    /// `true` for structures whose regressor needs no noise-model terms.
    pub fn is_equation_error(self) -> bool {
        matches!(self, Structure::Fir | Structure::Arx)
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Structure::Fir => "FIR",
            Structure::Arx => "ARX",
            Structure::Armax => "ARMAX",
            Structure::Oe => "OE",
            Structure::Bj => "BJ",
            Structure::General => "general",
        };
        f.write_str(name)
    }
}

/// Orders normalized against `(ny, nu)`.
///
/// `na` is `ny x ny`, `nb`, `nf` and `nk` are `ny x nu`, `nc` and `nd` are
/// `ny x 1`. `na`, `nc`, `nd`, `nf` count coefficients after the leading
/// term; `B` carries `nb + 1` coefficients starting at lag `nk`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Orders {
    ny: usize,
    nu: usize,
    na: Array2<usize>,
    nb: Array2<usize>,
    nc: Array2<usize>,
    nd: Array2<usize>,
    nf: Array2<usize>,
    nk: Array2<usize>,
}

impl Orders {
    /// Number of outputs.
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Number of inputs.
    pub fn nu(&self) -> usize {
        self.nu
    }

    /// Degree of `A_jk`.
    pub fn na(&self, j: usize, k: usize) -> usize {
        self.na[[j, k]]
    }

    /// Degree of `B_ji` after its delay.
    pub fn nb(&self, j: usize, i: usize) -> usize {
        self.nb[[j, i]]
    }

    /// Degree of `C_j`.
    pub fn nc(&self, j: usize) -> usize {
        self.nc[[j, 0]]
    }

    /// Degree of `D_j`.
    pub fn nd(&self, j: usize) -> usize {
        self.nd[[j, 0]]
    }

    /// Degree of `F_ji`.
    pub fn nf(&self, j: usize, i: usize) -> usize {
        self.nf[[j, i]]
    }

    /// Delay of input `i` on output `j`.
    pub fn nk(&self, j: usize, i: usize) -> usize {
        self.nk[[j, i]]
    }

    /// Minimum history length `L`: the largest lag any regressor reaches.
    pub fn max_lag(&self) -> usize {
        let max = |m: &Array2<usize>| m.iter().copied().max().unwrap_or(0);
        let nb_nk = self
            .nb
            .iter()
            .zip(self.nk.iter())
            .map(|(b, k)| b + k)
            .max()
            .unwrap_or(0);
        max(&self.na)
            .max(nb_nk)
            .max(max(&self.nc))
            .max(max(&self.nd))
            .max(max(&self.nf))
    }

    /// Largest delay over all channels.
    pub fn max_delay(&self) -> usize {
        self.nk.iter().copied().max().unwrap_or(0)
    }

    /// Smallest sample count [`check_samples()`](Self::check_samples) accepts.
    pub fn min_samples(&self) -> usize {
        let by_lag = self.max_lag() + 1;
        let by_information = 2 * (self.nu + 2) + self.max_delay() * (self.nu + 1);
        by_lag.max(by_information)
    }

    /// Checks that `n` samples are enough for these orders.
    ///
    /// Rejects `n <= L` and `floor((n - max(nk) (nu + 1)) / (nu + 2)) <= 1`.
    ///
    /// # Errors
    ///
    /// [`PemError::InsufficientData`] carrying [`min_samples()`](Self::min_samples).
    pub fn check_samples(&self, n: usize) -> Result<(), PemError> {
        let spare = n as i64 - (self.max_delay() * (self.nu + 1)) as i64;
        let blocks = spare.div_euclid((self.nu + 2) as i64);
        if n <= self.max_lag() || blocks <= 1 {
            return Err(PemError::InsufficientData {
                n,
                min: self.min_samples(),
            });
        }
        Ok(())
    }

    /// Number of parameters estimated for output `j`.
    pub fn n_params_output(&self, j: usize) -> usize {
        let a: usize = self.na.row(j).sum();
        let b: usize = self.nb.row(j).iter().map(|nb| nb + 1).sum();
        let f: usize = self.nf.row(j).sum();
        a + b + self.nc(j) + self.nd(j) + f
    }

    /// Total number of parameters over all outputs.
    pub fn n_params(&self) -> usize {
        (0..self.ny).map(|j| self.n_params_output(j)).sum()
    }

    /// `true` when output `j` has any C, D or F coefficient.
    pub fn has_noise_model(&self, j: usize) -> bool {
        self.nc(j) > 0 || self.nd(j) > 0 || self.nf.row(j).iter().any(|&v| v > 0)
    }

    /// Classifies the orders into a named model family.
    pub fn structure(&self) -> Structure {
        let any = |m: &Array2<usize>| m.iter().any(|&v| v > 0);
        let (a, c, d, f) = (any(&self.na), any(&self.nc), any(&self.nd), any(&self.nf));
        match (a, c, d, f) {
            (false, false, false, false) => Structure::Fir,
            (true, false, false, false) => Structure::Arx,
            (_, true, false, false) => Structure::Armax,
            (false, false, false, true) => Structure::Oe,
            (false, _, _, true) => Structure::Bj,
            _ => Structure::General,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn empty_spec_is_zeros_in_role_shape() {
        let m = normalize(&OrderSpec::empty(), Role::Na, 2, 3).unwrap();
        assert_eq!(m, Array2::<usize>::zeros((2, 2)));
        let m = normalize(&OrderSpec::Matrix(vec![]), Role::Nf, 2, 3).unwrap();
        assert_eq!(m, Array2::<usize>::zeros((2, 3)));
        let m = normalize(&OrderSpec::empty(), Role::Nc, 2, 3).unwrap();
        assert_eq!(m.dim(), (2, 1));
    }

    #[test]
    fn scalar_is_one_by_one() {
        let m = normalize(&2.into(), Role::Na, 1, 1).unwrap();
        assert_eq!(m, array![[2]]);
        let err = normalize(&2.into(), Role::Na, 2, 1).unwrap_err();
        assert!(matches!(err, PemError::ShapeMismatch { role: "na", .. }));
    }

    #[test]
    fn scalar_delay_broadcasts() {
        let m = normalize(&1.into(), Role::Nk, 2, 3).unwrap();
        assert_eq!(m, Array2::from_elem((2, 3), 1));
    }

    #[test]
    fn list_is_row_for_input_roles() {
        let m = normalize(&vec![1, 2].into(), Role::Nb, 1, 2).unwrap();
        assert_eq!(m, array![[1, 2]]);
    }

    #[test]
    fn list_is_column_for_noise_roles() {
        let m = normalize(&vec![2, 1].into(), Role::Nc, 2, 1).unwrap();
        assert_eq!(m, array![[2], [1]]);
    }

    #[test]
    fn scalar_list_matrix_agree() {
        let scalar = normalize(&2.into(), Role::Na, 1, 1).unwrap();
        let list = normalize(&vec![2].into(), Role::Na, 1, 1).unwrap();
        let matrix = normalize(&[[2]].into(), Role::Na, 1, 1).unwrap();
        assert_eq!(scalar, list);
        assert_eq!(list, matrix);

        let list = normalize(&vec![1, 1].into(), Role::Nb, 1, 2).unwrap();
        let matrix = normalize(&array![[1, 1]].into(), Role::Nb, 1, 2).unwrap();
        assert_eq!(list, matrix);
    }

    #[test]
    fn ragged_matrix_rejected() {
        let spec = OrderSpec::Matrix(vec![vec![1, 2], vec![1]]);
        let err = normalize(&spec, Role::Nb, 2, 2).unwrap_err();
        assert!(matches!(err, PemError::RaggedOrders { role: "nb" }));
    }

    #[test]
    fn wrong_shape_reports_expected() {
        let err = normalize(&vec![1, 1, 1].into(), Role::Nb, 1, 2).unwrap_err();
        match err {
            PemError::ShapeMismatch {
                expected_rows,
                expected_cols,
                rows,
                cols,
                ..
            } => {
                assert_eq!((expected_rows, expected_cols), (1, 2));
                assert_eq!((rows, cols), (1, 3));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    fn siso_arx() -> Orders {
        OrderSet {
            na: 2.into(),
            nb: 1.into(),
            nk: 1.into(),
            ..OrderSet::default()
        }
        .normalize(1, 1)
        .unwrap()
    }

    #[test]
    fn derived_quantities_siso_arx() {
        let o = siso_arx();
        assert_eq!(o.max_lag(), 2);
        assert_eq!(o.n_params_output(0), 4);
        assert_eq!(o.n_params(), 4);
        // max(L + 1, 2 * 3 + 1 * 2) = 8
        assert_eq!(o.min_samples(), 8);
        assert_eq!(o.structure(), Structure::Arx);
        assert!(!o.has_noise_model(0));
    }

    #[test]
    fn sample_boundary() {
        let o = siso_arx();
        assert!(o.check_samples(o.max_lag()).is_err());
        assert!(o.check_samples(o.min_samples() - 1).is_err());
        assert!(o.check_samples(o.min_samples()).is_ok());
        match o.check_samples(3).unwrap_err() {
            PemError::InsufficientData { n, min } => {
                assert_eq!(n, 3);
                assert_eq!(min, 8);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn lag_bound_dominates_for_high_orders() {
        let o = OrderSet {
            na: 12.into(),
            nb: 0.into(),
            nk: 0.into(),
            ..OrderSet::default()
        }
        .normalize(1, 1)
        .unwrap();
        assert_eq!(o.min_samples(), 13);
        assert!(o.check_samples(12).is_err());
        assert!(o.check_samples(13).is_ok());
    }

    #[test]
    fn structure_classification() {
        let classify = |set: OrderSet| set.normalize(1, 1).unwrap().structure();
        assert_eq!(
            classify(OrderSet {
                nb: 2.into(),
                ..OrderSet::default()
            }),
            Structure::Fir
        );
        assert_eq!(
            classify(OrderSet {
                na: 2.into(),
                nb: 1.into(),
                nc: 1.into(),
                ..OrderSet::default()
            }),
            Structure::Armax
        );
        assert_eq!(
            classify(OrderSet {
                nb: 1.into(),
                nf: 2.into(),
                ..OrderSet::default()
            }),
            Structure::Oe
        );
        assert_eq!(
            classify(OrderSet {
                nb: 1.into(),
                nc: 2.into(),
                nd: 2.into(),
                nf: 2.into(),
                ..OrderSet::default()
            }),
            Structure::Bj
        );
        assert_eq!(
            classify(OrderSet {
                na: 1.into(),
                nb: 1.into(),
                nd: 1.into(),
                ..OrderSet::default()
            }),
            Structure::General
        );
    }

    #[test]
    fn mimo_parameter_count() {
        let o = OrderSet {
            na: [[2, 2], [2, 2]].into(),
            nb: [[1, 1], [1, 1]].into(),
            nc: vec![2, 2].into(),
            nk: 1.into(),
            ..OrderSet::default()
        }
        .normalize(2, 2)
        .unwrap();
        // 4 A + 4 B + 2 C per output
        assert_eq!(o.n_params_output(0), 10);
        assert_eq!(o.n_params(), 20);
        assert_eq!(o.max_lag(), 2);
        assert_eq!(o.min_samples(), 2 * 4 + 3);
    }

    #[test]
    fn structure_display() {
        assert_eq!(Structure::Armax.to_string(), "ARMAX");
        assert_eq!(Structure::General.to_string(), "general");
        assert!(Structure::Arx.is_equation_error());
        assert!(!Structure::Bj.is_equation_error());
    }
}
