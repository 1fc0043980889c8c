//! Positions of each polynomial's coefficients inside one output's θ.
//!
//! Per output `j` the order is `[A_j0 .. A_j(ny-1)][B_j0 .. B_j(nu-1)][C_j][D_j][F_j0 .. F_j(nu-1)]`,
//! each block in ascending lag. Both the regressor builder and model
//! assembly walk θ through this layout.

use std::ops::Range;

use crate::orders::Orders;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ChannelLayout {
    pub(crate) a: Vec<Range<usize>>,
    pub(crate) b: Vec<Range<usize>>,
    pub(crate) c: Range<usize>,
    pub(crate) d: Range<usize>,
    pub(crate) f: Vec<Range<usize>>,
    len: usize,
}

impl ChannelLayout {
    pub(crate) fn new(orders: &Orders, j: usize) -> Self {
        let mut next = 0;
        let mut take = |width: usize| {
            let range = next..next + width;
            next += width;
            range
        };
        let a = (0..orders.ny()).map(|k| take(orders.na(j, k))).collect();
        let b = (0..orders.nu()).map(|i| take(orders.nb(j, i) + 1)).collect();
        let c = take(orders.nc(j));
        let d = take(orders.nd(j));
        let f = (0..orders.nu()).map(|i| take(orders.nf(j, i))).collect();
        Self {
            a,
            b,
            c,
            d,
            f,
            len: next,
        }
    }

    /// Number of parameters of this output.
    pub(crate) fn len(&self) -> usize {
        self.len
    }
}
