//! Vector norms and the small dense helpers every estimator shares.

use serde::{Deserialize, Serialize};

use crate::error::{LearnError, Result};

/// Norms below this are treated as zero when renormalising.
pub const NORM_EPS: f64 = 1e-12;

/// Norm used to keep weight columns on the unit sphere (L2) or simplex (L1).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Norm {
    /// Sum of absolute entries.
    ///
    /// For the non-negative columns the learning rules produce this equals
    /// the plain sum of entries. Columns given through `with_weights` may hold
    /// negative entries, and those count by magnitude here, so a column with
    /// mixed signs is not scaled to a signed sum of 1.
    L1,
    /// Euclidean length
    #[default]
    L2,
}

impl Norm {
    /// Map a numeric norm order onto a supported norm.
    pub fn from_order(order: u32) -> Result<Self> {
        match order {
            1 => Ok(Norm::L1),
            2 => Ok(Norm::L2),
            other => Err(LearnError::UnsupportedNorm(other)),
        }
    }

    pub fn order(self) -> u32 {
        match self {
            Norm::L1 => 1,
            Norm::L2 => 2,
        }
    }

    /// Compute the norm of `v`.
    pub fn of(self, v: &[f64]) -> f64 {
        match self {
            Norm::L1 => v.iter().map(|x| x.abs()).sum(),
            Norm::L2 => l2(v),
        }
    }

    /// Scale `v` in place so that `self.of(v) == 1`.
    ///
    /// Returns the norm before scaling. Leaves `v` untouched and fails with
    /// [`LearnError::DegenerateNorm`] if that norm is below [`NORM_EPS`].
    pub fn normalize(self, v: &mut [f64]) -> Result<f64> {
        let n = self.of(v);
        if !n.is_finite() || n < NORM_EPS {
            log::warn!("refusing to renormalise: l{} norm is {}", self.order(), n);
            return Err(LearnError::degenerate(format!(
                "l{} norm {} is too small to divide by",
                self.order(),
                n
            )));
        }
        for x in v.iter_mut() {
            *x /= n;
        }
        Ok(n)
    }
}

/// Inner product.
///
/// Callers validate lengths; a mismatch here is a bug.
#[inline]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "Dimension mismatch in dot product");
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Euclidean norm.
#[inline]
pub fn l2(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Index of the first maximum. `None` for an empty slice.
///
/// NaN entries never win.
pub fn argmax(v: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &x) in v.iter().enumerate() {
        match best {
            Some((_, b)) if x <= b || x.is_nan() => {}
            _ if x.is_nan() => {}
            _ => best = Some((i, x)),
        }
    }
    best.map(|(i, _)| i)
}
