//! Batch centering, covariance and eigendecomposition.
//!
//! Observations are the rows of an `n x d` [`DMatrix`]. Eigenvectors are
//! always returned as the columns of a `d x k` matrix, paired with a
//! length-`k` vector of eigenvalues.

use nalgebra::{DMatrix, DVector, SymmetricEigen};
use serde::{Deserialize, Serialize};

use crate::error::{LearnError, Result};
use crate::kernel::NORM_EPS;

/// Eigenvalues at or below this are dropped by [`Truncation::default`].
pub const DEFAULT_CUTOFF: f64 = 1e-8;

/// Stack equal-length rows into an `n x d` matrix.
pub fn from_rows(rows: &[Vec<f64>]) -> Result<DMatrix<f64>> {
    let first = rows
        .first()
        .ok_or_else(|| LearnError::empty("no rows to stack"))?;
    let d = first.len();
    let mut data = Vec::with_capacity(rows.len() * d);
    for row in rows {
        LearnError::check_dim(d, row.len())?;
        data.extend_from_slice(row);
    }
    Ok(DMatrix::from_row_slice(rows.len(), d, &data))
}

/// Column means, fitted once and subtracted from later batches.
#[derive(Clone, Debug, PartialEq)]
pub struct DeMean {
    mean: DVector<f64>,
}

impl DeMean {
    pub fn fit(x: &DMatrix<f64>) -> Result<Self> {
        if x.nrows() == 0 {
            return Err(LearnError::empty("cannot fit a mean to zero rows"));
        }
        let mean = DVector::from_fn(x.ncols(), |c, _| x.column(c).mean());
        Ok(Self { mean })
    }

    pub fn mean(&self) -> &DVector<f64> {
        &self.mean
    }

    pub fn transform(&self, x: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        LearnError::check_dim(self.mean.len(), x.ncols())?;
        Ok(DMatrix::from_fn(x.nrows(), x.ncols(), |r, c| {
            x[(r, c)] - self.mean[c]
        }))
    }
}

/// Per-column scaling to unit (population) standard deviation.
#[derive(Clone, Debug, PartialEq)]
pub struct NormaliseStd {
    std: DVector<f64>,
}

impl NormaliseStd {
    /// A constant column is rejected.
    pub fn fit(x: &DMatrix<f64>) -> Result<Self> {
        let n = x.nrows();
        if n == 0 {
            return Err(LearnError::empty("cannot fit a deviation to zero rows"));
        }
        let mut std = DVector::zeros(x.ncols());
        for c in 0..x.ncols() {
            let col = x.column(c);
            let mu = col.mean();
            let var = col.iter().map(|v| (v - mu) * (v - mu)).sum::<f64>() / n as f64;
            let s = var.sqrt();
            if !(s >= NORM_EPS) {
                log::warn!("column {} has standard deviation {}", c, s);
                return Err(LearnError::degenerate(format!(
                    "column {} has standard deviation {}",
                    c, s
                )));
            }
            std[c] = s;
        }
        Ok(Self { std })
    }

    pub fn std(&self) -> &DVector<f64> {
        &self.std
    }

    pub fn transform(&self, x: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        LearnError::check_dim(self.std.len(), x.ncols())?;
        Ok(DMatrix::from_fn(x.nrows(), x.ncols(), |r, c| {
            x[(r, c)] / self.std[c]
        }))
    }
}

/// `xᵀx / (n - 1)`. Expects centered rows.
pub fn covariance(x: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    let n = x.nrows();
    if n < 2 {
        return Err(LearnError::empty(format!(
            "covariance needs at least 2 rows, got {}",
            n
        )));
    }
    Ok(x.transpose() * x / (n - 1) as f64)
}

/// Eigenvalues with their eigenvectors as matrix columns.
#[derive(Clone, Debug, PartialEq)]
pub struct EigenPairs {
    pub values: DVector<f64>,
    pub vectors: DMatrix<f64>,
}

impl EigenPairs {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Keep the pairs at `order`, in that order.
    pub fn select(&self, order: &[usize]) -> Self {
        let values = DVector::from_iterator(order.len(), order.iter().map(|&i| self.values[i]));
        let vectors = DMatrix::from_fn(self.vectors.nrows(), order.len(), |r, c| {
            self.vectors[(r, order[c])]
        });
        Self { values, vectors }
    }

    pub fn sort_ascending(&self) -> Self {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by(|&a, &b| {
            self.values[a]
                .partial_cmp(&self.values[b])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        self.select(&order)
    }

    pub fn sort_descending(&self) -> Self {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by(|&a, &b| {
            self.values[b]
                .partial_cmp(&self.values[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        self.select(&order)
    }
}

/// Symmetric eigendecomposition of the covariance of centered rows,
/// ascending by eigenvalue.
pub fn pca(x: &DMatrix<f64>) -> Result<EigenPairs> {
    let cov = covariance(x)?;
    let eigen = SymmetricEigen::new(cov);
    if eigen.eigenvalues.iter().any(|v| !v.is_finite()) {
        return Err(LearnError::Linalg(
            "eigendecomposition produced non-finite eigenvalues".to_string(),
        ));
    }
    let pairs = EigenPairs {
        values: eigen.eigenvalues,
        vectors: eigen.eigenvectors,
    };
    Ok(pairs.sort_ascending())
}

/// How many eigenpairs survive into a whitening matrix.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Truncation {
    /// Keep everything, in the order given.
    None,
    /// Keep eigenvalues strictly above the cutoff, sorted descending.
    Cutoff(f64),
    /// Sort descending and keep the first `k`.
    RetainK(usize),
}

impl Default for Truncation {
    fn default() -> Self {
        Truncation::Cutoff(DEFAULT_CUTOFF)
    }
}

impl Truncation {
    pub fn apply(&self, pairs: &EigenPairs) -> EigenPairs {
        match *self {
            Truncation::None => pairs.clone(),
            Truncation::Cutoff(t) => {
                let keep: Vec<usize> = (0..pairs.len()).filter(|&i| pairs.values[i] > t).collect();
                pairs.select(&keep).sort_descending()
            }
            Truncation::RetainK(k) => {
                let sorted = pairs.sort_descending();
                let keep: Vec<usize> = (0..k.min(sorted.len())).collect();
                sorted.select(&keep)
            }
        }
    }
}

/// `d x k` matrix that maps centered rows to unit-variance, decorrelated
/// coordinates: each kept eigenvector divided by the root of its eigenvalue.
pub fn whitening_transformation(x: &DMatrix<f64>, truncation: Truncation) -> Result<DMatrix<f64>> {
    let pairs = truncation.apply(&pca(x)?);
    if pairs.is_empty() {
        return Err(LearnError::empty("truncation kept no eigenvalues"));
    }
    if let Some(bad) = pairs.values.iter().find(|&&v| !(v > 0.0)) {
        log::warn!("cannot whiten with eigenvalue {}", bad);
        return Err(LearnError::degenerate(format!(
            "eigenvalue {} is not positive; use a truncation that drops it",
            bad
        )));
    }
    let mut w = pairs.vectors;
    for (mut col, &v) in w.column_iter_mut().zip(pairs.values.iter()) {
        col /= v.sqrt();
    }
    Ok(w)
}
