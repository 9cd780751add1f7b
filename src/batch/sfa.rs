//! Slow feature analysis.
//!
//! Whiten the signal, then find the directions in which the whitened signal
//! changes least from one row to the next. The rotation is the eigenbasis
//! of the covariance of the discrete derivative, ascending, so output
//! column 0 is the slowest feature.

use nalgebra::{DMatrix, DVector};

use super::pca::{pca, Truncation};
use super::whitening::PcaWhitening;
use crate::error::{LearnError, Result};

/// Row differences `x[t + 1] - x[t]`. Needs at least two rows.
pub fn discrete_derivative(x: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    let n = x.nrows();
    if n < 2 {
        return Err(LearnError::empty(format!(
            "derivative needs at least 2 rows, got {}",
            n
        )));
    }
    Ok(DMatrix::from_fn(n - 1, x.ncols(), |r, c| {
        x[(r + 1, c)] - x[(r, c)]
    }))
}

/// Per row: every pairwise product `x_i * x_j` (row-major over `i, j`)
/// followed by the row itself, `d * d + d` columns in all.
pub fn quadratic_expansion(x: &DMatrix<f64>) -> DMatrix<f64> {
    let d = x.ncols();
    DMatrix::from_fn(x.nrows(), d * d + d, |r, c| {
        if c < d * d {
            x[(r, c / d)] * x[(r, c % d)]
        } else {
            x[(r, c - d * d)]
        }
    })
}

/// Linear slow feature analysis.
#[derive(Clone, Debug)]
pub struct Sfa {
    whitening: PcaWhitening,
    rotation: DMatrix<f64>,
    slowness: DVector<f64>,
}

impl Sfa {
    pub fn fit(x: &DMatrix<f64>, truncation: Truncation) -> Result<Self> {
        let whitening = PcaWhitening::fit(x, truncation)?;
        let white = whitening.transform(x)?;
        let pairs = pca(&discrete_derivative(&white)?)?;
        log::info!(
            "sfa fitted on {} samples: {} features, slowest derivative variance {:?}",
            x.nrows(),
            pairs.len(),
            pairs.values.iter().next()
        );
        Ok(Self {
            whitening,
            rotation: pairs.vectors,
            slowness: pairs.values,
        })
    }

    /// Features for each row, slowest first.
    pub fn transform(&self, x: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        Ok(self.whitening.transform(x)? * &self.rotation)
    }

    pub fn whitening(&self) -> &PcaWhitening {
        &self.whitening
    }

    /// Rotation applied after whitening; columns are features.
    pub fn rotation(&self) -> &DMatrix<f64> {
        &self.rotation
    }

    /// Derivative variance of each feature, ascending.
    pub fn slowness(&self) -> &DVector<f64> {
        &self.slowness
    }
}

/// Quadratic slow feature analysis: [`Sfa`] on the [`quadratic_expansion`].
///
/// The expansion repeats every cross term, so its covariance is rank
/// deficient; a truncation that drops near-zero eigenvalues is required.
#[derive(Clone, Debug)]
pub struct Sfa2 {
    sfa: Sfa,
}

impl Sfa2 {
    pub fn fit(x: &DMatrix<f64>, truncation: Truncation) -> Result<Self> {
        let sfa = Sfa::fit(&quadratic_expansion(x), truncation)?;
        Ok(Self { sfa })
    }

    pub fn transform(&self, x: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        self.sfa.transform(&quadratic_expansion(x))
    }

    pub fn inner(&self) -> &Sfa {
        &self.sfa
    }
}
