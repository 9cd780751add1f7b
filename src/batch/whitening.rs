use nalgebra::DMatrix;

use super::pca::{whitening_transformation, DeMean, Truncation};
use crate::error::Result;

/// Fitted centering plus PCA whitening.
///
/// After [`fit`](Self::fit) on `x`, `transform(x)` has zero mean and an
/// identity covariance over the retained components.
#[derive(Clone, Debug)]
pub struct PcaWhitening {
    de_mean: DeMean,
    matrix: DMatrix<f64>,
}

impl PcaWhitening {
    pub fn fit(x: &DMatrix<f64>, truncation: Truncation) -> Result<Self> {
        let de_mean = DeMean::fit(x)?;
        let centered = de_mean.transform(x)?;
        let matrix = whitening_transformation(&centered, truncation)?;
        log::info!(
            "pca whitening fitted on {} samples: kept {} of {} components ({:?})",
            x.nrows(),
            matrix.ncols(),
            x.ncols(),
            truncation
        );
        Ok(Self { de_mean, matrix })
    }

    pub fn transform(&self, x: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        Ok(self.de_mean.transform(x)? * &self.matrix)
    }

    /// `d x k` whitening matrix applied after centering.
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    pub fn de_mean(&self) -> &DeMean {
        &self.de_mean
    }

    pub fn input_dim(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn output_dim(&self) -> usize {
        self.matrix.ncols()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::pca::covariance;
    use crate::kernel::rng;

    #[test]
    fn test_identity_covariance() {
        let mut r = rng::seeded(11);
        let noise = rng::normal(&mut r, 3 * 400, 0.0, 1.0);
        // correlated, shifted, anisotropic
        let x = DMatrix::from_fn(400, 3, |i, c| {
            let a = noise[i * 3];
            let b = noise[i * 3 + 1];
            let e = noise[i * 3 + 2];
            match c {
                0 => 10.0 + 3.0 * a,
                1 => -2.0 + 3.0 * a + 0.5 * b,
                _ => 0.2 * e + b,
            }
        });
        let w = PcaWhitening::fit(&x, Truncation::default()).unwrap();
        assert_eq!(w.output_dim(), 3);
        let y = w.transform(&x).unwrap();
        let c = covariance(&y).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((c[(i, j)] - expected).abs() < 1e-8);
            }
            assert!(y.column(i).mean().abs() < 1e-10);
        }
    }

    #[test]
    fn test_retain_k_reduces_dim() {
        let x = DMatrix::from_fn(50, 4, |i, c| ((i * (c + 1)) as f64 * 0.37).sin());
        let w = PcaWhitening::fit(&x, Truncation::RetainK(2)).unwrap();
        assert_eq!(w.input_dim(), 4);
        assert_eq!(w.transform(&x).unwrap().ncols(), 2);
        assert!(w.transform(&DMatrix::zeros(3, 5)).is_err());
    }
}
