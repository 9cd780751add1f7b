//! Streaming centering and differencing stages.
//!
//! Each stage consumes one observation row per call and returns the
//! transformed row, ready to be fed to an [`IncrementalEigen`] tracker.
//!
//! - [`RunningMean`]: exact running average, `x - mean(x_1..x_n)`
//! - [`MovingAverageMean`]: exponential moving average, tracks drifting data
//! - [`DiscreteDerivative`]: `x_t - x_{t-1}`
//!
//! [`IncrementalEigen`]: super::IncrementalEigen

use crate::error::{LearnError, Result};
use crate::kernel::Constant;

/// Exact running mean.
///
/// Feeding `N` rows one at a time leaves `mean()` equal to the batch mean of
/// those rows.
#[derive(Clone, Debug)]
pub struct RunningMean {
    mu: Vec<f64>,
    n: usize,
}

impl RunningMean {
    pub fn new(dim: usize) -> Self {
        Self {
            mu: vec![0.0; dim],
            n: 0,
        }
    }

    pub fn dim(&self) -> usize {
        self.mu.len()
    }

    pub fn count(&self) -> usize {
        self.n
    }

    pub fn mean(&self) -> &[f64] {
        &self.mu
    }

    /// Fold `x` into the mean and return `x - mean`.
    pub fn update(&mut self, x: &[f64]) -> Result<Vec<f64>> {
        LearnError::check_dim(self.dim(), x.len())?;
        let n = self.n as f64;
        for (m, &xi) in self.mu.iter_mut().zip(x.iter()) {
            *m = (n * *m + xi) / (n + 1.0);
        }
        self.n += 1;
        Ok(x.iter().zip(self.mu.iter()).map(|(xi, m)| xi - m).collect())
    }

    /// Row-by-row [`update`](Self::update).
    pub fn update_batch(&mut self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        rows.iter().map(|x| self.update(x)).collect()
    }
}

/// Exponential moving-average mean: `mu = (1 - eps) * mu + eps * x`.
#[derive(Clone, Debug)]
pub struct MovingAverageMean {
    mu: Vec<f64>,
    rate: Constant,
}

impl MovingAverageMean {
    /// `epsilon` must lie in `(0, 1]`.
    pub fn new(dim: usize, epsilon: f64) -> Result<Self> {
        Ok(Self {
            mu: vec![0.0; dim],
            rate: Constant::new(epsilon)?,
        })
    }

    pub fn dim(&self) -> usize {
        self.mu.len()
    }

    pub fn epsilon(&self) -> f64 {
        self.rate.epsilon()
    }

    pub fn mean(&self) -> &[f64] {
        &self.mu
    }

    /// Fold `x` into the average and return `x - mean`.
    pub fn update(&mut self, x: &[f64]) -> Result<Vec<f64>> {
        LearnError::check_dim(self.dim(), x.len())?;
        let eps = self.rate.step_by(1);
        for (m, &xi) in self.mu.iter_mut().zip(x.iter()) {
            *m = (1.0 - eps) * *m + eps * xi;
        }
        Ok(x.iter().zip(self.mu.iter()).map(|(xi, m)| xi - m).collect())
    }

    pub fn update_batch(&mut self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        rows.iter().map(|x| self.update(x)).collect()
    }
}

/// First difference of a stream. The row before the first is taken as zero.
#[derive(Clone, Debug)]
pub struct DiscreteDerivative {
    prev: Vec<f64>,
}

impl DiscreteDerivative {
    pub fn new(dim: usize) -> Self {
        Self {
            prev: vec![0.0; dim],
        }
    }

    pub fn dim(&self) -> usize {
        self.prev.len()
    }

    /// Return `x - prev` and remember `x`.
    pub fn update(&mut self, x: &[f64]) -> Result<Vec<f64>> {
        LearnError::check_dim(self.dim(), x.len())?;
        let d = x.iter().zip(self.prev.iter()).map(|(xi, p)| xi - p).collect();
        self.prev.copy_from_slice(x);
        Ok(d)
    }

    pub fn update_batch(&mut self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        rows.iter().map(|x| self.update(x)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_mean_matches_batch_mean() {
        let rows: Vec<Vec<f64>> = (0..50)
            .map(|i| {
                let t = i as f64;
                vec![t, (t * 0.3).sin(), 2.0 - t * 0.1]
            })
            .collect();
        let mut rm = RunningMean::new(3);
        rm.update_batch(&rows).unwrap();

        for d in 0..3 {
            let batch = rows.iter().map(|r| r[d]).sum::<f64>() / rows.len() as f64;
            assert!((rm.mean()[d] - batch).abs() < 1e-10);
        }
        assert_eq!(rm.count(), 50);
    }

    #[test]
    fn test_running_mean_centers_with_updated_mean() {
        let mut rm = RunningMean::new(2);
        let c = rm.update(&[2.0, 4.0]).unwrap();
        assert_eq!(c, vec![0.0, 0.0]);
        let c = rm.update(&[4.0, 0.0]).unwrap();
        assert_eq!(c, vec![1.0, -2.0]);
    }

    #[test]
    fn test_moving_average() {
        let mut ma = MovingAverageMean::new(1, 0.5).unwrap();
        let c = ma.update(&[2.0]).unwrap();
        assert_eq!(ma.mean(), &[1.0]);
        assert_eq!(c, vec![1.0]);
        ma.update(&[2.0]).unwrap();
        assert_eq!(ma.mean(), &[1.5]);
        assert!(MovingAverageMean::new(1, 0.0).is_err());
    }

    #[test]
    fn test_moving_average_tracks_shift() {
        let mut ma = MovingAverageMean::new(1, 0.1).unwrap();
        for _ in 0..200 {
            ma.update(&[1.0]).unwrap();
        }
        for _ in 0..200 {
            ma.update(&[5.0]).unwrap();
        }
        assert!((ma.mean()[0] - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_derivative() {
        let mut dd = DiscreteDerivative::new(2);
        assert_eq!(dd.update(&[1.0, 2.0]).unwrap(), vec![1.0, 2.0]);
        assert_eq!(dd.update(&[4.0, 1.0]).unwrap(), vec![3.0, -1.0]);
    }

    #[test]
    fn test_shape_is_checked() {
        let mut rm = RunningMean::new(3);
        assert!(matches!(
            rm.update(&[1.0, 2.0]),
            Err(LearnError::DimensionMismatch { expected: 3, got: 2 })
        ));
        assert_eq!(rm.count(), 0);
        let mut dd = DiscreteDerivative::new(3);
        assert!(dd.update(&[1.0; 4]).is_err());
    }
}
