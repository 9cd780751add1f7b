//! Incremental principal / minor component tracking.
//!
//! Follows `k` unit vectors and their magnitudes through a stream of
//! centered observations. Each update walks the components in order:
//!
//! ```text
//! v' = (1 - e) v + e (x·v / d) x      Oja-style Hebbian step
//! d' = |v'|,  v' = v' / d'            magnitude becomes the eigenvalue proxy
//! x  = x - (x·v') v'                  deflate before the next component
//! ```
//!
//! Deflation keeps the tracked vectors orthogonal: component `j + 1` only
//! ever sees the part of `x` that components `0..=j` do not explain, so the
//! order of updates within one call matters.
//!
//! The step size `e` comes from the [`Schedule`] injected at construction
//! and advances once per observation.
//!
//! # Usage
//!
//! ```rust
//! use inclearn::incremental::{IncrementalEigen, Kind};
//! use inclearn::kernel::Schedule;
//!
//! let mut pca = IncrementalEigen::new(4, 1, Kind::Principal, Schedule::amnesic(), 42)?;
//! for t in 0..500 {
//!     let s = (t as f64 * 0.1 + 0.5).sin();
//!     pca.update(&[3.0 * s, 3.0 * s, 0.1 * s, 0.0])?;
//! }
//! let v = pca.eigenvector(0);
//! assert!((v[0].abs() - v[1].abs()).abs() < 1e-3);
//! # Ok::<(), inclearn::LearnError>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{LearnError, Result};
use crate::kernel::{dot, l2, rng, Norm, Schedule, NORM_EPS};

/// Relative size below which a deflated residual counts as fully explained.
const RESIDUAL_TOL: f64 = 1e-8;

/// Which end of the spectrum a tracker is meant to follow.
///
/// Both kinds currently run the identical update rule; see [`Kind::Minor`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    /// Leading eigenvectors (largest variance).
    #[default]
    Principal,
    /// Trailing eigenvectors (smallest variance).
    ///
    /// The update is the same Hebbian step as [`Kind::Principal`], with the
    /// same sign, so in practice this tracks the leading subspace too. An
    /// anti-Hebbian sign would be needed to follow the minor components.
    Minor,
}

/// Streaming eigen-tracker with sequential deflation.
#[derive(Clone, Debug)]
pub struct IncrementalEigen {
    dim: usize,
    k: usize,
    kind: Kind,
    /// Row-major: vectors[j * dim .. (j + 1) * dim] = component j, unit norm.
    vectors: Vec<f64>,
    values: Vec<f64>,
    schedule: Schedule,
    n: usize,
}

impl IncrementalEigen {
    /// Create a tracker for `k` components of `dim`-dimensional data.
    ///
    /// Vectors start as normalised uniform random draws and magnitudes as
    /// `1 + 0.1 * N(0, 1)`, both from `seed`.
    pub fn new(dim: usize, k: usize, kind: Kind, schedule: Schedule, seed: u64) -> Result<Self> {
        if dim == 0 || k == 0 || k > dim {
            return Err(LearnError::invalid_config(format!(
                "need 1 <= k <= dim, got k={} dim={}",
                k, dim
            )));
        }
        let mut rng = rng::seeded(seed);
        let mut vectors = rng::uniform(&mut rng, dim * k);
        for v in vectors.chunks_mut(dim) {
            Norm::L2.normalize(v)?;
        }
        let values = rng::normal(&mut rng, k, 1.0, 0.1);
        log::debug!(
            "incremental {:?} tracker: dim={} k={} schedule={:?}",
            kind,
            dim,
            k,
            schedule
        );
        Ok(Self {
            dim,
            k,
            kind,
            vectors,
            values,
            schedule,
            n: 0,
        })
    }

    // --- Accessors ---

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn samples_seen(&self) -> usize {
        self.n
    }

    /// Component `j` as a unit vector.
    ///
    /// # Panics
    /// Panics if `j >= k`.
    pub fn eigenvector(&self, j: usize) -> &[f64] {
        &self.vectors[j * self.dim..(j + 1) * self.dim]
    }

    /// All components, row-major (`k` rows of length `dim`).
    pub fn eigenvectors(&self) -> &[f64] {
        &self.vectors
    }

    /// Magnitude estimates, one per component.
    pub fn eigenvalues(&self) -> &[f64] {
        &self.values
    }

    // --- Core methods ---

    /// Fold one centered observation into the estimates.
    ///
    /// Components whose deflated residual is already zero keep their
    /// previous state; this is what happens to trailing components on a
    /// step of size 1, such as the first step of an amnesic or
    /// inverse-count schedule. Any other collapse to a zero vector is an
    /// error. On error nothing changes, including the schedule.
    pub fn update(&mut self, x: &[f64]) -> Result<()> {
        LearnError::check_dim(self.dim, x.len())?;

        let mut schedule = self.schedule;
        let e = schedule.step();
        let mut x = x.to_vec();
        let mut vectors = self.vectors.clone();
        let mut values = self.values.clone();

        let scale = l2(&x);
        for (j, (v, d)) in vectors
            .chunks_mut(self.dim)
            .zip(values.iter_mut())
            .enumerate()
        {
            if !(d.abs() >= NORM_EPS) {
                return Err(LearnError::degenerate(format!(
                    "component {} magnitude {} is too small to divide by",
                    j, d
                )));
            }
            let gain = e * dot(&x, v) / *d;
            let next: Vec<f64> = v
                .iter()
                .zip(x.iter())
                .map(|(&vi, &xi)| (1.0 - e) * vi + gain * xi)
                .collect();
            let len = l2(&next);
            if !(len >= NORM_EPS) {
                // Earlier components explained all of x; nothing left for this one or the rest.
                if l2(&x) <= NORM_EPS.max(scale * RESIDUAL_TOL) {
                    break;
                }
                log::warn!("component {} collapsed to length {}", j, len);
                return Err(LearnError::degenerate(format!(
                    "component {} collapsed to length {}",
                    j, len
                )));
            }
            for (vi, ni) in v.iter_mut().zip(next) {
                *vi = ni / len;
            }
            *d = len;

            let proj = dot(&x, v);
            for (xi, &vi) in x.iter_mut().zip(v.iter()) {
                *xi -= proj * vi;
            }
        }

        self.vectors = vectors;
        self.values = values;
        self.schedule = schedule;
        self.n += 1;
        log::trace!("eigen update {}: e={} values={:?}", self.n, e, self.values);
        Ok(())
    }

    /// Row-by-row [`update`](Self::update).
    pub fn update_batch(&mut self, rows: &[Vec<f64>]) -> Result<()> {
        for x in rows {
            self.update(x)?;
        }
        Ok(())
    }

    /// Coefficients of `x` on each tracked component.
    pub fn project(&self, x: &[f64]) -> Result<Vec<f64>> {
        LearnError::check_dim(self.dim, x.len())?;
        Ok(self.vectors.chunks(self.dim).map(|v| dot(x, v)).collect())
    }

    /// Reconstruct `x` from its projection onto the tracked components.
    pub fn reconstruct(&self, x: &[f64]) -> Result<Vec<f64>> {
        let coeffs = self.project(x)?;
        let mut out = vec![0.0; self.dim];
        for (c, v) in coeffs.iter().zip(self.vectors.chunks(self.dim)) {
            for (o, &vi) in out.iter_mut().zip(v.iter()) {
                *o += c * vi;
            }
        }
        Ok(out)
    }

    /// Length of what remains of `x` after deflating through every component.
    pub fn residual(&self, x: &[f64]) -> Result<f64> {
        LearnError::check_dim(self.dim, x.len())?;
        let mut x = x.to_vec();
        for v in self.vectors.chunks(self.dim) {
            let proj = dot(&x, v);
            for (xi, &vi) in x.iter_mut().zip(v.iter()) {
                *xi -= proj * vi;
            }
        }
        Ok(l2(&x))
    }

    /// Modified Gram-Schmidt over the components, in order, back to unit norm.
    ///
    /// Magnitudes are left as they are.
    pub fn reorthogonalize(&mut self) -> Result<()> {
        let dim = self.dim;
        let mut vectors = self.vectors.clone();
        for i in 0..self.k {
            let (done, rest) = vectors.split_at_mut(i * dim);
            let vi = &mut rest[..dim];
            for vj in done.chunks(dim) {
                let proj = dot(vi, vj);
                for (a, &b) in vi.iter_mut().zip(vj.iter()) {
                    *a -= proj * b;
                }
            }
            Norm::L2.normalize(vi)?;
        }
        self.vectors = vectors;
        Ok(())
    }
}
