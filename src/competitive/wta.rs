//! Hard winner-take-all competitive learning.
//!
//! `m` units compete for every observation `x` of length `n`. The winner is
//! `argmax(x · W + r)`: a linear match score plus a per-unit inhibitory bias.
//! When learning, the winner
//!
//! 1. lowers its own bias by `r_step`, so frequent winners lose ground,
//! 2. adds `w_step / sum(x)` to the weights of every active input line,
//! 3. renormalises its weight column under the configured [`Norm`].
//!
//! Over time the bias equalises how often each unit wins while the weights
//! drift towards the inputs the unit tends to win.
//!
//! # Example
//!
//! ```rust
//! use inclearn::competitive::{HardWta, WtaMethod};
//!
//! let mut wta = HardWta::new(16, 4, WtaMethod::HardWtaL2, 42)?;
//! let mut x = vec![0.0; 16];
//! x[3] = 1.0;
//! x[7] = 1.0;
//!
//! let k = wta.evaluate(&x, true)?;
//! assert!(k < 4);
//! assert!((wta.norm().of(wta.column(k)) - 1.0).abs() < 1e-9);
//! # Ok::<(), inclearn::LearnError>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{LearnError, Result};
use crate::kernel::{argmax, dot, rng, Norm};

/// Default Hebbian increment shared across the active inputs of one observation.
pub const DEFAULT_W_STEP: f64 = 0.0001;

/// Default bias decrement per win.
pub const DEFAULT_R_STEP: f64 = 1.0 / 1024.0 * 2.0;

/// How weight columns are seeded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Init {
    /// Uniform `[0, 1)` entries.
    Dense,
    /// Ones on the top `active` of `n` random scores, zeros elsewhere.
    SparseMask { active: usize },
}

/// The supported hard-WTA learning rules.
///
/// The variants differ only in norm and initialisation; the update rule is
/// shared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WtaMethod {
    /// Euclidean-normalised columns, dense random init.
    #[default]
    HardWtaL2,
    /// L1-normalised columns, sparse binary mask init.
    HardWtaL1,
    /// L1-normalised columns, dense random init.
    HardWtaZeroOrder,
}

impl WtaMethod {
    pub fn norm(self) -> Norm {
        match self {
            WtaMethod::HardWtaL2 => Norm::L2,
            WtaMethod::HardWtaL1 | WtaMethod::HardWtaZeroOrder => Norm::L1,
        }
    }

    /// Initialisation for `n` inputs. `active` overrides the sparse mask size
    /// (default `n / 5`, at least 1); dense methods ignore it.
    pub fn init(self, n: usize, active: Option<usize>) -> Init {
        match self {
            WtaMethod::HardWtaL1 => Init::SparseMask {
                active: active.unwrap_or((n / 5).max(1)),
            },
            WtaMethod::HardWtaL2 | WtaMethod::HardWtaZeroOrder => Init::Dense,
        }
    }
}

/// A layer of `m` hard-WTA units over `n` inputs.
#[derive(Clone, Debug)]
pub struct HardWta {
    n: usize,
    m: usize,
    norm: Norm,
    w_step: f64,
    r_step: f64,
    /// Column-major: weights[k * n .. (k + 1) * n] = weight vector of unit k.
    weights: Vec<f64>,
    bias: Vec<f64>,
}

impl HardWta {
    /// Create with default step sizes.
    pub fn new(n: usize, m: usize, method: WtaMethod, seed: u64) -> Result<Self> {
        Self::with_params(
            n,
            m,
            method.norm(),
            method.init(n, None),
            DEFAULT_W_STEP,
            DEFAULT_R_STEP,
            seed,
        )
    }

    /// Create with explicit parameters.
    ///
    /// - `norm`: column normalisation
    /// - `init`: dense or sparse-mask seeding
    /// - `w_step`: Hebbian increment, split across active inputs
    /// - `r_step`: bias decrement per win
    /// - `seed`: seed for the initial weights
    pub fn with_params(
        n: usize,
        m: usize,
        norm: Norm,
        init: Init,
        w_step: f64,
        r_step: f64,
        seed: u64,
    ) -> Result<Self> {
        let mut rng = rng::seeded(seed);
        let weights = match init {
            Init::Dense => rng::uniform(&mut rng, n * m),
            Init::SparseMask { active } => {
                if active == 0 || active > n {
                    return Err(LearnError::invalid_config(format!(
                        "sparse mask needs 1..={} active inputs, got {}",
                        n, active
                    )));
                }
                let mut w = vec![0.0; n * m];
                for k in 0..m {
                    let q = rng::uniform(&mut rng, n);
                    for i in rng::top_indices(&q, active) {
                        w[k * n + i] = 1.0;
                    }
                }
                w
            }
        };
        log::debug!(
            "hard WTA: n={} m={} l{} {:?} w_step={} r_step={}",
            n,
            m,
            norm.order(),
            init,
            w_step,
            r_step
        );
        Self::with_weights(n, m, norm, weights, w_step, r_step)
    }

    /// Create from explicit column-major weights (normalised here).
    pub fn with_weights(
        n: usize,
        m: usize,
        norm: Norm,
        mut weights: Vec<f64>,
        w_step: f64,
        r_step: f64,
    ) -> Result<Self> {
        if n == 0 || m == 0 {
            return Err(LearnError::invalid_config(format!(
                "need at least one input and one unit, got n={} m={}",
                n, m
            )));
        }
        LearnError::check_dim(n * m, weights.len())?;
        for column in weights.chunks_mut(n) {
            norm.normalize(column)?;
        }
        Ok(Self {
            n,
            m,
            norm,
            w_step,
            r_step,
            weights,
            bias: vec![0.0; m],
        })
    }

    // --- Accessors ---

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn m(&self) -> usize {
        self.m
    }

    pub fn norm(&self) -> Norm {
        self.norm
    }

    /// All weights, column-major.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Weight vector of unit `k`.
    ///
    /// # Panics
    /// Panics if `k >= m`.
    pub fn column(&self, k: usize) -> &[f64] {
        &self.weights[k * self.n..(k + 1) * self.n]
    }

    /// Inhibitory bias of every unit.
    pub fn bias(&self) -> &[f64] {
        &self.bias
    }

    // --- Core methods ---

    /// Match score `x · W[:, k] + r[k]` for every unit.
    pub fn scores(&self, x: &[f64]) -> Result<Vec<f64>> {
        LearnError::check_dim(self.n, x.len())?;
        Ok(self
            .weights
            .chunks(self.n)
            .zip(self.bias.iter())
            .map(|(column, r)| dot(x, column) + r)
            .collect())
    }

    /// Winning unit without learning. Ties go to the lowest index.
    pub fn winner(&self, x: &[f64]) -> Result<usize> {
        let scores = self.scores(x)?;
        argmax(&scores).ok_or_else(|| LearnError::degenerate("every unit scored NaN"))
    }

    /// Select the winner for `x` and, if `learn`, update it.
    ///
    /// On error the layer is left exactly as it was.
    pub fn evaluate(&mut self, x: &[f64], learn: bool) -> Result<usize> {
        let k = self.winner(x)?;
        if learn {
            self.learn(x, k)?;
        }
        Ok(k)
    }

    fn learn(&mut self, x: &[f64], k: usize) -> Result<()> {
        let n = self.n;
        let mut column = self.weights[k * n..(k + 1) * n].to_vec();

        if x.iter().any(|&v| v != 0.0) {
            let activity: f64 = x.iter().sum();
            if !(activity > 0.0) {
                return Err(LearnError::degenerate(format!(
                    "input activity {} cannot scale the Hebbian step",
                    activity
                )));
            }
            let inc = self.w_step / activity;
            for (w, &xi) in column.iter_mut().zip(x.iter()) {
                if xi != 0.0 {
                    *w += inc;
                }
            }
        }
        self.norm.normalize(&mut column)?;

        self.weights[k * n..(k + 1) * n].copy_from_slice(&column);
        self.bias[k] -= self.r_step;
        log::trace!("unit {} won, bias now {}", k, self.bias[k]);
        Ok(())
    }
}
