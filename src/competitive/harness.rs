//! Driving loop for competitive learning experiments.
//!
//! Observations arrive as already-materialised rows of intensities in
//! `[0, 1]` (image patches, sensor frames, ...). A [`Binarize`] policy turns
//! each row into an indicator vector, a [`Trainer`] feeds those to a
//! [`HardWta`] layer, and [`WinStats`] records which unit won what so the
//! learned receptive fields can be inspected.
//!
//! All state lives in the values the caller owns; nothing is global.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::wta::HardWta;
use crate::error::{LearnError, Result};
use crate::kernel::rng;

/// How an intensity row becomes a binary observation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Binarize {
    /// Active where the value exceeds the threshold.
    Threshold(f64),
    /// The given number of largest values are active.
    Cardinality(usize),
    /// Active with probability equal to the value.
    Bernoulli,
}

impl Binarize {
    /// Apply the policy. `rng` is only consumed by [`Binarize::Bernoulli`].
    pub fn apply(&self, row: &[f64], rng: &mut ChaCha8Rng) -> Vec<f64> {
        match *self {
            Binarize::Threshold(t) => row
                .iter()
                .map(|&v| if v > t { 1.0 } else { 0.0 })
                .collect(),
            Binarize::Cardinality(c) => {
                let mut x = vec![0.0; row.len()];
                for i in rng::top_indices(row, c) {
                    x[i] = 1.0;
                }
                x
            }
            Binarize::Bernoulli => row
                .iter()
                .map(|&v| {
                    if rng.gen::<f64>() < v.clamp(0.0, 1.0) {
                        1.0
                    } else {
                        0.0
                    }
                })
                .collect(),
        }
    }
}

/// Per-unit win statistics gathered during evaluation.
#[derive(Clone, Debug, PartialEq)]
pub struct WinStats {
    n: usize,
    counts: Vec<usize>,
    /// Column-major: sums[k * n .. (k + 1) * n] = summed inputs won by unit k.
    sums: Vec<f64>,
}

impl WinStats {
    pub fn new(n: usize, m: usize) -> Self {
        Self {
            n,
            counts: vec![0; m],
            sums: vec![0.0; n * m],
        }
    }

    /// Credit `x` to unit `k`.
    pub fn record(&mut self, k: usize, x: &[f64]) {
        self.counts[k] += 1;
        let base = k * self.n;
        for (s, &v) in self.sums[base..base + self.n].iter_mut().zip(x.iter()) {
            *s += v;
        }
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Fraction of observations won by each unit (all zero before any win).
    pub fn probabilities(&self) -> Vec<f64> {
        let total = self.total();
        if total == 0 {
            return vec![0.0; self.counts.len()];
        }
        self.counts
            .iter()
            .map(|&c| c as f64 / total as f64)
            .collect()
    }

    /// Average input won by unit `k` (zeros if it never won).
    pub fn mean(&self, k: usize) -> Vec<f64> {
        let base = k * self.n;
        let c = self.counts[k];
        if c == 0 {
            return vec![0.0; self.n];
        }
        self.sums[base..base + self.n]
            .iter()
            .map(|&s| s / c as f64)
            .collect()
    }
}

/// Feeds binarised observations to a [`HardWta`] layer.
#[derive(Clone, Debug)]
pub struct Trainer {
    binarize: Binarize,
    rng: ChaCha8Rng,
}

impl Trainer {
    pub fn new(binarize: Binarize, seed: u64) -> Self {
        Self {
            binarize,
            rng: rng::seeded(seed),
        }
    }

    pub fn binarize(&mut self, row: &[f64]) -> Vec<f64> {
        self.binarize.apply(row, &mut self.rng)
    }

    /// Learn on every sample. Returns the number of samples consumed.
    pub fn train(&mut self, wta: &mut HardWta, samples: &[Vec<f64>]) -> Result<usize> {
        if samples.is_empty() {
            return Err(LearnError::empty("no samples to train on"));
        }
        for row in samples {
            let x = self.binarize(row);
            wta.evaluate(&x, true)?;
        }
        log::debug!("trained on {} samples", samples.len());
        Ok(samples.len())
    }

    /// Record winners for every sample without learning.
    pub fn eval(&mut self, wta: &HardWta, samples: &[Vec<f64>]) -> Result<WinStats> {
        let mut stats = WinStats::new(wta.n(), wta.m());
        for row in samples {
            let x = self.binarize(row);
            let k = wta.winner(&x)?;
            stats.record(k, &x);
        }
        Ok(stats)
    }
}
