//! Deterministic random initialisation.
//!
//! Every random draw in the crate goes through a `ChaCha8Rng` seeded from an
//! explicit `u64`, so the same seed reproduces the same initial weights on
//! every machine.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

/// Create the crate's RNG from a seed.
pub fn seeded(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// `len` draws from U[0, 1).
pub fn uniform(rng: &mut ChaCha8Rng, len: usize) -> Vec<f64> {
    (0..len).map(|_| rng.gen::<f64>()).collect()
}

/// `len` draws from `mean + std * N(0, 1)`.
pub fn normal(rng: &mut ChaCha8Rng, len: usize, mean: f64, std: f64) -> Vec<f64> {
    (0..len)
        .map(|_| {
            let z: f64 = rng.sample(StandardNormal);
            mean + std * z
        })
        .collect()
}

/// Indices of the `a` largest entries of `scores` (ties go to the lower index).
///
/// The result is sorted ascending.
pub fn top_indices(scores: &[f64], a: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&i, &j| {
        scores[j]
            .partial_cmp(&scores[i])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(i.cmp(&j))
    });
    let mut top: Vec<usize> = order.into_iter().take(a).collect();
    top.sort_unstable();
    top
}
