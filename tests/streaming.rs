//! End-to-end behaviour of the streaming learners.
//!
//! These tests drive the competitive layer and the incremental estimators
//! over longer seeded streams than the unit tests do.

use approx::{assert_abs_diff_eq, assert_relative_eq};
use inclearn::batch::{from_rows, DeMean};
use inclearn::competitive::{HardWta, WtaMethod};
use inclearn::incremental::{IncrementalEigen, Kind, RunningMean};
use inclearn::kernel::{dot, l2, rng, Amnesic, Norm, Schedule};
use inclearn::LearnError;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

// =============================================================================
// STREAM GENERATORS
// =============================================================================

/// Binary row with each line active with probability `p`.
fn binary_row(rng: &mut ChaCha8Rng, n: usize, p: f64) -> Vec<f64> {
    (0..n)
        .map(|_| if rng.gen_bool(p) { 1.0 } else { 0.0 })
        .collect()
}

fn one_hot(n: usize, i: usize) -> Vec<f64> {
    let mut x = vec![0.0; n];
    x[i] = 1.0;
    x
}

/// Zero-mean Gaussian sample with standard deviations `scales` along the
/// coordinate axes rotated by a fixed Householder reflection.
fn rotated_sample(rng: &mut ChaCha8Rng, scales: &[f64]) -> Vec<f64> {
    let d = scales.len();
    let z = rng::normal(rng, d, 0.0, 1.0);
    let mut x: Vec<f64> = z.iter().zip(scales).map(|(zi, s)| zi * s).collect();
    let u: Vec<f64> = (0..d).map(|i| 1.0 / (i as f64 + 1.0)).collect();
    let uu = dot(&u, &u);
    let p = 2.0 * dot(&x, &u) / uu;
    for (xi, ui) in x.iter_mut().zip(u.iter()) {
        *xi -= p * ui;
    }
    x
}

/// Image of axis `i` under the same reflection.
fn rotated_axis(d: usize, i: usize) -> Vec<f64> {
    let mut e = one_hot(d, i);
    let u: Vec<f64> = (0..d).map(|j| 1.0 / (j as f64 + 1.0)).collect();
    let p = 2.0 * dot(&e, &u) / dot(&u, &u);
    for (ei, ui) in e.iter_mut().zip(u.iter()) {
        *ei -= p * ui;
    }
    e
}

// =============================================================================
// COMPETITIVE LAYER
// =============================================================================

#[test]
fn test_columns_stay_normalised_for_every_method() {
    for (method, norm) in [
        (WtaMethod::HardWtaL2, Norm::L2),
        (WtaMethod::HardWtaL1, Norm::L1),
        (WtaMethod::HardWtaZeroOrder, Norm::L1),
    ] {
        let mut wta = HardWta::new(20, 5, method, 17).unwrap();
        let mut r = rng::seeded(4);
        for _ in 0..500 {
            let x = binary_row(&mut r, 20, 0.2);
            let k = wta.evaluate(&x, true).unwrap();
            assert_relative_eq!(norm.of(wta.column(k)), 1.0, epsilon = 1e-9);
        }
        for k in 0..5 {
            assert_relative_eq!(norm.of(wta.column(k)), 1.0, epsilon = 1e-9);
        }
    }
}

#[test]
fn test_inference_is_deterministic() {
    let mut wta = HardWta::new(12, 4, WtaMethod::HardWtaL2, 5).unwrap();
    let mut r = rng::seeded(6);
    for _ in 0..50 {
        let x = binary_row(&mut r, 12, 0.3);
        wta.evaluate(&x, true).unwrap();
    }
    let weights = wta.weights().to_vec();
    let bias = wta.bias().to_vec();
    let x = binary_row(&mut r, 12, 0.3);
    let first = wta.evaluate(&x, false).unwrap();
    for _ in 0..10 {
        assert_eq!(wta.evaluate(&x, false).unwrap(), first);
    }
    assert_eq!(wta.weights(), &weights[..]);
    assert_eq!(wta.bias(), &bias[..]);
}

#[test]
fn test_single_step_on_first_line() {
    let mut wta = HardWta::new(4, 2, WtaMethod::HardWtaL2, 2024).unwrap();
    let x = one_hot(4, 0);
    let k = wta.winner(&x).unwrap();
    let before = wta.column(k)[0];
    let bias_before = wta.bias()[k];

    assert_eq!(wta.evaluate(&x, true).unwrap(), k);
    assert!(wta.column(k)[0] > before);
    assert_relative_eq!(l2(wta.column(k)), 1.0, epsilon = 1e-12);
    assert_relative_eq!(wta.bias()[k], bias_before - 2.0 / 1024.0);
}

#[test]
fn test_bias_equalises_win_frequencies() {
    // Without the bias, unit 0 would take half of all inputs.
    let weights = vec![
        1.0, 1.0, 1.0, 1.0, // unit 0
        1.0, 0.0, 0.0, 0.0, // unit 1
        0.0, 1.0, 0.0, 0.0, // unit 2
    ];
    let mut wta = HardWta::with_weights(4, 3, Norm::L2, weights, 0.0, 0.01).unwrap();
    let mut r = rng::seeded(99);

    let mut wins = [0usize; 3];
    let steps = 30_000;
    for t in 0..steps {
        let x = one_hot(4, r.gen_range(0..4));
        let k = wta.evaluate(&x, true).unwrap();
        if t >= steps - 9_000 {
            wins[k] += 1;
        }
    }
    for &w in &wins {
        let p = w as f64 / 9_000.0;
        assert!((p - 1.0 / 3.0).abs() < 0.03, "win frequencies {:?}", wins);
    }
}

#[test]
fn test_errors_leave_layer_untouched() {
    let mut wta = HardWta::new(4, 2, WtaMethod::HardWtaZeroOrder, 8).unwrap();
    let weights = wta.weights().to_vec();

    assert!(matches!(
        wta.evaluate(&[1.0, 0.0, 0.0], true),
        Err(LearnError::DimensionMismatch { expected: 4, got: 3 })
    ));
    // active lines whose activity sums to zero cannot scale the step
    assert!(matches!(
        wta.evaluate(&[1.0, -1.0, 0.0, 0.0], true),
        Err(LearnError::DegenerateNorm { .. })
    ));
    assert_eq!(wta.weights(), &weights[..]);
    assert!(wta.bias().iter().all(|&b| b == 0.0));
}

#[test]
fn test_unsupported_norm() {
    let err = Norm::from_order(3).unwrap_err();
    assert!(matches!(err, LearnError::UnsupportedNorm(3)));
    assert_eq!(err.to_string(), "Unimplemented norm l3");
}

// =============================================================================
// INCREMENTAL ESTIMATORS
// =============================================================================

#[test]
fn test_running_mean_equals_batch_mean() {
    let mut r = rng::seeded(21);
    let rows: Vec<Vec<f64>> = (0..300).map(|_| rng::normal(&mut r, 4, 2.5, 1.5)).collect();

    let mut running = RunningMean::new(4);
    running.update_batch(&rows).unwrap();
    let batch = DeMean::fit(&from_rows(&rows).unwrap()).unwrap();

    for d in 0..4 {
        assert_abs_diff_eq!(running.mean()[d], batch.mean()[d], epsilon = 1e-10);
    }
}

#[test]
fn test_three_components_orthonormal_and_aligned() {
    let scales = [4.0, 2.0, 1.0, 0.2, 0.1, 0.05];
    let mut r = rng::seeded(31);
    let mut pca = IncrementalEigen::new(6, 3, Kind::Principal, Schedule::amnesic(), 7).unwrap();
    for _ in 0..20_000 {
        pca.update(&rotated_sample(&mut r, &scales)).unwrap();
    }

    for i in 0..3 {
        assert_relative_eq!(l2(pca.eigenvector(i)), 1.0, epsilon = 1e-9);
        for j in (i + 1)..3 {
            assert!(dot(pca.eigenvector(i), pca.eigenvector(j)).abs() < 0.1);
        }
        let align = dot(pca.eigenvector(i), &rotated_axis(6, i)).abs();
        assert!(align > 0.95, "component {} alignment {}", i, align);
    }

    pca.reorthogonalize().unwrap();
    for i in 0..3 {
        for j in (i + 1)..3 {
            assert_abs_diff_eq!(
                dot(pca.eigenvector(i), pca.eigenvector(j)),
                0.0,
                epsilon = 1e-12
            );
        }
    }
}

#[test]
fn test_amnesic_parameter_shape() {
    let a = Amnesic::with_params(20, 200, 2000.0, 3.0).unwrap();
    for i in 1..20 {
        assert_eq!(a.amnesia(i), 0.0);
    }
    for i in 20..199 {
        assert!(a.amnesia(i + 1) > a.amnesia(i));
    }
    let slope = a.amnesia(1200) - a.amnesia(1199);
    assert_relative_eq!(slope, 1.0 / 2000.0, epsilon = 1e-12);
    assert_relative_eq!(a.amnesia(5200) - a.amnesia(200), 5000.0 / 2000.0, epsilon = 1e-9);

    // the resulting weights stay inside (0, 1] and keep shrinking
    let mut s = Schedule::Amnesic(a);
    let mut prev = f64::INFINITY;
    for _ in 0..10_000 {
        let w = s.step();
        assert!(w > 0.0 && w <= 1.0);
        assert!(w < prev);
        prev = w;
    }
}
