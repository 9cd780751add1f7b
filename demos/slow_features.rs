//! Slow features from a mixed signal
//!
//! Three sensors record different mixtures of one slow and two fast
//! oscillations. Linear SFA unmixes the slow source; quadratic SFA finds
//! the slowly varying radius of a fast rotation. Finally a streaming
//! tracker fed through a running mean is compared with batch PCA.
//!
//! Run: cargo run --example slow_features

use inclearn::batch::{from_rows, pca, DeMean, Sfa, Sfa2, Truncation};
use inclearn::config::TrackerConfig;
use inclearn::incremental::{Pipeline, RunningMean, Stage};
use inclearn::kernel::{dot, ScheduleConfig};
use nalgebra::DMatrix;
use rand::prelude::*;
use rand_distr::StandardNormal;
use std::f64::consts::TAU;

fn correlation(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len() as f64;
    let ma = a.iter().sum::<f64>() / n;
    let mb = b.iter().sum::<f64>() / n;
    let cov: f64 = a.iter().zip(b).map(|(x, y)| (x - ma) * (y - mb)).sum();
    let va: f64 = a.iter().map(|x| (x - ma) * (x - ma)).sum();
    let vb: f64 = b.iter().map(|y| (y - mb) * (y - mb)).sum();
    cov / (va * vb).sqrt()
}

fn column(m: &DMatrix<f64>, c: usize) -> Vec<f64> {
    m.column(c).iter().copied().collect()
}

fn main() -> inclearn::Result<()> {
    let n = 3000;
    let mut rng = StdRng::seed_from_u64(42);
    let slow: Vec<f64> = (0..n).map(|t| (TAU * t as f64 / 600.0).sin()).collect();

    // =========================================================================
    // Linear SFA
    // =========================================================================
    println!("\n{}", "=".repeat(60));
    println!("LINEAR SFA");
    println!("{}\n", "=".repeat(60));

    let rows: Vec<Vec<f64>> = (0..n)
        .map(|t| {
            let fast = (TAU * t as f64 / 17.0).sin();
            let faster = (TAU * t as f64 / 6.0).cos();
            let noise: f64 = rng.sample(StandardNormal);
            vec![
                slow[t] + fast + 0.05 * noise,
                0.5 * slow[t] - fast + 0.4 * faster,
                -slow[t] + 0.2 * fast + faster,
            ]
        })
        .collect();
    let x = from_rows(&rows)?;

    let sfa = Sfa::fit(&x, Truncation::default())?;
    let y = sfa.transform(&x)?;
    println!("derivative variance per feature: {:?}", sfa.slowness().as_slice());
    for c in 0..y.ncols() {
        println!(
            "  feature {}: correlation with slow source {:+.4}",
            c,
            correlation(&column(&y, c), &slow)
        );
    }

    // =========================================================================
    // Quadratic SFA
    // =========================================================================
    println!("\n{}", "=".repeat(60));
    println!("QUADRATIC SFA");
    println!("{}\n", "=".repeat(60));

    let rotation = DMatrix::from_fn(n, 2, |t, c| {
        let phase = TAU * t as f64 / 11.0;
        let radius = 1.0 + 0.5 * slow[t];
        if c == 0 {
            radius * phase.cos()
        } else {
            radius * phase.sin()
        }
    });
    println!(
        "linear SFA on the rotation: {:+.4}",
        correlation(
            &column(&Sfa::fit(&rotation, Truncation::default())?.transform(&rotation)?, 0),
            &slow
        )
    );
    let sfa2 = Sfa2::fit(&rotation, Truncation::Cutoff(1e-6))?;
    let y2 = sfa2.transform(&rotation)?;
    println!(
        "quadratic SFA on the rotation: {:+.4} ({} features)",
        correlation(&column(&y2, 0), &slow),
        y2.ncols()
    );

    // =========================================================================
    // Streaming PCA against batch PCA
    // =========================================================================
    println!("\n{}", "=".repeat(60));
    println!("STREAMING PCA");
    println!("{}\n", "=".repeat(60));

    let centered = DeMean::fit(&x)?.transform(&x)?;
    let batch = pca(&centered)?.sort_descending();

    let tracker = TrackerConfig::new(3, 2)
        .with_schedule(ScheduleConfig::Amnesic {
            n1: 20,
            n2: 200,
            m: 2000.0,
            c: 3.0,
        })
        .with_seed(1)
        .build()?;
    let mut pipe = Pipeline::new(tracker).with_stage(Stage::RunningMean(RunningMean::new(3)));
    for (i, row) in rows.iter().enumerate() {
        pipe.update(row)?;
        if (i + 1) % 500 == 0 {
            let t = pipe.tracker();
            let align: Vec<String> = (0..2)
                .map(|j| format!("{:.4}", dot(t.eigenvector(j), &column(&batch.vectors, j)).abs()))
                .collect();
            println!("  {:5} samples: |cos| to batch eigenvectors {:?}", i + 1, align);
        }
    }
    println!("\nbatch eigenvalues: {:?}", batch.values.as_slice());
    println!("tracked magnitudes: {:?}", pipe.tracker().eigenvalues());
    Ok(())
}
