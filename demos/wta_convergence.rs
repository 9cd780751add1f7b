//! Hard WTA on the bars problem
//!
//! Each 8x8 patch lights up a random handful of horizontal and vertical
//! bars. A layer of 16 L1 units is trained on Bernoulli-sampled patches,
//! then the mean patch each unit wins is printed as ASCII art. Units
//! settle on single bars, and the inhibitory bias keeps their win rates
//! close to uniform.
//!
//! Run: cargo run --example wta_convergence

use inclearn::competitive::{Binarize, HardWta, Trainer, WinStats, WtaMethod};
use inclearn::config::WtaConfig;
use rand::prelude::*;

const SIDE: usize = 8;
const UNITS: usize = 16;

/// Patch intensities in [0, 1] with each bar on with probability 1/8.
fn generate_patches(count: usize, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let mut patch = vec![0.05; SIDE * SIDE];
            for bar in 0..SIDE {
                if rng.gen_bool(1.0 / 8.0) {
                    for i in 0..SIDE {
                        patch[bar * SIDE + i] = 0.95;
                    }
                }
                if rng.gen_bool(1.0 / 8.0) {
                    for i in 0..SIDE {
                        patch[i * SIDE + bar] = 0.95;
                    }
                }
            }
            patch
        })
        .collect()
}

fn render(patch: &[f64]) -> Vec<String> {
    patch
        .chunks(SIDE)
        .map(|row| {
            row.iter()
                .map(|&v| match v {
                    v if v > 0.6 => '#',
                    v if v > 0.3 => '+',
                    v if v > 0.1 => '.',
                    _ => ' ',
                })
                .collect()
        })
        .collect()
}

fn print_fields(stats: &WinStats) {
    for start in (0..UNITS).step_by(4) {
        let fields: Vec<Vec<String>> = (start..start + 4).map(|k| render(&stats.mean(k))).collect();
        for line in 0..SIDE {
            let row: Vec<String> = fields.iter().map(|f| format!("|{}|", f[line])).collect();
            println!("   {}", row.join("  "));
        }
        println!();
    }
}

fn main() -> inclearn::Result<()> {
    println!("\n{}", "=".repeat(60));
    println!("HARD WTA ON THE BARS PROBLEM");
    println!("{}\n", "=".repeat(60));

    let config = WtaConfig::new(SIDE * SIDE, UNITS)
        .with_method(WtaMethod::HardWtaL1)
        .with_steps(0.01, 2.0 / 1024.0)
        .with_seed(7);
    println!("Config:\n{}\n", config.to_json()?);

    let mut wta: HardWta = config.build()?;
    let mut trainer = Trainer::new(Binarize::Bernoulli, 11);
    let patches = generate_patches(4000, 42);
    let held_out = generate_patches(1000, 43);

    for epoch in 1..=10 {
        trainer.train(&mut wta, &patches)?;
        let stats = trainer.eval(&wta, &held_out)?;
        let p = stats.probabilities();
        let max = p.iter().cloned().fold(0.0, f64::max);
        let min = p.iter().cloned().fold(1.0, f64::min);
        println!(
            "epoch {:2}: win probability min={:.3} max={:.3} (uniform {:.3})",
            epoch,
            min,
            max,
            1.0 / UNITS as f64
        );
    }

    println!("\nMean input won by each unit:\n");
    let stats = trainer.eval(&wta, &held_out)?;
    print_fields(&stats);

    let bias = wta.bias();
    println!(
        "bias range: [{:.3}, {:.3}]",
        bias.iter().cloned().fold(f64::INFINITY, f64::min),
        bias.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
    );
    Ok(())
}
