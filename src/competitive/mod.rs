//! Competitive learning layer: hard winner-take-all units and their training loop.
//!
//! - [`HardWta`]: `m` units over `n` inputs, one winner per observation,
//!   Hebbian update plus inhibitory bias on the winner only.
//! - [`WtaMethod`]: the closed set of learning rules (L2, L1 sparse,
//!   L1 dense "zero order").
//! - [`Trainer`] / [`WinStats`]: binarise rows, train, and measure who wins.
//!
//! # Usage
//!
//! ```rust
//! use inclearn::competitive::{Binarize, HardWta, Trainer, WtaMethod};
//!
//! let mut wta = HardWta::new(9, 3, WtaMethod::HardWtaL1, 7)?;
//! let mut trainer = Trainer::new(Binarize::Cardinality(3), 7);
//!
//! let rows: Vec<Vec<f64>> = (0..3)
//!     .map(|b| (0..9).map(|i| if i / 3 == b { 1.0 } else { 0.0 }).collect())
//!     .collect();
//!
//! trainer.train(&mut wta, &rows)?;
//! let stats = trainer.eval(&wta, &rows)?;
//! assert_eq!(stats.total(), 3);
//! # Ok::<(), inclearn::LearnError>(())
//! ```

pub mod harness;
pub mod wta;

pub use harness::{Binarize, Trainer, WinStats};
pub use wta::{HardWta, Init, WtaMethod, DEFAULT_R_STEP, DEFAULT_W_STEP};
