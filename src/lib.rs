//! # inclearn: incremental feature learning
//!
//! Unsupervised feature learners that consume observations one at a time,
//! plus the batch transforms used to check them.
//!
//! ## Quick Start
//!
//! ```rust
//! use inclearn::{HardWta, IncrementalEigen, Kind, RunningMean, Schedule, WtaMethod};
//!
//! // Competitive layer: 8 units over 32 binary inputs
//! let mut wta = HardWta::new(32, 8, WtaMethod::HardWtaL2, 42)?;
//! let mut x = vec![0.0; 32];
//! x[5] = 1.0;
//! let winner = wta.evaluate(&x, true)?;
//! println!("unit {} won", winner);
//!
//! // Streaming PCA on centered data
//! let mut mean = RunningMean::new(3);
//! let mut pca = IncrementalEigen::new(3, 1, Kind::Principal, Schedule::amnesic(), 42)?;
//! for t in 0..100 {
//!     let t = t as f64 * 0.1;
//!     let centered = mean.update(&[2.0 + t.sin(), 1.0 + 0.5 * t.sin(), 0.01 * t.cos()])?;
//!     if t > 0.0 {
//!         pca.update(&centered)?;
//!     }
//! }
//! println!("leading direction {:?}", pca.eigenvector(0));
//! # Ok::<(), inclearn::LearnError>(())
//! ```
//!
//! ## Layers
//!
//! - [`kernel`]: norms, learning-rate schedules, seeded randomness
//! - [`competitive`]: hard winner-take-all units and their training loop
//! - [`incremental`]: running means, derivatives, eigen-trackers
//! - [`batch`]: covariance, PCA whitening, slow feature analysis
//! - [`config`]: serializable builders for the streaming learners
//!
//! The library logs through the [`log`] facade and never installs a logger.

pub mod batch;
pub mod competitive;
pub mod config;
pub mod error;
pub mod incremental;
pub mod kernel;

// Re-exports for convenience
pub use batch::{PcaWhitening, Sfa, Sfa2, Truncation};
pub use competitive::{Binarize, HardWta, Trainer, WinStats, WtaMethod};
pub use config::{TrackerConfig, WtaConfig};
pub use error::{LearnError, Result};
pub use incremental::{
    DiscreteDerivative, IncrementalEigen, Kind, MovingAverageMean, Pipeline, RunningMean, Stage,
};
pub use kernel::{Norm, Schedule, ScheduleConfig};
