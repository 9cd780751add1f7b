//! Kernel layer: numeric building blocks shared by every learner.
//!
//! - Norms, dot products and first-maximum selection ([`Norm`], [`dot`], [`argmax`])
//! - Learning-rate schedules ([`Schedule`])
//! - Seeded random initialisation ([`rng`])
//!
//! This layer has no dependencies on [`competitive`](crate::competitive),
//! [`incremental`](crate::incremental) or [`batch`](crate::batch).
//!
//! # Example
//!
//! ```rust
//! use inclearn::kernel::{Norm, Schedule};
//!
//! let mut w = vec![3.0, 4.0];
//! Norm::L2.normalize(&mut w)?;
//! assert!((w[0] - 0.6).abs() < 1e-12);
//!
//! let mut eps = Schedule::inverse_count();
//! assert_eq!(eps.step(), 1.0);
//! assert_eq!(eps.step(), 0.5);
//! # Ok::<(), inclearn::LearnError>(())
//! ```

pub mod norm;
pub mod rng;
pub mod schedule;

pub use norm::{argmax, dot, l2, Norm, NORM_EPS};
pub use schedule::{Amnesic, Constant, InverseCount, Schedule, ScheduleConfig};
