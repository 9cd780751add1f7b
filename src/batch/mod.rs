//! Batch layer: whole-dataset transforms on `nalgebra` matrices.
//!
//! - [`DeMean`], [`NormaliseStd`], [`covariance`], [`pca`]
//! - [`Truncation`] of eigenpairs before whitening
//! - [`PcaWhitening`]
//! - [`Sfa`] and its quadratic variant [`Sfa2`]
//!
//! Rows are observations. Fits log a summary at `info` level.
//!
//! # Example
//!
//! ```rust
//! use inclearn::batch::{from_rows, PcaWhitening, Truncation};
//!
//! let rows: Vec<Vec<f64>> = (0..100)
//!     .map(|t| {
//!         let t = t as f64 * 0.1;
//!         vec![t.sin() + 3.0, 2.0 * t.sin() + 0.1 * (7.0 * t).cos()]
//!     })
//!     .collect();
//! let x = from_rows(&rows)?;
//! let white = PcaWhitening::fit(&x, Truncation::RetainK(1))?;
//! assert_eq!(white.transform(&x)?.ncols(), 1);
//! # Ok::<(), inclearn::LearnError>(())
//! ```

pub mod pca;
pub mod sfa;
pub mod whitening;

pub use pca::{
    covariance, from_rows, pca, whitening_transformation, DeMean, EigenPairs, NormaliseStd,
    Truncation, DEFAULT_CUTOFF,
};
pub use sfa::{discrete_derivative, quadratic_expansion, Sfa, Sfa2};
pub use whitening::PcaWhitening;
