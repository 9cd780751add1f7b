//! Streaming statistics: centering, differencing and eigen-tracking.
//!
//! Everything here consumes one observation row at a time and keeps only
//! `O(dim * k)` state.
//!
//! - [`RunningMean`], [`MovingAverageMean`], [`DiscreteDerivative`]
//! - [`IncrementalEigen`] with [`Kind::Principal`] / [`Kind::Minor`]
//! - [`Pipeline`] chaining [`Stage`]s in front of a tracker

pub mod center;
pub mod eigen;
pub mod pipeline;

pub use center::{DiscreteDerivative, MovingAverageMean, RunningMean};
pub use eigen::{IncrementalEigen, Kind};
pub use pipeline::{Pipeline, Stage};
