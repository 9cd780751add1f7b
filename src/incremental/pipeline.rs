//! Chain of streaming stages feeding an eigen-tracker.
//!
//! A [`Pipeline`] passes each observation through its [`Stage`]s in order
//! and hands the result to an [`IncrementalEigen`] tracker. A typical
//! principal-component pipeline centers with a [`RunningMean`]; a
//! slow-feature style pipeline centers and then differentiates, so the
//! tracker sees velocities.
//!
//! ```rust
//! use inclearn::incremental::{IncrementalEigen, Kind, Pipeline, RunningMean, Stage};
//! use inclearn::kernel::Schedule;
//!
//! let tracker = IncrementalEigen::new(3, 2, Kind::Principal, Schedule::amnesic(), 1)?;
//! let mut pipe = Pipeline::new(tracker).with_stage(Stage::RunningMean(RunningMean::new(3)));
//!
//! for t in 0..200 {
//!     let t = t as f64;
//!     pipe.update(&[5.0 + t.sin(), 1.0 + (0.5 * t).cos(), 0.1 * (0.3 * t).sin()])?;
//! }
//! assert_eq!(pipe.tracker().samples_seen(), 200);
//! # Ok::<(), inclearn::LearnError>(())
//! ```

use super::center::{DiscreteDerivative, MovingAverageMean, RunningMean};
use super::eigen::IncrementalEigen;
use crate::error::{LearnError, Result};

/// One streaming transform in front of the tracker.
#[derive(Clone, Debug)]
pub enum Stage {
    RunningMean(RunningMean),
    MovingAverageMean(MovingAverageMean),
    DiscreteDerivative(DiscreteDerivative),
}

impl Stage {
    pub fn dim(&self) -> usize {
        match self {
            Stage::RunningMean(s) => s.dim(),
            Stage::MovingAverageMean(s) => s.dim(),
            Stage::DiscreteDerivative(s) => s.dim(),
        }
    }

    pub fn update(&mut self, x: &[f64]) -> Result<Vec<f64>> {
        match self {
            Stage::RunningMean(s) => s.update(x),
            Stage::MovingAverageMean(s) => s.update(x),
            Stage::DiscreteDerivative(s) => s.update(x),
        }
    }
}

/// Stages followed by a tracker.
#[derive(Clone, Debug)]
pub struct Pipeline {
    stages: Vec<Stage>,
    tracker: IncrementalEigen,
}

impl Pipeline {
    pub fn new(tracker: IncrementalEigen) -> Self {
        Self {
            stages: Vec::new(),
            tracker,
        }
    }

    /// Append a stage. Stages run in the order they were added.
    ///
    /// # Panics
    /// Panics if the stage dimensionality differs from the tracker's.
    pub fn with_stage(mut self, stage: Stage) -> Self {
        assert_eq!(
            stage.dim(),
            self.tracker.dim(),
            "Stage dim={} does not match tracker dim={}",
            stage.dim(),
            self.tracker.dim()
        );
        self.stages.push(stage);
        self
    }

    /// Fallible variant of [`with_stage`](Self::with_stage).
    pub fn try_with_stage(self, stage: Stage) -> Result<Self> {
        LearnError::check_dim(self.tracker.dim(), stage.dim())?;
        Ok(self.with_stage(stage))
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn tracker(&self) -> &IncrementalEigen {
        &self.tracker
    }

    /// Run `x` through every stage, update the tracker, and return what the
    /// tracker saw.
    ///
    /// Stages advance only if the tracker accepts the row: on error neither
    /// the stages nor the tracker change.
    pub fn update(&mut self, x: &[f64]) -> Result<Vec<f64>> {
        let mut stages = self.stages.clone();
        let y = Self::run(&mut stages, x)?;
        self.tracker.update(&y)?;
        self.stages = stages;
        Ok(y)
    }

    /// Run `x` through the stages and project it onto the tracked components.
    ///
    /// The stages see `x` as if it were the next row, but their state is not
    /// kept, so a projection never changes what later updates produce.
    pub fn transform(&self, x: &[f64]) -> Result<Vec<f64>> {
        let mut stages = self.stages.clone();
        let y = Self::run(&mut stages, x)?;
        self.tracker.project(&y)
    }

    fn run(stages: &mut [Stage], x: &[f64]) -> Result<Vec<f64>> {
        let mut y = x.to_vec();
        for stage in stages.iter_mut() {
            y = stage.update(&y)?;
        }
        Ok(y)
    }

    pub fn into_tracker(self) -> IncrementalEigen {
        self.tracker
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::incremental::Kind;
    use crate::kernel::Schedule;

    fn tracker(dim: usize) -> IncrementalEigen {
        IncrementalEigen::new(dim, 1, Kind::Principal, Schedule::amnesic(), 3).unwrap()
    }

    #[test]
    fn test_stages_run_in_order() {
        let mut pipe = Pipeline::new(tracker(2))
            .with_stage(Stage::RunningMean(RunningMean::new(2)))
            .with_stage(Stage::DiscreteDerivative(DiscreteDerivative::new(2)));
        // first row centers to zero and so does its derivative
        assert_eq!(pipe.update(&[1.0, 2.0]).unwrap(), vec![0.0, 0.0]);
        let seen = pipe.update(&[3.0, 2.0]).unwrap();
        // centered: [1, 0]; previous centered row was [0, 0]
        assert_eq!(seen, vec![1.0, 0.0]);
        assert_eq!(pipe.tracker().samples_seen(), 2);
        assert_eq!(pipe.transform(&[2.0, 2.0]).unwrap().len(), 1);
        assert_eq!(pipe.tracker().samples_seen(), 2);
    }

    #[test]
    fn test_dimension_checked() {
        let pipe = Pipeline::new(tracker(3));
        assert!(pipe
            .try_with_stage(Stage::RunningMean(RunningMean::new(2)))
            .is_err());
        let mut pipe = Pipeline::new(tracker(3));
        assert!(matches!(
            pipe.update(&[1.0]),
            Err(LearnError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_rejected_row_leaves_stages() {
        let t = IncrementalEigen::new(2, 1, Kind::Principal, Schedule::inverse_count(), 4).unwrap();
        let v = t.eigenvector(0).to_vec();
        let mut pipe =
            Pipeline::new(t).with_stage(Stage::DiscreteDerivative(DiscreteDerivative::new(2)));
        // The derivative of the first row is the row itself; orthogonal to v it collapses v.
        let x = [v[1], -v[0]];
        assert!(matches!(
            pipe.update(&x),
            Err(LearnError::DegenerateNorm { .. })
        ));
        assert_eq!(pipe.tracker().samples_seen(), 0);
        // The derivative stage did not remember x, so a good row still sees zero as its predecessor.
        let good = [v[0], v[1]];
        assert_eq!(pipe.update(&good).unwrap(), good.to_vec());
        assert_eq!(pipe.tracker().samples_seen(), 1);
    }

    #[test]
    fn test_transform_does_not_advance_stages() {
        let mut plain =
            Pipeline::new(tracker(2)).with_stage(Stage::RunningMean(RunningMean::new(2)));
        let mut projected = plain.clone();
        plain.update(&[1.0, 1.0]).unwrap();
        projected.update(&[1.0, 1.0]).unwrap();

        assert_eq!(projected.transform(&[100.0, -100.0]).unwrap().len(), 1);
        let a = plain.update(&[2.0, 0.0]).unwrap();
        let b = projected.update(&[2.0, 0.0]).unwrap();
        assert_eq!(a, vec![0.5, -0.5]);
        assert_eq!(a, b);
        assert_eq!(plain.tracker().eigenvectors(), projected.tracker().eigenvectors());
    }

    #[test]
    fn test_moving_average_stage() {
        let stage = Stage::MovingAverageMean(MovingAverageMean::new(2, 0.5).unwrap());
        let mut pipe = Pipeline::new(tracker(2)).with_stage(stage);
        let seen = pipe.update(&[2.0, 4.0]).unwrap();
        assert_eq!(seen, vec![1.0, 2.0]);
        assert_eq!(pipe.tracker().samples_seen(), 1);
    }
}
