//! Learning-rate (epsilon) schedules for the streaming estimators.
//!
//! Every schedule is a small state machine over the number of samples seen
//! so far. Estimators never share one: each tracker receives its own
//! [`Schedule`] at construction, so counters cannot leak between unrelated
//! instances.
//!
//! | Schedule | Step size | Behaviour |
//! |----------|-----------|-----------|
//! | [`Constant`] | `epsilon` | exponential forgetting, fixed half-life |
//! | [`InverseCount`] | `1 / n` | exact running average |
//! | [`Amnesic`] | `(1 + l(i)) / i` | running average that favours recent data more and more |

use serde::{Deserialize, Serialize};

use crate::error::{LearnError, Result};

/// Fixed step size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Constant {
    epsilon: f64,
}

impl Constant {
    pub fn new(epsilon: f64) -> Result<Self> {
        if !(epsilon > 0.0 && epsilon <= 1.0) {
            return Err(LearnError::invalid_config(format!(
                "constant epsilon must lie in (0, 1], got {}",
                epsilon
            )));
        }
        Ok(Self { epsilon })
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn step_by(&mut self, _batch: usize) -> f64 {
        self.epsilon
    }
}

/// `1 / n` after counting the new samples.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InverseCount {
    n: usize,
}

impl InverseCount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn samples_seen(&self) -> usize {
        self.n
    }

    /// # Panics
    /// Panics if `batch` is zero.
    pub fn step_by(&mut self, batch: usize) -> f64 {
        assert!(batch > 0, "step_by needs at least one sample");
        self.n += batch;
        1.0 / self.n as f64
    }
}

/// Three-phase amnesic average.
///
/// The amnesic parameter `l(i)` is zero below `n1`, ramps linearly to `c`
/// between `n1` and `n2`, and keeps growing by `1/m` per sample beyond `n2`.
/// The returned weight is `(1 + l) / i`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Amnesic {
    n1: usize,
    n2: usize,
    m: f64,
    c: f64,
    i: usize,
}

impl Amnesic {
    /// Defaults: `n1 = 20, n2 = 200, m = 2000, c = 3`.
    pub fn new() -> Self {
        Self {
            n1: 20,
            n2: 200,
            m: 2000.0,
            c: 3.0,
            i: 0,
        }
    }

    pub fn with_params(n1: usize, n2: usize, m: f64, c: f64) -> Result<Self> {
        if n1 == 0 || n1 >= n2 {
            return Err(LearnError::invalid_config(format!(
                "amnesic thresholds need 0 < n1 < n2, got n1={} n2={}",
                n1, n2
            )));
        }
        if !(m > 0.0) {
            return Err(LearnError::invalid_config("amnesic m must be positive"));
        }
        Ok(Self { n1, n2, m, c, i: 0 })
    }

    pub fn samples_seen(&self) -> usize {
        self.i
    }

    /// Amnesic parameter `l` at sample count `i`. Pure; does not advance.
    pub fn amnesia(&self, i: usize) -> f64 {
        if i < self.n1 {
            0.0
        } else if i < self.n2 {
            self.c * (i - self.n1) as f64 / (self.n2 - self.n1) as f64
        } else {
            self.c + (i - self.n2) as f64 / self.m
        }
    }

    /// Weight `(1 + l(i)) / i` at sample count `i`. Pure; does not advance.
    ///
    /// # Panics
    /// Panics if `i` is zero.
    pub fn weight_at(&self, i: usize) -> f64 {
        assert!(i > 0, "amnesic weight is undefined before the first sample");
        (1.0 + self.amnesia(i)) / i as f64
    }

    /// # Panics
    /// Panics if `batch` is zero.
    pub fn step_by(&mut self, batch: usize) -> f64 {
        assert!(batch > 0, "step_by needs at least one sample");
        self.i += batch;
        self.weight_at(self.i)
    }
}

impl Default for Amnesic {
    fn default() -> Self {
        Self::new()
    }
}

/// A learning-rate schedule owned by exactly one estimator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Schedule {
    Constant(Constant),
    InverseCount(InverseCount),
    Amnesic(Amnesic),
}

impl Schedule {
    /// Constant step size (moving average).
    pub fn constant(epsilon: f64) -> Result<Self> {
        Ok(Schedule::Constant(Constant::new(epsilon)?))
    }

    /// Exact running mean.
    pub fn inverse_count() -> Self {
        Schedule::InverseCount(InverseCount::new())
    }

    /// Amnesic average with default thresholds.
    pub fn amnesic() -> Self {
        Schedule::Amnesic(Amnesic::new())
    }

    /// Advance by one observation and return its step size.
    pub fn step(&mut self) -> f64 {
        self.step_by(1)
    }

    /// Advance by `batch` observations and return the step size.
    ///
    /// # Panics
    /// Panics if `batch` is zero.
    pub fn step_by(&mut self, batch: usize) -> f64 {
        assert!(batch > 0, "step_by needs at least one sample");
        match self {
            Schedule::Constant(s) => s.step_by(batch),
            Schedule::InverseCount(s) => s.step_by(batch),
            Schedule::Amnesic(s) => s.step_by(batch),
        }
    }
}

/// Serializable description of a [`Schedule`].
///
/// Building always yields a fresh schedule with its counter at zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleConfig {
    Constant {
        epsilon: f64,
    },
    InverseCount,
    Amnesic {
        n1: usize,
        n2: usize,
        m: f64,
        c: f64,
    },
}

impl ScheduleConfig {
    pub fn build(&self) -> Result<Schedule> {
        match *self {
            ScheduleConfig::Constant { epsilon } => Schedule::constant(epsilon),
            ScheduleConfig::InverseCount => Ok(Schedule::inverse_count()),
            ScheduleConfig::Amnesic { n1, n2, m, c } => {
                Ok(Schedule::Amnesic(Amnesic::with_params(n1, n2, m, c)?))
            }
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        ScheduleConfig::Constant { epsilon: 0.001 }
    }
}
