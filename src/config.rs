//! Serializable configuration for the streaming learners.
//!
//! [`WtaConfig`] builds a [`HardWta`] layer and [`TrackerConfig`] builds an
//! [`IncrementalEigen`] tracker. Both can be assembled in code with the
//! `with_*` builders or read from JSON; missing JSON fields take their
//! defaults.
//!
//! # Example
//!
//! ```rust
//! use inclearn::config::{TrackerConfig, WtaConfig};
//! use inclearn::competitive::WtaMethod;
//!
//! let wta = WtaConfig::new(64, 8)
//!     .with_method(WtaMethod::HardWtaL1)
//!     .with_seed(3)
//!     .build()?;
//! assert_eq!(wta.m(), 8);
//!
//! let tracker = TrackerConfig::from_json(
//!     r#"{"dim": 10, "k": 3, "schedule": {"kind": "amnesic", "n1": 20, "n2": 200, "m": 2000.0, "c": 3.0}}"#,
//! )?
//! .build()?;
//! assert_eq!(tracker.k(), 3);
//! # Ok::<(), inclearn::LearnError>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::competitive::{HardWta, WtaMethod, DEFAULT_R_STEP, DEFAULT_W_STEP};
use crate::error::{LearnError, Result};
use crate::incremental::{IncrementalEigen, Kind};
use crate::kernel::{Norm, ScheduleConfig};

/// Parameters of a hard winner-take-all layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WtaConfig {
    pub method: WtaMethod,
    /// Input length.
    pub n: usize,
    /// Number of units.
    pub m: usize,
    pub w_step: f64,
    pub r_step: f64,
    /// Overrides the method's norm order (1 or 2).
    pub norm_order: Option<u32>,
    /// Overrides the sparse mask size of [`WtaMethod::HardWtaL1`].
    pub active: Option<usize>,
    pub seed: u64,
}

impl Default for WtaConfig {
    fn default() -> Self {
        Self {
            method: WtaMethod::default(),
            n: 256,
            m: 16,
            w_step: DEFAULT_W_STEP,
            r_step: DEFAULT_R_STEP,
            norm_order: None,
            active: None,
            seed: 0,
        }
    }
}

impl WtaConfig {
    pub fn new(n: usize, m: usize) -> Self {
        Self {
            n,
            m,
            ..Self::default()
        }
    }

    pub fn with_method(mut self, method: WtaMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_steps(mut self, w_step: f64, r_step: f64) -> Self {
        self.w_step = w_step;
        self.r_step = r_step;
        self
    }

    pub fn with_norm_order(mut self, order: u32) -> Self {
        self.norm_order = Some(order);
        self
    }

    pub fn with_active(mut self, active: usize) -> Self {
        self.active = Some(active);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The norm the built layer will use.
    pub fn norm(&self) -> Result<Norm> {
        match self.norm_order {
            Some(order) => Norm::from_order(order),
            None => Ok(self.method.norm()),
        }
    }

    /// # Errors
    ///
    /// Returns an error if any parameter is out of range.
    pub fn validate(&self) -> Result<()> {
        if self.n == 0 {
            return Err(LearnError::invalid_config("n must be positive"));
        }
        if self.m == 0 {
            return Err(LearnError::invalid_config("m must be positive"));
        }
        if !(self.w_step.is_finite() && self.w_step >= 0.0) {
            return Err(LearnError::invalid_config(
                "w_step must be finite and non-negative",
            ));
        }
        if !(self.r_step.is_finite() && self.r_step >= 0.0) {
            return Err(LearnError::invalid_config(
                "r_step must be finite and non-negative",
            ));
        }
        if let Some(a) = self.active {
            if a == 0 || a > self.n {
                return Err(LearnError::invalid_config(format!(
                    "active must be in 1..={}, got {}",
                    self.n, a
                )));
            }
        }
        self.norm()?;
        Ok(())
    }

    pub fn build(&self) -> Result<HardWta> {
        self.validate()?;
        HardWta::with_params(
            self.n,
            self.m,
            self.norm()?,
            self.method.init(self.n, self.active),
            self.w_step,
            self.r_step,
            self.seed,
        )
    }
}

/// Parameters of an incremental eigen-tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub dim: usize,
    pub k: usize,
    pub kind: Kind,
    pub schedule: ScheduleConfig,
    pub seed: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            dim: 16,
            k: 4,
            kind: Kind::default(),
            schedule: ScheduleConfig::default(),
            seed: 0,
        }
    }
}

impl TrackerConfig {
    pub fn new(dim: usize, k: usize) -> Self {
        Self {
            dim,
            k,
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: Kind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_schedule(mut self, schedule: ScheduleConfig) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.dim == 0 || self.k == 0 || self.k > self.dim {
            return Err(LearnError::invalid_config(format!(
                "need 1 <= k <= dim, got k={} dim={}",
                self.k, self.dim
            )));
        }
        self.schedule.build()?;
        Ok(())
    }

    /// A fresh tracker with its own schedule.
    pub fn build(&self) -> Result<IncrementalEigen> {
        self.validate()?;
        IncrementalEigen::new(
            self.dim,
            self.k,
            self.kind,
            self.schedule.build()?,
            self.seed,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(WtaConfig::default().validate().is_ok());
        assert!(TrackerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_wta_validation() {
        assert!(WtaConfig::new(0, 4).validate().is_err());
        assert!(WtaConfig::new(8, 0).validate().is_err());
        assert!(WtaConfig::new(8, 2).with_steps(-1.0, 0.1).validate().is_err());
        assert!(WtaConfig::new(8, 2).with_active(9).validate().is_err());
        assert!(matches!(
            WtaConfig::new(8, 2).with_norm_order(3).validate(),
            Err(LearnError::UnsupportedNorm(3))
        ));
    }

    #[test]
    fn test_norm_override() {
        let wta = WtaConfig::new(8, 2)
            .with_method(WtaMethod::HardWtaL2)
            .with_norm_order(1)
            .build()
            .unwrap();
        assert_eq!(wta.norm(), Norm::L1);
    }

    #[test]
    fn test_wta_json_round_trip() {
        let config = WtaConfig::new(32, 4)
            .with_method(WtaMethod::HardWtaZeroOrder)
            .with_seed(9);
        let json = config.to_json().unwrap();
        assert_eq!(WtaConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = WtaConfig::from_json(r#"{"n": 10, "m": 3, "method": "HardWtaL1"}"#).unwrap();
        assert_eq!(config.w_step, DEFAULT_W_STEP);
        assert_eq!(config.method, WtaMethod::HardWtaL1);
        assert!(config.active.is_none());
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            WtaConfig::from_json("{not json"),
            Err(LearnError::JsonParse(_))
        ));
        assert!(TrackerConfig::from_json(r#"{"dim": 2, "k": 3}"#).is_err());
    }

    #[test]
    fn test_tracker_build_uses_fresh_schedule() {
        let config = TrackerConfig::new(3, 1)
            .with_kind(Kind::Minor)
            .with_schedule(ScheduleConfig::InverseCount);
        let mut a = config.build().unwrap();
        let b = config.build().unwrap();
        a.update(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(a.samples_seen(), 1);
        assert_eq!(b.samples_seen(), 0);
        assert_eq!(b.kind(), Kind::Minor);
    }

    #[test]
    fn test_tracker_rejects_bad_schedule() {
        let config = TrackerConfig::new(3, 1).with_schedule(ScheduleConfig::Amnesic {
            n1: 50,
            n2: 10,
            m: 100.0,
            c: 2.0,
        });
        assert!(config.build().is_err());
    }
}
