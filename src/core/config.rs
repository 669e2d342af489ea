//! Task, accumulator and run configuration.
//!
//! Everything here is fixed at construction. `validate()` is the only place
//! configuration errors are raised.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Phase durations (seconds) and stimulus parameters for the trial timeline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TaskConfig {
    /// Vector dimensionality D.
    pub dims: usize,

    pub t_isi: f64,
    pub t_present: f64,
    pub t_delay: f64,
    pub t_respond: f64,

    /// How close the foil is to the target, in [0, 1].
    pub similarity: f32,

    // None means nondeterministic trial content.
    pub seed: Option<u64>,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            dims: 32,
            t_isi: 0.5,
            t_present: 0.5,
            t_delay: 1.0,
            t_respond: 1.0,
            similarity: 0.0,
            seed: None,
        }
    }
}

impl TaskConfig {
    pub fn trial_duration(&self) -> f64 {
        self.t_isi + self.t_present + self.t_delay + self.t_respond
    }

    pub fn validate(&self) -> Result<()> {
        if self.dims == 0 {
            return Err(Error::config("dims", "must be > 0"));
        }
        for (field, d) in [
            ("t_isi", self.t_isi),
            ("t_present", self.t_present),
            ("t_delay", self.t_delay),
            ("t_respond", self.t_respond),
        ] {
            if !(d.is_finite() && d > 0.0) {
                return Err(Error::config(field, format!("must be finite and > 0, got {d}")));
            }
        }
        if !(0.0..=1.0).contains(&self.similarity) {
            return Err(Error::config(
                "similarity",
                format!("must be in [0, 1], got {}", self.similarity),
            ));
        }
        Ok(())
    }
}

/// Leaky integrator parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AccumulatorConfig {
    /// Scale on the comparison inputs (B minus A).
    pub gain: f32,

    /// Leak time-constant (seconds).
    pub tau: f32,

    /// Extra decay rate (1/s) applied while reset is active.
    pub suppression: f32,
}

impl Default for AccumulatorConfig {
    fn default() -> Self {
        Self {
            gain: 0.2,
            tau: 0.1,
            suppression: 100.0,
        }
    }
}

impl AccumulatorConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.tau.is_finite() && self.tau > 0.0) {
            return Err(Error::config("tau", format!("must be finite and > 0, got {}", self.tau)));
        }
        if !(self.gain.is_finite() && self.gain >= 0.0) {
            return Err(Error::config("gain", format!("must be finite and >= 0, got {}", self.gain)));
        }
        if !(self.suppression.is_finite() && self.suppression >= 0.0) {
            return Err(Error::config(
                "suppression",
                format!("must be finite and >= 0, got {}", self.suppression),
            ));
        }
        Ok(())
    }
}

/// Which `Stepper` the simulator uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StepMethod {
    #[default]
    Euler,
    Rk4,
}

/// Full model: task + accumulator + reference collaborators + run loop.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ModelConfig {
    pub task: TaskConfig,
    pub accumulator: AccumulatorConfig,

    /// Input time-constant of the working memory integrator (seconds).
    pub memory_tau: f32,

    pub dt: f64,
    pub trials: usize,

    // Record a probe sample every N steps; 0 disables probing.
    pub probe_every: usize,

    // |evidence| below this at the end of RESPOND counts as no decision.
    pub decision_threshold: f32,

    pub method: StepMethod,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            task: TaskConfig::default(),
            accumulator: AccumulatorConfig::default(),
            memory_tau: 0.1,
            dt: 0.001,
            trials: 10,
            probe_every: 10,
            decision_threshold: 1e-3,
            method: StepMethod::Euler,
        }
    }
}

impl ModelConfig {
    pub fn validate(&self) -> Result<()> {
        self.task.validate()?;
        self.accumulator.validate()?;
        if !(self.memory_tau.is_finite() && self.memory_tau > 0.0) {
            return Err(Error::config("memory_tau", "must be finite and > 0"));
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(Error::config("dt", "must be finite and > 0"));
        }
        let shortest = self
            .task
            .t_isi
            .min(self.task.t_present)
            .min(self.task.t_delay)
            .min(self.task.t_respond);
        if self.dt >= shortest {
            return Err(Error::config("dt", "must be shorter than every phase"));
        }
        if !(self.decision_threshold.is_finite() && self.decision_threshold >= 0.0) {
            return Err(Error::config("decision_threshold", "must be finite and >= 0"));
        }
        Ok(())
    }

    #[cfg(feature = "serde")]
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    #[cfg(feature = "serde")]
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Self::from_json_str(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(TaskConfig::default().validate().is_ok());
        assert!(AccumulatorConfig::default().validate().is_ok());
        assert!(ModelConfig::default().validate().is_ok());
        assert_eq!(TaskConfig::default().trial_duration(), 3.0);
    }

    #[test]
    fn rejects_bad_task_values() {
        let bad = [
            TaskConfig { dims: 0, ..Default::default() },
            TaskConfig { t_isi: 0.0, ..Default::default() },
            TaskConfig { t_delay: -1.0, ..Default::default() },
            TaskConfig { t_respond: f64::NAN, ..Default::default() },
            TaskConfig { similarity: 1.5, ..Default::default() },
            TaskConfig { similarity: -0.1, ..Default::default() },
        ];
        for cfg in bad {
            assert!(
                matches!(cfg.validate(), Err(Error::InvalidConfig { .. })),
                "{cfg:?}"
            );
        }
    }

    #[test]
    fn rejects_bad_accumulator_values() {
        let bad = [
            AccumulatorConfig { tau: 0.0, ..Default::default() },
            AccumulatorConfig { tau: -0.1, ..Default::default() },
            AccumulatorConfig { gain: -0.2, ..Default::default() },
            AccumulatorConfig { suppression: f32::INFINITY, ..Default::default() },
        ];
        for cfg in bad {
            assert!(cfg.validate().is_err(), "{cfg:?}");
        }
        // Zero gain is allowed: the integrator then only leaks.
        assert!(AccumulatorConfig { gain: 0.0, ..Default::default() }.validate().is_ok());
    }

    #[test]
    fn rejects_dt_longer_than_a_phase() {
        let cfg = ModelConfig { dt: 0.5, ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let cfg = ModelConfig::from_json_str(
            r#"{ "task": { "similarity": 0.5, "seed": 4 }, "trials": 3, "method": "rk4" }"#,
        )
        .unwrap();
        assert_eq!(cfg.task.similarity, 0.5);
        assert_eq!(cfg.task.seed, Some(4));
        assert_eq!(cfg.task.dims, 32);
        assert_eq!(cfg.trials, 3);
        assert_eq!(cfg.method, StepMethod::Rk4);
        assert_eq!(cfg.accumulator, AccumulatorConfig::default());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_with_invalid_values_is_a_config_error() {
        let err = ModelConfig::from_json_str(r#"{ "task": { "similarity": 2.0 } }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { field: "similarity", .. }));
    }
}
