//! Leaky evidence accumulator.
//!
//! `dE/dt = -E/tau + gain * (signal_b - signal_a) - reset * suppression * E`
//!
//! Positive evidence favors choice B. Reset is a soft, asymptotic pull toward
//! zero; evidence is never snapped or clamped.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::AccumulatorConfig;
use crate::error::Result;
use crate::integrate::Stepper;
use crate::sequencer::Side;

/// Inputs held for one integration step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Drive {
    pub signal_a: f32,
    pub signal_b: f32,
    /// 1.0 suppresses, 0.0 releases. Intermediate values scale the suppression.
    pub reset: f32,
}

impl Drive {
    pub fn new(signal_a: f32, signal_b: f32, reset: f32) -> Self {
        Self {
            signal_a,
            signal_b,
            reset,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AccumulatorDriver {
    cfg: AccumulatorConfig,
    evidence: f32,
}

impl AccumulatorDriver {
    pub fn new(cfg: AccumulatorConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self { cfg, evidence: 0.0 })
    }

    pub fn config(&self) -> &AccumulatorConfig {
        &self.cfg
    }

    #[inline]
    pub fn evidence(&self) -> f32 {
        self.evidence
    }

    pub fn set_evidence(&mut self, evidence: f32) {
        self.evidence = evidence;
    }

    /// Right-hand side of the dynamics at `evidence` under `drive`.
    #[inline]
    pub fn derivative(&self, evidence: f32, drive: Drive) -> f32 {
        let leak = -evidence / self.cfg.tau;
        let inject = self.cfg.gain * (drive.signal_b - drive.signal_a);
        let suppress = -drive.reset * self.cfg.suppression * evidence;
        leak + inject + suppress
    }

    /// Advance by `dt` with `drive` held constant.
    pub fn step<S: Stepper>(&mut self, stepper: &S, dt: f32, drive: Drive) -> f32 {
        self.evidence = stepper.advance(self.evidence, dt, |e| self.derivative(e, drive));
        self.evidence
    }

    /// Which choice the evidence currently favors, if it clears `threshold`.
    pub fn decision(&self, threshold: f32) -> Option<Side> {
        if self.evidence > threshold {
            Some(Side::B)
        } else if self.evidence < -threshold {
            Some(Side::A)
        } else {
            None
        }
    }
}
