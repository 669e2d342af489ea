//! Reference wiring of the full task.
//!
//! The sequencer and accumulator are the real machinery; working memory and
//! comparison are small stand-ins for whatever substrate hosts the model.
//! `Comparator` is the seam where another substrate plugs in.

pub mod simulator;
pub mod stats;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::accumulator::{AccumulatorDriver, Drive};
use crate::config::ModelConfig;
use crate::error::{Error, Result};
use crate::integrate::Stepper;
use crate::pointer::{dot, SemanticPointer};
use crate::sequencer::{Phase, TrialSequencer};

/// Scores how well the remembered target matches a displayed choice.
pub trait Comparator {
    fn compare(&self, memory: &[f32], choice: &[f32]) -> f32;
}

/// Plain dot product, as a compare network would compute.
#[derive(Debug, Clone, Copy, Default)]
pub struct DotProduct;

impl Comparator for DotProduct {
    #[inline]
    fn compare(&self, memory: &[f32], choice: &[f32]) -> f32 {
        dot(memory, choice)
    }
}

/// Perfect integrator holding the presented target across the delay.
///
/// `dm/dt = input / tau_in`. Nothing clears it between trials.
#[derive(Debug, Clone)]
pub struct WorkingMemory {
    content: SemanticPointer,
    tau_in: f32,
}

impl WorkingMemory {
    pub fn new(dims: usize, tau_in: f32) -> Result<Self> {
        if !(tau_in.is_finite() && tau_in > 0.0) {
            return Err(Error::config("memory_tau", "must be finite and > 0"));
        }
        Ok(Self {
            content: SemanticPointer::zero(dims),
            tau_in,
        })
    }

    pub fn content(&self) -> &SemanticPointer {
        &self.content
    }

    pub fn step<S: Stepper>(&mut self, stepper: &S, dt: f32, input: &[f32]) {
        debug_assert_eq!(input.len(), self.content.dims());
        let values: Vec<f32> = self
            .content
            .as_slice()
            .iter()
            .zip(input)
            .map(|(&m, &u)| stepper.advance(m, dt, |_| u / self.tau_in))
            .collect();
        self.content = SemanticPointer::from_vec(values);
    }
}

/// What one model step saw.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StepSample {
    pub t: f64,
    pub trial: usize,
    pub phase: Phase,
    pub compare_a: f32,
    pub compare_b: f32,
    pub reset: f32,
    /// Evidence after the step.
    pub evidence: f32,
}

pub struct DmtsModel<C: Comparator = DotProduct> {
    sequencer: TrialSequencer,
    memory: WorkingMemory,
    comparator: C,
    accumulator: AccumulatorDriver,
}

impl DmtsModel<DotProduct> {
    pub fn new(cfg: &ModelConfig) -> Result<Self> {
        Self::with_comparator(cfg, DotProduct)
    }
}

impl<C: Comparator> DmtsModel<C> {
    pub fn with_comparator(cfg: &ModelConfig, comparator: C) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            sequencer: TrialSequencer::new(cfg.task.clone())?,
            memory: WorkingMemory::new(cfg.task.dims, cfg.memory_tau)?,
            comparator,
            accumulator: AccumulatorDriver::new(cfg.accumulator)?,
        })
    }

    pub fn sequencer(&self) -> &TrialSequencer {
        &self.sequencer
    }

    pub fn memory(&self) -> &WorkingMemory {
        &self.memory
    }

    pub fn accumulator(&self) -> &AccumulatorDriver {
        &self.accumulator
    }

    /// Advance the whole model from `t` to `t + dt`.
    ///
    /// Signals are read at `t` against the memory content at `t`, then memory
    /// and evidence are advanced together.
    pub fn step<S: Stepper>(&mut self, stepper: &S, t: f64, dt: f32) -> Result<StepSample> {
        let (phase, trial) = self.sequencer.resolve(t)?;

        let memory = self.memory.content().as_slice();
        let compare_a = self
            .comparator
            .compare(memory, self.sequencer.choice_a_signal(t)?);
        let compare_b = self
            .comparator
            .compare(memory, self.sequencer.choice_b_signal(t)?);
        let reset = self.sequencer.reset_signal(t)?;

        let target = self.sequencer.target_signal(t)?;
        self.memory.step(stepper, dt, target);

        let evidence = self
            .accumulator
            .step(stepper, dt, Drive::new(compare_a, compare_b, reset));

        Ok(StepSample {
            t,
            trial,
            phase,
            compare_a,
            compare_b,
            reset,
            evidence,
        })
    }
}
