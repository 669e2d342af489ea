//! Fixed-step driver for `DmtsModel`.
//!
//! Time is `n * dt` (never accumulated) so step `n` always lands on the same
//! trial and phase.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::stats::TaskStats;
use super::{Comparator, DmtsModel, DotProduct, StepSample};
use crate::config::{ModelConfig, StepMethod};
use crate::error::Result;
use crate::integrate::{Euler, Rk4};
use crate::sequencer::{Phase, Side};

/// Subsampled view of the run.
pub type Probe = StepSample;

/// How one trial ended.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrialOutcome {
    pub trial: usize,
    pub shown: Side,
    pub decided: Option<Side>,
    /// Evidence at the last RESPOND step.
    pub evidence: f32,
    pub correct: bool,
    // Vocabulary key closest to working memory at the end of the trial.
    pub memory_readout: Option<String>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RunReport {
    pub config: ModelConfig,
    pub outcomes: Vec<TrialOutcome>,
    pub probes: Vec<Probe>,
    pub stats: TaskStats,
}

pub struct Simulator<C: Comparator = DotProduct> {
    cfg: ModelConfig,
    model: DmtsModel<C>,

    steps: u64,
    prev: Option<StepSample>,

    outcomes: Vec<TrialOutcome>,
    probes: Vec<Probe>,
    stats: TaskStats,
}

impl Simulator<DotProduct> {
    pub fn new(cfg: ModelConfig) -> Result<Self> {
        let model = DmtsModel::new(&cfg)?;
        Ok(Self::from_model(cfg, model))
    }
}

impl<C: Comparator> Simulator<C> {
    /// Model and run loop built from the same `cfg`, comparing with `comparator`.
    pub fn with_comparator(cfg: ModelConfig, comparator: C) -> Result<Self> {
        let model = DmtsModel::with_comparator(&cfg, comparator)?;
        Ok(Self::from_model(cfg, model))
    }

    fn from_model(cfg: ModelConfig, model: DmtsModel<C>) -> Self {
        Self {
            cfg,
            model,
            steps: 0,
            prev: None,
            outcomes: Vec::new(),
            probes: Vec::new(),
            stats: TaskStats::new(),
        }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.cfg
    }

    pub fn model(&self) -> &DmtsModel<C> {
        &self.model
    }

    /// Time of the next step.
    pub fn time(&self) -> f64 {
        self.steps as f64 * self.cfg.dt
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn last_sample(&self) -> Option<&StepSample> {
        self.prev.as_ref()
    }

    pub fn outcomes(&self) -> &[TrialOutcome] {
        &self.outcomes
    }

    pub fn probes(&self) -> &[Probe] {
        &self.probes
    }

    pub fn stats(&self) -> &TaskStats {
        &self.stats
    }

    /// One fixed step. Returns the outcome of a trial if this step closed one.
    pub fn step(&mut self) -> Result<Option<TrialOutcome>> {
        let t = self.time();
        let dt = self.cfg.dt as f32;

        // Close the previous trial before this step's reset starts pulling
        // the evidence down.
        let (phase, _) = self.model.sequencer().resolve(t)?;
        let closed = self
            .prev
            .filter(|prev| prev.phase == Phase::Respond && phase != Phase::Respond)
            .and_then(|prev| self.close_trial(prev));

        let sample = match self.cfg.method {
            StepMethod::Euler => self.model.step(&Euler, t, dt)?,
            StepMethod::Rk4 => self.model.step(&Rk4, t, dt)?,
        };

        if self.cfg.probe_every > 0 && self.steps % self.cfg.probe_every as u64 == 0 {
            self.probes.push(sample);
        }

        self.prev = Some(sample);
        self.steps += 1;
        Ok(closed)
    }

    fn close_trial(&mut self, last: StepSample) -> Option<TrialOutcome> {
        // `last` was resolved inside this trial, so its item was generated.
        let Some(item) = self.model.sequencer().item(last.trial) else {
            debug_assert!(false, "closing trial {} that was never generated", last.trial);
            return None;
        };
        let shown = item.correct_side();

        let decided = self
            .model
            .accumulator()
            .decision(self.cfg.decision_threshold);
        let correct = decided == Some(shown);

        let memory_readout = self
            .model
            .sequencer()
            .vocab()
            .nearest(self.model.memory().content().as_slice())
            .map(|(name, _)| name.to_string());

        self.stats.record_trial(shown, decided, last.evidence);

        let outcome = TrialOutcome {
            trial: last.trial,
            shown,
            decided,
            evidence: last.evidence,
            correct,
            memory_readout,
        };
        info!(
            trial = outcome.trial,
            shown = shown.label(),
            decided = decided.map(Side::label).unwrap_or("-"),
            evidence = outcome.evidence,
            correct,
            accuracy = self.stats.accuracy(),
            "trial complete"
        );
        self.outcomes.push(outcome.clone());
        Some(outcome)
    }

    /// Step until `cfg.trials` trials have completed.
    pub fn run(&mut self) -> Result<()> {
        let target = self.cfg.trials;
        debug!(trials = target, dt = self.cfg.dt, "run start");
        while self.outcomes.len() < target {
            self.step()?;
        }
        Ok(())
    }

    /// Consume the simulator and hand back everything it recorded.
    pub fn into_report(self) -> RunReport {
        RunReport {
            config: self.cfg,
            outcomes: self.outcomes,
            probes: self.probes,
            stats: self.stats,
        }
    }
}
