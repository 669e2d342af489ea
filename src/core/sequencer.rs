//! Trial timeline: maps simulation time to trial index, phase and stimuli.
//!
//! A trial is ISI -> PRESENT -> DELAY -> RESPOND, repeated back to back.
//! Trial content is generated lazily from one seeded stream, strictly in
//! index order, and cached for the lifetime of the sequencer.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TaskConfig;
use crate::error::{check_time, Result};
use crate::pointer::SemanticPointer;
use crate::prng::Prng;
use crate::vocab::Vocabulary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Phase {
    Isi,
    Present,
    Delay,
    Respond,
}

impl Phase {
    pub const ALL: [Phase; 4] = [Phase::Isi, Phase::Present, Phase::Delay, Phase::Respond];

    pub fn label(self) -> &'static str {
        match self {
            Phase::Isi => "isi",
            Phase::Present => "present",
            Phase::Delay => "delay",
            Phase::Respond => "respond",
        }
    }
}

/// One of the two items in a trial's pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn label(self) -> &'static str {
        match self {
            Side::A => "A",
            Side::B => "B",
        }
    }
}

/// Content of one trial. Immutable once generated.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrialItem {
    /// Item A: the base draw. Presented as choice A.
    pub target_vector: SemanticPointer,
    /// Item B: blended toward A by the similarity coefficient. Presented as choice B.
    pub foil_vector: SemanticPointer,
    /// Which item is shown during PRESENT.
    pub shown_side: Side,
}

impl TrialItem {
    pub fn vector(&self, side: Side) -> &SemanticPointer {
        match side {
            Side::A => &self.target_vector,
            Side::B => &self.foil_vector,
        }
    }

    pub fn shown_vector(&self) -> &SemanticPointer {
        self.vector(self.shown_side)
    }

    /// The choice that matches what was shown.
    pub fn correct_side(&self) -> Side {
        self.shown_side
    }
}

pub struct TrialSequencer {
    cfg: TaskConfig,

    // Cumulative upper bounds of ISI, PRESENT and DELAY within a trial.
    bounds: [f64; 3],
    trial_duration: f64,

    items: Vec<TrialItem>,
    rng: Prng,

    vocab: Vocabulary,
    zero: SemanticPointer,
}

impl TrialSequencer {
    pub fn new(cfg: TaskConfig) -> Result<Self> {
        cfg.validate()?;

        let b0 = cfg.t_isi;
        let b1 = b0 + cfg.t_present;
        let b2 = b1 + cfg.t_delay;

        Ok(Self {
            bounds: [b0, b1, b2],
            trial_duration: cfg.trial_duration(),
            items: Vec::new(),
            rng: Prng::from_optional_seed(cfg.seed),
            vocab: Vocabulary::new(cfg.dims),
            zero: SemanticPointer::zero(cfg.dims),
            cfg,
        })
    }

    pub fn config(&self) -> &TaskConfig {
        &self.cfg
    }

    pub fn dims(&self) -> usize {
        self.cfg.dims
    }

    pub fn trial_duration(&self) -> f64 {
        self.trial_duration
    }

    /// Number of trial items generated so far.
    pub fn generated(&self) -> usize {
        self.items.len()
    }

    pub fn items(&self) -> &[TrialItem] {
        &self.items
    }

    pub fn item(&self, trial_index: usize) -> Option<&TrialItem> {
        self.items.get(trial_index)
    }

    /// Holds `A{i}` / `B{i}` for every generated trial.
    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Phase and trial index for `t`. Pure; generates nothing.
    pub fn resolve(&self, t: f64) -> Result<(Phase, usize)> {
        check_time(t)?;

        // Index and offset come from the same floor so they always agree,
        // even when the trial duration is not exactly representable.
        let period = self.trial_duration;
        let mut index = (t / period).floor();
        let mut local = t - index * period;
        if local < 0.0 {
            index -= 1.0;
            local += period;
        } else if local >= period {
            index += 1.0;
            local -= period;
        }
        let index = index as usize;

        let phase = if local < self.bounds[0] {
            Phase::Isi
        } else if local < self.bounds[1] {
            Phase::Present
        } else if local < self.bounds[2] {
            Phase::Delay
        } else {
            Phase::Respond
        };
        Ok((phase, index))
    }

    /// Generate items up to and including `trial_index`, in order.
    ///
    /// Existing items are never touched.
    pub fn ensure_generated(&mut self, trial_index: usize) {
        while self.items.len() <= trial_index {
            let i = self.items.len();
            let item = self.make_item();
            debug!(trial = i, shown = item.shown_side.label(), "generated trial item");

            self.vocab.push_unique(format!("A{i}"), item.target_vector.clone());
            self.vocab.push_unique(format!("B{i}"), item.foil_vector.clone());
            self.items.push(item);
        }
    }

    // Draw order (a, b, blend, side) fixes the sequence for a seed.
    fn make_item(&mut self) -> TrialItem {
        let dims = self.cfg.dims;
        let a = SemanticPointer::random(dims, &mut self.rng);
        let b = SemanticPointer::random(dims, &mut self.rng);
        let b = SemanticPointer::blend(&a, &b, self.cfg.similarity);
        let shown_side = if self.rng.gen_bool() { Side::B } else { Side::A };

        TrialItem {
            target_vector: a,
            foil_vector: b,
            shown_side,
        }
    }

    /// Trial content and phase at `t`, generating the trial if needed.
    pub fn trial(&mut self, t: f64) -> Result<(&TrialItem, Phase)> {
        let (phase, index) = self.resolve(t)?;
        self.ensure_generated(index);
        Ok((&self.items[index], phase))
    }

    /// Shown item during PRESENT, zero otherwise.
    pub fn target_signal(&mut self, t: f64) -> Result<&[f32]> {
        let (phase, index) = self.resolve(t)?;
        self.ensure_generated(index);
        Ok(match phase {
            Phase::Present => self.items[index].shown_vector().as_slice(),
            _ => self.zero.as_slice(),
        })
    }

    /// Item A during RESPOND, zero otherwise.
    pub fn choice_a_signal(&mut self, t: f64) -> Result<&[f32]> {
        self.choice_signal(t, Side::A)
    }

    /// Item B during RESPOND, zero otherwise.
    pub fn choice_b_signal(&mut self, t: f64) -> Result<&[f32]> {
        self.choice_signal(t, Side::B)
    }

    fn choice_signal(&mut self, t: f64, side: Side) -> Result<&[f32]> {
        let (phase, index) = self.resolve(t)?;
        self.ensure_generated(index);
        Ok(match phase {
            Phase::Respond => self.items[index].vector(side).as_slice(),
            _ => self.zero.as_slice(),
        })
    }

    /// 1.0 everywhere except RESPOND, where it is 0.0.
    pub fn reset_signal(&mut self, t: f64) -> Result<f32> {
        let (phase, index) = self.resolve(t)?;
        self.ensure_generated(index);
        Ok(if phase == Phase::Respond { 0.0 } else { 1.0 })
    }
}
