#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::model::simulator::Simulator;
use crate::model::Comparator;
use crate::sequencer::Phase;

/// A read-only snapshot of where a run is.
///
/// Design intent:
/// - Observers cannot mutate or steer the simulator.
/// - Snapshotting is *on-demand* and can allocate; the step loop stays unchanged.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModelSnapshot {
    pub steps: u64,
    pub t: f64,

    /// Trial and phase of the last completed step (None before the first step).
    pub trial: Option<usize>,
    pub phase: Option<Phase>,

    pub evidence: f32,
    pub memory_norm: f32,
    pub memory_readout: Option<(String, f32)>,

    pub generated_trials: usize,
    pub completed_trials: usize,
    pub accuracy: f32,
}

pub struct SimulatorAdapter<'a, C: Comparator> {
    sim: &'a Simulator<C>,
}

impl<'a, C: Comparator> SimulatorAdapter<'a, C> {
    pub fn new(sim: &'a Simulator<C>) -> Self {
        Self { sim }
    }

    pub fn snapshot(&self) -> ModelSnapshot {
        let model = self.sim.model();
        let memory = model.memory().content();
        let last = self.sim.last_sample();

        ModelSnapshot {
            steps: self.sim.steps(),
            t: self.sim.time(),
            trial: last.map(|s| s.trial),
            phase: last.map(|s| s.phase),

            evidence: model.accumulator().evidence(),
            memory_norm: memory.norm(),
            memory_readout: model
                .sequencer()
                .vocab()
                .nearest(memory.as_slice())
                .map(|(name, score)| (name.to_string(), score)),

            generated_trials: model.sequencer().generated(),
            completed_trials: self.sim.outcomes().len(),
            accuracy: self.sim.stats().accuracy(),
        }
    }
}
