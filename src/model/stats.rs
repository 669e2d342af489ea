use std::collections::VecDeque;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::sequencer::Side;

const RECENT_WINDOW: usize = 200;

/// Per shown side: how often it came up and how often it was matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SideTally {
    pub shown: u32,
    pub correct: u32,
}

impl SideTally {
    pub fn accuracy(&self) -> f32 {
        if self.shown == 0 {
            0.5
        } else {
            self.correct as f32 / self.shown as f32
        }
    }
}

/// Running accuracy and evidence summary over completed trials.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TaskStats {
    pub correct: u32,
    pub incorrect: u32,
    // Trials that ended inside the decision dead-band.
    pub undecided: u32,
    pub trials: u32,

    pub shown_a: SideTally,
    pub shown_b: SideTally,

    // Sum of |evidence| at trial close, for the mean.
    pub evidence_abs_sum: f64,

    pub recent: VecDeque<bool>,
}

impl TaskStats {
    pub fn new() -> Self {
        Self {
            correct: 0,
            incorrect: 0,
            undecided: 0,
            trials: 0,
            shown_a: SideTally::default(),
            shown_b: SideTally::default(),
            evidence_abs_sum: 0.0,
            recent: VecDeque::with_capacity(RECENT_WINDOW),
        }
    }

    /// An undecided trial counts as incorrect and is also tallied as undecided.
    pub fn record_trial(&mut self, shown: Side, decided: Option<Side>, evidence: f32) {
        let is_correct = decided == Some(shown);
        if is_correct {
            self.correct += 1;
        } else {
            self.incorrect += 1;
        }
        if decided.is_none() {
            self.undecided += 1;
        }

        let tally = match shown {
            Side::A => &mut self.shown_a,
            Side::B => &mut self.shown_b,
        };
        tally.shown += 1;
        if is_correct {
            tally.correct += 1;
        }

        self.evidence_abs_sum += f64::from(evidence.abs());

        self.recent.push_back(is_correct);
        if self.recent.len() > RECENT_WINDOW {
            self.recent.pop_front();
        }

        self.trials += 1;
    }

    pub fn accuracy(&self) -> f32 {
        let total = self.correct + self.incorrect;
        if total == 0 {
            0.5
        } else {
            self.correct as f32 / total as f32
        }
    }

    /// Accuracy over trials where `side` was the shown item.
    pub fn accuracy_by_side(&self, side: Side) -> f32 {
        match side {
            Side::A => self.shown_a.accuracy(),
            Side::B => self.shown_b.accuracy(),
        }
    }

    /// Mean |evidence| at trial close; 0 before any trial.
    pub fn mean_abs_evidence(&self) -> f32 {
        if self.trials == 0 {
            0.0
        } else {
            (self.evidence_abs_sum / f64::from(self.trials)) as f32
        }
    }

    pub fn recent_rate(&self) -> f32 {
        if self.recent.is_empty() {
            return 0.5;
        }
        let correct_count = self.recent.iter().filter(|&&x| x).count();
        correct_count as f32 / self.recent.len() as f32
    }

    pub fn last_100_rate(&self) -> f32 {
        if self.recent.len() < 10 {
            return self.recent_rate();
        }
        let window = self.recent.len().min(100);
        let correct_count = self
            .recent
            .iter()
            .skip(self.recent.len() - window)
            .filter(|&&x| x)
            .count();
        correct_count as f32 / window as f32
    }
}

impl Default for TaskStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stats_report_chance() {
        let s = TaskStats::new();
        assert_eq!(s.accuracy(), 0.5);
        assert_eq!(s.recent_rate(), 0.5);
        assert_eq!(s.accuracy_by_side(Side::A), 0.5);
        assert_eq!(s.mean_abs_evidence(), 0.0);
    }

    #[test]
    fn undecided_counts_against_accuracy() {
        let mut s = TaskStats::new();
        s.record_trial(Side::A, Some(Side::A), -0.5);
        s.record_trial(Side::A, None, 0.0);
        assert_eq!(s.correct, 1);
        assert_eq!(s.incorrect, 1);
        assert_eq!(s.undecided, 1);
        assert_eq!(s.accuracy(), 0.5);
    }

    #[test]
    fn accuracy_is_split_by_shown_side() {
        let mut s = TaskStats::new();
        s.record_trial(Side::A, Some(Side::A), -0.4);
        s.record_trial(Side::A, Some(Side::A), -0.4);
        s.record_trial(Side::B, Some(Side::A), -0.1);
        s.record_trial(Side::B, Some(Side::B), 0.3);

        assert_eq!(s.shown_a, SideTally { shown: 2, correct: 2 });
        assert_eq!(s.shown_b, SideTally { shown: 2, correct: 1 });
        assert_eq!(s.accuracy_by_side(Side::A), 1.0);
        assert_eq!(s.accuracy_by_side(Side::B), 0.5);
        assert_eq!(s.accuracy(), 0.75);
    }

    #[test]
    fn mean_evidence_ignores_sign() {
        let mut s = TaskStats::new();
        s.record_trial(Side::A, Some(Side::A), -0.25);
        s.record_trial(Side::B, Some(Side::B), 0.75);
        assert!((s.mean_abs_evidence() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn recent_window_is_bounded() {
        let mut s = TaskStats::new();
        for i in 0..250 {
            let decided = if i % 2 == 0 { Side::A } else { Side::B };
            s.record_trial(Side::A, Some(decided), 0.1);
        }
        assert_eq!(s.recent.len(), RECENT_WINDOW);
        assert_eq!(s.trials, 250);
        // Oldest entries were dropped from the front.
        assert_eq!(s.recent.front(), Some(&true));
        assert!((s.last_100_rate() - 0.5).abs() < 1e-6);
    }
}
