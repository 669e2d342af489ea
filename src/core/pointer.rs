//! Semantic pointers: dense D-dimensional stimulus vectors.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::prng::Prng;

/// A dense real-valued vector in the shared stimulus space.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SemanticPointer {
    values: Vec<f32>,
}

impl SemanticPointer {
    /// Zero vector.
    pub fn zero(dims: usize) -> Self {
        Self {
            values: vec![0.0; dims],
        }
    }

    pub fn from_vec(values: Vec<f32>) -> Self {
        Self { values }
    }

    /// Random unit-length pointer: `dims` standard-normal draws, normalized.
    ///
    /// Consumes exactly `dims` gaussian draws from `rng`.
    pub fn random(dims: usize, rng: &mut Prng) -> Self {
        let raw: Vec<f64> = (0..dims).map(|_| rng.next_gaussian()).collect();
        let norm = raw.iter().map(|x| x * x).sum::<f64>().sqrt();
        let values = if norm > 0.0 {
            raw.iter().map(|x| (x / norm) as f32).collect()
        } else {
            vec![0.0; dims]
        };
        Self { values }
    }

    /// `weight * a + (1 - weight) * b`, without renormalizing.
    pub fn blend(a: &SemanticPointer, b: &SemanticPointer, weight: f32) -> Self {
        debug_assert_eq!(a.dims(), b.dims());
        let values = a
            .values
            .iter()
            .zip(&b.values)
            .map(|(&x, &y)| weight * x + (1.0 - weight) * y)
            .collect();
        Self { values }
    }

    #[inline]
    pub fn dims(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn norm(&self) -> f32 {
        dot(&self.values, &self.values).sqrt()
    }

    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|&v| v == 0.0)
    }
}

#[inline]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Cosine similarity; 0 when either side is (near) zero. Clamped to [-1, 1].
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let na = dot(a, a).sqrt();
    let nb = dot(b, b).sqrt();
    let denom = na * nb;
    if denom < 1e-12 {
        return 0.0;
    }
    (dot(a, b) / denom).clamp(-1.0, 1.0)
}
