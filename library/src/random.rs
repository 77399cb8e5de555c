//! Injectable randomness for evaluation.
//!
//! Every random decision the engine makes goes through a [`RandomSource`]
//! passed in by the caller, so tests can replay an exact draw sequence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait RandomSource {
    /// Uniform draw in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        let draw = self.next_f64();
        ((draw * len as f64) as usize).min(len.saturating_sub(1))
    }
}

/// Fisher-Yates shuffle, drawing `items.len() - 1` times.
pub fn shuffle<T>(rng: &mut dyn RandomSource, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.index(i + 1);
        items.swap(i, j);
    }
}

/// Seedable source backed by `StdRng`.
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }
}

/// Replays a fixed list of draws, wrapping around at the end.
#[derive(Clone, Debug)]
pub struct SequenceRandom {
    draws: Vec<f64>,
    position: usize,
    consumed: usize,
}

impl SequenceRandom {
    pub fn new(draws: Vec<f64>) -> Self {
        let draws = draws
            .into_iter()
            .map(|d| if d.is_finite() { d.clamp(0.0, 0.999_999_999) } else { 0.0 })
            .collect();
        Self {
            draws,
            position: 0,
            consumed: 0,
        }
    }

    /// Number of draws taken so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

impl RandomSource for SequenceRandom {
    fn next_f64(&mut self) -> f64 {
        self.consumed += 1;
        if self.draws.is_empty() {
            return 0.0;
        }
        let draw = self.draws[self.position];
        self.position = (self.position + 1) % self.draws.len();
        draw
    }
}
