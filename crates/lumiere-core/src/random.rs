//! Injectable randomness for quiz generation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform random numbers.
pub trait RandomSource: Send {
    /// Uniform float in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform index in `0..bound`. `bound` must be non-zero.
    fn index_below(&mut self, bound: usize) -> usize {
        ((self.next_f64() * bound as f64) as usize).min(bound.saturating_sub(1))
    }
}

/// `rand`-backed source, OS-seeded or seeded for reproducible runs.
pub struct StdRandom(StdRng);

impl StdRandom {
    pub fn from_os() -> Self {
        Self(StdRng::from_os_rng())
    }

    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for StdRandom {
    fn next_f64(&mut self) -> f64 {
        self.0.random::<f64>()
    }

    fn index_below(&mut self, bound: usize) -> usize {
        self.0.random_range(0..bound)
    }
}

/// Replays a fixed sequence of floats, cycling when exhausted.
/// An empty sequence always yields `0.0`.
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    values: Vec<f64>,
    position: usize,
}

impl SequenceRandom {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            position: 0,
        }
    }
}

impl RandomSource for SequenceRandom {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.position % self.values.len()];
        self.position += 1;
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

/// Unbiased in-place Fisher–Yates shuffle.
pub fn shuffle<T>(items: &mut [T], random: &mut dyn RandomSource) {
    for i in (1..items.len()).rev() {
        let j = random.index_below(i + 1);
        items.swap(i, j);
    }
}
