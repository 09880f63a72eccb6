//! Random sources for household preferences and ignition draws.
//!
//! Model code only ever sees `&mut dyn RandomSource`, so tests can script the
//! exact draw sequence and production runs can be replayed from a seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the two kinds of draws the model makes.
pub trait RandomSource {
    /// Uniform draw on `[0, 1)`.
    fn uniform(&mut self) -> f64;

    /// Uniform integer on `[start, end)`. Returns `start` for an empty range.
    fn randrange(&mut self, start: i64, end: i64) -> i64;
}

/// Seeded `StdRng` stream.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    seed: u64,
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw a fresh seed from the thread RNG. The seed is kept so the run can
    /// be reproduced.
    pub fn from_entropy() -> Self {
        Self::new(rand::random::<u64>())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn uniform(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    fn randrange(&mut self, start: i64, end: i64) -> i64 {
        if end <= start {
            return start;
        }
        self.rng.random_range(start..end)
    }
}

/// Replays fixed sequences, cycling when exhausted.
///
/// Integer draws are clamped into the requested range so a script written for
/// one call site cannot produce out-of-range preferences at another.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    uniforms: Vec<f64>,
    integers: Vec<i64>,
    next_uniform: usize,
    next_integer: usize,
}

impl ScriptedRandom {
    pub fn new(uniforms: Vec<f64>, integers: Vec<i64>) -> Self {
        Self {
            uniforms,
            integers,
            next_uniform: 0,
            next_integer: 0,
        }
    }

    /// Number of uniform draws served so far.
    pub fn uniform_draws(&self) -> usize {
        self.next_uniform
    }
}

impl RandomSource for ScriptedRandom {
    fn uniform(&mut self) -> f64 {
        if self.uniforms.is_empty() {
            return 0.0;
        }
        let v = self.uniforms[self.next_uniform % self.uniforms.len()];
        self.next_uniform += 1;
        v
    }

    fn randrange(&mut self, start: i64, end: i64) -> i64 {
        if end <= start || self.integers.is_empty() {
            return start;
        }
        let v = self.integers[self.next_integer % self.integers.len()];
        self.next_integer += 1;
        v.clamp(start, end - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_streams_repeat() {
        let mut a = SeededRandom::new(7);
        let mut b = SeededRandom::new(7);
        for _ in 0..32 {
            assert_eq!(a.uniform(), b.uniform());
            assert_eq!(a.randrange(16, 23), b.randrange(16, 23));
        }
    }

    #[test]
    fn seeded_draws_stay_in_range() {
        let mut rng = SeededRandom::new(11);
        for _ in 0..1000 {
            let u = rng.uniform();
            assert!((0.0..1.0).contains(&u));
            let h = rng.randrange(16, 23);
            assert!((16..23).contains(&h));
        }
    }

    #[test]
    fn empty_range_returns_start() {
        let mut rng = SeededRandom::new(3);
        assert_eq!(rng.randrange(5, 5), 5);
    }

    #[test]
    fn scripted_cycles_and_clamps() {
        let mut rng = ScriptedRandom::new(vec![0.25, 0.75], vec![30, 1]);
        assert_eq!(rng.uniform(), 0.25);
        assert_eq!(rng.uniform(), 0.75);
        assert_eq!(rng.uniform(), 0.25);
        assert_eq!(rng.uniform_draws(), 3);
        assert_eq!(rng.randrange(16, 23), 22);
        assert_eq!(rng.randrange(1, 3), 1);
    }

    #[test]
    fn entropy_seed_is_reported() {
        let rng = SeededRandom::from_entropy();
        let mut replay = SeededRandom::new(rng.seed());
        let mut original = rng.clone();
        assert_eq!(original.uniform(), replay.uniform());
    }
}
