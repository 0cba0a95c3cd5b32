use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub trait RandomSource {
    /// Uniform draw in `[0, 1)`.
    fn next_unit(&mut self) -> f32;
    /// Uniform index in `[0, len)`; returns 0 when `len` is 0.
    fn next_index(&mut self, len: usize) -> usize;
}

/// Seeded once at startup and never reseeded.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    seed: u64,
    rng: ChaCha8Rng,
}

impl SeededRandom {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self::from_seed(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    fn next_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }
}

/// Replays fixed draws. Once exhausted, units read as 0.999 so probability
/// gates stay closed, and indices read as 0.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ScriptedRandom {
    units: std::collections::VecDeque<f32>,
    indices: std::collections::VecDeque<usize>,
}

#[cfg(test)]
impl ScriptedRandom {
    pub(crate) fn new(
        units: impl IntoIterator<Item = f32>,
        indices: impl IntoIterator<Item = usize>,
    ) -> Self {
        Self {
            units: units.into_iter().collect(),
            indices: indices.into_iter().collect(),
        }
    }

    pub(crate) fn remaining_units(&self) -> usize {
        self.units.len()
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f32 {
        self.units.pop_front().unwrap_or(0.999)
    }

    fn next_index(&mut self, len: usize) -> usize {
        let index = self.indices.pop_front().unwrap_or(0);
        if len == 0 {
            0
        } else {
            index.min(len - 1)
        }
    }
}
