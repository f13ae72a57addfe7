//! Pluggable random sources and the sampling helpers every generator draws through.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

/// Stream used for static level content (buildings, clouds, skyline).
pub const LEVEL_STREAM: u64 = 1;
/// Stream used by the bird flock spawner.
pub const BIRD_STREAM: u64 = 2;
/// Stream used by the plane spawner.
pub const PLANE_STREAM: u64 = 3;

const UNIT_SCALE: f64 = 1.0 / (1_u64 << 53) as f64;

/// A source of uniform draws in `[0, 1)`.
///
/// Only [`RandomSource::next_unit`] is required; range sampling, categorical choice and
/// chance gates are derived from it so that scripted sources reproduce exactly the same
/// decisions as seeded ones.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;

    fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        min + (self.next_unit() as f32) * (max - min)
    }

    fn range_f64(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_unit() * (max - min)
    }

    /// Uniform integer in `min..=max`.
    fn range_usize(&mut self, min: usize, max: usize) -> usize {
        debug_assert!(min <= max);
        min + self.index(max - min + 1)
    }

    /// Uniform index in `0..len`. Returns 0 for an empty range.
    fn index(&mut self, len: usize) -> usize {
        let scaled = (self.next_unit() * len as f64) as usize;
        scaled.min(len.saturating_sub(1))
    }

    fn chance(&mut self, probability: f32) -> bool {
        self.next_unit() < f64::from(probability)
    }

    fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = self.index(items.len());
        items.get(index)
    }

    /// Picks an index with probability proportional to its weight. Non-positive weights
    /// are never picked; `None` when no weight is positive.
    fn weighted_index(&mut self, weights: &[f32]) -> Option<usize> {
        let total: f64 = weights.iter().filter(|&&w| w > 0.0).map(|&w| f64::from(w)).sum();
        if total <= 0.0 {
            return None;
        }

        let roll = self.next_unit() * total;
        let mut cumulative = 0.0;
        let mut last_positive = None;
        for (index, &weight) in weights.iter().enumerate() {
            if weight <= 0.0 {
                continue;
            }
            cumulative += f64::from(weight);
            last_positive = Some(index);
            if roll < cumulative {
                return Some(index);
            }
        }
        last_positive
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Seeded production source backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct SceneRng {
    inner: ChaCha8Rng,
}

impl SceneRng {
    pub fn from_seed(seed: u64) -> Self {
        Self { inner: ChaCha8Rng::seed_from_u64(seed) }
    }

    /// Independent source for one named stream of a run seed, so that bird spawning
    /// never perturbs level generation for the same seed.
    pub fn for_stream(seed: u64, stream: u64) -> Self {
        Self::from_seed(mix_seed_stream(seed, stream))
    }
}

impl RandomSource for SceneRng {
    fn next_unit(&mut self) -> f64 {
        (self.inner.next_u64() >> 11) as f64 * UNIT_SCALE
    }
}

/// Replays a fixed list of draws, cycling when exhausted. Draws are clamped into `[0, 1)`.
#[derive(Clone, Debug, Default)]
pub struct ScriptedSource {
    draws: Vec<f64>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(draws: impl Into<Vec<f64>>) -> Self {
        Self { draws: draws.into(), cursor: 0 }
    }

    /// A source that always returns the same draw.
    pub fn constant(draw: f64) -> Self {
        Self::new(vec![draw])
    }

    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        if self.draws.is_empty() {
            return 0.0;
        }
        let draw = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        draw.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

pub(crate) fn mix_seed_stream(seed: u64, stream: u64) -> u64 {
    let mut mixed = seed ^ 0x9E37_79B9_7F4A_7C15 ^ stream.wrapping_mul(0xD6E8_FD9A_5B89_7A4D);
    mixed ^= mixed >> 30;
    mixed = mixed.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    mixed ^= mixed >> 27;
    mixed = mixed.wrapping_mul(0x94D0_49BB_1331_11EB);
    mixed ^ (mixed >> 31)
}
