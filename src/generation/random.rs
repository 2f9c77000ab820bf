//! Substitutable randomness for placement

use std::f32::consts::TAU;

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::types::{Vec2, Vec3};

/// Source of uniform random values consumed by the spawners.
///
/// Every draw the placement engine makes goes through this trait so runs
/// can be replayed with a seeded implementation.
pub trait RandomSource {
    /// Uniform float in `[0, 1)`
    fn next_f32(&mut self) -> f32;

    /// Uniform 32-bit integer
    fn next_u32(&mut self) -> u32;

    /// Uniform float in `[min, max)`
    fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_f32()
    }

    /// Uniform index in `0..len`; `len` must be non-zero
    fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        ((self.next_f32() * len as f32) as usize).min(len.saturating_sub(1))
    }

    /// Uniform point inside the unit sphere
    fn in_unit_sphere(&mut self) -> Vec3 {
        loop {
            let p = Vec3::new(
                self.range_f32(-1.0, 1.0),
                self.range_f32(-1.0, 1.0),
                self.range_f32(-1.0, 1.0),
            );
            if p.length_squared() <= 1.0 {
                return p;
            }
        }
    }

    /// Uniform point inside the unit disk
    fn in_unit_disk(&mut self) -> Vec2 {
        let r = self.next_f32().sqrt();
        let theta = self.next_f32() * TAU;
        Vec2::new(r * theta.cos(), r * theta.sin())
    }
}

/// Deterministic [`RandomSource`] backed by ChaCha8
#[derive(Clone, Debug)]
pub struct SeededRandom {
    rng: ChaCha8Rng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    /// Seed from the thread-local generator
    pub fn from_entropy() -> Self {
        Self { rng: ChaCha8Rng::from_rng(&mut rand::rng()) }
    }
}

impl RandomSource for SeededRandom {
    fn next_f32(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        if max > min {
            self.rng.random_range(min..max)
        } else {
            min
        }
    }

    fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        self.rng.random_range(0..len.max(1))
    }
}
