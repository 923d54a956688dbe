//! Injectable random source for spawn jitter and wander.
//!
//! Runs default to OS entropy, so two runs with the same scenario differ.
//! Tests seed the generator to get repeatable placements.

use bevy_ecs::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Resource, Debug, Clone)]
pub struct SimRng(StdRng);

impl SimRng {
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    /// Uniform sample in `[0, 1)`.
    pub fn unit(&mut self) -> f32 {
        self.0.gen::<f32>()
    }

    /// Uniform sample in `[-amplitude, amplitude]`.
    pub fn jitter(&mut self, amplitude: f32) -> f32 {
        if amplitude <= 0.0 {
            return 0.0;
        }
        self.0.gen_range(-amplitude..=amplitude)
    }

    /// Uniform sample in `[low, high)`; returns `low` for an empty range.
    pub fn range(&mut self, low: f32, high: f32) -> f32 {
        if high <= low {
            return low;
        }
        self.0.gen_range(low..high)
    }

    pub fn chance(&mut self, probability: f32) -> bool {
        self.unit() < probability
    }
}

impl Default for SimRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
