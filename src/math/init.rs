use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::math::tensor::Tensor;

/// Seed used when a configuration does not name one.
pub const DEFAULT_SEED: u64 = 28;

/// Explicit pseudo-random source for parameter initialization.
///
/// Draws uniformly from `[low, high)`. The default range is `[0, 1)`;
/// networks in this crate train reliably from `[0, 1)` or `[-1, 1)`, while a
/// wide range such as `[-10, 10)` saturates the sigmoid and usually stalls
/// training. The range is the caller's responsibility.
pub struct Initializer {
    rng: StdRng,
    low: f32,
    high: f32,
}

impl Initializer {
    /// `[0, 1)` initializer seeded with `seed`.
    pub fn seeded(seed: u64) -> Initializer {
        Initializer {
            rng: StdRng::seed_from_u64(seed),
            low: 0.0,
            high: 1.0,
        }
    }

    /// Initializer drawing from `[low, high)`.
    pub fn uniform(seed: u64, low: f32, high: f32) -> Result<Initializer> {
        if !low.is_finite() || !high.is_finite() || low >= high {
            return Err(Error::InvalidConfig(format!(
                "initialization range [{low}, {high}) is empty or not finite"
            )));
        }
        Ok(Initializer {
            rng: StdRng::seed_from_u64(seed),
            low,
            high,
        })
    }

    pub fn next_value(&mut self) -> f32 {
        self.rng.gen_range(self.low..self.high)
    }

    /// Generator closure in the shape [`Tensor::from_fn`] expects; the index
    /// arguments are ignored.
    pub fn generator(&mut self) -> impl FnMut(usize, usize) -> f32 + '_ {
        move |_, _| self.next_value()
    }

    pub fn random(&mut self, rows: usize, columns: usize) -> Result<Tensor> {
        Tensor::from_fn(rows, columns, self.generator())
    }
}

impl Default for Initializer {
    fn default() -> Self {
        Initializer::seeded(DEFAULT_SEED)
    }
}

/// Serializable description of an [`Initializer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub low: f32,
    #[serde(default = "default_high")]
    pub high: f32,
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_high() -> f32 {
    1.0
}

impl Default for InitConfig {
    fn default() -> Self {
        InitConfig {
            seed: DEFAULT_SEED,
            low: 0.0,
            high: 1.0,
        }
    }
}

impl InitConfig {
    pub fn build(&self) -> Result<Initializer> {
        Initializer::uniform(self.seed, self.low, self.high)
    }
}
