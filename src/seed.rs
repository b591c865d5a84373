//! Seed sources for row hashers.
//!
//! A sketch draws one seed per table row at construction time and never again. The
//! source is passed in explicitly, so tests and reproducible pipelines can swap the
//! default process-seeded generator for a fixed one.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Error, Result};

/// Upper bound (exclusive) of seeds produced by [`RandomSeeds`]
pub const MAX_SEED: u64 = 1000;

/// Source of row hasher seeds
pub trait SeedSource {
    /// Return next seed
    fn next_seed(&mut self) -> u64;
}

impl<S: SeedSource + ?Sized> SeedSource for &mut S {
    fn next_seed(&mut self) -> u64 {
        (**self).next_seed()
    }
}

/// Uniformly random seeds in `[0, MAX_SEED)` drawn from `R`
#[derive(Clone, Debug)]
pub struct RandomSeeds<R = StdRng> {
    rng: R,
}

impl RandomSeeds<StdRng> {
    /// Create seed source backed by a generator seeded from operating system entropy.
    /// Seeds differ between runs.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Create reproducible seed source
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSeeds<R> {
    /// Create seed source backed by given random number generator
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl Default for RandomSeeds<StdRng> {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl<R: Rng> SeedSource for RandomSeeds<R> {
    #[inline]
    fn next_seed(&mut self) -> u64 {
        self.rng.gen_range(0..MAX_SEED)
    }
}

/// Predetermined seeds, yielded in order and repeated once exhausted
#[derive(Clone, Debug)]
pub struct FixedSeeds {
    seeds: Vec<u64>,
    next: usize,
}

impl FixedSeeds {
    /// Create seed source from a non-empty list of seeds
    pub fn new(seeds: impl Into<Vec<u64>>) -> Result<Self> {
        let seeds = seeds.into();
        if seeds.is_empty() {
            return Err(Error::invalid_parameter(
                "seeds",
                "[]",
                "at least one seed",
            ));
        }
        Ok(Self { seeds, next: 0 })
    }
}

impl SeedSource for FixedSeeds {
    #[inline]
    fn next_seed(&mut self) -> u64 {
        let seed = self.seeds[self.next];
        self.next = (self.next + 1) % self.seeds.len();
        seed
    }
}
