//! Sketch configuration.
//!
//! With `with_serde` enabled, [`SketchBuilder`] can be deserialized from an application
//! config file; `mixer` is optional and defaults to Horner's method:
//!
//! ```json
//! { "epsilon": 0.01, "delta": 0.001 }
//! ```

use crate::atomic::AtomicCountMinSketch;
use crate::error::Result;
use crate::hasher::Mixer;
use crate::params::Params;
use crate::seed::{RandomSeeds, SeedSource};
use crate::sketch::CountMinSketch;

/// Builder of [`CountMinSketch`] and [`AtomicCountMinSketch`]
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "with_serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SketchBuilder {
    epsilon: f64,
    delta: f64,
    #[cfg_attr(feature = "with_serde", serde(default))]
    mixer: Mixer,
}

impl SketchBuilder {
    /// Creates new builder with given accuracy parameters.
    /// Parameters are validated when the sketch is built.
    pub fn new(epsilon: f64, delta: f64) -> Self {
        Self {
            epsilon,
            delta,
            mixer: Mixer::default(),
        }
    }

    /// Use given mixing function for all row hashers
    pub fn mixer(mut self, mixer: Mixer) -> Self {
        self.mixer = mixer;
        self
    }

    /// Validate accuracy parameters
    pub fn params(&self) -> Result<Params> {
        Params::new(self.epsilon, self.delta)
    }

    /// Build sketch with randomly seeded row hashers
    pub fn build(self) -> Result<CountMinSketch> {
        self.build_with(RandomSeeds::from_entropy())
    }

    /// Build sketch drawing row hasher seeds from `seeds`
    pub fn build_with(self, seeds: impl SeedSource) -> Result<CountMinSketch> {
        CountMinSketch::from_params(self.params()?, self.mixer, seeds)
    }

    /// Build thread-safe sketch with randomly seeded row hashers
    pub fn build_atomic(self) -> Result<AtomicCountMinSketch> {
        self.build_atomic_with(RandomSeeds::from_entropy())
    }

    /// Build thread-safe sketch drawing row hasher seeds from `seeds`
    pub fn build_atomic_with(self, seeds: impl SeedSource) -> Result<AtomicCountMinSketch> {
        AtomicCountMinSketch::from_params(self.params()?, self.mixer, seeds)
    }
}
