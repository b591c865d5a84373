//! `frequency-estimator` is a Rust crate designed to estimate how many times each item occurs in a stream or dataset in an efficient manner.
//!
//! This library uses a Count-Min sketch: a fixed-size table of counters which never undercounts, and overcounts
//! by at most `epsilon * total_count` with probability `1 - delta`.
//!
//! ```
//! use frequency_estimator::{CountMinSketch, FrequencySketch};
//!
//! let mut sketch = CountMinSketch::new(0.01, 0.001).unwrap();
//! sketch.process_stream(["baz", "qux", "baz"]);
//! assert!(sketch.estimate("baz") >= 2);
//! ```
pub mod atomic;
pub mod builder;
pub mod canonical;
pub mod error;
pub mod hasher;
pub mod params;
pub mod seed;
#[cfg(feature = "with_serde")]
mod serde;
pub mod sketch;

pub use atomic::AtomicCountMinSketch;
pub use builder::SketchBuilder;
pub use canonical::{Canonicalize, Record};
pub use error::{Error, Result};
pub use hasher::{Mixer, RowHasher};
pub use params::Params;
pub use seed::{FixedSeeds, RandomSeeds, SeedSource};
#[cfg(feature = "with_serde")]
pub use crate::serde::Serialized;
pub use sketch::{CountMinSketch, FrequencySketch};
