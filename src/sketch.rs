//! Count-Min sketch estimates how many times an item was observed in a stream
//! using a fixed `depth × width` table of counters instead of one counter per
//! distinct item.
//!
//! # Data-structure design rationale
//!
//! ## Sizing
//! For accuracy parameters `epsilon` and `delta`:
//! - `width = ceil(e / epsilon)` counters per row
//! - `depth = ceil(ln(1 / delta))` rows, each addressed by its own seeded [`RowHasher`]
//!
//! For `epsilon = 0.01`, `delta = 0.001` the table holds `7 × 272` `u64` counters,
//! i.e. ~15 KiB, no matter how many distinct items are observed.
//!
//! ## Add and estimate
//! - `add` canonicalizes the item once and increments one counter in every row.
//! - `estimate` reads the same counters and returns their minimum.
//!
//! Counters only ever grow, so every row overestimates the true count by the weight
//! of items colliding with it, and the minimum over rows is the tightest of those
//! overestimates:
//! - `estimate(x) >= count(x)` always
//! - `estimate(x) <= count(x) + epsilon * total_count` with probability `1 - delta`

use std::fmt::{Debug, Formatter};
use std::mem::size_of;

use log::{debug, log_enabled, trace, Level};

use crate::builder::SketchBuilder;
use crate::canonical::Canonicalize;
use crate::error::{Error, Result};
use crate::hasher::{Mixer, RowHasher};
use crate::params::Params;
use crate::seed::SeedSource;

/// Frequency sketch operations shared by all sketch flavours
pub trait FrequencySketch {
    /// Record one occurrence of `item`
    fn add<T: Canonicalize + ?Sized>(&mut self, item: &T);

    /// Return estimated number of occurrences of `item`
    fn estimate<T: Canonicalize + ?Sized>(&self, item: &T) -> u64;

    /// Add every item of `items` exactly once, in iteration order
    fn process_stream<I>(&mut self, items: I)
    where
        I: IntoIterator,
        I::Item: Canonicalize,
    {
        for item in items {
            if log_enabled!(Level::Trace) {
                trace!(
                    "adding item: {}",
                    String::from_utf8_lossy(&item.to_canonical())
                );
            }
            self.add(&item);
        }
    }
}

/// Count-Min sketch with `u64` counters
#[derive(Clone)]
pub struct CountMinSketch {
    params: Params,
    /// Row-major `depth × width` counters
    table: Vec<u64>,
    /// One hasher per row
    hashers: Vec<RowHasher>,
    /// Number of `add` calls so far
    total_count: u64,
    /// Reused buffer for canonical item bytes
    scratch: Vec<u8>,
}

impl CountMinSketch {
    /// Creates new sketch with randomly seeded row hashers
    pub fn new(epsilon: f64, delta: f64) -> Result<Self> {
        Self::builder(epsilon, delta).build()
    }

    /// Creates new sketch drawing row hasher seeds from `seeds`
    pub fn with_seed_source(epsilon: f64, delta: f64, seeds: impl SeedSource) -> Result<Self> {
        Self::builder(epsilon, delta).build_with(seeds)
    }

    /// Return builder for configuring a new sketch
    pub fn builder(epsilon: f64, delta: f64) -> SketchBuilder {
        SketchBuilder::new(epsilon, delta)
    }

    /// Creates new sketch from validated parameters
    pub fn from_params(params: Params, mixer: Mixer, seeds: impl SeedSource) -> Result<Self> {
        let table = alloc_table(&params, || 0)?;
        let hashers = build_hashers(&params, mixer, seeds)?;
        debug!(
            "created count-min sketch: width={}, depth={}, mixer={:?}",
            params.width(),
            params.depth(),
            mixer
        );

        Ok(Self {
            params,
            table,
            hashers,
            total_count: 0,
            scratch: Vec::new(),
        })
    }

    /// Return accuracy parameters
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Return accuracy parameter `epsilon`
    pub fn epsilon(&self) -> f64 {
        self.params.epsilon()
    }

    /// Return confidence parameter `delta`
    pub fn delta(&self) -> f64 {
        self.params.delta()
    }

    /// Return number of counters per row
    pub fn width(&self) -> usize {
        self.params.width()
    }

    /// Return number of rows
    pub fn depth(&self) -> usize {
        self.params.depth()
    }

    /// Return row hashers, one per row
    pub fn hashers(&self) -> &[RowHasher] {
        &self.hashers
    }

    /// Return counters of row `i`
    pub fn row(&self, i: usize) -> Option<&[u64]> {
        let width = self.width();
        let start = i.checked_mul(width)?;
        self.table.get(start..start.checked_add(width)?)
    }

    /// Return number of items added so far
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Return maximal overestimate of any item (holding with probability `1 - delta`)
    pub fn error_bound(&self) -> u64 {
        self.params.error_bound(self.total_count)
    }

    /// Return memory size of `CountMinSketch`
    pub fn size_of(&self) -> usize {
        size_of::<Self>()
            + self.table.capacity() * size_of::<u64>()
            + self.hashers.capacity() * size_of::<RowHasher>()
            + self.scratch.capacity()
    }
}

impl FrequencySketch for CountMinSketch {
    #[inline]
    fn add<T: Canonicalize + ?Sized>(&mut self, item: &T) {
        let mut bytes = std::mem::take(&mut self.scratch);
        bytes.clear();
        item.canonicalize(&mut bytes);

        let width = self.params.width();
        for (row, hasher) in self.hashers.iter().enumerate() {
            let cell = &mut self.table[row * width + hasher.hash_bytes(&bytes)];
            *cell = cell.saturating_add(1);
        }
        self.total_count = self.total_count.saturating_add(1);

        self.scratch = bytes;
    }

    #[inline]
    fn estimate<T: Canonicalize + ?Sized>(&self, item: &T) -> u64 {
        let bytes = item.to_canonical();
        let width = self.params.width();
        self.hashers
            .iter()
            .enumerate()
            .map(|(row, hasher)| self.table[row * width + hasher.hash_bytes(&bytes)])
            .min()
            .unwrap_or(0)
    }
}

impl Debug for CountMinSketch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ width: {}, depth: {}, total_count: {}, size: {} }}",
            self.width(),
            self.depth(),
            self.total_count,
            self.size_of()
        )
    }
}

/// Allocate a `depth × width` table filled with `cell()`, failing instead of aborting
/// when it cannot fit in memory
pub(crate) fn alloc_table<C>(params: &Params, cell: impl FnMut() -> C) -> Result<Vec<C>> {
    let too_large = || Error::TableTooLarge {
        width: params.width(),
        depth: params.depth(),
    };
    let cells = params
        .width()
        .checked_mul(params.depth())
        .ok_or_else(too_large)?;

    let mut table = Vec::new();
    table.try_reserve_exact(cells).map_err(|_| too_large())?;
    table.extend(std::iter::repeat_with(cell).take(cells));
    Ok(table)
}

/// Build one row hasher per table row, drawing one seed per row
pub(crate) fn build_hashers(
    params: &Params,
    mixer: Mixer,
    mut seeds: impl SeedSource,
) -> Result<Vec<RowHasher>> {
    (0..params.depth())
        .map(|_| RowHasher::with_mixer(seeds.next_seed(), params.width(), mixer))
        .collect()
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::hasher::{Djb2, Horner, Wy};
    use crate::seed::{FixedSeeds, RandomSeeds};
    use test_case::test_case;

    /// Seeds with no common factor with typical widths, for reproducible tests
    const SEEDS: [u64; 10] = [31, 53, 97, 131, 197, 257, 331, 409, 521, 677];

    fn sketch(epsilon: f64, delta: f64) -> CountMinSketch {
        CountMinSketch::with_seed_source(epsilon, delta, FixedSeeds::new(SEEDS).unwrap()).unwrap()
    }

    #[test]
    fn test_dimensions() {
        let sketch = sketch(0.01, 0.001);
        assert_eq!(sketch.width(), 272);
        assert_eq!(sketch.depth(), 7);
        assert_eq!(sketch.hashers().len(), 7);
        assert!(sketch.hashers().iter().all(|h| h.modulus() == 272));
        assert!((0..7).all(|i| sketch.row(i).unwrap().iter().all(|&c| c == 0)));
        assert!(sketch.row(7).is_none());
    }

    #[test]
    fn test_hashers_take_seeds_in_order() {
        let sketch = sketch(0.01, 0.001);
        let seeds: Vec<u64> = sketch.hashers().iter().map(|h| h.seed()).collect();
        assert_eq!(seeds, &SEEDS[..7]);
    }

    #[test_case(0.0, 0.001; "epsilon zero")]
    #[test_case(1.5, 0.001; "epsilon above one")]
    #[test_case(0.01, 0.0; "delta zero")]
    #[test_case(0.01, 1.5; "delta above one")]
    fn test_invalid_params(epsilon: f64, delta: f64) {
        let err = CountMinSketch::new(epsilon, delta).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { .. }));
    }

    #[test_case(1e-300, 0.5; "width exceeds address space")]
    #[test_case(1e-300, 0.001; "cell count overflows")]
    #[test_case(1e-15, 0.5; "allocation fails")]
    fn test_table_too_large(epsilon: f64, delta: f64) {
        let err = CountMinSketch::new(epsilon, delta).unwrap_err();
        assert!(matches!(err, Error::TableTooLarge { .. }), "{:?}", err);
    }

    #[test]
    fn test_row_out_of_range() {
        let sketch = sketch(0.5, 0.5);
        assert!(sketch.row(1).is_none());
        assert!(sketch.row(usize::MAX / 2).is_none());
        assert!(sketch.row(usize::MAX).is_none());
    }

    #[test]
    fn test_add_and_estimate() {
        let mut sketch = sketch(0.01, 0.001);

        // Ensure initial estimate is 0.
        assert_eq!(sketch.estimate("foo"), 0);

        sketch.add("foo");
        assert_eq!(sketch.estimate("foo"), 1);

        for _ in 0..5 {
            sketch.add("foo");
        }
        assert_eq!(sketch.estimate("foo"), 6);
        assert_eq!(sketch.total_count(), 6);
    }

    #[test]
    fn test_add_increments_one_counter_per_row() {
        let mut sketch = sketch(0.01, 0.001);
        sketch.add("bar");
        for i in 0..sketch.depth() {
            assert_eq!(sketch.row(i).unwrap().iter().sum::<u64>(), 1);
        }
    }

    #[test]
    fn test_process_stream() {
        let mut sketch = sketch(0.01, 0.001);
        sketch.process_stream(["baz", "qux", "baz"]);
        assert!(sketch.estimate("baz") >= 2);
        assert!(sketch.estimate("qux") >= 1);
        assert_eq!(sketch.total_count(), 3);
    }

    #[test]
    fn test_unseen_item() {
        let mut sketch = sketch(0.01, 0.001);
        sketch.process_stream(["alpha", "beta", "gamma"]);
        assert_eq!(sketch.estimate("Unadded Item"), 0);
    }

    #[test]
    fn test_monotonic_and_never_undercount() {
        let mut sketch = sketch(0.1, 0.01);
        let mut previous = 0;
        for i in 1..=500u64 {
            sketch.add("hot");
            sketch.add(&format!("cold{}", i));
            let estimate = sketch.estimate("hot");
            assert!(estimate >= previous);
            assert!(estimate >= i);
            previous = estimate;
        }
    }

    #[test_case(Mixer::Horner(Horner); "horner")]
    #[test_case(Mixer::Djb2(Djb2); "djb2")]
    #[test_case(Mixer::Wy(Wy); "wy")]
    fn test_large_stream_never_undercounts(mixer: Mixer) {
        let mut sketch = CountMinSketch::builder(0.01, 0.001)
            .mixer(mixer)
            .build_with(RandomSeeds::seeded(42))
            .unwrap();
        sketch.process_stream((0..10_000).map(|i| format!("item{}", i)));
        for i in 0..10_000 {
            assert!(sketch.estimate(&format!("item{}", i)) >= 1);
        }
        assert_eq!(sketch.total_count(), 10_000);
    }

    #[test]
    fn test_error_bound_holds_for_most_items() {
        let mut sketch = CountMinSketch::builder(0.01, 0.001)
            .mixer(Mixer::Wy(Wy))
            .build_with(RandomSeeds::seeded(7))
            .unwrap();
        for i in 0..10_000u64 {
            sketch.add(&(i % 1000));
        }
        let bound = 10 + sketch.error_bound();
        let within = (0..1000u64).filter(|i| sketch.estimate(i) <= bound).count();
        assert!(within >= 990, "only {} estimates within bound", within);
    }

    #[test]
    fn test_items_compared_structurally() {
        let mut sketch = sketch(0.01, 0.001);
        for _ in 0..6 {
            sketch.add(&("Bob", 30));
        }
        assert_eq!(sketch.estimate(&("Bob", 30)), 6);
        assert_eq!(sketch.estimate(&vec!["Bob".to_string()]), 0);
        assert_eq!(sketch.estimate(&(String::from("Bob"), 30u8)), 6);
    }

    #[test]
    fn test_debug() {
        let mut sketch = sketch(0.5, 0.5);
        sketch.add(&1);
        let size = sketch.size_of();
        assert_eq!(
            format!("{:?}", sketch),
            format!("{{ width: 6, depth: 1, total_count: 1, size: {} }}", size)
        );
    }

    #[test]
    fn test_random_seeds_in_range() {
        let sketch = CountMinSketch::new(0.01, 0.001).unwrap();
        assert!(sketch.hashers().iter().all(|h| h.seed() < 1000));
    }

    #[test]
    fn test_sketch_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CountMinSketch>();
    }
}
