//! Count-Min sketch shareable between threads.
//!
//! Counters are `AtomicU64` cells incremented with relaxed `fetch_add`, so `add`
//! only needs `&self` and concurrent writers never lose updates.
//!
//! Consistency is relaxed: an `estimate` racing with an `add` of the same item may
//! observe some rows before and some rows after the increment. Rows only grow, so such
//! an estimate lies between the counts before and after that `add` and stays within the
//! sketch's one-sided error.

use std::fmt::{Debug, Formatter};
use std::mem::size_of;
use std::sync::atomic::{AtomicU64, Ordering::Relaxed};

use log::debug;

use crate::canonical::Canonicalize;
use crate::error::Result;
use crate::hasher::{Mixer, RowHasher};
use crate::params::Params;
use crate::seed::SeedSource;
use crate::sketch::{alloc_table, build_hashers, FrequencySketch};

/// Count-Min sketch with atomic counters
pub struct AtomicCountMinSketch {
    params: Params,
    /// Row-major `depth × width` counters
    table: Vec<AtomicU64>,
    /// One hasher per row
    hashers: Vec<RowHasher>,
    /// Number of `add` calls so far
    total_count: AtomicU64,
}

impl AtomicCountMinSketch {
    /// Creates new sketch with randomly seeded row hashers
    pub fn new(epsilon: f64, delta: f64) -> Result<Self> {
        crate::builder::SketchBuilder::new(epsilon, delta).build_atomic()
    }

    /// Creates new sketch from validated parameters
    pub fn from_params(params: Params, mixer: Mixer, seeds: impl SeedSource) -> Result<Self> {
        let table = alloc_table(&params, || AtomicU64::new(0))?;
        let hashers = build_hashers(&params, mixer, seeds)?;
        debug!(
            "created atomic count-min sketch: width={}, depth={}, mixer={:?}",
            params.width(),
            params.depth(),
            mixer
        );

        Ok(Self {
            params,
            table,
            hashers,
            total_count: AtomicU64::new(0),
        })
    }

    /// Record one occurrence of `item`
    #[inline]
    pub fn add<T: Canonicalize + ?Sized>(&self, item: &T) {
        let bytes = item.to_canonical();
        let width = self.params.width();
        for (row, hasher) in self.hashers.iter().enumerate() {
            self.table[row * width + hasher.hash_bytes(&bytes)].fetch_add(1, Relaxed);
        }
        self.total_count.fetch_add(1, Relaxed);
    }

    /// Return estimated number of occurrences of `item`
    #[inline]
    pub fn estimate<T: Canonicalize + ?Sized>(&self, item: &T) -> u64 {
        let bytes = item.to_canonical();
        let width = self.params.width();
        self.hashers
            .iter()
            .enumerate()
            .map(|(row, hasher)| self.table[row * width + hasher.hash_bytes(&bytes)].load(Relaxed))
            .min()
            .unwrap_or(0)
    }

    /// Return accuracy parameters
    pub fn params(&self) -> &Params {
        &self.params
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

    /// Return number of items added so far
    pub fn total_count(&self) -> u64 {
        self.total_count.load(Relaxed)
    }

    /// Return maximal overestimate of any item (holding with probability `1 - delta`)
    pub fn error_bound(&self) -> u64 {
        self.params.error_bound(self.total_count())
    }

    /// Return memory size of `AtomicCountMinSketch`
    pub fn size_of(&self) -> usize {
        size_of::<Self>()
            + self.table.capacity() * size_of::<AtomicU64>()
            + self.hashers.capacity() * size_of::<RowHasher>()
    }
}

impl FrequencySketch for AtomicCountMinSketch {
    fn add<T: Canonicalize + ?Sized>(&mut self, item: &T) {
        AtomicCountMinSketch::add(self, item);
    }

    fn estimate<T: Canonicalize + ?Sized>(&self, item: &T) -> u64 {
        AtomicCountMinSketch::estimate(self, item)
    }
}

impl Debug for AtomicCountMinSketch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ width: {}, depth: {}, total_count: {}, size: {} }}",
            self.width(),
            self.depth(),
            self.total_count(),
            self.size_of()
        )
    }
}
