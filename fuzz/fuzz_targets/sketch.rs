#![no_main]

use std::collections::HashMap;

use frequency_estimator::{CountMinSketch, FixedSeeds, FrequencySketch};
use libfuzzer_sys::fuzz_target;
use wyhash::wyhash;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let seed = wyhash(data, 0);
    let seeds = FixedSeeds::new([seed % 1000, seed % 997, seed % 991]).unwrap();
    let mut sketch = CountMinSketch::with_seed_source(0.1, 0.1, seeds).unwrap();
    let mut exact: HashMap<&[u8], u64> = HashMap::new();

    for chunk in data.chunks(3) {
        sketch.add(chunk);
        *exact.entry(chunk).or_default() += 1;
    }

    for (chunk, count) in exact {
        assert!(sketch.estimate(chunk) >= count);
    }
    assert_eq!(sketch.total_count(), data.len().div_ceil(3) as u64);
});
