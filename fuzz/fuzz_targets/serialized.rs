#![no_main]

use frequency_estimator::{CountMinSketch, FrequencySketch, Serialized};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) {
        let item = Serialized::new(&value).unwrap();
        let mut sketch = CountMinSketch::new(0.1, 0.1).unwrap();
        sketch.add(&item);
        assert!(sketch.estimate(&Serialized::new(&value).unwrap()) >= 1);
    }
});
