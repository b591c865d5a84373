use frequency_estimator::{CountMinSketch, FrequencySketch};

fn main() {
    let mut sketch = CountMinSketch::new(0.01, 0.001).unwrap();
    println!("width = {}, depth = {}", sketch.width(), sketch.depth());

    sketch.process_stream(["apple", "banana", "apple", "cherry", "apple"]);
    for fruit in ["apple", "banana", "cherry", "durian"] {
        println!("{} estimate = {}", fruit, sketch.estimate(fruit));
    }

    for i in 0..10_000 {
        sketch.add(&format!("user{}", i % 100));
    }
    println!(
        "user0 estimate = {} (true count 100, error bound {})",
        sketch.estimate("user0"),
        sketch.error_bound()
    );
}
