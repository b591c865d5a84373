//! Accuracy parameters and derived table dimensions.
//!
//! - `epsilon`: relative accuracy, the sketch overestimates by at most
//!   `epsilon * total_count` with high probability. Controls table width:
//!   `width = ceil(e / epsilon)`.
//! - `delta`: probability of exceeding that bound. Controls table depth:
//!   `depth = ceil(ln(1 / delta))`.
//!
//! Both must lie strictly inside `(0, 1)`, which forces `width >= 3` and `depth >= 1`.

use std::f64::consts::E;

use crate::error::{Error, Result};

/// Validated accuracy parameters of a Count-Min sketch
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Params {
    epsilon: f64,
    delta: f64,
    width: usize,
    depth: usize,
}

impl Params {
    /// Validate `epsilon` and `delta` and compute table dimensions
    pub fn new(epsilon: f64, delta: f64) -> Result<Self> {
        // negated comparisons also reject NaN
        if !(epsilon > 0.0 && epsilon < 1.0) {
            return Err(Error::invalid_parameter(
                "epsilon",
                epsilon,
                "a value in the open interval (0, 1)",
            ));
        }
        if !(delta > 0.0 && delta < 1.0) {
            return Err(Error::invalid_parameter(
                "delta",
                delta,
                "a value in the open interval (0, 1)",
            ));
        }

        Ok(Self {
            epsilon,
            delta,
            width: (E / epsilon).ceil() as usize,
            depth: (1.0 / delta).ln().ceil() as usize,
        })
    }

    /// Return accuracy parameter
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Return confidence parameter
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Return number of counters per row
    pub fn width(&self) -> usize {
        self.width
    }

    /// Return number of rows
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Return maximal overestimate (holding with probability `1 - delta`)
    /// after `total_count` items were added
    pub fn error_bound(&self, total_count: u64) -> u64 {
        (self.epsilon * total_count as f64).ceil() as u64
    }
}
