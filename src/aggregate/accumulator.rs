//! Incremental mean
//!
//! Holds only the current mean and the sample count. Each new value moves the
//! mean by `(value - mean) / count`, which stays accurate over an unbounded
//! stream without keeping the samples.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Accumulator {
    mean: f64,
    count: u64,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one value in. Returns false, leaving the mean and count untouched,
    /// if the value or the updated mean would not be finite.
    pub fn push(&mut self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        let n = (self.count + 1) as f64;
        let delta = value - self.mean;
        let mean = if delta.is_finite() {
            self.mean + delta / n
        } else {
            // Opposite extremes overflow the difference; scale first
            self.mean + value / n - self.mean / n
        };
        if !mean.is_finite() {
            return false;
        }
        self.count += 1;
        self.mean = mean;
        true
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// (mean, count)
    pub fn value(&self) -> (f64, u64) {
        (self.mean, self.count)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
