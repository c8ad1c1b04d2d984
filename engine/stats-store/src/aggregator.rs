//! # Series Aggregation
//!
//! Online accumulation of per-symbol statistics.
//!
//! Mean and variance use Welford's update: for the n-th value `x`,
//!
//! ```text
//! delta = x - mean
//! mean += delta / n
//! m2   += delta * (x - mean)
//! ```
//!
//! `m2` is the running sum of squared deviations from the mean. The reported variance is
//! the **population** variance `m2 / n`, so `[1, 2, 3]` yields `0.6667` rather than the
//! sample variance `1.0`.
//!
//! The accumulator keeps `m2 / n` rather than `m2` itself and divides each increment by
//! `n` before adding it, so no intermediate grows past the variance being reported:
//!
//! ```text
//! var = var * (n - 1) / n + delta * ((x - mean) / n)
//! ```
//!
//! Supported range: every positive finite `f64`. Count, min, max, last and mean are always
//! finite. The variance is `+inf` only when the population variance itself exceeds
//! `f64::MAX`, that is when the standard deviation is above about `1.3e154`.

use serde::{Deserialize, Serialize};

/// Running state for one symbol. Holds no raw history.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesAggregator {
    count: u64,
    minimum: f64,
    maximum: f64,
    last: f64,
    mean: f64,
    /// Population variance so far, `m2 / count`
    variance: f64,
}

/// Point-in-time view of a [`SeriesAggregator`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesSnapshot {
    pub count: u64,
    pub minimum: f64,
    pub maximum: f64,
    pub last: f64,
    pub mean: f64,
    pub variance: f64,
}

impl SeriesAggregator {
    fn empty() -> Self {
        Self {
            count: 0,
            minimum: f64::INFINITY,
            maximum: f64::NEG_INFINITY,
            last: f64::NAN,
            mean: 0.0,
            variance: 0.0,
        }
    }

    /// Build an aggregator from its first batch. Returns `None` for an empty batch, so an
    /// aggregator without observations can never be handed out.
    pub fn from_batch(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut series = Self::empty();
        series.fold(values);
        Some(series)
    }

    /// Fold `values` in submission order.
    ///
    /// Callers validate the batch first (non-empty, finite, positive); folding cannot fail,
    /// which keeps a fold all-or-nothing.
    pub fn fold(&mut self, values: &[f64]) {
        debug_assert!(values.iter().all(|v| v.is_finite() && *v > 0.0), "unvalidated batch");

        for &value in values {
            self.count += 1;
            let n = self.count as f64;
            let delta = value - self.mean;
            self.mean += delta / n;
            self.variance = self.variance * ((n - 1.0) / n) + delta * ((value - self.mean) / n);

            if value < self.minimum {
                self.minimum = value;
            }
            if value > self.maximum {
                self.maximum = value;
            }
        }

        if let Some(&last) = values.last() {
            self.last = last;
        }
    }

    /// O(1) view of the accumulated state
    pub fn snapshot(&self) -> SeriesSnapshot {
        SeriesSnapshot {
            count: self.count,
            minimum: self.minimum,
            maximum: self.maximum,
            last: self.last,
            mean: self.mean,
            variance: self.variance,
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}
