//! Latency Summary
//!
//! Sort-based summary of successful-request durations: extremes, mean, and
//! the fixed percentile set. All fields are zero for an empty sample set,
//! so an all-failed run still produces a report instead of a division
//! fault.

use crate::percentiles::{percentile_of_sorted, TARGET_PERCENTILES};
use std::time::Duration;

/// Summary statistics over the successful-request durations of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatencySummary {
    /// Fastest successful request.
    pub min: Duration,
    /// Slowest successful request.
    pub max: Duration,
    /// Arithmetic mean, `sum / n`.
    pub mean: Duration,
    /// `(label, value)` pairs in ascending label order, one per target
    /// percentile.
    pub percentiles: Vec<(u8, Duration)>,
}

impl LatencySummary {
    fn zeroed() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
            mean: Duration::ZERO,
            percentiles: TARGET_PERCENTILES
                .iter()
                .map(|&p| (p, Duration::ZERO))
                .collect(),
        }
    }
}

/// Compute the latency summary for a set of successful durations.
///
/// The input need not be sorted; a sorted copy is taken internally. An
/// empty input yields an all-zero summary.
pub fn summarize(durations: &[Duration]) -> LatencySummary {
    if durations.is_empty() {
        return LatencySummary::zeroed();
    }

    let mut sorted = durations.to_vec();
    sorted.sort_unstable();

    let n = sorted.len();
    let sum: Duration = sorted.iter().sum();

    LatencySummary {
        min: sorted[0],
        max: sorted[n - 1],
        mean: sum / n as u32,
        percentiles: TARGET_PERCENTILES
            .iter()
            .map(|&p| (p, percentile_of_sorted(&sorted, p)))
            .collect(),
    }
}

/// Completed requests per second of wall-clock elapsed time.
///
/// Zero when `took` is zero, so a degenerate run cannot divide by zero.
pub fn queries_per_second(successful: usize, took: Duration) -> f64 {
    let secs = took.as_secs_f64();
    if secs > 0.0 {
        successful as f64 / secs
    } else {
        0.0
    }
}
