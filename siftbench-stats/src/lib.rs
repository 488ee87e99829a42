#![warn(missing_docs)]
//! Siftbench Statistical Engine
//!
//! Turns the raw per-request timings of a completed run into summary
//! statistics: min/max/mean, latency percentiles over a fixed label set,
//! and queries-per-second. Runs exactly once, after the join barrier, over
//! the fully populated read-only sample set; every function here is pure
//! and order-independent (sort-based), so aggregation order never affects
//! the report.

mod percentiles;
mod summary;

pub use percentiles::{percentile_of_sorted, rank_position, TARGET_PERCENTILES};
pub use summary::{queries_per_second, summarize, LatencySummary};
