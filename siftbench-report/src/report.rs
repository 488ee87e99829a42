//! Results Model
//!
//! [`Results`] is the immutable snapshot of one benchmark run: counts,
//! wall-clock elapsed time, latency summary, and throughput. It is built
//! exactly once from the raw run, after the join barrier, and never
//! mutated afterwards.

use siftbench_core::RawRun;
use siftbench_stats::{queries_per_second, summarize};
use std::time::Duration;

/// Immutable aggregate of one completed benchmark run.
#[derive(Debug, Clone, PartialEq)]
pub struct Results {
    /// Configured request count for the run.
    pub total: usize,
    /// Requests that completed successfully.
    pub successful: usize,
    /// Requests that failed or were never attempted (aborted run).
    pub failed: usize,
    /// Number of concurrent workers.
    pub parallelism: usize,
    /// Wall clock from dispatch start to join-barrier release.
    pub took: Duration,
    /// Whether the run was cut short by the failure budget.
    pub aborted: bool,
    /// Fastest successful request.
    pub min: Duration,
    /// Slowest successful request.
    pub max: Duration,
    /// Mean successful-request duration.
    pub mean: Duration,
    /// `(percentile-label, duration)` pairs in ascending label order.
    pub percentiles: Vec<(u8, Duration)>,
    /// Successful requests per second of wall-clock elapsed time.
    pub queries_per_second: f64,
}

impl Results {
    /// Build the results of a run from its raw samples.
    ///
    /// Statistics cover successful samples only; `failed` is
    /// `total - successful`, so queries an aborted run never attempted
    /// count as failed and `successful + failed == total` holds for every
    /// run shape.
    pub fn from_run(total: usize, parallelism: usize, run: &RawRun) -> Self {
        let durations: Vec<Duration> = run
            .samples
            .iter()
            .filter(|s| s.is_success())
            .map(|s| s.duration)
            .collect();

        let successful = durations.len();
        let summary = summarize(&durations);

        Self {
            total,
            successful,
            failed: total - successful,
            parallelism,
            took: run.took,
            aborted: run.aborted,
            min: summary.min,
            max: summary.max,
            mean: summary.mean,
            percentiles: summary.percentiles,
            queries_per_second: queries_per_second(successful, run.took),
        }
    }
}

/// Human-readable rendering of a duration, e.g. `12.5ms` or `1.2s`.
pub fn format_duration(duration: Duration) -> String {
    format!("{duration:?}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use siftbench_core::{Outcome, Sample};

    fn sample(ms: u64, outcome: Outcome) -> Sample {
        Sample {
            duration: Duration::from_millis(ms),
            outcome,
        }
    }

    fn run_of(samples: Vec<Sample>, took: Duration, aborted: bool) -> RawRun {
        RawRun {
            samples,
            took,
            aborted,
        }
    }

    #[test]
    fn test_reference_run() {
        let run = run_of(
            vec![
                sample(5, Outcome::Success),
                sample(10, Outcome::Success),
                sample(15, Outcome::Success),
                sample(20, Outcome::Success),
            ],
            Duration::from_secs(1),
            false,
        );
        let results = Results::from_run(4, 2, &run);

        assert_eq!(results.successful, 4);
        assert_eq!(results.failed, 0);
        assert_eq!(results.min, Duration::from_millis(5));
        assert_eq!(results.max, Duration::from_millis(20));
        assert_eq!(results.mean, Duration::from_micros(12_500));
        assert_eq!(results.queries_per_second, 4.0);
        for &(_, value) in &results.percentiles {
            assert_eq!(value, Duration::from_millis(20));
        }
    }

    #[test]
    fn test_counts_with_failures() {
        let run = run_of(
            vec![
                sample(5, Outcome::Success),
                sample(7, Outcome::Failed),
                sample(9, Outcome::Success),
            ],
            Duration::from_secs(2),
            false,
        );
        let results = Results::from_run(3, 1, &run);

        assert_eq!(results.successful + results.failed, results.total);
        assert_eq!(results.successful, 2);
        assert_eq!(results.failed, 1);
        // Failed durations never enter the latency statistics.
        assert_eq!(results.max, Duration::from_millis(9));
        assert_eq!(results.queries_per_second, 1.0);
    }

    #[test]
    fn test_aborted_run_counts_unattempted_as_failed() {
        // 10 configured, 4 attempted before the budget tripped.
        let run = run_of(
            vec![
                sample(5, Outcome::Failed),
                sample(5, Outcome::Failed),
                sample(5, Outcome::Failed),
                sample(6, Outcome::Success),
            ],
            Duration::from_secs(1),
            true,
        );
        let results = Results::from_run(10, 2, &run);

        assert!(results.aborted);
        assert_eq!(results.successful, 1);
        assert_eq!(results.failed, 9);
        assert_eq!(results.successful + results.failed, results.total);
    }

    #[test]
    fn test_all_failed_run_is_zeroed_but_counted() {
        let run = run_of(
            vec![sample(5, Outcome::Failed), sample(6, Outcome::Failed)],
            Duration::from_secs(1),
            false,
        );
        let results = Results::from_run(2, 1, &run);

        assert_eq!(results.successful, 0);
        assert_eq!(results.failed, 2);
        assert_eq!(results.min, Duration::ZERO);
        assert_eq!(results.mean, Duration::ZERO);
        assert_eq!(results.queries_per_second, 0.0);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_micros(12_500)), "12.5ms");
        assert_eq!(format_duration(Duration::from_secs(1)), "1s");
        assert_eq!(format_duration(Duration::ZERO), "0ns");
    }
}
