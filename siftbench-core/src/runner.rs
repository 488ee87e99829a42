//! Query Executors and Timing Aggregator
//!
//! [`execute`] is the run coordinator: it spawns one executor thread per
//! assignment queue, waits on the join barrier, and hands the collected
//! samples back for statistics. Each executor drains its queue strictly
//! sequentially, timing every request with a monotonic clock and appending
//! one [`Sample`] per request into the shared [`TimingAggregator`].
//!
//! A failed request is recorded as a failed sample and the executor moves
//! on; no worker ever terminates the process. An optional failure budget
//! trips a cancellation flag that remaining executors observe between
//! requests, turning the run into a clearly marked partial result.

use crate::client::SearchClient;
use crate::query::{Query, SearchRequest};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

/// Whether a request completed or failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The service returned a result set.
    Success,
    /// The request failed (transport error or remote rejection).
    Failed,
}

/// One elapsed-duration measurement for one completed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    /// Wall time from dispatch to completion of this request.
    pub duration: Duration,
    /// Success/failure tag.
    pub outcome: Outcome,
}

impl Sample {
    /// Whether this sample counts toward the successful-request statistics.
    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }
}

/// Shared, lock-protected collection point for completed samples.
///
/// `append` is safe to call concurrently from all executors; the lock is
/// held only for the single push. Entry order across workers is a function
/// of scheduling, which is acceptable because all downstream statistics
/// treat the sample set as an unordered multiset. The set must not be read
/// until the join barrier has fired; [`TimingAggregator::into_samples`]
/// enforces that by consuming the aggregator.
pub struct TimingAggregator {
    samples: Mutex<Vec<Sample>>,
    failed: AtomicUsize,
    cancel: AtomicBool,
    failure_budget: Option<usize>,
}

impl TimingAggregator {
    /// New aggregator for a run of `total` requests.
    ///
    /// `abort_failure_ratio`, if set, is the fraction of `total` that may
    /// fail before the cancellation flag trips; executors drain their
    /// remaining queues without issuing further requests once it does.
    pub fn new(total: usize, abort_failure_ratio: Option<f64>) -> Self {
        let failure_budget = abort_failure_ratio.map(|ratio| (ratio * total as f64) as usize);
        Self {
            samples: Mutex::new(Vec::with_capacity(total)),
            failed: AtomicUsize::new(0),
            cancel: AtomicBool::new(false),
            failure_budget,
        }
    }

    /// Append one sample. Trips the cancellation flag if this failure
    /// exhausts the failure budget.
    pub fn append(&self, sample: Sample) {
        if sample.outcome == Outcome::Failed {
            let failed = self.failed.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(budget) = self.failure_budget {
                if failed > budget && !self.cancel.swap(true, Ordering::Relaxed) {
                    tracing::error!(failed, budget, "failure budget exhausted, aborting run");
                }
            }
        }

        // A worker that panicked while holding the lock poisons it; the
        // samples already pushed are still valid, so keep collecting.
        let mut samples = match self.samples.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        samples.push(sample);
    }

    /// Whether the run has been cancelled by an exhausted failure budget.
    pub fn cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Consume the aggregator and return the collected sample set.
    ///
    /// Callable only once all executors have been joined, which the type
    /// system enforces: executors hold `&TimingAggregator`, so the scope
    /// must have ended before the aggregator can be moved.
    pub fn into_samples(self) -> Vec<Sample> {
        match self.samples.into_inner() {
            Ok(samples) => samples,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Raw outcome of a benchmark run, before statistics.
#[derive(Debug, Clone)]
pub struct RawRun {
    /// Every collected sample, successful and failed, in aggregation order.
    pub samples: Vec<Sample>,
    /// Wall clock from before the first spawn to after the join barrier.
    pub took: Duration,
    /// Whether the failure budget cut the run short.
    pub aborted: bool,
}

impl RawRun {
    /// Number of successful requests in this run.
    pub fn successful(&self) -> usize {
        self.samples.iter().filter(|s| s.is_success()).count()
    }
}

/// Run the benchmark: one executor thread per assignment queue, a join
/// barrier, and the collected samples.
///
/// The wall-clock `took` spans dispatch start (before any worker spawns)
/// to join-barrier release (after the last worker finishes), which is the
/// denominator for queries-per-second.
pub fn execute<C>(
    client: &C,
    request: &SearchRequest,
    queues: Vec<Vec<Query>>,
    abort_failure_ratio: Option<f64>,
) -> RawRun
where
    C: SearchClient + ?Sized,
{
    let total: usize = queues.iter().map(Vec::len).sum();
    let aggregator = TimingAggregator::new(total, abort_failure_ratio);

    let started = Instant::now();
    thread::scope(|scope| {
        for queue in queues {
            let aggregator = &aggregator;
            scope.spawn(move || drain_queue(client, request, queue, aggregator));
        }
    });
    let took = started.elapsed();

    let aborted = aggregator.cancelled();
    RawRun {
        samples: aggregator.into_samples(),
        took,
        aborted,
    }
}

/// Executor body: process one queue strictly sequentially, timing each
/// request. Never blocks on another executor; the only shared touchpoints
/// are the aggregator lock and the cancellation flag.
fn drain_queue<C>(client: &C, request: &SearchRequest, queue: Vec<Query>, agg: &TimingAggregator)
where
    C: SearchClient + ?Sized,
{
    for query in queue {
        if agg.cancelled() {
            break;
        }

        let start = Instant::now();
        let outcome = match client.search(request, query.vectors()) {
            Ok(_) => Outcome::Success,
            Err(err) => {
                tracing::warn!(error = %err, "search request failed");
                Outcome::Failed
            }
        };
        agg.append(Sample {
            duration: start.elapsed(),
            outcome,
        });
    }
}
