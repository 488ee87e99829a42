//! Workload Partitioner
//!
//! Converts a flat stream of queries into per-worker assignment queues.
//! Assignment is round-robin: the i-th query produced (0-indexed, in source
//! emission order) lands in queue `i % parallel`. Given a deterministic
//! source this is fully deterministic, preserves per-worker relative order,
//! and interleaves global order across workers.

use crate::query::Query;

/// Build `parallel` assignment queues holding `total` queries between them.
///
/// The source is invoked exactly `total` times, in order. `total == 0`
/// yields `parallel` empty queues; `parallel > total` leaves the surplus
/// queues empty, which is legal; those workers simply do no work.
///
/// A `parallel` of zero is treated as one: a run always has at least one
/// worker.
pub fn partition<S>(total: usize, parallel: usize, mut source: S) -> Vec<Vec<Query>>
where
    S: FnMut() -> Query,
{
    let lanes = parallel.max(1);
    let mut queues: Vec<Vec<Query>> = (0..lanes).map(|_| Vec::new()).collect();

    for i in 0..total {
        queues[i % lanes].push(source());
    }

    queues
}
