#![warn(missing_docs)]
//! # Siftbench
//!
//! Load-testing harness for remote vector-similarity search services:
//! issue a configured number of search queries at a configured parallelism,
//! time every request, and report latency order statistics and throughput.
//!
//! - **Deterministic workload partitioning**: query `i` goes to worker
//!   `i mod P`, so runs are reproducible given a deterministic query source
//! - **One-shot worker pool**: P executors, spawned once, joined once; the
//!   only shared state is a single-lock timing aggregator
//! - **Exact statistics contract**: a fixed nearest-rank percentile rule
//!   over {p50, p90, p95, p98, p99}, exact `sum/n` mean, exact
//!   `successful/elapsed` QPS
//! - **Fault-tolerant by default**: a failed request becomes a failed
//!   sample, never a dead run; an optional failure budget turns a sick
//!   target into a clearly marked partial report
//! - **Stable report schema**: a text view for terminals and a JSON
//!   document with deterministic field order for downstream diffing
//!
//! ## Quick Start
//!
//! ```ignore
//! siftbench -u http://localhost:19530 \
//!     -q queries.npy \
//!     -s '{"collection_name": "glove25", "index_type": "HNSW", "params": {"ef": 64}}' \
//!     -t 10000 -p 8 -f json -o report.json
//! ```

// Re-export the execution engine
pub use siftbench_core::{
    execute, partition, ClientError, MetricKind, Outcome, Query, RawRun, Sample, SearchClient,
    SearchHit, SearchParams, SearchRequest, SearchResults, TimingAggregator,
};

// Re-export the statistics engine
pub use siftbench_stats::{
    percentile_of_sorted, queries_per_second, rank_position, summarize, LatencySummary,
    TARGET_PERCENTILES,
};

// Re-export the results model and serializations
pub use siftbench_report::{
    format_duration, write_json, write_text, OutputFormat, Results, ResultsDocument,
};

// Re-export the query sources
pub use siftbench_data::{load_json_vectors, random_vectors, read_matrix, DecodeError, Matrix};

/// Run the siftbench CLI harness.
///
/// Call this from a binary's `main()`:
/// ```ignore
/// fn main() {
///     if let Err(err) = siftbench::run() {
///         eprintln!("siftbench: {err:#}");
///         std::process::exit(1);
///     }
/// }
/// ```
pub use siftbench_cli::run;
