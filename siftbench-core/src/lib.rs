#![warn(missing_docs)]
//! Siftbench Core - Benchmark Execution Engine
//!
//! This crate provides the workload-driving half of siftbench:
//! - The request data model (`Query`, `SearchRequest`, `SearchParams`)
//! - The `SearchClient` trait, the seam behind which the remote
//!   nearest-neighbor service lives
//! - The workload partitioner (round-robin query assignment)
//! - The query executors, timing aggregator, and run coordinator
//!
//! ## Pipeline Overview
//!
//! ```text
//! query source
//!       │
//!       ▼
//! ┌─────────────┐
//! │  partition  │  One assignment queue per worker (i mod P)
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   execute   │  P scoped threads, one timed request at a time,
//! └──────┬──────┘  samples into the shared aggregator
//!        │
//!        ▼
//!     RawRun      Samples + wall-clock elapsed, ready for statistics
//! ```
//!
//! Statistics and reporting live in `siftbench-stats` and
//! `siftbench-report`; this crate stops at the join barrier.

mod client;
mod partition;
mod query;
mod runner;

pub use client::{ClientError, SearchClient, SearchHit, SearchResults};
pub use partition::partition;
pub use query::{MetricKind, Query, SearchParams, SearchRequest};
pub use runner::{execute, Outcome, RawRun, Sample, TimingAggregator};
