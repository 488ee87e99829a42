//! Structured JSON Document
//!
//! The machine-readable report: three content groups (`metadata`,
//! `latencies` with a formatted twin, `throughput`) with stable field
//! names and deterministic key order, so downstream tooling can diff
//! reports across runs. Latencies are integer nanoseconds plus a
//! human-formatted string per entry.
//!
//! The document is lossless: decoding one back yields a [`Results`] with
//! identical numeric fields.

use crate::report::{format_duration, Results};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::time::Duration;
use thiserror::Error;

/// Failure to produce or interpret a results document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// A latency entry required by the results model is absent.
    #[error("results document is missing latency field {0:?}")]
    MissingLatency(String),

    /// A latency key that is neither a known scalar nor a `p<NN>` label.
    #[error("unrecognized latency field {0:?}")]
    UnrecognizedLatency(String),

    /// Serialization or deserialization failed.
    #[error("results document: {0}")]
    Json(#[from] serde_json::Error),

    /// The output sink failed.
    #[error("results document: {0}")]
    Io(#[from] std::io::Error),
}

/// Run-level counters and timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Requests that completed successfully.
    pub successful: usize,
    /// Requests that failed or were never attempted.
    pub failed: usize,
    /// Configured request count.
    pub total: usize,
    /// Number of concurrent workers.
    pub parallelization: usize,
    /// Wall-clock elapsed time in nanoseconds.
    pub took: u64,
    /// Wall-clock elapsed time, human-formatted.
    pub took_formatted: String,
    /// Whether the run was cut short by the failure budget.
    pub aborted: bool,
}

/// Throughput group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentThroughput {
    /// Successful requests per second of wall-clock elapsed time.
    pub qps: f64,
}

/// The complete structured report document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsDocument {
    /// Run-level counters and timing.
    pub metadata: DocumentMetadata,
    /// Latency fields in integer nanoseconds: `mean`, `min`, `max`, and
    /// one `p<NN>` entry per target percentile. Sorted key order.
    pub latencies: BTreeMap<String, u64>,
    /// The same fields, human-formatted.
    pub latencies_formatted: BTreeMap<String, String>,
    /// Throughput group.
    pub throughput: DocumentThroughput,
}

fn duration_nanos(duration: Duration) -> u64 {
    duration.as_nanos() as u64
}

impl ResultsDocument {
    /// Encode a results value as a document.
    pub fn from_results(results: &Results) -> Self {
        let mut latencies = BTreeMap::new();
        let mut formatted = BTreeMap::new();

        let mut put = |name: String, value: Duration| {
            latencies.insert(name.clone(), duration_nanos(value));
            formatted.insert(name, format_duration(value));
        };
        put("mean".to_string(), results.mean);
        put("min".to_string(), results.min);
        put("max".to_string(), results.max);
        for &(label, value) in &results.percentiles {
            put(format!("p{label}"), value);
        }

        Self {
            metadata: DocumentMetadata {
                successful: results.successful,
                failed: results.failed,
                total: results.total,
                parallelization: results.parallelism,
                took: duration_nanos(results.took),
                took_formatted: format_duration(results.took),
                aborted: results.aborted,
            },
            latencies,
            latencies_formatted: formatted,
            throughput: DocumentThroughput {
                qps: results.queries_per_second,
            },
        }
    }

    /// Decode the document back into a results value.
    pub fn into_results(self) -> Result<Results, DocumentError> {
        let scalar = |name: &str| -> Result<Duration, DocumentError> {
            self.latencies
                .get(name)
                .map(|&nanos| Duration::from_nanos(nanos))
                .ok_or_else(|| DocumentError::MissingLatency(name.to_string()))
        };

        let mean = scalar("mean")?;
        let min = scalar("min")?;
        let max = scalar("max")?;

        let mut percentiles = Vec::new();
        for (key, &nanos) in &self.latencies {
            match key.as_str() {
                "mean" | "min" | "max" => {}
                label => {
                    let number = label
                        .strip_prefix('p')
                        .and_then(|digits| digits.parse::<u8>().ok())
                        .ok_or_else(|| DocumentError::UnrecognizedLatency(key.clone()))?;
                    percentiles.push((number, Duration::from_nanos(nanos)));
                }
            }
        }
        percentiles.sort_unstable_by_key(|&(label, _)| label);

        Ok(Results {
            total: self.metadata.total,
            successful: self.metadata.successful,
            failed: self.metadata.failed,
            parallelism: self.metadata.parallelization,
            took: Duration::from_nanos(self.metadata.took),
            aborted: self.metadata.aborted,
            min,
            max,
            mean,
            percentiles,
            queries_per_second: self.throughput.qps,
        })
    }
}

/// Write the structured JSON report, pretty-printed, with a trailing
/// newline.
pub fn write_json<W: Write>(results: &Results, w: &mut W) -> Result<(), DocumentError> {
    let document = ResultsDocument::from_results(results);
    serde_json::to_writer_pretty(&mut *w, &document)?;
    writeln!(w)?;
    Ok(())
}
