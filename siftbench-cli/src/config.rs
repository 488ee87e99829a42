//! Configuration and Search-Parameter Document Parsing
//!
//! The search-parameter document is a JSON object passed on the command
//! line; it carries everything the remote index needs per request. Parsing
//! resolves the string-keyed `index_type` into the closed
//! [`SearchParams`] variant in one exhaustive match, so unknown index
//! kinds fail with a named error before dispatch rather than a panic
//! mid-run.
//!
//! The resolved [`BenchConfig`] is immutable: built once, validated once,
//! and passed by reference into the partitioner and executors. There is no
//! process-wide configuration state.

use serde::Deserialize;
use siftbench_core::{MetricKind, SearchParams, SearchRequest};
use siftbench_report::OutputFormat;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Configuration problem detected before dispatch.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No service endpoint given.
    #[error("origin must be set")]
    MissingOrigin,

    /// No target collection given.
    #[error("collection_name must be set")]
    MissingCollection,

    /// Parallelism of zero makes no work assignable.
    #[error("parallelism must be at least 1")]
    ZeroParallelism,

    /// Neither a query document nor a random-vector dimension was given.
    #[error("either --queries or --dim must be provided")]
    MissingQuerySource,

    /// Random-vector generation needs a positive dimension and count.
    #[error("random query vectors need --dim and --nq of at least 1")]
    BadRandomQueries,

    /// A tuning knob the resolved index type requires is absent.
    #[error("search parameter document is missing params.{0}")]
    MissingKnob(&'static str),

    /// `index_type` outside the supported closed set.
    #[error("unsupported index type {0:?}, must be one of [HNSW, IVF_FLAT, IVF_SQ8]")]
    UnsupportedIndexType(String),

    /// Failure-rate abort threshold outside (0, 1].
    #[error("abort-failures threshold must be within (0, 1], got {0}")]
    BadFailureThreshold(f64),

    /// The search-parameter document is not valid JSON of the expected
    /// shape.
    #[error("malformed search parameter document: {0}")]
    Document(#[from] serde_json::Error),
}

/// Algorithm tuning knobs as they appear in the document; which one is
/// required depends on `index_type`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TuningDoc {
    /// HNSW candidate-list size.
    #[serde(default)]
    pub ef: Option<u32>,
    /// IVF probe count.
    #[serde(default)]
    pub nprobe: Option<u32>,
}

fn default_limit() -> usize {
    10
}

/// The raw search-parameter document, exactly as accepted on the command
/// line.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchParamsDoc {
    /// Target collection.
    #[serde(default)]
    pub collection_name: String,
    /// Partition filter; empty means all partitions.
    #[serde(default)]
    pub partition_names: Vec<String>,
    /// Vector field searched against.
    #[serde(default = "default_field")]
    pub field_name: String,
    /// Index algorithm tag: HNSW, IVF_FLAT, or IVF_SQ8.
    pub index_type: String,
    /// Distance function of the target index.
    #[serde(default = "default_metric")]
    pub metric_type: MetricKind,
    /// Algorithm tuning knobs.
    #[serde(default)]
    pub params: TuningDoc,
    /// Maximum hits per query vector.
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Boolean filter expression.
    #[serde(default)]
    pub expr: Option<String>,
    /// Fields returned with each hit.
    #[serde(default)]
    pub output_fields: Vec<String>,
}

fn default_field() -> String {
    "vector".to_string()
}

fn default_metric() -> MetricKind {
    MetricKind::L2
}

impl SearchParamsDoc {
    /// Parse a document from its JSON text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Resolve the document into a typed search request.
    pub fn resolve(self) -> Result<SearchRequest, ConfigError> {
        let params = match self.index_type.as_str() {
            "HNSW" => SearchParams::Hnsw {
                ef: self.params.ef.ok_or(ConfigError::MissingKnob("ef"))?,
            },
            "IVF_FLAT" => SearchParams::IvfFlat {
                nprobe: self
                    .params
                    .nprobe
                    .ok_or(ConfigError::MissingKnob("nprobe"))?,
            },
            "IVF_SQ8" => SearchParams::IvfSq8 {
                nprobe: self
                    .params
                    .nprobe
                    .ok_or(ConfigError::MissingKnob("nprobe"))?,
            },
            other => return Err(ConfigError::UnsupportedIndexType(other.to_string())),
        };

        Ok(SearchRequest {
            collection: self.collection_name,
            partitions: self.partition_names,
            expr: self.expr.filter(|e| !e.is_empty()),
            output_fields: self.output_fields,
            field: self.field_name,
            metric: self.metric_type,
            limit: self.limit,
            params,
        })
    }
}

/// The immutable configuration of one benchmark run.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Service endpoint, e.g. `http://localhost:19530`.
    pub origin: String,
    /// Fixed request parameters shared by every query.
    pub request: SearchRequest,
    /// Total number of search requests to issue.
    pub total: usize,
    /// Number of concurrent workers.
    pub parallel: usize,
    /// Connection-establishment timeout, applied once before dispatch.
    pub dial_timeout: Duration,
    /// Abort the run once this fraction of requests has failed.
    pub abort_failure_ratio: Option<f64>,
    /// Report format.
    pub format: OutputFormat,
    /// Report destination; stdout when unset.
    pub output: Option<PathBuf>,
}

impl BenchConfig {
    /// Reject configurations that cannot produce a meaningful run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.origin.is_empty() {
            return Err(ConfigError::MissingOrigin);
        }
        if self.request.collection.is_empty() {
            return Err(ConfigError::MissingCollection);
        }
        if self.parallel == 0 {
            return Err(ConfigError::ZeroParallelism);
        }
        if let Some(ratio) = self.abort_failure_ratio {
            if !(ratio > 0.0 && ratio <= 1.0) {
                return Err(ConfigError::BadFailureThreshold(ratio));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HNSW_DOC: &str = r#"{
        "collection_name": "glove25",
        "field_name": "embedding",
        "index_type": "HNSW",
        "metric_type": "IP",
        "params": {"ef": 64},
        "limit": 5,
        "expr": "id > 0",
        "output_fields": ["id"]
    }"#;

    fn config(request: SearchRequest) -> BenchConfig {
        BenchConfig {
            origin: "http://localhost:19530".to_string(),
            request,
            total: 10,
            parallel: 2,
            dial_timeout: Duration::from_secs(20),
            abort_failure_ratio: None,
            format: OutputFormat::Text,
            output: None,
        }
    }

    #[test]
    fn test_hnsw_document_resolves() {
        let request = SearchParamsDoc::parse(HNSW_DOC).unwrap().resolve().unwrap();

        assert_eq!(request.collection, "glove25");
        assert_eq!(request.field, "embedding");
        assert_eq!(request.metric, MetricKind::Ip);
        assert_eq!(request.params, SearchParams::Hnsw { ef: 64 });
        assert_eq!(request.limit, 5);
        assert_eq!(request.expr.as_deref(), Some("id > 0"));
    }

    #[test]
    fn test_ivf_documents_resolve() {
        for (index_type, expected) in [
            ("IVF_FLAT", SearchParams::IvfFlat { nprobe: 16 }),
            ("IVF_SQ8", SearchParams::IvfSq8 { nprobe: 16 }),
        ] {
            let doc = format!(
                r#"{{"collection_name": "c", "index_type": "{index_type}", "params": {{"nprobe": 16}}}}"#
            );
            let request = SearchParamsDoc::parse(&doc).unwrap().resolve().unwrap();
            assert_eq!(request.params, expected);
        }
    }

    #[test]
    fn test_unknown_index_type_rejected() {
        let doc = r#"{"collection_name": "c", "index_type": "DISKANN", "params": {"ef": 1}}"#;
        let err = SearchParamsDoc::parse(doc).unwrap().resolve().unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedIndexType(kind) if kind == "DISKANN"));
    }

    #[test]
    fn test_missing_knob_rejected() {
        let doc = r#"{"collection_name": "c", "index_type": "HNSW"}"#;
        let err = SearchParamsDoc::parse(doc).unwrap().resolve().unwrap_err();
        assert!(matches!(err, ConfigError::MissingKnob("ef")));
    }

    #[test]
    fn test_empty_expr_becomes_none() {
        let doc = r#"{"collection_name": "c", "index_type": "HNSW", "params": {"ef": 8}, "expr": ""}"#;
        let request = SearchParamsDoc::parse(doc).unwrap().resolve().unwrap();
        assert_eq!(request.expr, None);
    }

    #[test]
    fn test_validate_catches_missing_fields() {
        let request = SearchParamsDoc::parse(HNSW_DOC).unwrap().resolve().unwrap();

        let mut missing_origin = config(request.clone());
        missing_origin.origin.clear();
        assert!(matches!(
            missing_origin.validate(),
            Err(ConfigError::MissingOrigin)
        ));

        let mut missing_collection = config(request.clone());
        missing_collection.request.collection.clear();
        assert!(matches!(
            missing_collection.validate(),
            Err(ConfigError::MissingCollection)
        ));

        let mut zero_parallel = config(request.clone());
        zero_parallel.parallel = 0;
        assert!(matches!(
            zero_parallel.validate(),
            Err(ConfigError::ZeroParallelism)
        ));

        let mut bad_threshold = config(request);
        bad_threshold.abort_failure_ratio = Some(1.5);
        assert!(matches!(
            bad_threshold.validate(),
            Err(ConfigError::BadFailureThreshold(_))
        ));
    }
}
