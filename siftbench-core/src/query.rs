//! Request Data Model
//!
//! A benchmark run issues many [`Query`] values against one fixed
//! [`SearchRequest`]. The per-request payload (the vectors) is the only thing
//! that varies between requests, so queues hold `Query` values while the
//! request parameters are shared read-only across all workers.

use serde::{Deserialize, Serialize};

/// One similarity-search payload: a vector, or a batch of vectors searched in
/// a single request. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    vectors: Vec<Vec<f32>>,
}

impl Query {
    /// A single-vector query.
    pub fn single(vector: Vec<f32>) -> Self {
        Self {
            vectors: vec![vector],
        }
    }

    /// A batched query searching several vectors in one request.
    pub fn batch(vectors: Vec<Vec<f32>>) -> Self {
        Self { vectors }
    }

    /// The query vectors, in emission order.
    pub fn vectors(&self) -> &[Vec<f32>] {
        &self.vectors
    }
}

/// The distance/similarity function of the remote index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricKind {
    /// Euclidean distance.
    L2,
    /// Inner product.
    #[serde(rename = "IP")]
    Ip,
    /// Cosine similarity.
    #[serde(rename = "COSINE")]
    Cosine,
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricKind::L2 => write!(f, "L2"),
            MetricKind::Ip => write!(f, "IP"),
            MetricKind::Cosine => write!(f, "COSINE"),
        }
    }
}

/// Search-time tuning parameter, keyed by index algorithm.
///
/// This is a closed set: resolution from an untyped document happens in one
/// exhaustive match (see `siftbench-cli`), and unknown kinds are rejected
/// before dispatch rather than panicking mid-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchParams {
    /// Graph-based index; `ef` bounds the candidate list during traversal.
    Hnsw {
        /// Size of the dynamic candidate list.
        ef: u32,
    },
    /// Inverted-file index over raw vectors; `nprobe` buckets are scanned.
    IvfFlat {
        /// Number of inverted lists probed per query.
        nprobe: u32,
    },
    /// Inverted-file index over scalar-quantized vectors.
    IvfSq8 {
        /// Number of inverted lists probed per query.
        nprobe: u32,
    },
}

impl SearchParams {
    /// The index-algorithm tag this parameter belongs to.
    pub fn index_type(&self) -> &'static str {
        match self {
            SearchParams::Hnsw { .. } => "HNSW",
            SearchParams::IvfFlat { .. } => "IVF_FLAT",
            SearchParams::IvfSq8 { .. } => "IVF_SQ8",
        }
    }

    /// The tuning knob as a `(name, value)` pair, for wire encodings.
    pub fn knob(&self) -> (&'static str, u32) {
        match self {
            SearchParams::Hnsw { ef } => ("ef", *ef),
            SearchParams::IvfFlat { nprobe } | SearchParams::IvfSq8 { nprobe } => {
                ("nprobe", *nprobe)
            }
        }
    }
}

/// The fixed parameters shared by every request of a run.
///
/// Built once from the validated configuration and passed by reference into
/// the executors; never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Target collection on the remote service.
    pub collection: String,
    /// Partition filter; empty means all partitions.
    pub partitions: Vec<String>,
    /// Boolean filter expression, if any.
    pub expr: Option<String>,
    /// Fields to return with each hit.
    pub output_fields: Vec<String>,
    /// The vector field searched against.
    pub field: String,
    /// Distance function of the target index.
    pub metric: MetricKind,
    /// Maximum number of hits per query vector.
    pub limit: usize,
    /// Algorithm-specific search parameter.
    pub params: SearchParams,
}
