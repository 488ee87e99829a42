//! Search-Operation Boundary
//!
//! The remote nearest-neighbor service is an opaque collaborator behind the
//! [`SearchClient`] trait: any backend exposing vector-indexed top-k search
//! with this signature is substitutable. The CLI provides an HTTP/JSON
//! realization; tests provide mocks.

use crate::query::SearchRequest;
use serde::Deserialize;
use thiserror::Error;

/// A single nearest-neighbor hit.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchHit {
    /// Primary key of the matched entity.
    pub id: i64,
    /// Distance or similarity score under the request's metric.
    #[serde(alias = "distance")]
    pub score: f32,
}

/// Per-query top-k results, one hit list per query vector in the request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchResults {
    /// `hits[i]` are the top-k hits for the i-th query vector.
    #[serde(default)]
    pub hits: Vec<Vec<SearchHit>>,
}

/// Failure of an individual search request.
///
/// These are recorded as failed samples and never abort a worker on their
/// own; the coordinator owns the run-level failure policy.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (connection reset, timeout,
    /// serialization failure on the way out).
    #[error("transport: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("search rejected by remote service (status {status}): {message}")]
    Rejected {
        /// Protocol-level status code.
        status: u16,
        /// Error body returned by the service, possibly empty.
        message: String,
    },

    /// The service answered, but the response body did not decode.
    #[error("malformed search response: {0}")]
    Response(String),
}

/// An opaque vector-similarity search operation.
///
/// Implementations must be shareable across the worker threads of a run;
/// each worker issues one call at a time through a shared reference.
pub trait SearchClient: Sync {
    /// Execute one search request over the given query vectors, returning
    /// per-query top-k results.
    fn search(
        &self,
        request: &SearchRequest,
        vectors: &[Vec<f32>],
    ) -> Result<SearchResults, ClientError>;
}

impl<C: SearchClient + ?Sized> SearchClient for &C {
    fn search(
        &self,
        request: &SearchRequest,
        vectors: &[Vec<f32>],
    ) -> Result<SearchResults, ClientError> {
        (**self).search(request, vectors)
    }
}
