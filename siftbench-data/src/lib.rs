#![warn(missing_docs)]
//! Siftbench Data - Query-Vector Sources
//!
//! Decoders and generators for the vectors that feed a run's queries:
//! - JSON lists of numeric vectors, from a file path or an inline document
//! - `.npy` typed-array files, decoded by descriptor: the declared element
//!   type and dimensions are read first, then a statically typed decode
//!   path produces a strongly typed matrix, reshaped row-major into one
//!   vector per row
//! - Seeded random unit vectors, for running without a dataset
//!
//! Decode failures are fatal before dispatch: a run never starts against
//! a partially decoded query set.

mod json;
mod npy;
mod random;

pub use json::load_json_vectors;
pub use npy::{read_matrix, DType, Descriptor, Matrix};
pub use random::random_vectors;

use thiserror::Error;

/// Failure to decode a query-vector document.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The source file could not be read.
    #[error("query source: {0}")]
    Io(#[from] std::io::Error),

    /// The JSON vector document did not parse as a list of numeric
    /// vectors.
    #[error("malformed vector document: {0}")]
    Json(#[from] serde_json::Error),

    /// The file does not start with the `.npy` magic string.
    #[error("not a npy file: bad magic")]
    BadMagic,

    /// A `.npy` format version this decoder does not understand.
    #[error("unsupported npy version {0}.{1}")]
    UnsupportedVersion(u8, u8),

    /// The header dictionary is malformed.
    #[error("malformed npy header: {0}")]
    Header(String),

    /// The declared element type has no typed decode path.
    #[error("unsupported npy element type {0:?}")]
    UnsupportedDtype(String),

    /// The declared shape is not a 2-d matrix of positive extent.
    #[error("expected a 2-d matrix, got shape {0:?}")]
    BadShape(Vec<usize>),

    /// The payload is shorter than the declared shape requires.
    #[error("payload truncated: expected {expected} bytes, found {found}")]
    Truncated {
        /// Bytes the descriptor promises.
        expected: usize,
        /// Bytes actually present after the header.
        found: usize,
    },

    /// The document decoded to zero query vectors.
    #[error("query source is empty")]
    Empty,
}
