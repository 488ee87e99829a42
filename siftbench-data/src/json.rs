//! JSON Vector Lists
//!
//! The simplest query source: a JSON array of numeric vectors, either in a
//! file or passed inline on the command line. The locator is treated as a
//! file path when such a file exists, and as an inline document otherwise.

use crate::DecodeError;
use std::fs;
use std::path::Path;

/// Load query vectors from a JSON document.
///
/// `locator` is either a path to a `.json` file or the document itself.
/// The document must be a non-empty array of arrays of numbers.
pub fn load_json_vectors(locator: &str) -> Result<Vec<Vec<f32>>, DecodeError> {
    let text;
    let document = if Path::new(locator).is_file() {
        text = fs::read_to_string(locator)?;
        text.as_str()
    } else {
        locator
    };

    let vectors: Vec<Vec<f32>> = serde_json::from_str(document)?;
    if vectors.is_empty() {
        return Err(DecodeError::Empty);
    }
    Ok(vectors)
}
