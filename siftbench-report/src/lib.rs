#![warn(missing_docs)]
//! Siftbench Report - Results Model and Serializations
//!
//! The immutable [`Results`] aggregate is produced exactly once per run,
//! after the join barrier, and rendered through two views:
//! - Text (human-readable terminal output)
//! - A structured JSON document with stable field names, suitable for
//!   machine diffing by downstream performance-tracking tooling

mod json;
mod report;
mod text;

pub use json::{write_json, DocumentError, ResultsDocument};
pub use report::{format_duration, Results};
pub use text::write_text;

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable terminal output.
    Text,
    /// Structured JSON document.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!(
                "unsupported output format {other:?}, must be one of [text, json]"
            )),
        }
    }
}
