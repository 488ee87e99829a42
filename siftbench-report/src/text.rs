//! Text Output
//!
//! Human-readable rendering of a [`Results`] value: successful count,
//! min/mean, each percentile, total elapsed time, and QPS. Aborted runs are
//! flagged up front so a partial report cannot be mistaken for a full one.

use crate::report::{format_duration, Results};
use std::io::{self, Write};

/// Write the human-readable report.
pub fn write_text<W: Write>(results: &Results, w: &mut W) -> io::Result<()> {
    writeln!(w, "Results")?;
    if results.aborted {
        writeln!(
            w,
            "PARTIAL: run aborted early after exceeding the failure budget"
        )?;
    }
    writeln!(w, "Successful: {}", results.successful)?;
    writeln!(w, "Failed: {}", results.failed)?;
    writeln!(w, "Min: {}", format_duration(results.min))?;
    writeln!(w, "Mean: {}", format_duration(results.mean))?;
    for &(label, value) in &results.percentiles {
        writeln!(w, "p{label}: {}", format_duration(value))?;
    }
    writeln!(w, "Took: {}", format_duration(results.took))?;
    writeln!(w, "QPS: {:.6}", results.queries_per_second)?;
    Ok(())
}
