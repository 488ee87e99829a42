//! Percentile Computation
//!
//! Nearest-rank order statistics over ascending-sorted duration samples.
//!
//! The rank rule is `pos = n·p/100 + 1` (integer floor), clamped to
//! `n - 1`, indexing zero-based into the sorted sequence. This is a fixed
//! +1-offset nearest-rank variant, not linear interpolation; report
//! consumers depend on these exact positions, so the rule must not be
//! swapped for an interpolating one.

use std::time::Duration;

/// The percentile labels reported for every run.
pub const TARGET_PERCENTILES: [u8; 5] = [50, 90, 95, 98, 99];

/// Zero-based rank position for percentile `p` over `n` sorted samples.
///
/// Meaningful only for `n >= 1`; callers guard the empty case.
pub fn rank_position(n: usize, percentile: u8) -> usize {
    let pos = n * percentile as usize / 100 + 1;
    if pos >= n {
        n.saturating_sub(1)
    } else {
        pos
    }
}

/// The value at percentile `p` of an ascending-sorted sample sequence.
///
/// Returns [`Duration::ZERO`] for an empty sequence.
pub fn percentile_of_sorted(sorted: &[Duration], percentile: u8) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    sorted[rank_position(sorted.len(), percentile)]
}
