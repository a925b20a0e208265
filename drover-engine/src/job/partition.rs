//! Record partitioning across workers

use std::ops::Range;

/// Splits `total` records into `workers` contiguous, disjoint ranges
///
/// The first `total % workers` ranges get one extra record, so sizes differ
/// by at most one. Returns no ranges when `workers` is zero.
pub fn partition(total: usize, workers: usize) -> Vec<Range<usize>> {
    if workers == 0 {
        return Vec::new();
    }

    let base = total / workers;
    let extra = total % workers;

    let mut ranges = Vec::with_capacity(workers);
    let mut start = 0;
    for idx in 0..workers {
        let len = if idx < extra { base + 1 } else { base };
        ranges.push(start..start + len);
        start += len;
    }

    ranges
}
