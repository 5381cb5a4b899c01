//! Accumulator -> SDR selector.
//!
//! Turns a dense non-negative count vector into a sparse SDR by taking the
//! top-`P` indices. This is the shared "read out" step for both the dyadic
//! and triadic memories' recall/query paths.

use crate::Sdr;

/// Converts `sums` (length `N`) into the sorted SDR of its top-`p`
/// activations.
///
/// If the `p`-th largest value is `0`, the response never reached the
/// target strength; this returns every nonzero index instead (the "nothing
/// learned strongly enough" fallback, distinct from an empty recall). Ties
/// at the threshold are all included, so the output may have more than `p`
/// bits; that is ambiguity, not an error, and is the caller's to interpret.
pub fn binarize(sums: &[u32], p: usize) -> Sdr {
    if p == 0 || sums.is_empty() {
        return Vec::new();
    }
    let mut sorted_desc = sums.to_vec();
    sorted_desc.sort_unstable_by(|a, b| b.cmp(a));
    let p = p.min(sorted_desc.len());
    let threshold = sorted_desc[p - 1];

    if threshold == 0 {
        return (0..sums.len() as u32)
            .zip(sums)
            .filter(|(_, &v)| v != 0)
            .map(|(i, _)| i)
            .collect();
    }
    (0..sums.len() as u32)
        .zip(sums)
        .filter(|(_, &v)| v >= threshold)
        .map(|(i, _)| i)
        .collect()
}
