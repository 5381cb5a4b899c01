//! Pair-address linearization for the dyadic memory.
//!
//! Given a sorted SDR `x = [x_0 < x_1 < ... < x_{P-1}]`, the pair-address
//! stream enumerates every unordered pair `{x_i, x_j}` with `i > j` through
//! the standard strictly-lower-triangular linearization
//! `addr(a, b) = a*(a-1)/2 + b` for `a > b`. This is bijective on unordered
//! pairs `{a, b}` with `a != b`, so two SDRs that are equal produce
//! identical address sequences and two SDRs that differ in at least two
//! bits produce different address sets.

/// Computes the linear address of an unordered pair `{a, b}`, `a != b`.
#[inline]
pub fn pair_address(a: u32, b: u32) -> u64 {
    let (hi, lo) = if a > b { (a, b) } else { (b, a) };
    (hi as u64) * (hi as u64 - 1) / 2 + lo as u64
}

/// Returns the `P(P-1)/2` pair-addresses of `x`, in the order: for `i` from
/// 1 to `P-1`, for `j` from 0 to `i-1`, `addr(x_i, x_j)`.
///
/// `x` is assumed sorted ascending (the crate-wide SDR contract); this
/// function does not itself validate that.
pub fn pair_addresses(x: &[u32]) -> Vec<u64> {
    let p = x.len();
    let mut out = Vec::with_capacity(p * p.saturating_sub(1) / 2);
    for i in 1..p {
        for j in 0..i {
            out.push(pair_address(x[i], x[j]));
        }
    }
    out
}
