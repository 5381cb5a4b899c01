//! Sparse Distributed Representation (SDR) utilities.
//!
//! An SDR is a sorted, duplicate-free `Vec<u32>` of bit positions in
//! `[0, N)`. Every function here either takes sorted inputs and returns a
//! sorted output (the set operations, via a single merge pass) or produces
//! one from scratch (the generators). Randomness is always threaded through
//! an explicit `&mut impl Rng` rather than a crate-global source, so callers
//! control reproducibility by controlling the RNG they hand in.

use rand::Rng;

use crate::error::MemoryError;
use crate::Sdr;

/// Checks that `x` is strictly ascending, duplicate-free, and every bit is
/// `< n`. Internal hot paths (store/recall/query accumulation) skip this and
/// trust the caller; it exists for boundaries that want it.
pub fn validate_sdr(x: &[u32], n: u32) -> Result<(), MemoryError> {
    let mut prev: Option<u32> = None;
    for &bit in x {
        if bit >= n {
            return Err(MemoryError::OutOfRange { bit, n });
        }
        if let Some(p) = prev {
            if bit == p {
                return Err(MemoryError::Duplicate(bit));
            }
            if bit < p {
                return Err(MemoryError::NotSorted);
            }
        }
        prev = Some(bit);
    }
    Ok(())
}

/// Draws a sorted SDR of exactly `p` distinct bits, uniformly without
/// replacement from `[0, n)`.
pub fn random_sdr<R: Rng + ?Sized>(rng: &mut R, n: u32, p: u32) -> Sdr {
    let mut bits: Vec<u32> = rand::seq::index::sample(rng, n as usize, p as usize)
        .into_iter()
        .map(|i| i as u32)
        .collect();
    bits.sort_unstable();
    bits
}

/// Returns a sorted SDR derived from `x` by replacing exactly `k` of its
/// bits with fresh bits not currently present in `x`. The output has the
/// same solidity as `x`.
///
/// `k` must not exceed `x.len()`; there is always enough free bit-space
/// since `x` is itself a valid SDR of `n` bits.
pub fn near_sdr<R: Rng + ?Sized>(
    rng: &mut R,
    x: &[u32],
    n: u32,
    k: u32,
) -> Result<Sdr, MemoryError> {
    let p = x.len() as u32;
    if k > p {
        return Err(MemoryError::WrongSolidity {
            expected: p,
            got: k as usize,
        });
    }

    let drop_positions: std::collections::HashSet<usize> =
        rand::seq::index::sample(rng, x.len(), k as usize)
            .into_iter()
            .collect();
    let mut kept: Vec<u32> = x
        .iter()
        .enumerate()
        .filter(|(i, _)| !drop_positions.contains(i))
        .map(|(_, &v)| v)
        .collect();

    let mut present: std::collections::HashSet<u32> = kept.iter().copied().collect();
    while present.len() < kept.len() + k as usize {
        let candidate = rng.gen_range(0..n);
        present.insert(candidate);
    }
    kept.extend(present.into_iter().filter(|b| !kept.contains(b)));
    kept.sort_unstable();
    Ok(kept)
}

/// Generates `count + 1` SDRs: a fresh random seed followed by `count`
/// successive calls to [`near_sdr`], each switching `k` bits from the
/// previous one. Mirrors the reference implementation's `near_sdrs`, which
/// keeps the seed at index 0.
pub fn near_sdrs<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    n: u32,
    p: u32,
    k: u32,
) -> Result<Vec<Sdr>, MemoryError> {
    let mut out = Vec::with_capacity(count + 1);
    out.push(random_sdr(rng, n, p));
    for i in 0..count {
        let next = near_sdr(rng, &out[i], n, k)?;
        out.push(next);
    }
    Ok(out)
}

/// Generates `count` SDRs with zero overlap between consecutive pairs:
/// `near_sdrs(rng, count, n, p, p)` with the random seed dropped.
pub fn random_sdrs<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    n: u32,
    p: u32,
) -> Result<Vec<Sdr>, MemoryError> {
    let mut all = near_sdrs(rng, count, n, p, p)?;
    all.remove(0);
    Ok(all)
}

/// Counts bits shared between two sorted SDRs via a merge pass.
pub fn overlap(a: &[u32], b: &[u32]) -> usize {
    let (mut i, mut j) = (0, 0);
    let mut out = 0;
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Equal => {
                out += 1;
                i += 1;
                j += 1;
            }
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
        }
    }
    out
}

/// Sorted intersection of two sorted SDRs.
pub fn intersection(a: &[u32], b: &[u32]) -> Sdr {
    let (mut i, mut j) = (0, 0);
    let mut out = Vec::new();
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
        }
    }
    out
}

/// Sorted union of two sorted SDRs.
pub fn union(a: &[u32], b: &[u32]) -> Sdr {
    let (mut i, mut j) = (0, 0);
    let mut out = Vec::with_capacity(a.len() + b.len());
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
            std::cmp::Ordering::Less => {
                out.push(a[i]);
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                out.push(b[j]);
                j += 1;
            }
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out
}

/// Distance metric `1 - 2*overlap(a,b) / (|a|+|b|)`, in `[0, 1]`. `0` iff
/// `a == b` (given matching solidity), `1` iff `a` and `b` are disjoint.
pub fn distance(a: &[u32], b: &[u32]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 0.0;
    }
    1.0 - 2.0 * overlap(a, b) as f64 / total as f64
}
