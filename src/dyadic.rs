//! Dyadic Memory: Hebbian store/recall of pairs `X -> Y` over SDRs.
//!
//! `store(X, Y)` increments, for every pair-address derived from `X`, the
//! count at every `Y`-bit's column. `recall(X)` accumulates those rows back
//! and hands the sum to [`crate::binarize::binarize`]. Two backends trade
//! memory for throughput; both use counter semantics (saturating add on
//! every touched cell, never a plain set-to-1), so repeated or overlapping
//! stores degrade gracefully instead of losing evidence on overwrite.

use std::collections::HashMap;

use crate::address::pair_addresses;
use crate::binarize::binarize;
use crate::error::MemoryError;
use crate::sdr::validate_sdr;
use crate::Sdr;

/// Store/recall contract shared by the dense and sparse backends.
pub trait DyadicMemory {
    /// Associates `Y` with `X`: every pair-address of `X` has every bit of
    /// `Y` incremented at that row.
    fn store(&mut self, x: &[u32], y: &[u32]) -> Result<(), MemoryError>;

    /// Accumulates the rows addressed by `X` and binarizes the result.
    fn recall(&self, x: &[u32]) -> Result<Sdr, MemoryError>;

    /// Diagnostic: number of stored (cell) entries. For the dense backend
    /// this is a constant (the full allocation); for the sparse backend it
    /// grows with the number of touched cells.
    fn size(&self) -> usize;

    /// Configured bit-space size.
    fn n(&self) -> u32;

    /// Configured solidity.
    fn p(&self) -> u32;
}

const DENSE_WARN_BYTES: u64 = 1 << 30; // 1 GiB

fn check_shape(n: u32, p: u32) -> Result<(), MemoryError> {
    if p == 0 || p > n {
        return Err(MemoryError::ShapeMismatch { n, p });
    }
    Ok(())
}

/// Dense backend: a contiguous `N(N-1)/2 x N` counter matrix, one byte per
/// cell, saturating increment.
#[derive(Debug, Clone)]
pub struct DenseDyadicMemory {
    n: u32,
    p: u32,
    rows: u64,
    counters: Vec<u8>,
}

impl DenseDyadicMemory {
    /// Allocates a fresh, all-zero dense dyadic memory for bit-space `n`
    /// and solidity `p`.
    pub fn new(n: u32, p: u32) -> Result<Self, MemoryError> {
        check_shape(n, p)?;
        let rows = (n as u64) * (n as u64 - 1) / 2;
        let bytes = rows * n as u64;
        if bytes >= DENSE_WARN_BYTES {
            tracing::warn!(
                n,
                p,
                bytes,
                "dense dyadic memory allocation crosses 1 GiB; consider SparseDyadicMemory"
            );
        }
        Ok(Self {
            n,
            p,
            rows,
            counters: vec![0u8; bytes as usize],
        })
    }

    #[inline]
    fn row(&self, addr: u64) -> &[u8] {
        let start = (addr * self.n as u64) as usize;
        &self.counters[start..start + self.n as usize]
    }

    #[inline]
    fn row_mut(&mut self, addr: u64) -> &mut [u8] {
        let start = (addr * self.n as u64) as usize;
        &mut self.counters[start..start + self.n as usize]
    }
}

impl DyadicMemory for DenseDyadicMemory {
    fn store(&mut self, x: &[u32], y: &[u32]) -> Result<(), MemoryError> {
        validate_sdr(x, self.n)?;
        validate_sdr(y, self.n)?;
        for addr in pair_addresses(x) {
            debug_assert!(addr < self.rows);
            let row = self.row_mut(addr);
            for &bit in y {
                row[bit as usize] = row[bit as usize].saturating_add(1);
            }
        }
        Ok(())
    }

    fn recall(&self, x: &[u32]) -> Result<Sdr, MemoryError> {
        validate_sdr(x, self.n)?;
        let mut sums = vec![0u32; self.n as usize];
        for addr in pair_addresses(x) {
            debug_assert!(addr < self.rows);
            for (s, &v) in sums.iter_mut().zip(self.row(addr)) {
                *s += v as u32;
            }
        }
        Ok(binarize(&sums, self.p as usize))
    }

    fn size(&self) -> usize {
        self.counters.len()
    }

    fn n(&self) -> u32 {
        self.n
    }

    fn p(&self) -> u32 {
        self.p
    }
}

/// Sparse backend: an outer map from pair-address to an inner map from
/// column to saturating count. Memory scales with the set of touched
/// cells rather than `N^3`.
#[derive(Debug, Clone, Default)]
pub struct SparseDyadicMemory {
    n: u32,
    p: u32,
    cells: HashMap<u64, HashMap<u32, u32>>,
}

impl SparseDyadicMemory {
    /// Creates an empty sparse dyadic memory for bit-space `n` and solidity
    /// `p`.
    pub fn new(n: u32, p: u32) -> Result<Self, MemoryError> {
        check_shape(n, p)?;
        Ok(Self {
            n,
            p,
            cells: HashMap::new(),
        })
    }
}

impl DyadicMemory for SparseDyadicMemory {
    fn store(&mut self, x: &[u32], y: &[u32]) -> Result<(), MemoryError> {
        validate_sdr(x, self.n)?;
        validate_sdr(y, self.n)?;
        for addr in pair_addresses(x) {
            let row = self.cells.entry(addr).or_default();
            for &bit in y {
                let count = row.entry(bit).or_insert(0);
                *count = count.saturating_add(1);
            }
        }
        tracing::debug!(rows = self.cells.len(), "sparse dyadic store");
        Ok(())
    }

    fn recall(&self, x: &[u32]) -> Result<Sdr, MemoryError> {
        validate_sdr(x, self.n)?;
        let mut sums = vec![0u32; self.n as usize];
        for addr in pair_addresses(x) {
            if let Some(row) = self.cells.get(&addr) {
                for (&col, &count) in row {
                    sums[col as usize] += count;
                }
            }
        }
        Ok(binarize(&sums, self.p as usize))
    }

    fn size(&self) -> usize {
        self.cells.values().map(|row| row.len()).sum()
    }

    fn n(&self) -> u32 {
        self.n
    }

    fn p(&self) -> u32 {
        self.p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdr::random_sdr;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    #[test]
    fn rejects_bad_shape() {
        assert!(DenseDyadicMemory::new(100, 0).is_err());
        assert!(DenseDyadicMemory::new(100, 101).is_err());
    }

    #[test]
    fn single_pair_recall_dense() {
        let mut r = rng();
        let x = random_sdr(&mut r, 200, 10);
        let y = random_sdr(&mut r, 200, 10);
        let mut mem = DenseDyadicMemory::new(200, 10).unwrap();
        mem.store(&x, &y).unwrap();
        assert_eq!(mem.recall(&x).unwrap(), y);
    }

    #[test]
    fn single_pair_recall_sparse() {
        let mut r = rng();
        let x = random_sdr(&mut r, 200, 10);
        let y = random_sdr(&mut r, 200, 10);
        let mut mem = SparseDyadicMemory::new(200, 10).unwrap();
        mem.store(&x, &y).unwrap();
        assert_eq!(mem.recall(&x).unwrap(), y);
    }

    #[test]
    fn store_is_idempotent_under_repetition() {
        let mut r = rng();
        let x = random_sdr(&mut r, 200, 10);
        let y = random_sdr(&mut r, 200, 10);
        let mut mem = DenseDyadicMemory::new(200, 10).unwrap();
        mem.store(&x, &y).unwrap();
        let first = mem.recall(&x).unwrap();
        mem.store(&x, &y).unwrap();
        assert_eq!(mem.recall(&x).unwrap(), first);
    }

    #[test]
    fn dense_and_sparse_backends_agree_bit_for_bit() {
        let mut r = rng();
        let pairs: Vec<_> = (0..20)
            .map(|_| (random_sdr(&mut r, 200, 10), random_sdr(&mut r, 200, 10)))
            .collect();
        let mut dense = DenseDyadicMemory::new(200, 10).unwrap();
        let mut sparse = SparseDyadicMemory::new(200, 10).unwrap();
        for (x, y) in &pairs {
            dense.store(x, y).unwrap();
            sparse.store(x, y).unwrap();
        }
        for (x, _) in &pairs {
            assert_eq!(dense.recall(x).unwrap(), sparse.recall(x).unwrap());
        }
    }

    #[test]
    fn recall_rejects_out_of_range_bits() {
        let mem = DenseDyadicMemory::new(100, 10).unwrap();
        let bad = vec![5u32, 200];
        assert_eq!(
            mem.recall(&bad),
            Err(MemoryError::OutOfRange { bit: 200, n: 100 })
        );
    }

    #[test]
    fn bulk_dyadic_recall_matches_next_token_overwhelming_majority() {
        // Small N keeps this a fast unit test; the literal N=1000 scenario
        // from the spec (S1) lives in tests/end_to_end.rs.
        let mut r = rng();
        let n = 200u32;
        let p = 10u32;
        let count = 150usize;
        let xs = crate::sdr::random_sdrs(&mut r, count + 1, n, p).unwrap();
        let mut mem = DenseDyadicMemory::new(n, p).unwrap();
        for i in 0..count {
            mem.store(&xs[i], &xs[i + 1]).unwrap();
        }
        let mut hits = 0;
        for i in 0..count {
            if mem.recall(&xs[i]).unwrap() == xs[i + 1] {
                hits += 1;
            }
        }
        assert!(hits as f64 / count as f64 > 0.99);
    }
}
