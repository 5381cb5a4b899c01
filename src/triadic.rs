//! Triadic Memory: Hebbian store/query of triples `(X, Y, Z)` over SDRs,
//! queryable on any one axis given the other two.
//!
//! `store(X, Y, Z)` increments the cell at every `(x_i, y_j, z_k)` triple
//! across the three input SDRs. `query` leaves exactly one of its three
//! arguments `None`; that position selects which axis is summed over and
//! returned. Both backends use counter semantics (saturating add).

use std::collections::HashMap;

use crate::binarize::binarize;
use crate::error::MemoryError;
use crate::sdr::validate_sdr;
use crate::Sdr;

const DENSE_WARN_BYTES: u64 = 1 << 30; // 1 GiB

fn check_shape(n: u32, p: u32) -> Result<(), MemoryError> {
    if p == 0 || p > n {
        return Err(MemoryError::ShapeMismatch { n, p });
    }
    Ok(())
}

/// Store/query contract shared by the dense and sparse backends.
pub trait TriadicMemory {
    /// Increments every cell `(x_i, y_j, z_k)` across the three SDRs.
    fn store(&mut self, x: &[u32], y: &[u32], z: &[u32]) -> Result<(), MemoryError>;

    /// Queries the axis left as `None`. Exactly one of `x`, `y`, `z` must
    /// be absent, or this returns [`MemoryError::Axis`].
    fn query(
        &self,
        x: Option<&[u32]>,
        y: Option<&[u32]>,
        z: Option<&[u32]>,
    ) -> Result<Sdr, MemoryError>;

    /// Diagnostic: number of stored entries (dense: constant; sparse: grows
    /// with touched cells).
    fn size(&self) -> usize;

    /// Configured bit-space size.
    fn n(&self) -> u32;

    /// Configured solidity.
    fn p(&self) -> u32;

    /// Convenience wrapper: recall `Z` from `X, Y`.
    fn query_z(&self, x: &[u32], y: &[u32]) -> Result<Sdr, MemoryError> {
        self.query(Some(x), Some(y), None)
    }

    /// Convenience wrapper: recall `X` from `Y, Z`.
    fn query_x(&self, y: &[u32], z: &[u32]) -> Result<Sdr, MemoryError> {
        self.query(None, Some(y), Some(z))
    }

    /// Convenience wrapper: recall `Y` from `X, Z`.
    fn query_y(&self, x: &[u32], z: &[u32]) -> Result<Sdr, MemoryError> {
        self.query(Some(x), None, Some(z))
    }
}

/// Dense backend: a flat `N x N x N` one-byte counter cube, row-major in
/// `(x, y, z)` so a Z-query sums a contiguous run and an X- or Y-query
/// strides over it.
#[derive(Debug, Clone)]
pub struct DenseTriadicMemory {
    n: u32,
    p: u32,
    counters: Vec<u8>,
}

impl DenseTriadicMemory {
    /// Allocates a fresh, all-zero `N^3` counter cube.
    pub fn new(n: u32, p: u32) -> Result<Self, MemoryError> {
        check_shape(n, p)?;
        let bytes = (n as u64).pow(3);
        if bytes >= DENSE_WARN_BYTES {
            tracing::warn!(
                n,
                p,
                bytes,
                "dense triadic memory allocation crosses 1 GiB; consider SparseTriadicMemory"
            );
        }
        Ok(Self {
            n,
            p,
            counters: vec![0u8; bytes as usize],
        })
    }

    #[inline]
    fn index(&self, x: u32, y: u32, z: u32) -> usize {
        let n = self.n as u64;
        ((x as u64) * n * n + (y as u64) * n + z as u64) as usize
    }
}

impl TriadicMemory for DenseTriadicMemory {
    fn store(&mut self, x: &[u32], y: &[u32], z: &[u32]) -> Result<(), MemoryError> {
        validate_sdr(x, self.n)?;
        validate_sdr(y, self.n)?;
        validate_sdr(z, self.n)?;
        for &ax in x {
            for &ay in y {
                for &az in z {
                    let idx = self.index(ax, ay, az);
                    self.counters[idx] = self.counters[idx].saturating_add(1);
                }
            }
        }
        Ok(())
    }

    fn query(
        &self,
        x: Option<&[u32]>,
        y: Option<&[u32]>,
        z: Option<&[u32]>,
    ) -> Result<Sdr, MemoryError> {
        let n = self.n as usize;
        let mut sums = vec![0u32; n];
        match (x, y, z) {
            (Some(x), Some(y), None) => {
                validate_sdr(x, self.n)?;
                validate_sdr(y, self.n)?;
                for &ax in x {
                    for &ay in y {
                        let start = self.index(ax, ay, 0);
                        for (s, &v) in sums.iter_mut().zip(&self.counters[start..start + n]) {
                            *s += v as u32;
                        }
                    }
                }
            }
            (None, Some(y), Some(z)) => {
                validate_sdr(y, self.n)?;
                validate_sdr(z, self.n)?;
                for &ay in y {
                    for &az in z {
                        for (ax, s) in sums.iter_mut().enumerate() {
                            *s += self.counters[self.index(ax as u32, ay, az)] as u32;
                        }
                    }
                }
            }
            (Some(x), None, Some(z)) => {
                validate_sdr(x, self.n)?;
                validate_sdr(z, self.n)?;
                for &ax in x {
                    for &az in z {
                        for (ay, s) in sums.iter_mut().enumerate() {
                            *s += self.counters[self.index(ax, ay as u32, az)] as u32;
                        }
                    }
                }
            }
            _ => return Err(MemoryError::Axis),
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

type AxisMap = HashMap<(u32, u32), HashMap<u32, u32>>;

/// Sparse backend: three parallel outer-to-inner maps, one per query axis,
/// so every axis query is a direct lookup followed by a fold over the
/// inner map rather than a scan. This triples storage relative to a single
/// map but keeps all three query directions symmetric.
#[derive(Debug, Clone, Default)]
pub struct SparseTriadicMemory {
    n: u32,
    p: u32,
    by_yz: AxisMap, // (y, z) -> { x: count }
    by_xz: AxisMap, // (x, z) -> { y: count }
    by_xy: AxisMap, // (x, y) -> { z: count }
}

impl SparseTriadicMemory {
    /// Creates an empty sparse triadic memory for bit-space `n` and
    /// solidity `p`.
    pub fn new(n: u32, p: u32) -> Result<Self, MemoryError> {
        check_shape(n, p)?;
        Ok(Self {
            n,
            p,
            by_yz: HashMap::new(),
            by_xz: HashMap::new(),
            by_xy: HashMap::new(),
        })
    }
}

fn bump(map: &mut AxisMap, outer: (u32, u32), inner: u32) {
    let count = map.entry(outer).or_default().entry(inner).or_insert(0);
    *count = count.saturating_add(1);
}

fn fold_axis(map: &AxisMap, keys: impl Iterator<Item = (u32, u32)>, sums: &mut [u32]) {
    for key in keys {
        if let Some(row) = map.get(&key) {
            for (&idx, &count) in row {
                sums[idx as usize] += count;
            }
        }
    }
}

impl TriadicMemory for SparseTriadicMemory {
    fn store(&mut self, x: &[u32], y: &[u32], z: &[u32]) -> Result<(), MemoryError> {
        validate_sdr(x, self.n)?;
        validate_sdr(y, self.n)?;
        validate_sdr(z, self.n)?;
        for &ax in x {
            for &ay in y {
                for &az in z {
                    bump(&mut self.by_yz, (ay, az), ax);
                    bump(&mut self.by_xz, (ax, az), ay);
                    bump(&mut self.by_xy, (ax, ay), az);
                }
            }
        }
        tracing::debug!(cells = self.by_xy.len(), "sparse triadic store");
        Ok(())
    }

    fn query(
        &self,
        x: Option<&[u32]>,
        y: Option<&[u32]>,
        z: Option<&[u32]>,
    ) -> Result<Sdr, MemoryError> {
        let mut sums = vec![0u32; self.n as usize];
        match (x, y, z) {
            (Some(x), Some(y), None) => {
                validate_sdr(x, self.n)?;
                validate_sdr(y, self.n)?;
                let keys = x.iter().flat_map(|&ax| y.iter().map(move |&ay| (ax, ay)));
                fold_axis(&self.by_xy, keys, &mut sums);
            }
            (None, Some(y), Some(z)) => {
                validate_sdr(y, self.n)?;
                validate_sdr(z, self.n)?;
                let keys = y.iter().flat_map(|&ay| z.iter().map(move |&az| (ay, az)));
                fold_axis(&self.by_yz, keys, &mut sums);
            }
            (Some(x), None, Some(z)) => {
                validate_sdr(x, self.n)?;
                validate_sdr(z, self.n)?;
                let keys = x.iter().flat_map(|&ax| z.iter().map(move |&az| (ax, az)));
                fold_axis(&self.by_xz, keys, &mut sums);
            }
            _ => return Err(MemoryError::Axis),
        }
        Ok(binarize(&sums, self.p as usize))
    }

    fn size(&self) -> usize {
        self.by_yz.values().map(|row| row.len()).sum::<usize>() * 3
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
        ChaCha8Rng::seed_from_u64(11)
    }

    #[test]
    fn single_triple_recall_each_axis_dense() {
        let mut r = rng();
        let x = random_sdr(&mut r, 300, 10);
        let y = random_sdr(&mut r, 300, 10);
        let z = random_sdr(&mut r, 300, 10);
        let mut mem = DenseTriadicMemory::new(300, 10).unwrap();
        mem.store(&x, &y, &z).unwrap();
        assert_eq!(mem.query_z(&x, &y).unwrap(), z);
        assert_eq!(mem.query_x(&y, &z).unwrap(), x);
        assert_eq!(mem.query_y(&x, &z).unwrap(), y);
    }

    #[test]
    fn single_triple_recall_each_axis_sparse() {
        let mut r = rng();
        let x = random_sdr(&mut r, 300, 10);
        let y = random_sdr(&mut r, 300, 10);
        let z = random_sdr(&mut r, 300, 10);
        let mut mem = SparseTriadicMemory::new(300, 10).unwrap();
        mem.store(&x, &y, &z).unwrap();
        assert_eq!(mem.query_z(&x, &y).unwrap(), z);
        assert_eq!(mem.query_x(&y, &z).unwrap(), x);
        assert_eq!(mem.query_y(&x, &z).unwrap(), y);
    }

    #[test]
    fn store_is_idempotent() {
        let mut r = rng();
        let x = random_sdr(&mut r, 300, 10);
        let y = random_sdr(&mut r, 300, 10);
        let z = random_sdr(&mut r, 300, 10);
        let mut mem = DenseTriadicMemory::new(300, 10).unwrap();
        mem.store(&x, &y, &z).unwrap();
        let before = mem.query_z(&x, &y).unwrap();
        mem.store(&x, &y, &z).unwrap();
        assert_eq!(mem.query_z(&x, &y).unwrap(), before);
    }

    #[test]
    fn query_rejects_wrong_number_of_absent_axes() {
        let mem = DenseTriadicMemory::new(100, 10).unwrap();
        let a = vec![1u32, 2, 3];
        assert_eq!(mem.query(Some(&a), Some(&a), Some(&a)), Err(MemoryError::Axis));
        assert_eq!(mem.query(None, None, Some(&a)), Err(MemoryError::Axis));
    }

    #[test]
    fn dense_and_sparse_agree_on_all_three_axes() {
        let mut r = rng();
        let triples: Vec<_> = (0..15)
            .map(|_| {
                (
                    random_sdr(&mut r, 300, 10),
                    random_sdr(&mut r, 300, 10),
                    random_sdr(&mut r, 300, 10),
                )
            })
            .collect();
        let mut dense = DenseTriadicMemory::new(300, 10).unwrap();
        let mut sparse = SparseTriadicMemory::new(300, 10).unwrap();
        for (x, y, z) in &triples {
            dense.store(x, y, z).unwrap();
            sparse.store(x, y, z).unwrap();
        }
        for (x, y, z) in &triples {
            assert_eq!(dense.query_z(x, y).unwrap(), sparse.query_z(x, y).unwrap());
            assert_eq!(dense.query_x(y, z).unwrap(), sparse.query_x(y, z).unwrap());
            assert_eq!(dense.query_y(x, z).unwrap(), sparse.query_y(x, z).unwrap());
        }
    }

    #[test]
    fn bulk_triadic_z_query_matches_exactly() {
        // Uses the spec's literal N=1000, P=10 (S2) via the sparse backend
        // so the unit test doesn't pay for a 1 GiB dense cube allocation.
        let mut r = rng();
        let n = 1000u32;
        let p = 10u32;
        let count = 300usize;
        let xs = crate::sdr::random_sdrs(&mut r, count + 2, n, p).unwrap();
        let mut mem = SparseTriadicMemory::new(n, p).unwrap();
        for k in 0..count {
            mem.store(&xs[k], &xs[k + 1], &xs[k + 2]).unwrap();
        }
        for k in 0..count {
            assert_eq!(mem.query_z(&xs[k], &xs[k + 1]).unwrap(), xs[k + 2]);
        }
    }
}
