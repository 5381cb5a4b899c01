//! Associative memory over Sparse Distributed Representations (SDRs).
//!
//! This crate is the single canonical entry-point for downstream users. It
//! centralizes the `Sdr` alias and re-exports the submodules implementing
//! the two associators and the sequence predictor built from them.
//!
//! ## Invariants
//!
//! - **SDR shape.** Every `Sdr` handed across a public API boundary is a
//!   strictly ascending, duplicate-free `Vec<u32>` with every bit `< N` for
//!   whichever memory instance it's passed to. [`sdr::validate_sdr`] checks
//!   this; internal accumulation loops do not re-check per element and
//!   treat a violation as a precondition failure at the boundary, never as
//!   undefined behavior past it.
//!
//! - **Counter semantics.** Both the dyadic and the triadic memories use
//!   saturating counters on every backend (dense or sparse) rather than
//!   set-to-1 semantics, so overlapping or repeated stores degrade
//!   gracefully instead of silently losing evidence.
//!
//! - **Append-only stores.** There is no delete. A memory's footprint is
//!   fixed at construction (dense) or grows with the set of touched cells
//!   (sparse); destruction releases the backing storage.
//!
//! - **Single mutable owner.** A memory instance has no internal
//!   synchronization. Concurrent `store` calls on the same instance must be
//!   serialized by the caller; concurrent reads of a quiescent instance are
//!   fine. See the crate's design notes for the sharding options this
//!   leaves open to a host.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

/// Pair-address linearization used by the dyadic memory (`addr(a,b)`).
pub mod address;
/// Accumulator -> SDR selector shared by both memories' recall/query paths.
pub mod binarize;
/// Dyadic memory: store/recall of pairs `X -> Y`, dense and sparse backends.
pub mod dyadic;
/// Precondition errors shared across the memory components.
pub mod error;
/// SDR generation, neighbor generation, and set-operation utilities.
pub mod sdr;
/// Sequence predictor built from two triadic memories.
pub mod sequence;
/// Triadic memory: store/query of triples `(X, Y, Z)` on any one axis.
pub mod triadic;

/// A Sparse Distributed Representation: a sorted, duplicate-free sequence
/// of bit positions in `[0, N)`. Canonical SDRs carry exactly `P` bits;
/// query/recall results may carry more under ambiguity (ties at the
/// binarize threshold) or fewer (the "nothing learned" fallback).
pub type Sdr = Vec<u32>;

pub use dyadic::{DenseDyadicMemory, DyadicMemory, SparseDyadicMemory};
pub use error::MemoryError;
pub use sequence::SequencePredictor;
pub use triadic::{DenseTriadicMemory, SparseTriadicMemory, TriadicMemory};
