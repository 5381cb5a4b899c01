//! Precondition errors shared across the memory components.
//!
//! Every public constructor and store/recall/query entry point validates its
//! inputs once, at the boundary, and returns one of these variants rather
//! than panicking or corrupting memory state silently. Internal hot paths
//! (the inner accumulate loops) trust the caller already passed through
//! validation and do not re-check per element.

/// Errors surfaced by the dyadic/triadic memories, the sequence predictor,
/// and the SDR utilities.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MemoryError {
    /// An SDR was not strictly ascending.
    #[error("SDR is not sorted in strictly ascending order")]
    NotSorted,

    /// An SDR contained the same bit twice.
    #[error("SDR contains duplicate bit {0}")]
    Duplicate(u32),

    /// An SDR bit fell outside `[0, N)`.
    #[error("bit {bit} is out of range for N={n}")]
    OutOfRange {
        /// The offending bit index.
        bit: u32,
        /// The configured bit-space size.
        n: u32,
    },

    /// `near_sdr` was asked to switch more bits than its input SDR's
    /// solidity: `expected` is that solidity (the largest valid switch
    /// count), `got` is the switch count requested.
    #[error("expected solidity {expected}, got {got}")]
    WrongSolidity {
        /// Expected number of ON bits (or, for `near_sdr`, the largest valid
        /// switch count, equal to the source SDR's solidity).
        expected: u32,
        /// Actual number of ON bits observed (or, for `near_sdr`, the
        /// switch count requested).
        got: usize,
    },

    /// A triadic `query` call did not leave exactly one axis absent.
    #[error("triadic query must leave exactly one of x, y, z absent")]
    Axis,

    /// `(N, P)` at construction time was not a valid configuration.
    #[error("invalid memory shape: N={n}, P={p} (require 0 < P <= N)")]
    ShapeMismatch {
        /// Requested bit-space size.
        n: u32,
        /// Requested solidity.
        p: u32,
    },
}
