//! Error type for heap operations

use crate::Key;

/// Errors reported by [`FibonacciHeap`](crate::FibonacciHeap) operations.
///
/// Only argument and emptiness failures are reported. Structural
/// inconsistencies are bugs and are never surfaced as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HeapError {
    /// `decrease_key` was asked to increase the key
    #[error("decrease amount must be non-negative, got {delta}")]
    NegativeDelta { delta: Key },

    /// The decreased key does not fit in the key type
    #[error("decreasing key {key} by {delta} overflows the key type")]
    KeyUnderflow { key: Key, delta: Key },

    /// `k_smallest` was called with `k` outside `[1, len]`
    #[error("k must lie in [1, {len}], got {k}")]
    KOutOfRange { k: usize, len: usize },

    /// `k_smallest` was called on a heap that is not a single tree
    #[error("k-smallest extraction needs a single-tree heap, found {roots} trees")]
    NotSingleTree { roots: usize },

    /// A removing operation was invoked on an empty heap
    #[error("operation requires a non-empty heap")]
    EmptyHeap,

    /// The handle's node has already been removed
    #[error("handle is no longer valid (element was removed)")]
    StaleHandle,

    /// The handle was issued by a heap on a different node arena
    #[error("handle belongs to a different heap arena")]
    ForeignHandle,
}

impl HeapError {
    /// Returns true for the invalid-argument family of errors.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            HeapError::NegativeDelta { .. }
                | HeapError::KeyUnderflow { .. }
                | HeapError::KOutOfRange { .. }
                | HeapError::NotSingleTree { .. }
        )
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = HeapError> = std::result::Result<T, E>;
