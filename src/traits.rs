//! Common traits for heap data structures
//!
//! This module provides a two-tier trait hierarchy for integer-keyed
//! priority queues:
//!
//! - [`Heap`]: Base trait covering push / peek / pop / merge
//! - [`DecreaseKeyHeap`]: Extended trait adding handle-based `decrease_key`
//!   and `delete`
//!
//! [`FibonacciHeap`](crate::FibonacciHeap) implements both. The traits let
//! tests and benchmarks drive any conforming heap through the same code.

use crate::error::HeapError;
use std::fmt;

/// A handle to an element in the heap, used for decrease_key operations
///
/// This is an opaque type that identifies a specific element in the heap.
pub trait Handle: Copy + Eq + fmt::Debug {}

/// Base trait for heap/priority queue data structures
///
/// Construction goes through [`Default`], so generic code writes
/// `H::default()`.
///
/// # Example
///
/// ```rust
/// use fibonacci_forest::{FibonacciHeap, Heap};
///
/// let mut heap = FibonacciHeap::default();
/// heap.push(3);
/// heap.push(1);
/// heap.push(2);
///
/// assert_eq!(heap.peek(), Some(1));
/// assert_eq!(heap.pop(), Some(1));
/// ```
pub trait Heap: Default {
    /// The ordering key
    type Key: Ord + Copy;

    /// Returns true if the heap is empty
    fn is_empty(&self) -> bool;

    /// Returns the number of elements in the heap
    fn len(&self) -> usize;

    /// Inserts a key
    ///
    /// # Time Complexity
    /// O(1) amortized for Fibonacci heaps.
    fn push(&mut self, key: Self::Key);

    /// Returns the minimum key without removing it
    ///
    /// # Time Complexity
    /// O(1)
    fn peek(&self) -> Option<Self::Key>;

    /// Removes and returns the minimum key
    ///
    /// # Time Complexity
    /// O(log n) amortized for Fibonacci heaps.
    fn pop(&mut self) -> Option<Self::Key>;

    /// Merges another heap into this one, consuming the other heap
    fn merge(&mut self, other: Self);
}

/// Extended heap trait with `decrease_key` and `delete` support
///
/// # Example
///
/// ```rust
/// use fibonacci_forest::{DecreaseKeyHeap, FibonacciHeap, Heap};
///
/// let mut heap = FibonacciHeap::default();
/// let handle = heap.push_with_handle(10);
/// heap.push(7);
/// heap.decrease_key(&handle, 5).unwrap();
/// assert_eq!(heap.peek(), Some(5));
/// ```
pub trait DecreaseKeyHeap: Heap {
    /// The handle type for this heap
    type Handle: Handle;

    /// Inserts a key, returning a handle to it
    fn push_with_handle(&mut self, key: Self::Key) -> Self::Handle;

    /// Decreases the key behind `handle` by `delta`
    ///
    /// # Errors
    /// Returns `HeapError::NegativeDelta` if `delta` is negative, or a handle
    /// error if the handle does not name a live element.
    ///
    /// # Time Complexity
    /// O(1) amortized for Fibonacci heaps.
    fn decrease_key(&mut self, handle: &Self::Handle, delta: Self::Key) -> Result<(), HeapError>;

    /// Removes the element behind `handle`, returning its key
    ///
    /// # Time Complexity
    /// O(log n) amortized for Fibonacci heaps.
    fn delete(&mut self, handle: &Self::Handle) -> Result<Self::Key, HeapError>;
}
