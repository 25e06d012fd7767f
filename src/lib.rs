//! Fibonacci Heap over integer keys
//!
//! This crate provides an arena-backed Fibonacci heap with handle-based
//! `decrease_key` and `delete`, and a non-destructive k-smallest extractor
//! for single-tree heaps.
//!
//! # Features
//!
//! - **O(1) amortized** insert, find-min, decrease-key and meld
//! - **O(log n) amortized** delete-min and delete
//! - **O(k · deg)** extraction of the k smallest keys without mutating the heap
//! - Link and cut counters, per heap or process-wide (see [`CounterScope`])
//! - The amortized potential `roots + 2 * marked` is exposed directly
//!
//! # Example
//!
//! ```rust
//! use fibonacci_forest::FibonacciHeap;
//!
//! let mut heap = FibonacciHeap::new();
//! let handle = heap.insert(5);
//! heap.insert(3);
//! heap.insert(8);
//!
//! heap.decrease_key(&handle, 4).unwrap();
//! assert_eq!(heap.min_key(), Some(1));
//! assert_eq!(heap.find_min(), Some(handle));
//! ```
//!
//! # Handles
//!
//! [`insert`](FibonacciHeap::insert) returns a [`FibonacciHandle`]. Handles
//! stay valid until their element is removed; after that they are rejected
//! with [`HeapError::StaleHandle`] rather than aliasing a new element.

pub mod config;
pub mod error;
pub mod fibonacci;
pub mod k_smallest;
pub mod rank;
pub mod stats;
mod storage;
pub mod traits;

/// Key type stored in the heap
pub type Key = i64;

pub use config::{CounterScope, HeapConfig};
pub use error::{HeapError, Result};
pub use fibonacci::{FibonacciHandle, FibonacciHeap};
pub use k_smallest::k_smallest;
pub use stats::{process_stats, LinkCutStats};
pub use traits::{DecreaseKeyHeap, Handle, Heap};
