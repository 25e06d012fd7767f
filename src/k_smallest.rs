//! K-smallest extraction from a single-tree heap
//!
//! The k smallest keys of a heap-ordered tree can be read without touching
//! the tree: a private shadow heap holds the current frontier, one shadow per
//! candidate node, each carrying the key of its real node and its slot key.
//! Popping a shadow exposes the real node's children as new candidates.
//!
//! Only children of already-extracted nodes ever enter the frontier, so each
//! step costs O(deg(H)) and the whole extraction O(k · deg(H)).

use crate::error::{HeapError, Result};
use crate::fibonacci::{FibonacciHeap, Forest};
use crate::storage::{NodeArena, NodeKey};
use crate::Key;

/// Returns the `k` smallest keys of `heap` in non-decreasing order.
///
/// `heap` is not modified.
///
/// # Errors
/// - [`HeapError::KOutOfRange`] unless `1 <= k <= heap.len()`
/// - [`HeapError::NotSingleTree`] unless the root ring has exactly one tree
///
/// # Example
///
/// ```rust
/// use fibonacci_forest::{k_smallest, FibonacciHeap};
///
/// let mut heap = FibonacciHeap::new();
/// for key in [6, 2, 9, 4, 0] {
///     heap.insert(key);
/// }
/// // Removing the minimum consolidates four nodes into one tree
/// heap.delete_min().unwrap();
///
/// assert_eq!(k_smallest(&heap, 3).unwrap(), vec![2, 4, 6]);
/// assert_eq!(heap.len(), 4);
/// ```
pub fn k_smallest<T>(heap: &FibonacciHeap<T>, k: usize) -> Result<Vec<Key>> {
    let forest = heap.forest();
    let len = forest.len();
    if k == 0 || k > len {
        return Err(HeapError::KOutOfRange { k, len });
    }
    let roots = forest.roots();
    let root = match (roots.len(), roots.head()) {
        (1, Some(root)) => root,
        (count, _) => return Err(HeapError::NotSingleTree { roots: count }),
    };

    let source = heap.arena().borrow();
    let mut shadows: NodeArena<NodeKey> = NodeArena::new();
    let mut frontier = Forest::private();
    frontier.insert(&mut shadows, source[root].key, root);

    let mut out = Vec::with_capacity(k);
    while out.len() < k {
        let Some(top) = frontier.min() else { break };
        let real = shadows[top].item;
        for child in source[real].children.iter(&*source) {
            frontier.insert(&mut shadows, source[child].key, child);
        }
        let Some((key, _)) = frontier.delete_min(&mut shadows) else {
            break;
        };
        out.push(key);
    }
    Ok(out)
}

impl<T> FibonacciHeap<T> {
    /// Returns the `k` smallest keys without modifying the heap.
    ///
    /// See [`k_smallest`](crate::k_smallest()) for the preconditions.
    pub fn k_smallest(&self, k: usize) -> Result<Vec<Key>> {
        k_smallest(self, k)
    }
}
