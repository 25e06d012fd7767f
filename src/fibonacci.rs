//! Fibonacci Heap implementation
//!
//! A Fibonacci heap is a data structure for priority queue operations with:
//! - O(1) amortized insert, find_min, decrease_key, and meld
//! - O(log n) amortized delete_min
//!
//! The structure consists of a collection of heap-ordered trees. Roots are linked
//! in a circular doubly linked ring, and so are the children of every node.
//! The heap maintains the minimum root, the element count, and the number of
//! marked nodes.
//!
//! # Representation
//!
//! Nodes live in a slot-map arena (see [`crate::storage`]) and refer to each
//! other by key. Rings are [`circular_ring::Ring`] values holding one
//! representative and a cached length, so a node's rank is the length of its
//! child ring.
//!
//! # Amortized analysis
//!
//! The potential is `roots + 2 * marked`. Consolidation pays for every link
//! with a root it removes; each cascading cut pays with a mark it clears.
//! [`FibonacciHeap::potential`] exposes the value, and the link/cut counters
//! expose how much structural work has been done.

use crate::config::{CounterScope, HeapConfig};
use crate::error::{HeapError, Result};
use crate::rank;
use crate::stats::{self, LinkCutStats};
use crate::storage::{ArenaId, NodeArena, NodeKey, SharedArena};
use crate::traits::{DecreaseKeyHeap, Handle, Heap};
use crate::Key;
use circular_ring::Ring;
use smallvec::{smallvec, SmallVec};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, trace};

/// Handle to an element in a Fibonacci heap
///
/// A handle names its node by arena and generational slot key. Handles whose
/// node was removed are rejected with [`HeapError::StaleHandle`], and handles
/// from a heap on another arena with [`HeapError::ForeignHandle`].
///
/// Note: heaps created with [`FibonacciHeap::sibling`] share an arena, so a
/// handle from one sibling is *not* detected when passed to another. Doing so
/// is a caller error.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FibonacciHandle {
    arena: ArenaId,
    node: NodeKey,
}

impl Handle for FibonacciHandle {}

/// Root ring, minimum pointer and bookkeeping of one heap.
///
/// Every operation takes the node arena explicitly so that a heap and the
/// arena it borrows from are disjoint borrows.
#[derive(Debug, Default)]
pub(crate) struct Forest {
    roots: Ring<NodeKey>,
    min: Option<NodeKey>,
    len: usize,
    marked: usize,
    stats: LinkCutStats,
    /// Shadow heaps keep their links and cuts out of the process totals
    private: bool,
}

impl Forest {
    pub(crate) fn private() -> Self {
        Forest {
            private: true,
            ..Forest::default()
        }
    }

    #[inline]
    pub(crate) fn min(&self) -> Option<NodeKey> {
        self.min
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn roots(&self) -> &Ring<NodeKey> {
        &self.roots
    }

    fn record_link(&mut self) {
        self.stats.links += 1;
        if !self.private {
            stats::publish_link();
        }
    }

    fn record_cut(&mut self) {
        self.stats.cuts += 1;
        if !self.private {
            stats::publish_cut();
        }
    }

    fn take_min_candidate<T>(&mut self, arena: &NodeArena<T>, node: NodeKey) {
        match self.min {
            Some(min) if arena[min].key <= arena[node].key => {}
            _ => self.min = Some(node),
        }
    }

    pub(crate) fn insert<T>(&mut self, arena: &mut NodeArena<T>, key: Key, item: T) -> NodeKey {
        let node = arena.alloc(key, item);
        self.roots.push(arena, node);
        self.take_min_candidate(arena, node);
        self.len += 1;
        node
    }

    /// Removes the minimum and consolidates.
    pub(crate) fn delete_min<T>(&mut self, arena: &mut NodeArena<T>) -> Option<(Key, T)> {
        let min = self.min?;

        self.roots.remove(arena, min);

        // Promote the children: they become roots, so parent and mark go
        let children = arena[min].children.take();
        let mut cursor = children.head();
        for _ in 0..children.len() {
            let Some(child) = cursor else { break };
            let node = &mut arena[child];
            node.parent = None;
            if std::mem::take(&mut node.marked) {
                self.marked -= 1;
            }
            cursor = Some(node.link.next);
        }
        self.roots.splice(arena, children);

        let removed = arena.free(min)?;
        self.len -= 1;

        if self.roots.is_empty() {
            self.min = None;
        } else {
            self.consolidate(arena);
        }

        Some((removed.key, removed.item))
    }

    /// Links roots of equal rank until every root rank is distinct, then
    /// rebuilds the root ring from the buckets and finds the new minimum.
    fn consolidate<T>(&mut self, arena: &mut NodeArena<T>) {
        let scanned: SmallVec<[NodeKey; 32]> = self.roots.iter(&*arena).collect();
        let mut buckets: SmallVec<[Option<NodeKey>; 64]> =
            smallvec![None; rank::bucket_count(self.len)];
        let scanned_count = scanned.len();
        let links_before = self.stats.links;

        // The old ring is rebuilt below, so its links may be overwritten freely
        self.roots = Ring::new();

        for root in scanned {
            let mut x = root;
            let mut d = arena[x].rank();

            loop {
                if d >= buckets.len() {
                    buckets.resize(d + 1, None);
                }
                let Some(mut y) = buckets[d].take() else {
                    buckets[d] = Some(x);
                    break;
                };

                // Ensure x has the smaller key
                if arena[y].key < arena[x].key {
                    std::mem::swap(&mut x, &mut y);
                }
                self.link(arena, y, x);
                d += 1;
            }
        }

        self.min = None;
        for root in buckets.into_iter().flatten() {
            self.roots.push(arena, root);
            self.take_min_candidate(arena, root);
        }

        trace!(
            scanned = scanned_count,
            links = self.stats.links - links_before,
            roots = self.roots.len(),
            "consolidated root ring"
        );
    }

    /// Hangs root `child` under root `parent`.
    fn link<T>(&mut self, arena: &mut NodeArena<T>, child: NodeKey, parent: NodeKey) {
        arena.adopt(parent, child);
        if std::mem::take(&mut arena[child].marked) {
            self.marked -= 1;
        }
        self.record_link();
    }

    /// Detaches `node` from `parent` and makes it a root.
    fn cut<T>(&mut self, arena: &mut NodeArena<T>, node: NodeKey, parent: NodeKey) {
        arena.disown(parent, node);
        if std::mem::take(&mut arena[node].marked) {
            self.marked -= 1;
        }
        self.roots.push(arena, node);
        self.record_cut();
        self.take_min_candidate(arena, node);
    }

    /// Cuts `node` from its parent and keeps cutting upward through marked
    /// ancestors. The first unmarked non-root ancestor gets marked.
    fn cascading_cut<T>(&mut self, arena: &mut NodeArena<T>, node: NodeKey) {
        let mut current = node;
        let mut chain = 0usize;

        while let Some(parent) = arena[current].parent {
            self.cut(arena, current, parent);
            chain += 1;

            if arena[parent].parent.is_none() {
                break;
            }
            if arena[parent].marked {
                current = parent;
            } else {
                arena[parent].marked = true;
                self.marked += 1;
                break;
            }
        }

        trace!(chain, "cascading cut finished");
    }

    pub(crate) fn decrease_key<T>(
        &mut self,
        arena: &mut NodeArena<T>,
        node: NodeKey,
        delta: Key,
    ) -> Result<()> {
        debug_assert!(delta >= 0);
        let key = arena[node].key;
        let new_key = key
            .checked_sub(delta)
            .ok_or(HeapError::KeyUnderflow { key, delta })?;
        arena[node].key = new_key;

        match arena[node].parent {
            // Root keys cannot violate heap order
            None => self.take_min_candidate(arena, node),
            Some(parent) if new_key < arena[parent].key => self.cascading_cut(arena, node),
            Some(_) => {}
        }
        Ok(())
    }

    /// Removes `node` as if its key had dropped below every other key.
    pub(crate) fn delete<T>(&mut self, arena: &mut NodeArena<T>, node: NodeKey) -> Option<(Key, T)> {
        if arena[node].parent.is_some() {
            self.cascading_cut(arena, node);
        }
        self.min = Some(node);
        self.delete_min(arena)
    }

    /// Splices a forest living on the same arena into this one.
    fn absorb<T>(&mut self, arena: &mut NodeArena<T>, other: Forest) {
        let other_min = other.min;
        self.roots.splice(arena, other.roots);
        if let Some(candidate) = other_min {
            self.take_min_candidate(arena, candidate);
        }
        self.len += other.len;
        self.marked += other.marked;
        self.stats.absorb(other.stats);
    }

    /// Moves a forest from another arena into this one, node by node.
    ///
    /// Tree shapes, sibling order and marks are preserved. O(m) in the size of
    /// the moved forest.
    fn migrate<T>(&mut self, arena: &mut NodeArena<T>, other: Forest, from: &mut NodeArena<T>) {
        let mut pending: Vec<(NodeKey, Option<NodeKey>)> = other
            .roots
            .iter(&*from)
            .map(|root| (root, None))
            .collect();
        pending.reverse();

        let mut new_min = None;
        while let Some((old, new_parent)) = pending.pop() {
            let kids: SmallVec<[NodeKey; 16]> = from[old].children.iter(&*from).collect();
            let Some(moved) = from.free(old) else { continue };

            let new = arena.alloc(moved.key, moved.item);
            match new_parent {
                None => self.roots.push(arena, new),
                Some(parent) => arena.adopt(parent, new),
            }
            arena[new].marked = moved.marked;
            if other.min == Some(old) {
                new_min = Some(new);
            }

            pending.extend(kids.into_iter().rev().map(|kid| (kid, Some(new))));
        }

        if let Some(candidate) = new_min {
            self.take_min_candidate(arena, candidate);
        }
        self.len += other.len;
        self.marked += other.marked;
        self.stats.absorb(other.stats);
    }

    /// Frees every node of this forest from the arena.
    fn release<T>(&mut self, arena: &mut NodeArena<T>) {
        let mut pending: Vec<NodeKey> = self.roots.iter(&*arena).collect();
        while let Some(node) = pending.pop() {
            pending.extend(arena[node].children.iter(&*arena));
            arena.free(node);
        }
        let stats = self.stats;
        let private = self.private;
        *self = Forest {
            stats,
            private,
            ..Forest::default()
        };
    }
}

/// Fibonacci Heap over integer keys
///
/// Each node may carry an item of type `T`; the default `T = ()` gives a
/// plain key heap.
///
/// # Example
///
/// ```rust
/// use fibonacci_forest::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::new();
/// let five = heap.insert(5);
/// heap.insert(3);
/// heap.insert(8);
///
/// heap.decrease_key(&five, 4).unwrap();
/// assert_eq!(heap.min_key(), Some(1));
///
/// assert_eq!(heap.delete_min().unwrap(), 1);
/// assert_eq!(heap.min_key(), Some(3));
/// assert_eq!(heap.len(), 2);
/// ```
pub struct FibonacciHeap<T = ()> {
    arena: SharedArena<T>,
    forest: Forest,
    config: HeapConfig,
}

impl FibonacciHeap<()> {
    /// Creates an empty heap with the default configuration.
    pub fn new() -> Self {
        Self::with_config(HeapConfig::default())
    }

    /// Creates an empty heap with the given configuration.
    pub fn with_config(config: HeapConfig) -> Self {
        Self::configured(config)
    }

    /// Inserts a key, returning a handle to its node.
    ///
    /// Duplicate keys are allowed by the structure; whether they are
    /// meaningful is up to the caller.
    ///
    /// # Time Complexity
    /// O(1)
    pub fn insert(&mut self, key: Key) -> FibonacciHandle {
        self.insert_with(key, ())
    }
}

impl Default for FibonacciHeap<()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FibonacciHeap<T> {
    /// Creates an empty heap carrying items of type `T`.
    pub fn configured(config: HeapConfig) -> Self {
        FibonacciHeap {
            arena: NodeArena::shared(),
            forest: Forest::default(),
            config,
        }
    }

    /// Creates an empty heap on the same node arena as `self`.
    ///
    /// Heaps sharing an arena meld in O(1) and keep their handles valid
    /// across the meld.
    pub fn sibling(&self) -> Self {
        FibonacciHeap {
            arena: Rc::clone(&self.arena),
            forest: Forest::default(),
            config: self.config,
        }
    }

    /// Returns true if `other` uses the same node arena.
    pub fn shares_arena_with(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.arena, &other.arena)
    }

    /// The configuration this heap was built with.
    pub fn config(&self) -> HeapConfig {
        self.config
    }

    /// Returns true if the heap is empty
    pub fn is_empty(&self) -> bool {
        self.forest.min.is_none()
    }

    /// Returns the number of elements in the heap
    pub fn len(&self) -> usize {
        self.forest.len
    }

    /// Inserts a key with an item, returning a handle to its node.
    ///
    /// # Time Complexity
    /// O(1)
    pub fn insert_with(&mut self, key: Key, item: T) -> FibonacciHandle {
        let mut arena = self.arena.borrow_mut();
        let node = self.forest.insert(&mut arena, key, item);
        FibonacciHandle {
            arena: arena.id(),
            node,
        }
    }

    /// Returns a handle to the minimum node, or `None` if the heap is empty.
    ///
    /// # Time Complexity
    /// O(1)
    pub fn find_min(&self) -> Option<FibonacciHandle> {
        let node = self.forest.min?;
        Some(FibonacciHandle {
            arena: self.arena.borrow().id(),
            node,
        })
    }

    /// Returns the minimum key, or `None` if the heap is empty.
    pub fn min_key(&self) -> Option<Key> {
        let node = self.forest.min?;
        Some(self.arena.borrow()[node].key)
    }

    /// Returns the current key of the node behind `handle`.
    pub fn key(&self, handle: &FibonacciHandle) -> Result<Key> {
        let arena = self.arena.borrow();
        let node = resolve(&arena, handle)?;
        Ok(arena[node].key)
    }

    /// Returns a clone of the item stored with `handle`'s node.
    pub fn item(&self, handle: &FibonacciHandle) -> Result<T>
    where
        T: Clone,
    {
        let arena = self.arena.borrow();
        let node = resolve(&arena, handle)?;
        Ok(arena[node].item.clone())
    }

    /// Removes the minimum, returning its key.
    ///
    /// # Errors
    /// [`HeapError::EmptyHeap`] if there is nothing to remove.
    ///
    /// # Time Complexity
    /// O(log n) amortized, O(n) worst case
    pub fn delete_min(&mut self) -> Result<Key> {
        self.take_min().map(|(key, _)| key)
    }

    /// Removes the minimum, returning its key and item.
    pub fn take_min(&mut self) -> Result<(Key, T)> {
        let mut arena = self.arena.borrow_mut();
        self.forest
            .delete_min(&mut arena)
            .ok_or(HeapError::EmptyHeap)
    }

    /// Subtracts `delta` from the key behind `handle`.
    ///
    /// If the node now sorts before its parent it is cut loose and the
    /// cascading cut runs up through marked ancestors.
    ///
    /// # Errors
    /// - [`HeapError::NegativeDelta`] if `delta < 0`
    /// - [`HeapError::KeyUnderflow`] if the new key does not fit in [`Key`]
    /// - [`HeapError::StaleHandle`] / [`HeapError::ForeignHandle`] for bad handles
    ///
    /// # Time Complexity
    /// O(1) amortized
    pub fn decrease_key(&mut self, handle: &FibonacciHandle, delta: Key) -> Result<()> {
        if delta < 0 {
            return Err(HeapError::NegativeDelta { delta });
        }
        let mut arena = self.arena.borrow_mut();
        let node = resolve(&arena, handle)?;
        self.forest.decrease_key(&mut arena, node, delta)
    }

    /// Removes the node behind `handle`, returning its key.
    ///
    /// # Errors
    /// [`HeapError::EmptyHeap`] on an empty heap, otherwise handle errors.
    ///
    /// # Time Complexity
    /// O(log n) amortized
    pub fn delete(&mut self, handle: &FibonacciHandle) -> Result<Key> {
        if self.is_empty() {
            return Err(HeapError::EmptyHeap);
        }
        let mut arena = self.arena.borrow_mut();
        let node = resolve(&arena, handle)?;
        // A resolved node always has a live slot to free
        self.forest
            .delete(&mut arena, node)
            .map(|(key, _)| key)
            .ok_or(HeapError::StaleHandle)
    }

    /// Melds `other` into this heap, consuming it.
    ///
    /// O(1) when both heaps share an arena (see [`sibling`](Self::sibling)).
    /// Otherwise `other`'s nodes are moved into this heap's arena in O(m), and
    /// handles issued by `other` become foreign.
    pub fn meld(&mut self, mut other: Self) {
        let absorbed = std::mem::take(&mut other.forest);
        if absorbed.len == 0 {
            self.forest.stats.absorb(absorbed.stats);
            return;
        }

        if self.shares_arena_with(&other) {
            let mut arena = self.arena.borrow_mut();
            self.forest.absorb(&mut arena, absorbed);
        } else {
            debug!(moved = absorbed.len, "melding heaps across arenas");
            let mut arena = self.arena.borrow_mut();
            let mut from = other.arena.borrow_mut();
            self.forest.migrate(&mut arena, absorbed, &mut from);
        }
    }

    /// Removes every element. Outstanding handles become stale.
    pub fn clear(&mut self) {
        let mut arena = self.arena.borrow_mut();
        self.forest.release(&mut arena);
    }

    /// The amortized-analysis potential: `roots + 2 * marked`.
    ///
    /// # Time Complexity
    /// O(1)
    pub fn potential(&self) -> usize {
        self.forest.roots.len() + 2 * self.forest.marked
    }

    /// Number of trees in the root ring.
    pub fn root_count(&self) -> usize {
        self.forest.roots.len()
    }

    /// Number of marked nodes.
    pub fn marked_count(&self) -> usize {
        self.forest.marked
    }

    /// This heap's own link/cut counters, whatever the configured scope.
    pub fn stats(&self) -> LinkCutStats {
        self.forest.stats
    }

    fn reported_stats(&self) -> LinkCutStats {
        match self.config.counter_scope {
            CounterScope::PerHeap => self.forest.stats,
            CounterScope::Process => stats::process_stats(),
        }
    }

    /// Total link operations, in the configured [`CounterScope`].
    pub fn total_links(&self) -> u64 {
        self.reported_stats().links
    }

    /// Total cut operations, in the configured [`CounterScope`].
    pub fn total_cuts(&self) -> u64 {
        self.reported_stats().cuts
    }

    /// Histogram of root ranks: entry `i` counts the roots of rank `i`.
    ///
    /// The vector is as long as the largest root rank plus one, and empty for
    /// an empty heap.
    pub fn counters_rep(&self) -> Vec<usize> {
        let arena = self.arena.borrow();
        let mut counts = Vec::new();
        for root in self.forest.roots.iter(&*arena) {
            let rank = arena[root].rank();
            if rank >= counts.len() {
                counts.resize(rank + 1, 0);
            }
            counts[rank] += 1;
        }
        counts
    }

    /// Pre-order dump of the forest as `(key, depth, marked)`, root ring first.
    pub fn layout(&self) -> Vec<(Key, usize, bool)> {
        let arena = self.arena.borrow();
        let mut out = Vec::with_capacity(self.forest.len);
        let mut pending: Vec<(NodeKey, usize)> = self
            .forest
            .roots
            .iter(&*arena)
            .map(|root| (root, 0))
            .collect();
        pending.reverse();

        while let Some((node, depth)) = pending.pop() {
            let n = &arena[node];
            out.push((n.key, depth, n.marked));
            let kids: SmallVec<[NodeKey; 16]> = n.children.iter(&*arena).collect();
            pending.extend(kids.into_iter().rev().map(|kid| (kid, depth + 1)));
        }
        out
    }

    /// Checks every structural invariant of the heap.
    ///
    /// Verifies ring symmetry and cached sizes, ranks, parent pointers, heap
    /// order, marks (never on roots, count matches), the element count and the
    /// minimum pointer.
    pub fn verify_internal_structure(&self) -> bool {
        let arena = self.arena.borrow();
        let limit = arena.len() + 1;
        let forest = &self.forest;

        if forest.roots.walk(&*arena, limit) != Some(forest.roots.len()) {
            return false;
        }
        if forest.roots.is_empty() != (forest.len == 0) || forest.min.is_some() != (forest.len > 0) {
            return false;
        }

        let mut nodes = 0usize;
        let mut marked = 0usize;
        let mut smallest: Option<Key> = None;
        let mut pending: Vec<NodeKey> = Vec::new();

        for root in forest.roots.iter(&*arena) {
            let Some(node) = arena.get(root) else { return false };
            if node.parent.is_some() || node.marked {
                return false;
            }
            smallest = Some(smallest.map_or(node.key, |s| s.min(node.key)));
            pending.push(root);
        }

        match (forest.min, smallest) {
            (Some(min), Some(smallest)) => {
                let Some(node) = arena.get(min) else { return false };
                if node.parent.is_some() || node.key != smallest {
                    return false;
                }
            }
            (None, None) => {}
            _ => return false,
        }

        while let Some(key) = pending.pop() {
            let node = &arena[key];
            nodes += 1;
            if node.marked {
                marked += 1;
            }
            if nodes > forest.len {
                return false;
            }
            if node.children.walk(&*arena, limit) != Some(node.rank()) {
                return false;
            }
            for child in node.children.iter(&*arena) {
                let Some(c) = arena.get(child) else { return false };
                if c.parent != Some(key) || c.key < node.key {
                    return false;
                }
                pending.push(child);
            }
        }

        nodes == forest.len && marked == forest.marked
    }

    pub(crate) fn forest(&self) -> &Forest {
        &self.forest
    }

    pub(crate) fn arena(&self) -> &SharedArena<T> {
        &self.arena
    }
}

fn resolve<T>(arena: &NodeArena<T>, handle: &FibonacciHandle) -> Result<NodeKey> {
    if handle.arena != arena.id() {
        return Err(HeapError::ForeignHandle);
    }
    if !arena.contains(handle.node) {
        return Err(HeapError::StaleHandle);
    }
    Ok(handle.node)
}

impl<T> Drop for FibonacciHeap<T> {
    fn drop(&mut self) {
        // A uniquely owned arena goes away with the heap; a shared one must
        // not keep this heap's nodes alive
        if Rc::strong_count(&self.arena) > 1 {
            if let Ok(mut arena) = self.arena.try_borrow_mut() {
                self.forest.release(&mut arena);
            }
        }
    }
}

impl<T> fmt::Debug for FibonacciHeap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FibonacciHeap")
            .field("len", &self.forest.len)
            .field("roots", &self.forest.roots.len())
            .field("marked", &self.forest.marked)
            .field("min", &self.min_key())
            .field("stats", &self.forest.stats)
            .finish()
    }
}

impl Heap for FibonacciHeap<()> {
    type Key = Key;

    fn is_empty(&self) -> bool {
        FibonacciHeap::is_empty(self)
    }

    fn len(&self) -> usize {
        FibonacciHeap::len(self)
    }

    fn push(&mut self, key: Key) {
        self.insert(key);
    }

    fn peek(&self) -> Option<Key> {
        self.min_key()
    }

    fn pop(&mut self) -> Option<Key> {
        self.delete_min().ok()
    }

    fn merge(&mut self, other: Self) {
        self.meld(other)
    }
}

impl DecreaseKeyHeap for FibonacciHeap<()> {
    type Handle = FibonacciHandle;

    fn push_with_handle(&mut self, key: Key) -> FibonacciHandle {
        self.insert(key)
    }

    fn decrease_key(&mut self, handle: &FibonacciHandle, delta: Key) -> Result<()> {
        FibonacciHeap::decrease_key(self, handle, delta)
    }

    fn delete(&mut self, handle: &FibonacciHandle) -> Result<Key> {
        FibonacciHeap::delete(self, handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(heap: &mut FibonacciHeap) -> Vec<Key> {
        let mut out = Vec::new();
        while let Ok(key) = heap.delete_min() {
            assert!(heap.verify_internal_structure());
            out.push(key);
        }
        out
    }

    /// Builds a single tree of rank 3 rooted at `base`: 8 nodes with keys
    /// `base..base + 8`, shaped as a binomial tree.
    fn binomial_tree(heap: &mut FibonacciHeap, base: Key) -> Vec<FibonacciHandle> {
        heap.insert(base - 1);
        let handles: Vec<_> = (0..8).map(|i| heap.insert(base + i)).collect();
        assert_eq!(heap.delete_min(), Ok(base - 1));
        assert_eq!(heap.root_count(), 1);
        handles
    }

    #[test]
    fn test_basic_operations() {
        let mut heap = FibonacciHeap::new();
        assert!(heap.is_empty());
        assert_eq!(heap.len(), 0);
        assert_eq!(heap.find_min(), None);

        heap.insert(5);
        heap.insert(3);
        heap.insert(8);
        heap.insert(1);

        assert_eq!(heap.len(), 4);
        assert_eq!(heap.min_key(), Some(1));

        assert_eq!(heap.delete_min(), Ok(1));
        assert_eq!(heap.min_key(), Some(3));
        assert_eq!(heap.len(), 3);
        assert!(heap.verify_internal_structure());
    }

    #[test]
    fn test_find_min_handle_names_minimum() {
        let mut heap = FibonacciHeap::new();
        heap.insert(4);
        let two = heap.insert(2);
        assert_eq!(heap.find_min(), Some(two));
        assert_eq!(heap.key(&two), Ok(2));
    }

    #[test]
    fn test_delete_min_empty() {
        let mut heap = FibonacciHeap::new();
        assert_eq!(heap.delete_min(), Err(HeapError::EmptyHeap));
    }

    #[test]
    fn test_single_element() {
        let mut heap = FibonacciHeap::new();
        let h = heap.insert(42);
        assert_eq!(heap.delete_min(), Ok(42));
        assert!(heap.is_empty());
        assert_eq!(heap.find_min(), None);
        assert_eq!(heap.key(&h), Err(HeapError::StaleHandle));
        assert!(heap.verify_internal_structure());
    }

    #[test]
    fn test_consolidation_leaves_distinct_ranks() {
        let mut heap = FibonacciHeap::new();
        for key in [10, 1, 2, 3, 4, 5, 6, 7, 8, 9] {
            heap.insert(key);
        }
        assert_eq!(heap.root_count(), 10);

        heap.delete_min().unwrap();

        // 9 singletons link into binomial trees of 8 and 1 nodes
        assert_eq!(heap.counters_rep(), vec![1, 0, 0, 1]);
        assert_eq!(heap.root_count(), 2);
        assert_eq!(heap.stats().links, 7);
        assert!(heap.verify_internal_structure());
    }

    #[test]
    fn test_consolidation_of_large_root_ring() {
        let mut heap = FibonacciHeap::new();
        for key in (0..4097).rev() {
            heap.insert(key);
        }
        heap.delete_min().unwrap();

        // 4096 remaining singletons collapse into one binomial tree of rank 12
        let mut expected = vec![0; 13];
        expected[12] = 1;
        assert_eq!(heap.counters_rep(), expected);
        assert_eq!(heap.stats().links, 4095);
        assert_eq!(heap.min_key(), Some(1));
        assert!(heap.verify_internal_structure());
    }

    #[test]
    fn test_counters_rep_empty() {
        let heap = FibonacciHeap::new();
        assert!(heap.counters_rep().is_empty());
    }

    #[test]
    fn test_decrease_key_root_updates_min() {
        let mut heap = FibonacciHeap::new();
        heap.insert(10);
        let h2 = heap.insert(20);
        let h3 = heap.insert(30);

        heap.decrease_key(&h2, 15).unwrap();
        assert_eq!(heap.min_key(), Some(5));

        heap.decrease_key(&h3, 29).unwrap();
        assert_eq!(heap.min_key(), Some(1));
        assert_eq!(heap.stats().cuts, 0);
    }

    #[test]
    fn test_decrease_key_zero_delta_is_noop() {
        let mut heap = FibonacciHeap::new();
        let h = heap.insert(3);
        heap.decrease_key(&h, 0).unwrap();
        assert_eq!(heap.key(&h), Ok(3));
    }

    #[test]
    fn test_decrease_key_negative_delta() {
        let mut heap = FibonacciHeap::new();
        let h = heap.insert(3);
        assert_eq!(
            heap.decrease_key(&h, -1),
            Err(HeapError::NegativeDelta { delta: -1 })
        );
        assert_eq!(heap.key(&h), Ok(3));
    }

    #[test]
    fn test_negative_delta_reported_before_handle_checks() {
        let mut heap = FibonacciHeap::new();
        let h = heap.insert(3);
        heap.insert(4);
        heap.delete_min().unwrap();
        assert_eq!(
            heap.decrease_key(&h, -5),
            Err(HeapError::NegativeDelta { delta: -5 })
        );
        assert_eq!(heap.decrease_key(&h, 5), Err(HeapError::StaleHandle));
    }

    #[test]
    fn test_decrease_key_underflow() {
        let mut heap = FibonacciHeap::new();
        let h = heap.insert(Key::MIN + 1);
        assert_eq!(
            heap.decrease_key(&h, 2),
            Err(HeapError::KeyUnderflow {
                key: Key::MIN + 1,
                delta: 2
            })
        );
    }

    #[test]
    fn test_decrease_key_without_violation_does_not_cut() {
        let mut heap = FibonacciHeap::new();
        let handles = binomial_tree(&mut heap, 10);

        // Key 17 hangs under 16; dropping it to 16 keeps heap order
        heap.decrease_key(&handles[7], 1).unwrap();
        assert_eq!(heap.stats().cuts, 0);
        assert_eq!(heap.root_count(), 1);
        assert!(heap.verify_internal_structure());
    }

    #[test]
    fn test_cut_marks_parent() {
        let mut heap = FibonacciHeap::new();
        let handles = binomial_tree(&mut heap, 10);
        assert_eq!(heap.root_count(), 1);

        // 17 is a child of 16, which is a child of 14 (not a root)
        heap.decrease_key(&handles[7], 10).unwrap();

        assert_eq!(heap.stats().cuts, 1);
        assert_eq!(heap.root_count(), 2);
        assert_eq!(heap.marked_count(), 1);
        assert_eq!(heap.min_key(), Some(7));
        assert_eq!(heap.potential(), 2 + 2);
        assert!(heap.verify_internal_structure());
    }

    #[test]
    fn test_cascading_cut_through_marked_parent() {
        let mut heap = FibonacciHeap::new();
        let handles = binomial_tree(&mut heap, 10);

        // Tree (keys): 10 -> {11, 12 -> {13}, 14 -> {15, 16 -> {17}}}
        // Cut 15 from 14: marks 14
        heap.decrease_key(&handles[5], 6).unwrap();
        assert_eq!(heap.marked_count(), 1);
        assert_eq!(heap.stats().cuts, 1);

        // Cut 16 from 14: 14 is marked, so 14 is cut too; 10 is a root
        heap.decrease_key(&handles[6], 6).unwrap();
        assert_eq!(heap.stats().cuts, 3);
        assert_eq!(heap.marked_count(), 0);
        assert_eq!(heap.root_count(), 4);
        assert!(heap.verify_internal_structure());

        assert_eq!(drain(&mut heap), vec![9, 10, 10, 11, 12, 13, 14, 17]);
    }

    #[test]
    fn test_delete_non_root() {
        let mut heap = FibonacciHeap::new();
        let handles = binomial_tree(&mut heap, 10);

        assert_eq!(heap.delete(&handles[4]), Ok(14));
        assert_eq!(heap.len(), 7);
        assert_eq!(heap.key(&handles[4]), Err(HeapError::StaleHandle));
        assert!(heap.verify_internal_structure());
        assert_eq!(drain(&mut heap), vec![10, 11, 12, 13, 15, 16, 17]);
    }

    #[test]
    fn test_delete_root_and_min() {
        let mut heap = FibonacciHeap::new();
        let a = heap.insert(1);
        let b = heap.insert(2);
        heap.insert(3);

        assert_eq!(heap.delete(&b), Ok(2));
        assert_eq!(heap.delete(&a), Ok(1));
        assert_eq!(heap.min_key(), Some(3));
        assert_eq!(heap.stats().cuts, 0);
    }

    #[test]
    fn test_delete_on_empty_heap() {
        let mut heap = FibonacciHeap::new();
        let h = heap.insert(1);
        heap.delete_min().unwrap();
        assert_eq!(heap.delete(&h), Err(HeapError::EmptyHeap));
    }

    #[test]
    fn test_delete_stale_handle_on_nonempty_heap() {
        let mut heap = FibonacciHeap::new();
        let h = heap.insert(1);
        heap.insert(2);
        assert_eq!(heap.delete(&h), Ok(1));
        assert_eq!(heap.delete(&h), Err(HeapError::StaleHandle));
        assert_eq!(heap.len(), 1);
        assert!(heap.verify_internal_structure());
    }

    #[test]
    fn test_meld() {
        let mut heap1 = FibonacciHeap::new();
        heap1.insert(1);
        heap1.insert(4);
        heap1.insert(9);

        let mut heap2 = FibonacciHeap::new();
        heap2.insert(2);
        heap2.insert(3);
        heap2.insert(7);

        heap1.meld(heap2);
        assert_eq!(heap1.min_key(), Some(1));
        assert_eq!(heap1.len(), 6);
        assert!(heap1.verify_internal_structure());
        assert_eq!(drain(&mut heap1), vec![1, 2, 3, 4, 7, 9]);
    }

    #[test]
    fn test_meld_siblings_keeps_handles() {
        let mut heap1 = FibonacciHeap::new();
        heap1.insert(5);
        let mut heap2 = heap1.sibling();
        let h = heap2.insert(8);

        assert!(heap1.shares_arena_with(&heap2));
        heap1.meld(heap2);

        heap1.decrease_key(&h, 6).unwrap();
        assert_eq!(heap1.min_key(), Some(2));
        assert_eq!(heap1.find_min(), Some(h));
    }

    #[test]
    fn test_meld_across_arenas_moves_structure() {
        let mut heap1 = FibonacciHeap::new();
        heap1.insert(100);

        let mut heap2 = FibonacciHeap::new();
        let handles = binomial_tree(&mut heap2, 10);
        heap2.decrease_key(&handles[5], 6).unwrap();
        let shape = heap2.layout();
        let marked = heap2.marked_count();

        heap1.meld(heap2);

        assert_eq!(heap1.len(), 9);
        assert_eq!(heap1.marked_count(), marked);
        assert_eq!(heap1.key(&handles[0]), Err(HeapError::ForeignHandle));
        assert_eq!(&heap1.layout()[1..], &shape[..]);
        assert!(heap1.verify_internal_structure());
    }

    #[test]
    fn test_meld_with_empty() {
        let mut heap1 = FibonacciHeap::new();
        heap1.meld(FibonacciHeap::new());
        assert!(heap1.is_empty());

        let mut heap2 = FibonacciHeap::new();
        heap2.insert(3);
        heap1.meld(heap2);
        assert_eq!(heap1.min_key(), Some(3));

        heap1.meld(FibonacciHeap::new());
        assert_eq!(heap1.len(), 1);
    }

    #[test]
    fn test_meld_sums_per_heap_counters() {
        let mut heap1 = FibonacciHeap::new();
        for key in 0..4 {
            heap1.insert(key);
        }
        heap1.delete_min().unwrap();
        let links1 = heap1.total_links();

        let mut heap2 = FibonacciHeap::new();
        for key in 10..14 {
            heap2.insert(key);
        }
        heap2.delete_min().unwrap();
        let links2 = heap2.total_links();

        heap1.meld(heap2);
        assert_eq!(heap1.total_links(), links1 + links2);
    }

    #[test]
    fn test_process_scope_reports_process_totals() {
        let config = HeapConfig::new().with_counter_scope(CounterScope::Process);
        let mut heap = FibonacciHeap::with_config(config);
        for key in 0..8 {
            heap.insert(key);
        }
        heap.delete_min().unwrap();

        // Seven singletons consolidate into trees of 4, 2 and 1 nodes
        assert_eq!(heap.stats().links, 4);
        assert!(heap.total_links() >= heap.stats().links);
    }

    #[test]
    fn test_dropping_sibling_frees_its_nodes() {
        let mut heap1 = FibonacciHeap::new();
        heap1.insert(1);
        {
            let mut heap2 = heap1.sibling();
            heap2.insert(2);
            heap2.insert(3);
            assert_eq!(heap1.arena().borrow().len(), 3);
        }
        assert_eq!(heap1.arena().borrow().len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut heap = FibonacciHeap::new();
        let h = heap.insert(1);
        heap.insert(2);
        heap.clear();
        assert!(heap.is_empty());
        assert_eq!(heap.potential(), 0);
        assert_eq!(heap.key(&h), Err(HeapError::StaleHandle));
        heap.insert(5);
        assert_eq!(heap.min_key(), Some(5));
    }

    #[test]
    fn test_items_travel_with_nodes() {
        let mut heap: FibonacciHeap<&str> = FibonacciHeap::configured(HeapConfig::default());
        let b = heap.insert_with(20, "b");
        heap.insert_with(10, "a");

        assert_eq!(heap.item(&b), Ok("b"));
        heap.decrease_key(&b, 15).unwrap();
        assert_eq!(heap.take_min(), Ok((5, "b")));
        assert_eq!(heap.take_min(), Ok((10, "a")));
    }

    #[test]
    fn test_duplicate_keys() {
        let mut heap = FibonacciHeap::new();
        for _ in 0..5 {
            heap.insert(7);
        }
        heap.insert(3);
        assert_eq!(drain(&mut heap), vec![3, 7, 7, 7, 7, 7]);
    }
}
