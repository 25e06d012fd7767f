//! Arena storage for heap nodes
//!
//! Nodes live in a [`SlotMap`] and refer to each other by [`NodeKey`]. Parent
//! pointers, the designated child and the sibling links are all keys, so the
//! cyclic structure of the forest never involves ownership.
//!
//! # Sharing
//!
//! An arena is shared between heaps through [`SharedArena`]. Heaps on the same
//! arena can be melded by splicing their root rings in O(1); heaps on
//! different arenas have to move nodes across.
//!
//! # Key vs handle
//!
//! - [`NodeKey`]: a generational slot key, only meaningful inside one arena
//! - [`ArenaId`]: a process-unique tag used to recognise keys from another arena

use crate::Key;
use circular_ring::{Link, Ring, RingLinks};
use slotmap::{new_key_type, SlotMap};
use std::cell::RefCell;
use std::ops::{Index, IndexMut};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

new_key_type! {
    /// Slot key of a node inside its arena
    pub struct NodeKey;
}

/// Process-unique arena identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArenaId(u64);

impl ArenaId {
    fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        ArenaId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A heap node.
///
/// `children` is the node's child ring; its head is the designated child and
/// its length is the node's rank. `link` threads the node into whichever
/// ring currently holds it.
#[derive(Debug)]
pub(crate) struct Node<T> {
    pub(crate) key: Key,
    pub(crate) item: T,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Ring<NodeKey>,
    pub(crate) link: Link<NodeKey>,
    pub(crate) marked: bool,
}

impl<T> Node<T> {
    #[inline]
    pub(crate) fn rank(&self) -> usize {
        self.children.len()
    }
}

/// Slot-map backed node arena.
#[derive(Debug)]
pub(crate) struct NodeArena<T> {
    id: ArenaId,
    nodes: SlotMap<NodeKey, Node<T>>,
}

/// An arena shared by reference counting between sibling heaps.
pub(crate) type SharedArena<T> = Rc<RefCell<NodeArena<T>>>;

impl<T> NodeArena<T> {
    pub(crate) fn new() -> Self {
        NodeArena {
            id: ArenaId::fresh(),
            nodes: SlotMap::with_key(),
        }
    }

    pub(crate) fn shared() -> SharedArena<T> {
        Rc::new(RefCell::new(Self::new()))
    }

    #[inline]
    pub(crate) fn id(&self) -> ArenaId {
        self.id
    }

    /// Number of live nodes across every heap using this arena.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Allocates a detached singleton node.
    pub(crate) fn alloc(&mut self, key: Key, item: T) -> NodeKey {
        self.nodes.insert_with_key(|slot| Node {
            key,
            item,
            parent: None,
            children: Ring::new(),
            link: Link::detached(slot),
            marked: false,
        })
    }

    /// Frees a node, returning it. Its relations are not touched.
    pub(crate) fn free(&mut self, slot: NodeKey) -> Option<Node<T>> {
        self.nodes.remove(slot)
    }

    #[inline]
    pub(crate) fn get(&self, slot: NodeKey) -> Option<&Node<T>> {
        self.nodes.get(slot)
    }

    #[inline]
    pub(crate) fn contains(&self, slot: NodeKey) -> bool {
        self.nodes.contains_key(slot)
    }

    /// Adds `child` to `parent`'s child ring and sets its parent pointer.
    pub(crate) fn adopt(&mut self, parent: NodeKey, child: NodeKey) {
        let mut children = self[parent].children.take();
        children.push(self, child);
        self[parent].children = children;
        self[child].parent = Some(parent);
    }

    /// Removes `child` from `parent`'s child ring and clears its parent pointer.
    pub(crate) fn disown(&mut self, parent: NodeKey, child: NodeKey) {
        let mut children = self[parent].children.take();
        children.remove(self, child);
        self[parent].children = children;
        self[child].parent = None;
    }
}

impl<T> Index<NodeKey> for NodeArena<T> {
    type Output = Node<T>;

    #[inline]
    fn index(&self, slot: NodeKey) -> &Node<T> {
        &self.nodes[slot]
    }
}

impl<T> IndexMut<NodeKey> for NodeArena<T> {
    #[inline]
    fn index_mut(&mut self, slot: NodeKey) -> &mut Node<T> {
        &mut self.nodes[slot]
    }
}

impl<T> RingLinks<NodeKey> for NodeArena<T> {
    #[inline]
    fn next(&self, at: NodeKey) -> NodeKey {
        self.nodes[at].link.next
    }

    #[inline]
    fn prev(&self, at: NodeKey) -> NodeKey {
        self.nodes[at].link.prev
    }

    #[inline]
    fn set_next(&mut self, at: NodeKey, next: NodeKey) {
        self.nodes[at].link.next = next;
    }

    #[inline]
    fn set_prev(&mut self, at: NodeKey, prev: NodeKey) {
        self.nodes[at].link.prev = prev;
    }
}
