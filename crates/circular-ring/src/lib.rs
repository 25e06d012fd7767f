//! Index-addressed circular doubly-linked rings.
//!
//! This crate provides the circular sibling lists used by arena-backed heap
//! forests. Nodes live in some external storage (a `Vec`, a `SlotMap`, ...)
//! and are addressed by a `Copy` index; the storage exposes each node's
//! `next`/`prev` links through the [`RingLinks`] trait. A [`Ring`] is a small
//! value holding one representative member and the cached member count.
//!
//! # Circular vs Linear Lists
//!
//! In a circular list:
//! - A single node points to itself (both `next` and `prev`)
//! - There is no head or tail - any member can be the representative
//! - Splicing two rings together is O(1)
//! - Iteration wraps around, so it is bounded by the cached length
//!
//! # Example
//!
//! ```rust
//! use circular_ring::{Link, Ring};
//!
//! let mut links = vec![Link::detached(0), Link::detached(1), Link::detached(2)];
//! let mut ring = Ring::new();
//!
//! ring.push(links.as_mut_slice(), 0);
//! ring.push(links.as_mut_slice(), 1);
//! ring.push(links.as_mut_slice(), 2);
//! assert_eq!(ring.len(), 3);
//!
//! ring.remove(links.as_mut_slice(), 0);
//! assert_eq!(ring.head(), Some(1));
//! assert_eq!(ring.iter(links.as_slice()).collect::<Vec<_>>(), vec![1, 2]);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

use core::fmt;

// =============================================================================
// Link storage
// =============================================================================

/// The `next`/`prev` pair embedded in every ring member.
///
/// A detached link points at its own node, which is exactly a ring of one.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Link<I> {
    /// Following member in ring order.
    pub next: I,
    /// Preceding member in ring order.
    pub prev: I,
}

impl<I: Copy> Link<I> {
    /// Creates a link describing a singleton ring around `at`.
    #[inline]
    pub const fn detached(at: I) -> Self {
        Link { next: at, prev: at }
    }
}

impl<I: fmt::Debug> fmt::Debug for Link<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Link({:?} <- * -> {:?})", self.prev, self.next)
    }
}

/// Storage that owns the links of ring members.
///
/// Implementors index their nodes by `I`. Every method may assume `at` refers
/// to a live node; ring operations never touch nodes outside the rings they
/// are given.
pub trait RingLinks<I: Copy + Eq> {
    /// Gets the next member after `at`.
    fn next(&self, at: I) -> I;

    /// Gets the member before `at`.
    fn prev(&self, at: I) -> I;

    /// Sets the next member after `at`.
    fn set_next(&mut self, at: I, next: I);

    /// Sets the member before `at`.
    fn set_prev(&mut self, at: I, prev: I);
}

impl RingLinks<usize> for [Link<usize>] {
    #[inline]
    fn next(&self, at: usize) -> usize {
        self[at].next
    }

    #[inline]
    fn prev(&self, at: usize) -> usize {
        self[at].prev
    }

    #[inline]
    fn set_next(&mut self, at: usize, next: usize) {
        self[at].next = next;
    }

    #[inline]
    fn set_prev(&mut self, at: usize, prev: usize) {
        self[at].prev = prev;
    }
}

// =============================================================================
// Ring
// =============================================================================

/// A circular ring identified by one representative member and its size.
///
/// The ring does not own its members. It only records where the ring can be
/// entered (`head`) and how many members it has; the members' links live in
/// the [`RingLinks`] storage passed to each operation. All operations are
/// O(1) except iteration.
///
/// Members must belong to at most one ring at a time. Pushing a node that is
/// still threaded into another live ring corrupts both rings.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ring<I> {
    head: Option<I>,
    len: usize,
}

impl<I> Default for Ring<I> {
    #[inline]
    fn default() -> Self {
        Ring { head: None, len: 0 }
    }
}

impl<I: fmt::Debug> fmt::Debug for Ring<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ring")
            .field("head", &self.head)
            .field("len", &self.len)
            .finish()
    }
}

impl<I: Copy + Eq> Ring<I> {
    /// Creates an empty ring.
    #[inline]
    pub const fn new() -> Self {
        Ring { head: None, len: 0 }
    }

    /// The representative member, or `None` for an empty ring.
    #[inline]
    pub fn head(&self) -> Option<I> {
        self.head
    }

    /// Number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the ring has no members.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Takes the ring out, leaving an empty ring behind.
    #[inline]
    pub fn take(&mut self) -> Self {
        core::mem::take(self)
    }

    /// Adds `node` to the ring, just before the representative.
    ///
    /// The node's previous links are overwritten, so it only needs to be
    /// detached from any ring that is still in use.
    pub fn push<S>(&mut self, links: &mut S, node: I)
    where
        S: RingLinks<I> + ?Sized,
    {
        match self.head {
            None => {
                links.set_next(node, node);
                links.set_prev(node, node);
                self.head = Some(node);
            }
            Some(head) => {
                let tail = links.prev(head);
                links.set_next(tail, node);
                links.set_prev(node, tail);
                links.set_next(node, head);
                links.set_prev(head, node);
            }
        }
        self.len += 1;
    }

    /// Removes a known member from the ring.
    ///
    /// If `node` was the representative, the representative moves to its
    /// successor, or the ring becomes empty. The removed node is left as a
    /// singleton ring of its own.
    pub fn remove<S>(&mut self, links: &mut S, node: I)
    where
        S: RingLinks<I> + ?Sized,
    {
        debug_assert!(self.len > 0, "remove from an empty ring");

        let next = links.next(node);
        let prev = links.prev(node);

        if next == node {
            debug_assert!(self.head == Some(node), "node is not a member");
            self.head = None;
        } else {
            links.set_next(prev, next);
            links.set_prev(next, prev);
            if self.head == Some(node) {
                self.head = Some(next);
            }
        }

        links.set_next(node, node);
        links.set_prev(node, node);
        self.len -= 1;
    }

    /// Splices `other` into this ring, consuming it.
    ///
    /// Before:
    ///   Ring A: ... <-> a_prev <-> a <-> ...
    ///   Ring B: ... <-> b_prev <-> b <-> ...
    ///
    /// After:
    ///   ... <-> a_prev <-> b <-> ... <-> b_prev <-> a <-> ...
    pub fn splice<S>(&mut self, links: &mut S, other: Ring<I>)
    where
        S: RingLinks<I> + ?Sized,
    {
        match (self.head, other.head) {
            (_, None) => {}
            (None, Some(_)) => *self = other,
            (Some(a), Some(b)) => {
                let a_prev = links.prev(a);
                let b_prev = links.prev(b);

                links.set_next(a_prev, b);
                links.set_prev(b, a_prev);

                links.set_next(b_prev, a);
                links.set_prev(a, b_prev);

                self.len += other.len;
            }
        }
    }

    /// Iterates the members starting at the representative.
    ///
    /// The iterator yields exactly [`len`](Self::len) items. The ring must
    /// not be modified while iterating; collect first if it will be.
    pub fn iter<'a, S>(&self, links: &'a S) -> Iter<'a, I, S>
    where
        S: RingLinks<I> + ?Sized,
    {
        Iter {
            links,
            next: self.head,
            remaining: self.len,
        }
    }

    /// Walks the ring by following `next` until it returns to the
    /// representative, checking that `prev` mirrors every step.
    ///
    /// Returns the number of members visited, or `None` if the links are not
    /// mutual inverses or the walk does not close within `limit` steps. This
    /// is O(n) and meant for verification, not for hot paths.
    pub fn walk<S>(&self, links: &S, limit: usize) -> Option<usize>
    where
        S: RingLinks<I> + ?Sized,
    {
        let Some(head) = self.head else {
            return Some(0);
        };

        let mut count = 0;
        let mut current = head;
        loop {
            let next = links.next(current);
            if links.prev(next) != current {
                return None;
            }
            count += 1;
            if next == head {
                return Some(count);
            }
            if count >= limit {
                return None;
            }
            current = next;
        }
    }
}

/// Iterator over ring members; see [`Ring::iter`].
pub struct Iter<'a, I, S: ?Sized> {
    links: &'a S,
    next: Option<I>,
    remaining: usize,
}

impl<I, S> Iterator for Iter<'_, I, S>
where
    I: Copy + Eq,
    S: RingLinks<I> + ?Sized,
{
    type Item = I;

    #[inline]
    fn next(&mut self) -> Option<I> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next?;
        self.remaining -= 1;
        self.next = Some(self.links.next(current));
        Some(current)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<I, S> ExactSizeIterator for Iter<'_, I, S>
where
    I: Copy + Eq,
    S: RingLinks<I> + ?Sized,
{
}

// =============================================================================
// Tests
// =============================================================================
