//! Shared helpers for the integration tests
//!
//! `ReferenceHeap` is a deliberately simple model of a decrease-key heap built
//! on `std::collections::BinaryHeap` with lazy deletion. Every heap under test
//! must agree with it step for step.

#![allow(dead_code)]

use fibonacci_forest::{DecreaseKeyHeap, Handle, Heap, HeapError, Key};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Slot index into a `ReferenceHeap`
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ReferenceHandle(usize);

impl Handle for ReferenceHandle {}

/// Binary-heap model with lazy deletion.
///
/// `slots[i]` holds the live key of element `i`; queue entries whose key no
/// longer matches their slot are skipped when they reach the top.
#[derive(Default, Debug)]
pub struct ReferenceHeap {
    queue: BinaryHeap<Reverse<(Key, usize)>>,
    slots: Vec<Option<Key>>,
    len: usize,
}

impl ReferenceHeap {
    fn discard_stale(&mut self) {
        while let Some(&Reverse((key, slot))) = self.queue.peek() {
            if self.slots[slot] == Some(key) {
                break;
            }
            self.queue.pop();
        }
    }

    fn live(&self, handle: &ReferenceHandle) -> Result<Key, HeapError> {
        self.slots
            .get(handle.0)
            .copied()
            .flatten()
            .ok_or(HeapError::StaleHandle)
    }

    /// Returns true if `handle` still names a live element.
    pub fn contains(&self, handle: &ReferenceHandle) -> bool {
        self.live(handle).is_ok()
    }

    /// Remaining keys in ascending order, without consuming the model.
    pub fn sorted_keys(&self) -> Vec<Key> {
        let mut keys: Vec<Key> = self.slots.iter().flatten().copied().collect();
        keys.sort_unstable();
        keys
    }
}

impl Heap for ReferenceHeap {
    type Key = Key;

    fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn len(&self) -> usize {
        self.len
    }

    fn push(&mut self, key: Key) {
        self.push_with_handle(key);
    }

    fn peek(&self) -> Option<Key> {
        self.slots.iter().flatten().min().copied()
    }

    fn pop(&mut self) -> Option<Key> {
        self.discard_stale();
        let Reverse((key, slot)) = self.queue.pop()?;
        self.slots[slot] = None;
        self.len -= 1;
        Some(key)
    }

    fn merge(&mut self, other: Self) {
        for key in other.slots.into_iter().flatten() {
            self.push(key);
        }
    }
}

impl DecreaseKeyHeap for ReferenceHeap {
    type Handle = ReferenceHandle;

    fn push_with_handle(&mut self, key: Key) -> ReferenceHandle {
        let slot = self.slots.len();
        self.slots.push(Some(key));
        self.queue.push(Reverse((key, slot)));
        self.len += 1;
        ReferenceHandle(slot)
    }

    fn decrease_key(&mut self, handle: &ReferenceHandle, delta: Key) -> Result<(), HeapError> {
        if delta < 0 {
            return Err(HeapError::NegativeDelta { delta });
        }
        let key = self.live(handle)?;
        let new_key = key
            .checked_sub(delta)
            .ok_or(HeapError::KeyUnderflow { key, delta })?;
        self.slots[handle.0] = Some(new_key);
        self.queue.push(Reverse((new_key, handle.0)));
        Ok(())
    }

    fn delete(&mut self, handle: &ReferenceHandle) -> Result<Key, HeapError> {
        if self.len == 0 {
            return Err(HeapError::EmptyHeap);
        }
        let key = self.live(handle)?;
        self.slots[handle.0] = None;
        self.len -= 1;
        Ok(key)
    }
}

/// Pops every element, returning the keys in pop order.
pub fn drain<H: Heap>(heap: &mut H) -> Vec<H::Key> {
    let mut out = Vec::with_capacity(heap.len());
    while let Some(key) = heap.pop() {
        out.push(key);
    }
    out
}
