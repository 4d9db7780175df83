//! Lazy in-order sequences over a snapshot.
//!
//! None of these iterators materializes the set: each step asks
//! [`successor`] or [`predecessor`] for the neighbouring node, which costs
//! O(height).

use super::ReferenceCounter;
use super::node::{Node, predecessor, successor};
use std::iter::FusedIterator;

type NodeRef<'a, T> = &'a ReferenceCounter<Node<T>>;

// =============================================================================
// Iter
// =============================================================================

/// An iterator over the elements of a [`PersistentSet`](super::PersistentSet)
/// in ascending order.
///
/// Double-ended: `.rev()` yields the exact mirror in descending order.
pub struct Iter<'a, T> {
    sentinel: Option<NodeRef<'a, T>>,
    front: Option<NodeRef<'a, T>>,
    back: Option<NodeRef<'a, T>>,
    remaining: usize,
}

impl<'a, T: Ord> Iter<'a, T> {
    pub(crate) fn new(sentinel: Option<NodeRef<'a, T>>, length: usize) -> Self {
        Self {
            sentinel,
            front: sentinel.map(|sentinel| successor(sentinel, sentinel)),
            back: sentinel.map(|sentinel| predecessor(sentinel, sentinel)),
            remaining: if sentinel.is_some() { length } else { 0 },
        }
    }
}

impl<'a, T: Ord> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let sentinel = self.sentinel?;
        let node = self.front?;
        self.front = Some(successor(sentinel, node));
        self.remaining -= 1;
        node.value()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T: Ord> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let sentinel = self.sentinel?;
        let node = self.back?;
        self.back = Some(predecessor(sentinel, node));
        self.remaining -= 1;
        node.value()
    }
}

impl<T: Ord> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T: Ord> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            sentinel: self.sentinel,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

// =============================================================================
// Range
// =============================================================================

/// An iterator over the elements of a [`PersistentSet`](super::PersistentSet)
/// that fall within a range, in ascending order.
///
/// Created by [`PersistentSet::range`](super::PersistentSet::range).
pub struct Range<'a, T> {
    sentinel: Option<NodeRef<'a, T>>,
    /// First element not yet yielded from the front (inclusive).
    front: Option<NodeRef<'a, T>>,
    /// Last element not yet yielded from the back (inclusive).
    back: Option<NodeRef<'a, T>>,
    finished: bool,
}

impl<'a, T: Ord> Range<'a, T> {
    pub(crate) fn new(
        sentinel: Option<NodeRef<'a, T>>,
        front: Option<NodeRef<'a, T>>,
        back: Option<NodeRef<'a, T>>,
    ) -> Self {
        let finished = match (front, back) {
            (Some(front), Some(back)) => {
                front.is_sentinel() || back.is_sentinel() || front.compare_node(back).is_gt()
            }
            _ => true,
        };
        Self {
            sentinel,
            front,
            back,
            finished,
        }
    }
}

impl<'a, T: Ord> Iterator for Range<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let (sentinel, front, back) = (self.sentinel?, self.front?, self.back?);
        if ReferenceCounter::ptr_eq(front, back) {
            self.finished = true;
        } else {
            self.front = Some(successor(sentinel, front));
        }
        front.value()
    }
}

impl<T: Ord> DoubleEndedIterator for Range<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let (sentinel, front, back) = (self.sentinel?, self.front?, self.back?);
        if ReferenceCounter::ptr_eq(front, back) {
            self.finished = true;
        } else {
            self.back = Some(predecessor(sentinel, back));
        }
        back.value()
    }
}

impl<T: Ord> FusedIterator for Range<'_, T> {}

// =============================================================================
// IntoIter
// =============================================================================

/// An owning iterator over the elements of a
/// [`PersistentSet`](super::PersistentSet) in ascending order.
///
/// The iterator holds its own reference to the snapshot, so the nodes stay
/// alive (and possibly shared with other versions) until it is dropped.
/// Elements are cloned out of the shared nodes.
pub struct IntoIter<T> {
    sentinel: Option<ReferenceCounter<Node<T>>>,
    front: Option<ReferenceCounter<Node<T>>>,
    back: Option<ReferenceCounter<Node<T>>>,
    remaining: usize,
}

impl<T: Ord> IntoIter<T> {
    pub(crate) fn new(sentinel: Option<ReferenceCounter<Node<T>>>, length: usize) -> Self {
        let front = sentinel
            .as_ref()
            .map(|sentinel| ReferenceCounter::clone(successor(sentinel, sentinel)));
        let back = sentinel
            .as_ref()
            .map(|sentinel| ReferenceCounter::clone(predecessor(sentinel, sentinel)));
        let remaining = if sentinel.is_some() { length } else { 0 };
        Self {
            sentinel,
            front,
            back,
            remaining,
        }
    }
}

impl<T: Clone + Ord> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let sentinel = self.sentinel.as_ref()?;
        let node = self.front.take()?;
        self.front = Some(ReferenceCounter::clone(successor(sentinel, &node)));
        self.remaining -= 1;
        node.value().cloned()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T: Clone + Ord> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let sentinel = self.sentinel.as_ref()?;
        let node = self.back.take()?;
        self.back = Some(ReferenceCounter::clone(predecessor(sentinel, &node)));
        self.remaining -= 1;
        node.value().cloned()
    }
}

impl<T: Clone + Ord> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T: Clone + Ord> FusedIterator for IntoIter<T> {}

// =============================================================================
// Tests
// =============================================================================
