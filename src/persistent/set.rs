//! Persistent ordered set based on a path-copying binary search tree.
//!
//! This module provides [`PersistentSet`], an ordered set in which every
//! mutation produces a new version while earlier handles keep observing the
//! snapshot they were taken from.
//!
//! # Overview
//!
//! The set is an unbalanced binary search tree of immutable, reference-counted
//! nodes hanging off a valueless sentinel. A handle is a reference to a
//! sentinel plus an element count:
//!
//! - O(1) `clone`, `clear`, `swap`, `len` and `is_empty`
//! - O(height) `find`, `insert`, `erase` and every cursor step
//! - O(height) allocation per mutation; all other nodes are shared
//!
//! The tree is not rebalanced, so adversarial insertion orders (for example
//! sorted input) degrade the height to O(N).
//!
//! # Examples
//!
//! ```rust
//! use persistent_set::persistent::PersistentSet;
//!
//! let mut set = PersistentSet::new();
//! set.insert(1);
//! set.insert(2);
//! assert_eq!(set.len(), 2);
//!
//! let version_two = set.clone();
//! let two = set.find(&2);
//! set.erase(&two).unwrap();
//!
//! assert_eq!(set.iter().collect::<Vec<_>>(), vec![&1]);
//! assert_eq!(set.find(&2), set.end());
//! assert_eq!(version_two.iter().collect::<Vec<_>>(), vec![&1, &2]);
//! ```
//!
//! # Internal Structure
//!
//! ```text
//!        sentinel          <- end position, never holds a value
//!         /
//!        5                 <- real root
//!      /   \
//!     3     8
//! ```
//!
//! `insert` and `erase` record the path from the root down to the affected
//! node, then rebuild that path bottom-up: each rebuilt node keeps its value,
//! shares its untouched child with the old version and points at the rebuilt
//! child. A fresh sentinel is placed over the new root.

use super::ReferenceCounter;
use super::cursor::{Cursor, ReverseCursor};
use super::error::EraseError;
use super::iter::{IntoIter, Iter, Range};
use super::node::{self, Direction, Link, Node};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;
use std::ops::{Bound, RangeBounds};

/// Nodes visited on the way down, each with the child slot taken from it.
type Path<'a, T> = Vec<(&'a ReferenceCounter<Node<T>>, Direction)>;

// =============================================================================
// PersistentSet Definition
// =============================================================================

/// A persistent (multi-version) ordered set.
///
/// `PersistentSet` is a handle on one version of a binary search tree whose
/// nodes are shared between versions. Cloning a handle is O(1) and yields an
/// independent snapshot: mutating either handle afterwards never affects the
/// other.
///
/// Elements must implement `Ord`; mutations additionally need `Clone`, since
/// the nodes on a modified path are copied.
///
/// # Time Complexity
///
/// | Operation        | Complexity   |
/// |------------------|--------------|
/// | `new`            | O(1)         |
/// | `clone`          | O(1)         |
/// | `find`           | O(height)    |
/// | `insert`         | O(height)    |
/// | `erase`          | O(height)    |
/// | cursor step      | O(height)    |
/// | `len`/`is_empty` | O(1)         |
/// | `clear`/`swap`   | O(1)         |
///
/// # Examples
///
/// ```rust
/// use persistent_set::persistent::PersistentSet;
///
/// let mut set = PersistentSet::new();
/// for value in [5, 3, 8, 1, 4, 7, 9] {
///     set.insert(value);
/// }
///
/// let values: Vec<i32> = set.iter().copied().collect();
/// assert_eq!(values, vec![1, 3, 4, 5, 7, 8, 9]);
/// ```
pub struct PersistentSet<T> {
    /// Sentinel of the current version; `None` until the first insert and
    /// after `clear`
    sentinel: Link<T>,
    /// Number of elements
    length: usize,
}

impl<T> PersistentSet<T> {
    /// Creates a new empty set.
    ///
    /// No node is allocated until the first insertion.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_set::persistent::PersistentSet;
    ///
    /// let set: PersistentSet<i32> = PersistentSet::new();
    /// assert!(set.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sentinel: None,
            length: 0,
        }
    }

    /// Returns the number of elements in the set.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the set contains no elements.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_set::persistent::PersistentSet;
    ///
    /// let mut set = PersistentSet::new();
    /// assert!(set.is_empty());
    /// set.insert("value");
    /// assert!(!set.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Removes every element from this handle.
    ///
    /// Only the handle's reference to its version is dropped; nodes still
    /// reachable from other handles, cursors or iterators stay alive.
    /// Clearing an empty set is a no-op.
    ///
    /// # Complexity
    ///
    /// O(1), plus the release of nodes no other version references
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_set::persistent::PersistentSet;
    ///
    /// let mut set: PersistentSet<i32> = [1, 2, 3].into_iter().collect();
    /// let snapshot = set.clone();
    /// set.clear();
    ///
    /// assert!(set.is_empty());
    /// assert_eq!(snapshot.len(), 3);
    /// ```
    pub fn clear(&mut self) {
        trace_event!(length = self.length, "clear");
        self.sentinel = None;
        self.length = 0;
    }

    /// Exchanges the versions held by two handles.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_set::persistent::PersistentSet;
    ///
    /// let mut first: PersistentSet<i32> = [1].into_iter().collect();
    /// let mut second: PersistentSet<i32> = [2, 3].into_iter().collect();
    /// first.swap(&mut second);
    ///
    /// assert_eq!(first.len(), 2);
    /// assert_eq!(second.len(), 1);
    /// ```
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// Returns `true` if both handles hold the very same version.
    ///
    /// Two sets can be equal element-wise while not sharing a version.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_set::persistent::PersistentSet;
    ///
    /// let mut set: PersistentSet<i32> = [1, 2].into_iter().collect();
    /// let copy = set.clone();
    /// assert!(set.ptr_eq(&copy));
    ///
    /// set.insert(3);
    /// assert!(!set.ptr_eq(&copy));
    /// ```
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.sentinel, &other.sentinel) {
            (None, None) => true,
            (Some(left), Some(right)) => ReferenceCounter::ptr_eq(left, right),
            _ => false,
        }
    }

    /// Returns the number of nodes on the longest root-to-leaf path.
    ///
    /// The tree is never rebalanced; this exposes how far the current
    /// version is from balanced.
    ///
    /// # Complexity
    ///
    /// O(N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_set::persistent::PersistentSet;
    ///
    /// let sorted: PersistentSet<i32> = (0..10).collect();
    /// assert_eq!(sorted.height(), 10);
    ///
    /// let mixed: PersistentSet<i32> = [2, 1, 3].into_iter().collect();
    /// assert_eq!(mixed.height(), 2);
    /// ```
    #[must_use]
    pub fn height(&self) -> usize {
        node::height(self.root())
    }

    /// The real root of the current version.
    fn root(&self) -> Option<&ReferenceCounter<Node<T>>> {
        self.sentinel
            .as_ref()
            .and_then(|sentinel| sentinel.left.as_ref())
    }

    /// Cursor at `node` within the current version, or the end cursor.
    fn cursor_at(&self, node: Option<&ReferenceCounter<Node<T>>>) -> Cursor<T> {
        match &self.sentinel {
            Some(sentinel) => Cursor::at(sentinel, node.unwrap_or(sentinel)),
            None => Cursor::detached(),
        }
    }
}

impl<T: Ord> PersistentSet<T> {
    /// Returns a cursor at the element equal to `key`, or [`end`](Self::end)
    /// if there is none.
    ///
    /// The key may be any borrowed form of the element type, but the ordering
    /// on the borrowed form must match the ordering on the element type.
    ///
    /// # Complexity
    ///
    /// O(height)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_set::persistent::PersistentSet;
    ///
    /// let set: PersistentSet<String> = ["apple".to_string()].into_iter().collect();
    ///
    /// assert_eq!(set.find("apple").get(), Some(&"apple".to_string()));
    /// assert_eq!(set.find("pear"), set.end());
    /// ```
    #[must_use]
    pub fn find<Q>(&self, key: &Q) -> Cursor<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let found = self
            .sentinel
            .as_ref()
            .and_then(|sentinel| node::search(sentinel, key));
        self.cursor_at(found)
    }

    /// Returns `true` if the set contains an element equal to `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_set::persistent::PersistentSet;
    ///
    /// let set: PersistentSet<i32> = [1, 2].into_iter().collect();
    /// assert!(set.contains(&1));
    /// assert!(!set.contains(&3));
    /// ```
    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Returns a reference to the element equal to `key`, if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_set::persistent::PersistentSet;
    ///
    /// let set: PersistentSet<String> = ["key".to_string()].into_iter().collect();
    /// assert_eq!(set.get("key"), Some(&"key".to_string()));
    /// assert_eq!(set.get("other"), None);
    /// ```
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.sentinel
            .as_ref()
            .and_then(|sentinel| node::search(sentinel, key))
            .and_then(|found| found.value())
    }

    /// Returns the smallest element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_set::persistent::PersistentSet;
    ///
    /// let set: PersistentSet<i32> = [3, 1, 2].into_iter().collect();
    /// assert_eq!(set.first(), Some(&1));
    /// ```
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.root().and_then(|root| node::minimum(root).value())
    }

    /// Returns the largest element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_set::persistent::PersistentSet;
    ///
    /// let set: PersistentSet<i32> = [3, 1, 2].into_iter().collect();
    /// assert_eq!(set.last(), Some(&3));
    /// ```
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.root().and_then(|root| node::maximum(root).value())
    }

    /// Returns a cursor at the smallest element, or [`end`](Self::end) if the
    /// set is empty.
    #[must_use]
    pub fn begin(&self) -> Cursor<T> {
        self.cursor_at(self.root().map(|root| node::minimum(root)))
    }

    /// Returns the end cursor: the position after the largest element.
    ///
    /// It is anchored at the sentinel of the current version, so end cursors
    /// of different versions compare unequal.
    #[must_use]
    pub fn end(&self) -> Cursor<T> {
        self.cursor_at(None)
    }

    /// Returns a reverse cursor at the largest element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_set::persistent::PersistentSet;
    ///
    /// let set: PersistentSet<i32> = [1, 2, 3].into_iter().collect();
    /// assert_eq!(set.rbegin().get(), Some(&3));
    /// ```
    #[must_use]
    pub fn rbegin(&self) -> ReverseCursor<T> {
        ReverseCursor::new(self.end())
    }

    /// Returns the reverse end cursor: the position before the smallest
    /// element.
    #[must_use]
    pub fn rend(&self) -> ReverseCursor<T> {
        ReverseCursor::new(self.begin())
    }

    /// Returns a lazy iterator over the elements in ascending order.
    ///
    /// The iterator is double-ended; `.rev()` walks in descending order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_set::persistent::PersistentSet;
    ///
    /// let set: PersistentSet<i32> = [3, 1, 2].into_iter().collect();
    ///
    /// let ascending: Vec<&i32> = set.iter().collect();
    /// assert_eq!(ascending, vec![&1, &2, &3]);
    ///
    /// let descending: Vec<&i32> = set.iter().rev().collect();
    /// assert_eq!(descending, vec![&3, &2, &1]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.sentinel.as_ref(), self.length)
    }

    /// Returns a lazy iterator over the elements within `range`.
    ///
    /// An empty or inverted range yields nothing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_set::persistent::PersistentSet;
    ///
    /// let set: PersistentSet<i32> = (1..=10).collect();
    ///
    /// let middle: Vec<&i32> = set.range(4..7).collect();
    /// assert_eq!(middle, vec![&4, &5, &6]);
    ///
    /// let tail: Vec<&i32> = set.range(8..).rev().collect();
    /// assert_eq!(tail, vec![&10, &9, &8]);
    /// ```
    pub fn range<R, Q>(&self, range: R) -> Range<'_, T>
    where
        R: RangeBounds<Q>,
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some(sentinel) = self.sentinel.as_ref() else {
            return Range::new(None, None, None);
        };
        let front = match range.start_bound() {
            Bound::Included(start) => node::lower_bound(sentinel, start, true),
            Bound::Excluded(start) => node::lower_bound(sentinel, start, false),
            Bound::Unbounded => node::minimum(sentinel),
        };
        let back = match range.end_bound() {
            Bound::Included(end) => node::upper_bound(sentinel, end, true),
            Bound::Excluded(end) => node::upper_bound(sentinel, end, false),
            Bound::Unbounded => node::predecessor(sentinel, sentinel),
        };
        Range::new(Some(sentinel), Some(front), Some(back))
    }

    /// Walks down from the root while `compare` (node against target) says
    /// where to go.
    ///
    /// Returns the path taken and the node where `compare` reported
    /// `Equal`, if any.
    fn descend<'a, F>(
        root: Option<&'a ReferenceCounter<Node<T>>>,
        mut compare: F,
    ) -> (Path<'a, T>, Option<&'a ReferenceCounter<Node<T>>>)
    where
        F: FnMut(&Node<T>) -> Ordering,
    {
        let mut path = Vec::new();
        let mut current = root;
        while let Some(node) = current {
            let direction = match compare(&**node) {
                Ordering::Less => Direction::Right,
                Ordering::Greater => Direction::Left,
                Ordering::Equal => return (path, Some(node)),
            };
            path.push((node, direction));
            current = node.child(direction);
        }
        (path, None)
    }
}

impl<T: Clone + Ord> PersistentSet<T> {
    /// Inserts `value` into the set.
    ///
    /// Returns a cursor at the element equal to `value` and whether the
    /// insertion took place. If an equal element is already present the set
    /// is left unchanged (same version, same length) and the cursor points at
    /// the existing element.
    ///
    /// Otherwise only the nodes on the path from the root to the new leaf
    /// are copied; every other node is shared with the previous version,
    /// which stays intact for any handle that still holds it.
    ///
    /// # Complexity
    ///
    /// O(height)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_set::persistent::PersistentSet;
    ///
    /// let mut set = PersistentSet::new();
    /// let before = set.clone();
    ///
    /// let (cursor, inserted) = set.insert(42);
    /// assert!(inserted);
    /// assert_eq!(cursor.get(), Some(&42));
    ///
    /// let (_, inserted_again) = set.insert(42);
    /// assert!(!inserted_again);
    ///
    /// assert_eq!(set.len(), 1);
    /// assert!(before.is_empty()); // Original unchanged
    /// ```
    pub fn insert(&mut self, value: T) -> (Cursor<T>, bool) {
        let sentinel: &ReferenceCounter<Node<T>> = self
            .sentinel
            .get_or_insert_with(|| ReferenceCounter::new(Node::sentinel(None)));
        let (path, existing) =
            Self::descend(sentinel.left.as_ref(), |node| node.compare_key(&value));
        if let Some(existing) = existing {
            trace_event!(length = self.length, inserted = false, "insert");
            return (Cursor::at(sentinel, existing), false);
        }

        trace_event!(path_len = path.len(), "insert: copying path");
        let inserted = ReferenceCounter::new(Node::leaf(value));
        let root = Self::copy_path(path, Some(ReferenceCounter::clone(&inserted)));
        let sentinel = self.install(root);
        self.length += 1;

        trace_event!(length = self.length, inserted = true, "insert");
        (Cursor::at(&sentinel, &inserted), true)
    }

    /// Removes the element `cursor` points at.
    ///
    /// The cursor must point at a node of the live version: one obtained from
    /// this handle, or from an older version for as long as that node has
    /// not been copied by a later mutation. Erasing from an empty set is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// - [`EraseError::EndCursor`] if the set is not empty and `cursor` is at
    ///   the end position
    /// - [`EraseError::ForeignCursor`] if the cursor's node is not part of
    ///   the live version
    ///
    /// The set is unchanged when an error is returned.
    ///
    /// # Complexity
    ///
    /// O(height)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_set::persistent::{EraseError, PersistentSet};
    ///
    /// let mut set: PersistentSet<i32> = [1, 2, 3].into_iter().collect();
    /// let other: PersistentSet<i32> = [2].into_iter().collect();
    ///
    /// assert_eq!(set.erase(&other.find(&2)), Err(EraseError::ForeignCursor));
    ///
    /// let two = set.find(&2);
    /// set.erase(&two).unwrap();
    /// assert!(!set.contains(&2));
    /// assert_eq!(set.len(), 2);
    /// ```
    pub fn erase(&mut self, cursor: &Cursor<T>) -> Result<(), EraseError> {
        let Some(root) = self.root() else {
            return Ok(());
        };
        let target = match cursor.node() {
            Some(target) if !target.is_sentinel() => target,
            _ => return Err(EraseError::EndCursor),
        };
        let (path, found) = Self::descend(Some(root), |node| node.compare_node(target));
        let found = match found {
            Some(found) if ReferenceCounter::ptr_eq(found, target) => found,
            _ => return Err(EraseError::ForeignCursor),
        };

        trace_event!(path_len = path.len(), "erase: copying path");
        let root = Self::copy_path(path, Self::detach(found));
        self.install(root);
        debug_assert!(self.length > 0, "a detached node implies a non-empty set");
        self.length -= 1;

        trace_event!(length = self.length, "erase");
        Ok(())
    }

    /// Removes the element equal to `key`, returning whether one was present.
    ///
    /// # Complexity
    ///
    /// O(height)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_set::persistent::PersistentSet;
    ///
    /// let mut set: PersistentSet<i32> = [1, 2].into_iter().collect();
    /// let snapshot = set.clone();
    ///
    /// assert!(set.remove(&1));
    /// assert!(!set.remove(&1));
    /// assert_eq!(set.len(), 1);
    /// assert_eq!(snapshot.len(), 2); // Original unchanged
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (path, found) = Self::descend(self.root(), |node| node.compare_key(key));
        let Some(found) = found else {
            return false;
        };

        trace_event!(path_len = path.len(), "remove: copying path");
        let root = Self::copy_path(path, Self::detach(found));
        self.install(root);
        debug_assert!(self.length > 0, "a detached node implies a non-empty set");
        self.length -= 1;

        trace_event!(length = self.length, "remove");
        true
    }

    /// Rebuilds `path` bottom-up over `child`, returning the new root.
    ///
    /// Each copied node keeps its value and its untouched child.
    fn copy_path(path: Path<'_, T>, child: Link<T>) -> Link<T> {
        path.into_iter()
            .rev()
            .fold(child, |child, (node, direction)| {
                Some(ReferenceCounter::new(node.rebuild(direction, child)))
            })
    }

    /// Returns the subtree that takes the place of `node` once it is removed.
    fn detach(node: &ReferenceCounter<Node<T>>) -> Link<T> {
        match (&node.left, &node.right) {
            (left, None) => left.clone(),
            (None, right) => right.clone(),
            (Some(left), Some(right)) => {
                // The successor is the minimum of the right subtree; it has
                // no left child, so its right child takes its place there.
                let successor = node::minimum(right);
                let (spine, _) =
                    Self::descend(Some(right), |candidate| candidate.compare_node(successor));
                let reduced_right = Self::copy_path(spine, successor.right.clone());
                Some(ReferenceCounter::new(
                    successor.relink(Some(ReferenceCounter::clone(left)), reduced_right),
                ))
            }
        }
    }

    /// Places a fresh sentinel over `root` and makes it the current version.
    fn install(&mut self, root: Link<T>) -> ReferenceCounter<Node<T>> {
        let sentinel = ReferenceCounter::new(Node::sentinel(root));
        self.sentinel = Some(ReferenceCounter::clone(&sentinel));
        sentinel
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Clone for PersistentSet<T> {
    /// Copies the handle, not the tree: O(1).
    fn clone(&self) -> Self {
        Self {
            sentinel: self.sentinel.clone(),
            length: self.length,
        }
    }
}

impl<T> Default for PersistentSet<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Ord> FromIterator<T> for PersistentSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T: Clone + Ord> Extend<T> for PersistentSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Clone + Ord> IntoIterator for PersistentSet<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.sentinel, self.length)
    }
}

impl<'a, T: Ord> IntoIterator for &'a PersistentSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Ord> PartialEq for PersistentSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || (self.length == other.length && self.iter().eq(other.iter()))
    }
}

impl<T: Ord> Eq for PersistentSet<T> {}

/// Computes a hash value for this set.
///
/// The length is hashed first, then each element in ascending order, so
/// equal sets hash equally regardless of insertion order.
impl<T: Ord + Hash> Hash for PersistentSet<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.length.hash(state);
        for value in self {
            value.hash(state);
        }
    }
}

impl<T: Ord + fmt::Debug> fmt::Debug for PersistentSet<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Ord + fmt::Display> fmt::Display for PersistentSet<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for value in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{value}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Rayon Support
// =============================================================================

#[cfg(feature = "rayon")]
impl<T: Ord + Sync> PersistentSet<T> {
    /// Returns a parallel iterator over the elements of this snapshot.
    ///
    /// The elements are gathered in ascending order first; rayon then
    /// splits that sequence across its thread pool.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_set::persistent::PersistentSet;
    /// use rayon::prelude::*;
    ///
    /// let set: PersistentSet<i64> = (1..=100).collect();
    /// let sum: i64 = set.par_iter().sum();
    /// assert_eq!(sum, 5050);
    /// ```
    #[must_use]
    pub fn par_iter(&self) -> rayon::vec::IntoIter<&T> {
        use rayon::iter::IntoParallelIterator;
        self.iter().collect::<Vec<_>>().into_par_iter()
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T> serde::Serialize for PersistentSet<T>
where
    T: serde::Serialize + Ord,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut sequence = serializer.serialize_seq(Some(self.len()))?;
        for value in self {
            sequence.serialize_element(value)?;
        }
        sequence.end()
    }
}

#[cfg(feature = "serde")]
struct PersistentSetVisitor<T> {
    marker: std::marker::PhantomData<T>,
}

#[cfg(feature = "serde")]
impl<T> PersistentSetVisitor<T> {
    const fn new() -> Self {
        Self {
            marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::de::Visitor<'de> for PersistentSetVisitor<T>
where
    T: serde::Deserialize<'de> + Clone + Ord,
{
    type Value = PersistentSet<T>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut set = PersistentSet::new();
        while let Some(value) = access.next_element()? {
            set.insert(value);
        }
        Ok(set)
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for PersistentSet<T>
where
    T: serde::Deserialize<'de> + Clone + Ord,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(PersistentSetVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================


// =============================================================================
// Send + Sync Tests (arc feature only)
// =============================================================================

#[cfg(all(test, feature = "arc"))]
mod multithread_tests {
    use super::*;
    use rstest::rstest;
    use std::thread;

    #[rstest]
    fn test_snapshot_read_across_threads() {
        let set: PersistentSet<i32> = [5, 3, 8, 1, 4, 7, 9].into_iter().collect();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let snapshot = set.clone();
                thread::spawn(move || snapshot.iter().copied().collect::<Vec<_>>())
            })
            .collect();

        for handle in handles {
            let values = handle.join().expect("Thread panicked");
            assert_eq!(values, vec![1, 3, 4, 5, 7, 8, 9]);
        }
    }

    #[rstest]
    fn test_copy_then_mutate_in_threads() {
        let base: PersistentSet<i32> = [0].into_iter().collect();

        let results: Vec<_> = (1..=4)
            .map(|index| {
                let mut version = base.clone();
                thread::spawn(move || {
                    version.insert(index);
                    version
                })
            })
            .map(|handle| handle.join().expect("Thread panicked"))
            .collect();

        for (index, version) in (1..=4).zip(&results) {
            assert_eq!(version.len(), 2);
            assert!(version.contains(&index));
        }
        assert_eq!(base.len(), 1);
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_serialize_ascending() {
        let set: PersistentSet<i32> = [3, 1, 2].into_iter().collect();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, "[1,2,3]");
    }

    #[rstest]
    fn test_serialize_empty() {
        let set: PersistentSet<String> = PersistentSet::new();
        assert_eq!(serde_json::to_string(&set).unwrap(), "[]");
    }

    #[rstest]
    fn test_deserialize_collapses_duplicates() {
        let set: PersistentSet<i32> = serde_json::from_str("[2,1,2,3,1]").unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[rstest]
    fn test_roundtrip() {
        let original: PersistentSet<String> = (0..50).map(|index| format!("key{index:02}")).collect();
        let json = serde_json::to_string(&original).unwrap();
        let restored: PersistentSet<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(original, restored);
    }
}
