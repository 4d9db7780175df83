//! Bidirectional positions inside one version of a set.

use super::ReferenceCounter;
use super::node::{Node, predecessor, successor};
use std::fmt;

/// A position inside one snapshot of a [`PersistentSet`](super::PersistentSet).
///
/// A cursor pairs the node it points at with the sentinel of the version it
/// was taken from. Both are reference-counted, so a cursor keeps its
/// snapshot alive on its own: mutating or dropping the set it came from
/// never invalidates it.
///
/// Positions form a ring through the end position, the way a ghost element
/// does for `std::collections::linked_list::Cursor`: moving forward from the
/// last element reaches the end, and moving forward from the end reaches the
/// first element again (symmetrically for backward moves).
///
/// Every move costs O(height): nodes carry no parent link, so the successor
/// or predecessor is recomputed by descending from the snapshot's root.
///
/// # Examples
///
/// ```rust
/// use persistent_set::persistent::PersistentSet;
///
/// let set: PersistentSet<i32> = [2, 1, 3].into_iter().collect();
///
/// let mut cursor = set.begin();
/// assert_eq!(cursor.get(), Some(&1));
/// cursor.move_next();
/// assert_eq!(cursor.get(), Some(&2));
/// cursor.move_next();
/// cursor.move_next();
/// assert!(cursor.is_end());
/// assert_eq!(cursor, set.end());
/// ```
pub struct Cursor<T> {
    /// `None` only for a set that has never held a sentinel.
    position: Option<Position<T>>,
}

struct Position<T> {
    sentinel: ReferenceCounter<Node<T>>,
    node: ReferenceCounter<Node<T>>,
}

impl<T> Cursor<T> {
    /// Creates a cursor at `node` within the snapshot anchored at `sentinel`.
    pub(crate) fn at(
        sentinel: &ReferenceCounter<Node<T>>,
        node: &ReferenceCounter<Node<T>>,
    ) -> Self {
        Self {
            position: Some(Position {
                sentinel: ReferenceCounter::clone(sentinel),
                node: ReferenceCounter::clone(node),
            }),
        }
    }

    /// Creates the end cursor of a set without a sentinel.
    pub(crate) const fn detached() -> Self {
        Self { position: None }
    }

    /// The node this cursor points at, `None` for a detached end cursor.
    pub(crate) fn node(&self) -> Option<&ReferenceCounter<Node<T>>> {
        self.position.as_ref().map(|position| &position.node)
    }

    /// Returns the element at this position, or `None` at the end position.
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.position
            .as_ref()
            .and_then(|position| position.node.value())
    }

    /// Returns `true` if this cursor is at the end position.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.get().is_none()
    }
}

impl<T: Ord> Cursor<T> {
    /// Moves to the next element in ascending order.
    ///
    /// From the last element this reaches the end position; from the end
    /// position it wraps to the first element.
    pub fn move_next(&mut self) {
        if let Some(position) = &mut self.position {
            let next = ReferenceCounter::clone(successor(&position.sentinel, &position.node));
            position.node = next;
        }
    }

    /// Moves to the previous element in ascending order.
    ///
    /// From the first element this reaches the end position; from the end
    /// position it wraps to the last element.
    pub fn move_prev(&mut self) {
        if let Some(position) = &mut self.position {
            let previous =
                ReferenceCounter::clone(predecessor(&position.sentinel, &position.node));
            position.node = previous;
        }
    }

    /// Returns the element [`move_next`](Self::move_next) would land on.
    #[must_use]
    pub fn peek_next(&self) -> Option<&T> {
        self.position
            .as_ref()
            .and_then(|position| successor(&position.sentinel, &position.node).value())
    }

    /// Returns the element [`move_prev`](Self::move_prev) would land on.
    #[must_use]
    pub fn peek_prev(&self) -> Option<&T> {
        self.position
            .as_ref()
            .and_then(|position| predecessor(&position.sentinel, &position.node).value())
    }
}

impl<T> Clone for Cursor<T> {
    fn clone(&self) -> Self {
        Self {
            position: self.position.as_ref().map(|position| Position {
                sentinel: ReferenceCounter::clone(&position.sentinel),
                node: ReferenceCounter::clone(&position.node),
            }),
        }
    }
}

/// Two cursors are equal when they point at the same node of the same
/// snapshot.
impl<T> PartialEq for Cursor<T> {
    fn eq(&self, other: &Self) -> bool {
        match (&self.position, &other.position) {
            (None, None) => true,
            (Some(left), Some(right)) => {
                ReferenceCounter::ptr_eq(&left.node, &right.node)
                    && ReferenceCounter::ptr_eq(&left.sentinel, &right.sentinel)
            }
            _ => false,
        }
    }
}

impl<T> Eq for Cursor<T> {}

impl<T: fmt::Debug> fmt::Debug for Cursor<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(value) => formatter.debug_tuple("Cursor").field(value).finish(),
            None => formatter.write_str("Cursor(end)"),
        }
    }
}

// =============================================================================
// Reverse Cursor
// =============================================================================

/// A cursor walking a snapshot in descending order.
///
/// Like `std::reverse_iterator`, a reverse cursor wraps a base [`Cursor`] and
/// reads the element just before the base position: the reverse cursor over
/// [`end`](super::PersistentSet::end) reads the maximum, and the one over
/// [`begin`](super::PersistentSet::begin) is the reverse end.
///
/// # Examples
///
/// ```rust
/// use persistent_set::persistent::PersistentSet;
///
/// let set: PersistentSet<i32> = [1, 2, 3].into_iter().collect();
///
/// let mut cursor = set.rbegin();
/// let mut descending = Vec::new();
/// while cursor != set.rend() {
///     descending.push(*cursor.get().unwrap());
///     cursor.move_next();
/// }
/// assert_eq!(descending, vec![3, 2, 1]);
/// ```
pub struct ReverseCursor<T> {
    base: Cursor<T>,
}

impl<T> ReverseCursor<T> {
    /// Wraps a base cursor.
    #[must_use]
    pub const fn new(base: Cursor<T>) -> Self {
        Self { base }
    }

    /// Returns the wrapped base cursor, one position after the element this
    /// reverse cursor reads.
    #[must_use]
    pub const fn base(&self) -> &Cursor<T> {
        &self.base
    }

    /// Unwraps the base cursor.
    #[must_use]
    pub fn into_base(self) -> Cursor<T> {
        self.base
    }
}

impl<T: Ord> ReverseCursor<T> {
    /// Returns the element at this position, or `None` at the reverse end.
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.base.peek_prev()
    }

    /// Returns `true` if this cursor is at the reverse end.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.get().is_none()
    }

    /// Moves to the next element in descending order.
    pub fn move_next(&mut self) {
        self.base.move_prev();
    }

    /// Moves to the previous element in descending order.
    pub fn move_prev(&mut self) {
        self.base.move_next();
    }
}

impl<T> Clone for ReverseCursor<T> {
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
        }
    }
}

impl<T> PartialEq for ReverseCursor<T> {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base
    }
}

impl<T> Eq for ReverseCursor<T> {}

impl<T: Ord + fmt::Debug> fmt::Debug for ReverseCursor<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(value) => formatter.debug_tuple("ReverseCursor").field(value).finish(),
            None => formatter.write_str("ReverseCursor(end)"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::super::PersistentSet;
    use super::*;
    use rstest::rstest;

    fn sample() -> PersistentSet<i32> {
        [5, 3, 8, 1, 4, 7, 9].into_iter().collect()
    }

    #[rstest]
    fn test_detached_cursor_is_end() {
        let cursor: Cursor<i32> = Cursor::detached();
        assert!(cursor.is_end());
        assert_eq!(cursor.get(), None);
        assert_eq!(cursor, Cursor::detached());
    }

    #[rstest]
    fn test_moving_a_detached_cursor_stays_at_end() {
        let mut cursor: Cursor<i32> = Cursor::detached();
        cursor.move_next();
        assert!(cursor.is_end());
        cursor.move_prev();
        assert!(cursor.is_end());
    }

    #[rstest]
    fn test_forward_walk() {
        let set = sample();
        let mut cursor = set.begin();
        let mut values = Vec::new();
        while !cursor.is_end() {
            values.push(*cursor.get().unwrap());
            cursor.move_next();
        }
        assert_eq!(values, vec![1, 3, 4, 5, 7, 8, 9]);
    }

    #[rstest]
    fn test_backward_walk_from_end() {
        let set = sample();
        let mut cursor = set.end();
        let mut values = Vec::new();
        cursor.move_prev();
        while !cursor.is_end() {
            values.push(*cursor.get().unwrap());
            cursor.move_prev();
        }
        assert_eq!(values, vec![9, 8, 7, 5, 4, 3, 1]);
    }

    #[rstest]
    fn test_end_wraps_to_begin() {
        let set = sample();
        let mut cursor = set.end();
        cursor.move_next();
        assert_eq!(cursor, set.begin());
    }

    #[rstest]
    fn test_begin_moves_back_to_end() {
        let set = sample();
        let mut cursor = set.begin();
        cursor.move_prev();
        assert_eq!(cursor, set.end());
    }

    #[rstest]
    fn test_peek_does_not_move() {
        let set = sample();
        let cursor = set.find(&5);
        assert_eq!(cursor.peek_next(), Some(&7));
        assert_eq!(cursor.peek_prev(), Some(&4));
        assert_eq!(cursor.get(), Some(&5));
    }

    #[rstest]
    fn test_cursors_from_different_versions_differ() {
        let mut set = sample();
        let before = set.end();
        set.insert(6);
        assert_ne!(before, set.end());
    }

    #[rstest]
    fn test_cursor_outlives_its_set() {
        let cursor = {
            let set = sample();
            set.find(&4)
        };
        assert_eq!(cursor.get(), Some(&4));
        assert_eq!(cursor.peek_next(), Some(&5));
    }

    #[rstest]
    fn test_cursor_debug() {
        let set = sample();
        assert_eq!(format!("{:?}", set.find(&3)), "Cursor(3)");
        assert_eq!(format!("{:?}", set.end()), "Cursor(end)");
    }

    #[rstest]
    fn test_reverse_cursor_mirrors_forward_walk() {
        let set = sample();
        let mut cursor = set.rbegin();
        let mut values = Vec::new();
        while !cursor.is_end() {
            values.push(*cursor.get().unwrap());
            cursor.move_next();
        }
        assert_eq!(values, vec![9, 8, 7, 5, 4, 3, 1]);
        assert_eq!(cursor, set.rend());
    }

    #[rstest]
    fn test_reverse_cursor_base() {
        let set = sample();
        let reverse = set.rbegin();
        assert_eq!(reverse.base(), &set.end());
        assert_eq!(reverse.get(), Some(&9));
        assert_eq!(reverse.into_base(), set.end());
    }

    #[rstest]
    fn test_reverse_cursor_move_prev() {
        let set = sample();
        let mut cursor = set.rend();
        cursor.move_prev();
        assert_eq!(cursor.get(), Some(&1));
        assert_eq!(format!("{cursor:?}"), "ReverseCursor(1)");
    }
}
