//! Tree cells shared between versions of a [`PersistentSet`](super::PersistentSet).
//!
//! A node is never modified once built. The only node without a value is the
//! sentinel: it anchors one version of the set (its left child is the real
//! root) and doubles as the end position of every cursor over that version.
//!
//! Nodes carry no parent link because a node reachable from many versions has
//! a different parent in each of them. [`successor`] and [`predecessor`]
//! therefore re-descend from the sentinel of the snapshot being walked.

use super::ReferenceCounter;
use std::borrow::Borrow;
use std::cmp::Ordering;

/// A shared, possibly absent, child slot.
pub(crate) type Link<T> = Option<ReferenceCounter<Node<T>>>;

/// Which child slot a path step went through.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Direction {
    Left,
    Right,
}

/// Payload of a node.
#[derive(Debug)]
pub(crate) enum NodeKind<T> {
    /// The valueless anchor of a version.
    Sentinel,
    /// An element of the set.
    Value(T),
}

/// Internal node structure of the search tree.
pub(crate) struct Node<T> {
    pub(crate) left: Link<T>,
    pub(crate) right: Link<T>,
    kind: NodeKind<T>,
}

impl<T> Node<T> {
    /// Creates a sentinel whose left child is `root`.
    pub(crate) const fn sentinel(root: Link<T>) -> Self {
        Self {
            left: root,
            right: None,
            kind: NodeKind::Sentinel,
        }
    }

    /// Creates a value node with no children.
    pub(crate) const fn leaf(value: T) -> Self {
        Self::with_children(None, None, value)
    }

    /// Creates a value node over the given children.
    pub(crate) const fn with_children(left: Link<T>, right: Link<T>, value: T) -> Self {
        Self {
            left,
            right,
            kind: NodeKind::Value(value),
        }
    }

    /// Returns the stored value, or `None` for the sentinel.
    pub(crate) const fn value(&self) -> Option<&T> {
        match &self.kind {
            NodeKind::Sentinel => None,
            NodeKind::Value(value) => Some(value),
        }
    }

    pub(crate) const fn is_sentinel(&self) -> bool {
        matches!(self.kind, NodeKind::Sentinel)
    }

    /// Returns the child slot in `direction`.
    pub(crate) const fn child(&self, direction: Direction) -> Option<&ReferenceCounter<Self>> {
        match direction {
            Direction::Left => self.left.as_ref(),
            Direction::Right => self.right.as_ref(),
        }
    }

    /// Orders this node against a lookup key.
    ///
    /// The sentinel sorts after every value: the whole tree is its left
    /// subtree, and it is the position that follows the maximum.
    pub(crate) fn compare_key<Q>(&self, key: &Q) -> Ordering
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match &self.kind {
            NodeKind::Sentinel => Ordering::Greater,
            NodeKind::Value(value) => value.borrow().cmp(key),
        }
    }

    /// Orders this node against another node of the same snapshot.
    pub(crate) fn compare_node(&self, other: &Self) -> Ordering
    where
        T: Ord,
    {
        match &other.kind {
            NodeKind::Sentinel => {
                if self.is_sentinel() {
                    Ordering::Equal
                } else {
                    Ordering::Less
                }
            }
            NodeKind::Value(value) => self.compare_key(value),
        }
    }
}

impl<T: Clone> Node<T> {
    /// Copies this node's payload over new children.
    pub(crate) fn relink(&self, left: Link<T>, right: Link<T>) -> Self {
        Self {
            left,
            right,
            kind: match &self.kind {
                NodeKind::Sentinel => NodeKind::Sentinel,
                NodeKind::Value(value) => NodeKind::Value(value.clone()),
            },
        }
    }

    /// Copies this node with the child in `direction` replaced.
    ///
    /// The other child is shared with the original node. Never called on
    /// the sentinel; a new version gets a fresh sentinel instead.
    pub(crate) fn rebuild(&self, direction: Direction, child: Link<T>) -> Self {
        debug_assert!(!self.is_sentinel(), "the sentinel is never path-copied");
        match direction {
            Direction::Left => self.relink(child, self.right.clone()),
            Direction::Right => self.relink(self.left.clone(), child),
        }
    }
}

impl<T> Drop for Node<T> {
    // A degenerate tree is as deep as it is large; unlink uniquely owned
    // children iteratively so dropping it cannot exhaust the stack.
    fn drop(&mut self) {
        let mut pending: Vec<ReferenceCounter<Self>> =
            self.left.take().into_iter().chain(self.right.take()).collect();
        while let Some(node) = pending.pop() {
            if let Ok(mut node) = ReferenceCounter::try_unwrap(node) {
                pending.extend(node.left.take());
                pending.extend(node.right.take());
            }
        }
    }
}

/// Descends left from `node` as far as possible.
///
/// On a sentinel over an empty tree this is the sentinel itself.
pub(crate) fn minimum<T>(node: &ReferenceCounter<Node<T>>) -> &ReferenceCounter<Node<T>> {
    let mut current = node;
    while let Some(left) = &current.left {
        current = left;
    }
    current
}

/// Descends right from `node` as far as possible.
pub(crate) fn maximum<T>(node: &ReferenceCounter<Node<T>>) -> &ReferenceCounter<Node<T>> {
    let mut current = node;
    while let Some(right) = &current.right {
        current = right;
    }
    current
}

/// Returns the in-order successor of `node` within the snapshot anchored at
/// `sentinel`.
///
/// The successor of the maximum is the sentinel, and the successor of the
/// sentinel is the minimum (or the sentinel again when the tree is empty).
pub(crate) fn successor<'a, T: Ord>(
    sentinel: &'a ReferenceCounter<Node<T>>,
    node: &'a ReferenceCounter<Node<T>>,
) -> &'a ReferenceCounter<Node<T>> {
    if node.is_sentinel() {
        return minimum(sentinel);
    }
    if let Some(right) = &node.right {
        return minimum(right);
    }
    let mut result = sentinel;
    let mut current = sentinel.left.as_ref();
    while let Some(candidate) = current {
        match candidate.compare_node(node) {
            Ordering::Less => current = candidate.right.as_ref(),
            Ordering::Greater => {
                result = candidate;
                current = candidate.left.as_ref();
            }
            Ordering::Equal => break,
        }
    }
    result
}

/// Returns the in-order predecessor of `node` within the snapshot anchored at
/// `sentinel`.
///
/// The predecessor of the sentinel is the maximum, and the predecessor of the
/// minimum is the sentinel.
pub(crate) fn predecessor<'a, T: Ord>(
    sentinel: &'a ReferenceCounter<Node<T>>,
    node: &'a ReferenceCounter<Node<T>>,
) -> &'a ReferenceCounter<Node<T>> {
    if let Some(left) = &node.left {
        return maximum(left);
    }
    if node.is_sentinel() {
        return sentinel;
    }
    let mut result = sentinel;
    let mut current = sentinel.left.as_ref();
    while let Some(candidate) = current {
        match candidate.compare_node(node) {
            Ordering::Less => {
                result = candidate;
                current = candidate.right.as_ref();
            }
            Ordering::Greater => current = candidate.left.as_ref(),
            Ordering::Equal => break,
        }
    }
    result
}

/// Returns the node holding `key` below `sentinel`, if any.
pub(crate) fn search<'a, T, Q>(
    sentinel: &'a ReferenceCounter<Node<T>>,
    key: &Q,
) -> Option<&'a ReferenceCounter<Node<T>>>
where
    T: Borrow<Q>,
    Q: Ord + ?Sized,
{
    let mut current = sentinel.left.as_ref();
    while let Some(node) = current {
        match node.compare_key(key) {
            Ordering::Less => current = node.right.as_ref(),
            Ordering::Greater => current = node.left.as_ref(),
            Ordering::Equal => return Some(node),
        }
    }
    None
}

/// Returns the first node whose value is not below `key` (`inclusive`) or
/// strictly above it (`!inclusive`); the sentinel when there is none.
pub(crate) fn lower_bound<'a, T, Q>(
    sentinel: &'a ReferenceCounter<Node<T>>,
    key: &Q,
    inclusive: bool,
) -> &'a ReferenceCounter<Node<T>>
where
    T: Borrow<Q>,
    Q: Ord + ?Sized,
{
    let mut result = sentinel;
    let mut current = sentinel.left.as_ref();
    while let Some(node) = current {
        let ordering = node.compare_key(key);
        if ordering == Ordering::Greater || (inclusive && ordering == Ordering::Equal) {
            result = node;
            current = node.left.as_ref();
        } else {
            current = node.right.as_ref();
        }
    }
    result
}

/// Returns the last node whose value is not above `key` (`inclusive`) or
/// strictly below it (`!inclusive`); the sentinel when there is none.
pub(crate) fn upper_bound<'a, T, Q>(
    sentinel: &'a ReferenceCounter<Node<T>>,
    key: &Q,
    inclusive: bool,
) -> &'a ReferenceCounter<Node<T>>
where
    T: Borrow<Q>,
    Q: Ord + ?Sized,
{
    let mut result = sentinel;
    let mut current = sentinel.left.as_ref();
    while let Some(node) = current {
        let ordering = node.compare_key(key);
        if ordering == Ordering::Less || (inclusive && ordering == Ordering::Equal) {
            result = node;
            current = node.right.as_ref();
        } else {
            current = node.left.as_ref();
        }
    }
    result
}

/// Number of nodes on the longest root-to-leaf path below `link`.
pub(crate) fn height<T>(link: Option<&ReferenceCounter<Node<T>>>) -> usize {
    let mut deepest = 0;
    let mut pending: Vec<(&ReferenceCounter<Node<T>>, usize)> =
        link.into_iter().map(|node| (node, 1)).collect();
    while let Some((node, depth)) = pending.pop() {
        deepest = deepest.max(depth);
        pending.extend(node.left.iter().map(|left| (left, depth + 1)));
        pending.extend(node.right.iter().map(|right| (right, depth + 1)));
    }
    deepest
}

// =============================================================================
// Tests
// =============================================================================
