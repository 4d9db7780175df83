//! Persistent (multi-version) ordered set.
//!
//! This module provides [`PersistentSet`], an ordered set whose mutations
//! produce new versions while every earlier handle keeps its snapshot:
//!
//! - [`PersistentSet`]: the set handle; `clone` is O(1) and yields an
//!   independent snapshot
//! - [`Cursor`] / [`ReverseCursor`]: bidirectional positions inside one snapshot
//! - [`Iter`], [`Range`], [`IntoIter`]: lazy ascending/descending sequences
//! - [`EraseError`]: returned when `erase` is handed a cursor that does not
//!   belong to the live version
//!
//! # Structural Sharing
//!
//! `insert` and `erase` copy only the nodes on the path from the root to the
//! modified position. All other subtrees are shared with the previous version.
//!
//! # Examples
//!
//! ```rust
//! use persistent_set::persistent::PersistentSet;
//!
//! let mut set: PersistentSet<i32> = [5, 3, 8, 1, 4, 7, 9].into_iter().collect();
//! let before = set.clone();
//!
//! let (_, inserted) = set.insert(6);
//! assert!(inserted);
//!
//! assert_eq!(set.len(), 8);
//! assert_eq!(before.len(), 7); // Original snapshot unchanged
//! assert!(!before.contains(&6));
//!
//! let descending: Vec<i32> = before.iter().rev().copied().collect();
//! assert_eq!(descending, vec![9, 8, 7, 5, 4, 3, 1]);
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`,
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod cursor;
mod error;
mod iter;
mod node;
mod set;

pub use cursor::Cursor;
pub use cursor::ReverseCursor;
pub use error::EraseError;
pub use iter::IntoIter;
pub use iter::Iter;
pub use iter::Range;
pub use set::PersistentSet;

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(PersistentSet<i32>: Send, Sync);
#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(Cursor<String>: Send, Sync);

#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(PersistentSet<i32>: Send, Sync);
#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(Cursor<String>: Send, Sync);

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod reference_counter_tests {
    use super::ReferenceCounter;
    use rstest::rstest;

    #[rstest]
    fn test_reference_counter_strong_count() {
        let reference_counter: ReferenceCounter<i32> = ReferenceCounter::new(42);
        assert_eq!(ReferenceCounter::strong_count(&reference_counter), 1);
        let reference_counter_clone = reference_counter.clone();
        assert_eq!(ReferenceCounter::strong_count(&reference_counter), 2);
        drop(reference_counter_clone);
        assert_eq!(ReferenceCounter::strong_count(&reference_counter), 1);
    }
}
