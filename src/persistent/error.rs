//! Error types for the persistent set.

use std::fmt;

/// Represents an error when a cursor cannot be erased from a set.
///
/// [`PersistentSet::erase`](super::PersistentSet::erase) removes the element
/// a cursor points at. The cursor must point at an element of the set's live
/// version: a node that is physically part of the current tree, not merely
/// a node holding an equal value in some other version.
///
/// # Examples
///
/// ```rust
/// use persistent_set::persistent::{EraseError, PersistentSet};
///
/// let mut set: PersistentSet<i32> = [1, 2].into_iter().collect();
/// let end = set.end();
/// assert_eq!(set.erase(&end), Err(EraseError::EndCursor));
/// assert_eq!(
///     format!("{}", EraseError::EndCursor),
///     "PersistentSet::erase: cursor is at the end position"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraseError {
    /// The cursor is at the end position and points at no element.
    EndCursor,
    /// The cursor's element is not part of the set's live version.
    ForeignCursor,
}

impl fmt::Display for EraseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndCursor => write!(
                formatter,
                "PersistentSet::erase: cursor is at the end position"
            ),
            Self::ForeignCursor => write!(
                formatter,
                "PersistentSet::erase: cursor does not belong to the live version"
            ),
        }
    }
}

impl std::error::Error for EraseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_erase_error_display_foreign_cursor() {
        assert_eq!(
            format!("{}", EraseError::ForeignCursor),
            "PersistentSet::erase: cursor does not belong to the live version"
        );
    }

    #[test]
    fn test_erase_error_is_std_error() {
        let error: Box<dyn std::error::Error> = Box::new(EraseError::EndCursor);
        assert_eq!(
            error.to_string(),
            "PersistentSet::erase: cursor is at the end position"
        );
    }
}
