//! # persistent-set
//!
//! A persistent (multi-version, in-memory) ordered set.
//!
//! ## Overview
//!
//! Every mutation of a [`PersistentSet`](persistent::PersistentSet) produces a
//! new version of the set. Handles copied before the mutation, and cursors or
//! iterators taken from them, keep observing the snapshot they came from:
//!
//! - **Path copying**: `insert` and `erase` rebuild only the nodes between the
//!   root and the modified position; every other subtree is shared.
//! - **No parent links**: a node may belong to many versions at once, so the
//!   cursor re-derives successors and predecessors by descending from the
//!   root of its snapshot.
//! - **Sentinel anchor**: each version hangs off a valueless sentinel node
//!   that also serves as the end position.
//!
//! The tree is deliberately unbalanced. Every operation runs in O(height).
//!
//! ## Feature Flags
//!
//! - `persistent`: The set itself (enabled by default)
//! - `arc`: Use `Arc` instead of `Rc`, making snapshots `Send + Sync`
//! - `rayon`: Parallel iteration over a snapshot (implies `arc`)
//! - `serde`: `Serialize`/`Deserialize` as an ascending sequence
//! - `tracing`: Trace-level events from the mutating operations
//! - `full`: `persistent`, `serde` and `tracing`
//!
//! ## Example
//!
//! ```rust
//! use persistent_set::prelude::*;
//!
//! let mut set = PersistentSet::new();
//! set.insert(2);
//! set.insert(1);
//!
//! let snapshot = set.clone();
//! let two = set.find(&2);
//! set.erase(&two).unwrap();
//!
//! assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![1]);
//! assert_eq!(snapshot.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

#[macro_use]
mod trace;

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use persistent_set::prelude::*;
/// ```
pub mod prelude {
    #[cfg(feature = "persistent")]
    pub use crate::persistent::*;
}

#[cfg(feature = "persistent")]
pub mod persistent;
