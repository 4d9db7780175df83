//! Unit tests for PersistentSet.
//!
//! These tests exercise the public API: lookup, copy-on-write insert and
//! erase, cursors, lazy iteration, and the independence of versions.

#![cfg(feature = "persistent")]

use persistent_set::persistent::{Cursor, EraseError, PersistentSet};
use rstest::{fixture, rstest};

#[fixture]
fn seven() -> PersistentSet<i32> {
    let mut set = PersistentSet::new();
    for value in [5, 3, 8, 1, 4, 7, 9] {
        set.insert(value);
    }
    set
}

fn forward(set: &PersistentSet<i32>) -> Vec<i32> {
    set.iter().copied().collect()
}

fn backward(set: &PersistentSet<i32>) -> Vec<i32> {
    set.iter().rev().copied().collect()
}

// =============================================================================
// Basic Construction Tests
// =============================================================================

#[rstest]
fn test_new_creates_empty_set() {
    let set: PersistentSet<i32> = PersistentSet::new();
    assert!(set.is_empty());
    assert_eq!(set.len(), 0);
    assert_eq!(set.begin(), set.end());
}

#[rstest]
fn test_default_creates_empty_set() {
    let set: PersistentSet<String> = PersistentSet::default();
    assert!(set.is_empty());
}

// =============================================================================
// Concrete Scenarios
// =============================================================================

#[rstest]
fn test_insert_two_then_erase_one() {
    let mut set = PersistentSet::new();
    set.insert(1);
    set.insert(2);
    assert_eq!(set.len(), 2);
    assert_eq!(forward(&set), vec![1, 2]);

    let two = set.find(&2);
    set.erase(&two).unwrap();
    assert_eq!(set.len(), 1);
    assert_eq!(forward(&set), vec![1]);
    assert_eq!(set.find(&2), set.end());
}

#[rstest]
#[case([5, 3, 8, 1, 4, 7, 9])]
#[case([1, 3, 4, 5, 7, 8, 9])]
#[case([9, 8, 7, 5, 4, 3, 1])]
#[case([4, 9, 1, 7, 3, 8, 5])]
fn test_seven_keys_in_any_order(#[case] keys: [i32; 7]) {
    let set: PersistentSet<i32> = keys.into_iter().collect();
    assert_eq!(forward(&set), vec![1, 3, 4, 5, 7, 8, 9]);
    assert_eq!(backward(&set), vec![9, 8, 7, 5, 4, 3, 1]);
}

// =============================================================================
// Find Tests
// =============================================================================

#[rstest]
#[case(1)]
#[case(5)]
#[case(9)]
fn test_find_present(seven: PersistentSet<i32>, #[case] key: i32) {
    let cursor = seven.find(&key);
    assert_eq!(cursor.get(), Some(&key));
    assert!(!cursor.is_end());
}

#[rstest]
#[case(0)]
#[case(6)]
#[case(10)]
fn test_find_absent_returns_end(seven: PersistentSet<i32>, #[case] key: i32) {
    assert_eq!(seven.find(&key), seven.end());
    assert!(!seven.contains(&key));
}

#[rstest]
fn test_find_on_empty_set_returns_end() {
    let set: PersistentSet<i32> = PersistentSet::new();
    assert!(set.find(&1).is_end());
}

// =============================================================================
// Insert Tests
// =============================================================================

#[rstest]
fn test_insert_returns_cursor_to_new_element(mut seven: PersistentSet<i32>) {
    let (cursor, inserted) = seven.insert(6);
    assert!(inserted);
    assert_eq!(cursor.get(), Some(&6));
    assert_eq!(cursor, seven.find(&6));
    assert_eq!(seven.len(), 8);
}

#[rstest]
fn test_insert_duplicate_leaves_set_unchanged(mut seven: PersistentSet<i32>) {
    let before = seven.clone();
    let (cursor, inserted) = seven.insert(7);
    assert!(!inserted);
    assert_eq!(cursor.get(), Some(&7));
    assert_eq!(seven.len(), 7);
    assert_eq!(seven, before);
}

// =============================================================================
// Erase Tests
// =============================================================================

#[rstest]
fn test_erase_every_element_one_by_one(mut seven: PersistentSet<i32>) {
    let mut expected = vec![1, 3, 4, 5, 7, 8, 9];
    for key in [5, 1, 8, 4, 9, 3, 7] {
        let cursor = seven.find(&key);
        seven.erase(&cursor).unwrap();
        expected.retain(|value| *value != key);
        assert_eq!(forward(&seven), expected);
        assert_eq!(seven.len(), expected.len());
    }
    assert!(seven.is_empty());
}

#[rstest]
fn test_erase_begin_repeatedly(mut seven: PersistentSet<i32>) {
    let mut drained = Vec::new();
    while !seven.is_empty() {
        let first = seven.begin();
        drained.push(*first.get().unwrap());
        seven.erase(&first).unwrap();
    }
    assert_eq!(drained, vec![1, 3, 4, 5, 7, 8, 9]);
}

#[rstest]
fn test_erase_errors_leave_set_intact(mut seven: PersistentSet<i32>) {
    let end = seven.end();
    assert_eq!(seven.erase(&end), Err(EraseError::EndCursor));

    let other: PersistentSet<i32> = [5].into_iter().collect();
    assert_eq!(seven.erase(&other.find(&5)), Err(EraseError::ForeignCursor));

    assert_eq!(forward(&seven), vec![1, 3, 4, 5, 7, 8, 9]);
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[rstest]
fn test_copy_is_unaffected_by_insert(seven: PersistentSet<i32>) {
    let original = seven.clone();
    let mut modified = seven;
    modified.insert(6);

    assert_eq!(forward(&original), vec![1, 3, 4, 5, 7, 8, 9]);
    assert_eq!(original.len(), 7);
    assert!(original.find(&6).is_end());
    assert_eq!(forward(&modified), vec![1, 3, 4, 5, 6, 7, 8, 9]);
}

#[rstest]
fn test_copy_is_unaffected_by_erase(seven: PersistentSet<i32>) {
    let original = seven.clone();
    let mut modified = seven;
    let five = modified.find(&5);
    modified.erase(&five).unwrap();

    assert_eq!(original.len(), 7);
    assert_eq!(original.find(&5).get(), Some(&5));
    assert_eq!(forward(&modified), vec![1, 3, 4, 7, 8, 9]);
}

#[rstest]
fn test_later_mutation_of_original_does_not_affect_copy(mut seven: PersistentSet<i32>) {
    let copy = seven.clone();
    seven.insert(100);
    seven.remove(&1);

    assert_eq!(forward(&copy), vec![1, 3, 4, 5, 7, 8, 9]);
    assert_eq!(forward(&seven), vec![3, 4, 5, 7, 8, 9, 100]);
}

#[rstest]
fn test_many_versions_coexist() {
    let mut set = PersistentSet::new();
    let mut versions = Vec::new();
    for value in 0..20 {
        versions.push(set.clone());
        set.insert(value);
    }
    for (length, version) in versions.iter().enumerate() {
        assert_eq!(version.len(), length);
        assert_eq!(version.iter().copied().collect::<Vec<_>>(), (0..length as i32).collect::<Vec<_>>());
    }
}

#[rstest]
fn test_cursor_keeps_walking_its_snapshot(mut seven: PersistentSet<i32>) {
    let mut cursor = seven.find(&4);
    seven.insert(6);
    seven.remove(&5);

    cursor.move_next();
    assert_eq!(cursor.get(), Some(&5));
    cursor.move_next();
    assert_eq!(cursor.get(), Some(&7));
}

#[rstest]
fn test_iterator_over_snapshot_survives_clear(mut seven: PersistentSet<i32>) {
    let snapshot = seven.clone();
    let iter = snapshot.iter();
    seven.clear();
    assert_eq!(iter.copied().collect::<Vec<_>>(), vec![1, 3, 4, 5, 7, 8, 9]);
}

// =============================================================================
// Clear and Swap Tests
// =============================================================================

#[rstest]
fn test_clear_empty_set_is_noop() {
    let mut set: PersistentSet<i32> = PersistentSet::new();
    set.clear();
    assert!(set.is_empty());
    assert_eq!(set.iter().next(), None);
}

#[rstest]
fn test_clear_then_reuse(mut seven: PersistentSet<i32>) {
    seven.clear();
    assert!(seven.is_empty());
    assert_eq!(seven.iter().count(), 0);
    seven.insert(42);
    assert_eq!(forward(&seven), vec![42]);
}

#[rstest]
fn test_swap(mut seven: PersistentSet<i32>) {
    let mut other: PersistentSet<i32> = PersistentSet::new();
    seven.swap(&mut other);
    assert!(seven.is_empty());
    assert_eq!(other.len(), 7);
}

// =============================================================================
// Cursor Tests
// =============================================================================

#[rstest]
fn test_cursor_round_trip(seven: PersistentSet<i32>) {
    let mut cursor: Cursor<i32> = seven.begin();
    for _ in 0..7 {
        cursor.move_next();
    }
    assert_eq!(cursor, seven.end());
    for _ in 0..7 {
        cursor.move_prev();
    }
    assert_eq!(cursor, seven.begin());
}

#[rstest]
fn test_reverse_cursors(seven: PersistentSet<i32>) {
    let mut cursor = seven.rbegin();
    let mut values = Vec::new();
    while cursor != seven.rend() {
        values.push(*cursor.get().unwrap());
        cursor.move_next();
    }
    assert_eq!(values, backward(&seven));
}

#[rstest]
fn test_reverse_cursors_on_empty_set() {
    let set: PersistentSet<i32> = PersistentSet::new();
    assert_eq!(set.rbegin(), set.rend());
    assert_eq!(set.rbegin().get(), None);
}

// =============================================================================
// Iteration Tests
// =============================================================================

#[rstest]
fn test_for_loop_over_reference(seven: PersistentSet<i32>) {
    let mut total = 0;
    for value in &seven {
        total += value;
    }
    assert_eq!(total, 37);
}

#[rstest]
fn test_exact_size(seven: PersistentSet<i32>) {
    assert_eq!(seven.iter().len(), 7);
    assert_eq!(seven.clone().into_iter().len(), 7);
}

#[rstest]
fn test_range_queries(seven: PersistentSet<i32>) {
    assert_eq!(seven.range(2..6).copied().collect::<Vec<_>>(), vec![3, 4, 5]);
    assert_eq!(seven.range(..=3).copied().collect::<Vec<_>>(), vec![1, 3]);
    assert_eq!(seven.range(7..).rev().copied().collect::<Vec<_>>(), vec![9, 8, 7]);
}

#[rstest]
fn test_string_elements_with_borrowed_lookup() {
    let set: PersistentSet<String> = ["pear", "apple", "fig"].into_iter().map(String::from).collect();
    assert!(set.contains("fig"));
    assert_eq!(set.find("apple").get().map(String::as_str), Some("apple"));
    assert_eq!(set.iter().map(String::as_str).collect::<Vec<_>>(), vec!["apple", "fig", "pear"]);
}

#[rstest]
fn test_extend(mut seven: PersistentSet<i32>) {
    seven.extend([0, 5, 10]);
    assert_eq!(forward(&seven), vec![0, 1, 3, 4, 5, 7, 8, 9, 10]);
}

#[rstest]
fn test_sorted_insertion_degenerates_but_stays_correct() {
    let set: PersistentSet<i32> = (0..2_000).collect();
    assert_eq!(set.height(), 2_000);
    assert_eq!(set.iter().copied().collect::<Vec<_>>(), (0..2_000).collect::<Vec<_>>());
    assert_eq!(set.first(), Some(&0));
    assert_eq!(set.last(), Some(&1_999));
}
