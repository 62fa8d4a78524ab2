//! SparseSet generational handle tests.
//!
//! The visual arena relies on these guarantees: stale handles never alias
//! a newer visual, and freed slots are reused.

use livechart_core::alloc::sparse_set::{IndexSlot, SparseSet};

#[test]
fn test_push_and_get() {
    let mut set = SparseSet::new();

    let idx = set.push(42);
    let idx2 = set.push(100);

    assert_eq!(*set.get(idx), 42);
    assert_eq!(*set.get(idx2), 100);
}

#[test]
fn test_try_get_invalid_returns_none() {
    let set = SparseSet::<i32>::new();
    assert_eq!(set.try_get(IndexSlot::new(0, 999)), None);
}

#[test]
fn test_try_get_after_remove_returns_none() {
    let mut set = SparseSet::new();

    let idx = set.push(42);
    assert_eq!(set.remove(idx), 42);

    assert_eq!(set.try_get(idx), None);
    assert!(!set.contains(idx));
}

#[test]
fn test_try_remove_twice() {
    let mut set = SparseSet::new();

    let idx = set.push("visual");
    assert_eq!(set.try_remove(idx), Some("visual"));
    assert_eq!(set.try_remove(idx), None);
    assert!(set.is_empty());
}

#[test]
fn test_generation_increment() {
    let mut set = SparseSet::new();

    let idx1 = set.push(1);
    set.remove(idx1);

    let idx2 = set.push(2);
    assert_eq!(idx2.index(), idx1.index());
    assert_eq!(idx2.generation(), 1);

    assert_eq!(set.try_get(idx1), None);
    assert_eq!(*set.get(idx2), 2);
}

#[test]
#[should_panic(expected = "use after free")]
fn test_get_stale_handle_panics() {
    let mut set = SparseSet::new();
    let idx = set.push(1);
    set.remove(idx);
    set.push(2);
    let _ = set.get(idx);
}

#[test]
fn test_slot_reuse() {
    let mut set = SparseSet::new();

    let idx1 = set.push(1);
    let idx2 = set.push(2);
    let idx3 = set.push(3);
    assert_eq!((idx1.index(), idx2.index(), idx3.index()), (0, 1, 2));

    set.remove(idx2);

    let idx4 = set.push(4);
    assert_eq!(idx4.index(), 1);
    assert_eq!(idx4.generation(), 1);
}

#[test]
fn test_len_tracks_live_entries() {
    let mut set = SparseSet::with_capacity(16);
    assert_eq!(set.len(), 0);

    set.push(1);
    set.push(2);
    let idx = set.push(3);
    assert_eq!(set.len(), 3);

    set.remove(idx);
    assert_eq!(set.len(), 2);
}

#[test]
fn test_clear_invalidates_handles() {
    let mut set = SparseSet::new();

    let a = set.push(1);
    let b = set.push(2);
    set.clear();

    assert!(set.is_empty());
    assert_eq!(set.try_get(a), None);
    assert_eq!(set.try_get(b), None);

    let c = set.push(3);
    assert_eq!(c.generation(), 1);
}

#[test]
fn test_iter_mut_updates_in_place() {
    let mut set = SparseSet::new();
    let a = set.push(1);
    let b = set.push(2);

    for (_, value) in set.iter_mut() {
        *value *= 10;
    }

    assert_eq!(*set.get(a), 10);
    assert_eq!(*set.get(b), 20);
    assert_eq!(set.handles(), vec![a, b]);
}
