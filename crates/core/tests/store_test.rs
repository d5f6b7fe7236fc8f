//! Index stability and growth of the typed stores.

use reassemble_core::arena::{ChildList, STORE_GROWTH, Store};
use reassemble_core::{RecordId, RectId};

#[test]
fn ids_survive_reallocation() {
    let mut store: Store<RecordId, u64> = Store::new("test");
    let ids: Vec<_> = (0..(STORE_GROWTH as u64 * 3 + 5))
        .map(|v| store.push(v * 7).unwrap())
        .collect();
    for (i, id) in ids.iter().enumerate() {
        assert_eq!(id.0, i);
        assert_eq!(store[*id], i as u64 * 7);
    }
}

#[test]
fn truncate_keeps_leading_ids() {
    let mut store: Store<RectId, &str> = Store::new("test");
    let a = store.push("a").unwrap();
    store.push("b").unwrap();
    store.truncate(1);
    assert_eq!(store.len(), 1);
    assert_eq!(store[a], "a");
    assert_eq!(store.next_id(), RectId(1));
    assert_eq!(store.last_id(), Some(a));
}

#[test]
fn release_frees_storage() {
    let mut store: Store<RectId, u8> = Store::new("rects");
    store.push(1).unwrap();
    store.clear();
    assert!(store.is_empty());
    assert!(store.capacity() >= STORE_GROWTH);
    store.release();
    assert_eq!(store.capacity(), 0);
    assert_eq!(store.name(), "rects");
}

#[test]
fn child_list_keeps_order() {
    let mut list = ChildList::single(RecordId(3));
    for i in 4..12 {
        list.push(RecordId(i)).unwrap();
    }
    assert_eq!(list.len(), 9);
    assert_eq!(list.first(), Some(RecordId(3)));
    assert_eq!(list.last(), Some(RecordId(11)));
    let reversed: Vec<_> = list.iter().rev().take(2).collect();
    assert_eq!(reversed, vec![RecordId(11), RecordId(10)]);
}
