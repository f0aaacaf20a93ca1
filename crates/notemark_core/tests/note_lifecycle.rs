use notemark_core::store::kv::KvStore;
use notemark_core::store::notes::NoteStore;
use notemark_core::{NotePatch, DEFAULT_TITLE};
use std::rc::Rc;
use uuid::Uuid;

fn fresh_store() -> NoteStore {
    let kv = Rc::new(KvStore::open_in_memory().unwrap());
    NoteStore::new(kv)
}

#[test]
fn create_prepends_a_default_note() {
    let store = fresh_store();
    let first = store.create();
    let second = store.create();

    let notes = store.notes();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].id, second);
    assert_eq!(notes[1].id, first);
    assert_eq!(notes[0].title, DEFAULT_TITLE);
    assert!(notes[0].content.is_empty());
    assert_eq!(notes[0].created_at, notes[0].updated_at);
}

#[test]
fn ids_are_unique_across_the_collection() {
    let store = fresh_store();
    for _ in 0..20 {
        store.create();
    }
    let notes = store.notes();
    let mut ids: Vec<_> = notes.iter().map(|note| note.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), notes.len());
}

#[test]
fn update_refreshes_updated_at_strictly() {
    let store = fresh_store();
    let id = store.create();
    let before = store.get(id).expect("created note should exist");

    store.update(id, NotePatch::content("first edit"));
    let after = store.get(id).expect("note should survive update");
    assert!(after.updated_at > before.updated_at);
    assert!(after.updated_at >= after.created_at);
    assert_eq!(after.content, "first edit");

    store.update(id, NotePatch::content("second edit"));
    let later = store.get(id).expect("note should survive update");
    assert!(later.updated_at > after.updated_at);
}

#[test]
fn update_keeps_collection_order() {
    let store = fresh_store();
    let older = store.create();
    let newer = store.create();

    store.update(older, NotePatch::content("edited"));
    let notes = store.notes();
    assert_eq!(notes[0].id, newer);
    assert_eq!(notes[1].id, older);
}

#[test]
fn blank_title_is_replaced_at_write_time() {
    let store = fresh_store();
    let id = store.create();

    store.update(id, NotePatch::title("  My Day  "));
    assert_eq!(store.get(id).unwrap().title, "My Day");

    store.update(id, NotePatch::title("   "));
    assert_eq!(store.get(id).unwrap().title, DEFAULT_TITLE);
}

#[test]
fn update_on_absent_id_is_a_silent_no_op() {
    let store = fresh_store();
    let id = store.create();
    let snapshot = store.notes();

    store.update(Uuid::new_v4(), NotePatch::full("ghost", "ghost"));
    assert_eq!(store.notes(), snapshot);
    assert_eq!(store.get(id).unwrap().title, DEFAULT_TITLE);
}

#[test]
fn delete_removes_exactly_the_matching_note() {
    let store = fresh_store();
    let keep = store.create();
    let gone = store.create();

    assert!(store.delete(gone));
    assert_eq!(store.len(), 1);
    assert!(store.get(gone).is_none());
    assert!(store.get(keep).is_some());

    assert!(!store.delete(gone));
    assert_eq!(store.len(), 1);
}

#[test]
fn delete_on_absent_id_leaves_collection_unchanged() {
    let store = fresh_store();
    store.create();
    let snapshot = store.notes();

    assert!(!store.delete(Uuid::new_v4()));
    assert_eq!(store.notes(), snapshot);
}
