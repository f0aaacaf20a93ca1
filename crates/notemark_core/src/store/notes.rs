//! Note collection operations over the `"notes"` slot.
//!
//! # Responsibility
//! - Provide create/update/delete/search over the ordered note collection.
//! - Keep the collection shape (prepend on create, stable order on edit)
//!   in one place.
//!
//! # Invariants
//! - New notes are prepended; edits never reorder the collection.
//! - Operations on absent ids are silent no-ops.
//! - Stored titles are never blank (normalized at write time).

use crate::model::note::{now_ms, Note, NoteId, NotePatch};
use crate::search::query_matches;
use crate::store::kv::KvStore;
use log::debug;
use std::rc::Rc;

/// Slot holding the serialized note collection.
pub const NOTES_SLOT: &str = "notes";

/// The note collection, layered on the slot store.
///
/// Holds no note data of its own; every read is a fresh snapshot of the
/// slot and every write goes through it.
pub struct NoteStore {
    kv: Rc<KvStore>,
}

impl NoteStore {
    /// Creates the store over the shared slot store.
    pub fn new(kv: Rc<KvStore>) -> Self {
        Self { kv }
    }

    /// Returns the full collection in stored order (most recent first).
    pub fn notes(&self) -> Vec<Note> {
        self.kv.get_or(NOTES_SLOT, Vec::new())
    }

    /// Returns one note by id.
    pub fn get(&self, id: NoteId) -> Option<Note> {
        self.notes().into_iter().find(|note| note.id == id)
    }

    /// Number of notes in the collection.
    pub fn len(&self) -> usize {
        self.notes().len()
    }

    /// Returns whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.notes().is_empty()
    }

    /// Creates a fresh note and prepends it to the collection.
    ///
    /// Always succeeds; returns the new id.
    pub fn create(&self) -> NoteId {
        let note = Note::new(now_ms());
        let id = note.id;
        self.kv.update(NOTES_SLOT, Vec::new(), move |mut notes: Vec<Note>| {
            notes.insert(0, note);
            notes
        });
        debug!("event=note_create module=notes status=ok id={id}");
        id
    }

    /// Applies a title/content patch to the note matching `id`.
    ///
    /// Refreshes `updated_at`. Silent no-op when `id` is absent or the
    /// patch is empty.
    pub fn update(&self, id: NoteId, patch: NotePatch) {
        if patch.is_empty() {
            return;
        }
        let now = now_ms();
        self.kv.update(NOTES_SLOT, Vec::new(), move |mut notes: Vec<Note>| {
            if let Some(note) = notes.iter_mut().find(|note| note.id == id) {
                note.apply(&patch, now);
            }
            notes
        });
    }

    /// Removes the note matching `id`.
    ///
    /// Returns whether a note was removed; no-op on absent ids. Callers
    /// holding selection state clear it when the removed note was selected.
    pub fn delete(&self, id: NoteId) -> bool {
        let mut notes = self.notes();
        let before = notes.len();
        notes.retain(|note| note.id != id);
        if notes.len() == before {
            return false;
        }
        self.kv.set(NOTES_SLOT, &notes);
        debug!("event=note_delete module=notes status=ok id={id}");
        true
    }

    /// Returns the notes whose title or content contains `query`
    /// case-insensitively.
    ///
    /// A blank query returns the full collection in its current order.
    /// Each call is a fresh full scan over the snapshot.
    pub fn search(&self, query: &str) -> Vec<Note> {
        let notes = self.notes();
        if query.trim().is_empty() {
            return notes;
        }
        notes
            .into_iter()
            .filter(|note| query_matches(note, query))
            .collect()
    }
}
