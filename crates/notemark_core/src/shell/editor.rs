//! Editor session with debounced autosave.
//!
//! # Responsibility
//! - Hold local title/content buffers for the note being edited.
//! - Coalesce rapid keystrokes into one store update per quiet period.
//! - Delegate preview rendering.
//!
//! # Invariants
//! - Buffers are seeded from the note when the session opens; a session
//!   never outlives the identity of the note it was opened for.
//! - A commit happens only when the buffers differ from the stored note.
//! - Dropping a session (switching notes, closing the editor) discards
//!   any pending uncommitted edit.

use crate::model::note::{Note, NoteId, NotePatch};
use crate::render::preview_html;
use crate::shell::debounce::Debouncer;
use crate::store::notes::NoteStore;
use log::debug;
use std::time::Instant;

/// Local editing state for one note.
pub struct EditorSession {
    note_id: NoteId,
    title: String,
    content: String,
    saved_title: String,
    saved_content: String,
    autosave: Debouncer,
}

impl EditorSession {
    /// Opens a session seeded from the note's stored state.
    pub fn open(note: &Note) -> Self {
        Self {
            note_id: note.id,
            title: note.title.clone(),
            content: note.content.clone(),
            saved_title: note.title.clone(),
            saved_content: note.content.clone(),
            autosave: Debouncer::default(),
        }
    }

    pub fn note_id(&self) -> NoteId {
        self.note_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replaces the title buffer and re-arms the autosave deadline.
    pub fn set_title(&mut self, text: impl Into<String>, now: Instant) {
        let text = text.into();
        if text == self.title {
            return;
        }
        self.title = text;
        self.autosave.poke(now);
    }

    /// Replaces the content buffer and re-arms the autosave deadline.
    pub fn set_content(&mut self, text: impl Into<String>, now: Instant) {
        let text = text.into();
        if text == self.content {
            return;
        }
        self.content = text;
        self.autosave.poke(now);
    }

    /// Returns whether the buffers differ from the last stored state.
    pub fn is_dirty(&self) -> bool {
        self.title != self.saved_title || self.content != self.saved_content
    }

    /// Returns whether an autosave deadline is pending.
    pub fn autosave_pending(&self) -> bool {
        self.autosave.is_armed()
    }

    /// Commits buffered edits when the quiet period has elapsed.
    ///
    /// Returns `true` when a store update was performed. After a commit
    /// the buffers resync to the stored state, picking up write-time
    /// normalization (e.g. the blank-title placeholder).
    pub fn commit_due(&mut self, store: &NoteStore, now: Instant) -> bool {
        if !self.autosave.fire_due(now) {
            return false;
        }
        if !self.is_dirty() {
            return false;
        }

        store.update(
            self.note_id,
            NotePatch::full(self.title.clone(), self.content.clone()),
        );
        debug!(
            "event=autosave_commit module=editor status=ok id={}",
            self.note_id
        );

        if let Some(stored) = store.get(self.note_id) {
            self.title = stored.title.clone();
            self.content = stored.content.clone();
            self.saved_title = stored.title;
            self.saved_content = stored.content;
        }
        true
    }

    /// Renders the preview for the current content buffer.
    pub fn preview_html(&self) -> String {
        preview_html(&self.content)
    }
}
