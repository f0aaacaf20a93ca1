//! Presentation shell state.
//!
//! # Responsibility
//! - Own selection, search-term, view-mode, and pending-delete state.
//! - Compose the note store, editor session, and theme switch into the
//!   surface a frontend renders.
//!
//! # Invariants
//! - The selected id always refers to an existing note (cleared on
//!   delete).
//! - Switching the selected note replaces the editor session; pending
//!   autosave for the previous note is discarded, not flushed.
//! - Delete goes through an explicit request/confirm/cancel step.

pub mod debounce;
pub mod editor;

use crate::model::note::{Note, NoteId};
use crate::search::{snippet, HighlightSpan};
use crate::store::kv::KvStore;
use crate::store::notes::NoteStore;
use crate::theme::{Theme, ThemeSwitch};
use editor::EditorSession;
use std::rc::Rc;
use std::time::Instant;

/// Which surface the frontend is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    List,
    Editor,
}

/// One row of the note list projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub id: NoteId,
    pub title: String,
    pub snippet: String,
    pub updated_at: i64,
    pub selected: bool,
    pub title_spans: Vec<HighlightSpan>,
    pub snippet_spans: Vec<HighlightSpan>,
}

/// The composed application state a frontend drives.
pub struct Workspace {
    notes: NoteStore,
    theme: ThemeSwitch,
    selected: Option<NoteId>,
    search_term: String,
    view: ViewMode,
    pending_delete: Option<NoteId>,
    editor: Option<EditorSession>,
}

impl Workspace {
    /// Builds the shell over a shared slot store.
    pub fn new(kv: Rc<KvStore>) -> Self {
        Self {
            notes: NoteStore::new(Rc::clone(&kv)),
            theme: ThemeSwitch::new(kv),
            selected: None,
            search_term: String::new(),
            view: ViewMode::default(),
            pending_delete: None,
            editor: None,
        }
    }

    pub fn notes(&self) -> &NoteStore {
        &self.notes
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn selected_id(&self) -> Option<NoteId> {
        self.selected
    }

    pub fn selected_note(&self) -> Option<Note> {
        self.selected.and_then(|id| self.notes.get(id))
    }

    pub fn editor(&self) -> Option<&EditorSession> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut EditorSession> {
        self.editor.as_mut()
    }

    // --- search ---

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Notes matching the active search term, in collection order.
    pub fn visible_notes(&self) -> Vec<Note> {
        self.notes.search(&self.search_term)
    }

    /// List projection with per-row highlight spans over title and snippet.
    pub fn list_rows(&self) -> Vec<ListRow> {
        self.visible_notes()
            .into_iter()
            .map(|note| {
                let snippet = snippet(&note.content);
                ListRow {
                    title_spans: crate::search::highlight_spans(&note.title, &self.search_term),
                    snippet_spans: crate::search::highlight_spans(&snippet, &self.search_term),
                    id: note.id,
                    title: note.title,
                    snippet,
                    updated_at: note.updated_at,
                    selected: self.selected == Some(note.id),
                }
            })
            .collect()
    }

    // --- lifecycle ---

    /// Creates a note, selects it, and opens the editor.
    pub fn create_note(&mut self) -> NoteId {
        let id = self.notes.create();
        self.select_note(id);
        id
    }

    /// Selects a note and opens a fresh editor session for it.
    ///
    /// Any pending autosave for the previously selected note is discarded
    /// with its session. Re-selecting the note already open keeps its
    /// session (buffers reset only when the note identity changes).
    /// Returns `false` (and changes nothing) on an unknown id.
    pub fn select_note(&mut self, id: NoteId) -> bool {
        let Some(note) = self.notes.get(id) else {
            return false;
        };
        let same_session = self
            .editor
            .as_ref()
            .is_some_and(|editor| editor.note_id() == id);
        if !same_session {
            self.editor = Some(EditorSession::open(&note));
        }
        self.selected = Some(id);
        self.view = ViewMode::Editor;
        true
    }

    /// Clears selection and closes the editor, discarding pending edits.
    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.editor = None;
        self.view = ViewMode::List;
    }

    /// Returns to the list view, discarding any pending edit.
    pub fn back_to_list(&mut self) {
        self.editor = None;
        self.view = ViewMode::List;
    }

    // --- deletion with confirmation ---

    /// Stages a note for deletion; the frontend shows the confirmation.
    ///
    /// Returns `false` on an unknown id.
    pub fn request_delete(&mut self, id: NoteId) -> bool {
        if self.notes.get(id).is_none() {
            return false;
        }
        self.pending_delete = Some(id);
        true
    }

    pub fn pending_delete(&self) -> Option<NoteId> {
        self.pending_delete
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Deletes the staged note.
    ///
    /// Clears selection and closes the editor when the staged note was
    /// selected. Returns whether a note was removed.
    pub fn confirm_delete(&mut self) -> bool {
        let Some(id) = self.pending_delete.take() else {
            return false;
        };
        let removed = self.notes.delete(id);
        if self.selected == Some(id) {
            self.clear_selection();
        }
        removed
    }

    // --- editing ---

    /// Types into the editor's title buffer.
    pub fn type_title(&mut self, text: impl Into<String>, now: Instant) {
        if let Some(editor) = self.editor.as_mut() {
            editor.set_title(text, now);
        }
    }

    /// Types into the editor's content buffer.
    pub fn type_content(&mut self, text: impl Into<String>, now: Instant) {
        if let Some(editor) = self.editor.as_mut() {
            editor.set_content(text, now);
        }
    }

    /// Drives the autosave debounce; returns whether a commit happened.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.editor.as_mut() {
            Some(editor) => editor.commit_due(&self.notes, now),
            None => false,
        }
    }

    // --- theme ---

    pub fn theme(&self) -> Theme {
        self.theme.current()
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme.toggle()
    }
}
