//! Note domain model.
//!
//! # Responsibility
//! - Define the sole persistent record of the system.
//! - Own title normalization and timestamp refresh rules.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - `title` is never stored blank; blank input becomes [`DEFAULT_TITLE`].
//! - `updated_at >= created_at`, and every applied edit strictly increases
//!   `updated_at` even when the wall clock has not advanced a millisecond.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier for a note.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type NoteId = Uuid;

/// Title stored when the user leaves the title blank.
pub const DEFAULT_TITLE: &str = "Untitled Note";

/// The persisted note record.
///
/// Serialized field names are camelCase to match the persisted slot
/// representation the collection has always used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Stable global ID, assigned at creation.
    pub id: NoteId,
    /// Display title. Never blank in stored form.
    pub title: String,
    /// Markdown source text, unbounded.
    pub content: String,
    /// Creation time in epoch milliseconds. Immutable.
    pub created_at: i64,
    /// Last mutation time in epoch milliseconds.
    pub updated_at: i64,
}

/// Partial title/content edit applied through the note store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl NotePatch {
    /// Patch replacing only the title.
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            content: None,
        }
    }

    /// Patch replacing only the content.
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            title: None,
            content: Some(content.into()),
        }
    }

    /// Patch replacing both fields.
    pub fn full(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            content: Some(content.into()),
        }
    }

    /// Returns whether the patch carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

impl Note {
    /// Creates a fresh note: default title, empty content, both timestamps
    /// set to `now`.
    pub fn new(now: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: DEFAULT_TITLE.to_string(),
            content: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a title/content patch and refreshes `updated_at`.
    ///
    /// The new `updated_at` is `now`, clamped to at least one millisecond
    /// past the previous value so repeated edits within the same clock tick
    /// still observe a strict increase.
    pub fn apply(&mut self, patch: &NotePatch, now: i64) {
        if let Some(title) = patch.title.as_deref() {
            self.title = normalize_title(title);
        }
        if let Some(content) = patch.content.as_deref() {
            self.content = content.to_string();
        }
        self.updated_at = now.max(self.updated_at + 1);
    }
}

/// Replaces a blank or whitespace-only title with [`DEFAULT_TITLE`].
pub fn normalize_title(title: &str) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{normalize_title, Note, NotePatch, DEFAULT_TITLE};

    #[test]
    fn new_note_has_default_title_and_equal_timestamps() {
        let note = Note::new(1_000);
        assert_eq!(note.title, DEFAULT_TITLE);
        assert!(note.content.is_empty());
        assert_eq!(note.created_at, note.updated_at);
    }

    #[test]
    fn apply_bumps_updated_at_even_without_clock_progress() {
        let mut note = Note::new(1_000);
        note.apply(&NotePatch::content("a"), 1_000);
        assert_eq!(note.updated_at, 1_001);
        note.apply(&NotePatch::content("b"), 1_000);
        assert_eq!(note.updated_at, 1_002);
        assert!(note.updated_at >= note.created_at);
    }

    #[test]
    fn blank_title_falls_back_to_placeholder() {
        assert_eq!(normalize_title("   "), DEFAULT_TITLE);
        assert_eq!(normalize_title(" Plans "), "Plans");
    }
}
