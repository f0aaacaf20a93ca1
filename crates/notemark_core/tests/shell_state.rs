use notemark_core::store::kv::KvStore;
use notemark_core::{ViewMode, Workspace};
use std::rc::Rc;
use std::time::Instant;
use uuid::Uuid;

fn fresh_workspace() -> Workspace {
    Workspace::new(Rc::new(KvStore::open_in_memory().unwrap()))
}

#[test]
fn create_selects_the_note_and_opens_the_editor() {
    let mut shell = fresh_workspace();
    assert_eq!(shell.view(), ViewMode::List);

    let id = shell.create_note();
    assert_eq!(shell.selected_id(), Some(id));
    assert_eq!(shell.view(), ViewMode::Editor);
    assert_eq!(shell.editor().unwrap().note_id(), id);
}

#[test]
fn selecting_an_unknown_id_changes_nothing() {
    let mut shell = fresh_workspace();
    let id = shell.create_note();

    assert!(!shell.select_note(Uuid::new_v4()));
    assert_eq!(shell.selected_id(), Some(id));
}

#[test]
fn deleting_the_selected_note_clears_selection() {
    let mut shell = fresh_workspace();
    let id = shell.create_note();

    assert!(shell.request_delete(id));
    assert_eq!(shell.pending_delete(), Some(id));
    assert!(shell.confirm_delete());

    assert_eq!(shell.selected_id(), None);
    assert!(shell.editor().is_none());
    assert_eq!(shell.view(), ViewMode::List);
    assert!(shell.notes().is_empty());
}

#[test]
fn deleting_an_unselected_note_keeps_the_selection() {
    let mut shell = fresh_workspace();
    let other = shell.create_note();
    let selected = shell.create_note();

    assert!(shell.request_delete(other));
    assert!(shell.confirm_delete());

    assert_eq!(shell.selected_id(), Some(selected));
    assert_eq!(shell.notes().len(), 1);
}

#[test]
fn cancelled_delete_removes_nothing() {
    let mut shell = fresh_workspace();
    let id = shell.create_note();

    assert!(shell.request_delete(id));
    shell.cancel_delete();
    assert_eq!(shell.pending_delete(), None);
    assert!(!shell.confirm_delete());
    assert_eq!(shell.notes().len(), 1);
}

#[test]
fn request_delete_rejects_unknown_ids() {
    let mut shell = fresh_workspace();
    shell.create_note();
    assert!(!shell.request_delete(Uuid::new_v4()));
    assert_eq!(shell.pending_delete(), None);
}

#[test]
fn list_rows_follow_the_search_term() {
    let mut shell = fresh_workspace();
    let start = Instant::now();

    let groceries = shell.create_note();
    shell.type_title("Groceries", start);
    shell.type_content("Buy milk", start);
    assert!(shell.tick(start + notemark_core::AUTOSAVE_QUIET_PERIOD));

    shell.create_note();
    shell.set_search_term("groc");

    let rows = shell.list_rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, groceries);
    assert!(rows[0].title_spans.iter().any(|span| span.is_match));

    shell.set_search_term("");
    assert_eq!(shell.list_rows().len(), 2);
}

#[test]
fn list_row_snippets_highlight_content_matches() {
    let mut shell = fresh_workspace();
    let start = Instant::now();

    shell.create_note();
    shell.type_content("Buy milk and eggs", start);
    assert!(shell.tick(start + notemark_core::AUTOSAVE_QUIET_PERIOD));

    shell.set_search_term("milk");
    let rows = shell.list_rows();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].snippet_spans.iter().any(|span| span.is_match));
    assert!(rows[0].snippet.contains("Buy milk"));
}

#[test]
fn selected_row_is_flagged_in_the_projection() {
    let mut shell = fresh_workspace();
    let first = shell.create_note();
    shell.create_note();

    assert!(shell.select_note(first));
    let rows = shell.list_rows();
    let selected: Vec<_> = rows.iter().filter(|row| row.selected).collect();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].id, first);
}
