//! Plain-text views over a `NotesState` snapshot. Pure functions: they read
//! state and return strings, nothing else.

use crate::api::Note;
use crate::core::NotesState;
use crate::core::editor::{CONTENT_MAX_CHARS, TITLE_MAX_CHARS};

pub fn render_list(state: &NotesState) -> String {
    if state.notes.is_empty() {
        return "No notes yet. Create your first note.".to_string();
    }

    let mut out = String::from("Notes\n");
    for note in &state.notes {
        let marker = if state.selected_id.as_ref() == Some(&note.id) {
            '>'
        } else {
            ' '
        };
        out.push_str(&format!("{marker} {:>6}  {}\n", note.id.to_string(), note.title));
    }
    out
}

pub fn render_editor(note: &Note) -> String {
    format!(
        "Edit Note {}\nTitle: {} ({}/{})\n\n{}\n\n({}/{})",
        note.id,
        note.title,
        note.title.chars().count(),
        TITLE_MAX_CHARS,
        note.content,
        note.content.chars().count(),
        CONTENT_MAX_CHARS,
    )
}

pub fn render_empty_state() -> String {
    "Select a note to view or edit, or create a new one.".to_string()
}

pub fn render_error_banner(message: &str) -> String {
    format!("error: {message}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::NoteId;

    #[test]
    fn test_render_list_marks_selection() {
        let state = NotesState {
            notes: vec![Note::new(1, "first", ""), Note::new(2, "second", "")],
            selected_id: Some(NoteId::Int(2)),
            ..Default::default()
        };
        let out = render_list(&state);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "Notes");
        assert!(lines[1].starts_with(' ') && lines[1].ends_with("first"));
        assert!(lines[2].starts_with('>') && lines[2].ends_with("second"));
    }

    #[test]
    fn test_render_list_empty() {
        assert_eq!(
            render_list(&NotesState::default()),
            "No notes yet. Create your first note."
        );
    }

    #[test]
    fn test_render_editor_shows_counters() {
        let out = render_editor(&Note::new(3, "Hi", "abc"));
        assert!(out.starts_with("Edit Note 3"));
        assert!(out.contains("(2/120)"));
        assert!(out.ends_with("(3/5000)"));
    }
}
