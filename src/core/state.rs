//! # Notes State
//!
//! The client-side view of the notes collection. This module holds data
//! only; every change goes through `NotesManager` in manager.rs.
//!
//! ```text
//! NotesState
//! ├── notes: Vec<Note>             // server order, cached copies
//! ├── selected_id: Option<NoteId>  // note open in the editor
//! ├── loading: bool                // a mutation or refresh is in flight
//! └── error: Option<String>        // banner text, dismissible
//! ```

use crate::api::{Note, NoteId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotesState {
    pub notes: Vec<Note>,
    pub selected_id: Option<NoteId>,
    pub loading: bool,
    pub error: Option<String>,
}

impl NotesState {
    /// The cached note matching `selected_id`, if it has been loaded.
    pub fn selected_note(&self) -> Option<&Note> {
        let id = self.selected_id.as_ref()?;
        self.notes.iter().find(|n| &n.id == id)
    }

    pub fn contains(&self, id: &NoteId) -> bool {
        self.notes.iter().any(|n| &n.id == id)
    }

    /// Replaces the note with the same id in place, or appends it.
    pub fn upsert(&mut self, note: Note) {
        match self.notes.iter_mut().find(|n| n.id == note.id) {
            Some(existing) => *existing = note,
            None => self.notes.push(note),
        }
    }

    /// Takes a fresh list from the server and drops a selection that is no
    /// longer in it.
    pub fn replace_notes(&mut self, notes: Vec<Note>) {
        self.notes = notes;
        if let Some(id) = &self.selected_id
            && !self.contains(id)
        {
            self.selected_id = None;
        }
    }
}
