//! # Editor Form
//!
//! Client-side validation for the note editor. Runs before submit so an
//! invalid form never reaches the network; the server stays the
//! authoritative check.

use std::fmt;

use crate::api::{Note, NoteId, NoteInput};

pub const TITLE_MAX_CHARS: usize = 120;
pub const CONTENT_MAX_CHARS: usize = 5000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    TitleRequired,
    TitleTooLong { max: usize },
    ContentTooLong { max: usize },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::TitleRequired => f.write_str("Title is required."),
            ValidationError::TitleTooLong { max } => {
                write!(f, "Title must be at most {max} characters.")
            }
            ValidationError::ContentTooLong { max } => {
                write!(f, "Content must be at most {max} characters.")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Checks title and content against the editor's limits, in form order.
pub fn validate(title: &str, content: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::TitleRequired);
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(ValidationError::TitleTooLong {
            max: TITLE_MAX_CHARS,
        });
    }
    if content.chars().count() > CONTENT_MAX_CHARS {
        return Err(ValidationError::ContentTooLong {
            max: CONTENT_MAX_CHARS,
        });
    }
    Ok(())
}

/// Form contents as typed by the user.
///
/// `editing` is the id of the note being edited; `None` means the form
/// creates a new note on submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub editing: Option<NoteId>,
    pub title: String,
    pub content: String,
}

impl NoteDraft {
    /// Empty form for a new note.
    pub fn blank() -> Self {
        Self::default()
    }

    /// Form pre-filled from a loaded note.
    pub fn from_note(note: &Note) -> Self {
        Self {
            editing: Some(note.id.clone()),
            title: note.title.clone(),
            content: note.content.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate(&self.title, &self.content)
    }

    /// Request body for submit: trimmed title, content as typed.
    pub fn to_input(&self) -> NoteInput {
        NoteInput::new(self.title.trim()).with_content(self.content.clone())
    }
}
