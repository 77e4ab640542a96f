//! # Notes State Manager
//!
//! Owns `NotesState` and is the only thing allowed to change it. Every
//! mutation goes to the remote API first and then re-fetches the whole list,
//! so server-computed fields (timestamps, defaults) are never guessed
//! locally.
//!
//! ```text
//! consumer ──► NotesManager::create/save/remove/select/refresh
//!                   │
//!                   ├──► NotesApi (HTTP)
//!                   │
//!                   └──► watch::Sender<NotesState> ──► subscribers
//! ```
//!
//! Errors travel two ways:
//! - `refresh` / `select` record the message in `error` and swallow it.
//! - `create` / `save` / `remove` record it and also return `Err`, so a form
//!   can keep its contents.
//!
//! Overlapping calls are not sequenced. Two `select`s race and whichever
//! response lands last wins; `loading` is one shared flag that the first
//! finishing operation clears.

use std::fmt;
use std::sync::Arc;

use log::{debug, error, info};
use tokio::sync::watch;

use crate::api::{ApiError, Note, NoteId, NoteInput, NotesApi};
use crate::core::editor::{NoteDraft, ValidationError};
use crate::core::state::NotesState;

const LOAD_NOTES_FAILED: &str = "Failed to load notes.";
const LOAD_NOTE_FAILED: &str = "Failed to load the selected note.";
const CREATE_FAILED: &str = "Failed to create note.";
const SAVE_FAILED: &str = "Failed to save note.";
const DELETE_FAILED: &str = "Failed to delete note.";

/// Why an editor submit did not go through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// Rejected locally; nothing was sent.
    Invalid(ValidationError),
    /// The API call failed; the message is also in `NotesState::error`.
    Api(ApiError),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Invalid(e) => write!(f, "{e}"),
            SubmitError::Api(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SubmitError {}

impl From<ApiError> for SubmitError {
    fn from(e: ApiError) -> Self {
        SubmitError::Api(e)
    }
}

pub struct NotesManager {
    api: Arc<dyn NotesApi>,
    state: watch::Sender<NotesState>,
}

/// Sets `loading` back to false when dropped, whether the operation
/// finished, failed, or its future was dropped mid-flight.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<NotesState>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.send_modify(|s| s.loading = false);
    }
}

impl NotesManager {
    pub fn new(api: Arc<dyn NotesApi>) -> Self {
        let (state, _) = watch::channel(NotesState::default());
        Self { api, state }
    }

    /// Builds a manager and performs the initial load.
    pub async fn start(api: Arc<dyn NotesApi>) -> Self {
        let manager = Self::new(api);
        manager.refresh().await;
        manager
    }

    /// Change notifications. Receivers only get read access.
    pub fn subscribe(&self) -> watch::Receiver<NotesState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> NotesState {
        self.state.borrow().clone()
    }

    pub fn selected_note(&self) -> Option<Note> {
        self.state.borrow().selected_note().cloned()
    }

    fn modify(&self, f: impl FnOnce(&mut NotesState)) {
        self.state.send_modify(f);
    }

    fn begin_loading(&self) -> LoadingGuard<'_> {
        self.modify(|s| {
            s.loading = true;
            s.error = None;
        });
        LoadingGuard { state: &self.state }
    }

    fn record_failure(&self, operation: &str, err: &ApiError, fallback: &str) {
        error!("{} failed: {:?}", operation, err);
        let message = banner_message(err, fallback);
        self.modify(|s| s.error = Some(message));
    }

    /// Re-fetches the full list. Failures land in `error` only.
    pub async fn refresh(&self) {
        let _loading = self.begin_loading();
        match self.api.list().await {
            Ok(notes) => {
                debug!("Refreshed {} notes", notes.len());
                self.modify(|s| s.replace_notes(notes));
            }
            Err(e) => self.record_failure("list", &e, LOAD_NOTES_FAILED),
        }
    }

    /// Selects `id` right away, then loads the authoritative copy.
    ///
    /// The selection is not rolled back when the load fails.
    pub async fn select(&self, id: NoteId) {
        self.modify(|s| s.selected_id = Some(id.clone()));
        match self.api.get(&id).await {
            Ok(note) => self.modify(|s| s.upsert(note)),
            Err(e) => self.record_failure("get", &e, LOAD_NOTE_FAILED),
        }
    }

    /// Opens an empty editor: no note selected, nothing fetched.
    pub fn clear_selection(&self) {
        self.modify(|s| s.selected_id = None);
    }

    pub async fn create(&self, input: &NoteInput) -> Result<Note, ApiError> {
        let _loading = self.begin_loading();
        let created = self
            .api
            .create(input)
            .await
            .inspect_err(|e| self.record_failure("create", e, CREATE_FAILED))?;
        info!("Created note {}", created.id);

        self.refresh().await;
        let id = created.id.clone();
        self.modify(|s| s.selected_id = Some(id));
        Ok(created)
    }

    pub async fn save(&self, id: &NoteId, input: &NoteInput) -> Result<Note, ApiError> {
        let _loading = self.begin_loading();
        let updated = self
            .api
            .update(id, input)
            .await
            .inspect_err(|e| self.record_failure("update", e, SAVE_FAILED))?;
        info!("Saved note {}", id);

        self.refresh().await;
        Ok(updated)
    }

    pub async fn remove(&self, id: &NoteId) -> Result<bool, ApiError> {
        let _loading = self.begin_loading();
        let removed = self
            .api
            .delete(id)
            .await
            .inspect_err(|e| self.record_failure("delete", e, DELETE_FAILED))?;
        info!("Deleted note {}", id);

        self.refresh().await;
        self.modify(|s| {
            if s.selected_id.as_ref() == Some(id) {
                s.selected_id = None;
            }
        });
        Ok(removed)
    }

    /// Dismisses the banner. The cause is left alone.
    pub fn clear_error(&self) {
        self.modify(|s| s.error = None);
    }

    /// Validates the editor form, then creates or saves.
    ///
    /// A draft that fails validation is rejected before any request and
    /// leaves the state untouched.
    pub async fn submit(&self, draft: &NoteDraft) -> Result<Note, SubmitError> {
        draft.validate().map_err(SubmitError::Invalid)?;
        let input = draft.to_input();
        let note = match &draft.editing {
            Some(id) => self.save(id, &input).await?,
            None => self.create(&input).await?,
        };
        Ok(note)
    }
}

/// The error's own message, or `fallback` when it has none.
fn banner_message(err: &ApiError, fallback: &str) -> String {
    let message = err.to_string();
    if message.is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
