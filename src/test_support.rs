//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::api::{ApiError, Note, NoteId, NoteInput, NotesApi};

pub fn not_found() -> ApiError {
    ApiError::RequestFailed {
        status: 404,
        message: "Not found".to_string(),
    }
}

/// In-memory notes server.
///
/// Records every call by operation name (`list`, `create`, `get`, `update`,
/// `delete`). Failures can be injected per operation, and a call can be held
/// open until the test releases it, which is how overlapping operations are
/// staged.
pub struct FakeApi {
    notes: Mutex<Vec<Note>>,
    next_id: AtomicI64,
    calls: Mutex<Vec<String>>,
    failures: Mutex<HashMap<&'static str, ApiError>>,
    holds: Mutex<HashMap<&'static str, VecDeque<Arc<Notify>>>>,
}

impl FakeApi {
    pub fn with_notes(notes: Vec<Note>) -> Self {
        let max_id = notes
            .iter()
            .filter_map(|n| match n.id {
                NoteId::Int(i) => Some(i),
                NoteId::Text(_) => None,
            })
            .max()
            .unwrap_or(0);
        Self {
            notes: Mutex::new(notes),
            next_id: AtomicI64::new(max_id + 1),
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
            holds: Mutex::new(HashMap::new()),
        }
    }

    /// The next `op` call fails with `err` without touching server data.
    pub fn fail_next(&self, op: &'static str, err: ApiError) {
        self.failures.lock().unwrap().insert(op, err);
    }

    /// The next `op` call computes its response, then waits until the
    /// returned handle is notified before resolving.
    pub fn hold_next(&self, op: &'static str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.holds
            .lock()
            .unwrap()
            .entry(op)
            .or_default()
            .push_back(gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, op: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == op).count()
    }

    pub fn server_notes(&self) -> Vec<Note> {
        self.notes.lock().unwrap().clone()
    }

    pub fn add_on_server(&self, note: Note) {
        self.notes.lock().unwrap().push(note);
    }

    pub fn remove_on_server(&self, id: &NoteId) {
        self.notes.lock().unwrap().retain(|n| &n.id != id);
    }

    pub fn set_title_on_server(&self, id: &NoteId, title: &str) {
        if let Some(note) = self.notes.lock().unwrap().iter_mut().find(|n| &n.id == id) {
            note.title = title.to_string();
        }
    }

    fn enter(&self, op: &'static str) -> Option<ApiError> {
        self.calls.lock().unwrap().push(op.to_string());
        self.failures.lock().unwrap().remove(op)
    }

    async fn finish<T>(&self, op: &'static str, result: Result<T, ApiError>) -> Result<T, ApiError> {
        let gate = self.holds.lock().unwrap().get_mut(op).and_then(VecDeque::pop_front);
        if let Some(gate) = gate {
            gate.notified().await;
        }
        result
    }
}

#[async_trait]
impl NotesApi for FakeApi {
    async fn list(&self) -> Result<Vec<Note>, ApiError> {
        let result = match self.enter("list") {
            Some(err) => Err(err),
            None => Ok(self.server_notes()),
        };
        self.finish("list", result).await
    }

    async fn create(&self, input: &NoteInput) -> Result<Note, ApiError> {
        let result = match self.enter("create") {
            Some(err) => Err(err),
            None => {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                let note = Note::new(id, &input.title, &input.content);
                self.notes.lock().unwrap().push(note.clone());
                Ok(note)
            }
        };
        self.finish("create", result).await
    }

    async fn get(&self, id: &NoteId) -> Result<Note, ApiError> {
        let result = match self.enter("get") {
            Some(err) => Err(err),
            None => self
                .server_notes()
                .into_iter()
                .find(|n| &n.id == id)
                .ok_or_else(not_found),
        };
        self.finish("get", result).await
    }

    async fn update(&self, id: &NoteId, input: &NoteInput) -> Result<Note, ApiError> {
        let result = match self.enter("update") {
            Some(err) => Err(err),
            None => {
                let mut notes = self.notes.lock().unwrap();
                match notes.iter_mut().find(|n| &n.id == id) {
                    Some(note) => {
                        note.title = input.title.clone();
                        note.content = input.content.clone();
                        Ok(note.clone())
                    }
                    None => Err(not_found()),
                }
            }
        };
        self.finish("update", result).await
    }

    async fn delete(&self, id: &NoteId) -> Result<bool, ApiError> {
        let result = match self.enter("delete") {
            Some(err) => Err(err),
            None => {
                let mut notes = self.notes.lock().unwrap();
                let before = notes.len();
                notes.retain(|n| &n.id != id);
                if notes.len() < before {
                    Ok(true)
                } else {
                    Err(not_found())
                }
            }
        };
        self.finish("delete", result).await
    }
}
