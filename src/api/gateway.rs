use std::fmt;

use async_trait::async_trait;

use super::types::{Note, NoteId, NoteInput};

/// Message shown when a request exceeds its deadline.
pub const TIMEOUT_MESSAGE: &str = "Request timed out. Please try again.";

/// Message shown when the server could not be reached at all.
pub const NETWORK_MESSAGE: &str = "Network error occurred.";

/// Errors raised by the notes gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request did not finish before its deadline.
    Timeout,
    /// The server answered with a non-2xx status.
    RequestFailed { status: u16, message: String },
    /// A required argument (the note id) was missing. Never hits the network.
    InvalidArgument(String),
    /// Transport-level failure (connection refused, DNS, reset). The cause is
    /// kept for logs; the banner only shows `NETWORK_MESSAGE`.
    Network(String),
    /// A 2xx body that could not be read as the expected shape.
    Parse(String),
    /// The gateway itself is misconfigured (bad base URL).
    Config(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Timeout)
    }
}

/// Displays the human-readable message that ends up in the error banner.
impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Timeout => f.write_str(TIMEOUT_MESSAGE),
            ApiError::RequestFailed { message, .. } => f.write_str(message),
            ApiError::InvalidArgument(msg) => f.write_str(msg),
            ApiError::Network(_) => f.write_str(NETWORK_MESSAGE),
            ApiError::Parse(msg) => write!(f, "parse error: {msg}"),
            ApiError::Config(msg) => write!(f, "config error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// CRUD contract against the remote notes API.
#[async_trait]
pub trait NotesApi: Send + Sync {
    /// `GET /notes`. Bodies that are not a JSON array come back empty.
    async fn list(&self) -> Result<Vec<Note>, ApiError>;

    /// `POST /notes`.
    async fn create(&self, input: &NoteInput) -> Result<Note, ApiError>;

    /// `GET /notes/{id}`.
    async fn get(&self, id: &NoteId) -> Result<Note, ApiError>;

    /// `PUT /notes/{id}`, full replace.
    async fn update(&self, id: &NoteId, input: &NoteInput) -> Result<Note, ApiError>;

    /// `DELETE /notes/{id}`. Returns `true` once the server confirms.
    async fn delete(&self, id: &NoteId) -> Result<bool, ApiError>;
}

/// Rejects a missing id before anything goes on the wire.
pub fn require_id(id: &NoteId) -> Result<&NoteId, ApiError> {
    if id.is_missing() {
        return Err(ApiError::InvalidArgument("Note id is required".to_string()));
    }
    Ok(id)
}
