pub mod client;
pub mod gateway;
pub mod types;

pub use client::{DEFAULT_TIMEOUT, HttpNotesClient};
pub use gateway::{ApiError, NotesApi, NETWORK_MESSAGE, TIMEOUT_MESSAGE};
pub use types::{Note, NoteId, NoteInput};
