//! # Core Application Logic
//!
//! This module contains Jotter's business logic: the notes state, the
//! manager that keeps it in sync with the remote API, and editor validation.
//! It knows nothing about how the state is rendered.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • NotesState (data)    │
//!                    │  • NotesManager (sync)  │
//!                    │  • editor (validation)  │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┴───────────────────┐
//!            ▼                                       ▼
//!     ┌────────────┐                          ┌────────────┐
//!     │    CLI     │                          │    API     │
//!     │  consumer  │                          │  gateway   │
//!     │  (clap)    │                          │ (reqwest)  │
//!     └────────────┘                          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: `NotesState`, the collection/selection/loading/error snapshot
//! - [`manager`]: `NotesManager`, the only mutation surface
//! - [`editor`]: form validation and drafts
//! - [`config`]: layered configuration

pub mod config;
pub mod editor;
pub mod manager;
pub mod state;

pub use editor::{NoteDraft, ValidationError};
pub use manager::{NotesManager, SubmitError};
pub use state::NotesState;
