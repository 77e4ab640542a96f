//! # CLI Consumer
//!
//! Command-line front end over `NotesManager`. It plays the part of the
//! presentation layer: it invokes manager operations and renders snapshots
//! of the state, and never writes to the state itself.

pub mod render;

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use log::{debug, info};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::api::{HttpNotesClient, NoteId};
use crate::core::config::{CliOverrides, ResolvedConfig};
use crate::core::{NoteDraft, NotesManager, NotesState, SubmitError};

#[derive(Parser, Debug)]
#[command(name = "jotter", about = "Client for a remote notes API")]
pub struct Args {
    /// Base URL of the notes API
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Args {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            base_url: self.api_url.clone(),
            timeout_secs: self.timeout,
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List all notes
    List,
    /// Open one note in the editor view
    Show { id: NoteId },
    /// Create a note
    New {
        #[arg(short, long)]
        title: String,
        #[arg(short, long, default_value = "")]
        content: String,
    },
    /// Edit a note; omitted fields keep their current value
    Edit {
        id: NoteId,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        content: Option<String>,
    },
    /// Delete a note
    Rm { id: NoteId },
}

/// Logs every state change the manager publishes.
fn spawn_change_logger(mut rx: watch::Receiver<NotesState>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update();
            debug!(
                "State changed: notes={}, selected={:?}, loading={}, error={:?}",
                state.notes.len(),
                state.selected_id,
                state.loading,
                state.error
            );
        }
    })
}

pub async fn run(command: Command, config: &ResolvedConfig) -> ExitCode {
    let client = match HttpNotesClient::new(&config.base_url, config.timeout) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{}", render::render_error_banner(&e.to_string()));
            return ExitCode::FAILURE;
        }
    };

    let manager = NotesManager::start(Arc::new(client)).await;
    let watcher = spawn_change_logger(manager.subscribe());

    info!("Running command: {:?}", command);
    let succeeded = execute(&manager, command).await;
    watcher.abort();

    if let Some(message) = manager.snapshot().error {
        eprintln!("{}", render::render_error_banner(&message));
    }
    if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn execute(manager: &NotesManager, command: Command) -> bool {
    match command {
        Command::List => {
            println!("{}", render::render_list(&manager.snapshot()));
            manager.snapshot().error.is_none()
        }
        Command::Show { id } => {
            manager.select(id).await;
            match manager.selected_note() {
                Some(note) => println!("{}", render::render_editor(&note)),
                None => println!("{}", render::render_empty_state()),
            }
            manager.snapshot().error.is_none()
        }
        Command::New { title, content } => {
            manager.clear_selection();
            let draft = NoteDraft {
                editing: None,
                title,
                content,
            };
            submit(manager, &draft).await
        }
        Command::Edit { id, title, content } => {
            manager.select(id).await;
            let Some(note) = manager.selected_note() else {
                println!("{}", render::render_empty_state());
                return false;
            };
            let mut draft = NoteDraft::from_note(&note);
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(content) = content {
                draft.content = content;
            }
            submit(manager, &draft).await
        }
        Command::Rm { id } => match manager.remove(&id).await {
            Ok(_) => {
                println!("Deleted note {id}");
                println!("{}", render::render_list(&manager.snapshot()));
                true
            }
            // The message is already in the state's error banner.
            Err(_) => false,
        },
    }
}

async fn submit(manager: &NotesManager, draft: &NoteDraft) -> bool {
    match manager.submit(draft).await {
        Ok(note) => {
            println!("{}", render::render_editor(&note));
            true
        }
        Err(SubmitError::Invalid(e)) => {
            eprintln!("{}", render::render_error_banner(&e.to_string()));
            false
        }
        Err(SubmitError::Api(_)) => false,
    }
}
