//! # Shared Session Handle
//!
//! File: cli/src/session/handle.rs
//!
//! Runs a [`Session`] on its own task and talks to it over a command channel,
//! so several callers (HTTP handlers) can use one conversation while every
//! mutation still happens on a single task. The same loop also appends the
//! bot replies as they come due.
//!
use super::Session;
use crate::bot::{Message, Theme};
use crate::core::error::{ChatbuddyError, Result};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

/// Commands accepted by the session task.
enum Command {
    Submit {
        text: String,
        respond_to: oneshot::Sender<Option<Message>>,
    },
    Clear {
        respond_to: oneshot::Sender<()>,
    },
    Messages {
        respond_to: oneshot::Sender<Vec<Message>>,
    },
    Theme {
        respond_to: oneshot::Sender<Theme>,
    },
    ToggleTheme {
        respond_to: oneshot::Sender<Theme>,
    },
}

/// Cloneable access to a session running on its own task.
#[derive(Clone, Debug)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
}

/// Moves `session` onto a new task and returns a handle to it.
///
/// The task stops once every handle has been dropped.
pub fn spawn_session(session: Session) -> SessionHandle {
    let (commands, rx) = mpsc::channel(64);
    tokio::spawn(run_session(session, rx));
    SessionHandle { commands }
}

async fn run_session(mut session: Session, mut commands: mpsc::Receiver<Command>) {
    info!("Session task started");
    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(command) => apply(&mut session, command),
                None => break,
            },
            Some(reply) = session.next_reply() => {
                debug!("Delivered bot message {}", reply.id);
            }
        }
    }
    info!("Session task stopped");
}

// A dropped `respond_to` only means the caller went away.
fn apply(session: &mut Session, command: Command) {
    match command {
        Command::Submit { text, respond_to } => {
            let _ = respond_to.send(session.submit(&text));
        }
        Command::Clear { respond_to } => {
            session.clear();
            let _ = respond_to.send(());
        }
        Command::Messages { respond_to } => {
            let _ = respond_to.send(session.messages().to_vec());
        }
        Command::Theme { respond_to } => {
            let _ = respond_to.send(session.theme());
        }
        Command::ToggleTheme { respond_to } => {
            let _ = respond_to.send(session.toggle_theme());
        }
    }
}

impl SessionHandle {
    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(build(tx))
            .await
            .map_err(|_| ChatbuddyError::SessionClosed)?;
        Ok(rx.await.map_err(|_| ChatbuddyError::SessionClosed)?)
    }

    /// Submits user text; `None` means it was blank and ignored.
    pub async fn submit(&self, text: impl Into<String>) -> Result<Option<Message>> {
        let text = text.into();
        self.request(|respond_to| Command::Submit { text, respond_to })
            .await
    }

    pub async fn clear(&self) -> Result<()> {
        self.request(|respond_to| Command::Clear { respond_to }).await
    }

    pub async fn messages(&self) -> Result<Vec<Message>> {
        self.request(|respond_to| Command::Messages { respond_to })
            .await
    }

    pub async fn theme(&self) -> Result<Theme> {
        self.request(|respond_to| Command::Theme { respond_to }).await
    }

    pub async fn toggle_theme(&self) -> Result<Theme> {
        self.request(|respond_to| Command::ToggleTheme { respond_to })
            .await
    }
}
