//! # ChatBuddy Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! The conversation core itself never fails: appending, clearing and reply
//! selection are total. Errors only come from the ambient layers around it,
//! such as configuration files, the HTTP listener and the session task.
//!
//! ## Architecture
//!
//! - `ChatbuddyError`: a `thiserror` enum for the specific failure kinds
//! - `Result<T>`: an alias for `anyhow::Result<T>` so call sites can add context
//!
//! ## Examples
//!
//! ```rust,ignore
//! if cfg.bot.name.trim().is_empty() {
//!     return Err(ChatbuddyError::Config("bot.name must not be empty".into()))?;
//! }
//!
//! let content = fs::read_to_string(&path)
//!     .with_context(|| format!("Failed to read file: {}", path.display()))?;
//! ```
//!
use thiserror::Error;

/// Custom error type for the ChatBuddy application.
#[derive(Error, Debug)]
pub enum ChatbuddyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid theme '{0}'. Expected 'light' or 'dark'.")]
    InvalidTheme(String),

    #[error("Session is no longer running.")]
    SessionClosed,

    #[error("Server error: {0}")]
    Server(String),

    #[error("Terminal I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
