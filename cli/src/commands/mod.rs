//! # ChatBuddy Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! One module per top-level command of the `chatbuddy` binary. Each defines
//! its own Clap argument struct and an async `handle_*` function that
//! `main.rs` dispatches to, passing along the loaded configuration.
//!
//! ## Command Groups
//!
//! - `ask`: One-shot reply to a line of text
//! - `chat`: Interactive transcript on stdin/stdout
//! - `srv`: HTTP API serving a shared session to a browser page
//!

/// One-shot reply: `chatbuddy ask <TEXT>...`.
pub mod ask;
/// Interactive session on the terminal: `chatbuddy chat`.
pub mod chat;
/// HTTP API and static page server: `chatbuddy srv`.
pub mod srv;
