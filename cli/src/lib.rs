//! # ChatBuddy Library
//!
//! File: cli/src/lib.rs
//!
//! The conversation core (`bot`), the session event loop (`session`), shared
//! infrastructure (`core`) and the command implementations (`commands`).
//! The `chatbuddy` binary in `main.rs` is a thin dispatcher over these, and
//! the integration tests in `tests/` use them directly.
//!
pub mod bot;
pub mod commands;
pub mod core;
pub mod session;
