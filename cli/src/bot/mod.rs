//! # ChatBuddy Conversation Core
//!
//! File: cli/src/bot/mod.rs
//!
//! ## Overview
//!
//! The pieces every front end shares:
//! - `conversation`: the ordered message log
//! - `knowledge`: keyword → sentence lookup table
//! - `responder`: the reply selection chain
//! - `theme`: light/dark display state
//!
//! None of these do I/O; the deferred reply and the event loop live in
//! `crate::session`.
//!
pub mod conversation;
pub mod knowledge;
pub mod responder;
pub mod theme;

pub use conversation::{ConversationLog, Message, Sender};
pub use knowledge::KnowledgeBase;
pub use responder::Responder;
pub use theme::Theme;
