//! # ChatBuddy Session
//!
//! File: cli/src/session/mod.rs
//!
//! ## Overview
//!
//! A [`Session`] is one conversation: its message log, its theme, and the
//! replies still being "typed". Submitting text appends the user message
//! right away and queues a reply that is computed and delivered once the
//! reply delay has elapsed.
//!
//! ## Architecture
//!
//! - The session owns its [`ConversationLog`]; only the task holding the
//!   session mutates it.
//! - Pending replies are handled by a background typist task. Each queued
//!   job carries its own deadline (`submitted_at + delay`), so replies arrive
//!   at the same moments independent timers would, in submission order.
//! - Finished replies travel back over a channel and are appended when the
//!   owner awaits [`Session::next_reply`].
//! - Nothing is cancelled: clearing the log does not drop queued replies.
//!
//! The `handle` submodule wraps a session in its own task for front ends
//! that need to share it, such as the HTTP server.
//!
//! ## Examples
//!
//! ```rust,no_run
//! # async fn demo() {
//! use chatbuddy::bot::{Responder, Theme};
//! use chatbuddy::session::Session;
//! use std::time::Duration;
//!
//! let mut session = Session::new(Responder::default(), Duration::from_millis(500), Theme::Light);
//! session.submit("hello");
//! let reply = session.next_reply().await;
//! # }
//! ```
//!
use crate::bot::{ConversationLog, Message, Responder, Sender, Theme};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, trace};

pub mod handle;

pub use handle::{spawn_session, SessionHandle};

/// A reply waiting for its deadline.
struct ReplyJob {
    deadline: Instant,
    input: String,
}

/// One conversation and its pending replies.
pub struct Session {
    log: ConversationLog,
    theme: Theme,
    responder: Arc<Responder>,
    reply_delay: Duration,
    jobs_tx: Option<mpsc::UnboundedSender<ReplyJob>>,
    replies_tx: Option<mpsc::UnboundedSender<String>>,
    replies_rx: mpsc::UnboundedReceiver<String>,
    pending: usize,
}

impl Session {
    pub fn new(responder: Responder, reply_delay: Duration, theme: Theme) -> Self {
        let (replies_tx, replies_rx) = mpsc::unbounded_channel();
        Self {
            log: ConversationLog::new(),
            theme,
            responder: Arc::new(responder),
            reply_delay,
            jobs_tx: None,
            replies_tx: Some(replies_tx),
            replies_rx,
            pending: 0,
        }
    }

    /// Appends `input` as a user message and schedules the bot's reply.
    ///
    /// Blank input is ignored and returns `None`. The reply is computed from
    /// `input` exactly as typed. Must be called from within a Tokio runtime.
    pub fn submit(&mut self, input: &str) -> Option<Message> {
        if input.trim().is_empty() {
            trace!("Ignoring blank input");
            return None;
        }

        let message = self.log.append(Sender::User, input);
        let job = ReplyJob {
            deadline: Instant::now() + self.reply_delay,
            input: input.to_string(),
        };
        if self.jobs().send(job).is_ok() {
            self.pending += 1;
        } else {
            debug!("Typist task is gone; reply for message {} dropped", message.id);
        }
        Some(message)
    }

    /// Waits for the next reply, appends it as a bot message and returns it.
    ///
    /// Pends indefinitely while nothing is queued, so it can sit in a
    /// `tokio::select!` next to other event sources.
    pub async fn next_reply(&mut self) -> Option<Message> {
        let text = self.replies_rx.recv().await?;
        self.pending = self.pending.saturating_sub(1);
        Some(self.log.append(Sender::Bot, text))
    }

    /// Delivers every reply that is still queued.
    pub async fn drain(&mut self) -> Vec<Message> {
        let mut delivered = Vec::with_capacity(self.pending);
        while self.pending > 0 {
            match self.next_reply().await {
                Some(message) => delivered.push(message),
                None => break,
            }
        }
        delivered
    }

    /// Empties the transcript. Queued replies are still delivered afterwards.
    pub fn clear(&mut self) {
        debug!(
            "Clearing {} messages ({} replies pending)",
            self.log.len(),
            self.pending
        );
        self.log.clear();
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn messages(&self) -> &[Message] {
        self.log.all()
    }

    pub fn pending_replies(&self) -> usize {
        self.pending
    }

    pub fn responder(&self) -> &Responder {
        &self.responder
    }

    /// Job queue of the typist task, spawning the task on first use.
    fn jobs(&mut self) -> &mpsc::UnboundedSender<ReplyJob> {
        let responder = &self.responder;
        let replies_tx = &mut self.replies_tx;
        self.jobs_tx.get_or_insert_with(|| {
            let (jobs_tx, jobs_rx) = mpsc::unbounded_channel();
            if let Some(replies_tx) = replies_tx.take() {
                tokio::spawn(run_typist(Arc::clone(responder), jobs_rx, replies_tx));
            }
            jobs_tx
        })
    }
}

/// Turns queued inputs into replies, each at its own deadline.
async fn run_typist(
    responder: Arc<Responder>,
    mut jobs: mpsc::UnboundedReceiver<ReplyJob>,
    replies: mpsc::UnboundedSender<String>,
) {
    while let Some(job) = jobs.recv().await {
        tokio::time::sleep_until(job.deadline).await;
        let reply = responder.select(&job.input);
        trace!("Reply ready for {:?}: {:?}", job.input, reply);
        if replies.send(reply).is_err() {
            debug!("Session dropped; typist exiting");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::responder::JOKES;

    fn session(delay_ms: u64) -> Session {
        Session::new(
            Responder::default(),
            Duration::from_millis(delay_ms),
            Theme::Light,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn user_message_is_immediate_and_reply_waits_for_delay() {
        let mut s = session(500);
        let start = Instant::now();

        let user = s.submit("hello").unwrap();
        assert_eq!(user.sender, Sender::User);
        assert_eq!(s.messages(), [user.clone()]);
        assert_eq!(s.pending_replies(), 1);

        let bot = s.next_reply().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(500));
        assert_eq!(bot.sender, Sender::Bot);
        assert_eq!(bot.text, "Hello! How are you today?");
        assert!(bot.id > user.id);
        assert_eq!(s.messages().len(), 2);
        assert_eq!(s.pending_replies(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn blank_input_leaves_log_untouched() {
        let mut s = session(500);
        assert!(s.submit("").is_none());
        assert!(s.submit("   \n").is_none());
        assert!(s.messages().is_empty());
        assert_eq!(s.pending_replies(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_submits_resolve_in_order() {
        let mut s = session(500);
        s.submit("hello");
        s.submit("bye");
        s.submit("tell me a joke");

        let replies = s.drain().await;
        let texts: Vec<_> = replies.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts[0], "Hello! How are you today?");
        assert_eq!(texts[1], "Goodbye! Talk to you later!");
        assert!(JOKES.contains(&texts[2]));

        // user, user, user, bot, bot, bot
        let senders: Vec<_> = s.messages().iter().map(|m| m.sender).collect();
        assert_eq!(
            senders,
            [Sender::User, Sender::User, Sender::User, Sender::Bot, Sender::Bot, Sender::Bot]
        );
        assert!(s.messages().windows(2).all(|w| w[0].id < w[1].id));
    }

    #[tokio::test(start_paused = true)]
    async fn clear_does_not_cancel_pending_reply() {
        let mut s = session(500);
        s.submit("thanks");
        s.clear();
        assert!(s.messages().is_empty());

        let bot = s.next_reply().await.unwrap();
        assert_eq!(bot.text, "You're welcome! 😊");
        assert_eq!(s.messages(), [bot]);
    }

    #[tokio::test(start_paused = true)]
    async fn each_reply_keeps_its_own_deadline() {
        let mut s = session(500);
        let start = Instant::now();
        s.submit("hi");
        tokio::time::sleep(Duration::from_millis(200)).await;
        s.submit("hi again");

        s.next_reply().await.unwrap();
        let first = start.elapsed();
        s.next_reply().await.unwrap();
        let second = start.elapsed();

        assert!(first >= Duration::from_millis(500) && first < Duration::from_millis(700));
        assert!(second >= Duration::from_millis(700) && second < Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn toggle_theme_flips() {
        let mut s = session(0);
        assert_eq!(s.theme(), Theme::Light);
        assert_eq!(s.toggle_theme(), Theme::Dark);
        assert_eq!(s.theme(), Theme::Dark);
    }
}
