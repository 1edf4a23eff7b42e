//! # Response Selector
//!
//! File: cli/src/bot/responder.rs
//!
//! ## Overview
//!
//! Maps a line of user input to a reply. The input is lowercased and trimmed,
//! then checked against a fixed priority chain where the first match wins:
//!
//! 1. a [`KnowledgeBase`] keyword anywhere in the input
//! 2. blank input, which gets a prompt to type something
//! 3. the ordered trigger [`Rule`]s (greetings, time, jokes, moods, ...)
//! 4. a random generic acknowledgement
//!
//! Every check is plain substring containment. The rule chain is data, so
//! each rule can be inspected and tested on its own.
//!
//! ## Examples
//!
//! ```rust
//! use chatbuddy::bot::Responder;
//!
//! let bot = Responder::default();
//! assert_eq!(bot.select("bye now"), "Goodbye! Talk to you later!");
//! ```
//!
use super::knowledge::KnowledgeBase;
use chrono::{Local, NaiveDateTime};
use rand::Rng;
use std::fmt::Write;
use tracing::warn;

/// Name the bot introduces itself with unless configured otherwise.
pub const DEFAULT_BOT_NAME: &str = "ChatBuddy";
/// Matches `Date.toLocaleTimeString()` in an en-US locale, e.g. `3:07:09 PM`.
pub const DEFAULT_TIME_FORMAT: &str = "%-I:%M:%S %p";
/// Matches `Date.toLocaleDateString()` in an en-US locale, e.g. `10/16/2026`.
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Formats `now` with a strftime `format`.
///
/// Returns `None` when the format cannot be rendered from a naive local
/// timestamp, e.g. `%z` or `%Z`, which need a UTC offset.
pub fn format_clock(now: NaiveDateTime, format: &str) -> Option<String> {
    let mut rendered = String::new();
    write!(rendered, "{}", now.format(format)).ok()?;
    Some(rendered)
}

fn clock(now: NaiveDateTime, format: &str, fallback: &str) -> String {
    format_clock(now, format).unwrap_or_else(|| {
        warn!("Cannot render clock format '{}', using '{}'", format, fallback);
        now.format(fallback).to_string()
    })
}

pub const EMPTY_INPUT_REPLY: &str = "Please type something so I can respond!";

pub const JOKES: [&str; 5] = [
    "Why did the computer go to the doctor? It caught a virus!",
    "Why do programmers prefer dark mode? Because light attracts bugs!",
    "Why was the JavaScript developer sad? Because he didn't Node how to express himself!",
    "Why did the developer go broke? Because he used up all his cache!",
    "Why was the function always happy? Because it had no side effects!",
];

pub const GENERIC_REPLIES: [&str; 31] = [
    "Interesting, tell me more!",
    "Wow, that's cool!",
    "Hmm, I need to think about that...",
    "I see, continue...",
    "Can you explain it in detail?",
    "That's fascinating!",
    "Amazing! Keep going.",
    "Really? I didn't know that.",
    "Oh, I understand now.",
    "Sounds good!",
    "Haha, that's funny!",
    "I like the way you think.",
    "You're very thoughtful!",
    "That's a good point.",
    "Absolutely!",
    "I agree with you.",
    "Nice! Keep it up.",
    "I never thought about that!",
    "That's impressive!",
    "Hmm, very curious.",
    "You made me think.",
    "Wow, tell me more!",
    "I see what you mean.",
    "Interesting perspective!",
    "Good observation!",
    "That's awesome!",
    "I am learning from you.",
    "Wow, I didn’t know that!",
    "That's a clever thought.",
    "I like that idea!",
    "Very insightful!",
];

/// How a matched rule produces its reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Fixed(&'static str),
    /// `I am <name>, your friendly chatbot!`
    Introduce,
    /// Current wall-clock time.
    Time,
    /// Current calendar date.
    Date,
    /// One of [`JOKES`], chosen uniformly.
    Joke,
}

/// A trigger rule: fires when any of its substrings occurs in the input.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub triggers: &'static [&'static str],
    pub reply: Reply,
}

impl Rule {
    const fn new(triggers: &'static [&'static str], reply: Reply) -> Self {
        Self { triggers, reply }
    }

    /// `lowered` must already be lowercased.
    pub fn matches(&self, lowered: &str) -> bool {
        self.triggers.iter().any(|t| lowered.contains(t))
    }
}

/// Trigger rules in evaluation order.
pub const RULES: &[Rule] = &[
    Rule::new(&["hi", "hello"], Reply::Fixed("Hello! How are you today?")),
    Rule::new(
        &["how are you"],
        Reply::Fixed("I am doing great! What about you?"),
    ),
    Rule::new(&["your name"], Reply::Introduce),
    Rule::new(&["time"], Reply::Time),
    Rule::new(&["date"], Reply::Date),
    Rule::new(
        &["weather"],
        Reply::Fixed("I can't check live weather, but I hope it's sunny!"),
    ),
    Rule::new(&["joke"], Reply::Joke),
    Rule::new(&["thanks", "thank you"], Reply::Fixed("You're welcome! 😊")),
    Rule::new(&["bye"], Reply::Fixed("Goodbye! Talk to you later!")),
    Rule::new(&["love"], Reply::Fixed("Aww, that's sweet!")),
    Rule::new(&["friend"], Reply::Fixed("I am your virtual friend! 🤗")),
    Rule::new(
        &["help"],
        Reply::Fixed("I am here to help you! What do you need?"),
    ),
    Rule::new(
        &["game"],
        Reply::Fixed("I love games! Do you want to play a word game?"),
    ),
    Rule::new(
        &["music"],
        Reply::Fixed("Music is life! What's your favorite song?"),
    ),
    Rule::new(
        &["movie"],
        Reply::Fixed("I enjoy movies! Do you have a favorite one?"),
    ),
    Rule::new(&["fun"], Reply::Fixed("Fun is always welcome! 😄")),
    Rule::new(
        &["study"],
        Reply::Fixed("Studying is important. Need any tips?"),
    ),
    Rule::new(
        &["hungry"],
        Reply::Fixed("Oh! Hope you get something delicious to eat!"),
    ),
    Rule::new(
        &["sad"],
        Reply::Fixed("It's okay to feel sad sometimes. I'm here!"),
    ),
    Rule::new(&["happy"], Reply::Fixed("Yay! Happiness is contagious! 😊")),
    Rule::new(
        &["bored"],
        Reply::Fixed("Boredom? Let's chat and have some fun!"),
    ),
    Rule::new(&["question"], Reply::Fixed("Sure, ask me anything!")),
];

/// The reply engine. Cheap to clone and safe to share between tasks.
#[derive(Debug, Clone)]
pub struct Responder {
    knowledge: KnowledgeBase,
    rules: &'static [Rule],
    bot_name: String,
    time_format: String,
    date_format: String,
}

impl Default for Responder {
    fn default() -> Self {
        Self::new(DEFAULT_BOT_NAME, DEFAULT_TIME_FORMAT, DEFAULT_DATE_FORMAT)
    }
}

impl Responder {
    pub fn new(bot_name: &str, time_format: &str, date_format: &str) -> Self {
        Self {
            knowledge: KnowledgeBase::default(),
            rules: RULES,
            bot_name: bot_name.to_string(),
            time_format: time_format.to_string(),
            date_format: date_format.to_string(),
        }
    }

    pub fn bot_name(&self) -> &str {
        &self.bot_name
    }

    pub fn rules(&self) -> &'static [Rule] {
        self.rules
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Picks a reply using the thread RNG and the local clock.
    pub fn select(&self, input: &str) -> String {
        self.select_with(input, &mut rand::rng(), Local::now().naive_local())
    }

    /// Picks a reply with an explicit randomness source and clock reading.
    pub fn select_with<R: Rng>(&self, input: &str, rng: &mut R, now: NaiveDateTime) -> String {
        let lowered = input.to_lowercase();
        let lowered = lowered.trim();

        if let Some(sentence) = self.knowledge.lookup(lowered) {
            return sentence.to_string();
        }

        if lowered.is_empty() {
            return EMPTY_INPUT_REPLY.to_string();
        }

        match self.rules.iter().find(|rule| rule.matches(lowered)) {
            Some(rule) => self.render(rule.reply, rng, now),
            None => GENERIC_REPLIES[rng.random_range(0..GENERIC_REPLIES.len())].to_string(),
        }
    }

    fn render<R: Rng>(&self, reply: Reply, rng: &mut R, now: NaiveDateTime) -> String {
        match reply {
            Reply::Fixed(text) => text.to_string(),
            Reply::Introduce => format!("I am {}, your friendly chatbot!", self.bot_name),
            Reply::Time => format!(
                "Current time: {}",
                clock(now, &self.time_format, DEFAULT_TIME_FORMAT)
            ),
            Reply::Date => format!(
                "Today's date: {}",
                clock(now, &self.date_format, DEFAULT_DATE_FORMAT)
            ),
            Reply::Joke => JOKES[rng.random_range(0..JOKES.len())].to_string(),
        }
    }
}
