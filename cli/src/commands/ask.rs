//! # ChatBuddy Ask Command
//!
//! File: cli/src/commands/ask.rs
//!
//! Prints a single reply for the given text and exits. There is no session
//! and no reply delay.
//!
//! ```bash
//! chatbuddy ask tell me a joke
//! chatbuddy ask --name Rusty "what is your name?"
//! ```
//!
use crate::core::config::Config;
use crate::core::error::Result;
use clap::Parser;
use tracing::debug;

/// Arguments for `chatbuddy ask`.
#[derive(Parser, Debug)]
pub struct AskArgs {
    /// Text to reply to. Multiple words are joined with spaces.
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,

    /// Name the bot introduces itself with.
    #[arg(long, env = "CHATBUDDY_NAME")]
    pub name: Option<String>,
}

/// Computes the reply `args` asks for under `config`.
pub fn reply_for(args: &AskArgs, mut config: Config) -> String {
    if let Some(name) = &args.name {
        config.bot.name = name.clone();
    }
    let input = args.text.join(" ");
    debug!("Answering {:?}", input);
    config.responder().select(&input)
}

/// Handles `chatbuddy ask`.
pub async fn handle_ask(args: AskArgs, config: Config) -> Result<()> {
    println!("{}", reply_for(&args, config));
    Ok(())
}
