//! # ChatBuddy Chat Command
//!
//! File: cli/src/commands/chat.rs
//!
//! ## Overview
//!
//! An interactive conversation on the terminal. Every line read from stdin
//! is submitted to a [`Session`]; the bot's replies are printed as they come
//! due, so typing quickly produces several pending replies that arrive in
//! order.
//!
//! Lines starting with `/` that name a known command control the session
//! instead of being sent:
//!
//! | Command            | Effect                                   |
//! |--------------------|------------------------------------------|
//! | `/clear`           | Empty the transcript                     |
//! | `/theme`           | Toggle between light and dark            |
//! | `/history`         | Print the transcript                     |
//! | `/help`            | List these commands                      |
//! | `/quit`, `/exit`   | Leave without waiting for pending replies |
//!
//! At end of input the command waits for pending replies, prints them and
//! exits.
//!
//! ```bash
//! chatbuddy chat --delay-ms 200 --theme dark
//! echo "tell me a joke" | chatbuddy chat
//! ```
//!
use crate::bot::{Message, Sender, Theme};
use crate::core::config::{Config, MAX_REPLY_DELAY_MS};
use crate::core::error::{ChatbuddyError, Result};
use crate::session::Session;
use clap::Parser;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info};

/// Arguments for `chatbuddy chat`.
#[derive(Parser, Debug)]
pub struct ChatArgs {
    /// Milliseconds the bot "types" before each reply.
    #[arg(long, env = "CHATBUDDY_REPLY_DELAY_MS",
          value_parser = clap::value_parser!(u64).range(0..=MAX_REPLY_DELAY_MS))]
    pub delay_ms: Option<u64>,

    /// Name the bot introduces itself with.
    #[arg(long, env = "CHATBUDDY_NAME")]
    pub name: Option<String>,

    /// Initial theme (light or dark).
    #[arg(long)]
    pub theme: Option<Theme>,
}

/// Something the user typed.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Clear,
    ToggleTheme,
    History,
    Help,
    Quit,
    Text(&'a str),
}

impl<'a> Input<'a> {
    fn parse(line: &'a str) -> Self {
        match line.trim() {
            "/clear" => Input::Clear,
            "/theme" => Input::ToggleTheme,
            "/history" => Input::History,
            "/help" => Input::Help,
            "/quit" | "/exit" => Input::Quit,
            _ => Input::Text(line),
        }
    }
}

const HELP: &str = "Commands: /clear, /theme, /history, /help, /quit";

fn topics(session: &Session) -> String {
    let keywords: Vec<_> = session.responder().knowledge().keywords().collect();
    format!("Ask me about: {}", keywords.join(", "))
}

fn apply_overrides(args: &ChatArgs, config: &mut Config) {
    if let Some(delay) = args.delay_ms {
        config.bot.reply_delay_ms = delay;
    }
    if let Some(name) = &args.name {
        config.bot.name = name.clone();
    }
    if let Some(theme) = args.theme {
        config.display.theme = theme;
    }
}

fn render(message: &Message, bot_name: &str) -> String {
    match message.sender {
        Sender::User => format!("You: {}", message.text),
        Sender::Bot => format!("{}: {}", bot_name, message.text),
    }
}

async fn say<W: AsyncWrite + Unpin>(out: &mut W, line: &str) -> Result<()> {
    write_line(out, line).await.map_err(ChatbuddyError::from)?;
    Ok(())
}

async fn write_line<W: AsyncWrite + Unpin>(out: &mut W, line: &str) -> std::io::Result<()> {
    out.write_all(line.as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await
}

/// Runs the conversation loop until `/quit` or end of input.
pub async fn run_chat<R, W>(session: &mut Session, input: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let bot_name = session.responder().bot_name().to_string();
    say(out, &format!("Chat with {}! Type /help for commands.", bot_name)).await?;

    let mut lines = input.lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.map_err(ChatbuddyError::from)? else {
                    debug!("End of input with {} replies pending", session.pending_replies());
                    break;
                };
                match Input::parse(&line) {
                    Input::Clear => {
                        session.clear();
                        say(out, "(conversation cleared)").await?;
                    }
                    Input::ToggleTheme => {
                        let theme = session.toggle_theme();
                        say(out, &format!("Theme: {}", theme)).await?;
                    }
                    Input::History => {
                        for message in session.messages() {
                            say(out, &render(message, &bot_name)).await?;
                        }
                    }
                    Input::Help => {
                        say(out, HELP).await?;
                        say(out, &topics(session)).await?;
                    }
                    Input::Quit => return Ok(()),
                    Input::Text(text) => {
                        session.submit(text);
                    }
                }
            }
            Some(reply) = session.next_reply() => {
                say(out, &render(&reply, &bot_name)).await?;
            }
        }
    }

    for reply in session.drain().await {
        say(out, &render(&reply, &bot_name)).await?;
    }
    Ok(())
}

/// Handles `chatbuddy chat`.
pub async fn handle_chat(args: ChatArgs, mut config: Config) -> Result<()> {
    apply_overrides(&args, &mut config);
    info!(
        "Starting chat as {} (delay {} ms, theme {})",
        config.bot.name, config.bot.reply_delay_ms, config.display.theme
    );

    let mut session = Session::new(config.responder(), config.reply_delay(), config.display.theme);
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    run_chat(&mut session, stdin, &mut stdout).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::Responder;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use std::time::Duration;

    fn session() -> Session {
        Session::new(Responder::default(), Duration::from_millis(500), Theme::Light)
    }

    struct BrokenPipe;

    impl AsyncWrite for BrokenPipe {
        fn poll_write(
            self: Pin<&mut Self>,
            _: &mut Context<'_>,
            _: &[u8],
        ) -> Poll<std::io::Result<usize>> {
            Poll::Ready(Err(std::io::ErrorKind::BrokenPipe.into()))
        }

        fn poll_flush(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    async fn transcript(session: &mut Session, input: &str) -> String {
        let mut out = Vec::new();
        run_chat(session, input.as_bytes(), &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parses_commands_and_text() {
        assert_eq!(Input::parse("/clear"), Input::Clear);
        assert_eq!(Input::parse(" /theme "), Input::ToggleTheme);
        assert_eq!(Input::parse("/exit"), Input::Quit);
        assert_eq!(Input::parse("/dance"), Input::Text("/dance"));
        assert_eq!(Input::parse("hello"), Input::Text("hello"));
    }

    #[tokio::test(start_paused = true)]
    async fn replies_print_in_order_at_end_of_input() {
        let mut s = session();
        let out = transcript(&mut s, "hello\nbye\n").await;

        let hello = out.find("ChatBuddy: Hello! How are you today?").unwrap();
        let bye = out.find("ChatBuddy: Goodbye! Talk to you later!").unwrap();
        assert!(hello < bye);
        assert_eq!(s.messages().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn blank_lines_are_ignored() {
        let mut s = session();
        transcript(&mut s, "\n   \n").await;
        assert!(s.messages().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn theme_and_clear_commands() {
        let mut s = session();
        let out = transcript(&mut s, "/theme\nthanks\n/clear\n").await;

        assert!(out.contains("Theme: dark"));
        assert!(out.contains("(conversation cleared)"));
        // The pending reply still lands after the clear.
        assert!(out.contains("ChatBuddy: You're welcome! 😊"));
        assert_eq!(s.messages().len(), 1);
        assert_eq!(s.theme(), Theme::Dark);
    }

    #[tokio::test(start_paused = true)]
    async fn help_lists_commands_and_topics() {
        let mut s = session();
        let out = transcript(&mut s, "/help\n").await;
        assert!(out.contains(HELP));
        assert!(out.contains("Ask me about: computer, javascript, react,"));
        assert!(out.contains(", database\n"));
        assert!(s.messages().is_empty());
    }

    #[tokio::test]
    async fn write_failures_surface_as_io_errors() {
        let mut s = session();
        let mut out = BrokenPipe;
        let err = run_chat(&mut s, "hello\n".as_bytes(), &mut out)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ChatbuddyError>(),
            Some(ChatbuddyError::Io { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn quit_skips_pending_replies() {
        let mut s = session();
        let out = transcript(&mut s, "hello\n/quit\nbye\n").await;
        assert!(!out.contains("Goodbye"));
        assert_eq!(s.messages().len(), 1);
    }

    #[test]
    fn overrides_apply_to_config() {
        let args = ChatArgs {
            delay_ms: Some(0),
            name: Some("Rusty".into()),
            theme: Some(Theme::Dark),
        };
        let mut config = Config::default();
        apply_overrides(&args, &mut config);
        assert_eq!(config.bot.reply_delay_ms, 0);
        assert_eq!(config.bot.name, "Rusty");
        assert_eq!(config.display.theme, Theme::Dark);
    }

    #[test]
    fn rejects_excessive_delay() {
        assert!(ChatArgs::try_parse_from(["chat", "--delay-ms", "60001"]).is_err());
        assert!(ChatArgs::try_parse_from(["chat", "--theme", "sepia"]).is_err());
    }
}
