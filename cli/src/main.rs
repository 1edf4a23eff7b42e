//! # ChatBuddy Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! Entry point of the `chatbuddy` binary. It:
//! - parses command-line arguments with Clap
//! - sets up logging from the verbosity flags (or `RUST_LOG`)
//! - loads the configuration files
//! - routes execution to the command handlers in `chatbuddy::commands`
//!
//! ## Examples
//!
//! ```bash
//! # Talk to the bot in the terminal
//! chatbuddy chat
//!
//! # One reply, with debug logs on stderr
//! chatbuddy -vv ask "what is an api?"
//!
//! # Serve the API for the browser page
//! chatbuddy srv --static-dir ./web
//! ```
//!
use chatbuddy::commands;
use chatbuddy::core::config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "chatbuddy",
    about = "💬 ChatBuddy: a friendly rule-based chat companion",
    long_about = "Chat with a keyword-driven bot in the terminal, ask it one-off questions,\n\
                  or serve a shared conversation over HTTP for a browser page.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Configuration file to use instead of a discovered .chatbuddy.toml.
    #[arg(long, global = true, env = "CHATBUDDY_CONFIG")]
    config: Option<PathBuf>,
}

/// Enum defining all available top-level commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Chat interactively on stdin/stdout.
    #[command(alias = "c")]
    Chat(commands::chat::ChatArgs),
    /// Print a single reply and exit.
    #[command(alias = "a")]
    Ask(commands::ask::AskArgs),
    /// Serve the conversation over HTTP.
    Srv(commands::srv::SrvArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match config::load_config(cli.config.as_deref()) {
        Ok(cfg) => match cli.command {
            Commands::Chat(args) => commands::chat::handle_chat(args, cfg).await,
            Commands::Ask(args) => commands::ask::handle_ask(args, cfg).await,
            Commands::Srv(args) => commands::srv::handle_srv(args, cfg).await,
        },
        Err(e) => Err(e),
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
