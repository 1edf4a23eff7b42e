//! # ChatBuddy Server
//!
//! File: cli/src/commands/srv/mod.rs
//!
//! ## Overview
//!
//! Serves one shared conversation over HTTP so a browser page can act as the
//! chat widget. The page posts user text, polls the transcript, and can clear
//! it or toggle the theme. Optionally the page itself is served from a
//! static directory.
//!
//! ## Architecture
//!
//! - `config.rs`: Merges CLI flags with the loaded configuration
//! - `routes.rs`: JSON API handlers over a `SessionHandle`
//! - `server_logic.rs`: Listener, middleware, port fallback and shutdown
//!
//! ## Examples
//!
//! ```bash
//! # API only, on the default port
//! chatbuddy srv
//!
//! # Serve the widget page too, replying instantly
//! chatbuddy srv --static-dir ./web --delay-ms 0 --port 9000
//! ```
//!
use crate::core::config::Config;
use crate::core::error::Result;
use tracing::info;

pub use config::SrvArgs;

/// Merges `chatbuddy srv` flags with the configuration files.
pub mod config;

/// JSON endpoints over the shared session.
pub mod routes;

/// Axum server setup, port fallback and graceful shutdown.
pub mod server_logic;

/// # Handle Server Command (`handle_srv`)
///
/// Resolves the effective server configuration and runs the server until it
/// is shut down.
pub async fn handle_srv(args: SrvArgs, config: Config) -> Result<()> {
    info!("Handling srv command with args: {:?}", args);

    let server_config = config::load_and_merge_config(&args, &config)?;
    info!("Effective server config: {:?}", server_config);

    server_logic::run_server(server_config, config.responder(), config.display.theme).await
}
