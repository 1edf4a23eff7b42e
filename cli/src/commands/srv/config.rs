//! # ChatBuddy Server Configuration
//!
//! File: cli/src/commands/srv/config.rs
//!
//! ## Overview
//!
//! Combines the `[server]`/`[bot]` sections of the loaded configuration with
//! the `chatbuddy srv` flags into one [`ServerConfig`]:
//! 1. Command-line arguments (highest priority)
//! 2. The configuration files (see `core::config`)
//! 3. Default values (lowest priority)
//!
//! A static directory, if any, is resolved to an absolute path and must be an
//! existing directory.
//!
use crate::core::config::{Config, MAX_REPLY_DELAY_MS};
use crate::core::error::{ChatbuddyError, Result};
use anyhow::Context;
use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// # Server Command Arguments (`SrvArgs`)
///
/// Flags accepted by `chatbuddy srv`. Anything left unset falls back to the
/// configuration files.
#[derive(Parser, Debug, Default)]
pub struct SrvArgs {
    /// Network port to listen on (default 8000). The next free port is used if taken.
    #[arg(long, short)]
    pub port: Option<u16>,

    /// IP address to bind to (default 127.0.0.1).
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Directory with the browser page, served for every non-API path.
    #[arg(long)]
    pub static_dir: Option<PathBuf>,

    /// Disables CORS headers (enabled by default).
    #[arg(long)]
    pub no_cors: bool,

    /// Milliseconds the bot "types" before each reply.
    #[arg(long, env = "CHATBUDDY_REPLY_DELAY_MS",
          value_parser = clap::value_parser!(u64).range(0..=MAX_REPLY_DELAY_MS))]
    pub delay_ms: Option<u64>,
}

/// # Effective Server Configuration (`ServerConfig`)
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Absolute path of the page directory, if one is served.
    pub static_dir: Option<PathBuf>,
    pub enable_cors: bool,
    pub reply_delay: Duration,
}

/// Merges `args` over `config` and validates the result.
pub fn load_and_merge_config(args: &SrvArgs, config: &Config) -> Result<ServerConfig> {
    let static_dir = match args
        .static_dir
        .clone()
        .or_else(|| config.server.static_dir.as_ref().map(PathBuf::from))
    {
        Some(dir) => Some(resolve_static_dir(dir)?),
        None => None,
    };

    let server_config = ServerConfig {
        host: args.host.unwrap_or(config.server.host),
        port: args.port.unwrap_or(config.server.port),
        static_dir,
        enable_cors: config.server.enable_cors && !args.no_cors,
        reply_delay: args
            .delay_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| config.reply_delay()),
    };
    debug!("Merged server config: {:?}", server_config);
    Ok(server_config)
}

fn resolve_static_dir(dir: PathBuf) -> Result<PathBuf> {
    let resolved = dir
        .canonicalize()
        .with_context(|| format!("Static directory not found: {}", dir.display()))?;
    if !resolved.is_dir() {
        return Err(ChatbuddyError::Config(format!(
            "Static path '{}' is not a directory.",
            resolved.display()
        ))
        .into());
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn defaults_come_from_config() {
        let merged = load_and_merge_config(&SrvArgs::default(), &Config::default()).unwrap();
        assert_eq!(merged.port, 8000);
        assert_eq!(merged.host, IpAddr::from([127, 0, 0, 1]));
        assert!(merged.static_dir.is_none());
        assert!(merged.enable_cors);
        assert_eq!(merged.reply_delay, Duration::from_millis(500));
    }

    #[test]
    fn flags_override_config() {
        let temp = tempdir().unwrap();
        let args = SrvArgs {
            port: Some(9100),
            host: Some(IpAddr::from([0, 0, 0, 0])),
            static_dir: Some(temp.path().to_path_buf()),
            no_cors: true,
            delay_ms: Some(0),
        };
        let merged = load_and_merge_config(&args, &Config::default()).unwrap();
        assert_eq!(merged.port, 9100);
        assert_eq!(merged.host, IpAddr::from([0, 0, 0, 0]));
        assert_eq!(merged.static_dir, Some(temp.path().canonicalize().unwrap()));
        assert!(!merged.enable_cors);
        assert_eq!(merged.reply_delay, Duration::ZERO);
    }

    #[test]
    fn missing_static_dir_is_an_error() {
        let temp = tempdir().unwrap();
        let args = SrvArgs {
            static_dir: Some(temp.path().join("nope")),
            ..Default::default()
        };
        let err = load_and_merge_config(&args, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("Static directory not found"));
    }

    #[test]
    fn static_file_is_not_a_directory() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("index.html");
        fs::write(&file, "<html></html>").unwrap();
        let args = SrvArgs {
            static_dir: Some(file),
            ..Default::default()
        };
        let err = load_and_merge_config(&args, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("is not a directory"));
    }
}
