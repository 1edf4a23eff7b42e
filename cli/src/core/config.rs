//! # ChatBuddy Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! Loads, merges and validates the settings shared by every command: the bot's
//! name and reply delay, the initial theme, clock formats, and the defaults for
//! `chatbuddy srv`.
//!
//! Configuration sources (in order of precedence):
//! 1. Command-line flags (applied by each command on top of the loaded config)
//! 2. `--config <FILE>` if given, otherwise a project `.chatbuddy.toml` in the
//!    current directory or its ancestors (the search stops at a `.git` directory)
//! 3. User-specific `~/.config/chatbuddy/config.toml`
//! 4. Default values defined in the code
//!
//! ## Examples
//!
//! ```toml
//! [bot]
//! name = "Rusty"
//! reply_delay_ms = 250
//!
//! [display]
//! theme = "dark"
//! time_format = "%H:%M:%S"
//!
//! [server]
//! port = 9000
//! static_dir = "~/chatbuddy-web"
//! ```
//!
//! ```rust,ignore
//! let cfg = config::load_config(None)?;
//! let responder = cfg.responder();
//! ```
//!
use crate::bot::responder::{
    format_clock, DEFAULT_BOT_NAME, DEFAULT_DATE_FORMAT, DEFAULT_TIME_FORMAT,
};
use crate::bot::{Responder, Theme};
use crate::core::error::{ChatbuddyError, Result};
use anyhow::{anyhow, Context};
use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use directories::ProjectDirs;
use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

const PROJECT_CONFIG_FILENAME: &str = ".chatbuddy.toml";

/// Upper bound for the simulated typing delay.
pub const MAX_REPLY_DELAY_MS: u64 = 60_000;

/// The effective configuration, with every value resolved.
#[derive(Debug, Default, Clone)]
pub struct Config {
    pub bot: BotConfig,
    pub display: DisplayConfig,
    pub server: ServerSection,
}

/// How the bot presents itself and how long it "types".
#[derive(Debug, Clone, PartialEq)]
pub struct BotConfig {
    pub name: String,
    /// Delay between a user message and the bot's reply.
    pub reply_delay_ms: u64,
}

/// Theme and clock formatting.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayConfig {
    pub theme: Theme,
    /// chrono strftime format used for the "time" reply.
    pub time_format: String,
    /// chrono strftime format used for the "date" reply.
    pub date_format: String,
}

/// Defaults for `chatbuddy srv`.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSection {
    pub host: IpAddr,
    pub port: u16,
    /// Directory with the browser page (can use ~). Will be expanded.
    pub static_dir: Option<String>,
    pub enable_cors: bool,
}

/// One configuration file as written. Keys left out stay `None`, so a file
/// can restore a default that a lower-precedence file changed.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub bot: BotFile,
    #[serde(default)]
    pub display: DisplayFile,
    #[serde(default)]
    pub server: ServerFile,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct BotFile {
    pub name: Option<String>,
    pub reply_delay_ms: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct DisplayFile {
    pub theme: Option<Theme>,
    pub time_format: Option<String>,
    pub date_format: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct ServerFile {
    pub host: Option<IpAddr>,
    pub port: Option<u16>,
    pub static_dir: Option<String>,
    pub enable_cors: Option<bool>,
}

impl ConfigFile {
    /// Layers `self` over `lower`: every key set here wins.
    fn or(self, lower: ConfigFile) -> ConfigFile {
        ConfigFile {
            bot: BotFile {
                name: self.bot.name.or(lower.bot.name),
                reply_delay_ms: self.bot.reply_delay_ms.or(lower.bot.reply_delay_ms),
            },
            display: DisplayFile {
                theme: self.display.theme.or(lower.display.theme),
                time_format: self.display.time_format.or(lower.display.time_format),
                date_format: self.display.date_format.or(lower.display.date_format),
            },
            server: ServerFile {
                host: self.server.host.or(lower.server.host),
                port: self.server.port.or(lower.server.port),
                static_dir: self.server.static_dir.or(lower.server.static_dir),
                enable_cors: self.server.enable_cors.or(lower.server.enable_cors),
            },
        }
    }
}

impl From<ConfigFile> for Config {
    fn from(file: ConfigFile) -> Self {
        Config {
            bot: BotConfig {
                name: file.bot.name.unwrap_or_else(default_bot_name),
                reply_delay_ms: file
                    .bot
                    .reply_delay_ms
                    .unwrap_or_else(default_reply_delay_ms),
            },
            display: DisplayConfig {
                theme: file.display.theme.unwrap_or_default(),
                time_format: file.display.time_format.unwrap_or_else(default_time_format),
                date_format: file.display.date_format.unwrap_or_else(default_date_format),
            },
            server: ServerSection {
                host: file.server.host.unwrap_or_else(default_host),
                port: file.server.port.unwrap_or_else(default_port),
                static_dir: file.server.static_dir,
                enable_cors: file.server.enable_cors.unwrap_or(true),
            },
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            reply_delay_ms: default_reply_delay_ms(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            time_format: default_time_format(),
            date_format: default_date_format(),
        }
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
            enable_cors: true,
        }
    }
}

fn default_bot_name() -> String {
    DEFAULT_BOT_NAME.to_string()
}
fn default_reply_delay_ms() -> u64 {
    500
}
fn default_time_format() -> String {
    DEFAULT_TIME_FORMAT.to_string()
}
fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}
fn default_host() -> IpAddr {
    IpAddr::from([127, 0, 0, 1])
}
fn default_port() -> u16 {
    8000
}

impl Config {
    /// Builds the reply engine described by this configuration.
    pub fn responder(&self) -> Responder {
        Responder::new(
            &self.bot.name,
            &self.display.time_format,
            &self.display.date_format,
        )
    }

    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.bot.reply_delay_ms)
    }
}

/// Loads the effective configuration.
///
/// `explicit` replaces the project config search; unlike the discovered
/// files it must exist.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let user_config = load_user_config()?;
    let override_config = match explicit {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Some(load_config_from_path(path)?)
        }
        None => load_project_config()?,
    };
    let mut merged_config = merge_configs(user_config, override_config);
    expand_config_paths(&mut merged_config);
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<ConfigFile>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "ChatBuddy", "chatbuddy") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<ConfigFile>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(path) = find_project_config_path(&current_dir) {
        info!("Loading project configuration from: {}", path.display());
        load_config_from_path(&path).map(Some)
    } else {
        debug!("No project configuration file (.chatbuddy.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Keys set in the project (or `--config`) file win over the user file;
/// anything set in neither falls back to the built-in default.
fn merge_configs(user: Option<ConfigFile>, project: Option<ConfigFile>) -> Config {
    let user = user.unwrap_or_default();
    match project {
        Some(project) => project.or(user).into(),
        None => user.into(),
    }
}

fn expand_config_paths(config: &mut Config) {
    if let Some(dir) = config.server.static_dir.as_mut() {
        *dir = shellexpand::tilde(dir.as_str()).into_owned();
        debug!("Expanded static directory: {}", dir);
    }
}

/// Rejects unknown specifiers and ones a naive local time cannot render,
/// such as `%z`.
fn is_renderable_clock_format(format: &str) -> bool {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return false;
    }
    let sample = NaiveDate::from_ymd_opt(2024, 1, 2).and_then(|d| d.and_hms_opt(3, 4, 5));
    sample.is_some_and(|now| format_clock(now, format).is_some())
}

fn validate_config(config: &Config) -> Result<()> {
    info!("Validating final configuration...");
    if config.bot.name.trim().is_empty() {
        return Err(anyhow!(ChatbuddyError::Config(
            "bot.name must not be empty.".to_string()
        )));
    }
    if config.bot.reply_delay_ms > MAX_REPLY_DELAY_MS {
        return Err(anyhow!(ChatbuddyError::Config(format!(
            "bot.reply_delay_ms is {} but must be at most {}.",
            config.bot.reply_delay_ms, MAX_REPLY_DELAY_MS
        ))));
    }
    for (key, format) in [
        ("display.time_format", &config.display.time_format),
        ("display.date_format", &config.display.date_format),
    ] {
        if !is_renderable_clock_format(format) {
            return Err(anyhow!(ChatbuddyError::Config(format!(
                "Invalid strftime format for {}: '{}'.",
                key, format
            ))));
        }
    }
    if let Some(dir) = &config.server.static_dir {
        let dir = PathBuf::from(dir);
        if !dir.exists() {
            warn!(
                "Configured static directory '{}' does not exist.",
                dir.display()
            );
        } else if !dir.is_dir() {
            return Err(anyhow!(ChatbuddyError::Config(format!(
                "Configured static path '{}' exists but is not a directory.",
                dir.display()
            ))));
        }
    }
    info!("Configuration validation successful.");
    Ok(())
}
