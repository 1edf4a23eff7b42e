//! # ChatBuddy Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration test crates in `cli/tests/`. Every
//! command built here runs inside a fresh temporary directory that also
//! serves as its config home, so a developer's own configuration files
//! never leak into the tests.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use tempfile::TempDir;

/// An isolated `chatbuddy` invocation. Keep the `TempDir` alive until the
/// command has run.
pub fn chatbuddy_cmd() -> (Command, TempDir) {
    let sandbox = tempfile::tempdir().expect("Failed to create sandbox dir");
    let mut cmd = Command::cargo_bin("chatbuddy").expect("Failed to find chatbuddy binary for testing");
    cmd.current_dir(sandbox.path())
        .env("XDG_CONFIG_HOME", sandbox.path().join("config"))
        .env("HOME", sandbox.path())
        .env_remove("CHATBUDDY_CONFIG")
        .env_remove("CHATBUDDY_NAME")
        .env_remove("CHATBUDDY_REPLY_DELAY_MS")
        .env_remove("RUST_LOG");
    (cmd, sandbox)
}

/// Writes `.chatbuddy.toml` into the sandbox so it is picked up as project config.
pub fn write_project_config(sandbox: &TempDir, contents: &str) {
    std::fs::write(sandbox.path().join(".chatbuddy.toml"), contents)
        .expect("Failed to write project config");
}
