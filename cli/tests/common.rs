//! # SiteKit CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Every command
//! runs against an explicit, empty configuration file (via `SITEKIT_CONFIG`)
//! so the developer's own user or project configuration cannot leak in.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated working area for one test: a temp dir holding the config file.
pub struct TestEnv {
    pub dir: TempDir,
    pub config_path: PathBuf,
}

impl TestEnv {
    /// Creates a temp dir with an empty `sitekit.toml`.
    pub fn new() -> Self {
        Self::with_config("")
    }

    /// Creates a temp dir whose config file holds `config`.
    pub fn with_config(config: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = dir.path().join("sitekit.toml");
        fs::write(&config_path, config).expect("Failed to write test config");
        Self { dir, config_path }
    }

    /// Writes a file relative to the temp dir and returns its path.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, content).expect("Failed to write test file");
        path
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// `sitekit` command pointed at this environment's config.
    pub fn cmd(&self) -> Command {
        let mut cmd = sitekit_cmd();
        cmd.env("SITEKIT_CONFIG", &self.config_path)
            .env_remove("RUST_LOG")
            .current_dir(self.dir.path());
        cmd
    }
}

/// # Get SiteKit Command (`sitekit_cmd`)
///
/// `assert_cmd::Command` for the compiled `sitekit` binary.
pub fn sitekit_cmd() -> Command {
    Command::cargo_bin("sitekit").expect("Failed to find sitekit binary for testing")
}

/// Two-entry knowledge base used by several tests.
pub const SCENARIO_KB: &str = r#"
[[entry]]
key = "oop in java"
response = "R1"

[[entry]]
key = "java"
response = "R2"
"#;
