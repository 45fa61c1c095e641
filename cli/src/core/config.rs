//! # SiteKit Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module implements loading, merging and validation of SiteKit
//! configuration. Settings cover the chatbot (knowledge file, fallback text,
//! reply delay), the page controller (mobile breakpoint, TOC offset) and the
//! site server defaults.
//!
//! Configuration sources (in order of precedence):
//! 1. The file named by `SITEKIT_CONFIG`, if set (replaces 2 and 3)
//! 2. Project-specific `.sitekit.toml` in current directory or ancestors
//! 3. User-specific `config.toml` in the platform config directory
//! 4. Default values defined in the code
//!
//! Command-line flags that name files (`--knowledge`) are passed in as
//! `ConfigOverrides` and replace the loaded values before paths are expanded
//! and the result is validated. Other flags are applied by the commands.
//!
//! ## Examples
//!
//! ```toml
//! [chatbot]
//! knowledge_file = "~/site/java-kb.toml"
//! reply_delay_ms = 250
//!
//! [ui]
//! mobile_breakpoint = 968
//!
//! [server]
//! port = 9000
//! directory = "public"
//! ```
//!
//! ```ignore
//! let cfg = config::load_config(&ConfigOverrides::default())?;
//! let responder = chatbot::build_responder(&cfg.chatbot)?;
//! ```
//!
use crate::chatbot::responder::DEFAULT_FALLBACK;
use crate::core::error::{Result, SiteKitError};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::net::IpAddr;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "SITEKIT_CONFIG";
const PROJECT_CONFIG_FILENAME: &str = ".sitekit.toml";

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub chatbot: ChatbotConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub server: ServerSettings,
}

/// Settings for the keyword chatbot (`sitekit chat`, `/api/chat`).
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ChatbotConfig {
    /// TOML knowledge base file (can use ~). Built-in Java set when absent.
    #[serde(default)]
    pub knowledge_file: Option<String>,
    /// Reply used when no key matches.
    #[serde(default = "default_fallback")]
    pub fallback: String,
    /// Cosmetic pause before a reply is shown, in milliseconds.
    #[serde(default = "default_reply_delay_ms")]
    pub reply_delay_ms: u64,
}

/// Settings for the page controller.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct UiConfig {
    /// Viewport widths at or below this are treated as mobile.
    #[serde(default = "default_mobile_breakpoint")]
    pub mobile_breakpoint: u32,
    /// Distance from the viewport top used to pick the active TOC section.
    #[serde(default = "default_toc_offset")]
    pub toc_offset: f64,
}

/// Default settings for `sitekit srv`.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerSettings {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
    /// Site root (can use ~).
    #[serde(default = "default_directory")]
    pub directory: String,
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,
}

fn default_fallback() -> String {
    DEFAULT_FALLBACK.to_string()
}
fn default_reply_delay_ms() -> u64 {
    500
}
fn default_mobile_breakpoint() -> u32 {
    968
}
fn default_toc_offset() -> f64 {
    100.0
}
fn default_port() -> u16 {
    8000
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_directory() -> String {
    ".".to_string()
}
fn default_enable_cors() -> bool {
    true
}

impl Default for ChatbotConfig {
    fn default() -> Self {
        Self {
            knowledge_file: None,
            fallback: default_fallback(),
            reply_delay_ms: default_reply_delay_ms(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint: default_mobile_breakpoint(),
            toc_offset: default_toc_offset(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            directory: default_directory(),
            enable_cors: default_enable_cors(),
        }
    }
}

/// Command-line values that take part in path expansion and validation.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConfigOverrides {
    pub knowledge_file: Option<PathBuf>,
}

impl ConfigOverrides {
    pub fn knowledge(path: Option<&Path>) -> Self {
        Self {
            knowledge_file: path.map(Path::to_path_buf),
        }
    }
}

/// # Load Configuration (`load_config`)
///
/// ## Process
///
/// 1. Reads `SITEKIT_CONFIG` if set, otherwise merges the user and project files.
/// 2. Applies command-line `overrides`.
/// 3. Expands `~` in paths.
/// 4. Validates the result.
///
/// ## Errors
///
/// Returns an error if a configuration file cannot be read or parsed, or if
/// the final configuration is invalid (e.g. a missing knowledge file).
pub fn load_config(overrides: &ConfigOverrides) -> Result<Config> {
    let merged_config = match env::var_os(CONFIG_ENV_VAR) {
        Some(path) => {
            let path = PathBuf::from(path);
            info!(
                "Loading configuration from {} ({})",
                path.display(),
                CONFIG_ENV_VAR
            );
            load_config_from_path(&path)?
        }
        None => {
            let user_config = load_user_config()?;
            let project_config = load_project_config()?;
            merge_configs(user_config.unwrap_or_default(), project_config)
        }
    };
    finalize_config(merged_config, overrides)
}

/// Applies overrides, then expands and validates the merged configuration.
fn finalize_config(mut config: Config, overrides: &ConfigOverrides) -> Result<Config> {
    apply_overrides(&mut config, overrides);
    expand_config_paths(&mut config).context("Failed to expand paths in configuration")?;
    validate_config(&config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", config);
    Ok(config)
}

fn load_user_config() -> Result<Option<Config>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "SiteKit", "sitekit") {
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

fn load_project_config() -> Result<Option<Config>> {
    let current_dir = env::current_dir().context("Failed to get current directory")?;
    if let Some(project_config_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file (.sitekit.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

/// Walks up from `start` looking for `.sitekit.toml`, stopping at a `.git` directory.
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

pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Project values win wherever they differ from the built-in defaults.
fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let project = match project {
        Some(p) => p,
        None => return user,
    };
    let defaults = Config::default();

    fn pick<T: PartialEq>(project: T, user: T, default: &T) -> T {
        if &project != default {
            project
        } else {
            user
        }
    }

    Config {
        chatbot: ChatbotConfig {
            knowledge_file: project.chatbot.knowledge_file.or(user.chatbot.knowledge_file),
            fallback: pick(
                project.chatbot.fallback,
                user.chatbot.fallback,
                &defaults.chatbot.fallback,
            ),
            reply_delay_ms: pick(
                project.chatbot.reply_delay_ms,
                user.chatbot.reply_delay_ms,
                &defaults.chatbot.reply_delay_ms,
            ),
        },
        ui: UiConfig {
            mobile_breakpoint: pick(
                project.ui.mobile_breakpoint,
                user.ui.mobile_breakpoint,
                &defaults.ui.mobile_breakpoint,
            ),
            toc_offset: pick(
                project.ui.toc_offset,
                user.ui.toc_offset,
                &defaults.ui.toc_offset,
            ),
        },
        server: ServerSettings {
            port: pick(project.server.port, user.server.port, &defaults.server.port),
            host: pick(project.server.host, user.server.host, &defaults.server.host),
            directory: pick(
                project.server.directory,
                user.server.directory,
                &defaults.server.directory,
            ),
            enable_cors: pick(
                project.server.enable_cors,
                user.server.enable_cors,
                &defaults.server.enable_cors,
            ),
        },
    }
}

fn apply_overrides(config: &mut Config, overrides: &ConfigOverrides) {
    if let Some(path) = &overrides.knowledge_file {
        debug!("Knowledge file overridden on the command line: {}", path.display());
        config.chatbot.knowledge_file = Some(path.to_string_lossy().into_owned());
    }
}

fn expand_config_paths(config: &mut Config) -> Result<()> {
    if let Some(path) = config.chatbot.knowledge_file.as_mut() {
        *path = shellexpand::tilde(path.as_str()).into_owned();
        debug!("Expanded knowledge file path: {}", path);
    }
    config.server.directory = shellexpand::tilde(&config.server.directory).into_owned();
    Ok(())
}

fn validate_config(config: &Config) -> Result<()> {
    debug!("Validating final configuration...");
    if let Some(path) = &config.chatbot.knowledge_file {
        let path = PathBuf::from(path);
        if !path.is_file() {
            return Err(anyhow!(SiteKitError::Config(format!(
                "Configured knowledge file '{}' does not exist or is not a file.",
                path.display()
            ))));
        }
    }
    if config.chatbot.fallback.trim().is_empty() {
        return Err(anyhow!(SiteKitError::Config(
            "Chatbot fallback text cannot be empty.".to_string()
        )));
    }
    if config.ui.mobile_breakpoint == 0 {
        return Err(anyhow!(SiteKitError::Config(
            "ui.mobile_breakpoint must be greater than zero.".to_string()
        )));
    }
    if !config.ui.toc_offset.is_finite() || config.ui.toc_offset < 0.0 {
        return Err(anyhow!(SiteKitError::Config(format!(
            "ui.toc_offset must be a non-negative number, got {}.",
            config.ui.toc_offset
        ))));
    }
    if config.server.host.parse::<IpAddr>().is_err() {
        return Err(anyhow!(SiteKitError::Config(format!(
            "Invalid server host '{}'. Expected an IP address.",
            config.server.host
        ))));
    }
    debug!("Configuration validation successful.");
    Ok(())
}
