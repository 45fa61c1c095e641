//! # SiteKit Server Configuration
//!
//! File: cli/src/commands/srv/config.rs
//!
//! ## Overview
//!
//! Builds the effective configuration for `sitekit srv` from:
//! 1. Command-line arguments (highest priority)
//! 2. The `[server]` section of the loaded SiteKit configuration
//! 3. Default values (lowest priority, already folded into 2)
//!
//! The site directory is then resolved to an absolute, canonical path and
//! checked to be an existing directory.
//!
//! ## Examples
//!
//! ```ignore
//! let settings = config::load_config(&ConfigOverrides::default())?;
//! let server_config = load_and_merge_config(&args, &settings.server).await?;
//! println!("Serving {} on {}:{}", server_config.directory.display(), server_config.host, server_config.port);
//! ```
//!
use crate::core::config::ServerSettings;
use crate::core::error::{Result, SiteKitError};
use anyhow::{anyhow, Context};
use clap::Parser;
use std::net::{IpAddr, Ipv4Addr};
use std::{env, path::PathBuf};
use tracing::debug;

/// # Server Command Arguments (`SrvArgs`)
///
/// Every option is optional so that an omitted flag falls back to the
/// configuration file instead of silently overriding it with a default.
#[derive(Parser, Debug, Default)]
pub struct SrvArgs {
    /// Site root directory. Defaults to `server.directory` (usually `.`).
    pub directory: Option<PathBuf>,

    /// Port to listen on. Defaults to `server.port` (8000).
    #[arg(long, short)]
    pub port: Option<u16>,

    /// IP address to bind. Defaults to `server.host` (127.0.0.1).
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Disables CORS headers.
    #[arg(long)]
    pub no_cors: bool,

    /// Knowledge base file for `/api/chat`, overriding `chatbot.knowledge_file`.
    #[arg(long, short)]
    pub knowledge: Option<PathBuf>,
}

/// # Effective Server Configuration (`ServerConfig`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub host: IpAddr,
    /// Resolved, absolute path of the site root.
    pub directory: PathBuf,
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            directory: PathBuf::from("."),
            enable_cors: true,
        }
    }
}

/// # Load and Merge Server Configuration (`load_and_merge_config`)
///
/// Starts from the `[server]` settings, applies any explicitly passed CLI
/// options, then resolves and validates the site directory.
///
/// ## Errors
///
/// Returns an error if the configured host is not an IP address, or if the
/// site directory does not exist or is not a directory.
pub async fn load_and_merge_config(
    args: &SrvArgs,
    settings: &ServerSettings,
) -> Result<ServerConfig> {
    let mut config = ServerConfig::from_settings(settings)?;

    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(directory) = &args.directory {
        config.directory = directory.clone();
    }
    if args.no_cors {
        config.enable_cors = false;
    }

    config.resolve_directory().await?;
    Ok(config)
}

impl ServerConfig {
    fn from_settings(settings: &ServerSettings) -> Result<Self> {
        let host = settings.host.parse().map_err(|e| {
            anyhow!(SiteKitError::Config(format!(
                "Invalid server host '{}': {}",
                settings.host, e
            )))
        })?;
        Ok(Self {
            port: settings.port,
            host,
            directory: PathBuf::from(&settings.directory),
            enable_cors: settings.enable_cors,
        })
    }

    /// # Resolve and Validate Directory Path (`resolve_directory`)
    ///
    /// Makes `directory` absolute (relative to the working directory),
    /// canonicalizes it and checks that it is a directory.
    async fn resolve_directory(&mut self) -> Result<()> {
        let absolute_path = if self.directory.is_absolute() {
            self.directory.clone()
        } else {
            env::current_dir()
                .context("Failed to get current working directory")?
                .join(&self.directory)
        };

        let canonical_path = tokio::fs::canonicalize(&absolute_path)
            .await
            .with_context(|| {
                format!(
                    "Directory '{}' could not be found or accessed",
                    absolute_path.display()
                )
            })?;
        let metadata = tokio::fs::metadata(&canonical_path)
            .await
            .with_context(|| {
                format!("Failed to get metadata for path '{}'", canonical_path.display())
            })?;
        if !metadata.is_dir() {
            return Err(anyhow!(SiteKitError::FileSystem(format!(
                "Path is not a directory: {}",
                canonical_path.display()
            ))));
        }

        self.directory = canonical_path;
        debug!("Resolved site directory to: {}", self.directory.display());
        Ok(())
    }
}
