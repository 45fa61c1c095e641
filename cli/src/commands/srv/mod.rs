//! # SiteKit Site Server
//!
//! File: cli/src/commands/srv/mod.rs
//!
//! ## Overview
//!
//! Serves a guide/tracker site directory for local development, together
//! with the chatbot endpoint the tracker page posts to.
//!
//! ## Architecture
//!
//! - `config.rs`: Merges CLI arguments with the `[server]` configuration
//! - `server_logic.rs`: Axum router, API handlers, port fallback, shutdown
//! - `utils.rs`: Startup helpers (page listing, local IP)
//!
//! ## Examples
//!
//! ```bash
//! # Serve the current directory
//! sitekit srv
//!
//! # Serve ./public on port 9000 with a custom knowledge base
//! sitekit srv --port 9000 --knowledge kb/java.toml ./public
//! ```
//!
use crate::chatbot;
use crate::core::config::{load_config, ConfigOverrides};
use crate::core::error::Result;
use std::sync::Arc;
use tracing::info;

pub use config::SrvArgs;

/// Merges CLI arguments with the server configuration.
pub mod config;

/// Axum-based HTTP server implementation.
pub mod server_logic;

/// Startup helpers.
pub mod utils;

/// # Handle Server Command (`handle_srv`)
///
/// Loads configuration, builds the keyword responder and runs the server
/// until it is shut down.
pub async fn handle_srv(args: SrvArgs) -> Result<()> {
    info!("Handling srv command with args: {:?}", args);

    let settings = load_config(&ConfigOverrides::knowledge(args.knowledge.as_deref()))?;

    let server_config = config::load_and_merge_config(&args, &settings.server).await?;
    info!("Effective server config: {:?}", server_config);

    let responder = Arc::new(chatbot::build_responder(&settings.chatbot)?);
    server_logic::run_server(server_config, responder).await?;

    Ok(())
}
