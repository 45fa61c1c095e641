//! # SiteKit Knowledge Base Command Group
//!
//! File: cli/src/commands/kb/mod.rs
//!
//! ## Overview
//!
//! Entry point for `sitekit kb`, the tools for inspecting knowledge bases:
//! - `list`: print the keys of the active knowledge base in lookup order
//! - `check`: validate a knowledge base file
//!
//! ## Examples
//!
//! ```bash
//! # Keys of the configured (or built-in) knowledge base
//! sitekit kb list
//!
//! # Validate a file before pointing the config at it
//! sitekit kb check kb/java.toml
//! ```
//!
use crate::core::error::Result;
use clap::{Parser, Subcommand};

/// Handler and arguments for `sitekit kb check`.
mod check;
/// Handler and arguments for `sitekit kb list`.
mod list;

/// # Knowledge Base Command Group Arguments (`KbArgs`)
#[derive(Parser, Debug)]
pub struct KbArgs {
    #[command(subcommand)]
    command: KbCommand,
}

/// # Knowledge Base Subcommands (`KbCommand`)
#[derive(Subcommand, Debug)]
enum KbCommand {
    /// Lists knowledge base keys in lookup order.
    #[command(alias = "ls")]
    List(list::ListArgs),
    /// Validates a knowledge base file.
    Check(check::CheckArgs),
}

/// # Handle Knowledge Base Command (`handle_kb`)
///
/// Dispatches to the selected subcommand handler.
pub async fn handle_kb(args: KbArgs) -> Result<()> {
    match args.command {
        KbCommand::List(list_args) => list::handle_list(list_args).await?,
        KbCommand::Check(check_args) => check::handle_check(check_args).await?,
    }
    Ok(())
}
