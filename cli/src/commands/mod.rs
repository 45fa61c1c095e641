//! # SiteKit Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! This module aggregates all top-level command groups of the SiteKit CLI.
//!
//! ## Command Groups
//!
//! - `chat`: Keyword chatbot session (interactive or one-shot)
//! - `kb`: Knowledge base inspection and validation
//! - `srv`: Site server with the chat API
//!
//! Each command group defines its own arguments structure and handler
//! function; subcommands are declared inside the group's own `mod.rs`.
//!

/// Keyword chatbot in the terminal. Interactive by default, one-shot with `--ask`.
pub mod chat;
/// Knowledge base tools. Includes subcommands `list` and `check`.
pub mod kb;
/// Static site server exposing `POST /api/chat`.
pub mod srv;
