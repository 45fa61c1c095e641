//! # SiteKit Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! Foundational pieces shared by the command modules:
//! - `config`: Configuration loading, merging, and validation
//! - `error`: Error types and the crate-wide `Result` alias
//! - `templating`: HTML rendering of chat messages
//!
//! ## Usage
//!
//! ```ignore
//! use crate::core::config; // For loading configuration
//! use crate::core::error::{SiteKitError, Result}; // For error handling
//! use crate::core::templating; // For rendering chat message fragments
//! ```
//!
pub mod config;
pub mod error;
pub mod templating;
