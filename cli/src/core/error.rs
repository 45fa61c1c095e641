//! # SiteKit Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout the SiteKit application.
//! The keyword responder itself never fails; errors only arise at the edges:
//! reading configuration, loading knowledge bases, rendering templates and
//! serving files.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `SiteKitError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! ## Examples
//!
//! ```ignore
//! // Return a specific error type
//! if key.trim().is_empty() {
//!     return Err(SiteKitError::EmptyKey { index })?;
//! }
//!
//! // Add context to errors using anyhow
//! let content = fs::read_to_string(&path)
//!     .with_context(|| format!("Failed to read knowledge file: {}", path.display()))?;
//! ```
//!
use thiserror::Error;

/// Custom error type for the SiteKit application.
#[derive(Error, Debug)]
pub enum SiteKitError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    #[error("Knowledge base error: {0}")]
    KnowledgeBase(String),

    #[error("Knowledge base entry {index} has an empty key.")]
    EmptyKey { index: usize },

    #[error("Knowledge base entry '{key}' has an empty response.")]
    EmptyResponse { key: String },

    #[error("Duplicate knowledge base key '{key}'.")]
    DuplicateKey { key: String },

    #[error("Template rendering error: {source}")]
    Template {
        #[from]
        source: tera::Error,
    },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
