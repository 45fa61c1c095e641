//! # SiteKit Chatbot
//!
//! File: cli/src/chatbot/mod.rs
//!
//! ## Overview
//!
//! The rule-based chatbot of the tracker page:
//! - `knowledge`: the static phrase → response table (`KnowledgeBase`)
//! - `responder`: longest-substring keyword lookup (`KeywordResponder`, `respond`)
//! - `session`: transcript handling and input filtering (`ChatSession`)
//!
//! ## Usage
//!
//! ```ignore
//! let responder = Arc::new(KeywordResponder::new(KnowledgeBase::builtin(), DEFAULT_FALLBACK));
//! let mut session = ChatSession::new(responder);
//! if let Some(reply) = session.send_message("What is Java?") {
//!     println!("{reply}");
//! }
//! ```
//!
pub mod knowledge;
pub mod responder;
pub mod session;

use crate::core::config::ChatbotConfig;
use crate::core::error::Result;
use knowledge::KnowledgeBase;
use responder::KeywordResponder;
use std::path::Path;
use tracing::info;

/// Builds the responder described by the `[chatbot]` configuration section.
///
/// Uses the knowledge file when one is configured, the built-in Java set otherwise.
pub fn build_responder(config: &ChatbotConfig) -> Result<KeywordResponder> {
    let knowledge = match &config.knowledge_file {
        Some(path) => KnowledgeBase::load(Path::new(path))?,
        None => {
            info!("Using built-in Java knowledge base");
            KnowledgeBase::builtin()
        }
    };
    Ok(KeywordResponder::new(knowledge, config.fallback.clone()))
}
