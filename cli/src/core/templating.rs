//! # SiteKit Templating
//!
//! File: cli/src/core/templating.rs
//!
//! ## Overview
//!
//! Renders chat messages as the HTML fragments the chat widget appends to its
//! message list:
//!
//! ```html
//! <div class="chat-message bot"><p>...</p></div>
//! ```
//!
//! Rendering goes through Tera with auto-escaping on, so user text such as
//! `<b>hi</b>` is displayed literally instead of being injected as markup.
//!
use crate::chatbot::session::ChatMessage;
use crate::core::error::{Result, SiteKitError};
use anyhow::anyhow;
use tera::{Context, Tera};
use tracing::trace;

const MESSAGE_TEMPLATE: &str =
    r#"<div class="chat-message {{ role }}"><p>{{ text }}</p></div>"#;

/// Renders a single message bubble.
pub fn render_message(message: &ChatMessage) -> Result<String> {
    let context = Context::from_serialize(message).map_err(|e| {
        anyhow!(SiteKitError::Template { source: e })
            .context("Failed to create Tera context from chat message")
    })?;
    let rendered = Tera::one_off(MESSAGE_TEMPLATE, &context, true).map_err(|e| {
        anyhow!(SiteKitError::Template { source: e }).context("Tera rendering failed for chat message")
    })?;
    trace!("Rendered chat message: {}", rendered);
    Ok(rendered)
}
