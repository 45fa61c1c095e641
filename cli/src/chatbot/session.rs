//! # SiteKit Chat Session
//!
//! File: cli/src/chatbot/session.rs
//!
//! ## Overview
//!
//! Holds the transcript of one chatbot window. Input is trimmed and
//! whitespace-only messages are dropped before they reach the responder.
//! Each accepted message produces a user entry followed by a bot entry.
//!
//! The typing delay shown before a reply is the caller's business; the
//! session records the reply as soon as it is computed.
//!
use super::responder::KeywordResponder;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

impl Role {
    /// CSS modifier used by the chat widget (`chat-message user|bot`).
    pub fn css_class(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Bot => "bot",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

/// One chatbot conversation.
#[derive(Debug)]
pub struct ChatSession {
    responder: Arc<KeywordResponder>,
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new(responder: Arc<KeywordResponder>) -> Self {
        Self {
            responder,
            messages: Vec::new(),
        }
    }

    /// Sends `input` and returns the bot's reply.
    ///
    /// Returns `None` without touching the transcript when the trimmed input is empty.
    pub fn send_message(&mut self, input: &str) -> Option<&str> {
        let message = input.trim();
        if message.is_empty() {
            debug!("Ignoring empty chat message");
            return None;
        }

        let reply = self.responder.respond(message).to_string();
        self.messages.push(ChatMessage {
            role: Role::User,
            text: message.to_string(),
        });
        self.messages.push(ChatMessage {
            role: Role::Bot,
            text: reply,
        });
        self.messages.last().map(|m| m.text.as_str())
    }

    /// Preset question buttons submit their text as if typed.
    pub fn ask_question(&mut self, question: &str) -> Option<&str> {
        self.send_message(question)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn responder(&self) -> &KeywordResponder {
        &self.responder
    }
}
