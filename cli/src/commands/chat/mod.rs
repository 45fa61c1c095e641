//! # SiteKit Chat Command
//!
//! File: cli/src/commands/chat/mod.rs
//!
//! ## Overview
//!
//! Runs the tracker page's keyword chatbot in the terminal.
//!
//! - With `--ask`, each question is answered once and the command exits.
//! - Otherwise an interactive session reads questions from stdin, one per
//!   line, until end of input or `/quit`. Each question is echoed as
//!   `you> ...` at once and the `bot> ...` reply follows after the
//!   configured typing delay.
//!
//! ## Examples
//!
//! ```bash
//! # One-shot questions
//! sitekit chat --ask "What is Java?" --ask "threads?"
//!
//! # Interactive session with a custom knowledge base and no delay
//! sitekit chat --knowledge kb/java.toml --delay-ms 0
//!
//! # Print the HTML fragments the chat widget would append
//! sitekit chat --html --ask "collections"
//! ```
//!
use crate::chatbot::{
    self,
    session::{ChatMessage, ChatSession, Role},
};
use crate::core::config::{load_config, ConfigOverrides};
use crate::core::error::Result;
use crate::core::templating;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};

const QUIT_COMMAND: &str = "/quit";

/// # Chat Command Arguments (`ChatArgs`)
#[derive(Parser, Debug, Default)]
pub struct ChatArgs {
    /// Question to answer without starting an interactive session. Repeatable.
    #[arg(long, short)]
    pub ask: Vec<String>,

    /// Knowledge base file, overriding `chatbot.knowledge_file`.
    #[arg(long, short)]
    pub knowledge: Option<PathBuf>,

    /// Typing delay before each reply in milliseconds, overriding `chatbot.reply_delay_ms`.
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Print messages as chat widget HTML fragments.
    #[arg(long)]
    pub html: bool,

    /// Print the knowledge base key each reply was chosen by.
    #[arg(long)]
    pub explain: bool,
}

/// # Handle Chat Command (`handle_chat`)
///
/// ## Process
///
/// 1. Loads configuration, with `--knowledge` replacing `chatbot.knowledge_file`.
/// 2. Builds the keyword responder and a fresh chat session.
/// 3. Answers every `--ask` question immediately, or starts the interactive
///    session with the configured typing delay.
///
/// ## Errors
///
/// Fails if the configuration or knowledge base cannot be loaded, or if
/// reading stdin or writing stdout fails.
pub async fn handle_chat(args: ChatArgs) -> Result<()> {
    debug!("Handling chat command with args: {:?}", args);

    let settings = load_config(&ConfigOverrides::knowledge(args.knowledge.as_deref()))?;
    let delay = Duration::from_millis(args.delay_ms.unwrap_or(settings.chatbot.reply_delay_ms));

    let responder = Arc::new(chatbot::build_responder(&settings.chatbot)?);
    info!(
        "Chatbot ready with {} knowledge base entries",
        responder.knowledge().len()
    );
    let mut session = ChatSession::new(responder);

    if !args.ask.is_empty() {
        for question in &args.ask {
            exchange(&mut session, question, &args, Duration::ZERO).await?;
        }
        return Ok(());
    }

    run_interactive(&mut session, &args, delay).await
}

/// Reads questions from stdin until EOF or `/quit`.
async fn run_interactive(session: &mut ChatSession, args: &ChatArgs, delay: Duration) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    if !args.html {
        stdout
            .write_all(b"Ask a question (Ctrl+D or /quit to exit).\n")
            .await?;
        stdout.flush().await?;
    }

    while let Some(line) = lines.next_line().await? {
        if line.trim() == QUIT_COMMAND {
            break;
        }
        exchange(session, &line, args, delay).await?;
    }

    debug!("Chat session ended after {} messages", session.messages().len());
    Ok(())
}

/// Sends one question and prints both sides of the exchange.
///
/// The question is shown right away; the reply follows after `delay`.
async fn exchange(
    session: &mut ChatSession,
    question: &str,
    args: &ChatArgs,
    delay: Duration,
) -> Result<()> {
    let question = question.trim();
    if question.is_empty() {
        debug!("Skipping empty question");
        return Ok(());
    }

    let asked = ChatMessage {
        role: Role::User,
        text: question.to_string(),
    };
    println!("{}", format_message(&asked, args.html)?);

    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let matched = session
        .responder()
        .find_match(question)
        .map(|m| m.key.to_string());
    let Some(reply) = session.send_message(question) else {
        return Ok(());
    };
    let answered = ChatMessage {
        role: Role::Bot,
        text: reply.to_string(),
    };
    println!("{}", format_message(&answered, args.html)?);

    if args.explain {
        match matched {
            Some(key) => println!("     (matched: {:?})", key),
            None => println!("     (no match, fallback)"),
        }
    }
    Ok(())
}

/// One message as a `you> ` / `bot> ` line, or as a chat widget fragment.
fn format_message(message: &ChatMessage, html: bool) -> Result<String> {
    if html {
        return templating::render_message(message);
    }
    let prompt = match message.role {
        Role::User => "you",
        Role::Bot => "bot",
    };
    Ok(format!("{}> {}", prompt, message.text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chatbot::responder::KeywordResponder;

    fn session() -> ChatSession {
        ChatSession::new(Arc::new(KeywordResponder::default()))
    }

    #[tokio::test]
    async fn test_exchange_records_pair() {
        let mut session = session();
        let args = ChatArgs::default();
        exchange(&mut session, "  what is java ", &args, Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.messages()[0].text, "what is java");
    }

    #[tokio::test]
    async fn test_exchange_skips_blank_question() {
        let mut session = session();
        let args = ChatArgs {
            html: true,
            explain: true,
            ..Default::default()
        };
        exchange(&mut session, "   ", &args, Duration::ZERO).await.unwrap();
        assert!(session.messages().is_empty());
    }

    #[test]
    fn test_format_message_prompts() {
        let asked = ChatMessage {
            role: Role::User,
            text: "threads?".into(),
        };
        let answered = ChatMessage {
            role: Role::Bot,
            text: "Use executors.".into(),
        };
        assert_eq!(format_message(&asked, false).unwrap(), "you> threads?");
        assert_eq!(format_message(&answered, false).unwrap(), "bot> Use executors.");
        assert_eq!(
            format_message(&asked, true).unwrap(),
            r#"<div class="chat-message user"><p>threads?</p></div>"#
        );
    }
}
