//! # SiteKit Knowledge Base List Command
//!
//! File: cli/src/commands/kb/list.rs
//!
//! Prints the keys of the active knowledge base in the order the responder
//! scans them. `--responses` adds the bound text under each key.
//!
use crate::chatbot::{self, knowledge::KnowledgeBase};
use crate::core::config::{load_config, ConfigOverrides};
use crate::core::error::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

/// # List Arguments (`ListArgs`)
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Knowledge base file to list instead of the configured one.
    #[arg(long, short)]
    pub knowledge: Option<PathBuf>,

    /// Also print each key's response.
    #[arg(long)]
    pub responses: bool,
}

/// # Handle List Command (`handle_list`)
pub async fn handle_list(args: ListArgs) -> Result<()> {
    debug!("Handling kb list with args: {:?}", args);
    let settings = load_config(&ConfigOverrides::knowledge(args.knowledge.as_deref()))?;
    let responder = chatbot::build_responder(&settings.chatbot)?;

    let source = settings
        .chatbot
        .knowledge_file
        .as_deref()
        .unwrap_or("built-in Java knowledge base");
    println!("Knowledge base: {}", source);
    print!("{}", format_listing(responder.knowledge(), args.responses));
    Ok(())
}

/// Numbered key listing, one key per line.
fn format_listing(knowledge: &KnowledgeBase, with_responses: bool) -> String {
    if knowledge.is_empty() {
        return "  (no entries)\n".to_string();
    }
    let mut out = String::new();
    for (i, entry) in knowledge.entries().iter().enumerate() {
        out.push_str(&format!("  {:>3}. {}\n", i + 1, entry.key()));
        if with_responses {
            out.push_str(&format!("       {}\n", entry.response()));
        }
    }
    out
}
