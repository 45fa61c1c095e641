//! # SiteKit Knowledge Base Check Command
//!
//! File: cli/src/commands/kb/check.rs
//!
//! Loads a knowledge base file with full validation and reports the result.
//! Also points out keys that can never be selected because a longer key
//! containing them always takes precedence when both occur.
//!
use crate::chatbot::knowledge::KnowledgeBase;
use crate::core::error::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

/// # Check Arguments (`CheckArgs`)
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Knowledge base file to validate.
    pub file: PathBuf,
}

/// # Handle Check Command (`handle_check`)
///
/// Fails with the validation error if the file cannot be loaded.
pub async fn handle_check(args: CheckArgs) -> Result<()> {
    debug!("Handling kb check for {}", args.file.display());
    let knowledge = KnowledgeBase::load(&args.file)?;

    println!(
        "OK: {} ({} entries)",
        args.file.display(),
        knowledge.len()
    );
    for (inner, outer) in shadowed_keys(&knowledge) {
        println!(
            "  note: \"{}\" is contained in \"{}\"; queries mentioning the longer phrase get its response",
            inner, outer
        );
    }
    Ok(())
}

/// Pairs `(shorter, longer)` where the shorter key is a substring of the longer one.
fn shadowed_keys(knowledge: &KnowledgeBase) -> Vec<(&str, &str)> {
    let entries = knowledge.entries();
    let mut pairs = Vec::new();
    for inner in entries {
        for outer in entries {
            if inner.key_len() < outer.key_len() && outer.key().contains(inner.key()) {
                pairs.push((inner.key(), outer.key()));
            }
        }
    }
    pairs
}
