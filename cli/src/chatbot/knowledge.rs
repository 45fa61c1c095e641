//! # SiteKit Knowledge Base
//!
//! File: cli/src/chatbot/knowledge.rs
//!
//! ## Overview
//!
//! A `KnowledgeBase` is the static phrase → response table behind the chatbot.
//! It is built once (from the built-in Java set or a TOML file) and never
//! modified afterwards.
//!
//! ## Ordering
//!
//! Entries are kept in insertion order. The responder scans them in that order,
//! so when two matching keys have the same length the one listed first wins.
//!
//! ## File Format
//!
//! ```toml
//! [[entry]]
//! key = "what is java"
//! response = "Java is a high-level, object-oriented programming language..."
//!
//! [[entry]]
//! key = "collections"
//! response = "Java Collections Framework (java.util) provides..."
//! ```
//!
use crate::core::error::{Result, SiteKitError};
use anyhow::Context;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Entries of the built-in Java knowledge base, in lookup order.
const JAVA_KNOWLEDGE: &[(&str, &str)] = &[
    (
        "what is java",
        "Java is a high-level, object-oriented programming language designed for platform independence. Created by James Gosling at Sun Microsystems in 1995, it runs on the JVM, enabling \"Write Once, Run Anywhere.\" Key features: OOP, garbage collection, multithreading, and vast standard library.",
    ),
    (
        "oop in java",
        "OOP in Java revolves around four pillars: Encapsulation (data hiding), Inheritance (reusability), Polymorphism (flexibility), Abstraction (simplification). Java enforces OOP strictly—everything is an object (except primitives). Use classes for blueprints, interfaces for contracts.",
    ),
    (
        "collections",
        "Java Collections Framework (java.util) provides resizable data structures: Lists (ordered), Sets (unique), Maps (key-value), Queues (FIFO). Core: ArrayList (dynamic array), HashMap (hash table), TreeSet (sorted set). Essential for DSA—know time complexities!",
    ),
    (
        "threads",
        "Multithreading in Java allows concurrent execution. Create via Thread class or Runnable interface. Manage with synchronized, Locks, Executors. Java 21 introduces virtual threads for lightweight concurrency. Pitfalls: race conditions, deadlocks—use volatile for visibility.",
    ),
    (
        "best practices",
        "Java Best Practices: 1) Favor immutability (final fields), 2) Use try-with-resources for I/O, 3) Override equals/hashCode properly, 4) Prefer Streams over loops, 5) Tune GC for performance, 6) Write unit tests (JUnit), 7) Follow SOLID principles for clean code.",
    ),
];

/// A single phrase → response pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    key: String,
    response: String,
}

impl Entry {
    /// The lowercase phrase searched for in queries.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The canned text returned when this entry is the match.
    pub fn response(&self) -> &str {
        &self.response
    }

    /// Key length in characters; used to rank competing matches.
    pub fn key_len(&self) -> usize {
        self.key.chars().count()
    }
}

/// Immutable, insertion-ordered phrase → response table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnowledgeBase {
    entries: Vec<Entry>,
}

/// On-disk shape of a knowledge base file.
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct KnowledgeFile {
    #[serde(default, rename = "entry")]
    entries: Vec<EntryDef>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct EntryDef {
    key: String,
    response: String,
}

impl KnowledgeBase {
    /// Builds a knowledge base from `(key, response)` pairs, preserving order.
    ///
    /// Keys are lowercased, since queries are lowercased before matching and a
    /// key containing uppercase letters could never match otherwise. Surrounding
    /// whitespace is kept: `" go "` only matches `go` as a separate word.
    ///
    /// ## Errors
    ///
    /// - `SiteKitError::EmptyKey` if a key is empty or whitespace-only.
    /// - `SiteKitError::EmptyResponse` if a response is empty.
    /// - `SiteKitError::DuplicateKey` if two keys are equal after normalisation.
    pub fn new<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for (index, (key, response)) in pairs.into_iter().enumerate() {
            let key = key.as_ref().to_lowercase();
            if key.trim().is_empty() {
                return Err(SiteKitError::EmptyKey { index }.into());
            }
            let response = response.into();
            if response.trim().is_empty() {
                return Err(SiteKitError::EmptyResponse { key }.into());
            }
            if !seen.insert(key.clone()) {
                return Err(SiteKitError::DuplicateKey { key }.into());
            }
            entries.push(Entry { key, response });
        }

        debug!("Built knowledge base with {} entries", entries.len());
        Ok(Self { entries })
    }

    /// The Java knowledge base shipped with the tracker page.
    pub fn builtin() -> Self {
        Self {
            entries: JAVA_KNOWLEDGE
                .iter()
                .map(|(key, response)| Entry {
                    key: (*key).to_string(),
                    response: (*response).to_string(),
                })
                .collect(),
        }
    }

    /// Parses a knowledge base from TOML text (see module docs for the format).
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: KnowledgeFile =
            toml::from_str(content).context("Failed to parse knowledge base TOML")?;
        if file.entries.is_empty() {
            warn!("Knowledge base contains no entries; every query will get the fallback.");
        }
        Self::new(file.entries.into_iter().map(|e| (e.key, e.response)))
    }

    /// Reads and parses a knowledge base file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(SiteKitError::KnowledgeBase(format!(
                "Knowledge file not found: {}",
                path.display()
            ))
            .into());
        }
        info!("Loading knowledge base from {}", path.display());
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read knowledge file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid knowledge file: {}", path.display()))
    }

    /// Entries in lookup order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Response bound to exactly `key` (case-insensitive).
    pub fn get(&self, key: &str) -> Option<&str> {
        let key = key.to_lowercase();
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.response.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
