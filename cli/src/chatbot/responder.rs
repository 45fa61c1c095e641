//! # SiteKit Keyword Responder
//!
//! File: cli/src/chatbot/responder.rs
//!
//! ## Overview
//!
//! Picks a canned answer for a free-text question. The lowercased query is
//! checked against every knowledge base key; of the keys that occur in it as a
//! substring, the longest wins. Equal lengths resolve to the key listed first.
//! When nothing matches, the fallback text is returned.
//!
//! The lookup is total and pure: any string in, a string out, no side effects.
//!
//! ## Examples
//!
//! ```ignore
//! let kb = KnowledgeBase::new([("oop in java", "R1"), ("java", "R2")])?;
//! assert_eq!(respond("tell me about OOP in Java please", &kb), "R1");
//! assert_eq!(respond("random unrelated text", &kb), DEFAULT_FALLBACK);
//! ```
//!
use super::knowledge::{Entry, KnowledgeBase};
use tracing::trace;

/// Reply used when no knowledge base key occurs in the query.
pub const DEFAULT_FALLBACK: &str =
    "I'm your Java expert! Ask about OOP, Collections, Threads, JVM, Streams, or best practices.";

/// The knowledge base entry selected for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'a> {
    pub key: &'a str,
    pub response: &'a str,
}

/// Answers a query from `knowledge_base`, falling back to `DEFAULT_FALLBACK`.
pub fn respond<'a>(query: &str, knowledge_base: &'a KnowledgeBase) -> &'a str {
    best_match(query, knowledge_base).map_or(DEFAULT_FALLBACK, |m| m.response)
}

/// Longest key contained in the lowercased query; first listed wins ties.
fn best_match<'a>(query: &str, knowledge_base: &'a KnowledgeBase) -> Option<Match<'a>> {
    let query = query.to_lowercase();
    let mut best: Option<&Entry> = None;
    let mut best_len = 0;

    for entry in knowledge_base.entries() {
        let len = entry.key_len();
        // Strict comparison keeps the earlier entry on equal length.
        if len > best_len && query.contains(entry.key()) {
            best = Some(entry);
            best_len = len;
        }
    }

    best.map(|entry| Match {
        key: entry.key(),
        response: entry.response(),
    })
}

/// A knowledge base paired with the text it returns when nothing matches.
#[derive(Debug, Clone)]
pub struct KeywordResponder {
    knowledge: KnowledgeBase,
    fallback: String,
}

impl KeywordResponder {
    pub fn new(knowledge: KnowledgeBase, fallback: impl Into<String>) -> Self {
        Self {
            knowledge,
            fallback: fallback.into(),
        }
    }

    /// The matched entry for `query`, if any key occurs in it.
    pub fn find_match(&self, query: &str) -> Option<Match<'_>> {
        let found = best_match(query, &self.knowledge);
        trace!(matched = ?found.map(|m| m.key), "Keyword lookup");
        found
    }

    /// The reply for `query`. Never empty as long as the fallback is not.
    pub fn respond(&self, query: &str) -> &str {
        self.find_match(query)
            .map_or(self.fallback.as_str(), |m| m.response)
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}

impl Default for KeywordResponder {
    fn default() -> Self {
        Self::new(KnowledgeBase::builtin(), DEFAULT_FALLBACK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_kb() -> KnowledgeBase {
        KnowledgeBase::new([("oop in java", "R1"), ("java", "R2")]).unwrap()
    }

    #[test]
    fn test_longer_key_wins() {
        let kb = scenario_kb();
        assert_eq!(respond("tell me about oop in java please", &kb), "R1");
    }

    #[test]
    fn test_no_match_returns_fallback() {
        let kb = scenario_kb();
        assert_eq!(respond("random unrelated text", &kb), DEFAULT_FALLBACK);
    }

    #[test]
    fn test_single_match() {
        let kb = scenario_kb();
        assert_eq!(respond("is java fast?", &kb), "R2");
    }

    #[test]
    fn test_case_insensitive() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(respond("WHAT IS JAVA", &kb), respond("what is java", &kb));
        assert_eq!(respond("WHAT IS JAVA", &kb), kb.get("what is java").unwrap());
    }

    #[test]
    fn test_longer_key_wins_regardless_of_order() {
        let kb = KnowledgeBase::new([("java", "R2"), ("oop in java", "R1")]).unwrap();
        assert_eq!(respond("OOP in Java?", &kb), "R1");
    }

    #[test]
    fn test_equal_length_tie_goes_to_first_entry() {
        let kb = KnowledgeBase::new([("heap", "first"), ("tree", "second")]).unwrap();
        assert_eq!(respond("tree or heap?", &kb), "first");

        let kb = KnowledgeBase::new([("tree", "second"), ("heap", "first")]).unwrap();
        assert_eq!(respond("tree or heap?", &kb), "second");
    }

    #[test]
    fn test_substring_inside_word_matches() {
        // Plain substring semantics: "threads" inside "multithreadsafe" counts.
        let kb = KnowledgeBase::builtin();
        assert_eq!(
            respond("multithreadsafe", &kb),
            kb.get("threads").unwrap()
        );
    }

    #[test]
    fn test_padded_key_matches_only_as_a_word() {
        let kb = KnowledgeBase::new([(" go ", "Go answer")]).unwrap();
        assert_eq!(respond("i love django", &kb), DEFAULT_FALLBACK);
        assert_eq!(respond("should i learn Go next?", &kb), "Go answer");
    }

    #[test]
    fn test_padded_key_length_counts_padding() {
        // " jvm " (5 chars) outranks "java" (4 chars).
        let kb = KnowledgeBase::new([("java", "J"), (" jvm ", "V")]).unwrap();
        assert_eq!(respond("java on the jvm today", &kb), "V");
    }

    #[test]
    fn test_empty_knowledge_base_always_falls_back() {
        let kb = KnowledgeBase::default();
        assert_eq!(respond("what is java", &kb), DEFAULT_FALLBACK);
    }

    #[test]
    fn test_non_empty_queries_get_non_empty_replies() {
        let responder = KeywordResponder::default();
        for query in ["a", "java", "best practices please", "???", "ünïcödé"] {
            assert!(!responder.respond(query).is_empty(), "empty reply for {query:?}");
        }
    }

    #[test]
    fn test_responder_custom_fallback_and_match() {
        let responder = KeywordResponder::new(scenario_kb(), "no idea");
        assert_eq!(responder.respond("nothing relevant"), "no idea");
        assert_eq!(
            responder.find_match("OOP IN JAVA"),
            Some(Match {
                key: "oop in java",
                response: "R1"
            })
        );
        assert_eq!(responder.find_match("python"), None);
    }
}
