//! # Keyword Responder Library Tests
//!
//! File: cli/tests/responder.rs
//!
//! Exercises the public chatbot API the way an embedding renderer would.
//!

use sitekit::chatbot::knowledge::KnowledgeBase;
use sitekit::chatbot::responder::{respond, KeywordResponder, DEFAULT_FALLBACK};
use sitekit::chatbot::session::{ChatSession, Role};
use std::sync::Arc;

fn scenario_kb() -> KnowledgeBase {
    KnowledgeBase::new([("oop in java", "R1"), ("java", "R2")]).unwrap()
}

#[test]
fn test_scenarios() {
    let kb = scenario_kb();
    assert_eq!(respond("tell me about oop in java please", &kb), "R1");
    assert_eq!(respond("random unrelated text", &kb), DEFAULT_FALLBACK);
}

#[test]
fn test_every_key_answers_itself() {
    let kb = KnowledgeBase::builtin();
    for entry in kb.entries() {
        assert_eq!(respond(entry.key(), &kb), entry.response());
        assert_eq!(respond(&entry.key().to_uppercase(), &kb), entry.response());
    }
}

#[test]
fn test_session_transcript() {
    let mut session = ChatSession::new(Arc::new(KeywordResponder::new(scenario_kb(), "?")));
    assert!(session.send_message("").is_none());
    assert_eq!(session.ask_question("Java please"), Some("R2"));
    assert_eq!(session.send_message("anything else"), Some("?"));

    let roles: Vec<Role> = session.messages().iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Bot, Role::User, Role::Bot]);
}
