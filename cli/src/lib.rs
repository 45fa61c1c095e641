//! # SiteKit Library
//!
//! File: cli/src/lib.rs
//!
//! ## Overview
//!
//! Interactivity for a static guide/tracker documentation site, minus the
//! browser: the keyword chatbot, page view state and the tooling around them.
//!
//! - `chatbot`: knowledge base, keyword responder and chat sessions
//! - `site`: page controller (sidebar, focus mode, modal, TOC highlight)
//! - `core`: configuration, errors, templating
//! - `commands`: the `sitekit` CLI command groups
//!
//! ## Examples
//!
//! ```rust
//! use sitekit::chatbot::knowledge::KnowledgeBase;
//! use sitekit::chatbot::responder::respond;
//!
//! let kb = KnowledgeBase::new([("oop in java", "R1"), ("java", "R2")]).unwrap();
//! assert_eq!(respond("tell me about oop in java please", &kb), "R1");
//! ```
//!
pub mod chatbot;
pub mod commands;
pub mod core;
pub mod site;
