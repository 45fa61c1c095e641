//! # SiteKit Page Interactivity
//!
//! File: cli/src/site/mod.rs
//!
//! ## Overview
//!
//! Page-level behaviour of the guide and tracker pages, modelled as plain
//! state so it can be driven and tested without a browser:
//! - `controller`: `SiteController` and its view state (sidebar, focus mode,
//!   chatbot window, code modal, TOC highlight)
//! - `code_block`: extraction of copyable text from rendered code blocks
//!
pub mod code_block;
pub mod controller;
