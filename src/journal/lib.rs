//! # Scripture Journal Architecture
//!
//! Scripture Journal is a **UI-agnostic journal library**. A passage drawn from the
//! scriptures can be saved as an entry, annotated with a free-text note and marked up
//! with colored highlights. The bundled binary is one client; the same core can back a
//! browser front end or anything else that can hand it a selection.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  View Layer (view.rs)                                       │
//! │  - Per-entry cards, note editor state, confirmation hooks   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands, resolves selectors to keys    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Business logic: add, remove, notes, highlight edits      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - JournalStore over a StorageBackend (fs or memory)        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Entry identity
//!
//! Entries and notes live under two independent storage keys. They are tied together by
//! an [`model::EntryKey`] built from the entry's collection and reference. The key format
//! is part of the persisted schema and never changes.
//!
//! ## Markup as the single source of truth
//!
//! Highlights are not tracked in a side list. An entry's rendered markup is parsed into a
//! [`markup::Document`], the [`highlight`] engine edits that document, and the result is
//! serialized back into the entry. Scanning the markup always recovers the regions.
//!
//! ## No I/O assumptions in the core
//!
//! From `view.rs` inward, code takes Rust arguments and returns `Result` values. It never
//! writes to stdout/stderr and never exits the process. User interaction that must block
//! (confirming a removal, showing a notice) goes through the [`view::Prompt`] trait.
//!
//! ## Module Overview
//!
//! - [`api`]: facade, entry point for all operations
//! - [`commands`]: business logic for each operation
//! - [`store`]: storage backends and the journal store
//! - [`model`]: entries, passages and keys
//! - [`markup`]: escaping, parsing, rendering and serializing passage markup
//! - [`highlight`]: the highlight engine
//! - [`view`]: the journal view controller
//! - [`corpus`]: loading the scripture volumes and drawing passages
//! - [`config`]: configuration management
//! - [`clipboard`]: cross-platform clipboard support
//! - [`logging`]: tracing subscriber setup for binaries
//! - [`error`]: error types

pub mod api;
pub mod clipboard;
pub mod commands;
pub mod config;
pub mod corpus;
pub mod error;
pub mod highlight;
pub mod logging;
pub mod markup;
pub mod model;
pub mod store;
pub mod view;
