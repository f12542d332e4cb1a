//! # CLI Layer
//!
//! One client of the journal library, not the application itself. This is the only
//! place that knows about terminal I/O, argument parsing and output formatting.
//!
//! - `setup.rs`: clap definitions and grouped help
//! - `commands.rs`: `run()`, building the API and dispatching to `handle_*` functions
//! - `render.rs`: turning command results and entry cards into terminal text
//! - `prompt.rs`: the terminal [`Prompt`](scripture_journal::view::Prompt)
//!
//! Running with no command lists the journal. Edits that act on a single entry (notes,
//! highlights, removal) go through the [`JournalView`](scripture_journal::view::JournalView)
//! so removal asks for confirmation and selection problems print as notices.
//!
//! State lives under the data directory (`SCRIPTURE_JOURNAL_HOME` when set): the two
//! storage keys as JSON files, `config.json`, and by default the scripture volumes in
//! `corpus/`.

mod commands;
mod prompt;
mod render;
mod setup;

pub use commands::run;
