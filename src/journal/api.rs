//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single entry point
//! for journal operations, whatever the UI.
//!
//! It:
//! - **Dispatches** to the matching command function
//! - **Normalizes inputs** (selector strings into [`EntrySelector`]s, collection and mode
//!   names into their types)
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does not hold business logic, write to stdout/stderr, or format output.
//!
//! `JournalApi<B: StorageBackend>` is generic over the storage backend: production uses
//! [`FsBackend`](crate::store::fs::FsBackend), tests use
//! [`MemBackend`](crate::store::memory::MemBackend).

use crate::commands;
use crate::config::JournalConfig;
use crate::corpus::{Collection, Corpus};
use crate::error::{JournalError, Result};
use crate::highlight::{Palette, ScopedSelection};
use crate::model::{EntryKey, Mode, Passage};
use crate::store::{JournalStore, StorageBackend};
use chrono::Utc;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// The main API facade for journal operations.
pub struct JournalApi<B: StorageBackend> {
    store: JournalStore<B>,
    config: JournalConfig,
    data_dir: PathBuf,
}

impl<B: StorageBackend> JournalApi<B> {
    pub fn new(backend: B, config: JournalConfig, data_dir: PathBuf) -> Self {
        let store = JournalStore::new(backend, config.storage_keys());
        Self {
            store,
            config,
            data_dir,
        }
    }

    pub fn store(&self) -> &JournalStore<B> {
        &self.store
    }

    pub fn config(&self) -> &JournalConfig {
        &self.config
    }

    pub fn palette(&self) -> &Palette {
        &self.config.palette
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Where the volume files are read from: the configured directory, or
    /// `<data dir>/corpus`.
    pub fn corpus_dir(&self) -> PathBuf {
        self.config
            .corpus_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("corpus"))
    }

    pub fn load_corpus(&self) -> Result<Corpus> {
        Corpus::load(&self.corpus_dir())
    }

    /// Draws a random passage. Nothing is saved.
    pub fn generate(&self, collection: &str, mode: &str) -> Result<commands::CmdResult> {
        let collection = Collection::from_str(collection)?;
        let mode = Mode::from_str(mode)?;
        let passage = self.load_corpus()?.random_pick(collection, mode)?;
        Ok(commands::CmdResult::default().with_passage(passage))
    }

    /// Finds a passage in the corpus by reference.
    pub fn lookup(&self, reference: &str, volume: Option<&str>) -> Result<Passage> {
        self.load_corpus()?
            .find_passage(reference, volume)
            .ok_or_else(|| JournalError::Corpus(format!("No passage {}", reference)))
    }

    pub fn add_passage(&self, passage: Passage) -> Result<commands::CmdResult> {
        commands::add::run(&self.store, passage)
    }

    pub fn list_entries(&self) -> Result<commands::CmdResult> {
        commands::list::run(&self.store)
    }

    pub fn view_entries<I: AsRef<str>>(&self, selectors: &[I]) -> Result<commands::CmdResult> {
        let selectors = parse_selectors(selectors)?;
        commands::list::view(&self.store, &selectors)
    }

    pub fn remove_entries<I: AsRef<str>>(&self, selectors: &[I]) -> Result<commands::CmdResult> {
        let selectors = parse_selectors(selectors)?;
        commands::remove::run(&self.store, &selectors)
    }

    pub fn set_note(&self, selector: &str, text: &str) -> Result<commands::CmdResult> {
        let selector = EntrySelector::from_str(selector)?;
        commands::note::run(&self.store, &selector, text)
    }

    pub fn resolve_key(&self, selector: &str) -> Result<EntryKey> {
        let selector = EntrySelector::from_str(selector)?;
        Ok(commands::helpers::resolve_selector(&self.store, &selector)?.key())
    }

    pub fn select_text(
        &self,
        selector: &str,
        needle: &str,
        occurrence: usize,
    ) -> Result<ScopedSelection> {
        let selector = EntrySelector::from_str(selector)?;
        commands::highlight::select_text(&self.store, &selector, needle, occurrence)
    }

    pub fn select_range(&self, selector: &str, range: Range<usize>) -> Result<ScopedSelection> {
        let selector = EntrySelector::from_str(selector)?;
        commands::highlight::select_range(&self.store, &selector, range)
    }

    pub fn toggle_highlight(
        &self,
        container: &EntryKey,
        selection: &ScopedSelection,
        color: &str,
    ) -> Result<commands::CmdResult> {
        commands::highlight::toggle(&self.store, &self.config.palette, container, selection, color)
    }

    pub fn clear_selection_highlights(
        &self,
        container: &EntryKey,
        selection: &ScopedSelection,
    ) -> Result<commands::CmdResult> {
        commands::highlight::clear_selection(&self.store, container, selection)
    }

    pub fn clear_all_highlights(&self, container: &EntryKey) -> Result<commands::CmdResult> {
        commands::highlight::clear_all(&self.store, container)
    }

    pub fn render_page(&self) -> Result<commands::CmdResult> {
        commands::render::run(&self.store, &self.config.palette)
    }

    pub fn export(&self, out_dir: &Path) -> Result<commands::CmdResult> {
        commands::export::run(&self.store, &self.config.palette, out_dir, Utc::now())
    }

    pub fn config_action(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.data_dir, action)
    }
}

fn parse_selectors<I: AsRef<str>>(inputs: &[I]) -> Result<Vec<EntrySelector>> {
    inputs
        .iter()
        .map(|s| EntrySelector::from_str(s.as_ref()))
        .collect()
}

pub use crate::commands::config::ConfigAction;
pub use commands::{CmdMessage, CmdResult, DisplayEntry, EntrySelector, MessageLevel};
